//! Swagger-from-metadata - Swagger 2.0 documents from compiled-handler metadata.
//!
//! This library derives a machine-readable Swagger 2.0 API description from
//! read-only metadata descriptors of already-compiled service-handler types
//! ("controllers"), without hand-authoring the specification. It never
//! inspects running code: descriptors are inert snapshots, typically
//! produced by an external extraction step and loaded from JSON.
//!
//! # Architecture
//!
//! The library is organized into several modules that work together:
//!
//! 1. [`descriptor`] - Type/method/attribute metadata snapshots and candidate filtering
//! 2. [`settings`] - The immutable configuration threaded through every resolver
//! 3. [`route_resolver`] - Path template synthesis and optional-segment expansion
//! 4. [`verb_resolver`] - HTTP verb resolution per method
//! 5. [`operation_id`] - Collision-free operation-id allocation
//! 6. [`processor`] - Operation/document processor pipeline and registry
//! 7. [`schema`] - Schema registrar collaborator
//! 8. [`generator`] - The derivation engine assembling the final document
//! 9. [`swagger`] - The Swagger 2.0 object model
//! 10. [`serializer`] - Serialization to JSON or YAML
//! 11. [`output`] - Stdout/file/HTTP delivery sinks
//!
//! # Example Usage
//!
//! ```no_run
//! use swagger_from_metadata::{
//!     descriptor::DescriptorSet,
//!     generator::SwaggerGenerator,
//!     schema::BasicSchemaRegistrar,
//!     serializer::serialize_json,
//!     settings::GeneratorSettings,
//! };
//! use std::path::Path;
//!
//! let set = DescriptorSet::from_path(Path::new("descriptors.json")).unwrap();
//! let generator = SwaggerGenerator::new(GeneratorSettings::default());
//! let mut registrar = BasicSchemaRegistrar::new();
//! let document = generator.generate_from_set(&set, &mut registrar).unwrap();
//! println!("{}", serialize_json(&document).unwrap());
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module which provides a complete CLI application.

pub mod cli;
pub mod descriptor;
pub mod error;
pub mod generator;
pub mod operation_id;
pub mod output;
pub mod processor;
pub mod route_resolver;
pub mod schema;
pub mod serializer;
pub mod settings;
pub mod swagger;
pub mod verb_resolver;
