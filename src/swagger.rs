//! Swagger 2.0 object model.
//!
//! The document owns the final paths/definitions graph and enforces the
//! structural invariants of generation: a (path, verb) pair may only be
//! registered once, and definition keys stay unique even when two different
//! schemas want the same name.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An opaque JSON-Schema-shaped value produced by a schema registrar.
pub type SchemaNode = Value;

/// HTTP verbs supported by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl Verb {
    /// Lowercase name as used in the Swagger paths object.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "get",
            Verb::Post => "post",
            Verb::Put => "put",
            Verb::Delete => "delete",
            Verb::Patch => "patch",
            Verb::Head => "head",
            Verb::Options => "options",
        }
    }

    /// Maps a lowercase verb string to the enum; anything unrecognized is `None`.
    pub fn parse(s: &str) -> Option<Verb> {
        match s {
            "get" => Some(Verb::Get),
            "post" => Some(Verb::Post),
            "put" => Some(Verb::Put),
            "delete" => Some(Verb::Delete),
            "patch" => Some(Verb::Patch),
            "head" => Some(Verb::Head),
            "options" => Some(Verb::Options),
            _ => None,
        }
    }
}

/// Swagger Info object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Info {
    /// API title
    pub title: String,
    /// API description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// API version
    pub version: String,
}

/// Swagger Parameter object.
///
/// Body parameters carry a `schema`; path/query parameters carry an inline
/// `type`, per the Swagger 2.0 split.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name
    pub name: String,
    /// Parameter location (path, query, body)
    #[serde(rename = "in")]
    pub location: String,
    /// Whether the parameter is required
    pub required: bool,
    /// Inline type for non-body parameters
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
    /// Schema for body parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaNode>,
    /// Parameter description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Swagger Response object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// Response description
    pub description: String,
    /// Response schema
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaNode>,
}

/// Swagger Operation object - one (path, verb) entry in the document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Operation {
    /// Operation ID, unique across the document once inserted
    #[serde(rename = "operationId", skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    /// Operation summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Operation description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Grouping tags
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tags: Vec<String>,
    /// Deprecation marker
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub deprecated: bool,
    /// Parameters (path, query, body)
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub parameters: Vec<Parameter>,
    /// Responses keyed by status code
    #[serde(default)]
    pub responses: IndexMap<String, Response>,
}

/// Entry of the document-level tag catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name
    pub name: String,
    /// Tag description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A draft operation: a (path, verb) pair plus the operation under
/// construction. Mutable while the processor pipeline runs; frozen once
/// inserted into the document.
#[derive(Debug, Clone)]
pub struct OperationDescription {
    /// Normalized URL path template
    pub path: String,
    /// Resolved HTTP verb
    pub verb: Verb,
    /// The operation being built
    pub operation: Operation,
}

/// Complete Swagger 2.0 document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwaggerDocument {
    /// Specification version, always "2.0"
    pub swagger: String,
    /// API info
    pub info: Info,
    /// Accepted request content types
    pub consumes: Vec<String>,
    /// Produced response content types
    pub produces: Vec<String>,
    /// Paths collection (URL path -> verb -> Operation), insertion-ordered
    pub paths: IndexMap<String, IndexMap<Verb, Operation>>,
    /// Named schema definitions
    #[serde(skip_serializing_if = "IndexMap::is_empty", default)]
    pub definitions: IndexMap<String, SchemaNode>,
    /// Tag catalog
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tags: Vec<Tag>,
}

impl SwaggerDocument {
    /// Creates an empty document with the given info section.
    pub fn new(title: String, description: Option<String>, version: String) -> Self {
        Self {
            swagger: "2.0".to_string(),
            info: Info {
                title,
                description,
                version,
            },
            consumes: vec!["application/json".to_string()],
            produces: vec!["application/json".to_string()],
            paths: IndexMap::new(),
            definitions: IndexMap::new(),
            tags: Vec::new(),
        }
    }

    /// Iterates all operations already frozen into the document,
    /// in insertion order.
    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.paths.values().flat_map(|item| item.values())
    }

    /// Checks whether any frozen operation already carries the given id.
    pub fn contains_operation_id(&self, id: &str) -> bool {
        self.operations()
            .any(|op| op.operation_id.as_deref() == Some(id))
    }

    /// Inserts a surviving draft into the paths collection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateOperation`] if the (path, verb) pair is
    /// already registered. The whole run is expected to abort on this.
    pub fn insert(&mut self, description: OperationDescription) -> Result<()> {
        let item = self.paths.entry(description.path.clone()).or_default();

        if item.contains_key(&description.verb) {
            return Err(Error::DuplicateOperation {
                path: description.path,
                verb: description.verb,
            });
        }

        item.insert(description.verb, description.operation);
        Ok(())
    }

    /// Merges one registered schema into the definitions map.
    ///
    /// A schema that is already present under any key is skipped. A key
    /// collision with a *different* schema gets a fresh `{name}_{n}` key
    /// rather than overwriting.
    pub fn add_definition(&mut self, name: &str, schema: SchemaNode) {
        if self.definitions.values().any(|existing| *existing == schema) {
            return;
        }

        if !self.definitions.contains_key(name) {
            self.definitions.insert(name.to_string(), schema);
            return;
        }

        let mut number = 2;
        loop {
            let candidate = format!("{}_{}", name, number);
            if !self.definitions.contains_key(&candidate) {
                self.definitions.insert(candidate, schema);
                return;
            }
            number += 1;
        }
    }
}
