//! The operation-derivation engine.
//!
//! For each candidate type, in declaration order, every eligible public
//! method is resolved into a set of (path, verb) draft operations. Each
//! draft runs through the operation-processor pipeline and, if kept, gets a
//! unique operation id and is frozen into the document. Document processors
//! run once at the end over the whole document.
//!
//! The run is single-threaded and fully synchronous; processing order is an
//! observable contract because it determines id suffixes.

use crate::descriptor::{DescriptorSet, MethodDescriptor, TypeDescriptor};
use crate::error::Result;
use crate::operation_id;
use crate::processor::{
    DocumentContext, DocumentProcessor, DocumentTagsProcessor, OperationContext,
    OperationProcessor, ParameterProcessor, ProcessorRegistry, ResponseProcessor,
    SummaryAndDescriptionProcessor, TagsProcessor,
};
use crate::route_resolver::resolve_paths;
use crate::schema::SchemaRegistrar;
use crate::settings::GeneratorSettings;
use crate::swagger::{Operation, OperationDescription, SwaggerDocument};
use crate::verb_resolver::resolve_verb;
use log::debug;

/// Generates a Swagger document from candidate type descriptors.
pub struct SwaggerGenerator {
    settings: GeneratorSettings,
    operation_processors: Vec<Box<dyn OperationProcessor>>,
    document_processors: Vec<Box<dyn DocumentProcessor>>,
    registry: ProcessorRegistry,
}

impl SwaggerGenerator {
    /// Creates a generator with the default processor pipeline.
    pub fn new(settings: GeneratorSettings) -> Self {
        Self {
            settings,
            operation_processors: vec![
                Box::new(SummaryAndDescriptionProcessor),
                Box::new(TagsProcessor),
                Box::new(ParameterProcessor),
                Box::new(ResponseProcessor),
            ],
            document_processors: vec![Box::new(DocumentTagsProcessor)],
            registry: ProcessorRegistry::new(),
        }
    }

    /// Creates a generator with no configured processors, for callers that
    /// want full control over the pipeline.
    pub fn bare(settings: GeneratorSettings) -> Self {
        Self {
            settings,
            operation_processors: Vec::new(),
            document_processors: Vec::new(),
            registry: ProcessorRegistry::new(),
        }
    }

    /// Appends an operation processor to the configured pipeline.
    pub fn with_operation_processor(mut self, processor: Box<dyn OperationProcessor>) -> Self {
        self.operation_processors.push(processor);
        self
    }

    /// Appends a document processor.
    pub fn with_document_processor(mut self, processor: Box<dyn DocumentProcessor>) -> Self {
        self.document_processors.push(processor);
        self
    }

    /// The registry used to instantiate attribute-declared processors.
    pub fn registry_mut(&mut self) -> &mut ProcessorRegistry {
        &mut self.registry
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Generates a document for the snapshot's candidate types, applying the
    /// configured inclusion filters.
    pub fn generate_from_set(
        &self,
        set: &DescriptorSet,
        registrar: &mut dyn SchemaRegistrar,
    ) -> Result<SwaggerDocument> {
        let candidates = set.list_candidate_types(&self.settings.candidate_criteria())?;
        self.generate(&candidates, registrar)
    }

    /// Generates a document for the given candidate types, in order.
    pub fn generate(
        &self,
        types: &[&TypeDescriptor],
        registrar: &mut dyn SchemaRegistrar,
    ) -> Result<SwaggerDocument> {
        let mut document = SwaggerDocument::new(
            self.settings.title.clone(),
            self.settings.description.clone(),
            self.settings.version.clone(),
        );

        for type_descriptor in types {
            self.generate_for_type(&mut document, type_descriptor, registrar)?;
        }

        for (name, schema) in registrar.registered_schemas() {
            document.add_definition(name, schema.clone());
        }

        for processor in &self.document_processors {
            let mut context = DocumentContext {
                document: &mut document,
                types,
                settings: &self.settings,
            };
            processor.process(&mut context)?;
        }

        Ok(document)
    }

    fn generate_for_type(
        &self,
        document: &mut SwaggerDocument,
        type_descriptor: &TypeDescriptor,
        registrar: &mut dyn SchemaRegistrar,
    ) -> Result<()> {
        if type_descriptor
            .attributes
            .contains(&self.settings.ignore_attribute)
        {
            debug!("Skipping ignored type: {}", type_descriptor.full_name);
            return Ok(());
        }

        debug!("Generating operations for {}", type_descriptor.full_name);

        for method in &type_descriptor.methods {
            if !method.is_public {
                continue;
            }
            if method.attributes.contains(&self.settings.ignore_attribute) {
                debug!(
                    "Skipping ignored method: {}.{}",
                    type_descriptor.simple_name, method.name
                );
                continue;
            }

            let paths = resolve_paths(&self.settings, type_descriptor, method)?;
            let verb = resolve_verb(&self.settings, method)?;
            let candidate =
                operation_id::candidate_id(&self.settings, &type_descriptor.simple_name, method);
            let deprecated = method
                .attributes
                .contains(&self.settings.deprecated_attribute);

            for path in paths {
                let mut draft = OperationDescription {
                    path,
                    verb,
                    operation: Operation {
                        operation_id: Some(candidate.clone()),
                        deprecated,
                        ..Default::default()
                    },
                };

                let keep = self.run_operation_processors(
                    document,
                    type_descriptor,
                    method,
                    &mut draft,
                    registrar,
                )?;
                if !keep {
                    debug!(
                        "Draft discarded by pipeline: {} {}",
                        draft.verb.as_str(),
                        draft.path
                    );
                    continue;
                }

                // Id allocation sees only operations already frozen into the
                // document, so suffixes follow strict insertion order.
                let current = draft
                    .operation
                    .operation_id
                    .clone()
                    .unwrap_or_else(|| candidate.clone());
                draft.operation.operation_id =
                    Some(operation_id::allocate(document, &current));

                document.insert(draft)?;
            }
        }

        Ok(())
    }

    /// Runs the configured processors, then the class- and method-declared
    /// ones discovered via the processor-attribute convention.
    fn run_operation_processors(
        &self,
        document: &SwaggerDocument,
        type_descriptor: &TypeDescriptor,
        method: &MethodDescriptor,
        draft: &mut OperationDescription,
        registrar: &mut dyn SchemaRegistrar,
    ) -> Result<bool> {
        let mut context = OperationContext {
            document,
            type_descriptor,
            method,
            draft,
            registrar,
            settings: &self.settings,
        };

        for processor in &self.operation_processors {
            if !processor.process(&mut context)? {
                return Ok(false);
            }
        }

        let declared = type_descriptor
            .attributes
            .iter()
            .chain(method.attributes.iter())
            .filter(|a| a.type_name == self.settings.operation_processor_attribute);

        for attribute in declared {
            let key = attribute.string_property("Type").ok_or_else(|| {
                crate::error::Error::missing_property(&attribute.type_name, "Type")
            })?;
            let processor = self.registry.instantiate(key)?;
            if !processor.process(&mut context)? {
                return Ok(false);
            }
        }

        Ok(true)
    }
}
