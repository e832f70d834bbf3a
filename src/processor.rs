//! Operation and document processor pipeline.
//!
//! Operation processors run once per draft, in configured order, and may
//! veto (`Ok(false)`), mutate, or enrich it. Additional processors can be
//! declared on the controller or method through an attribute convention and
//! are instantiated from a [`ProcessorRegistry`]. Document processors run
//! once after all types are processed; they may enrich the document but
//! never remove operations.

use crate::descriptor::{split_dotted, MethodDescriptor, TypeDescriptor};
use crate::error::{Error, Result};
use crate::schema::{primitive_type_keyword, SchemaRegistrar};
use crate::settings::GeneratorSettings;
use crate::swagger::{
    OperationDescription, Parameter, Response, SwaggerDocument, Tag,
};
use std::collections::HashMap;

/// Context handed to each operation processor for one draft.
pub struct OperationContext<'a> {
    /// The document as built so far (read-only while the draft is mutable)
    pub document: &'a SwaggerDocument,
    /// Controller type the draft was derived from
    pub type_descriptor: &'a TypeDescriptor,
    /// Method the draft was derived from
    pub method: &'a MethodDescriptor,
    /// The draft under construction
    pub draft: &'a mut OperationDescription,
    /// Schema registrar for parameter/response schemas
    pub registrar: &'a mut dyn SchemaRegistrar,
    /// Run settings
    pub settings: &'a GeneratorSettings,
}

/// A processor run once per draft operation.
pub trait OperationProcessor {
    /// Returns `Ok(false)` to discard the draft, short-circuiting the rest
    /// of the pipeline.
    fn process(&self, context: &mut OperationContext) -> Result<bool>;
}

impl std::fmt::Debug for dyn OperationProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn OperationProcessor")
    }
}

/// Context handed to each document processor after all types are processed.
pub struct DocumentContext<'a> {
    /// The complete document
    pub document: &'a mut SwaggerDocument,
    /// All candidate types of the run
    pub types: &'a [&'a TypeDescriptor],
    /// Run settings
    pub settings: &'a GeneratorSettings,
}

/// A processor run once over the whole document.
pub trait DocumentProcessor {
    fn process(&self, context: &mut DocumentContext) -> Result<()>;
}

type OperationProcessorFactory = Box<dyn Fn() -> Box<dyn OperationProcessor>>;

/// Factory registry for attribute-declared processors: string key to
/// constructor, populated at startup.
#[derive(Default)]
pub struct ProcessorRegistry {
    factories: HashMap<String, OperationProcessorFactory>,
}

impl ProcessorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under the given key.
    pub fn register<F>(&mut self, key: &str, factory: F)
    where
        F: Fn() -> Box<dyn OperationProcessor> + 'static,
    {
        self.factories.insert(key.to_string(), Box::new(factory));
    }

    /// Instantiates the processor registered under the key.
    ///
    /// # Errors
    ///
    /// Unknown keys fail fast as a configuration error.
    pub fn instantiate(&self, key: &str) -> Result<Box<dyn OperationProcessor>> {
        match self.factories.get(key) {
            Some(factory) => Ok(factory()),
            None => Err(Error::Configuration {
                attribute: key.to_string(),
                message: "no operation processor registered under this key".to_string(),
            }),
        }
    }
}

fn strip_controller(name: &str) -> &str {
    name.strip_suffix("Controller").unwrap_or(name)
}

/// Fills the operation summary from the configured summary attribute, the
/// descriptor doc comment, or the method name, in that order; remarks become
/// the description.
pub struct SummaryAndDescriptionProcessor;

impl OperationProcessor for SummaryAndDescriptionProcessor {
    fn process(&self, context: &mut OperationContext) -> Result<bool> {
        let (type_name, property) = split_dotted(&context.settings.summary_attribute);

        let mut summary = match context.method.attributes.first(type_name) {
            Some(attribute) => match property {
                Some(property) => {
                    if !attribute.has_property(property) {
                        return Err(Error::missing_property(type_name, property));
                    }
                    attribute.string_property(property).map(str::to_string)
                }
                None => None,
            },
            None => context.method.summary.clone(),
        };

        if summary.as_deref().unwrap_or("").is_empty() {
            summary = Some(context.method.name.clone());
        }
        context.draft.operation.summary = summary;

        if let Some(remarks) = &context.method.remarks {
            if !remarks.is_empty() {
                context.draft.operation.description = Some(remarks.clone());
            }
        }

        Ok(true)
    }
}

/// Tags the operation with the controller name, "Controller" suffix stripped.
pub struct TagsProcessor;

impl OperationProcessor for TagsProcessor {
    fn process(&self, context: &mut OperationContext) -> Result<bool> {
        let tag = strip_controller(&context.type_descriptor.simple_name).to_string();
        if !context.draft.operation.tags.contains(&tag) {
            context.draft.operation.tags.push(tag);
        }
        Ok(true)
    }
}

/// Derives operation parameters from the method signature.
///
/// A parameter mentioned in the path template is a required path parameter;
/// a complex-typed parameter becomes the body (at most one); everything else
/// is a query parameter. The required-parameter convention applies to
/// non-path parameters: required iff the configured marker attribute is
/// present and the descriptor reports no default value.
pub struct ParameterProcessor;

impl OperationProcessor for ParameterProcessor {
    fn process(&self, context: &mut OperationContext) -> Result<bool> {
        let mut has_body = false;

        for parameter in &context.method.parameters {
            let in_path = context
                .draft
                .path
                .contains(&format!("{{{}}}", parameter.name))
                || context
                    .draft
                    .path
                    .contains(&format!("{{{}:", parameter.name));

            let required = parameter
                .attributes
                .contains(&context.settings.required_parameter_attribute)
                && !parameter.has_default;

            let built = if in_path {
                Parameter {
                    name: parameter.name.clone(),
                    location: "path".to_string(),
                    required: true,
                    param_type: Some(
                        primitive_type_keyword(&parameter.type_name)
                            .unwrap_or("string")
                            .to_string(),
                    ),
                    schema: None,
                    description: None,
                }
            } else if let Some(keyword) = primitive_type_keyword(&parameter.type_name) {
                Parameter {
                    name: parameter.name.clone(),
                    location: "query".to_string(),
                    required,
                    param_type: Some(keyword.to_string()),
                    schema: None,
                    description: None,
                }
            } else {
                if has_body {
                    return Err(Error::Configuration {
                        attribute: context.method.name.clone(),
                        message: "the operation has more than one body parameter".to_string(),
                    });
                }
                has_body = true;
                Parameter {
                    name: parameter.name.clone(),
                    location: "body".to_string(),
                    required,
                    param_type: None,
                    schema: Some(context.registrar.schema_for(&parameter.type_name)),
                    description: None,
                }
            };

            context.draft.operation.parameters.push(built);
        }

        Ok(true)
    }
}

/// Adds the 200 response, with a schema when the return type is known.
pub struct ResponseProcessor;

impl OperationProcessor for ResponseProcessor {
    fn process(&self, context: &mut OperationContext) -> Result<bool> {
        let schema = context
            .method
            .return_type
            .as_deref()
            .filter(|rt| !matches!(*rt, "void" | "Task" | "()"))
            .map(|rt| context.registrar.schema_for(rt));

        context.draft.operation.responses.insert(
            "200".to_string(),
            Response {
                description: "Successful response".to_string(),
                schema,
            },
        );

        Ok(true)
    }
}

/// Builds the document-level tag catalog from the candidate types.
pub struct DocumentTagsProcessor;

impl DocumentProcessor for DocumentTagsProcessor {
    fn process(&self, context: &mut DocumentContext) -> Result<()> {
        for type_descriptor in context.types {
            if type_descriptor
                .attributes
                .contains(&context.settings.ignore_attribute)
            {
                continue;
            }
            let name = strip_controller(&type_descriptor.simple_name).to_string();
            if !context.document.tags.iter().any(|t| t.name == name) {
                context.document.tags.push(Tag {
                    name,
                    description: None,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{
        AttributeBag, AttributeDescriptor, ParameterDescriptor,
    };
    use crate::schema::BasicSchemaRegistrar;
    use crate::swagger::{Operation, Verb};
    use serde_json::json;

    fn method(name: &str) -> MethodDescriptor {
        MethodDescriptor {
            name: name.to_string(),
            is_public: true,
            attributes: AttributeBag::default(),
            parameters: vec![],
            declaring_type_full_name: None,
            return_type: None,
            summary: None,
            remarks: None,
        }
    }

    fn controller(simple_name: &str) -> TypeDescriptor {
        TypeDescriptor {
            full_name: format!("Shop.{}", simple_name),
            namespace: Some("Shop".to_string()),
            simple_name: simple_name.to_string(),
            is_abstract: false,
            base_types: vec![],
            attributes: AttributeBag::default(),
            methods: vec![],
        }
    }

    fn draft(path: &str) -> OperationDescription {
        OperationDescription {
            path: path.to_string(),
            verb: Verb::Post,
            operation: Operation::default(),
        }
    }

    fn run_processor(
        processor: &dyn OperationProcessor,
        type_descriptor: &TypeDescriptor,
        method: &MethodDescriptor,
        draft: &mut OperationDescription,
    ) -> Result<bool> {
        let settings = GeneratorSettings::default();
        let document = SwaggerDocument::new("Test".to_string(), None, "1.0.0".to_string());
        let mut registrar = BasicSchemaRegistrar::new();
        let mut context = OperationContext {
            document: &document,
            type_descriptor,
            method,
            draft,
            registrar: &mut registrar,
            settings: &settings,
        };
        processor.process(&mut context)
    }

    #[test]
    fn test_summary_from_attribute() {
        let mut m = method("AddProduct");
        m.attributes = AttributeBag(vec![AttributeDescriptor {
            type_name: "DescriptionAttribute".to_string(),
            implements: vec![],
            properties: [("Description".to_string(), json!("Adds a product"))]
                .into_iter()
                .collect(),
        }]);
        let mut d = draft("/Product/AddProduct");

        let keep = run_processor(
            &SummaryAndDescriptionProcessor,
            &controller("ProductController"),
            &m,
            &mut d,
        )
        .unwrap();

        assert!(keep);
        assert_eq!(d.operation.summary.as_deref(), Some("Adds a product"));
    }

    #[test]
    fn test_summary_attribute_missing_property_is_fatal() {
        let mut m = method("AddProduct");
        m.attributes = AttributeBag(vec![AttributeDescriptor {
            type_name: "DescriptionAttribute".to_string(),
            implements: vec![],
            properties: [("Text".to_string(), json!("wrong shape"))]
                .into_iter()
                .collect(),
        }]);
        let mut d = draft("/Product/AddProduct");

        let err = run_processor(
            &SummaryAndDescriptionProcessor,
            &controller("ProductController"),
            &m,
            &mut d,
        )
        .unwrap_err();

        assert!(err.to_string().contains("Description"));
    }

    #[test]
    fn test_summary_falls_back_to_doc_comment_then_name() {
        let mut m = method("AddProduct");
        m.summary = Some("Adds a product to the catalog".to_string());
        m.remarks = Some("Idempotent for identical payloads".to_string());
        let mut d = draft("/Product/AddProduct");

        run_processor(
            &SummaryAndDescriptionProcessor,
            &controller("ProductController"),
            &m,
            &mut d,
        )
        .unwrap();
        assert_eq!(
            d.operation.summary.as_deref(),
            Some("Adds a product to the catalog")
        );
        assert_eq!(
            d.operation.description.as_deref(),
            Some("Idempotent for identical payloads")
        );

        let bare = method("AddProduct");
        let mut d2 = draft("/Product/AddProduct");
        run_processor(
            &SummaryAndDescriptionProcessor,
            &controller("ProductController"),
            &bare,
            &mut d2,
        )
        .unwrap();
        assert_eq!(d2.operation.summary.as_deref(), Some("AddProduct"));
    }

    #[test]
    fn test_tags_processor_strips_controller_suffix() {
        let m = method("AddProduct");
        let mut d = draft("/Product/AddProduct");

        run_processor(&TagsProcessor, &controller("ProductController"), &m, &mut d).unwrap();

        assert_eq!(d.operation.tags, vec!["Product".to_string()]);
    }

    #[test]
    fn test_parameter_processor_path_query_and_body() {
        let mut m = method("ModifyOrder");
        m.parameters = vec![
            ParameterDescriptor {
                name: "orderId".to_string(),
                type_name: "string".to_string(),
                has_default: false,
                attributes: AttributeBag::default(),
            },
            ParameterDescriptor {
                name: "page".to_string(),
                type_name: "int".to_string(),
                has_default: true,
                attributes: AttributeBag::default(),
            },
            ParameterDescriptor {
                name: "order".to_string(),
                type_name: "OrderDto".to_string(),
                has_default: false,
                attributes: AttributeBag::default(),
            },
        ];
        let mut d = draft("/Order/Modify/{orderId}");

        run_processor(&ParameterProcessor, &controller("OrderController"), &m, &mut d).unwrap();

        let parameters = &d.operation.parameters;
        assert_eq!(parameters.len(), 3);

        assert_eq!(parameters[0].location, "path");
        assert!(parameters[0].required);
        assert_eq!(parameters[0].param_type.as_deref(), Some("string"));

        assert_eq!(parameters[1].location, "query");
        assert!(!parameters[1].required);
        assert_eq!(parameters[1].param_type.as_deref(), Some("integer"));

        assert_eq!(parameters[2].location, "body");
        assert_eq!(
            parameters[2].schema,
            Some(json!({"$ref": "#/definitions/OrderDto"}))
        );
    }

    #[test]
    fn test_parameter_with_constraint_token_counts_as_path() {
        let mut m = method("Fetch");
        m.parameters = vec![ParameterDescriptor {
            name: "id".to_string(),
            type_name: "int".to_string(),
            has_default: false,
            attributes: AttributeBag::default(),
        }];
        let mut d = draft("/Order/Fetch/{id:int}");

        run_processor(&ParameterProcessor, &controller("OrderController"), &m, &mut d).unwrap();

        assert_eq!(d.operation.parameters[0].location, "path");
    }

    #[test]
    fn test_required_marker_makes_query_parameter_required() {
        let mut m = method("Search");
        m.parameters = vec![ParameterDescriptor {
            name: "term".to_string(),
            type_name: "string".to_string(),
            has_default: false,
            attributes: AttributeBag(vec![AttributeDescriptor {
                type_name: "RequiredAttribute".to_string(),
                implements: vec![],
                properties: Default::default(),
            }]),
        }];
        let mut d = draft("/Order/Search");

        run_processor(&ParameterProcessor, &controller("OrderController"), &m, &mut d).unwrap();

        assert!(d.operation.parameters[0].required);
    }

    #[test]
    fn test_two_body_parameters_are_fatal() {
        let mut m = method("Merge");
        m.parameters = vec![
            ParameterDescriptor {
                name: "left".to_string(),
                type_name: "OrderDto".to_string(),
                has_default: false,
                attributes: AttributeBag::default(),
            },
            ParameterDescriptor {
                name: "right".to_string(),
                type_name: "OrderDto".to_string(),
                has_default: false,
                attributes: AttributeBag::default(),
            },
        ];
        let mut d = draft("/Order/Merge");

        let err =
            run_processor(&ParameterProcessor, &controller("OrderController"), &m, &mut d)
                .unwrap_err();
        assert!(err.to_string().contains("more than one body parameter"));
    }

    #[test]
    fn test_response_processor_with_return_type() {
        let mut m = method("GetOrderDetail");
        m.return_type = Some("OrderDto".to_string());
        let mut d = draft("/Order/GetOrderDetail");

        run_processor(&ResponseProcessor, &controller("OrderController"), &m, &mut d).unwrap();

        let response = &d.operation.responses["200"];
        assert_eq!(
            response.schema,
            Some(json!({"$ref": "#/definitions/OrderDto"}))
        );
    }

    #[test]
    fn test_response_processor_void_return() {
        let mut m = method("Ping");
        m.return_type = Some("void".to_string());
        let mut d = draft("/Order/Ping");

        run_processor(&ResponseProcessor, &controller("OrderController"), &m, &mut d).unwrap();

        assert!(d.operation.responses["200"].schema.is_none());
    }

    #[test]
    fn test_registry_unknown_key_is_fatal() {
        let registry = ProcessorRegistry::new();
        let err = registry.instantiate("NoSuchProcessor").unwrap_err();
        assert!(err.to_string().contains("NoSuchProcessor"));
    }

    #[test]
    fn test_registry_instantiates_registered_factory() {
        let mut registry = ProcessorRegistry::new();
        registry.register("Tags", || Box::new(TagsProcessor));
        assert!(registry.instantiate("Tags").is_ok());
    }

    #[test]
    fn test_document_tags_processor_skips_ignored_types() {
        let settings = GeneratorSettings::default();
        let mut document =
            SwaggerDocument::new("Test".to_string(), None, "1.0.0".to_string());

        let visible = controller("OrderController");
        let mut hidden = controller("SecretController");
        hidden.attributes = AttributeBag(vec![AttributeDescriptor {
            type_name: "SwaggerIgnoreAttribute".to_string(),
            implements: vec![],
            properties: Default::default(),
        }]);
        let types: Vec<&TypeDescriptor> = vec![&visible, &hidden];

        let mut context = DocumentContext {
            document: &mut document,
            types: &types,
            settings: &settings,
        };
        DocumentTagsProcessor.process(&mut context).unwrap();

        let names: Vec<&str> = document.tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Order"]);
    }
}
