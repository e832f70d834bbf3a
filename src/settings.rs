//! Generator configuration.
//!
//! All attribute-name conventions and extraction regexes live in one
//! immutable [`GeneratorSettings`] value that is threaded through every
//! resolver call. Nothing here is ambient or global. The struct is
//! serde-deserializable so the CLI can load overrides from a JSON file.

use crate::descriptor::CandidateCriteria;
use serde::{Deserialize, Serialize};

/// Settings for one generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Swagger info title
    pub title: String,
    /// Swagger info description
    pub description: Option<String>,
    /// Swagger info version
    pub version: String,

    /// Attribute name that excludes its host type or method from generation
    pub ignore_attribute: String,
    /// Attribute type name carrying an explicit route `Template`
    pub route_attribute: String,
    /// Marker-interface names also accepted as route attributes
    pub route_marker_interfaces: Vec<String>,
    /// Class-level attribute carrying a route `Prefix`
    pub route_prefix_attribute: String,
    /// Dotted "TypeName.PropertyName" (or bare "TypeName") for verb lookup;
    /// unset means every method defaults to POST
    pub verb_attribute: Option<String>,
    /// Dotted setting for an explicit operation id
    pub operation_id_attribute: String,
    /// Dotted setting for the operation summary
    pub summary_attribute: String,
    /// Attribute name marking an operation deprecated
    pub deprecated_attribute: String,
    /// Attribute name marking a parameter required
    pub required_parameter_attribute: String,
    /// Attribute name declaring an additional operation processor by key
    pub operation_processor_attribute: String,

    /// Regex with a `controller` named group, run against the simple class name
    pub controller_path_regex: Option<String>,
    /// Regex with an `action` named group, run against the method name
    pub action_path_regex: Option<String>,
    /// Regex with a `namespace` named group, run against the namespace
    pub namespace_path_regex: Option<String>,

    /// Candidate filter: required base type full name
    pub base_type: Option<String>,
    /// Candidate filter: required class-name suffix
    pub controller_suffix: Option<String>,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            title: "Web API Swagger specification".to_string(),
            description: None,
            version: "1.0.0".to_string(),
            ignore_attribute: "SwaggerIgnoreAttribute".to_string(),
            route_attribute: "RouteAttribute".to_string(),
            route_marker_interfaces: vec![
                "IHttpRouteInfoProvider".to_string(),
                "IRouteTemplateProvider".to_string(),
            ],
            route_prefix_attribute: "RoutePrefixAttribute".to_string(),
            verb_attribute: Some("ActionVerbAttribute.Verb".to_string()),
            operation_id_attribute: "SwaggerOperationAttribute.OperationId".to_string(),
            summary_attribute: "DescriptionAttribute.Description".to_string(),
            deprecated_attribute: "ObsoleteAttribute".to_string(),
            required_parameter_attribute: "RequiredAttribute".to_string(),
            operation_processor_attribute: "SwaggerOperationProcessorAttribute".to_string(),
            controller_path_regex: Some(r"(?P<controller>[^\s]+)Controller$".to_string()),
            action_path_regex: Some(r"(?P<action>[^\s]+)$".to_string()),
            namespace_path_regex: None,
            base_type: None,
            controller_suffix: Some("Controller".to_string()),
        }
    }
}

impl GeneratorSettings {
    /// The candidate filters as criteria for the descriptor source.
    pub fn candidate_criteria(&self) -> CandidateCriteria {
        CandidateCriteria {
            base_type: self.base_type.clone(),
            name_suffix: self.controller_suffix.clone(),
        }
    }

    /// All attribute names accepted as explicit route attributes.
    pub fn route_attribute_names(&self) -> Vec<&str> {
        let mut names = vec![self.route_attribute.as_str()];
        names.extend(self.route_marker_interfaces.iter().map(String::as_str));
        names
    }
}
