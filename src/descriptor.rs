//! Metadata descriptors for compiled handler types.
//!
//! A descriptor is an inert, read-only snapshot of type/method/attribute
//! metadata, independent of any live reflection mechanism. Snapshots are
//! loaded once (typically from a JSON file produced by an external extraction
//! step) and stay stable for the duration of a generation run.
//!
//! Attribute shapes are only known by configured convention, so attributes
//! are read generically: matched by type name, properties read by name.

use crate::error::{Error, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// One attribute instance on a type, method, or parameter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttributeDescriptor {
    /// Simple type name of the attribute (e.g. "RouteAttribute")
    pub type_name: String,
    /// Interface names the attribute type implements, for marker-interface
    /// matching (e.g. "IRouteTemplateProvider")
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implements: Vec<String>,
    /// Named properties of the attribute instance
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub properties: HashMap<String, Value>,
}

impl AttributeDescriptor {
    /// Whether the attribute's declared shape has the given property at all.
    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Reads a named property.
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Reads a named property as a string, if it is one and non-empty.
    pub fn string_property(&self, name: &str) -> Option<&str> {
        match self.properties.get(name) {
            Some(Value::String(s)) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    /// Whether the attribute matches the given type name or implements an
    /// interface of that name.
    pub fn matches(&self, name: &str) -> bool {
        self.type_name == name || self.implements.iter().any(|i| i == name)
    }
}

/// The attributes attached to one host, in declaration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeBag(pub Vec<AttributeDescriptor>);

impl AttributeBag {
    /// Whether any attribute of the given type name is present.
    pub fn contains(&self, type_name: &str) -> bool {
        self.0.iter().any(|a| a.type_name == type_name)
    }

    /// First attribute with the given type name.
    pub fn first(&self, type_name: &str) -> Option<&AttributeDescriptor> {
        self.0.iter().find(|a| a.type_name == type_name)
    }

    /// All attributes matching any of the given type-or-interface names and
    /// exposing the given non-null property.
    pub fn matching_with_property<'a>(
        &'a self,
        names: &'a [&'a str],
        property: &'a str,
    ) -> impl Iterator<Item = &'a AttributeDescriptor> {
        self.0.iter().filter(move |a| {
            names.iter().any(|n| a.matches(n))
                && !matches!(a.property(property), None | Some(Value::Null))
        })
    }

    /// Dotted "TypeName.PropertyName" lookup on the first matching attribute.
    pub fn lookup(&self, dotted: &str) -> Option<&Value> {
        let (type_name, property) = split_dotted(dotted);
        let attribute = self.first(type_name)?;
        attribute.property(property?)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttributeDescriptor> {
        self.0.iter()
    }
}

/// Splits a configured dotted setting into (type name, optional property).
pub fn split_dotted(setting: &str) -> (&str, Option<&str>) {
    match setting.split_once('.') {
        Some((type_name, property)) => (type_name, Some(property)),
        None => (setting, None),
    }
}

/// One parameter of a handler method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    /// Parameter name
    pub name: String,
    /// Declared type name
    pub type_name: String,
    /// Whether the descriptor reports a default value
    #[serde(default)]
    pub has_default: bool,
    /// Attributes on the parameter
    #[serde(default)]
    pub attributes: AttributeBag,
}

/// One method of a candidate type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodDescriptor {
    /// Method name
    pub name: String,
    /// Visibility; non-public methods never become operations
    #[serde(default = "default_true")]
    pub is_public: bool,
    /// Attributes on the method
    #[serde(default)]
    pub attributes: AttributeBag,
    /// Parameters in declaration order
    #[serde(default)]
    pub parameters: Vec<ParameterDescriptor>,
    /// Full name of the declaring type, when it differs from the candidate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declaring_type_full_name: Option<String>,
    /// Declared return type name, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    /// Doc-comment summary extracted by the descriptor source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Doc-comment remarks extracted by the descriptor source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

fn default_true() -> bool {
    true
}

/// One candidate handler type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Namespace-qualified name
    pub full_name: String,
    /// Namespace, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Unqualified class name
    pub simple_name: String,
    /// Abstract types are never candidates
    #[serde(default)]
    pub is_abstract: bool,
    /// Full names of base types, nearest first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub base_types: Vec<String>,
    /// Attributes on the type
    #[serde(default)]
    pub attributes: AttributeBag,
    /// Methods in declaration order; this order is an observable contract
    /// because it determines operation-id suffixes
    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,
}

/// Inclusion filters for candidate enumeration. Both filters are optional
/// and ANDed together.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateCriteria {
    /// Full name of a required base type
    #[serde(default)]
    pub base_type: Option<String>,
    /// Required suffix of the simple class name
    #[serde(default)]
    pub name_suffix: Option<String>,
}

/// A loaded descriptor snapshot: the Descriptor Source of a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescriptorSet {
    /// All types in the snapshot, in declaration order
    pub types: Vec<TypeDescriptor>,
}

impl DescriptorSet {
    /// Parses a snapshot from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let set: DescriptorSet = serde_json::from_str(json)?;
        debug!("Loaded descriptor snapshot with {} types", set.types.len());
        Ok(set)
    }

    /// Loads a snapshot from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        debug!("Reading descriptor snapshot: {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Enumerates candidate types matching the criteria, preserving
    /// declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnresolvedTypeReference`] when a configured base type
    /// is not present anywhere in the snapshot.
    pub fn list_candidate_types(
        &self,
        criteria: &CandidateCriteria,
    ) -> Result<Vec<&TypeDescriptor>> {
        if let Some(base) = &criteria.base_type {
            let resolvable = self.types.iter().any(|t| {
                t.full_name == *base || t.base_types.iter().any(|b| b == base)
            });
            if !resolvable {
                return Err(Error::UnresolvedTypeReference(base.clone()));
            }
        }

        let candidates = self
            .types
            .iter()
            .filter(|t| !t.is_abstract)
            .filter(|t| match &criteria.base_type {
                Some(base) => t.base_types.iter().any(|b| b == base),
                None => true,
            })
            .filter(|t| match &criteria.name_suffix {
                Some(suffix) => t.simple_name.ends_with(suffix.as_str()),
                None => true,
            })
            .collect();

        Ok(candidates)
    }
}
