//! Schema registration.
//!
//! Converting data types into JSON-Schema node graphs is a collaborator
//! concern: the engine only asks a [`SchemaRegistrar`] for a node per type
//! name and later merges everything it registered into the document's
//! definitions. The shipped [`BasicSchemaRegistrar`] maps well-known
//! primitive names to inline schemas and everything else to a `$ref` plus a
//! registered object stub.

use crate::swagger::SchemaNode;
use log::debug;
use serde_json::json;

/// Produces schema nodes for type names and records every named schema it
/// hands out, so the assembler can merge them into the definitions map.
pub trait SchemaRegistrar {
    /// Returns a schema node for the given declared type name.
    fn schema_for(&mut self, type_name: &str) -> SchemaNode;

    /// All named schemas registered during the run, in registration order.
    fn registered_schemas(&self) -> &[(String, SchemaNode)];
}

/// Whether a declared type name maps to an inline (non-body) schema.
pub fn is_primitive_type(type_name: &str) -> bool {
    primitive_schema(type_name).is_some()
}

/// Swagger inline type keyword for a primitive, used for query/path params.
pub fn primitive_type_keyword(type_name: &str) -> Option<&'static str> {
    primitive_schema(type_name).map(|(keyword, _)| keyword)
}

fn primitive_schema(type_name: &str) -> Option<(&'static str, Option<&'static str>)> {
    match type_name {
        "string" | "String" | "char" | "Uri" => Some(("string", None)),
        "Guid" => Some(("string", Some("guid"))),
        "DateTime" | "DateTimeOffset" => Some(("string", Some("date-time"))),
        "int" | "i32" | "u32" | "short" | "i16" | "u16" | "byte" | "u8" | "sbyte" | "i8" => {
            Some(("integer", Some("int32")))
        }
        "long" | "i64" | "u64" => Some(("integer", Some("int64"))),
        "float" | "f32" => Some(("number", Some("float"))),
        "double" | "f64" | "decimal" => Some(("number", Some("double"))),
        "bool" | "boolean" => Some(("boolean", None)),
        _ => None,
    }
}

/// Strips one collection wrapper, returning the element type name.
fn collection_element(type_name: &str) -> Option<&str> {
    if let Some(element) = type_name.strip_suffix("[]") {
        return Some(element);
    }
    for wrapper in ["IList", "List", "IEnumerable", "ICollection", "Vec"] {
        if let Some(rest) = type_name.strip_prefix(wrapper) {
            if let Some(inner) = rest.strip_prefix('<').and_then(|r| r.strip_suffix('>')) {
                return Some(inner);
            }
        }
    }
    None
}

/// Default registrar: primitives inline, collections as arrays, anything
/// else as a `$ref` with a registered object stub named after the type.
#[derive(Debug, Default)]
pub struct BasicSchemaRegistrar {
    schemas: Vec<(String, SchemaNode)>,
}

impl BasicSchemaRegistrar {
    pub fn new() -> Self {
        Self::default()
    }

    fn node_for(&mut self, type_name: &str) -> SchemaNode {
        if let Some((keyword, format)) = primitive_schema(type_name) {
            let mut node = json!({ "type": keyword });
            if let Some(format) = format {
                node["format"] = json!(format);
            }
            return node;
        }

        if let Some(element) = collection_element(type_name) {
            let items = self.node_for(element.trim());
            return json!({ "type": "array", "items": items });
        }

        // Complex type: register a stub definition once and reference it.
        // A richer registrar would walk the type's own descriptor here.
        let name = type_name.trim().to_string();
        if !self.schemas.iter().any(|(n, _)| *n == name) {
            debug!("Registering schema definition: {}", name);
            self.schemas
                .push((name.clone(), json!({ "type": "object" })));
        }
        json!({ "$ref": format!("#/definitions/{}", name) })
    }
}

impl SchemaRegistrar for BasicSchemaRegistrar {
    fn schema_for(&mut self, type_name: &str) -> SchemaNode {
        self.node_for(type_name)
    }

    fn registered_schemas(&self) -> &[(String, SchemaNode)] {
        &self.schemas
    }
}
