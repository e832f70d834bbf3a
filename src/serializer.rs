//! Serialization of the Swagger document to JSON or YAML text.

use crate::swagger::SwaggerDocument;
use anyhow::{Context, Result};
use log::debug;

/// Serializes a Swagger document to pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_json(doc: &SwaggerDocument) -> Result<String> {
    debug!("Serializing Swagger document to JSON");
    serde_json::to_string_pretty(doc).context("Failed to serialize Swagger document to JSON")
}

/// Serializes a Swagger document to YAML.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_yaml(doc: &SwaggerDocument) -> Result<String> {
    debug!("Serializing Swagger document to YAML");
    serde_yaml::to_string(doc).context("Failed to serialize Swagger document to YAML")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swagger::{Operation, OperationDescription, Verb};

    fn create_test_document() -> SwaggerDocument {
        let mut document = SwaggerDocument::new(
            "Test API".to_string(),
            Some("A test API".to_string()),
            "1.0.0".to_string(),
        );
        document
            .insert(OperationDescription {
                path: "/Order/List".to_string(),
                verb: Verb::Get,
                operation: Operation {
                    operation_id: Some("Order_List".to_string()),
                    ..Default::default()
                },
            })
            .unwrap();
        document
    }

    #[test]
    fn test_serialize_json() {
        let doc = create_test_document();
        let json = serialize_json(&doc).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["swagger"], "2.0");
        assert_eq!(parsed["info"]["title"], "Test API");
        assert_eq!(parsed["consumes"][0], "application/json");
        assert_eq!(parsed["produces"][0], "application/json");
        assert_eq!(
            parsed["paths"]["/Order/List"]["get"]["operationId"],
            "Order_List"
        );
    }

    #[test]
    fn test_serialize_json_is_pretty_printed() {
        let doc = create_test_document();
        let json = serialize_json(&doc).unwrap();

        assert!(json.contains('\n'));
        assert!(json.contains("  "));
    }

    #[test]
    fn test_serialize_yaml() {
        let doc = create_test_document();
        let yaml = serialize_yaml(&doc).unwrap();

        assert!(yaml.contains("swagger: '2.0'"));
        assert!(yaml.contains("title: Test API"));
        assert!(yaml.contains("/Order/List:"));
        assert!(yaml.contains("get:"));
    }

    #[test]
    fn test_roundtrip_json_serialization() {
        let doc = create_test_document();
        let json = serialize_json(&doc).unwrap();

        let deserialized: SwaggerDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.swagger, doc.swagger);
        assert_eq!(deserialized.info.title, doc.info.title);
        assert_eq!(deserialized.paths.len(), doc.paths.len());
    }
}
