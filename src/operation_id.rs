//! Operation-id allocation.
//!
//! Ids are allocated at document-insertion time and only consult operations
//! already frozen into the document. Sibling drafts that have not been
//! inserted yet are invisible, so collisions resolve in strict insertion
//! order. This makes the `_2`/`_3` suffixes deterministic for a fixed input
//! order.

use crate::descriptor::MethodDescriptor;
use crate::settings::GeneratorSettings;
use crate::swagger::SwaggerDocument;

/// Computes the id candidate for a method before suffix disambiguation.
///
/// An explicit, non-empty value from the configured operation-id attribute
/// wins; otherwise the id is `{Controller}_{Method}` with a trailing
/// "Controller" stripped from the type name and a trailing "Async" stripped
/// from the method name.
pub fn candidate_id(
    settings: &GeneratorSettings,
    controller_name: &str,
    method: &MethodDescriptor,
) -> String {
    if let Some(value) = method.attributes.lookup(&settings.operation_id_attribute) {
        if let Some(explicit) = value.as_str() {
            if !explicit.is_empty() {
                return explicit.to_string();
            }
        }
    }

    let controller = controller_name
        .strip_suffix("Controller")
        .unwrap_or(controller_name);
    let method_name = method.name.strip_suffix("Async").unwrap_or(&method.name);

    format!("{}_{}", controller, method_name)
}

/// Makes a candidate id unique against the ids already frozen into the
/// document, appending `_2`, `_3`, ... as needed.
pub fn allocate(document: &SwaggerDocument, candidate: &str) -> String {
    if !document.contains_operation_id(candidate) {
        return candidate.to_string();
    }

    let mut number = 2;
    loop {
        let suffixed = format!("{}_{}", candidate, number);
        if !document.contains_operation_id(&suffixed) {
            return suffixed;
        }
        number += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{AttributeBag, AttributeDescriptor};
    use crate::swagger::{Operation, OperationDescription, Verb};
    use serde_json::json;
    use std::collections::HashMap;

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

    fn document_with_ids(ids: &[&str]) -> SwaggerDocument {
        let mut document =
            SwaggerDocument::new("Test".to_string(), None, "1.0.0".to_string());
        for (i, id) in ids.iter().enumerate() {
            document
                .insert(OperationDescription {
                    path: format!("/p{}", i),
                    verb: Verb::Get,
                    operation: Operation {
                        operation_id: Some(id.to_string()),
                        ..Default::default()
                    },
                })
                .unwrap();
        }
        document
    }

    #[test]
    fn test_candidate_strips_controller_and_async_suffixes() {
        let settings = GeneratorSettings::default();
        let id = candidate_id(&settings, "OrderController", &method("GetOrderDetailAsync"));

        assert_eq!(id, "Order_GetOrderDetail");
    }

    #[test]
    fn test_candidate_without_suffixes() {
        let settings = GeneratorSettings::default();
        let id = candidate_id(&settings, "UserCtl", &method("RemoveUser"));

        assert_eq!(id, "UserCtl_RemoveUser");
    }

    #[test]
    fn test_explicit_attribute_value_wins() {
        let settings = GeneratorSettings::default();
        let mut m = method("GetOrderDetail");
        m.attributes = AttributeBag(vec![AttributeDescriptor {
            type_name: "SwaggerOperationAttribute".to_string(),
            implements: vec![],
            properties: HashMap::from([("OperationId".to_string(), json!("FetchOrder"))]),
        }]);

        assert_eq!(candidate_id(&settings, "OrderController", &m), "FetchOrder");
    }

    #[test]
    fn test_empty_explicit_value_falls_back() {
        let settings = GeneratorSettings::default();
        let mut m = method("GetOrderDetail");
        m.attributes = AttributeBag(vec![AttributeDescriptor {
            type_name: "SwaggerOperationAttribute".to_string(),
            implements: vec![],
            properties: HashMap::from([("OperationId".to_string(), json!(""))]),
        }]);

        assert_eq!(
            candidate_id(&settings, "OrderController", &m),
            "Order_GetOrderDetail"
        );
    }

    #[test]
    fn test_allocate_without_collision() {
        let document = document_with_ids(&[]);
        assert_eq!(allocate(&document, "Order_Get"), "Order_Get");
    }

    #[test]
    fn test_allocate_appends_increasing_suffixes() {
        let document = document_with_ids(&["Order_Get", "Order_Get_2"]);
        assert_eq!(allocate(&document, "Order_Get"), "Order_Get_3");
    }

    #[test]
    fn test_allocation_checks_only_frozen_operations() {
        // The document holds one frozen "Order_Get"; a second allocation for
        // the same candidate sees exactly that and takes "_2".
        let document = document_with_ids(&["Order_Get"]);
        assert_eq!(allocate(&document, "Order_Get"), "Order_Get_2");
    }
}
