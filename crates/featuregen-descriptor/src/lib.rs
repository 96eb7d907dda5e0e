//! Featuregen Descriptors
//!
//! Read-only structural facts about a web application, as supplied by an
//! external metadata provider, plus the records the pipeline derives from them.
//!
//! # Core Concepts
//!
//! - [`FieldDescriptor`]: One field of an entity or a request body
//! - [`EntityDescriptor`]: A persisted entity and its ordered fields
//! - [`OperationDescriptor`]: One HTTP method + route path pairing
//! - [`FixtureNode`]: A synthesized fixture record for one entity
//! - [`ScenarioRecord`]: A planned request with its expected status
//! - [`DescriptorError`]: Descriptor-quality failures, scoped to one group
//!
//! # Example
//!
//! ```rust,ignore
//! use featuregen_descriptor::{EntityDescriptor, FieldDescriptor, ScalarType};
//!
//! let client = EntityDescriptor::new("App\\Entity\\Client")
//!     .with_field(FieldDescriptor::scalar("name", ScalarType::Text));
//!
//! assert_eq!(client.instance_name(), "client");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod entity;
mod error;
mod field;
mod literal;
mod operation;

pub use entity::{instance_name, simple_name, EntityCatalog, EntityDescriptor};
pub use error::{DescriptorError, DescriptorResult};
pub use field::{
    Constraint, FieldDescriptor, FieldKind, Multiplicity, ScalarType, BOOKKEEPING_FIELDS,
};
pub use literal::{FixtureNode, Literal, ScenarioRecord};
pub use operation::{
    ArgumentDescriptor, ArgumentType, HttpMethod, OperationDescriptor, ParseMethodError,
    PathParam, NATIVE_TYPES,
};
pub use operation::{placeholders, substitute_placeholders};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn manifest_shaped_json_deserializes() {
        let json = r#"{
            "identifier": "App\\Entity\\Client",
            "fields": [
                { "name": "id", "kind": { "type": "scalar", "scalar": "integer" } },
                { "name": "name", "kind": { "type": "scalar", "scalar": "string" } },
                { "name": "address", "kind": { "type": "relation", "target": "App\\Entity\\Address", "multiplicity": "many" } },
                { "name": "email", "kind": { "type": "constrained", "scalar": "text", "constraints": [ { "kind": "email" } ] } },
                { "name": "nickname", "kind": { "type": "scalar", "scalar": "text" }, "nullable": true }
            ]
        }"#;

        let entity: EntityDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(entity.simple_name(), "Client");

        let required: Vec<_> = entity.required_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(required, vec!["name", "address", "email"]);
    }

    #[test]
    fn operation_json_deserializes_with_defaults() {
        let json = r#"{
            "identifier": "createClient",
            "group": "App\\Controller\\ClientController",
            "http_method": "post",
            "path_template": "/clients"
        }"#;

        let op: OperationDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(op.http_method, HttpMethod::Post);
        assert!(op.path_params.is_empty());
        assert!(op.body_fields.is_none());
        assert!(op.expected_status_override.is_none());
    }
}
