//! Featuregen Graph
//!
//! Works out which fixture records a group of operations needs.
//!
//! # Core Concepts
//!
//! - [`Seed`]: An entity an operation needs directly (path argument or body relation)
//! - [`EntityGraphResolver`]: Breadth-first closure over required relations
//! - [`FixtureGraph`]: Resolved fixture nodes plus the relation edges between them
//!
//! # Example
//!
//! ```rust,ignore
//! use featuregen_graph::{collect_seeds, EntityGraphResolver};
//!
//! let seeds = collect_seeds(&operations, &catalog)?;
//! let graph = EntityGraphResolver::new(&catalog, &synthesizer).resolve(&seeds)?;
//! for node in graph.nodes() {
//!     println!("{}", node.file_name());
//! }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod binding;
mod resolver;

pub use binding::{bind_operation, collect_seeds, Seed};
pub use resolver::{EntityGraphResolver, FixtureGraph};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use featuregen_descriptor::{
        ArgumentDescriptor, EntityCatalog, EntityDescriptor, FieldDescriptor, HttpMethod,
        Multiplicity, OperationDescriptor, ScalarType,
    };
    use featuregen_synth::ValueSynthesizer;

    #[test]
    fn operations_to_fixture_files() {
        let catalog: EntityCatalog = vec![
            EntityDescriptor::new("App\\Entity\\Order")
                .with_field(FieldDescriptor::scalar("reference", ScalarType::Text))
                .with_field(FieldDescriptor::relation(
                    "customer",
                    "App\\Entity\\Customer",
                    Multiplicity::One,
                )),
            EntityDescriptor::new("App\\Entity\\Customer")
                .with_field(FieldDescriptor::scalar("name", ScalarType::Text)),
        ]
        .into_iter()
        .collect();

        let show = OperationDescriptor::new("show", "Shop", HttpMethod::Get, "/orders/{order}")
            .with_argument(ArgumentDescriptor::entity("order", "App\\Entity\\Order"));
        let delete = OperationDescriptor::new("delete", "Shop", HttpMethod::Delete, "/orders/{order}")
            .with_argument(ArgumentDescriptor::entity("order", "App\\Entity\\Order"));

        let seeds = collect_seeds([&show, &delete], &catalog).unwrap();
        assert_eq!(seeds.len(), 1);

        let synthesizer = ValueSynthesizer::default();
        let graph = EntityGraphResolver::new(&catalog, &synthesizer)
            .resolve(&seeds)
            .unwrap();
        assert_eq!(graph.file_names(), vec!["order.yaml", "customer.yaml"]);
        assert!(!graph.is_cyclic());
    }
}
