//! Entity graph resolution
//!
//! Computes the transitive closure of required relations starting from a set
//! of seed entities, and synthesizes one [`FixtureNode`] per reached entity.

use crate::binding::Seed;
use featuregen_descriptor::{
    DescriptorError, EntityCatalog, EntityDescriptor, FieldKind, FixtureNode,
};
use featuregen_synth::ValueSynthesizer;
use indexmap::IndexMap;
use petgraph::algo::{is_cyclic_directed, toposort};
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use std::collections::VecDeque;

/// Fixture nodes plus the relation edges between them
///
/// Nodes are kept in discovery order: seeds first, then entities reached
/// through required relations. An edge `a -> b` means `a` references `b`.
#[derive(Debug, Clone, Default)]
pub struct FixtureGraph {
    nodes: Vec<FixtureNode>,
    index: IndexMap<String, usize>,
    edges: DiGraphMap<usize, ()>,
}

impl FixtureGraph {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &[FixtureNode] {
        &self.nodes
    }

    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<&FixtureNode> {
        self.index.get(identifier).map(|&i| &self.nodes[i])
    }

    #[must_use]
    pub fn contains(&self, identifier: &str) -> bool {
        self.index.contains_key(identifier)
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.edge_count()
    }

    /// Entities directly referenced by `identifier`
    #[must_use]
    pub fn dependencies_of(&self, identifier: &str) -> Vec<&FixtureNode> {
        let Some(&from) = self.index.get(identifier) else {
            return Vec::new();
        };
        let mut targets: Vec<usize> = self
            .edges
            .neighbors_directed(from, Direction::Outgoing)
            .collect();
        targets.sort_unstable();
        targets.into_iter().map(|i| &self.nodes[i]).collect()
    }

    /// Relations loop back on themselves somewhere in the graph
    #[must_use]
    pub fn is_cyclic(&self) -> bool {
        is_cyclic_directed(&self.edges)
    }

    /// Nodes ordered so every dependency precedes its dependents
    ///
    /// Returns `None` when the graph is cyclic; discovery order is then the
    /// only meaningful order.
    #[must_use]
    pub fn load_order(&self) -> Option<Vec<&FixtureNode>> {
        let mut order = toposort(&self.edges, None).ok()?;
        order.reverse();
        let mut seen = vec![false; self.nodes.len()];
        let mut ordered: Vec<&FixtureNode> = Vec::with_capacity(self.nodes.len());
        for i in order {
            seen[i] = true;
            ordered.push(&self.nodes[i]);
        }
        // isolated nodes never entered the edge map
        for (i, node) in self.nodes.iter().enumerate() {
            if !seen[i] {
                ordered.push(node);
            }
        }
        Some(ordered)
    }

    /// Fixture file names in discovery order
    #[must_use]
    pub fn file_names(&self) -> Vec<String> {
        self.nodes.iter().map(FixtureNode::file_name).collect()
    }

    #[must_use]
    pub fn into_nodes(self) -> Vec<FixtureNode> {
        self.nodes
    }

    fn reserve(&mut self, identifier: &str) -> Option<usize> {
        if self.index.contains_key(identifier) {
            return None;
        }
        let slot = self.index.len();
        self.index.insert(identifier.to_string(), slot);
        Some(slot)
    }
}

/// Breadth-first resolver over an [`EntityCatalog`]
#[derive(Debug, Clone, Copy)]
pub struct EntityGraphResolver<'a> {
    catalog: &'a EntityCatalog,
    synthesizer: &'a ValueSynthesizer,
}

impl<'a> EntityGraphResolver<'a> {
    #[inline]
    #[must_use]
    pub fn new(catalog: &'a EntityCatalog, synthesizer: &'a ValueSynthesizer) -> Self {
        Self {
            catalog,
            synthesizer,
        }
    }

    /// Resolve the closure of `seeds`
    ///
    /// Each entity appears exactly once, however many paths reach it, and
    /// relation cycles terminate.
    ///
    /// # Errors
    /// - `DescriptorIncomplete` if a required field cannot be classified
    /// - `UnresolvedServiceReference` if a seed or relation target is not in
    ///   the catalog
    pub fn resolve(&self, seeds: &[Seed]) -> Result<FixtureGraph, DescriptorError> {
        let mut graph = FixtureGraph::new();
        let mut queue: VecDeque<(usize, &EntityDescriptor)> = VecDeque::new();

        for seed in seeds {
            let entity = self.catalog.get(&seed.entity_identifier).ok_or_else(|| {
                DescriptorError::unresolved(&seed.param_name, &seed.entity_identifier)
            })?;
            if let Some(slot) = graph.reserve(&entity.identifier) {
                queue.push_back((slot, entity));
            }
        }

        while let Some((slot, entity)) = queue.pop_front() {
            let mut node = FixtureNode::new(&entity.identifier, entity.instance_name());
            graph.edges.add_node(slot);

            for field in entity.required_fields() {
                let kind = field.classify(&entity.identifier)?;

                if let FieldKind::Relation { target, .. } = kind {
                    let target_entity = self
                        .catalog
                        .get(target)
                        .ok_or_else(|| DescriptorError::unresolved(&entity.identifier, target))?;
                    let target_slot = match graph.reserve(&target_entity.identifier) {
                        Some(new_slot) => {
                            queue.push_back((new_slot, target_entity));
                            new_slot
                        }
                        None => graph.index[target.as_str()],
                    };
                    graph.edges.add_edge(slot, target_slot, ());
                }

                node.fields
                    .insert(field.name.clone(), self.synthesizer.synthesize(field));
            }

            tracing::trace!(
                entity = %entity.identifier,
                fields = node.fields.len(),
                "resolved fixture node"
            );
            graph.nodes.push(node);
        }

        warn_on_instance_collisions(&graph);
        Ok(graph)
    }
}

fn warn_on_instance_collisions(graph: &FixtureGraph) {
    let mut owners: IndexMap<&str, &str> = IndexMap::new();
    for node in &graph.nodes {
        if let Some(previous) = owners.insert(&node.instance_name, &node.entity_identifier) {
            tracing::warn!(
                instance = %node.instance_name,
                first = %previous,
                second = %node.entity_identifier,
                "two entities share a fixture instance name"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use featuregen_descriptor::{FieldDescriptor, Literal, Multiplicity, ScalarType};

    const A: &str = "App\\Entity\\A";
    const B: &str = "App\\Entity\\B";
    const C: &str = "App\\Entity\\C";

    fn resolve(catalog: &EntityCatalog, seeds: &[Seed]) -> Result<FixtureGraph, DescriptorError> {
        let synth = ValueSynthesizer::default();
        EntityGraphResolver::new(catalog, &synth).resolve(seeds)
    }

    #[test]
    fn mutual_relations_terminate() {
        let catalog: EntityCatalog = vec![
            EntityDescriptor::new(A)
                .with_field(FieldDescriptor::relation("b", B, Multiplicity::One)),
            EntityDescriptor::new(B)
                .with_field(FieldDescriptor::relation("a", A, Multiplicity::One)),
        ]
        .into_iter()
        .collect();

        let graph = resolve(&catalog, &[Seed::new("a", A)]).unwrap();
        assert_eq!(graph.len(), 2);
        assert!(graph.is_cyclic());
        assert!(graph.load_order().is_none());
        assert_eq!(graph.nodes()[0].entity_identifier, A);
        assert_eq!(graph.nodes()[1].entity_identifier, B);
    }

    #[test]
    fn diamond_is_deduplicated() {
        let catalog: EntityCatalog = vec![
            EntityDescriptor::new(A)
                .with_field(FieldDescriptor::relation("b", B, Multiplicity::One))
                .with_field(FieldDescriptor::relation("c", C, Multiplicity::One)),
            EntityDescriptor::new(B)
                .with_field(FieldDescriptor::relation("c", C, Multiplicity::One)),
            EntityDescriptor::new(C).with_field(FieldDescriptor::scalar("name", ScalarType::Text)),
        ]
        .into_iter()
        .collect();

        let graph = resolve(&catalog, &[Seed::new("a", A), Seed::new("c", C)]).unwrap();
        let order: Vec<_> = graph.nodes().iter().map(|n| n.instance_name.as_str()).collect();
        assert_eq!(order, vec!["a", "c", "b"]);
        assert_eq!(graph.edge_count(), 3);

        let deps: Vec<_> = graph
            .dependencies_of(A)
            .into_iter()
            .map(|n| n.instance_name.as_str())
            .collect();
        assert_eq!(deps, vec!["c", "b"]);

        let load: Vec<_> = graph
            .load_order()
            .unwrap()
            .into_iter()
            .map(|n| n.instance_name.as_str())
            .collect();
        assert_eq!(load.first(), Some(&"c"));
        assert_eq!(load.last(), Some(&"a"));
    }

    #[test]
    fn optional_relations_are_not_followed() {
        let catalog: EntityCatalog = vec![
            EntityDescriptor::new(A)
                .with_field(FieldDescriptor::relation("b", B, Multiplicity::One).nullable())
                .with_field(FieldDescriptor::scalar("id", ScalarType::Integer)),
            EntityDescriptor::new(B),
        ]
        .into_iter()
        .collect();

        let graph = resolve(&catalog, &[Seed::new("a", A)]).unwrap();
        assert_eq!(graph.len(), 1);
        assert!(graph.nodes()[0].fields.is_empty());
    }

    #[test]
    fn to_many_relation_renders_as_list() {
        let catalog: EntityCatalog = vec![
            EntityDescriptor::new("App\\Entity\\Client")
                .with_field(FieldDescriptor::scalar("name", ScalarType::Text))
                .with_field(FieldDescriptor::relation(
                    "addresses",
                    "App\\Entity\\Address",
                    Multiplicity::Many,
                )),
            EntityDescriptor::new("App\\Entity\\Address")
                .with_field(FieldDescriptor::scalar("street", ScalarType::Text)),
        ]
        .into_iter()
        .collect();

        let graph = resolve(&catalog, &[Seed::new("client", "App\\Entity\\Client")]).unwrap();
        assert_eq!(graph.file_names(), vec!["client.yaml", "address.yaml"]);
        let client = graph.get("App\\Entity\\Client").unwrap();
        assert_eq!(
            client.fields["addresses"],
            Literal::ReferenceList(vec!["address".into()])
        );
        assert_eq!(client.fields["addresses"].to_string(), r#"["@address"]"#);
    }

    #[test]
    fn unclassified_required_field_fails() {
        let catalog: EntityCatalog =
            vec![EntityDescriptor::new(A).with_field(FieldDescriptor::unclassified("mystery"))]
                .into_iter()
                .collect();
        let err = resolve(&catalog, &[Seed::new("a", A)]).unwrap_err();
        assert_eq!(err.kind(), "descriptor_incomplete");
    }

    #[test]
    fn missing_relation_target_fails() {
        let catalog: EntityCatalog = vec![EntityDescriptor::new(A)
            .with_field(FieldDescriptor::relation("ghost", "App\\Entity\\Ghost", Multiplicity::One))]
        .into_iter()
        .collect();
        let err = resolve(&catalog, &[Seed::new("a", A)]).unwrap_err();
        assert_eq!(err.kind(), "unresolved_service_reference");
    }

    #[test]
    fn no_seeds_no_nodes() {
        let graph = resolve(&EntityCatalog::new(), &[]).unwrap();
        assert!(graph.is_empty());
        assert_eq!(graph.load_order().unwrap().len(), 0);
    }
}
