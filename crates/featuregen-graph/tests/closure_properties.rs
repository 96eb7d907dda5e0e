use featuregen_descriptor::{EntityCatalog, EntityDescriptor, FieldDescriptor, Multiplicity};
use featuregen_graph::{EntityGraphResolver, Seed};
use featuregen_test_utils::fixed_synthesizer;
use proptest::prelude::*;
use std::collections::HashSet;

fn name(i: usize) -> String {
    format!("App\\Entity\\E{i}")
}

/// Catalog of `count` entities with arbitrary required relations between them
fn catalog(count: usize, edges: &[(usize, usize)]) -> EntityCatalog {
    (0..count)
        .map(|i| {
            edges
                .iter()
                .filter(|(from, to)| *from == i && *to < count)
                .enumerate()
                .fold(EntityDescriptor::new(name(i)), |entity, (n, (_, to))| {
                    entity.with_field(FieldDescriptor::relation(
                        format!("rel{n}"),
                        name(*to),
                        Multiplicity::One,
                    ))
                })
        })
        .collect()
}

fn reachable(count: usize, edges: &[(usize, usize)], start: usize) -> HashSet<usize> {
    let mut seen = HashSet::from([start]);
    let mut stack = vec![start];
    while let Some(n) = stack.pop() {
        for (_, to) in edges.iter().filter(|(from, to)| *from == n && *to < count) {
            if seen.insert(*to) {
                stack.push(*to);
            }
        }
    }
    seen
}

proptest! {
    #[test]
    fn prop_closure_terminates_with_unique_nodes(
        count in 1..15usize,
        edges in proptest::collection::vec((0..15usize, 0..15usize), 0..40)
    ) {
        let catalog = catalog(count, &edges);
        let synthesizer = fixed_synthesizer();
        let graph = EntityGraphResolver::new(&catalog, &synthesizer)
            .resolve(&[Seed::new("e", name(0))])
            .unwrap();

        let identifiers: HashSet<_> = graph.nodes().iter().map(|n| n.entity_identifier.clone()).collect();
        prop_assert_eq!(identifiers.len(), graph.len());
        prop_assert_eq!(graph.len(), reachable(count, &edges, 0).len());
        prop_assert_eq!(&graph.nodes()[0].entity_identifier, &name(0));
    }

    #[test]
    fn prop_every_reference_has_a_node(
        count in 1..10usize,
        edges in proptest::collection::vec((0..10usize, 0..10usize), 0..25)
    ) {
        let catalog = catalog(count, &edges);
        let synthesizer = fixed_synthesizer();
        let graph = EntityGraphResolver::new(&catalog, &synthesizer)
            .resolve(&[Seed::new("e", name(0))])
            .unwrap();

        let instances: HashSet<_> = graph.nodes().iter().map(|n| n.instance_name.as_str()).collect();
        for node in graph.nodes() {
            for reference in node.references() {
                prop_assert!(instances.contains(reference));
            }
        }
    }
}

#[test]
fn self_reference_resolves_once() {
    let catalog = catalog(1, &[(0, 0)]);
    let synthesizer = fixed_synthesizer();
    let graph = EntityGraphResolver::new(&catalog, &synthesizer)
        .resolve(&[Seed::new("e", name(0))])
        .unwrap();
    assert_eq!(graph.len(), 1);
    assert!(graph.is_cyclic());
}
