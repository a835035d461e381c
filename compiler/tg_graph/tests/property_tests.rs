//! Property-based tests for the graph builder.
//!
//! Random pointer webs are marshaled and checked for:
//! 1. Determinism: marshaling twice yields identical graphs
//! 2. Sharing minimality: each distinct pointer owns exactly one node
//! 3. Ordering: references point backwards, children point forwards

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use proptest::prelude::*;
use tg_graph::{Graph, Marshaler, NodeKind, Substitutions};
use tg_value::{PointerValue, StructValue, Type, TypeRef, Value};

fn cell_type() -> TypeRef {
    Type::named(
        "main",
        "cell",
        Type::structure([("id", Type::int()), ("links", Type::int())]),
    )
}

/// Build `count` cells where cell `i` links to the cells listed in `edges[i]`.
///
/// Returns the root pointer (cell 0) and the cells, so the test can count
/// distinct pointers reachable from the root.
fn pointer_web(count: usize, edges: &[Vec<usize>]) -> (Value, Vec<PointerValue>) {
    let ty = cell_type();
    let cells: Vec<PointerValue> = (0..count).map(|_| PointerValue::alloc(ty.clone())).collect();
    for (i, cell) in cells.iter().enumerate() {
        let links: Vec<Value> = edges[i]
            .iter()
            .map(|&j| cells[j % count].clone().into())
            .collect();
        let node = StructValue::builder(ty.clone())
            .field("id", Value::int(i64::try_from(i).unwrap()))
            .field("links", Value::slice(Type::pointer_to(ty.clone()), links))
            .build();
        assert!(cell.store(node.into()));
    }
    (cells[0].clone().into(), cells)
}

fn reachable(count: usize, edges: &[Vec<usize>]) -> usize {
    let mut seen = vec![false; count];
    let mut stack = vec![0];
    while let Some(i) = stack.pop() {
        if seen[i] {
            continue;
        }
        seen[i] = true;
        stack.extend(edges[i].iter().map(|&j| j % count));
    }
    seen.iter().filter(|&&s| s).count()
}

fn owned_pointers(graph: &Graph) -> usize {
    graph
        .iter()
        .filter(|(_, node)| node.kind == NodeKind::Pointer)
        .count()
}

fn web_strategy() -> impl Strategy<Value = (usize, Vec<Vec<usize>>)> {
    (1usize..8).prop_flat_map(|count| {
        (
            Just(count),
            prop::collection::vec(prop::collection::vec(0..count, 0..4), count),
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        ..ProptestConfig::default()
    })]

    #[test]
    fn prop_marshal_is_deterministic((count, edges) in web_strategy()) {
        let (root, _cells) = pointer_web(count, &edges);
        let mut marshaler = Marshaler::new(Substitutions::new());
        let first = marshaler.marshal(&root).unwrap();
        let second = marshaler.marshal(&root).unwrap();
        prop_assert_eq!(first.dump(), second.dump());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_each_pointer_owns_one_node((count, edges) in web_strategy()) {
        let (root, _cells) = pointer_web(count, &edges);
        let graph = Marshaler::new(Substitutions::new()).marshal(&root).unwrap();
        prop_assert_eq!(owned_pointers(&graph), reachable(count, &edges));
    }

    #[test]
    fn prop_edges_respect_ordinals((count, edges) in web_strategy()) {
        let (root, _cells) = pointer_web(count, &edges);
        let graph = Marshaler::new(Substitutions::new()).marshal(&root).unwrap();
        for (id, node) in graph.iter() {
            for &child in &node.children {
                prop_assert!(child > id);
            }
            if let NodeKind::Reference(target) = node.kind {
                prop_assert!(target < id);
            }
        }
    }
}
