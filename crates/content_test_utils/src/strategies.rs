//! Property-based testing strategies.
//!
//! Generators for id-shaped names and for the id sequences and graphs the
//! digest and cycle properties are stated over.

use proptest::collection::{btree_set, vec};
use proptest::prelude::*;

/// A single valid id segment.
pub fn local_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,11}"
}

/// Between `1` and `max` distinct local names, in arbitrary order.
pub fn unique_local_names(max: usize) -> impl Strategy<Value = Vec<String>> {
    btree_set(local_name(), 1..=max.max(1))
        .prop_map(|names| names.into_iter().collect::<Vec<_>>())
        .prop_shuffle()
}

/// At least two distinct names with a second, different ordering of them.
pub fn names_and_reordering(max: usize) -> impl Strategy<Value = (Vec<String>, Vec<String>)> {
    btree_set(local_name(), 2..=max.max(2))
        .prop_map(|names| names.into_iter().collect::<Vec<_>>())
        .prop_flat_map(|names| {
            let original = names.clone();
            (Just(original), Just(names).prop_shuffle())
        })
        .prop_filter("reordering must differ", |(original, reordered)| original != reordered)
}

/// Nodes of a simple cycle (`nodes[i] -> nodes[i + 1]`, last back to
/// first) and a rotation offset to start scanning from.
pub fn cycle_with_entry(max: usize) -> impl Strategy<Value = (Vec<String>, usize)> {
    unique_local_names(max.max(2))
        .prop_filter("a cycle needs two nodes", |nodes| nodes.len() >= 2)
        .prop_flat_map(|nodes| {
            let len = nodes.len();
            (Just(nodes), 0..len)
        })
}

/// Edge list of a random DAG over `n` nodes: only edges from lower to
/// higher index.
pub fn dag_edges(n: usize) -> impl Strategy<Value = Vec<(usize, usize)>> {
    let n = n.max(2);
    vec((0..n - 1, 1..n), 0..n * 2).prop_map(|pairs| {
        pairs
            .into_iter()
            .filter(|(from, to)| from < to)
            .collect::<Vec<_>>()
    })
}
