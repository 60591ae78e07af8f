//! Root discovery.

use std::hash::Hash;

use super::node::{ConstraintGraph, NodeId};

/// Count incoming edges per node, indexed by [`NodeId`].
pub fn in_degrees<U: Hash + Eq>(graph: &ConstraintGraph<U>) -> Vec<usize> {
    let mut degrees = vec![0usize; graph.node_count()];
    for node in graph.node_ids() {
        for edge in graph.edges(node) {
            degrees[edge.target.index()] += 1;
        }
    }
    degrees
}

/// Nodes with no incoming edges, in interning order.
///
/// A self-loop counts as an incoming edge, so a node constrained only by
/// itself is not a root.
pub fn roots<U: Hash + Eq>(graph: &ConstraintGraph<U>) -> Vec<NodeId> {
    in_degrees(graph)
        .into_iter()
        .enumerate()
        .filter(|&(_, degree)| degree == 0)
        .map(|(index, _)| NodeId::from(index))
        .collect()
}
