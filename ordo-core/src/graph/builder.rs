//! Graph construction from raw pins and dependencies.

use std::hash::Hash;

use tracing::debug;

use super::node::ConstraintGraph;
use crate::model::{Dependency, Pin};

/// Build the constraint graph for one pass.
///
/// Every dependency becomes an edge `from -> to`, and every unit mentioned by
/// a pin or a dependency becomes a node, even when it has no edges.
/// Duplicate edges are kept; propagation only ever takes the most extreme
/// candidate, so they are harmless.
pub fn build<U>(pins: &[Pin<U>], dependencies: &[Dependency<U>]) -> ConstraintGraph<U>
where
    U: Clone + Hash + Eq,
{
    let mut graph = ConstraintGraph::new();

    for dependency in dependencies {
        let from = graph.ensure_node(dependency.from.clone());
        let to = graph.ensure_node(dependency.to.clone());
        graph.add_edge(from, to, dependency.delta);
    }

    for pin in pins {
        graph.ensure_node(pin.unit.clone());
    }

    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built constraint graph"
    );

    graph
}
