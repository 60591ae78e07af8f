//! Cycle Detection
//!
//! Depth-first walk from every node, tracking which nodes are finished and
//! which are on the current path. Reaching a node that is still on the path
//! closes a cycle.
//!
//! The walk keeps its own stack instead of recursing, so long dependency
//! chains cannot overflow the thread stack.

use std::hash::Hash;

use super::node::{ConstraintGraph, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    OnPath,
    Done,
}

/// Check whether any node can reach itself.
pub fn is_cyclic<U: Hash + Eq>(graph: &ConstraintGraph<U>) -> bool {
    find_cycle(graph).is_some()
}

/// Find one directed cycle, returned in path order.
///
/// Every node is tried as a traversal root, so cycles in components that are
/// disconnected from the first node are found too. A self-loop is reported
/// as a single-node cycle.
pub fn find_cycle<U: Hash + Eq>(graph: &ConstraintGraph<U>) -> Option<Vec<NodeId>> {
    let mut state = vec![VisitState::Unvisited; graph.node_count()];
    // (node, index of the next out-edge to look at)
    let mut stack: Vec<(NodeId, usize)> = Vec::new();

    for root in graph.node_ids() {
        if state[root.index()] != VisitState::Unvisited {
            continue;
        }

        state[root.index()] = VisitState::OnPath;
        stack.push((root, 0));

        while let Some((node, next)) = stack.last_mut() {
            let edges = graph.edges(*node);
            let Some(edge) = edges.get(*next) else {
                state[node.index()] = VisitState::Done;
                stack.pop();
                continue;
            };
            *next += 1;

            let target = edge.target;
            match state[target.index()] {
                VisitState::Unvisited => {
                    state[target.index()] = VisitState::OnPath;
                    stack.push((target, 0));
                }
                VisitState::OnPath => {
                    let start = stack
                        .iter()
                        .position(|(id, _)| *id == target)
                        .unwrap_or(0);
                    return Some(stack[start..].iter().map(|(id, _)| *id).collect());
                }
                VisitState::Done => {}
            }
        }
    }

    None
}
