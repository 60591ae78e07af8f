//! Value Propagation
//!
//! Seeds known values and relaxes edges outward until nothing changes.
//!
//! # Algorithm
//!
//! 1. Seed every pinned node with its pin, then every unpinned root with its
//!    currently stored order.
//! 2. Put all seeded nodes on a FIFO worklist.
//! 3. Pop a node and, for each out-edge, compute `value + weight`:
//!    - an unset target takes the candidate,
//!    - a set target takes it only if it is strictly more extreme in the
//!      edge's direction (greater for `weight >= 0`, smaller for `weight < 0`),
//!    - a pinned target never changes.
//! 4. Every node that changed goes back on the worklist.
//!
//! On an acyclic graph each update is caused by a distinct path from a seed,
//! so the loop always terminates.

use std::collections::VecDeque;
use std::hash::Hash;

use tracing::{debug, trace};

use crate::graph::{roots, ConstraintGraph, NodeId};
use crate::model::Pin;

/// Initial values for one pass, indexed by [`NodeId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seeds {
    values: Vec<Option<i64>>,
    pinned: Vec<bool>,
}

impl Seeds {
    /// Create an empty seed table for `node_count` nodes.
    pub fn new(node_count: usize) -> Self {
        Self {
            values: vec![None; node_count],
            pinned: vec![false; node_count],
        }
    }

    /// Fix `node` at `order`. A later pin on the same node replaces it.
    pub fn pin(&mut self, node: NodeId, order: i64) {
        self.values[node.index()] = Some(order);
        self.pinned[node.index()] = true;
    }

    /// Seed `node` with a starting value unless it is already seeded.
    pub fn start(&mut self, node: NodeId, order: i64) {
        let slot = &mut self.values[node.index()];
        if slot.is_none() {
            *slot = Some(order);
        }
    }

    /// Get the seed of `node`, if any.
    pub fn get(&self, node: NodeId) -> Option<i64> {
        self.values.get(node.index()).copied().flatten()
    }

    /// Check if `node` is pinned.
    pub fn is_pinned(&self, node: NodeId) -> bool {
        self.pinned.get(node.index()).copied().unwrap_or(false)
    }

    /// Number of seeded nodes.
    pub fn len(&self) -> usize {
        self.values.iter().filter(|value| value.is_some()).count()
    }

    /// Check whether no node is seeded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Build the seed table: pins first, then unpinned roots.
///
/// `current_order` is asked only for roots that carry no pin.
pub fn seed<U, F>(graph: &ConstraintGraph<U>, pins: &[Pin<U>], mut current_order: F) -> Seeds
where
    U: Hash + Eq,
    F: FnMut(&U) -> i64,
{
    let mut seeds = Seeds::new(graph.node_count());

    for pin in pins {
        if let Some(node) = graph.node_id(&pin.unit) {
            seeds.pin(node, pin.order);
        }
    }

    let root_nodes = roots(graph);
    for &root in &root_nodes {
        if seeds.get(root).is_some() {
            continue;
        }
        if let Some(unit) = graph.unit(root) {
            seeds.start(root, current_order(unit));
        }
    }

    debug!(roots = root_nodes.len(), seeds = seeds.len(), "seeded constraint graph");

    seeds
}

/// Result of relaxing a seeded graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Propagation {
    /// Final value per node; `None` for nodes no seed reached.
    pub values: Vec<Option<i64>>,
    /// Number of accepted updates after seeding.
    pub updates: usize,
}

impl Propagation {
    /// Get the final value of `node`.
    pub fn get(&self, node: NodeId) -> Option<i64> {
        self.values.get(node.index()).copied().flatten()
    }
}

/// Relax all edges from the seeds to a fixed point.
///
/// The graph must be acyclic; check it with
/// [`find_cycle`](crate::graph::find_cycle) first.
pub fn propagate<U: Hash + Eq>(graph: &ConstraintGraph<U>, seeds: Seeds) -> Propagation {
    let Seeds { mut values, pinned } = seeds;
    let mut queued = vec![false; values.len()];
    let mut worklist = VecDeque::new();

    for node in graph.node_ids() {
        if values[node.index()].is_some() {
            queued[node.index()] = true;
            worklist.push_back(node);
        }
    }

    let mut updates = 0usize;
    while let Some(node) = worklist.pop_front() {
        queued[node.index()] = false;
        let Some(value) = values[node.index()] else {
            continue;
        };

        for edge in graph.edges(node) {
            let target = edge.target.index();
            if pinned[target] {
                continue;
            }

            let candidate = value.saturating_add(edge.weight);
            let accept = match values[target] {
                None => true,
                Some(current) => edge.improves(candidate, current),
            };
            if !accept {
                continue;
            }

            trace!(from = %node, to = %edge.target, candidate, "relaxed edge");
            values[target] = Some(candidate);
            updates += 1;
            if !queued[target] {
                queued[target] = true;
                worklist.push_back(edge.target);
            }
        }
    }

    debug!(nodes = values.len(), updates, "propagation settled");

    Propagation { values, updates }
}
