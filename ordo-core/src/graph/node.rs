//! Graph Nodes
//!
//! Units are interned into dense [`NodeId`]s once per pass. Every per-node
//! table in the resolver is a `Vec` indexed by that id.

use std::fmt;
use std::hash::Hash;

use indexmap::IndexSet;
use smallvec::SmallVec;

/// Dense index of a unit within one [`ConstraintGraph`].
///
/// Stored at full pointer width, so every index the interner can hand out
/// maps to a distinct id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Get the raw index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for NodeId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// A weighted out-edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// The constrained node.
    pub target: NodeId,
    /// Signed slot distance from the source node.
    pub weight: i64,
}

impl Edge {
    /// Whether a later candidate must be smaller to replace the current value.
    pub fn tightens_downward(&self) -> bool {
        self.weight < 0
    }

    /// Check if `candidate` is strictly more extreme than `current` in this
    /// edge's direction.
    pub fn improves(&self, candidate: i64, current: i64) -> bool {
        if self.tightens_downward() {
            candidate < current
        } else {
            candidate > current
        }
    }
}

/// Out-edges of one node. Most units constrain only a handful of others.
pub type EdgeList = SmallVec<[Edge; 4]>;

/// Adjacency-list graph over interned units.
#[derive(Debug, Clone)]
pub struct ConstraintGraph<U> {
    /// Interned units; the position is the node's id.
    units: IndexSet<U>,

    /// Out-edges per node.
    adjacency: Vec<EdgeList>,
}

impl<U: Hash + Eq> ConstraintGraph<U> {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self {
            units: IndexSet::new(),
            adjacency: Vec::new(),
        }
    }

    /// Intern `unit`, creating an empty node the first time it is seen.
    pub fn ensure_node(&mut self, unit: U) -> NodeId {
        let (index, inserted) = self.units.insert_full(unit);
        if inserted {
            self.adjacency.push(EdgeList::new());
        }
        NodeId::from(index)
    }

    /// Add a directed edge `from -> to`.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, weight: i64) {
        self.adjacency[from.index()].push(Edge { target: to, weight });
    }

    /// Look up the node of an already interned unit.
    pub fn node_id(&self, unit: &U) -> Option<NodeId> {
        self.units.get_index_of(unit).map(NodeId::from)
    }

    /// Look up the unit behind a node.
    pub fn unit(&self, id: NodeId) -> Option<&U> {
        self.units.get_index(id.index())
    }

    /// Out-edges of `id`. Unknown ids have none.
    pub fn edges(&self, id: NodeId) -> &[Edge] {
        self.adjacency
            .get(id.index())
            .map(|edges| edges.as_slice())
            .unwrap_or(&[])
    }

    /// Iterate over every node id in interning order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.units.len()).map(NodeId::from)
    }

    /// Iterate over `(id, unit)` pairs in interning order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &U)> {
        self.units
            .iter()
            .enumerate()
            .map(|(index, unit)| (NodeId::from(index), unit))
    }

    /// Get the total number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.units.len()
    }

    /// Get the total number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(|edges| edges.len()).sum()
    }
}

impl<U: Hash + Eq> Default for ConstraintGraph<U> {
    fn default() -> Self {
        Self::new()
    }
}
