//! Constraint Graph
//!
//! This module turns ordering constraints into a directed, weighted graph
//! and answers the structural questions the resolver asks about it.
//!
//! # Overview
//!
//! The constraint graph is a directed graph where:
//!
//! - Nodes represent units mentioned by any pin or dependency
//! - Edges represent dependencies: `from -> to` with a signed slot distance
//!
//! Before values are propagated, the graph must be proven acyclic. Nodes
//! with no incoming edges are the roots that seed propagation when they are
//! not pinned.
//!
//! # Design Decisions
//!
//! 1. Units are interned into dense indices once per pass, so every hot loop
//!    works on `Vec`s instead of hashing unit handles.
//!
//! 2. Only forward edges are stored. In-degrees are computed on demand since
//!    they are needed exactly once per pass.
//!
//! 3. The graph is rebuilt from scratch for every pass and never mutated
//!    after construction.

mod builder;
mod cycle;
mod node;
mod roots;

pub use builder::build;
pub use cycle::{find_cycle, is_cyclic};
pub use node::{ConstraintGraph, Edge, EdgeList, NodeId};
pub use roots::{in_degrees, roots};
