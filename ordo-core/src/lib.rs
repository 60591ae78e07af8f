//! Ordo Core
//!
//! This crate computes a deterministic execution order for a set of units
//! from two kinds of author intent:
//!
//! - Pins: an absolute order value for one unit
//! - Dependencies: "run at least N slots after/before that unit"
//!
//! Every unit touched by a constraint receives a concrete integer order.
//! Contradictory (cyclic) constraints reject the whole pass instead of
//! producing a partial order.
//!
//! # Architecture
//!
//! - `model`: constraint and assignment value types
//! - `intake`: turns per-unit declarations into constraints
//! - `graph`: constraint graph, cycle detection, root discovery
//! - `propagate`: seeding and edge relaxation
//! - `writer`: batched, minimal writes to an external order store
//! - `resolver`: the pipeline tying these together
//!
//! # Example
//!
//! ```rust
//! use ordo_core::{ConstraintSet, MemoryOrderStore, Resolver};
//!
//! let constraints = ConstraintSet::new()
//!     .pin("Input", 0)
//!     .depend("Input", "Physics", 10)
//!     .depend("Physics", "Render", 5);
//!
//! let store = MemoryOrderStore::new();
//! let report = Resolver::default()
//!     .resolve_and_apply(&constraints, &store)
//!     .unwrap();
//!
//! assert_eq!(report.written.len(), 3);
//! assert_eq!(store.get(&"Render"), Some(15));
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod intake;
pub mod model;
pub mod propagate;
pub mod resolver;
pub mod writer;

pub use config::ResolverConfig;
pub use error::{Diagnostic, ResolveError};
pub use intake::{Declaration, Intake, IntakeOutcome, UnitDeclarations};
pub use model::{ConstraintSet, Dependency, OrderAssignment, Pin};
pub use resolver::{DeclarationPass, Resolver};
pub use writer::{apply, BatchGuard, MemoryOrderStore, OrderStore, WriteReport};
