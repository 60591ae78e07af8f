//! Resolution Pipeline
//!
//! One pass runs, in order:
//!
//! 1. graph construction from pins and dependencies,
//! 2. cycle detection, which aborts the pass on failure,
//! 3. root discovery and seeding,
//! 4. value propagation,
//! 5. optionally, a batched write of the changed values.
//!
//! A pass is a pure function of its inputs plus the store's current values.
//! Nothing is cached between passes.

use std::fmt::Debug;
use std::hash::Hash;

use indexmap::IndexMap;
use tracing::error;

use crate::config::ResolverConfig;
use crate::error::{Diagnostic, ResolveError};
use crate::graph::{build, find_cycle, ConstraintGraph, NodeId};
use crate::intake::{Intake, UnitDeclarations};
use crate::model::{ConstraintSet, OrderAssignment};
use crate::propagate::{propagate, seed};
use crate::writer::{apply, OrderStore, WriteReport};

/// Outcome of resolving raw declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationPass<U> {
    /// Problems intake recovered from. Reported even when the pass failed.
    pub diagnostics: Vec<Diagnostic<U>>,
    /// What was written, or why nothing was.
    pub outcome: Result<WriteReport<U>, ResolveError<U>>,
}

/// Computes execution orders from ordering constraints.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    config: ResolverConfig,
}

impl Resolver {
    /// Create a resolver with the given configuration.
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// Get the resolver's configuration.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Compute the order assignment for `constraints`.
    ///
    /// `current_order` supplies the stored order of unpinned roots; `None`
    /// falls back to [`ResolverConfig::fallback_order`].
    pub fn assign<U, F>(
        &self,
        constraints: &ConstraintSet<U>,
        mut current_order: F,
    ) -> Result<OrderAssignment<U>, ResolveError<U>>
    where
        U: Clone + Hash + Eq + Debug,
        F: FnMut(&U) -> Option<i64>,
    {
        let graph = build(&constraints.pins, &constraints.dependencies);

        if let Some(cycle) = find_cycle(&graph) {
            let err = self.contradiction(&graph, &cycle);
            error!(%err, "refusing to reorder");
            return Err(err);
        }

        let fallback = self.config.fallback_order;
        let seeds = seed(&graph, &constraints.pins, |unit| {
            current_order(unit).unwrap_or(fallback)
        });

        let propagation = propagate(&graph, seeds);

        let values: IndexMap<U, i64> = graph
            .nodes()
            .filter_map(|(id, unit)| propagation.get(id).map(|order| (unit.clone(), order)))
            .collect();

        Ok(OrderAssignment::from_map(values))
    }

    /// Compute the order assignment, reading root seeds from `store`.
    pub fn resolve<U, S>(
        &self,
        constraints: &ConstraintSet<U>,
        store: &S,
    ) -> Result<OrderAssignment<U>, ResolveError<U>>
    where
        U: Clone + Hash + Eq + Debug,
        S: OrderStore<U> + ?Sized,
    {
        self.assign(constraints, |unit| store.current_order(unit))
    }

    /// Resolve and write every changed order to `store` in one batch.
    ///
    /// On a contradiction the store is left untouched.
    pub fn resolve_and_apply<U, S>(
        &self,
        constraints: &ConstraintSet<U>,
        store: &S,
    ) -> Result<WriteReport<U>, ResolveError<U>>
    where
        U: Clone + Hash + Eq + Debug,
        S: OrderStore<U> + ?Sized,
    {
        let assignment = self.resolve(constraints, store)?;
        Ok(apply(store, &assignment))
    }

    /// Run intake over raw declarations, then resolve and apply.
    pub fn resolve_declarations<U, S>(
        &self,
        records: impl IntoIterator<Item = UnitDeclarations<U>>,
        store: &S,
    ) -> DeclarationPass<U>
    where
        U: Clone + Hash + Eq + Debug,
        S: OrderStore<U> + ?Sized,
    {
        let intake = Intake::new(&self.config).collect(records);
        DeclarationPass {
            outcome: self.resolve_and_apply(&intake.constraints, store),
            diagnostics: intake.diagnostics,
        }
    }

    fn contradiction<U>(&self, graph: &ConstraintGraph<U>, cycle: &[NodeId]) -> ResolveError<U>
    where
        U: Clone + Hash + Eq,
    {
        let units = cycle
            .iter()
            .take(self.config.cycle_report_limit)
            .filter_map(|id| graph.unit(*id).cloned())
            .collect();
        ResolveError::ContradictoryConstraints {
            units,
            total: cycle.len(),
        }
    }
}
