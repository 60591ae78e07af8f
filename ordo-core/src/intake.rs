//! Declaration Intake
//!
//! Discovery reports, per unit, what the author declared about its order.
//! Intake turns those raw declarations into the [`ConstraintSet`] the
//! resolver consumes, recovering locally from declarations it cannot honor.
//!
//! # Recovery Rules
//!
//! - A unit pinned more than once keeps its last pin.
//! - A pinned unit ignores its own `After`/`Before` declarations.
//! - A declaration whose target fails the unit filter is dropped.
//! - A negative slot count is replaced by its absolute value.
//!
//! Each recovery produces a [`Diagnostic`], which is logged and returned.

use std::fmt::Debug;
use std::hash::Hash;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ResolverConfig;
use crate::error::Diagnostic;
use crate::model::{ConstraintSet, Dependency, Pin};

/// One ordering declaration attached to a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Declaration<U> {
    /// The unit has a fixed order.
    Pin {
        /// The absolute order value.
        order: i64,
    },
    /// The unit runs after `target`.
    After {
        /// The anchor unit.
        target: U,
        /// Slot distance; the configured default when absent.
        #[serde(default)]
        slots: Option<i64>,
    },
    /// The unit runs before `target`.
    Before {
        /// The anchor unit.
        target: U,
        /// Slot distance; the configured default when absent.
        #[serde(default)]
        slots: Option<i64>,
    },
}

/// A unit together with everything it declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "U: Deserialize<'de>"))]
pub struct UnitDeclarations<U> {
    /// The declaring unit.
    pub unit: U,
    /// Its declarations, in source order.
    #[serde(default)]
    pub declarations: Vec<Declaration<U>>,
}

impl<U> UnitDeclarations<U> {
    /// Create a record with no declarations.
    pub fn new(unit: U) -> Self {
        Self {
            unit,
            declarations: Vec::new(),
        }
    }

    /// Declare a pin.
    pub fn pin(mut self, order: i64) -> Self {
        self.declarations.push(Declaration::Pin { order });
        self
    }

    /// Declare that the unit runs after `target`.
    pub fn after(mut self, target: U, slots: Option<i64>) -> Self {
        self.declarations.push(Declaration::After { target, slots });
        self
    }

    /// Declare that the unit runs before `target`.
    pub fn before(mut self, target: U, slots: Option<i64>) -> Self {
        self.declarations.push(Declaration::Before { target, slots });
        self
    }
}

/// Constraints accepted by intake plus everything it had to recover from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeOutcome<U> {
    /// The constraints to resolve.
    pub constraints: ConstraintSet<U>,
    /// Problems found while reading declarations.
    pub diagnostics: Vec<Diagnostic<U>>,
}

type UnitFilter<'f, U> = Box<dyn Fn(&U) -> bool + 'f>;

/// Converts per-unit declarations into a [`ConstraintSet`].
pub struct Intake<'f, U> {
    default_slots: i64,
    filter: Option<UnitFilter<'f, U>>,
}

impl<'f, U> Intake<'f, U>
where
    U: Clone + Hash + Eq + Debug,
{
    /// Create an intake using `config` for defaults.
    ///
    /// Without a custom filter, a target is accepted only if it appears as a
    /// declaring unit in the same batch of records.
    pub fn new(config: &ResolverConfig) -> Self {
        Self {
            default_slots: config.default_slots,
            filter: None,
        }
    }

    /// Accept targets based on `filter` instead of the declaring-unit set.
    pub fn with_filter(mut self, filter: impl Fn(&U) -> bool + 'f) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    /// Read all records and produce the constraints of one pass.
    pub fn collect(
        &self,
        records: impl IntoIterator<Item = UnitDeclarations<U>>,
    ) -> IntakeOutcome<U> {
        let records: Vec<_> = records.into_iter().collect();
        let declared: IndexSet<&U> = records.iter().map(|record| &record.unit).collect();
        let accepts = |target: &U| match &self.filter {
            Some(filter) => filter(target),
            None => declared.contains(target),
        };

        let mut diagnostics = Vec::new();
        let mut pins: IndexMap<U, i64> = IndexMap::new();

        for record in &records {
            for declaration in &record.declarations {
                let Declaration::Pin { order } = declaration else {
                    continue;
                };
                if let Some(dropped) = pins.insert(record.unit.clone(), *order) {
                    diagnostics.push(Diagnostic::DuplicatePin {
                        unit: record.unit.clone(),
                        kept: *order,
                        dropped,
                    });
                }
            }
        }

        let mut dependencies = Vec::new();
        for record in &records {
            for declaration in &record.declarations {
                let (target, slots, after) = match declaration {
                    Declaration::Pin { .. } => continue,
                    Declaration::After { target, slots } => (target, slots, true),
                    Declaration::Before { target, slots } => (target, slots, false),
                };

                if pins.contains_key(&record.unit) {
                    diagnostics.push(Diagnostic::PinOverridesRelative {
                        unit: record.unit.clone(),
                        target: target.clone(),
                    });
                    continue;
                }

                if !accepts(target) {
                    diagnostics.push(Diagnostic::UnresolvedTarget {
                        unit: record.unit.clone(),
                        target: target.clone(),
                    });
                    continue;
                }

                let slots = slots.unwrap_or(self.default_slots);
                if slots < 0 {
                    diagnostics.push(Diagnostic::NegativeSlots {
                        unit: record.unit.clone(),
                        target: target.clone(),
                        slots,
                    });
                }

                let unit = record.unit.clone();
                let anchor = target.clone();
                dependencies.push(if after {
                    Dependency::after(unit, anchor, slots)
                } else {
                    Dependency::before(unit, anchor, slots)
                });
            }
        }

        for diagnostic in &diagnostics {
            warn!(unit = ?diagnostic.unit(), "{}", diagnostic);
        }
        debug!(
            units = records.len(),
            pins = pins.len(),
            dependencies = dependencies.len(),
            diagnostics = diagnostics.len(),
            "collected ordering declarations"
        );

        IntakeOutcome {
            constraints: ConstraintSet {
                pins: pins
                    .into_iter()
                    .map(|(unit, order)| Pin::new(unit, order))
                    .collect(),
                dependencies,
            },
            diagnostics,
        }
    }
}
