//! Error and diagnostic types.
//!
//! Contradictions abort a pass with a [`ResolveError`]. Everything else is
//! recovered locally and surfaced as a [`Diagnostic`].

/// Fatal errors of a resolution pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError<U> {
    /// The dependencies contain a directed cycle.
    ///
    /// `units` lists members of one cycle in path order, truncated to the
    /// configured report limit. `total` is the untruncated cycle length.
    #[error(
        "contradictory ordering constraints: cycle through {units:?}{}",
        omitted(.units.len(), .total)
    )]
    ContradictoryConstraints {
        /// Units on the detected cycle.
        units: Vec<U>,
        /// Number of units on the cycle.
        total: usize,
    },
}

fn omitted(shown: usize, total: &usize) -> String {
    if *total > shown {
        format!(" and {} more", total - shown)
    } else {
        String::new()
    }
}

/// A declaration problem that was recovered by dropping or rewriting input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Diagnostic<U> {
    /// A unit was pinned more than once; the later pin wins.
    #[error("{unit:?} is pinned more than once; order {kept} replaces {dropped}")]
    DuplicatePin {
        /// The pinned unit.
        unit: U,
        /// Order of the pin that wins.
        kept: i64,
        /// Order of the pin that was dropped.
        dropped: i64,
    },

    /// A pinned unit also declared a relative constraint, which is ignored.
    #[error("{unit:?} has a pinned order; its relative constraint on {target:?} is ignored")]
    PinOverridesRelative {
        /// The declaring unit.
        unit: U,
        /// The target of the dropped declaration.
        target: U,
    },

    /// A relative constraint names a unit that cannot be ordered.
    #[error("{unit:?} references {target:?}, which is not an orderable unit; constraint dropped")]
    UnresolvedTarget {
        /// The declaring unit.
        unit: U,
        /// The rejected target.
        target: U,
    },

    /// A relative constraint used a negative slot count.
    #[error("{unit:?} declares {slots} slots relative to {target:?}; using {}", .slots.saturating_abs())]
    NegativeSlots {
        /// The declaring unit.
        unit: U,
        /// The declaration's target.
        target: U,
        /// The slot count as declared.
        slots: i64,
    },
}

impl<U> Diagnostic<U> {
    /// The unit whose declarations triggered this diagnostic.
    pub fn unit(&self) -> &U {
        match self {
            Diagnostic::DuplicatePin { unit, .. }
            | Diagnostic::PinOverridesRelative { unit, .. }
            | Diagnostic::UnresolvedTarget { unit, .. }
            | Diagnostic::NegativeSlots { unit, .. } => unit,
        }
    }
}
