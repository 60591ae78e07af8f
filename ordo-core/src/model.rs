//! Constraint Model
//!
//! Plain value types describing ordering intent. These are what discovery
//! hands to the resolver and what the resolver hands back.
//!
//! # Sign Convention
//!
//! A [`Dependency`] from `from` to `to` with weight `delta` places `to` at
//! `order(from) + delta`. The `from` side is the anchor: it is the unit that
//! was referenced, and the `to` side is the unit that moves relative to it.
//!
//! - `delta > 0` ("after"): the target settles on the greatest candidate.
//! - `delta < 0` ("before"): the target settles on the smallest candidate.
//! - `delta == 0` behaves like the positive case.

use std::hash::Hash;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// An absolute order value fixed by the author for one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pin<U> {
    /// The pinned unit.
    pub unit: U,
    /// The order value the unit must end up with.
    pub order: i64,
}

impl<U> Pin<U> {
    /// Create a new pin.
    pub fn new(unit: U, order: i64) -> Self {
        Self { unit, order }
    }
}

/// A relative ordering constraint between two units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency<U> {
    /// The anchor unit.
    pub from: U,
    /// The unit placed relative to the anchor.
    pub to: U,
    /// Signed distance from the anchor, in order slots.
    pub delta: i64,
}

impl<U> Dependency<U> {
    /// Create a dependency edge `from -> to` with the given weight.
    pub fn new(from: U, to: U, delta: i64) -> Self {
        Self { from, to, delta }
    }

    /// `unit` must run at least `slots` after `anchor`.
    ///
    /// Only the magnitude of `slots` is used; `i64::MIN` saturates to `i64::MAX`.
    pub fn after(unit: U, anchor: U, slots: i64) -> Self {
        Self::new(anchor, unit, slots.saturating_abs())
    }

    /// `unit` must run at least `slots` before `anchor`.
    ///
    /// Only the magnitude of `slots` is used; `i64::MIN` saturates to `-i64::MAX`.
    pub fn before(unit: U, anchor: U, slots: i64) -> Self {
        Self::new(anchor, unit, -slots.saturating_abs())
    }

    /// The referenced unit.
    pub fn anchor(&self) -> &U {
        &self.from
    }

    /// The unit whose order is derived from the anchor.
    pub fn moved(&self) -> &U {
        &self.to
    }
}

/// The full input of one resolution pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "U: Deserialize<'de>"))]
pub struct ConstraintSet<U> {
    /// Absolute pins, in declaration order.
    #[serde(default)]
    pub pins: Vec<Pin<U>>,
    /// Relative dependencies, in declaration order.
    #[serde(default)]
    pub dependencies: Vec<Dependency<U>>,
}

impl<U> ConstraintSet<U> {
    /// Create an empty constraint set.
    pub fn new() -> Self {
        Self {
            pins: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    /// Add a pin.
    pub fn pin(mut self, unit: U, order: i64) -> Self {
        self.pins.push(Pin::new(unit, order));
        self
    }

    /// Add a raw dependency edge.
    pub fn depend(mut self, from: U, to: U, delta: i64) -> Self {
        self.dependencies.push(Dependency::new(from, to, delta));
        self
    }

    /// Check whether the set carries no constraints at all.
    pub fn is_empty(&self) -> bool {
        self.pins.is_empty() && self.dependencies.is_empty()
    }
}

impl<U: DeserializeOwned> ConstraintSet<U> {
    /// Parse a constraint set from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl<U> Default for ConstraintSet<U> {
    fn default() -> Self {
        Self::new()
    }
}

/// Final order value per unit, produced fresh by every resolution pass.
///
/// Iteration follows the resolver's interning order, so two passes over the
/// same input iterate identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OrderAssignment<U: Hash + Eq> {
    values: IndexMap<U, i64>,
}

impl<U: Hash + Eq> OrderAssignment<U> {
    pub(crate) fn from_map(values: IndexMap<U, i64>) -> Self {
        Self { values }
    }

    /// Final order of `unit`, if it was reached from a seed.
    pub fn get(&self, unit: &U) -> Option<i64> {
        self.values.get(unit).copied()
    }

    /// Number of assigned units.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check whether nothing was assigned.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `(unit, order)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&U, i64)> {
        self.values.iter().map(|(unit, order)| (unit, *order))
    }

    /// Consume the assignment, returning the underlying map.
    pub fn into_inner(self) -> IndexMap<U, i64> {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn after_and_before_point_from_anchor() {
        let after = Dependency::after("b", "a", 10);
        assert_eq!(after.anchor(), &"a");
        assert_eq!(after.moved(), &"b");
        assert_eq!(after.delta, 10);

        let before = Dependency::before("b", "a", 5);
        assert_eq!(before.anchor(), &"a");
        assert_eq!(before.delta, -5);
    }

    #[test]
    fn slot_sign_comes_from_the_constructor() {
        assert_eq!(Dependency::after("b", "a", -3).delta, 3);
        assert_eq!(Dependency::before("b", "a", -3).delta, -3);
    }

    #[test]
    fn minimum_slot_count_keeps_direction() {
        assert_eq!(Dependency::after("b", "a", i64::MIN).delta, i64::MAX);
        assert_eq!(Dependency::before("b", "a", i64::MIN).delta, -i64::MAX);
    }

    #[test]
    fn constraint_set_from_json_with_non_default_units() {
        #[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
        struct Script(u32);

        let set: ConstraintSet<Script> =
            ConstraintSet::from_json(r#"{ "pins": [{ "unit": 7, "order": 1 }] }"#).unwrap();
        assert_eq!(set.pins, vec![Pin::new(Script(7), 1)]);
        assert!(set.dependencies.is_empty());
    }

    #[test]
    fn constraint_set_from_json() {
        let json = r#"{
            "pins": [{ "unit": "Input", "order": -100 }],
            "dependencies": [{ "from": "Input", "to": "Camera", "delta": 10 }]
        }"#;

        let set: ConstraintSet<String> = ConstraintSet::from_json(json).unwrap();
        assert_eq!(set.pins, vec![Pin::new("Input".to_string(), -100)]);
        assert_eq!(set.dependencies.len(), 1);
        assert_eq!(set.dependencies[0].to, "Camera");
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let set: ConstraintSet<String> = ConstraintSet::from_json("{}").unwrap();
        assert!(set.is_empty());
    }
}
