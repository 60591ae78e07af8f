//! Resolver configuration.

use serde::{Deserialize, Serialize};

/// Slot distance used when a relative declaration does not name one.
pub const DEFAULT_SLOTS: i64 = 10;

/// Number of cycle participants named in a contradiction report.
pub const DEFAULT_CYCLE_REPORT_LIMIT: usize = 8;

/// Tunables for a [`Resolver`](crate::Resolver).
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```rust
/// use ordo_core::ResolverConfig;
///
/// let config = ResolverConfig::from_json(r#"{ "default_slots": 100 }"#).unwrap();
/// assert_eq!(config.default_slots, 100);
/// assert_eq!(config.fallback_order, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Slot distance for `After`/`Before` declarations without an explicit count.
    pub default_slots: i64,

    /// Seed for a root the order store has no value for.
    pub fallback_order: i64,

    /// Maximum number of units listed when a cycle is reported.
    pub cycle_report_limit: usize,
}

impl ResolverConfig {
    /// Parse a configuration from JSON, filling missing fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Set the default slot distance.
    pub fn with_default_slots(mut self, slots: i64) -> Self {
        self.default_slots = slots;
        self
    }

    /// Set the fallback order for unknown roots.
    pub fn with_fallback_order(mut self, order: i64) -> Self {
        self.fallback_order = order;
        self
    }

    /// Set how many cycle participants are named in a report.
    pub fn with_cycle_report_limit(mut self, limit: usize) -> Self {
        self.cycle_report_limit = limit;
        self
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            default_slots: DEFAULT_SLOTS,
            fallback_order: 0,
            cycle_report_limit: DEFAULT_CYCLE_REPORT_LIMIT,
        }
    }
}
