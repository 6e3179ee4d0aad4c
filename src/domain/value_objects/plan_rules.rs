//! Plan rules
//!
//! Per-tenant time-off configuration. The pipeline treats these as
//! read-only facts: policies and aggregate operations consult them, nothing
//! in the write path ever changes them.

use serde::{Deserialize, Serialize};

use super::day_count::DayCount;
use super::request_limit::RequestLimit;

/// Carryover days granted when the plan does not say otherwise.
pub const DEFAULT_CARRYOVER_DAYS: u32 = 5;

/// The rules a tenant's plan imposes on request handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRules {
    /// Whether the time-off feature is switched on at all.
    pub enabled: bool,
    /// Whether a request needs a decision before it takes effect. When
    /// false, freshly created requests finalize themselves.
    pub requires_approval: bool,
    /// Cap on the quantity of a single request.
    pub limit: RequestLimit,
    /// Days carried over from the previous period, spendable once a request
    /// is approved.
    pub carryover_allowance: DayCount,
}

impl PlanRules {
    pub fn with_limit(mut self, limit: RequestLimit) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_carryover(mut self, allowance: DayCount) -> Self {
        self.carryover_allowance = allowance;
        self
    }

    pub fn without_approval(mut self) -> Self {
        self.requires_approval = false;
        self
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

impl Default for PlanRules {
    fn default() -> Self {
        Self {
            enabled: true,
            requires_approval: true,
            limit: RequestLimit::default(),
            carryover_allowance: DayCount::new(DEFAULT_CARRYOVER_DAYS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_plan_requires_approval() {
        let rules = PlanRules::default();
        assert!(rules.enabled);
        assert!(rules.requires_approval);
    }

    #[test]
    fn test_builders_adjust_single_fields() {
        let rules = PlanRules::default()
            .with_limit(RequestLimit::Unbounded)
            .without_approval();
        assert_eq!(rules.limit, RequestLimit::Unbounded);
        assert!(!rules.requires_approval);
        assert!(rules.enabled);
    }
}
