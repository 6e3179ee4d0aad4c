//! Application configuration
//!
//! Environment-driven settings for the engine. The interesting part is the
//! default plan rules: tenants without a directory override are governed by
//! whatever the deployment configures here.

use std::env;

use anyhow::{Context, Result};

use crate::domain::value_objects::{DayCount, PlanRules, RequestLimit, DEFAULT_CARRYOVER_DAYS};

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Whether the time-off feature is on for tenants without an override
    pub feature_enabled: bool,
    /// Whether requests need an approver's decision by default
    pub requires_approval: bool,
    /// Default per-request day limit
    pub request_limit: RequestLimit,
    /// Default carryover allowance in days
    pub carryover_allowance: DayCount,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            feature_enabled: env_or("TIMEOFF_FEATURE_ENABLED", true),
            requires_approval: env_or("TIMEOFF_REQUIRES_APPROVAL", true),
            // "all", a number, or junk; junk falls back to the declared
            // default, same as any other loose limit input
            request_limit: RequestLimit::parse(
                &env::var("TIMEOFF_REQUEST_LIMIT").unwrap_or_else(|_| "default".to_string()),
            ),
            carryover_allowance: DayCount::new(
                env::var("TIMEOFF_CARRYOVER_ALLOWANCE")
                    .unwrap_or_else(|_| DEFAULT_CARRYOVER_DAYS.to_string())
                    .parse()
                    .context("TIMEOFF_CARRYOVER_ALLOWANCE must be a non-negative day count")?,
            ),
        })
    }

    /// The plan rules served to tenants without a directory override.
    pub fn default_plan_rules(&self) -> PlanRules {
        PlanRules {
            enabled: self.feature_enabled,
            requires_approval: self.requires_approval,
            limit: self.request_limit,
            carryover_allowance: self.carryover_allowance,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_mirror_the_standard_plan() {
        let config = AppConfig {
            feature_enabled: true,
            requires_approval: true,
            request_limit: RequestLimit::default(),
            carryover_allowance: DayCount::new(DEFAULT_CARRYOVER_DAYS),
        };
        assert_eq!(config.default_plan_rules(), PlanRules::default());
    }
}
