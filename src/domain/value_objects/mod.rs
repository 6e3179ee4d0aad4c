//! Value objects - Immutable objects defined by their attributes

mod actor;
mod day_count;
mod ids;
mod plan_rules;
mod request_limit;
mod version;

pub use actor::{Actor, Capability, ExecutionContext};
pub use day_count::DayCount;
pub use ids::*;
pub use plan_rules::{PlanRules, DEFAULT_CARRYOVER_DAYS};
pub use request_limit::{RequestLimit, FALLBACK_LIMIT_DAYS};
pub use version::{EventSequence, Version};
