//! Domain layer - Core business logic with no external dependencies
//!
//! This layer contains:
//! - Value Objects: Ids, day counts, limits, plan rules, actors
//! - Aggregates: The time-off request aggregate root
//! - Domain Events: Immutable facts about committed changes
//! - Policies: Named authorization rules
//! - Domain Services: Ordered policy evaluation

pub mod aggregates;
pub mod events;
pub mod policies;
pub mod services;
pub mod value_objects;
