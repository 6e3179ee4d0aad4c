//! Domain services - Pure business logic operations

pub mod policy_evaluator;

pub use policy_evaluator::{evaluate, PolicyOutcome};
