//! Inbound ports - Interfaces that the application exposes to the outside world

pub mod executor;

pub use executor::{
    // The contract
    CommandExecutor,
    // Result taxonomy
    ExecutionFault, ExecutionResult, ExecutionStep, FaultKind, FieldError,
};
