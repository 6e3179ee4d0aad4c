//! Application services - Use case implementations
//!
//! This module contains the services that implement the engine's use cases.
//! Each service follows hexagonal architecture principles, accepting port
//! dependencies and returning views or typed results.

pub mod command_validation;
pub mod execution_service;
pub mod presenter;
pub mod query_service;

// Re-export validation types
pub use command_validation::{validate, CommandPayload, CreateFields, RequestAction};

// Re-export execution service types
pub use execution_service::{PolicyRegistry, RequestExecutionService};

// Re-export presentation and query types
pub use presenter::RequestPresenter;
pub use query_service::{RequestFilter, RequestOrdering, RequestQueryService};
