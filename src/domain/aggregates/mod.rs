//! Aggregates - Cluster of domain objects treated as a single unit

pub mod time_off_request;

pub use time_off_request::{DomainViolation, RequestState, TimeOffRequest};
