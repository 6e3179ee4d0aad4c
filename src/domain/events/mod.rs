//! Domain events - Notifications of state changes within the domain

pub mod domain_events;

pub use domain_events::{DomainEvent, EventMetadata, EventPayload};
