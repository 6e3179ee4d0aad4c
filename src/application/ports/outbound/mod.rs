//! Outbound ports - Interfaces that the application requires from external systems

mod event_port;
mod plan_rules_port;
mod store_port;

pub use event_port::{EventPublisherPort, PublishError};
pub use plan_rules_port::PlanRulesPort;
pub use store_port::{RequestStorePort, StoreError};
