use async_trait::async_trait;

use crate::domain::events::DomainEvent;

#[derive(Debug, Clone, thiserror::Error)]
pub enum PublishError {
    #[error("event bus is closed")]
    Closed,
    #[error("event transport failure: {0}")]
    Transport(String),
}

/// Outbound port for announcing committed domain events.
///
/// Publication is a hand-off: accepting an event must not wait on any
/// subscriber, and a slow or absent subscriber never blocks the publisher.
/// Callers publish only after the owning mutation has committed.
#[async_trait]
pub trait EventPublisherPort: Send + Sync {
    async fn publish(&self, event: DomainEvent) -> Result<(), PublishError>;
}
