//! In-memory event bus
//!
//! Fan-out delivery of domain events over unbounded channels. Publishing is
//! a hand-off: the send never waits on a subscriber, each subscriber drains
//! its own queue at its own pace, and a dropped subscriber is pruned on the
//! next publish. Zero subscribers is fine; events are still accepted.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::application::ports::outbound::{EventPublisherPort, PublishError};
use crate::domain::events::DomainEvent;

pub struct ChannelEventBus {
    subscribers: RwLock<Vec<UnboundedSender<DomainEvent>>>,
    closed: AtomicBool,
}

impl ChannelEventBus {
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Open a subscription. The receiver sees every event published after
    /// this call, in publication order.
    pub async fn subscribe(&self) -> UnboundedReceiver<DomainEvent> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.subscribers.write().await.push(sender);
        receiver
    }

    /// Refuse further publications and drop all subscriber channels, which
    /// lets draining workers run to completion.
    pub async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.subscribers.write().await.clear();
    }
}

impl Default for ChannelEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisherPort for ChannelEventBus {
    async fn publish(&self, event: DomainEvent) -> Result<(), PublishError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(PublishError::Closed);
        }
        let mut subscribers = self.subscribers.write().await;
        let before = subscribers.len();
        subscribers.retain(|subscriber| subscriber.send(event.clone()).is_ok());
        let pruned = before - subscribers.len();
        if pruned > 0 {
            warn!(pruned, "Dropped event subscribers pruned");
        }
        debug!(
            event = event.name(),
            request_id = %event.request_id,
            subscribers = subscribers.len(),
            "Event dispatched"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::EventPayload;
    use crate::domain::value_objects::{EventSequence, RequestId};

    fn finalized_event() -> DomainEvent {
        DomainEvent::new(
            RequestId::new(),
            EventSequence::start().next(),
            EventPayload::Finalized,
        )
    }

    #[tokio::test]
    async fn test_every_subscriber_receives_every_event() {
        let bus = ChannelEventBus::new();
        let mut first = bus.subscribe().await;
        let mut second = bus.subscribe().await;

        let event = finalized_event();
        bus.publish(event.clone()).await.unwrap();

        assert_eq!(first.recv().await.unwrap().request_id, event.request_id);
        assert_eq!(second.recv().await.unwrap().request_id, event.request_id);
    }

    #[tokio::test]
    async fn test_dropped_subscriber_does_not_block_the_rest() {
        let bus = ChannelEventBus::new();
        let dead = bus.subscribe().await;
        drop(dead);
        let mut alive = bus.subscribe().await;

        bus.publish(finalized_event()).await.unwrap();
        assert!(alive.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_publishing_without_subscribers_is_accepted() {
        let bus = ChannelEventBus::new();
        assert!(bus.publish(finalized_event()).await.is_ok());
    }

    #[tokio::test]
    async fn test_closed_bus_refuses_publications_and_ends_receivers() {
        let bus = ChannelEventBus::new();
        let mut receiver = bus.subscribe().await;

        bus.close().await;
        assert!(matches!(
            bus.publish(finalized_event()).await,
            Err(PublishError::Closed)
        ));
        // sender side dropped: the stream ends instead of hanging
        assert!(receiver.recv().await.is_none());
    }
}
