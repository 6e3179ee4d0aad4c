//! Event notification subscriber
//!
//! The delivery mechanism lives behind the event bus: domain code publishes
//! facts, and this subscriber turns each fact into a human-readable message
//! on its own schedule. A slow notifier delays messages, never executions.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::domain::events::{DomainEvent, EventPayload};

/// One rendered message, retained for inspection and audit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub event_name: &'static str,
    pub request_id: String,
    pub message: String,
    pub occurred_at: DateTime<Utc>,
}

/// Renders domain events into notifications.
///
/// Stands where a mailer or chat webhook would; the recorded messages are
/// the "outbox" a real delivery adapter would drain.
pub struct RequestNotifier {
    sent: RwLock<Vec<Notification>>,
}

impl RequestNotifier {
    pub fn new() -> Self {
        Self {
            sent: RwLock::new(Vec::new()),
        }
    }

    /// Drain a bus subscription until the bus closes. Intended to run as a
    /// spawned worker.
    pub async fn run(self: Arc<Self>, mut events: UnboundedReceiver<DomainEvent>) {
        info!("Notification worker started");
        while let Some(event) = events.recv().await {
            self.deliver(&event).await;
        }
        info!("Notification worker stopped: event bus closed");
    }

    pub async fn deliver(&self, event: &DomainEvent) {
        let notification = Notification {
            event_name: event.name(),
            request_id: event.request_id.to_string(),
            message: render(event),
            occurred_at: event.metadata.occurred_at,
        };
        info!(
            event = notification.event_name,
            request_id = %notification.request_id,
            "{}",
            notification.message
        );
        let mut sent = self.sent.write().await;
        sent.push(notification);
        debug!(delivered = sent.len(), "Notification recorded");
    }

    /// Everything delivered so far, oldest first.
    pub async fn delivered(&self) -> Vec<Notification> {
        self.sent.read().await.clone()
    }
}

impl Default for RequestNotifier {
    fn default() -> Self {
        Self::new()
    }
}

fn render(event: &DomainEvent) -> String {
    match &event.payload {
        EventPayload::Created {
            requester,
            quantity,
            starts_on,
        } => match starts_on {
            Some(date) => format!(
                "{} requested {} day(s) off starting {}",
                requester, quantity, date
            ),
            None => format!("{} requested {} day(s) off", requester, quantity),
        },
        EventPayload::Approved { by, note } => match note {
            Some(note) => format!("Request approved by {}: {}", by, note),
            None => format!("Request approved by {}", by),
        },
        EventPayload::Rejected { by, reason } => {
            format!("Request rejected by {}: {}", by, reason)
        }
        EventPayload::Cancelled { by } => format!("Request cancelled by {}", by),
        EventPayload::Finalized => "Request finalized: no approval required".to_string(),
        EventPayload::CarryoverUsed { days } => {
            format!("{} carryover day(s) applied", days)
        }
    }
}
