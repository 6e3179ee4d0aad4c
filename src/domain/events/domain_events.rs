//! Domain events - Immutable records of committed state changes
//!
//! Events are issued by aggregate operations and published only after the
//! owning mutation commits. Subscribers never get a fact that was rolled
//! back, and a request's events always arrive in sequence order.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{DayCount, EventSequence, RequestId, UserId};

/// Base data for all events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMetadata {
    /// When the event occurred
    pub occurred_at: DateTime<Utc>,
    /// Optional correlation ID for tracing
    pub correlation_id: Option<String>,
}

impl Default for EventMetadata {
    fn default() -> Self {
        Self {
            occurred_at: Utc::now(),
            correlation_id: None,
        }
    }
}

/// What happened to a request, with the data captured at mutation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum EventPayload {
    Created {
        requester: UserId,
        quantity: DayCount,
        starts_on: Option<NaiveDate>,
    },
    Approved {
        by: UserId,
        note: Option<String>,
    },
    Rejected {
        by: UserId,
        reason: String,
    },
    Cancelled {
        by: UserId,
    },
    /// The plan did not require a decision, so the request took effect on
    /// its own.
    Finalized,
    CarryoverUsed {
        days: DayCount,
    },
}

impl EventPayload {
    /// Stable event name for routing, logs and audit trails.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Created { .. } => "created",
            Self::Approved { .. } => "approved",
            Self::Rejected { .. } => "rejected",
            Self::Cancelled { .. } => "cancelled",
            Self::Finalized => "finalized",
            Self::CarryoverUsed { .. } => "carryover_used",
        }
    }
}

/// One immutable fact about one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    pub metadata: EventMetadata,
    /// The request the fact is about.
    pub request_id: RequestId,
    /// Position in that request's history, starting at 1. Consumers can
    /// order and de-duplicate on this.
    pub sequence: EventSequence,
    pub payload: EventPayload,
}

impl DomainEvent {
    pub fn new(request_id: RequestId, sequence: EventSequence, payload: EventPayload) -> Self {
        Self {
            metadata: EventMetadata::default(),
            request_id,
            sequence,
            payload,
        }
    }

    pub fn name(&self) -> &'static str {
        self.payload.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_names_are_stable() {
        let payload = EventPayload::Created {
            requester: UserId::new(),
            quantity: DayCount::new(3),
            starts_on: None,
        };
        assert_eq!(payload.name(), "created");
        assert_eq!(EventPayload::Finalized.name(), "finalized");
    }

    #[test]
    fn test_event_serializes_with_payload_name_tag() {
        let event = DomainEvent::new(
            RequestId::new(),
            EventSequence::start().next(),
            EventPayload::CarryoverUsed {
                days: DayCount::new(2),
            },
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["payload"]["name"], "carryover_used");
        assert_eq!(json["payload"]["days"], 2);
        assert_eq!(json["sequence"], 1);
    }
}
