//! Read-model views
//!
//! Views are derived, serialization-ready projections of a request. They
//! expose exactly the fields listed here; anything optional comes out as an
//! explicit absent marker or a declared default, never as a missing key
//! surprise.

use serde::{Deserialize, Serialize};

/// What callers see of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestView {
    pub id: String,
    pub requester: String,
    pub state: String,
    pub quantity: u32,
    /// ISO date, absent when the request has no start date yet.
    pub starts_on: Option<String>,
    /// Requester's note; empty string when none was given.
    pub note: String,
    /// RFC 3339 submission timestamp.
    pub submitted_at: String,
    /// Who decided; absent while pending and for auto-finalized requests.
    pub decided_by: Option<String>,
    pub decision_note: Option<String>,
    pub carryover_used: u32,
    /// True while the request waits on a decision the plan requires.
    pub awaiting_approval: bool,
    /// The plan's per-request cap; absent when the plan is unbounded.
    pub plan_limit: Option<u32>,
    /// Persisted version at presentation time.
    pub version: u64,
}
