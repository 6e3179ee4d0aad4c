//! Time-off request aggregate
//!
//! The request is the only write-model entity in the pipeline. All
//! modifications go through the named operations below: each one checks its
//! preconditions before touching any field, applies the whole change or none
//! of it, and issues exactly one domain event with the aggregate's next
//! sequence number.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::events::{DomainEvent, EventPayload};
use crate::domain::value_objects::{
    DayCount, EventSequence, PlanRules, RequestId, RequestLimit, TenantId, UserId, Version,
};

/// Lifecycle state of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    /// Waiting on a decision (or on auto-finalization).
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl RequestState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for RequestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A precondition an operation refused to proceed without.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainViolation {
    #[error("a request must cover at least one day")]
    EmptyRequest,
    #[error("requested {requested} days but the plan allows at most {limit} per request")]
    OverPlanLimit {
        requested: DayCount,
        limit: RequestLimit,
    },
    #[error("request is already {0} and can no longer be decided")]
    AlreadyDecided(RequestState),
    #[error("a rejection needs a reason")]
    MissingReason,
    #[error("request is {0} and cannot be cancelled")]
    NotCancellable(RequestState),
    #[error("the plan requires a decision; the request cannot finalize itself")]
    ApprovalRequired,
    #[error("carryover cannot be spent before the request is approved")]
    CarryoverBeforeApproval,
    #[error("carryover allowance exhausted: {remaining} of {allowance} days remain")]
    CarryoverExhausted {
        remaining: DayCount,
        allowance: DayCount,
    },
}

impl DomainViolation {
    /// The command field a caller should correct.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyRequest | Self::OverPlanLimit { .. } => "quantity",
            Self::MissingReason => "reason",
            Self::CarryoverBeforeApproval | Self::CarryoverExhausted { .. } => "days",
            Self::AlreadyDecided(_) | Self::NotCancellable(_) | Self::ApprovalRequired => {
                "request_id"
            }
        }
    }
}

/// A request for a quantity of days off, owned by one requester within one
/// tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeOffRequest {
    id: RequestId,
    tenant: TenantId,
    requester: UserId,
    quantity: DayCount,
    starts_on: Option<NaiveDate>,
    note: Option<String>,
    state: RequestState,
    decided_by: Option<UserId>,
    decision_note: Option<String>,
    carryover_used: DayCount,
    submitted_at: DateTime<Utc>,
    decided_at: Option<DateTime<Utc>>,
    version: Version,
    event_sequence: EventSequence,
}

impl TimeOffRequest {
    /// Open a new pending request.
    ///
    /// # Invariants
    /// - Quantity must be at least one day
    /// - Quantity must fit the plan's per-request limit
    pub fn open(
        tenant: TenantId,
        requester: UserId,
        quantity: DayCount,
        starts_on: Option<NaiveDate>,
        note: Option<String>,
        rules: &PlanRules,
    ) -> Result<(Self, DomainEvent), DomainViolation> {
        if quantity.is_zero() {
            return Err(DomainViolation::EmptyRequest);
        }
        if !rules.limit.allows(quantity) {
            return Err(DomainViolation::OverPlanLimit {
                requested: quantity,
                limit: rules.limit,
            });
        }
        let mut request = Self {
            id: RequestId::new(),
            tenant,
            requester,
            quantity,
            starts_on,
            note,
            state: RequestState::Pending,
            decided_by: None,
            decision_note: None,
            carryover_used: DayCount::ZERO,
            submitted_at: Utc::now(),
            decided_at: None,
            version: Version::unsaved(),
            event_sequence: EventSequence::start(),
        };
        let event = request.issue(EventPayload::Created {
            requester,
            quantity,
            starts_on: request.starts_on,
        });
        Ok((request, event))
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Approve a pending request.
    ///
    /// # Invariants
    /// - Only pending requests can be decided
    pub fn approve(
        &mut self,
        by: UserId,
        note: Option<String>,
    ) -> Result<DomainEvent, DomainViolation> {
        if self.state != RequestState::Pending {
            return Err(DomainViolation::AlreadyDecided(self.state));
        }
        self.state = RequestState::Approved;
        self.decided_by = Some(by);
        self.decision_note = note;
        self.decided_at = Some(Utc::now());
        Ok(self.issue(EventPayload::Approved {
            by,
            note: self.decision_note.clone(),
        }))
    }

    /// Reject a pending request with a reason.
    ///
    /// # Invariants
    /// - Only pending requests can be decided
    /// - The reason must not be blank
    pub fn reject(&mut self, by: UserId, reason: String) -> Result<DomainEvent, DomainViolation> {
        if reason.trim().is_empty() {
            return Err(DomainViolation::MissingReason);
        }
        if self.state != RequestState::Pending {
            return Err(DomainViolation::AlreadyDecided(self.state));
        }
        self.state = RequestState::Rejected;
        self.decided_by = Some(by);
        self.decision_note = Some(reason.clone());
        self.decided_at = Some(Utc::now());
        Ok(self.issue(EventPayload::Rejected { by, reason }))
    }

    /// Cancel a request that has not been rejected or cancelled already.
    pub fn cancel(&mut self, by: UserId) -> Result<DomainEvent, DomainViolation> {
        match self.state {
            RequestState::Pending | RequestState::Approved => {}
            other => return Err(DomainViolation::NotCancellable(other)),
        }
        self.state = RequestState::Cancelled;
        Ok(self.issue(EventPayload::Cancelled { by }))
    }

    /// Finalize a pending request under a plan that needs no decision. The
    /// request becomes effective without anyone having decided it.
    pub fn finalize(&mut self, rules: &PlanRules) -> Result<DomainEvent, DomainViolation> {
        if rules.requires_approval {
            return Err(DomainViolation::ApprovalRequired);
        }
        if self.state != RequestState::Pending {
            return Err(DomainViolation::AlreadyDecided(self.state));
        }
        self.state = RequestState::Approved;
        self.decided_at = Some(Utc::now());
        Ok(self.issue(EventPayload::Finalized))
    }

    /// Spend carryover days against this request.
    ///
    /// # Invariants
    /// - Only approved requests can spend carryover
    /// - Total spend never exceeds the plan's allowance
    pub fn use_carryover(
        &mut self,
        days: DayCount,
        rules: &PlanRules,
    ) -> Result<DomainEvent, DomainViolation> {
        if self.state != RequestState::Approved {
            return Err(DomainViolation::CarryoverBeforeApproval);
        }
        let exhausted = DomainViolation::CarryoverExhausted {
            remaining: rules.carryover_allowance.saturating_sub(self.carryover_used),
            allowance: rules.carryover_allowance,
        };
        let total = self.carryover_used.checked_add(days).ok_or(exhausted.clone())?;
        if total > rules.carryover_allowance {
            return Err(exhausted);
        }
        self.carryover_used = total;
        Ok(self.issue(EventPayload::CarryoverUsed { days }))
    }

    /// Record one event against this aggregate, advancing the sequence.
    fn issue(&mut self, payload: EventPayload) -> DomainEvent {
        self.event_sequence = self.event_sequence.next();
        DomainEvent::new(self.id, self.event_sequence, payload)
    }

    /// Stamp the version a store committed. Only adapters call this, right
    /// after a successful save.
    pub(crate) fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn tenant(&self) -> TenantId {
        self.tenant
    }

    pub fn requester(&self) -> UserId {
        self.requester
    }

    pub fn quantity(&self) -> DayCount {
        self.quantity
    }

    pub fn starts_on(&self) -> Option<NaiveDate> {
        self.starts_on
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    pub fn decided_by(&self) -> Option<UserId> {
        self.decided_by
    }

    pub fn decision_note(&self) -> Option<&str> {
        self.decision_note.as_deref()
    }

    pub fn carryover_used(&self) -> DayCount {
        self.carryover_used
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    pub fn decided_at(&self) -> Option<DateTime<Utc>> {
        self.decided_at
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// Sequence of the most recently issued event.
    pub fn last_event_sequence(&self) -> EventSequence {
        self.event_sequence
    }

    pub fn is_pending(&self) -> bool {
        self.state == RequestState::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_request(rules: &PlanRules) -> TimeOffRequest {
        let (request, _) = TimeOffRequest::open(
            TenantId::new(),
            UserId::new(),
            DayCount::new(3),
            None,
            None,
            rules,
        )
        .unwrap();
        request
    }

    #[test]
    fn test_open_issues_created_with_sequence_one() {
        let rules = PlanRules::default();
        let (request, event) = TimeOffRequest::open(
            TenantId::new(),
            UserId::new(),
            DayCount::new(3),
            None,
            Some("trip".to_string()),
            &rules,
        )
        .unwrap();

        assert_eq!(request.state(), RequestState::Pending);
        assert_eq!(request.version(), Version::unsaved());
        assert_eq!(event.sequence.get(), 1);
        assert_eq!(event.request_id, request.id());
        assert!(matches!(
            event.payload,
            EventPayload::Created { quantity, .. } if quantity == DayCount::new(3)
        ));
    }

    #[test]
    fn test_open_rejects_zero_days() {
        let rules = PlanRules::default();
        let result = TimeOffRequest::open(
            TenantId::new(),
            UserId::new(),
            DayCount::ZERO,
            None,
            None,
            &rules,
        );
        assert_eq!(result.unwrap_err(), DomainViolation::EmptyRequest);
    }

    #[test]
    fn test_open_enforces_plan_limit() {
        let rules = PlanRules::default().with_limit(RequestLimit::Days(2));
        let result = TimeOffRequest::open(
            TenantId::new(),
            UserId::new(),
            DayCount::new(3),
            None,
            None,
            &rules,
        );
        let violation = result.unwrap_err();
        assert!(matches!(violation, DomainViolation::OverPlanLimit { .. }));
        assert_eq!(violation.field(), "quantity");
    }

    #[test]
    fn test_approve_only_once() {
        let rules = PlanRules::default();
        let mut request = open_request(&rules);
        let approver = UserId::new();

        let event = request.approve(approver, None).unwrap();
        assert_eq!(request.state(), RequestState::Approved);
        assert_eq!(request.decided_by(), Some(approver));
        assert_eq!(event.sequence.get(), 2);

        let second = request.approve(UserId::new(), None);
        assert_eq!(
            second.unwrap_err(),
            DomainViolation::AlreadyDecided(RequestState::Approved)
        );
    }

    #[test]
    fn test_reject_needs_a_reason() {
        let rules = PlanRules::default();
        let mut request = open_request(&rules);
        assert_eq!(
            request.reject(UserId::new(), "   ".to_string()).unwrap_err(),
            DomainViolation::MissingReason
        );
        // the failed attempt must leave no trace
        assert_eq!(request.state(), RequestState::Pending);
        assert_eq!(request.last_event_sequence().get(), 1);

        request.reject(UserId::new(), "blackout week".to_string()).unwrap();
        assert_eq!(request.state(), RequestState::Rejected);
        assert_eq!(request.decision_note(), Some("blackout week"));
    }

    #[test]
    fn test_cancel_allowed_while_pending_or_approved() {
        let rules = PlanRules::default();
        let mut pending = open_request(&rules);
        pending.cancel(pending.requester()).unwrap();
        assert_eq!(pending.state(), RequestState::Cancelled);

        let mut approved = open_request(&rules);
        approved.approve(UserId::new(), None).unwrap();
        approved.cancel(approved.requester()).unwrap();
        assert_eq!(approved.state(), RequestState::Cancelled);

        let mut rejected = open_request(&rules);
        rejected.reject(UserId::new(), "no".to_string()).unwrap();
        assert_eq!(
            rejected.cancel(rejected.requester()).unwrap_err(),
            DomainViolation::NotCancellable(RequestState::Rejected)
        );
    }

    #[test]
    fn test_finalize_refused_when_plan_requires_approval() {
        let rules = PlanRules::default();
        let mut request = open_request(&rules);
        assert_eq!(
            request.finalize(&rules).unwrap_err(),
            DomainViolation::ApprovalRequired
        );
    }

    #[test]
    fn test_finalize_approves_without_decider() {
        let rules = PlanRules::default().without_approval();
        let mut request = open_request(&rules);
        let event = request.finalize(&rules).unwrap();

        assert_eq!(request.state(), RequestState::Approved);
        assert_eq!(request.decided_by(), None);
        assert_eq!(event.payload, EventPayload::Finalized);
        assert_eq!(event.sequence.get(), 2);
    }

    #[test]
    fn test_carryover_needs_approval_first() {
        let rules = PlanRules::default();
        let mut request = open_request(&rules);
        assert_eq!(
            request.use_carryover(DayCount::new(1), &rules).unwrap_err(),
            DomainViolation::CarryoverBeforeApproval
        );
    }

    #[test]
    fn test_carryover_accumulates_up_to_allowance() {
        let rules = PlanRules::default().with_carryover(DayCount::new(5));
        let mut request = open_request(&rules);
        request.approve(UserId::new(), None).unwrap();

        request.use_carryover(DayCount::new(3), &rules).unwrap();
        request.use_carryover(DayCount::new(2), &rules).unwrap();
        assert_eq!(request.carryover_used(), DayCount::new(5));

        let over = request.use_carryover(DayCount::new(1), &rules).unwrap_err();
        assert!(matches!(
            over,
            DomainViolation::CarryoverExhausted { remaining, .. } if remaining == DayCount::ZERO
        ));
        // rejected spend leaves the total untouched
        assert_eq!(request.carryover_used(), DayCount::new(5));
    }

    #[test]
    fn test_sequence_advances_once_per_operation() {
        let rules = PlanRules::default().with_carryover(DayCount::new(5));
        let mut request = open_request(&rules);
        assert_eq!(request.last_event_sequence().get(), 1);

        request.approve(UserId::new(), None).unwrap();
        assert_eq!(request.last_event_sequence().get(), 2);

        request.use_carryover(DayCount::new(1), &rules).unwrap();
        assert_eq!(request.last_event_sequence().get(), 3);
    }
}
