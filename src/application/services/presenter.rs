//! Request presentation
//!
//! A pure function from post-mutation aggregate state (plus the tenant's
//! plan rules) to the read model. Presentation never fails and never
//! touches a port: given the same request and rules it always produces the
//! same view.

use crate::application::dto::RequestView;
use crate::domain::aggregates::TimeOffRequest;
use crate::domain::value_objects::PlanRules;

pub struct RequestPresenter;

impl RequestPresenter {
    pub fn present(request: &TimeOffRequest, rules: &PlanRules) -> RequestView {
        RequestView {
            id: request.id().to_string(),
            requester: request.requester().to_string(),
            state: request.state().as_str().to_string(),
            quantity: request.quantity().get(),
            starts_on: request.starts_on().map(|date| date.to_string()),
            note: request.note().unwrap_or_default().to_string(),
            submitted_at: request.submitted_at().to_rfc3339(),
            decided_by: request.decided_by().map(|user| user.to_string()),
            decision_note: request.decision_note().map(str::to_string),
            carryover_used: request.carryover_used().get(),
            awaiting_approval: request.is_pending() && rules.requires_approval,
            plan_limit: rules.limit.days(),
            version: request.version().get(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{DayCount, RequestLimit, TenantId, UserId};

    fn sample(rules: &PlanRules) -> TimeOffRequest {
        TimeOffRequest::open(
            TenantId::new(),
            UserId::new(),
            DayCount::new(3),
            None,
            None,
            rules,
        )
        .unwrap()
        .0
    }

    #[test]
    fn test_absent_optionals_use_declared_markers() {
        let rules = PlanRules::default();
        let view = RequestPresenter::present(&sample(&rules), &rules);

        assert_eq!(view.note, "");
        assert_eq!(view.starts_on, None);
        assert_eq!(view.decided_by, None);
        assert_eq!(view.state, "pending");
        assert!(view.awaiting_approval);
    }

    #[test]
    fn test_unbounded_plan_presents_no_limit() {
        let rules = PlanRules::default().with_limit(RequestLimit::Unbounded);
        let view = RequestPresenter::present(&sample(&rules), &rules);
        assert_eq!(view.plan_limit, None);

        let capped = PlanRules::default().with_limit(RequestLimit::Days(10));
        let view = RequestPresenter::present(&sample(&capped), &capped);
        assert_eq!(view.plan_limit, Some(10));
    }

    #[test]
    fn test_presentation_is_idempotent() {
        let rules = PlanRules::default();
        let request = sample(&rules);
        let first = RequestPresenter::present(&request, &rules);
        let second = RequestPresenter::present(&request, &rules);
        assert_eq!(first, second);
    }

    #[test]
    fn test_auto_finalized_request_shows_no_decider() {
        let rules = PlanRules::default().without_approval();
        let mut request = sample(&rules);
        request.finalize(&rules).unwrap();

        let view = RequestPresenter::present(&request, &rules);
        assert_eq!(view.state, "approved");
        assert_eq!(view.decided_by, None);
        assert!(!view.awaiting_approval);
    }
}
