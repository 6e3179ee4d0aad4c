//! The standard policy set
//!
//! Each policy guards one rule and nothing else; use cases compose them in
//! the order they should run.

use super::policy::{PolicyArgs, PolicyDecision, PolicyFault, PolicySubject, RequestPolicy};
use crate::domain::value_objects::{Actor, Capability};

/// The time-off feature must be switched on in the tenant's plan.
pub struct FeatureEnabled;

impl RequestPolicy for FeatureEnabled {
    fn name(&self) -> &'static str {
        "enabled"
    }

    fn check(
        &self,
        _actor: &Actor,
        subject: &PolicySubject<'_>,
        _args: &PolicyArgs,
    ) -> Result<PolicyDecision, PolicyFault> {
        if subject.rules.enabled {
            Ok(PolicyDecision::Allow)
        } else {
            Ok(PolicyDecision::deny("time off is not enabled for this plan"))
        }
    }
}

/// Actor, invocation scope and request must all belong to the same tenant.
pub struct TenantBoundary;

impl RequestPolicy for TenantBoundary {
    fn name(&self) -> &'static str {
        "tenant_boundary"
    }

    fn check(
        &self,
        actor: &Actor,
        subject: &PolicySubject<'_>,
        _args: &PolicyArgs,
    ) -> Result<PolicyDecision, PolicyFault> {
        if actor.tenant != subject.tenant {
            return Ok(PolicyDecision::deny("actor belongs to another tenant"));
        }
        if let Some(request) = subject.request {
            if request.tenant() != subject.tenant {
                return Ok(PolicyDecision::deny("request belongs to another tenant"));
            }
        }
        Ok(PolicyDecision::Allow)
    }
}

/// Actor may file requests. Filing for someone else needs `Administer`.
pub struct CanRequest;

impl RequestPolicy for CanRequest {
    fn name(&self) -> &'static str {
        "can_request"
    }

    fn check(
        &self,
        actor: &Actor,
        _subject: &PolicySubject<'_>,
        args: &PolicyArgs,
    ) -> Result<PolicyDecision, PolicyFault> {
        if !actor.can(Capability::SubmitRequests) {
            return Ok(PolicyDecision::deny("not authorized"));
        }
        if let Some(target) = args.on_behalf_of {
            if target != actor.id && !actor.can(Capability::Administer) {
                return Ok(PolicyDecision::deny(
                    "filing for another user requires an administrator",
                ));
            }
        }
        Ok(PolicyDecision::Allow)
    }
}

/// Actor may decide requests, and never their own.
pub struct CanDecide;

impl RequestPolicy for CanDecide {
    fn name(&self) -> &'static str {
        "can_decide"
    }

    fn check(
        &self,
        actor: &Actor,
        subject: &PolicySubject<'_>,
        _args: &PolicyArgs,
    ) -> Result<PolicyDecision, PolicyFault> {
        let request = subject.request.ok_or(PolicyFault::MissingRequest {
            policy: self.name(),
        })?;
        if !actor.can(Capability::DecideRequests) {
            return Ok(PolicyDecision::deny("not authorized to decide requests"));
        }
        if request.requester() == actor.id {
            return Ok(PolicyDecision::deny(
                "requests cannot be decided by their requester",
            ));
        }
        Ok(PolicyDecision::Allow)
    }
}

/// The request belongs to the actor, or the actor is an administrator.
pub struct OwnRequest;

impl RequestPolicy for OwnRequest {
    fn name(&self) -> &'static str {
        "own_request"
    }

    fn check(
        &self,
        actor: &Actor,
        subject: &PolicySubject<'_>,
        _args: &PolicyArgs,
    ) -> Result<PolicyDecision, PolicyFault> {
        let request = subject.request.ok_or(PolicyFault::MissingRequest {
            policy: self.name(),
        })?;
        if request.requester() == actor.id || actor.can(Capability::Administer) {
            Ok(PolicyDecision::Allow)
        } else {
            Ok(PolicyDecision::deny("request belongs to someone else"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::TimeOffRequest;
    use crate::domain::value_objects::{DayCount, PlanRules, TenantId, UserId};

    fn request_for(tenant: TenantId, requester: UserId, rules: &PlanRules) -> TimeOffRequest {
        TimeOffRequest::open(tenant, requester, DayCount::new(2), None, None, rules)
            .unwrap()
            .0
    }

    #[test]
    fn test_feature_enabled_follows_plan_flag() {
        let tenant = TenantId::new();
        let actor = Actor::new(UserId::new(), tenant);
        let on = PlanRules::default();
        let off = PlanRules::disabled();

        let subject = PolicySubject {
            tenant,
            rules: &on,
            request: None,
        };
        assert_eq!(
            FeatureEnabled.check(&actor, &subject, &PolicyArgs::default()),
            Ok(PolicyDecision::Allow)
        );

        let subject = PolicySubject {
            tenant,
            rules: &off,
            request: None,
        };
        assert!(matches!(
            FeatureEnabled.check(&actor, &subject, &PolicyArgs::default()),
            Ok(PolicyDecision::Deny { .. })
        ));
    }

    #[test]
    fn test_tenant_boundary_rejects_foreign_actor() {
        let tenant = TenantId::new();
        let rules = PlanRules::default();
        let foreign = Actor::new(UserId::new(), TenantId::new());
        let subject = PolicySubject {
            tenant,
            rules: &rules,
            request: None,
        };
        assert!(matches!(
            TenantBoundary.check(&foreign, &subject, &PolicyArgs::default()),
            Ok(PolicyDecision::Deny { .. })
        ));
    }

    #[test]
    fn test_tenant_boundary_rejects_foreign_request() {
        let tenant = TenantId::new();
        let rules = PlanRules::default();
        let actor = Actor::new(UserId::new(), tenant);
        let foreign_request = request_for(TenantId::new(), UserId::new(), &rules);
        let subject = PolicySubject {
            tenant,
            rules: &rules,
            request: Some(&foreign_request),
        };
        assert!(matches!(
            TenantBoundary.check(&actor, &subject, &PolicyArgs::default()),
            Ok(PolicyDecision::Deny { .. })
        ));
    }

    #[test]
    fn test_can_request_denies_without_capability() {
        let tenant = TenantId::new();
        let rules = PlanRules::default();
        let actor = Actor::new(UserId::new(), tenant);
        let subject = PolicySubject {
            tenant,
            rules: &rules,
            request: None,
        };
        let decision = CanRequest
            .check(&actor, &subject, &PolicyArgs::default())
            .unwrap();
        assert_eq!(decision, PolicyDecision::deny("not authorized"));
    }

    #[test]
    fn test_can_request_on_behalf_needs_administer() {
        let tenant = TenantId::new();
        let rules = PlanRules::default();
        let subject = PolicySubject {
            tenant,
            rules: &rules,
            request: None,
        };
        let args = PolicyArgs {
            on_behalf_of: Some(UserId::new()),
        };

        let plain = Actor::new(UserId::new(), tenant).with_capability(Capability::SubmitRequests);
        assert!(matches!(
            CanRequest.check(&plain, &subject, &args),
            Ok(PolicyDecision::Deny { .. })
        ));

        let admin = plain.clone().with_capability(Capability::Administer);
        assert_eq!(
            CanRequest.check(&admin, &subject, &args),
            Ok(PolicyDecision::Allow)
        );
    }

    #[test]
    fn test_can_decide_blocks_self_approval() {
        let tenant = TenantId::new();
        let rules = PlanRules::default();
        let requester = UserId::new();
        let request = request_for(tenant, requester, &rules);
        let subject = PolicySubject {
            tenant,
            rules: &rules,
            request: Some(&request),
        };

        let own = Actor::new(requester, tenant).with_capability(Capability::DecideRequests);
        assert!(matches!(
            CanDecide.check(&own, &subject, &PolicyArgs::default()),
            Ok(PolicyDecision::Deny { .. })
        ));

        let other = Actor::new(UserId::new(), tenant).with_capability(Capability::DecideRequests);
        assert_eq!(
            CanDecide.check(&other, &subject, &PolicyArgs::default()),
            Ok(PolicyDecision::Allow)
        );
    }

    #[test]
    fn test_can_decide_without_request_is_a_fault() {
        let tenant = TenantId::new();
        let rules = PlanRules::default();
        let actor = Actor::new(UserId::new(), tenant);
        let subject = PolicySubject {
            tenant,
            rules: &rules,
            request: None,
        };
        assert_eq!(
            CanDecide.check(&actor, &subject, &PolicyArgs::default()),
            Err(PolicyFault::MissingRequest {
                policy: "can_decide"
            })
        );
    }

    #[test]
    fn test_own_request_admits_owner_and_admin() {
        let tenant = TenantId::new();
        let rules = PlanRules::default();
        let requester = UserId::new();
        let request = request_for(tenant, requester, &rules);
        let subject = PolicySubject {
            tenant,
            rules: &rules,
            request: Some(&request),
        };

        let owner = Actor::new(requester, tenant);
        assert_eq!(
            OwnRequest.check(&owner, &subject, &PolicyArgs::default()),
            Ok(PolicyDecision::Allow)
        );

        let stranger = Actor::new(UserId::new(), tenant);
        assert!(matches!(
            OwnRequest.check(&stranger, &subject, &PolicyArgs::default()),
            Ok(PolicyDecision::Deny { .. })
        ));

        let admin = Actor::new(UserId::new(), tenant).with_capability(Capability::Administer);
        assert_eq!(
            OwnRequest.check(&admin, &subject, &PolicyArgs::default()),
            Ok(PolicyDecision::Allow)
        );
    }
}
