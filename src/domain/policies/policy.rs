//! Policy contract
//!
//! A policy is a named, stateless predicate over an actor and a subject.
//! Policies read state and answer; they never mutate anything. New rules
//! are added by implementing [`RequestPolicy`], not by editing a central
//! evaluator.

use thiserror::Error;

use crate::domain::aggregates::TimeOffRequest;
use crate::domain::value_objects::{Actor, PlanRules, TenantId, UserId};

/// What a policy evaluates against.
#[derive(Debug, Clone, Copy)]
pub struct PolicySubject<'a> {
    /// The tenant the invocation is scoped to.
    pub tenant: TenantId,
    /// Plan rules resolved for that tenant.
    pub rules: &'a PlanRules,
    /// The request under consideration; absent for operations that create
    /// one.
    pub request: Option<&'a TimeOffRequest>,
}

/// Inputs a policy may consult beyond actor and subject.
#[derive(Debug, Clone, Default)]
pub struct PolicyArgs {
    /// Set when the command files a request for someone other than the
    /// actor.
    pub on_behalf_of: Option<UserId>,
}

/// Verdict of a single policy check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyDecision {
    Allow,
    Deny { reason: String },
}

impl PolicyDecision {
    pub fn deny(reason: impl Into<String>) -> Self {
        Self::Deny {
            reason: reason.into(),
        }
    }
}

/// A policy implementation failure. Not a business denial: the check could
/// not run at all, and the invocation that hit it must abort.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyFault {
    #[error("policy '{policy}' needs a request subject but none was resolved")]
    MissingRequest { policy: &'static str },
}

/// One named rule in the authorization chain.
pub trait RequestPolicy: Send + Sync {
    /// Stable name used in audit reports and denial results.
    fn name(&self) -> &'static str;

    fn check(
        &self,
        actor: &Actor,
        subject: &PolicySubject<'_>,
        args: &PolicyArgs,
    ) -> Result<PolicyDecision, PolicyFault>;
}
