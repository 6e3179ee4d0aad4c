//! Ordered policy evaluation
//!
//! Use cases own an explicit, ordered policy list per operation; this
//! evaluator runs it. Evaluation is fail-fast: the first denial ends the
//! pass and later policies never execute. An all-pass outcome names every
//! policy that ran, in order, so audit trails show what was actually
//! checked.

use std::sync::Arc;

use crate::domain::policies::{
    PolicyArgs, PolicyDecision, PolicyFault, PolicySubject, RequestPolicy,
};
use crate::domain::value_objects::Actor;

/// Outcome of one evaluation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyOutcome {
    /// Every policy allowed the action, in this order.
    Allowed { passed: Vec<&'static str> },
    /// A policy denied the action; the ones listed before it had passed.
    Denied {
        policy: &'static str,
        reason: String,
        passed: Vec<&'static str>,
    },
}

impl PolicyOutcome {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

/// Run `policies` in order against one actor and subject.
///
/// A [`PolicyFault`] aborts the pass immediately; it means a policy could
/// not run, not that it said no.
pub fn evaluate(
    actor: &Actor,
    subject: &PolicySubject<'_>,
    args: &PolicyArgs,
    policies: &[Arc<dyn RequestPolicy>],
) -> Result<PolicyOutcome, PolicyFault> {
    let mut passed = Vec::with_capacity(policies.len());
    for policy in policies {
        match policy.check(actor, subject, args)? {
            PolicyDecision::Allow => passed.push(policy.name()),
            PolicyDecision::Deny { reason } => {
                return Ok(PolicyOutcome::Denied {
                    policy: policy.name(),
                    reason,
                    passed,
                });
            }
        }
    }
    Ok(PolicyOutcome::Allowed { passed })
}
