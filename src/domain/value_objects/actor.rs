//! Actors and execution context

use serde::{Deserialize, Serialize};

use super::ids::{TenantId, UserId};

/// Something an actor is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// File requests for oneself.
    SubmitRequests,
    /// Approve or reject other people's requests.
    DecideRequests,
    /// Act on behalf of others and bypass ownership checks.
    Administer,
}

/// The identity performing a command.
///
/// Carries everything policies may ask about the caller; there is no
/// ambient session to fall back on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: UserId,
    pub tenant: TenantId,
    #[serde(default)]
    pub capabilities: Vec<Capability>,
}

impl Actor {
    pub fn new(id: UserId, tenant: TenantId) -> Self {
        Self {
            id,
            tenant,
            capabilities: Vec::new(),
        }
    }

    pub fn with_capability(mut self, capability: Capability) -> Self {
        if !self.capabilities.contains(&capability) {
            self.capabilities.push(capability);
        }
        self
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

/// Per-invocation context, passed explicitly into every execution.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// The tenant this invocation is scoped to. Plan rules are resolved for
    /// it and new requests are stamped with it.
    pub tenant: TenantId,
    /// Propagated into event metadata for cross-system tracing.
    pub correlation_id: Option<String>,
}

impl ExecutionContext {
    pub fn new(tenant: TenantId) -> Self {
        Self {
            tenant,
            correlation_id: None,
        }
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }
}
