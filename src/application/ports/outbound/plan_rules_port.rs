use async_trait::async_trait;

use crate::domain::value_objects::{PlanRules, TenantId};

use super::store_port::StoreError;

/// Read-only source of the plan rules a tenant is governed by.
///
/// Every tenant resolves to some rules; directories fall back to a default
/// plan rather than report an unknown tenant.
#[async_trait]
pub trait PlanRulesPort: Send + Sync {
    async fn rules_for(&self, tenant: TenantId) -> Result<PlanRules, StoreError>;
}
