//! Plan rules directory
//!
//! Serves per-tenant plan rules with a configured default for tenants
//! without an override. The write path never touches this; overrides are an
//! administrative concern.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use crate::application::ports::outbound::{PlanRulesPort, StoreError};
use crate::domain::value_objects::{PlanRules, TenantId};

pub struct InMemoryPlanDirectory {
    default_rules: PlanRules,
    overrides: RwLock<HashMap<TenantId, PlanRules>>,
}

impl InMemoryPlanDirectory {
    pub fn new(default_rules: PlanRules) -> Self {
        Self {
            default_rules,
            overrides: RwLock::new(HashMap::new()),
        }
    }

    /// Install tenant-specific rules, replacing any previous override.
    pub async fn set_override(&self, tenant: TenantId, rules: PlanRules) {
        info!(%tenant, "Plan rules override installed");
        self.overrides.write().await.insert(tenant, rules);
    }
}

#[async_trait]
impl PlanRulesPort for InMemoryPlanDirectory {
    async fn rules_for(&self, tenant: TenantId) -> Result<PlanRules, StoreError> {
        Ok(self
            .overrides
            .read()
            .await
            .get(&tenant)
            .cloned()
            .unwrap_or_else(|| self.default_rules.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::RequestLimit;

    #[tokio::test]
    async fn test_unknown_tenant_gets_the_default() {
        let directory = InMemoryPlanDirectory::new(PlanRules::default());
        let rules = directory.rules_for(TenantId::new()).await.unwrap();
        assert_eq!(rules, PlanRules::default());
    }

    #[tokio::test]
    async fn test_override_shadows_the_default() {
        let directory = InMemoryPlanDirectory::new(PlanRules::default());
        let tenant = TenantId::new();
        let custom = PlanRules::default().with_limit(RequestLimit::Unbounded);

        directory.set_override(tenant, custom.clone()).await;
        assert_eq!(directory.rules_for(tenant).await.unwrap(), custom);
        // other tenants are untouched
        assert_eq!(
            directory.rules_for(TenantId::new()).await.unwrap(),
            PlanRules::default()
        );
    }
}
