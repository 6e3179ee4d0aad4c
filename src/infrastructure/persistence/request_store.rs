//! In-memory request store
//!
//! Keeps aggregates behind an async lock and enforces optimistic
//! versioning: a save commits only when the caller's expected version
//! matches the stored one, so of two writers racing from the same snapshot
//! exactly one wins. The loser gets a conflict and nothing is written for
//! it.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::application::ports::outbound::{RequestStorePort, StoreError};
use crate::domain::aggregates::TimeOffRequest;
use crate::domain::value_objects::{RequestId, TenantId, Version};

pub struct InMemoryRequestStore {
    records: RwLock<HashMap<RequestId, TimeOffRequest>>,
}

impl InMemoryRequestStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryRequestStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RequestStorePort for InMemoryRequestStore {
    async fn load(&self, id: RequestId) -> Result<Option<TimeOffRequest>, StoreError> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn save(
        &self,
        request: &TimeOffRequest,
        expected: Version,
    ) -> Result<Version, StoreError> {
        let mut records = self.records.write().await;
        let stored = records
            .get(&request.id())
            .map(|existing| existing.version())
            .unwrap_or_else(Version::unsaved);
        if stored != expected {
            return Err(StoreError::VersionConflict { expected, stored });
        }

        let committed = expected.next();
        let mut saved = request.clone();
        saved.set_version(committed);
        records.insert(saved.id(), saved);
        debug!(request_id = %request.id(), version = %committed, "Request saved");
        Ok(committed)
    }

    async fn list_by_tenant(&self, tenant: TenantId) -> Result<Vec<TimeOffRequest>, StoreError> {
        Ok(self
            .records
            .read()
            .await
            .values()
            .filter(|request| request.tenant() == tenant)
            .cloned()
            .collect())
    }
}
