use async_trait::async_trait;

use crate::domain::aggregates::TimeOffRequest;
use crate::domain::value_objects::{RequestId, TenantId, Version};

#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// The caller's expected version no longer matches what is stored.
    /// Nothing was written; re-running the whole execution is the remedy.
    #[error("version conflict: expected {expected}, stored {stored}")]
    VersionConflict { expected: Version, stored: Version },
    #[error("store backend failure: {0}")]
    Backend(String),
}

/// Persistence port for request aggregates.
///
/// `save` is a compare-and-swap on the stored version: it commits only when
/// `expected` matches what the store holds (`Version::unsaved` for a new
/// aggregate) and returns the committed version. Of two racing writers that
/// loaded the same version, exactly one wins. Loaded aggregates carry their
/// persisted version.
#[async_trait]
pub trait RequestStorePort: Send + Sync {
    async fn load(&self, id: RequestId) -> Result<Option<TimeOffRequest>, StoreError>;

    async fn save(
        &self,
        request: &TimeOffRequest,
        expected: Version,
    ) -> Result<Version, StoreError>;

    /// Snapshot of a tenant's requests for the read side. May trail
    /// executions that have not committed yet.
    async fn list_by_tenant(&self, tenant: TenantId) -> Result<Vec<TimeOffRequest>, StoreError>;
}
