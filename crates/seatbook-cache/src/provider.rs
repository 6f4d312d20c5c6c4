//! Lock store manager that dispatches to the configured provider.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use seatbook_core::config::LockStoreConfig;
use seatbook_core::error::AppError;
use seatbook_core::result::AppResult;
use seatbook_core::traits::lock_store::LockStore;
use seatbook_core::types::resource::{HolderId, ResourceId};

/// Lock store manager that wraps the configured provider.
///
/// The provider is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct LockStoreManager {
    /// The inner lock store.
    inner: Arc<dyn LockStore>,
    /// Name of the selected provider.
    provider: &'static str,
}

impl LockStoreManager {
    /// Create a new lock store manager from configuration.
    pub async fn new(config: &LockStoreConfig) -> AppResult<Self> {
        let (inner, provider): (Arc<dyn LockStore>, &'static str) =
            match config.provider.as_str() {
                #[cfg(feature = "redis-backend")]
                "redis" => {
                    info!("Initializing Redis lock store");
                    let client = crate::redis::RedisClient::connect(&config.redis).await?;
                    (Arc::new(crate::redis::RedisLockStore::new(client)), "redis")
                }
                #[cfg(feature = "memory")]
                "memory" => {
                    info!("Initializing in-memory lock store (single node only)");
                    (Arc::new(crate::memory::MemoryLockStore::new()), "memory")
                }
                other => {
                    return Err(AppError::configuration(format!(
                        "Unknown lock store provider: '{other}'. Supported: memory, redis"
                    )));
                }
            };

        Ok(Self { inner, provider })
    }

    /// Create a manager from an existing store (for testing).
    pub fn from_store(store: Arc<dyn LockStore>) -> Self {
        Self {
            inner: store,
            provider: "custom",
        }
    }

    /// Name of the active provider.
    pub fn provider_name(&self) -> &'static str {
        self.provider
    }
}

#[async_trait]
impl LockStore for LockStoreManager {
    async fn try_acquire(
        &self,
        resource_id: &ResourceId,
        holder_id: &HolderId,
        ttl: Duration,
    ) -> AppResult<bool> {
        self.inner.try_acquire(resource_id, holder_id, ttl).await
    }

    async fn release(&self, resource_id: &ResourceId) -> AppResult<()> {
        self.inner.release(resource_id).await
    }

    async fn release_if_owner(
        &self,
        resource_id: &ResourceId,
        holder_id: &HolderId,
    ) -> AppResult<bool> {
        self.inner.release_if_owner(resource_id, holder_id).await
    }

    async fn get_owner(&self, resource_id: &ResourceId) -> AppResult<Option<HolderId>> {
        self.inner.get_owner(resource_id).await
    }

    async fn get_owners(&self, resource_ids: &[ResourceId]) -> AppResult<Vec<Option<HolderId>>> {
        self.inner.get_owners(resource_ids).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}
