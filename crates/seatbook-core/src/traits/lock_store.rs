//! Lock store trait: the authoritative record of who holds a seat.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::resource::{HolderId, ResourceId};

/// TTL-capable store with atomic create-if-absent and compare-and-delete.
///
/// Implementations must make `try_acquire` and `release_if_owner` single
/// atomic operations: of N concurrent `try_acquire` calls on one seat,
/// exactly one returns `true`. Entries expire silently once their TTL
/// elapses, so "no owner" means either never held or expired.
///
/// Two implementations are provided:
/// - Redis (`SET NX EX` plus a Lua compare-and-delete), shared across nodes
/// - In-memory (`DashMap` entry locking), for a single node and tests
#[async_trait]
pub trait LockStore: Send + Sync + std::fmt::Debug + 'static {
    /// Create the lock only if none exists. Returns whether this call
    /// created it.
    async fn try_acquire(
        &self,
        resource_id: &ResourceId,
        holder_id: &HolderId,
        ttl: Duration,
    ) -> AppResult<bool>;

    /// Delete the lock unconditionally. A no-op when absent.
    async fn release(&self, resource_id: &ResourceId) -> AppResult<()>;

    /// Delete the lock only if it is currently held by `holder_id`.
    async fn release_if_owner(
        &self,
        resource_id: &ResourceId,
        holder_id: &HolderId,
    ) -> AppResult<bool>;

    /// Current holder, if the lock exists and has not expired.
    async fn get_owner(&self, resource_id: &ResourceId) -> AppResult<Option<HolderId>>;

    /// Current holders for many seats, in the order given.
    async fn get_owners(&self, resource_ids: &[ResourceId]) -> AppResult<Vec<Option<HolderId>>> {
        let mut owners = Vec::with_capacity(resource_ids.len());
        for id in resource_ids {
            owners.push(self.get_owner(id).await?);
        }
        Ok(owners)
    }

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
