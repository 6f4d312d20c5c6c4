//! In-memory seat locks using dashmap.
//!
//! Each key's shard lock makes the check-and-set of one seat atomic.
//! Expired entries are left in place and overwritten by the next acquire;
//! the key space is bounded by the fixed inventory. Expiry uses the tokio
//! clock so tests can pause and advance time.

use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::time::Instant;
use tracing::debug;

use seatbook_core::error::AppError;
use seatbook_core::result::AppResult;
use seatbook_core::traits::lock_store::LockStore;
use seatbook_core::types::resource::{HolderId, ResourceId};

use crate::keys;

#[derive(Debug, Clone)]
struct LockEntry {
    holder: HolderId,
    expires_at: Instant,
}

impl LockEntry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

/// In-process lock store for single-node deployments and tests.
#[derive(Debug, Default)]
pub struct MemoryLockStore {
    entries: DashMap<String, LockEntry>,
}

impl MemoryLockStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LockStore for MemoryLockStore {
    async fn try_acquire(
        &self,
        resource_id: &ResourceId,
        holder_id: &HolderId,
        ttl: Duration,
    ) -> AppResult<bool> {
        let now = Instant::now();
        let expires_at = now.checked_add(ttl).ok_or_else(|| {
            AppError::lock_store(format!("Lock TTL of {}s is out of range", ttl.as_secs()))
        })?;
        let fresh = LockEntry {
            holder: holder_id.clone(),
            expires_at,
        };

        let acquired = match self.entries.entry(keys::seat_lock(resource_id)) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().is_live(now) {
                    false
                } else {
                    occupied.insert(fresh);
                    true
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(fresh);
                true
            }
        };

        debug!(resource_id = %resource_id, acquired, "Memory seat lock attempt");
        Ok(acquired)
    }

    async fn release(&self, resource_id: &ResourceId) -> AppResult<()> {
        self.entries.remove(&keys::seat_lock(resource_id));
        Ok(())
    }

    async fn release_if_owner(
        &self,
        resource_id: &ResourceId,
        holder_id: &HolderId,
    ) -> AppResult<bool> {
        let now = Instant::now();
        let removed = self
            .entries
            .remove_if(&keys::seat_lock(resource_id), |_, entry| {
                entry.is_live(now) && entry.holder == *holder_id
            });
        Ok(removed.is_some())
    }

    async fn get_owner(&self, resource_id: &ResourceId) -> AppResult<Option<HolderId>> {
        let now = Instant::now();
        Ok(self
            .entries
            .get(&keys::seat_lock(resource_id))
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.holder.clone()))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
