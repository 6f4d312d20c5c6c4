//! Redis-backed seat locks.
//!
//! Suitable for multi-node deployments: every node shares one authoritative
//! set of locks and Redis serializes the competing commands.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::{debug, info};

use seatbook_core::error::{AppError, ErrorKind};
use seatbook_core::result::AppResult;
use seatbook_core::traits::lock_store::LockStore;
use seatbook_core::types::resource::{HolderId, ResourceId};

use super::client::RedisClient;
use crate::keys;

/// Lua script for atomic compare-and-delete.
///
/// KEYS[1] = lock key
/// ARGV[1] = expected holder
///
/// Returns 1 when the lock was held by ARGV[1] and has been deleted, else 0.
const RELEASE_IF_OWNER_SCRIPT: &str = r#"
    if redis.call('GET', KEYS[1]) == ARGV[1] then
        return redis.call('DEL', KEYS[1])
    end
    return 0
"#;

/// Redis-backed lock store.
#[derive(Debug, Clone)]
pub struct RedisLockStore {
    /// Redis client.
    client: RedisClient,
    /// Pre-hashed compare-and-delete script.
    release_script: redis::Script,
}

impl RedisLockStore {
    /// Create a new Redis lock store.
    pub fn new(client: RedisClient) -> Self {
        Self {
            client,
            release_script: redis::Script::new(RELEASE_IF_OWNER_SCRIPT),
        }
    }

    /// Map a Redis error to an AppError.
    fn map_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::LockStore, format!("Redis error: {e}"), e)
    }

    fn lock_key(&self, resource_id: &ResourceId) -> String {
        self.client.prefixed_key(&keys::seat_lock(resource_id))
    }
}

#[async_trait]
impl LockStore for RedisLockStore {
    async fn try_acquire(
        &self,
        resource_id: &ResourceId,
        holder_id: &HolderId,
        ttl: Duration,
    ) -> AppResult<bool> {
        let key = self.lock_key(resource_id);
        let mut conn = self.client.conn_mut();

        // SET key value EX ttl NX
        let result: Option<String> = redis::cmd("SET")
            .arg(&key)
            .arg(holder_id.as_str())
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .arg("NX")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;

        let acquired = result.is_some();
        debug!(resource_id = %resource_id, acquired, "SET NX on seat lock");
        Ok(acquired)
    }

    async fn release(&self, resource_id: &ResourceId) -> AppResult<()> {
        let key = self.lock_key(resource_id);
        let mut conn = self.client.conn_mut();
        let removed: i64 = conn.del(&key).await.map_err(Self::map_err)?;
        debug!(resource_id = %resource_id, removed, "Seat lock deleted");
        Ok(())
    }

    async fn release_if_owner(
        &self,
        resource_id: &ResourceId,
        holder_id: &HolderId,
    ) -> AppResult<bool> {
        let key = self.lock_key(resource_id);
        let mut conn = self.client.conn_mut();

        let removed: i64 = self
            .release_script
            .key(&key)
            .arg(holder_id.as_str())
            .invoke_async(&mut conn)
            .await
            .map_err(Self::map_err)?;

        if removed == 1 {
            info!(resource_id = %resource_id, holder_id = %holder_id, "Seat lock released by owner");
        }
        Ok(removed == 1)
    }

    async fn get_owner(&self, resource_id: &ResourceId) -> AppResult<Option<HolderId>> {
        let key = self.lock_key(resource_id);
        let mut conn = self.client.conn_mut();
        let value: Option<String> = conn.get(&key).await.map_err(Self::map_err)?;
        Ok(value.map(HolderId::from_raw))
    }

    async fn get_owners(&self, resource_ids: &[ResourceId]) -> AppResult<Vec<Option<HolderId>>> {
        if resource_ids.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = resource_ids.iter().map(|id| self.lock_key(id)).collect();
        let mut conn = self.client.conn_mut();

        let values: Vec<Option<String>> = redis::cmd("MGET")
            .arg(&keys)
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;

        Ok(values
            .into_iter()
            .map(|value| value.map(HolderId::from_raw))
            .collect())
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.client.conn_mut();
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(pong == "PONG")
    }
}
