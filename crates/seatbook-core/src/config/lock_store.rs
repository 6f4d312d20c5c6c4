//! Lock store provider configuration.

use serde::{Deserialize, Serialize};

/// Lock store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockStoreConfig {
    /// Provider type: `"memory"` (single node) or `"redis"` (shared).
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Redis-specific settings.
    #[serde(default)]
    pub redis: RedisLockConfig,
}

impl Default for LockStoreConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            redis: RedisLockConfig::default(),
        }
    }
}

/// Redis lock store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisLockConfig {
    /// Redis connection URL.
    #[serde(default = "default_redis_url")]
    pub url: String,
    /// Prefix applied to every lock key.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for RedisLockConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            key_prefix: default_key_prefix(),
        }
    }
}

fn default_provider() -> String {
    "memory".to_string()
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_key_prefix() -> String {
    "seatbook:".to_string()
}
