//! Redis lock store.

pub mod client;
pub mod lock;

pub use client::RedisClient;
pub use lock::RedisLockStore;
