//! # seatbook-cache
//!
//! Lock store implementations for SeatBook. Supports two modes:
//!
//! - **memory**: in-process locks in a [dashmap](https://crates.io/crates/dashmap),
//!   valid for a single node
//! - **redis**: shared locks using `SET NX EX` and a Lua compare-and-delete,
//!   valid across any number of nodes
//!
//! The provider is selected at runtime based on configuration.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::LockStoreManager;
