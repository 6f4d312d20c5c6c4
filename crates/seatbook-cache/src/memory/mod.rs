//! In-memory lock store.

pub mod store;

pub use store::MemoryLockStore;
