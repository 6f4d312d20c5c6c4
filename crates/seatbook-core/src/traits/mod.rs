//! Core traits defined in `seatbook-core` and implemented by other crates.

pub mod lock_store;
pub mod publisher;

pub use lock_store::LockStore;
pub use publisher::EventPublisher;
