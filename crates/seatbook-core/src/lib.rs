//! # seatbook-core
//!
//! Core crate for SeatBook. Contains the lock store and event publisher
//! traits, configuration schemas, typed identifiers, resource events,
//! and the unified error system.
//!
//! This crate has **no** internal dependencies on other SeatBook crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
