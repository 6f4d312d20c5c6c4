//! # seatbook-database
//!
//! The booking ledger: a PostgreSQL repository for production, an
//! in-memory ledger for single-node runs and tests, and the manager that
//! selects between them from configuration.

pub mod connection;
pub mod ledger;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use ledger::{BookingLedger, LedgerManager, MemoryBookingLedger};
