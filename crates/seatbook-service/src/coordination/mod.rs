//! Seat coordination over the lock store and the booking ledger.

pub mod outcome;
pub mod service;

#[cfg(test)]
mod tests;

pub use outcome::{ContentionReason, Outcome};
pub use service::CoordinationService;
