//! Scheduled background tasks for SeatBook.
//!
//! This crate provides:
//! - A cron scheduler driving periodic tasks
//! - The registry reconciliation job that clears expired holds and picks
//!   up changes made by other instances

pub mod jobs;
pub mod scheduler;

pub use jobs::reconcile::ReconcileJob;
pub use scheduler::CronScheduler;
