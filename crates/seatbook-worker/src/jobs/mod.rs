//! Job implementations.

pub mod reconcile;
