//! # seatbook-service
//!
//! The coordination layer. [`CoordinationService`] turns lock store and
//! ledger results into seat transitions, keeps the [`ResourceRegistry`]
//! cache in step, and publishes one event per transition.
//! [`RegistryReconciler`] repairs the cache after silent hold expiry or
//! changes made by other instances.
//!
//! Services follow constructor injection; every dependency arrives as an
//! `Arc` at construction time.

pub mod context;
pub mod coordination;
pub mod reconciler;
pub mod registry;

#[cfg(test)]
mod testing;

pub use context::{Identity, RequestContext};
pub use coordination::{ContentionReason, CoordinationService, Outcome};
pub use reconciler::{ReconcileReport, RegistryReconciler};
pub use registry::{RegistryEntry, ResourceRegistry};
