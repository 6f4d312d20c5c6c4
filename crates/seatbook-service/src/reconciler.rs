//! Registry reconciliation against the lock store and the ledger.
//!
//! Holds expire silently and other instances change seats this process
//! never saw, so the registry drifts. A sweep corrects it and publishes
//! the transitions observers missed.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use seatbook_core::events::ResourceEvent;
use seatbook_core::result::AppResult;
use seatbook_core::traits::{EventPublisher, LockStore};
use seatbook_core::types::resource::ResourceStatus;
use seatbook_database::ledger::BookingLedger;

use crate::registry::ResourceRegistry;

/// Changes made by one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Held seats whose lock had expired.
    pub expired: usize,
    /// Available seats found under a lock taken elsewhere.
    pub adopted: usize,
    /// Seats found booked in the ledger.
    pub allocated: usize,
}

impl ReconcileReport {
    /// Whether the sweep changed anything.
    pub fn has_drift(&self) -> bool {
        self.expired + self.adopted + self.allocated > 0
    }
}

/// Reconciles the registry with authoritative state.
#[derive(Clone)]
pub struct RegistryReconciler {
    locks: Arc<dyn LockStore>,
    ledger: Arc<dyn BookingLedger>,
    registry: Arc<ResourceRegistry>,
    publisher: Arc<dyn EventPublisher>,
}

impl std::fmt::Debug for RegistryReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryReconciler").finish()
    }
}

impl RegistryReconciler {
    /// Creates a new registry reconciler.
    pub fn new(
        locks: Arc<dyn LockStore>,
        ledger: Arc<dyn BookingLedger>,
        registry: Arc<ResourceRegistry>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            locks,
            ledger,
            registry,
            publisher,
        }
    }

    /// Performs one reconciliation sweep:
    ///
    /// 1. Mark every seat with a booking in the ledger as allocated.
    /// 2. Read the owners of all seats from the lock store.
    /// 3. Free held seats whose lock is gone and adopt free seats that
    ///    now carry a lock.
    ///
    /// Step 3 compares against a copy taken before the lock store read, so
    /// a transition made concurrently by the coordination service is never
    /// overwritten. Seats with a confirmation in flight are skipped until their
    /// hold would have expired: their lock is already gone and the
    /// confirmation settles them.
    pub async fn reconcile(&self) -> AppResult<ReconcileReport> {
        let mut report = ReconcileReport::default();

        for allocation in self.ledger.allocations().await? {
            if self
                .registry
                .mark_allocated(&allocation.resource_id, allocation.booking_id)
                .await
            {
                report.allocated += 1;
                self.publisher
                    .publish(ResourceEvent::allocated(
                        allocation.resource_id,
                        allocation.booking_id,
                    ))
                    .await;
            }
        }

        let before = self.registry.entries().await;
        let ids: Vec<_> = before.iter().map(|(id, _)| *id).collect();
        let owners = self.locks.get_owners(&ids).await?;
        if owners.len() != ids.len() {
            warn!(
                expected = ids.len(),
                actual = owners.len(),
                "Lock store returned a partial owner list; skipping hold reconciliation"
            );
            return Ok(report);
        }

        let now = Utc::now();
        for ((resource_id, entry), owner) in before.iter().zip(owners) {
            // An abandoned confirmation stops shielding the seat once its hold lapses.
            if entry.confirming && entry.expires_at.is_some_and(|at| at > now) {
                continue;
            }
            match (entry.status, owner) {
                (ResourceStatus::Held, None) => {
                    if self
                        .registry
                        .replace_if(resource_id, entry, ResourceStatus::Available, None)
                        .await
                    {
                        report.expired += 1;
                        debug!(resource_id = %resource_id, "Expired hold cleared");
                        self.publisher
                            .publish(ResourceEvent::available(*resource_id))
                            .await;
                    }
                }
                (ResourceStatus::Available, Some(holder)) => {
                    if self
                        .registry
                        .replace_if(resource_id, entry, ResourceStatus::Held, Some(holder))
                        .await
                    {
                        report.adopted += 1;
                        debug!(resource_id = %resource_id, "Foreign hold adopted");
                        self.publisher
                            .publish(ResourceEvent::held(*resource_id))
                            .await;
                    }
                }
                (ResourceStatus::Held, Some(holder)) if entry.holder.as_ref() != Some(&holder) => {
                    self.registry
                        .replace_if(resource_id, entry, ResourceStatus::Held, Some(holder))
                        .await;
                }
                _ => {}
            }
        }

        if report.has_drift() {
            info!(
                expired = report.expired,
                adopted = report.adopted,
                allocated = report.allocated,
                "Registry drift corrected"
            );
        }
        Ok(report)
    }

    /// Rebuilds the registry once during server startup.
    pub async fn startup_recovery(&self) -> AppResult<ReconcileReport> {
        info!(seats = self.registry.len(), "Running startup registry recovery");

        let report = self.reconcile().await?;

        info!(
            held = report.adopted,
            allocated = report.allocated,
            "Startup recovery complete"
        );
        Ok(report)
    }
}
