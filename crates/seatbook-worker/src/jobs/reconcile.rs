//! Registry reconciliation job.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, error};

use seatbook_service::{ReconcileReport, RegistryReconciler};

/// Runs one reconciliation sweep per tick.
///
/// A tick that fires while the previous sweep is still running is skipped.
#[derive(Debug)]
pub struct ReconcileJob {
    reconciler: RegistryReconciler,
    running: AtomicBool,
}

impl ReconcileJob {
    /// Create a new reconcile job
    pub fn new(reconciler: RegistryReconciler) -> Self {
        Self {
            reconciler,
            running: AtomicBool::new(false),
        }
    }

    /// Run one sweep. Returns `None` when skipped or failed.
    pub async fn run(&self) -> Option<ReconcileReport> {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Previous reconciliation still running, skipping tick");
            return None;
        }

        let result = self.reconciler.reconcile().await;
        self.running.store(false, Ordering::Release);

        match result {
            Ok(report) => Some(report),
            Err(e) => {
                error!(error = %e, "Registry reconciliation failed");
                None
            }
        }
    }
}
