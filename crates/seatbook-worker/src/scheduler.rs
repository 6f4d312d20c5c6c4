//! Cron scheduler for periodic tasks.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing::{debug, info};

use seatbook_core::error::AppError;

use crate::jobs::reconcile::ReconcileJob;

/// Cron-based scheduler for periodic background tasks
pub struct CronScheduler {
    scheduler: JobScheduler,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new() -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self { scheduler })
    }

    /// Registry reconciliation, every `interval_seconds`
    pub async fn register_reconciliation(
        &self,
        job: Arc<ReconcileJob>,
        interval_seconds: u64,
    ) -> Result<(), AppError> {
        let schedule = cron_expression(interval_seconds);
        let cron = CronJob::new_async(schedule.as_str(), move |_uuid, _lock| {
            let job = Arc::clone(&job);
            Box::pin(async move {
                if let Some(report) = job.run().await {
                    debug!(
                        expired = report.expired,
                        adopted = report.adopted,
                        allocated = report.allocated,
                        "Reconciliation tick complete"
                    );
                }
            })
        })
        .map_err(|e| {
            AppError::internal(format!("Failed to create reconciliation schedule: {e}"))
        })?;

        self.scheduler.add(cron).await.map_err(|e| {
            AppError::internal(format!("Failed to add reconciliation schedule: {e}"))
        })?;

        info!(schedule = %schedule, "Registered: registry_reconciliation");
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        info!("Cron scheduler shut down");
        Ok(())
    }
}

/// Six-field cron expression firing every `seconds`.
///
/// Intervals below a minute use the seconds field; longer ones are
/// rounded to whole minutes. Zero is treated as one second.
pub fn cron_expression(seconds: u64) -> String {
    match seconds {
        0 | 1 => "* * * * * *".to_string(),
        2..=59 => format!("*/{seconds} * * * * *"),
        _ => {
            let minutes = (seconds / 60).clamp(1, 59);
            format!("0 */{minutes} * * * *")
        }
    }
}
