//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Background worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the reconciliation schedule runs at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Seconds between reconciliation sweeps. Bounds how long a silently
    /// expired hold can still be shown as held.
    #[serde(default = "default_reconcile_interval")]
    pub reconcile_interval_seconds: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            reconcile_interval_seconds: default_reconcile_interval(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_reconcile_interval() -> u64 {
    15
}
