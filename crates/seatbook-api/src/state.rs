//! Application state shared across all handlers.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use seatbook_auth::JwtDecoder;
use seatbook_cache::LockStoreManager;
use seatbook_core::config::AppConfig;
use seatbook_database::LedgerManager;
use seatbook_realtime::{InboundHandler, RealtimeEngine};
use seatbook_service::CoordinationService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Process start, for uptime reporting
    pub started_at: DateTime<Utc>,

    /// Lock store (Redis or in-memory)
    pub locks: Arc<LockStoreManager>,
    /// Booking ledger (PostgreSQL or in-memory)
    pub ledger: Arc<LedgerManager>,

    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,

    /// Seat coordination
    pub coordination: Arc<CoordinationService>,

    /// WebSocket realtime engine
    pub realtime: Arc<RealtimeEngine>,
    /// Inbound WebSocket message dispatch
    pub inbound: Arc<InboundHandler>,
}
