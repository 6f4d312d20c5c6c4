//! Health check handlers.

use axum::Json;
use axum::extract::State;
use chrono::Utc;

use seatbook_core::traits::LockStore;

use crate::dto::response::{ApiResponse, ComponentHealth, DetailedHealthResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::ok(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: (Utc::now() - state.started_at).num_seconds(),
    }))
}

/// GET /api/health/detailed
pub async fn health_detailed(
    State(state): State<AppState>,
) -> Json<ApiResponse<DetailedHealthResponse>> {
    let lock_store = component(
        state.locks.provider_name(),
        state.locks.health_check().await,
    );
    let ledger = component(
        state.ledger.provider_name(),
        state.ledger.ledger().health_check().await,
    );
    let status = if lock_store.status == "ok" && ledger.status == "ok" {
        "ok"
    } else {
        "degraded"
    };

    Json(ApiResponse::ok(DetailedHealthResponse {
        status: status.to_string(),
        lock_store,
        ledger,
        ws_connections: state.realtime.connections.connection_count(),
        online_users: state.realtime.connections.user_count(),
        seats: state.coordination.summary().await,
        realtime: state.realtime.metrics.snapshot(),
    }))
}

fn component(
    provider: &str,
    check: Result<bool, seatbook_core::error::AppError>,
) -> ComponentHealth {
    let (status, error) = match check {
        Ok(true) => ("ok", None),
        Ok(false) => ("unavailable", None),
        Err(e) => ("unavailable", Some(e.message)),
    };
    ComponentHealth {
        provider: provider.to_string(),
        status: status.to_string(),
        error,
    }
}
