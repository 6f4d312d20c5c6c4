//! Route definitions for the SeatBook HTTP API.
//!
//! REST routes are mounted under `/api`; the WebSocket endpoint lives at
//! `/ws`.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::compression::build_compression_layer;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let config = Arc::clone(&state.config);
    let server = &config.server;

    let api_routes = Router::new()
        .merge(seat_routes())
        .merge(booking_routes())
        .merge(health_routes());

    let ws_routes = Router::new().route("/ws", get(handlers::ws::ws_handler));

    Router::new()
        .nest("/api", api_routes)
        .merge(ws_routes)
        .layer(DefaultBodyLimit::max(server.max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            server.request_timeout_seconds,
        )))
        .layer(build_compression_layer())
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&server.cors))
        .with_state(state)
}

/// Seat snapshot and hold/release/confirm
fn seat_routes() -> Router<AppState> {
    Router::new()
        .route("/seats", get(handlers::seat::list_seats))
        .route("/seats/summary", get(handlers::seat::seat_summary))
        .route(
            "/seats/{resource_id}/hold",
            post(handlers::seat::hold_seat).delete(handlers::seat::release_seat),
        )
        .route("/seats/{resource_id}/confirm", post(handlers::seat::confirm_seat))
}

/// Booking receipts
fn booking_routes() -> Router<AppState> {
    Router::new().route("/bookings/{booking_id}", get(handlers::booking::get_booking))
}

/// Liveness and dependency checks
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}
