//! Application builder: wires stores, services, and the realtime engine
//! into an Axum app and runs it.

use std::sync::Arc;

use axum::Router;
use chrono::Utc;
use tracing::{error, info};

use seatbook_auth::JwtDecoder;
use seatbook_cache::LockStoreManager;
use seatbook_core::config::AppConfig;
use seatbook_core::error::{AppError, ErrorKind};
use seatbook_core::result::AppResult;
use seatbook_core::traits::{EventPublisher, LockStore};
use seatbook_core::types::resource::ResourceId;
use seatbook_database::LedgerManager;
use seatbook_realtime::RealtimeEngine;
use seatbook_service::{CoordinationService, ResourceRegistry};
use seatbook_worker::{CronScheduler, ReconcileJob};

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Connects the configured backends and assembles the shared state.
pub async fn build_state(config: AppConfig) -> AppResult<AppState> {
    info!(provider = %config.lock_store.provider, "Initializing lock store");
    let locks = Arc::new(LockStoreManager::new(&config.lock_store).await?);

    info!(provider = %config.ledger.provider, "Initializing booking ledger");
    let ledger = Arc::new(LedgerManager::new(&config.ledger).await?);

    let registry = Arc::new(ResourceRegistry::new(ResourceId::inventory(
        config.inventory.coaches,
        config.inventory.seats_per_coach,
    )));

    let realtime = Arc::new(RealtimeEngine::new(config.realtime.clone()));

    let coordination = Arc::new(CoordinationService::new(
        Arc::clone(&locks) as Arc<dyn LockStore>,
        ledger.ledger(),
        registry,
        Arc::clone(&realtime.bus) as Arc<dyn EventPublisher>,
        config.booking.clone(),
    ));
    let inbound = Arc::new(realtime.inbound_handler(Arc::clone(&coordination)));
    let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));

    Ok(AppState {
        config: Arc::new(config),
        started_at: Utc::now(),
        locks,
        ledger,
        jwt_decoder,
        coordination,
        realtime,
        inbound,
    })
}

/// Runs the SeatBook server until a shutdown signal arrives.
pub async fn run_server(config: AppConfig) -> AppResult<()> {
    info!("Starting SeatBook server...");

    // ── Step 1: Backends and services ────────────────────────────
    let state = build_state(config.clone()).await?;

    // ── Step 2: Rebuild the registry before accepting traffic ────
    state.coordination.reconciler().startup_recovery().await?;

    // ── Step 3: Periodic reconciliation ──────────────────────────
    let mut scheduler = if config.worker.enabled {
        let scheduler = CronScheduler::new().await?;
        let job = Arc::new(ReconcileJob::new(state.coordination.reconciler()));
        scheduler
            .register_reconciliation(job, config.worker.reconcile_interval_seconds)
            .await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        info!("Background worker disabled");
        None
    };

    // ── Step 4: HTTP server ──────────────────────────────────────
    let app = build_app(state.clone());
    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        AppError::with_source(ErrorKind::Internal, format!("Failed to bind {addr}"), e)
    })?;

    info!(
        address = %addr,
        seats = config.inventory.capacity(),
        "SeatBook server listening"
    );

    let realtime = Arc::clone(&state.realtime);
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            info!("Shutdown signal received");
            if let Err(e) = realtime.shutdown().await {
                error!(error = %e, "Realtime engine shutdown failed");
            }
        })
        .await;

    // ── Step 5: Teardown ─────────────────────────────────────────
    if let Some(scheduler) = scheduler.as_mut() {
        if let Err(e) = scheduler.shutdown().await {
            error!(error = %e, "Scheduler shutdown failed");
        }
    }
    state.ledger.close().await;

    served.map_err(|e| AppError::with_source(ErrorKind::Internal, "Server error", e))?;
    info!("SeatBook server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
