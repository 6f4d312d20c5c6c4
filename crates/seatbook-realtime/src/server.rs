//! Top-level real-time engine that ties together all subsystems.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use seatbook_core::config::RealtimeConfig;
use seatbook_core::error::AppError;
use seatbook_service::CoordinationService;

use crate::connection::heartbeat::HeartbeatConfig;
use crate::connection::manager::ConnectionManager;
use crate::dispatch::handler::InboundHandler;
use crate::metrics::EngineMetrics;
use crate::notification::bus::NotificationBus;

/// Central real-time engine that coordinates all WebSocket subsystems.
#[derive(Clone)]
pub struct RealtimeEngine {
    /// Connection manager.
    pub connections: Arc<ConnectionManager>,
    /// Seat event fan-out, handed to the coordination service as its publisher.
    pub bus: Arc<NotificationBus>,
    /// Metrics collector.
    pub metrics: Arc<EngineMetrics>,
    heartbeat: HeartbeatConfig,
    shutdown: CancellationToken,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine")
            .field("connections", &self.connections.connection_count())
            .finish()
    }
}

impl RealtimeEngine {
    /// Creates a new real-time engine with all subsystems.
    pub fn new(config: RealtimeConfig) -> Self {
        let shutdown = CancellationToken::new();
        let heartbeat = HeartbeatConfig::from(&config);
        let metrics = Arc::new(EngineMetrics::new());
        let connections = Arc::new(ConnectionManager::new(
            config,
            Arc::clone(&metrics),
            shutdown.clone(),
        ));
        let bus = Arc::new(NotificationBus::new(
            Arc::clone(&connections),
            Arc::clone(&metrics),
        ));

        info!("Real-time engine initialized");

        Self {
            connections,
            bus,
            metrics,
            heartbeat,
            shutdown,
        }
    }

    /// Builds the inbound message handler over a coordination service.
    pub fn inbound_handler(&self, coordination: Arc<CoordinationService>) -> InboundHandler {
        InboundHandler::new(
            Arc::clone(&self.connections),
            coordination,
            Arc::clone(&self.metrics),
        )
    }

    /// Heartbeat settings for new connections.
    pub fn heartbeat_config(&self) -> HeartbeatConfig {
        self.heartbeat
    }

    /// Token cancelled on shutdown.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Initiates a graceful shutdown of the real-time engine.
    pub async fn shutdown(&self) -> Result<(), AppError> {
        info!("Shutting down real-time engine");

        self.shutdown.cancel();
        self.connections.close_all();

        info!("Real-time engine shut down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use seatbook_core::types::id::UserId;

    use super::*;

    #[tokio::test]
    async fn test_shutdown_closes_everything() {
        let engine = RealtimeEngine::new(RealtimeConfig::default());
        let (handle, _rx) = engine.connections.register(UserId::new(), "zed".into());
        let token = engine.shutdown_token();

        engine.shutdown().await.expect("shutdown");

        assert!(token.is_cancelled());
        assert!(handle.closed().is_cancelled());
        assert_eq!(engine.connections.connection_count(), 0);
        assert_eq!(engine.metrics.snapshot().active_connections, 0);
    }
}
