//! Ping keepalive for WebSocket connections.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::{self, Instant};
use tracing::{debug, warn};

use seatbook_core::config::RealtimeConfig;

use super::handle::ConnectionHandle;
use crate::message::types::OutboundMessage;

/// Heartbeat configuration.
#[derive(Debug, Clone, Copy)]
pub struct HeartbeatConfig {
    /// Interval between pings.
    pub ping_interval: Duration,
    /// Silence after which the connection is considered dead.
    pub ping_timeout: Duration,
}

impl From<&RealtimeConfig> for HeartbeatConfig {
    fn from(config: &RealtimeConfig) -> Self {
        Self {
            ping_interval: config.ping_interval(),
            ping_timeout: config.ping_timeout(),
        }
    }
}

/// Run the heartbeat loop for a connection.
///
/// Sends a ping every interval and marks the connection dead once no
/// inbound traffic has arrived within the timeout.
pub async fn run_heartbeat(handle: Arc<ConnectionHandle>, config: HeartbeatConfig) {
    let mut interval = time::interval_at(Instant::now() + config.ping_interval, config.ping_interval);

    loop {
        tokio::select! {
            _ = handle.closed().cancelled() => break,
            _ = interval.tick() => {}
        }

        if !handle.is_alive() {
            break;
        }

        let silence = Utc::now() - handle.last_seen().await;
        if let Ok(silence) = silence.to_std() {
            if silence > config.ping_timeout {
                warn!(conn_id = %handle.id, ?silence, "Heartbeat timeout");
                handle.mark_dead();
                break;
            }
        }

        let ping = OutboundMessage::Ping {
            timestamp: Utc::now().timestamp_millis(),
        };
        if !handle.send(&ping) && !handle.is_alive() {
            break;
        }
    }

    debug!(conn_id = %handle.id, "Heartbeat loop ended");
}
