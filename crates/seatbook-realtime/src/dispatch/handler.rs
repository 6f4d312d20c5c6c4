//! Routes inbound WebSocket messages to the coordination service.

use std::sync::Arc;

use tracing::{debug, warn};

use seatbook_core::error::AppError;
use seatbook_core::types::resource::{ClientId, ResourceId};
use seatbook_service::{CoordinationService, RequestContext};

use crate::connection::handle::{ConnectionHandle, ConnectionId};
use crate::connection::manager::ConnectionManager;
use crate::message::types::{InboundMessage, Operation, OutboundMessage};
use crate::metrics::EngineMetrics;

/// Handles inbound messages for all connections.
///
/// Messages from one connection are processed in arrival order by that
/// connection's read loop. A bad message produces an `error` reply to the
/// sender only.
#[derive(Debug, Clone)]
pub struct InboundHandler {
    connections: Arc<ConnectionManager>,
    coordination: Arc<CoordinationService>,
    metrics: Arc<EngineMetrics>,
}

impl InboundHandler {
    /// Creates a new inbound handler.
    pub fn new(
        connections: Arc<ConnectionManager>,
        coordination: Arc<CoordinationService>,
        metrics: Arc<EngineMetrics>,
    ) -> Self {
        Self {
            connections,
            coordination,
            metrics,
        }
    }

    /// Sends the initial snapshot to a freshly registered connection.
    pub async fn welcome(&self, handle: &ConnectionHandle) {
        self.send_snapshot(handle).await;
    }

    /// Processes one raw text frame.
    pub async fn handle(&self, conn_id: &ConnectionId, raw: &str) {
        let Some(handle) = self.connections.get(conn_id) else {
            warn!(conn_id = %conn_id, "Message from unknown connection");
            return;
        };
        handle.touch().await;
        self.metrics.message_received();

        let msg: InboundMessage = match serde_json::from_str(raw) {
            Ok(msg) => msg,
            Err(e) => {
                self.reply(
                    &handle,
                    OutboundMessage::error("INVALID_MESSAGE", format!("Failed to parse message: {e}")),
                );
                return;
            }
        };

        let ctx = RequestContext::authenticated(handle.user_id, handle.username.clone());
        match msg {
            InboundMessage::Acquire {
                resource_id,
                client_id,
            } => {
                let result = match parse_target(&resource_id, Some(client_id.as_str())) {
                    Ok((id, Some(client))) => self
                        .coordination
                        .acquire(&ctx, &id, &client)
                        .await
                        .map(|outcome| (id, outcome)),
                    Ok((_, None)) => Err(AppError::validation("client_id is required")),
                    Err(e) => Err(e),
                };
                self.reply_result(&handle, Operation::Acquire, result);
            }
            InboundMessage::Release {
                resource_id,
                client_id,
            } => {
                let result = match parse_target(&resource_id, client_id.as_deref()) {
                    Ok((id, client)) => self
                        .coordination
                        .release(&ctx, &id, client.as_ref())
                        .await
                        .map(|outcome| (id, outcome)),
                    Err(e) => Err(e),
                };
                self.reply_result(&handle, Operation::Release, result);
            }
            InboundMessage::Confirm {
                resource_id,
                client_id,
            } => {
                let result = match parse_target(&resource_id, Some(client_id.as_str())) {
                    Ok((id, Some(client))) => self
                        .coordination
                        .confirm(&ctx, &id, &client)
                        .await
                        .map(|outcome| (id, outcome)),
                    Ok((_, None)) => Err(AppError::validation("client_id is required")),
                    Err(e) => Err(e),
                };
                self.reply_result(&handle, Operation::Confirm, result);
            }
            InboundMessage::Snapshot => self.send_snapshot(&handle).await,
            InboundMessage::Pong { .. } => {}
        }
    }

    /// Queued with the registry locked, so every update published after
    /// the snapshot was taken is queued behind it.
    async fn send_snapshot(&self, handle: &ConnectionHandle) {
        self.coordination
            .snapshot_with(|resources| self.reply(handle, OutboundMessage::Snapshot { resources }))
            .await;
    }

    fn reply_result(
        &self,
        handle: &ConnectionHandle,
        operation: Operation,
        result: Result<(ResourceId, seatbook_service::Outcome), AppError>,
    ) {
        let msg = match result {
            Ok((resource_id, outcome)) => {
                debug!(
                    conn_id = %handle.id,
                    resource_id = %resource_id,
                    outcome = outcome.name(),
                    "Seat operation handled"
                );
                OutboundMessage::OperationResult {
                    operation,
                    resource_id,
                    outcome,
                }
            }
            Err(e) => {
                debug!(conn_id = %handle.id, error = %e, "Seat operation rejected");
                OutboundMessage::error(e.kind.to_string(), e.message)
            }
        };
        self.reply(handle, msg);
    }

    fn reply(&self, handle: &ConnectionHandle, msg: OutboundMessage) {
        let sent = handle.send(&msg);
        self.metrics.record_delivery(u64::from(sent), u64::from(!sent));
    }
}

fn parse_target(
    resource_id: &str,
    client_id: Option<&str>,
) -> Result<(ResourceId, Option<ClientId>), AppError> {
    let resource_id = resource_id.parse::<ResourceId>()?;
    let client_id = client_id.map(str::parse::<ClientId>).transpose()?;
    Ok((resource_id, client_id))
}
