//! Live WebSocket sessions against a served router.

use std::net::SocketAddr;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::helpers::TestApp;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn connect(addr: SocketAddr, token: &str) -> Socket {
    let (socket, _) = connect_async(format!("ws://{addr}/ws?token={token}"))
        .await
        .expect("Failed to connect");
    socket
}

/// Next JSON frame of the given type, skipping anything else.
async fn next_of_type(socket: &mut Socket, kind: &str) -> Value {
    let read = async {
        while let Some(frame) = socket.next().await {
            let frame = frame.expect("Socket error");
            if let Message::Text(text) = frame {
                let value: Value = serde_json::from_str(text.as_str()).expect("Invalid JSON");
                if value["type"] == kind {
                    return value;
                }
            }
        }
        panic!("Socket closed before a {kind} frame arrived");
    };
    tokio::time::timeout(Duration::from_secs(5), read)
        .await
        .expect("Timed out waiting for frame")
}

async fn send(socket: &mut Socket, value: Value) {
    socket
        .send(Message::text(value.to_string()))
        .await
        .expect("Failed to send");
}

#[tokio::test]
async fn test_upgrade_without_valid_token_is_rejected() {
    let app = TestApp::new().await;
    let addr = app.spawn().await;

    for url in [
        format!("ws://{addr}/ws"),
        format!("ws://{addr}/ws?token=garbage"),
    ] {
        match connect_async(url).await {
            Err(WsError::Http(response)) => assert_eq!(response.status().as_u16(), 401),
            other => panic!("Expected HTTP 401, got {:?}", other.err()),
        }
    }
}

#[tokio::test]
async fn test_snapshot_on_connect() {
    let app = TestApp::new().await;
    let addr = app.spawn().await;
    let (_, token) = app.login("alice");

    let mut socket = connect(addr, &token).await;
    let snapshot = next_of_type(&mut socket, "snapshot").await;

    assert_eq!(snapshot["resources"].as_array().map(Vec::len), Some(8));
    assert_eq!(app.state.realtime.connections.connection_count(), 1);
}

#[tokio::test]
async fn test_acquire_broadcasts_to_observers() {
    let app = TestApp::new().await;
    let addr = app.spawn().await;
    let (_, alice) = app.login("alice");
    let (_, bob) = app.login("bob");

    let mut actor = connect(addr, &alice).await;
    let mut observer = connect(addr, &bob).await;
    next_of_type(&mut actor, "snapshot").await;
    next_of_type(&mut observer, "snapshot").await;

    send(
        &mut actor,
        json!({ "type": "acquire", "resource_id": "C2-S2", "client_id": "tab" }),
    )
    .await;

    let result = next_of_type(&mut actor, "operation_result").await;
    assert_eq!(result["operation"], "acquire");
    assert_eq!(result["outcome"]["result"], "acquired");

    let update = next_of_type(&mut observer, "resource_update").await;
    assert_eq!(update["resource_id"], "C2-S2");
    assert_eq!(update["status"], "held");

    send(
        &mut observer,
        json!({ "type": "acquire", "resource_id": "C2-S2", "client_id": "tab" }),
    )
    .await;
    let lost = next_of_type(&mut observer, "operation_result").await;
    assert_eq!(lost["outcome"]["result"], "contention");
}

#[tokio::test]
async fn test_rest_confirm_reaches_socket() {
    let app = TestApp::new().await;
    let addr = app.spawn().await;
    let (_, alice) = app.login("alice");
    let (_, bob) = app.login("bob");

    let mut observer = connect(addr, &bob).await;
    next_of_type(&mut observer, "snapshot").await;

    app.hold("C1-S3", "web", &alice).await;
    let held = next_of_type(&mut observer, "resource_update").await;
    assert_eq!(held["status"], "held");

    let confirmed = app.confirm("C1-S3", "web", &alice).await;
    let booking_id = confirmed.body["data"]["outcome"]["booking_id"].clone();

    let allocated = next_of_type(&mut observer, "resource_update").await;
    assert_eq!(allocated["status"], "allocated");
    assert_eq!(allocated["booking_id"], booking_id);
}

#[tokio::test]
async fn test_malformed_frame_gets_error() {
    let app = TestApp::new().await;
    let addr = app.spawn().await;
    let (_, token) = app.login("alice");

    let mut socket = connect(addr, &token).await;
    next_of_type(&mut socket, "snapshot").await;

    socket
        .send(Message::text("not json".to_string()))
        .await
        .expect("Failed to send");
    let error = next_of_type(&mut socket, "error").await;
    assert_eq!(error["code"], "INVALID_MESSAGE");

    send(
        &mut socket,
        json!({ "type": "acquire", "resource_id": "Z9", "client_id": "tab" }),
    )
    .await;
    let error = next_of_type(&mut socket, "error").await;
    assert_eq!(error["code"], "VALIDATION");
}
