//! Shared test helpers for integration tests.

use std::net::SocketAddr;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use seatbook_api::{AppState, build_app, build_state};
use seatbook_auth::JwtEncoder;
use seatbook_core::config::AppConfig;
use seatbook_core::types::id::UserId;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state behind the router
    pub state: AppState,
    encoder: JwtEncoder,
}

impl TestApp {
    /// Create a test application over a 2 x 4 inventory
    pub async fn new() -> Self {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "integration-secret".to_string();
        config.inventory.coaches = 2;
        config.inventory.seats_per_coach = 4;
        config.worker.enabled = false;

        let encoder = JwtEncoder::new(&config.auth);
        let state = build_state(config).await.expect("Failed to build state");
        let router = build_app(state.clone());

        Self {
            router,
            state,
            encoder,
        }
    }

    /// Issue an access token for a fresh user
    pub fn login(&self, username: &str) -> (UserId, String) {
        let user_id = UserId::new();
        let (token, _) = self
            .encoder
            .generate_access_token(user_id, username)
            .expect("Failed to issue token");
        (user_id, token)
    }

    /// Serve the router on an ephemeral port
    pub async fn spawn(&self) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to read address");
        let router = self.router.clone();
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server failed");
        });
        addr
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// POST a hold for `seat`
    pub async fn hold(&self, seat: &str, client_id: &str, token: &str) -> TestResponse {
        self.request(
            "POST",
            &format!("/api/seats/{seat}/hold"),
            Some(serde_json::json!({ "client_id": client_id })),
            Some(token),
        )
        .await
    }

    /// POST a confirmation for `seat`
    pub async fn confirm(&self, seat: &str, client_id: &str, token: &str) -> TestResponse {
        self.request(
            "POST",
            &format!("/api/seats/{seat}/confirm"),
            Some(serde_json::json!({ "client_id": client_id })),
            Some(token),
        )
        .await
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `result` tag of a seat operation outcome
    pub fn outcome(&self) -> &str {
        self.body["data"]["outcome"]["result"]
            .as_str()
            .unwrap_or_default()
    }
}
