//! Booking receipts and health reporting.

use axum::http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_receipt_visible_to_owner_only() {
    let app = TestApp::new().await;
    let (alice_id, alice) = app.login("alice");
    let (_, bob) = app.login("bob");

    app.hold("C1-S1", "t", &alice).await;
    let confirmed = app.confirm("C1-S1", "t", &alice).await;
    let booking_id = confirmed.body["data"]["outcome"]["booking_id"]
        .as_str()
        .expect("booking id")
        .to_string();

    let receipt = app
        .request("GET", &format!("/api/bookings/{booking_id}"), None, Some(&alice))
        .await;
    assert_eq!(receipt.status, StatusCode::OK);
    assert_eq!(receipt.body["data"]["resource_id"], "C1-S1");
    assert_eq!(receipt.body["data"]["user_id"], alice_id.to_string());
    assert_eq!(receipt.body["data"]["itinerary"]["train_number"], "T123");
    assert_eq!(receipt.body["data"]["amount_cents"], 5000);

    let foreign = app
        .request("GET", &format!("/api/bookings/{booking_id}"), None, Some(&bob))
        .await;
    assert_eq!(foreign.status, StatusCode::NOT_FOUND);

    let anonymous = app
        .request("GET", &format!("/api/bookings/{booking_id}"), None, None)
        .await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let malformed = app
        .request("GET", "/api/bookings/not-a-uuid", None, Some(&alice))
        .await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new().await;

    let health = app.request("GET", "/api/health", None, None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["data"]["status"], "ok");

    let detailed = app.request("GET", "/api/health/detailed", None, None).await;
    assert_eq!(detailed.status, StatusCode::OK);
    assert_eq!(detailed.body["data"]["status"], "ok");
    assert_eq!(detailed.body["data"]["lock_store"]["provider"], "memory");
    assert_eq!(detailed.body["data"]["ledger"]["provider"], "memory");
    assert_eq!(detailed.body["data"]["seats"]["total"], 8);
    assert_eq!(detailed.body["data"]["ws_connections"], 0);
}
