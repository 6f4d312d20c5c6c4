//! Seat hold, release, and confirm over REST.

use axum::http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_snapshot_lists_inventory() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/seats", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    let seats = response.body["data"].as_array().expect("seat list");
    assert_eq!(seats.len(), 8);
    assert_eq!(seats[0]["resource_id"], "C1-S1");
    assert!(seats.iter().all(|s| s["status"] == "available"));
}

#[tokio::test]
async fn test_second_hold_is_contention() {
    let app = TestApp::new().await;
    let (_, alice) = app.login("alice");
    let (_, bob) = app.login("bob");

    let first = app.hold("C1-S2", "tab-1", &alice).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.outcome(), "acquired");
    assert!(first.body["data"]["outcome"]["expires_at"].is_string());

    let second = app.hold("C1-S2", "tab-1", &bob).await;
    assert_eq!(second.status, StatusCode::CONFLICT);
    assert_eq!(second.outcome(), "contention");
    assert_eq!(second.body["data"]["outcome"]["reason"], "held_by_other");
    assert_eq!(second.body["success"], false);

    let summary = app.request("GET", "/api/seats/summary", None, None).await;
    assert_eq!(summary.body["data"]["held"], 1);
    assert_eq!(summary.body["data"]["available"], 7);
}

#[tokio::test]
async fn test_confirm_requires_the_holding_client() {
    let app = TestApp::new().await;
    let (_, alice) = app.login("alice");
    let (_, bob) = app.login("bob");

    app.hold("C2-S1", "phone", &alice).await;

    let stranger = app.confirm("C2-S1", "phone", &bob).await;
    assert_eq!(stranger.status, StatusCode::CONFLICT);
    assert_eq!(stranger.outcome(), "ownership_mismatch");

    let other_tab = app.confirm("C2-S1", "laptop", &alice).await;
    assert_eq!(other_tab.outcome(), "ownership_mismatch");

    let holder = app.confirm("C2-S1", "phone", &alice).await;
    assert_eq!(holder.status, StatusCode::OK);
    assert_eq!(holder.outcome(), "confirmed");
}

#[tokio::test]
async fn test_allocated_seat_is_final() {
    let app = TestApp::new().await;
    let (_, alice) = app.login("alice");
    let (_, bob) = app.login("bob");

    app.hold("C1-S4", "t", &alice).await;
    app.confirm("C1-S4", "t", &alice).await;

    let hold = app.hold("C1-S4", "t", &bob).await;
    assert_eq!(hold.status, StatusCode::CONFLICT);
    assert_eq!(hold.body["data"]["outcome"]["reason"], "allocated");

    let release = app
        .request("DELETE", "/api/seats/C1-S4/hold", None, Some(&bob))
        .await;
    assert_eq!(release.status, StatusCode::CONFLICT);

    let seats = app.request("GET", "/api/seats", None, None).await;
    let seat = seats.body["data"]
        .as_array()
        .and_then(|s| s.iter().find(|v| v["resource_id"] == "C1-S4").cloned())
        .expect("seat");
    assert_eq!(seat["status"], "allocated");
}

#[tokio::test]
async fn test_release_frees_the_seat() {
    let app = TestApp::new().await;
    let (_, alice) = app.login("alice");
    let (_, bob) = app.login("bob");

    app.hold("C2-S3", "t", &alice).await;

    let release = app
        .request("DELETE", "/api/seats/C2-S3/hold?client_id=t", None, Some(&alice))
        .await;
    assert_eq!(release.status, StatusCode::OK);
    assert_eq!(release.outcome(), "released");

    let retry = app.hold("C2-S3", "t", &bob).await;
    assert_eq!(retry.outcome(), "acquired");
}

#[tokio::test]
async fn test_invalid_requests() {
    let app = TestApp::new().await;
    let (_, alice) = app.login("alice");

    let anonymous = app
        .request(
            "POST",
            "/api/seats/C1-S1/hold",
            Some(serde_json::json!({ "client_id": "t" })),
            None,
        )
        .await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
    assert_eq!(anonymous.outcome(), "unauthenticated");

    let forged = app
        .request(
            "POST",
            "/api/seats/C1-S1/hold",
            Some(serde_json::json!({ "client_id": "t" })),
            Some("forged.token.value"),
        )
        .await;
    assert_eq!(forged.status, StatusCode::UNAUTHORIZED);

    let unknown = app.hold("C9-S1", "t", &alice).await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
    assert_eq!(unknown.body["error"], "NOT_FOUND");

    let bad_client = app.hold("C1-S1", "has space", &alice).await;
    assert_eq!(bad_client.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_client.body["error"], "VALIDATION_ERROR");
}
