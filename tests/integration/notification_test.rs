//! HTTP tests for the notification feed endpoints.

use http::StatusCode;

use crate::helpers::{GUEST_TOKEN, TestApp};

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.get("/api/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["store"], "ok");
}

#[tokio::test]
async fn test_feed_requires_token() {
    let app = TestApp::new();

    let missing = app.get("/api/notifications", None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.body["error"], "UNAUTHORIZED");
    assert!(missing.body["message"].is_string());

    let unknown = app.get("/api/notifications", Some("not-a-token")).await;
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);

    let count = app.get("/api/notifications/unread-count", Some("")).await;
    assert_eq!(count.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_feed_derives_notifications() {
    let app = TestApp::new();
    app.seed_guest();

    let response = app.get("/api/notifications", Some(GUEST_TOKEN)).await;
    assert_eq!(response.status, StatusCode::OK);

    let ids = response.ids();
    assert_eq!(
        ids,
        vec![
            // createdAt = event date, 4 days out
            "guest:evt-week:upcoming",
            // createdAt = now
            "guest:evt-soon:reminder",
            // createdAt = event date + 12h
            "guest:evt-past:completed",
            // createdAt = now - 5 days, encounter order
            "guest:tkt-soon:confirmed",
            "guest:tkt-week:confirmed",
            "guest:tkt-past:confirmed",
        ]
    );
    assert!(!ids.iter().any(|id| id.contains("pending")));
    assert_eq!(response.body["unreadCount"], 6);

    let reminder = &response.body["notifications"][1];
    assert_eq!(reminder["type"], "event-reminder");
    assert_eq!(reminder["tone"], "highlight");
    assert_eq!(reminder["headline"], "Happening soon");
    assert_eq!(reminder["eventId"], "evt-soon");
    assert_eq!(reminder["isRead"], false);
    assert!(reminder["createdAt"].is_string());
}

#[tokio::test]
async fn test_unread_count_endpoint() {
    let app = TestApp::new();

    let empty = app.get("/api/notifications/unread-count", Some(GUEST_TOKEN)).await;
    assert_eq!(empty.status, StatusCode::OK);
    assert_eq!(empty.body, serde_json::json!({ "unreadCount": 0 }));

    app.seed_guest();
    let seeded = app.get("/api/notifications/unread-count", Some(GUEST_TOKEN)).await;
    assert_eq!(seeded.body["unreadCount"], 6);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = TestApp::new();
    let response = app.get("/api/notifications/nope/extra", Some(GUEST_TOKEN)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
