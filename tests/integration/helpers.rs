//! Shared test helpers for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use chrono::{Duration, Utc};
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use eventhub_api::AppState;
use eventhub_cache::StoreManager;
use eventhub_cache::memory::MemoryStore;
use eventhub_core::config::{AppConfig, TokenGrant};
use eventhub_entity::event::{Event, EventStatus};
use eventhub_entity::ticket::TicketWithEvent;
use eventhub_service::notification::InMemoryTicketSource;
use eventhub_service::session::StaticSessionResolver;

/// Bearer token granted to [`GUEST_ID`].
pub const GUEST_TOKEN: &str = "guest-token";
/// User holding the seeded tickets.
pub const GUEST_ID: &str = "guest-1";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Ticket data behind the feed
    pub tickets: Arc<InMemoryTicketSource>,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// Create a new test application with one guest token and no tickets.
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.auth.tokens.insert(
            GUEST_TOKEN.to_string(),
            TokenGrant {
                user_id: GUEST_ID.to_string(),
                role: "guest".to_string(),
            },
        );

        let store = Arc::new(StoreManager::from_store(Arc::new(MemoryStore::new(
            &config.cache.memory,
            config.cache.watch_capacity,
        ))));
        let sessions =
            Arc::new(StaticSessionResolver::from_config(&config.auth).expect("valid grants"));
        let tickets = Arc::new(InMemoryTicketSource::new());

        let state = AppState::new(config.clone(), store, sessions, tickets.clone());
        let router = eventhub_api::build_app(state);

        Self {
            router,
            tickets,
            config,
        }
    }

    /// Seed the guest with tickets covering every notification bucket.
    ///
    /// * `tkt-soon`: event in 6 hours (reminder)
    /// * `tkt-week`: event in 4 days (upcoming)
    /// * `tkt-past`: event 36 hours ago (follow-up)
    /// * `tkt-pending`: unapproved event (nothing)
    pub fn seed_guest(&self) {
        let now = Utc::now();
        let tickets = [
            ("tkt-soon", "evt-soon", now + Duration::hours(6), EventStatus::Approved),
            ("tkt-week", "evt-week", now + Duration::days(4), EventStatus::Approved),
            ("tkt-past", "evt-past", now - Duration::hours(36), EventStatus::Approved),
            ("tkt-pending", "evt-pending", now + Duration::hours(6), EventStatus::Pending),
        ];
        for (ticket_id, event_id, date, status) in tickets {
            self.tickets.insert(
                GUEST_ID,
                TicketWithEvent {
                    id: Some(ticket_id.to_string()),
                    event_id: Some(event_id.to_string()),
                    created_at: Some((now - Duration::days(5)).to_rfc3339()),
                    event: Some(Event {
                        id: Some(event_id.to_string()),
                        title: format!("Event {event_id}"),
                        date: Some(date.to_rfc3339()),
                        location: "Main Hall".to_string(),
                        status,
                        ..Event::default()
                    }),
                },
            );
        }
    }

    /// Send a GET request through the router.
    pub async fn get(&self, path: &str, token: Option<&str>) -> TestResponse {
        let mut req = Request::builder().method("GET").uri(path);

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req.body(Body::empty()).expect("Failed to build request");

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

    /// Serve the app on an ephemeral local port.
    pub async fn spawn_server(&self) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");
        let router = self.router.clone();
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Test server failed");
        });
        addr
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
    /// Notification ids in response order.
    pub fn ids(&self) -> Vec<String> {
        self.body["notifications"]
            .as_array()
            .map(|list| {
                list.iter()
                    .filter_map(|n| n["id"].as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default()
    }
}
