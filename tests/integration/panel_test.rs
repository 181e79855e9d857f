//! End-to-end tests: the client panel and fetcher against a running server.

use std::sync::Arc;
use std::time::Duration;

use eventhub_cache::memory::MemoryStore;
use eventhub_core::config::{BadgeConfig, MemoryCacheConfig, PanelConfig};
use eventhub_core::error::ErrorKind;
use eventhub_core::events::SessionSignal;
use eventhub_core::traits::store::KeyValueStore;
use eventhub_core::types::id::ContextId;
use eventhub_realtime::badge::BadgeStore;
use eventhub_realtime::panel::{
    HttpNotificationFetcher, NotificationFetcher, NotificationPanel, PanelVisibility,
};
use eventhub_realtime::session_control::SessionInvalidator;

use crate::helpers::{GUEST_TOKEN, TestApp};

struct Client {
    store: Arc<dyn KeyValueStore>,
    config: PanelConfig,
}

impl Client {
    async fn new(base_url: String, token: &str) -> Self {
        let config = PanelConfig {
            api_base_url: base_url,
            ..PanelConfig::default()
        };
        let store: Arc<dyn KeyValueStore> =
            Arc::new(MemoryStore::new(&MemoryCacheConfig { max_capacity: 100 }, 16));
        store
            .set(&config.credentials_key, token, ContextId::new())
            .await
            .unwrap();
        Self { store, config }
    }

    fn fetcher(&self) -> HttpNotificationFetcher {
        HttpNotificationFetcher::new(&self.config, Arc::clone(&self.store))
    }
}

async fn wait_for<F: Fn() -> bool>(condition: F) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not met within 2s");
}

#[tokio::test]
async fn test_fetcher_reads_feed() {
    let app = TestApp::new();
    app.seed_guest();
    let addr = app.spawn_server().await;
    let client = Client::new(format!("http://{addr}"), GUEST_TOKEN).await;

    let feed = client.fetcher().fetch().await.unwrap();
    assert_eq!(feed.notifications.len(), 6);
    assert_eq!(feed.unread_count, Some(6));
    assert_eq!(feed.notifications[1].id, "guest:evt-soon:reminder");
}

#[tokio::test]
async fn test_fetcher_maps_rejected_session() {
    let app = TestApp::new();
    let addr = app.spawn_server().await;
    let client = Client::new(format!("http://{addr}"), "revoked-token").await;

    let err = client.fetcher().fetch().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authentication);
}

#[tokio::test]
async fn test_unknown_path_is_transient() {
    let app = TestApp::new();
    let addr = app.spawn_server().await;
    // Nothing is served under this prefix.
    let client = Client::new(format!("http://{addr}/missing"), GUEST_TOKEN).await;

    let err = client.fetcher().fetch().await.unwrap_err();
    assert!(!err.is_session_fatal());
}

#[tokio::test]
async fn test_panel_loads_and_syncs_badge() {
    let app = TestApp::new();
    app.seed_guest();
    let addr = app.spawn_server().await;
    let client = Client::new(format!("http://{addr}"), GUEST_TOKEN).await;

    let badge = Arc::new(BadgeStore::connect(Arc::clone(&client.store), &BadgeConfig::default()).await);
    let other_tab = BadgeStore::connect(Arc::clone(&client.store), &BadgeConfig::default()).await;
    let session = Arc::new(SessionInvalidator::new(
        Arc::clone(&client.store),
        client.config.credentials_key.clone(),
        app.config.auth.sign_in_path.clone(),
        badge.context_id(),
    ));
    let panel = NotificationPanel::new(
        Arc::new(client.fetcher()),
        Arc::clone(&badge),
        session,
        &client.config,
    );

    panel.toggle();
    wait_for(|| panel.snapshot().loaded).await;

    let snap = panel.snapshot();
    assert_eq!(snap.visibility, PanelVisibility::Open);
    assert_eq!(snap.items.len(), 6);
    assert_eq!(badge.get(), 6);
    wait_for(|| other_tab.get() == 6).await;

    panel.clear().await;
    assert_eq!(badge.get(), 0);
    wait_for(|| other_tab.get() == 0).await;

    panel.toggle();
    wait_for(|| panel.visibility() == PanelVisibility::Closed).await;
}

#[tokio::test]
async fn test_panel_ends_rejected_session() {
    let app = TestApp::new();
    let addr = app.spawn_server().await;
    let client = Client::new(format!("http://{addr}"), "stale-token").await;

    let badge = Arc::new(BadgeStore::connect(Arc::clone(&client.store), &BadgeConfig::default()).await);
    let session = Arc::new(SessionInvalidator::new(
        Arc::clone(&client.store),
        client.config.credentials_key.clone(),
        "/sign-in",
        badge.context_id(),
    ));
    let mut signals = session.subscribe();
    let panel = NotificationPanel::new(
        Arc::new(client.fetcher()),
        badge,
        session,
        &client.config,
    );

    panel.open();
    let signal = tokio::time::timeout(Duration::from_secs(2), signals.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(signal, SessionSignal::ended("/sign-in"));

    let token = client.store.get(&client.config.credentials_key).await.unwrap();
    assert!(token.is_none());
    wait_for(|| panel.visibility() == PanelVisibility::Closed).await;
    assert!(panel.snapshot().error.is_none());
}
