//! Fetching the notification feed for the panel.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use eventhub_core::config::PanelConfig;
use eventhub_core::error::ErrorKind;
use eventhub_core::traits::store::KeyValueStore;
use eventhub_core::{AppError, AppResult};
use eventhub_entity::notification::NotificationFeed;

/// Loads the caller's notification feed.
///
/// An [`ErrorKind::Authentication`] error means the session is no longer
/// valid; any other error is treated as transient.
#[async_trait]
pub trait NotificationFetcher: Send + Sync + std::fmt::Debug + 'static {
    /// Fetch the current feed.
    async fn fetch(&self) -> AppResult<NotificationFeed>;
}

/// Fetcher calling `GET {api_base_url}/api/notifications` with the bearer
/// token kept in the durable store.
#[derive(Debug, Clone)]
pub struct HttpNotificationFetcher {
    http: reqwest::Client,
    base_url: String,
    store: Arc<dyn KeyValueStore>,
    credentials_key: String,
}

impl HttpNotificationFetcher {
    /// Creates a fetcher from panel configuration.
    pub fn new(config: &PanelConfig, store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_client(reqwest::Client::new(), config, store)
    }

    /// Creates a fetcher sharing an existing HTTP client.
    pub fn with_client(
        http: reqwest::Client,
        config: &PanelConfig,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            store,
            credentials_key: config.credentials_key.clone(),
        }
    }

    fn feed_url(&self) -> String {
        format!("{}/api/notifications", self.base_url)
    }
}

#[async_trait]
impl NotificationFetcher for HttpNotificationFetcher {
    async fn fetch(&self) -> AppResult<NotificationFeed> {
        let token = self
            .store
            .get(&self.credentials_key)
            .await?
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::authentication("No stored session token"))?;

        let url = self.feed_url();
        let resp = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::ExternalService,
                    format!("Notification request failed: {e}"),
                    e,
                )
            })?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AppError::authentication(format!(
                "Notification API rejected the session ({})",
                status.as_u16()
            )));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AppError::external_service(format!(
                "Notification API returned {}: {body}",
                status.as_u16()
            )));
        }

        let feed: NotificationFeed = resp.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("Invalid notification response: {e}"),
                e,
            )
        })?;
        debug!(url = %url, count = feed.notifications.len(), "Fetched notifications");
        Ok(feed)
    }
}
