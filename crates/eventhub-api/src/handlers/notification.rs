//! Notification feed handlers.

use axum::Json;
use axum::extract::State;

use eventhub_entity::notification::{NotificationFeed, UnreadCount};

use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<NotificationFeed>, ApiError> {
    let feed = state.feed_service.feed(&auth).await?;
    Ok(Json(feed))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UnreadCount>, ApiError> {
    let count = state.feed_service.unread_count(&auth).await?;
    Ok(Json(count))
}
