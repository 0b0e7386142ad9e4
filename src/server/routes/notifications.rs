//! Notification endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::server::state::AppState;
use crate::store::{NotificationId, NotificationItem, NotificationKind};

/// Body of a new notification.
#[derive(Debug, Deserialize)]
pub struct CreateNotification {
    pub message: String,
    /// Falls back to `info`
    #[serde(default)]
    pub kind: NotificationKind,
    pub title: Option<String>,
    pub duration_ms: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct CreatedNotification {
    pub id: NotificationId,
}

/// GET /api/notifications - Current stack, newest first
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<NotificationItem>> {
    Json(state.notifications.list())
}

/// POST /api/notifications
///
/// Without a title the kind's localized default title is used.
pub async fn create_notification(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateNotification>,
) -> Result<(StatusCode, Json<CreatedNotification>), StatusCode> {
    if body.message.trim().is_empty() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }

    let duration = body.duration_ms.map(Duration::from_millis);
    let title = body.title.as_deref();
    let store = &state.notifications;
    let id = match body.kind {
        NotificationKind::Success => store.notify_success(body.message, title, duration),
        NotificationKind::Error => store.notify_error(body.message, title, duration),
        NotificationKind::Warning => store.notify_warning(body.message, title, duration),
        NotificationKind::Info => store.notify_info(body.message, title, duration),
    };

    Ok((StatusCode::CREATED, Json(CreatedNotification { id })))
}

/// DELETE /api/notifications/:id - Idempotent dismissal
pub async fn dismiss_notification(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> StatusCode {
    state.notifications.dismiss(NotificationId(id));
    StatusCode::NO_CONTENT
}

/// DELETE /api/notifications - Remove everything
pub async fn clear_notifications(State(state): State<Arc<AppState>>) -> StatusCode {
    state.notifications.clear();
    StatusCode::NO_CONTENT
}
