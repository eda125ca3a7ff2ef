use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use api_types::notification::{MarkedRead, NotificationListQuery, NotificationListResponse};
use engine::User;

use crate::{ServerError, server::ServerState, views};

/// Newest first. Pass `next_cursor` back as `cursor` for older entries.
pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Query(query): Query<NotificationListQuery>,
) -> Result<Json<NotificationListResponse>, ServerError> {
    let page = state
        .engine
        .list_notifications(
            user.id,
            query.limit,
            query.cursor.as_deref(),
            query.unread_only.unwrap_or(false),
        )
        .await?;

    Ok(Json(NotificationListResponse {
        notifications: page
            .notifications
            .into_iter()
            .map(views::notification)
            .collect(),
        next_cursor: page.next_cursor,
    }))
}

pub async fn mark_read(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(notification_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .mark_notification_read(notification_id, user.id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn mark_all_read(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<MarkedRead>, ServerError> {
    let updated = state.engine.mark_all_read(user.id).await?;
    Ok(Json(MarkedRead { updated }))
}
