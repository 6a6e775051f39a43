//! Notification handlers. Letter- and event-derived notifications are
//! treated exactly like any other row here.

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use shared::api::{ListNotificationsQuery, MarkAllReadQuery};
use shared::models::Notification;

use crate::db::{notifications, DbPool};
use crate::error::{ApiError, ApiResult};

pub async fn list_notifications(
    State(pool): State<DbPool>,
    Query(query): Query<ListNotificationsQuery>,
) -> ApiResult<Json<Vec<Notification>>> {
    let mut conn = pool.get().await?;

    let limit = query.limit.unwrap_or(100).clamp(1, 500);
    let rows = notifications::list(
        &mut conn,
        query.user_id,
        query.unread_only.unwrap_or(false),
        limit,
    )
    .await?;

    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

pub async fn mark_notification_read(
    State(pool): State<DbPool>,
    Path(notification_id): Path<Uuid>,
) -> ApiResult<Json<Notification>> {
    let mut conn = pool.get().await?;

    let row = notifications::mark_read(&mut conn, notification_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Notification"))?;

    Ok(Json(row.into()))
}

pub async fn mark_all_notifications_read(
    State(pool): State<DbPool>,
    Query(query): Query<MarkAllReadQuery>,
) -> ApiResult<StatusCode> {
    let mut conn = pool.get().await?;

    let updated = notifications::mark_all_read(&mut conn, query.user_id).await?;
    tracing::debug!(count = updated, "marked notifications as read");

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_notification(
    State(pool): State<DbPool>,
    Path(notification_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let mut conn = pool.get().await?;

    notifications::delete(&mut conn, notification_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
