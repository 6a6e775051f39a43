//! Calendar event handlers. Letter-derived events show up in every listing
//! like any other event, but they are owned by the synchronizer: the API
//! offers no way to set or edit letter link fields.

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use chrono::Local;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::AsyncConnection;
use uuid::Uuid;
use validator::Validate;

use shared::api::{
    CreateCalendarEventRequest, ListCalendarEventsQuery, ListCalendarEventsResponse,
};
use shared::models::CalendarEvent;

use crate::db::{calendar_events, notifications, DbPool};
use crate::error::{ApiError, ApiResult};
use crate::models::NewCalendarEvent;

pub async fn list_calendar_events(
    State(pool): State<DbPool>,
    Query(query): Query<ListCalendarEventsQuery>,
) -> ApiResult<Json<ListCalendarEventsResponse>> {
    let mut conn = pool.get().await?;

    let rows = calendar_events::list(&mut conn, query.from, query.to).await?;
    let total = rows.len() as i64;

    Ok(Json(ListCalendarEventsResponse {
        events: rows.into_iter().map(Into::into).collect(),
        total,
    }))
}

pub async fn list_upcoming_events(
    State(pool): State<DbPool>,
) -> ApiResult<Json<Vec<CalendarEvent>>> {
    let mut conn = pool.get().await?;

    let today = Local::now().date_naive();
    let rows = calendar_events::list_upcoming(&mut conn, today, 20).await?;

    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

pub async fn get_calendar_event(
    State(pool): State<DbPool>,
    Path(event_id): Path<Uuid>,
) -> ApiResult<Json<CalendarEvent>> {
    let mut conn = pool.get().await?;

    let row = calendar_events::get_by_id(&mut conn, event_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Calendar event"))?;

    Ok(Json(row.into()))
}

pub async fn create_calendar_event(
    State(pool): State<DbPool>,
    Json(payload): Json<CreateCalendarEventRequest>,
) -> ApiResult<(StatusCode, Json<CalendarEvent>)> {
    payload
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let mut conn = pool.get().await?;

    let row = calendar_events::create(&mut conn, NewCalendarEvent::from_request(&payload)).await?;

    Ok((StatusCode::CREATED, Json(row.into())))
}

/// Deleting an event always deletes its notifications with it; orphaned
/// reminders would violate the cascade invariant. A letter-derived event
/// deleted here is recreated the next time its letter is saved.
pub async fn delete_calendar_event(
    State(pool): State<DbPool>,
    Path(event_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let mut conn = pool.get().await?;

    calendar_events::get_by_id(&mut conn, event_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Calendar event"))?;

    conn.transaction::<_, anyhow::Error, _>(|conn| {
        async move {
            notifications::delete_for_event(conn, event_id).await?;
            calendar_events::delete(conn, event_id).await?;
            Ok(())
        }
        .scope_boxed()
    })
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
