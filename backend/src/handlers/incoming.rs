//! CRUD handlers for the incoming letter register.
//!
//! Create, update, and delete each run the letter write and the calendar
//! event synchronization inside one transaction: either the letter, its
//! event, and its reminders all persist, or none do.

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::AsyncConnection;
use uuid::Uuid;
use validator::Validate;

use shared::api::{
    CreateIncomingLetterRequest, ListIncomingLettersResponse, ListLettersQuery,
    UpdateIncomingLetterRequest,
};
use shared::models::IncomingLetter;

use crate::db::{incoming_letters, DbPool};
use crate::error::{ApiError, ApiResult};
use crate::models::{IncomingLetterChanges, NewIncomingLetter};
use crate::sync::events::{remove_letter_events, sync_letter_event, LetterRef};
use crate::sync::merge::InvitationPatch;

pub async fn list_incoming_letters(
    State(pool): State<DbPool>,
    Query(query): Query<ListLettersQuery>,
) -> ApiResult<Json<ListIncomingLettersResponse>> {
    let mut conn = pool.get().await?;

    let limit = query.limit.unwrap_or(50).clamp(1, 200);
    let offset = query.offset.unwrap_or(0).max(0);

    let rows = incoming_letters::list(&mut conn, limit, offset, query.is_invitation).await?;
    let total = incoming_letters::count(&mut conn, query.is_invitation).await?;

    Ok(Json(ListIncomingLettersResponse {
        letters: rows.into_iter().map(Into::into).collect(),
        total,
    }))
}

pub async fn get_incoming_letter(
    State(pool): State<DbPool>,
    Path(letter_id): Path<Uuid>,
) -> ApiResult<Json<IncomingLetter>> {
    let mut conn = pool.get().await?;

    let row = incoming_letters::get_by_id(&mut conn, letter_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Incoming letter"))?;

    Ok(Json(row.into()))
}

pub async fn create_incoming_letter(
    State(pool): State<DbPool>,
    Json(payload): Json<CreateIncomingLetterRequest>,
) -> ApiResult<(StatusCode, Json<IncomingLetter>)> {
    payload
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let mut conn = pool.get().await?;

    // Duplicate letter numbers are rejected before the synchronizer runs.
    if incoming_letters::get_by_number(&mut conn, &payload.number)
        .await?
        .is_some()
    {
        return Err(ApiError::conflict(format!(
            "letter number {} already exists",
            payload.number
        )));
    }

    let row = conn
        .transaction::<_, anyhow::Error, _>(|conn| {
            async move {
                let row = incoming_letters::create(conn, NewIncomingLetter::from_request(&payload))
                    .await?;

                // A fresh letter was never an invitation before this request.
                let facts = row.invitation_facts();
                sync_letter_event(
                    conn,
                    LetterRef::incoming(row.id),
                    row.owner_user_id,
                    false,
                    &facts,
                )
                .await?;

                Ok(row)
            }
            .scope_boxed()
        })
        .await?;

    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn update_incoming_letter(
    State(pool): State<DbPool>,
    Path(letter_id): Path<Uuid>,
    Json(payload): Json<UpdateIncomingLetterRequest>,
) -> ApiResult<Json<IncomingLetter>> {
    payload
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let mut conn = pool.get().await?;

    let existing = incoming_letters::get_by_id(&mut conn, letter_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Incoming letter"))?;

    if let Some(new_number) = payload.number.as_deref() {
        if new_number != existing.number
            && incoming_letters::get_by_number(&mut conn, new_number)
                .await?
                .is_some()
        {
            return Err(ApiError::conflict(format!(
                "letter number {} already exists",
                new_number
            )));
        }
    }

    // Merge the patch onto the stored record up front so the synchronizer
    // sees the final values, not the partial payload.
    let was_invitation = existing.is_invitation;
    let facts = existing
        .invitation_facts()
        .merged(&InvitationPatch::from(&payload));
    let changes = IncomingLetterChanges::from_request(&payload);

    let row = conn
        .transaction::<_, anyhow::Error, _>(|conn| {
            async move {
                let row = incoming_letters::update(conn, letter_id, changes).await?;
                sync_letter_event(
                    conn,
                    LetterRef::incoming(row.id),
                    row.owner_user_id,
                    was_invitation,
                    &facts,
                )
                .await?;

                Ok(row)
            }
            .scope_boxed()
        })
        .await?;

    Ok(Json(row.into()))
}

pub async fn delete_incoming_letter(
    State(pool): State<DbPool>,
    Path(letter_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let mut conn = pool.get().await?;

    incoming_letters::get_by_id(&mut conn, letter_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Incoming letter"))?;

    conn.transaction::<_, anyhow::Error, _>(|conn| {
        async move {
            remove_letter_events(conn, LetterRef::incoming(letter_id)).await?;
            incoming_letters::delete(conn, letter_id).await?;
            Ok(())
        }
        .scope_boxed()
    })
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
