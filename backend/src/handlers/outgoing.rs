//! CRUD handlers for the outgoing letter register. Same transactional
//! letter-plus-synchronizer shape as the incoming handlers, minus the
//! follow-up tracking that only incoming letters carry.

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::AsyncConnection;
use uuid::Uuid;
use validator::Validate;

use shared::api::{
    CreateOutgoingLetterRequest, ListLettersQuery, ListOutgoingLettersResponse,
    UpdateOutgoingLetterRequest,
};
use shared::models::OutgoingLetter;

use crate::db::{outgoing_letters, DbPool};
use crate::error::{ApiError, ApiResult};
use crate::models::{NewOutgoingLetter, OutgoingLetterChanges};
use crate::sync::events::{remove_letter_events, sync_letter_event, LetterRef};
use crate::sync::merge::InvitationPatch;

pub async fn list_outgoing_letters(
    State(pool): State<DbPool>,
    Query(query): Query<ListLettersQuery>,
) -> ApiResult<Json<ListOutgoingLettersResponse>> {
    let mut conn = pool.get().await?;

    let limit = query.limit.unwrap_or(50).clamp(1, 200);
    let offset = query.offset.unwrap_or(0).max(0);

    let rows = outgoing_letters::list(&mut conn, limit, offset, query.is_invitation).await?;
    let total = outgoing_letters::count(&mut conn, query.is_invitation).await?;

    Ok(Json(ListOutgoingLettersResponse {
        letters: rows.into_iter().map(Into::into).collect(),
        total,
    }))
}

pub async fn get_outgoing_letter(
    State(pool): State<DbPool>,
    Path(letter_id): Path<Uuid>,
) -> ApiResult<Json<OutgoingLetter>> {
    let mut conn = pool.get().await?;

    let row = outgoing_letters::get_by_id(&mut conn, letter_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Outgoing letter"))?;

    Ok(Json(row.into()))
}

pub async fn create_outgoing_letter(
    State(pool): State<DbPool>,
    Json(payload): Json<CreateOutgoingLetterRequest>,
) -> ApiResult<(StatusCode, Json<OutgoingLetter>)> {
    payload
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let mut conn = pool.get().await?;

    if outgoing_letters::get_by_number(&mut conn, &payload.number)
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
                let row = outgoing_letters::create(conn, NewOutgoingLetter::from_request(&payload))
                    .await?;

                let facts = row.invitation_facts();
                sync_letter_event(
                    conn,
                    LetterRef::outgoing(row.id),
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

pub async fn update_outgoing_letter(
    State(pool): State<DbPool>,
    Path(letter_id): Path<Uuid>,
    Json(payload): Json<UpdateOutgoingLetterRequest>,
) -> ApiResult<Json<OutgoingLetter>> {
    payload
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let mut conn = pool.get().await?;

    let existing = outgoing_letters::get_by_id(&mut conn, letter_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Outgoing letter"))?;

    if let Some(new_number) = payload.number.as_deref() {
        if new_number != existing.number
            && outgoing_letters::get_by_number(&mut conn, new_number)
                .await?
                .is_some()
        {
            return Err(ApiError::conflict(format!(
                "letter number {} already exists",
                new_number
            )));
        }
    }

    let was_invitation = existing.is_invitation;
    let facts = existing
        .invitation_facts()
        .merged(&InvitationPatch::from(&payload));
    let changes = OutgoingLetterChanges::from_request(&payload);

    let row = conn
        .transaction::<_, anyhow::Error, _>(|conn| {
            async move {
                let row = outgoing_letters::update(conn, letter_id, changes).await?;
                sync_letter_event(
                    conn,
                    LetterRef::outgoing(row.id),
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

pub async fn delete_outgoing_letter(
    State(pool): State<DbPool>,
    Path(letter_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let mut conn = pool.get().await?;

    outgoing_letters::get_by_id(&mut conn, letter_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Outgoing letter"))?;

    conn.transaction::<_, anyhow::Error, _>(|conn| {
        async move {
            remove_letter_events(conn, LetterRef::outgoing(letter_id)).await?;
            outgoing_letters::delete(conn, letter_id).await?;
            Ok(())
        }
        .scope_boxed()
    })
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
