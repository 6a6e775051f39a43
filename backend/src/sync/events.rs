//! Applies the planned calendar event mutation for a letter.

use anyhow::Context;
use diesel_async::AsyncPgConnection;
use uuid::Uuid;

use shared::models::{EventType, LetterKind};

use crate::db::calendar_events;
use crate::models::{CalendarEventRow, NewCalendarEvent};
use crate::sync::merge::InvitationFacts;
use crate::sync::plan::{plan_event_action, EventAction, SyncState};
use crate::sync::reminders;

/// Identifies the letter a calendar event is derived from.
#[derive(Debug, Clone, Copy)]
pub struct LetterRef {
    pub kind: LetterKind,
    pub id: Uuid,
}

impl LetterRef {
    pub fn incoming(id: Uuid) -> Self {
        Self {
            kind: LetterKind::Incoming,
            id,
        }
    }

    pub fn outgoing(id: Uuid) -> Self {
        Self {
            kind: LetterKind::Outgoing,
            id,
        }
    }
}

/// Reconcile a letter's calendar event and reminders against its final
/// invitation fields. Must run inside the transaction that persisted the
/// letter itself; any error here rolls the whole letter mutation back.
pub async fn sync_letter_event(
    conn: &mut AsyncPgConnection,
    letter: LetterRef,
    owner: Uuid,
    was_invitation: bool,
    facts: &InvitationFacts,
) -> anyhow::Result<()> {
    let existing = find_canonical_event(conn, letter).await?;

    let state = SyncState {
        was_invitation,
        is_invitation: facts.is_invitation,
        new_event_date: facts.event_date,
        existing_event_date: existing.as_ref().map(|event| event.date),
    };
    let action = plan_event_action(state);
    tracing::debug!(
        letter_id = %letter.id,
        kind = ?letter.kind,
        was_invitation = state.was_invitation,
        is_invitation = state.is_invitation,
        action = ?action,
        "syncing letter calendar event"
    );

    match action {
        EventAction::Create => {
            let event_date = facts
                .event_date
                .context("create action requires an event date")?;
            let title = letter.kind.event_title(&facts.subject);

            let row = calendar_events::create(
                conn,
                NewCalendarEvent {
                    title: title.clone(),
                    description: facts.event_notes.clone(),
                    date: event_date,
                    time: facts.event_time.clone(),
                    location: facts.event_location.clone(),
                    event_type: EventType::Meeting.as_str().to_string(),
                    owner_user_id: owner,
                    incoming_letter_id: (letter.kind == LetterKind::Incoming)
                        .then_some(letter.id),
                    outgoing_letter_id: (letter.kind == LetterKind::Outgoing)
                        .then_some(letter.id),
                },
            )
            .await?;

            reminders::emit_reminders(conn, row.id, owner, &title, event_date).await?;
        }
        EventAction::Update { refresh_reminders } => {
            let event = existing.context("update action requires an existing event")?;
            let event_date = facts
                .event_date
                .context("update action requires an event date")?;
            let title = letter.kind.event_title(&facts.subject);

            calendar_events::update_fields(
                conn,
                event.id,
                &title,
                facts.event_notes.as_deref(),
                event_date,
                facts.event_time.as_deref(),
                facts.event_location.as_deref(),
            )
            .await?;

            if refresh_reminders {
                reminders::refresh_reminders(conn, event.id, owner, &title, event_date).await?;
            }
        }
        EventAction::Delete => {
            if let Some(event) = existing {
                reminders::clear_reminders(conn, event.id).await?;
                calendar_events::delete(conn, event.id).await?;
            }
        }
        EventAction::Ignore => {}
    }

    Ok(())
}

/// Delete-cascade for letter deletion: clear reminders for every linked
/// event, then delete the events. The caller deletes the letter afterwards,
/// all inside one transaction.
pub async fn remove_letter_events(
    conn: &mut AsyncPgConnection,
    letter: LetterRef,
) -> anyhow::Result<()> {
    for event in calendar_events::find_by_letter(conn, letter.kind, letter.id).await? {
        reminders::clear_reminders(conn, event.id).await?;
        calendar_events::delete(conn, event.id).await?;
    }

    Ok(())
}

/// The invariant says at most one event per letter. If more are found, keep
/// the oldest as canonical and delete the rest (with their notifications)
/// rather than silently picking one.
async fn find_canonical_event(
    conn: &mut AsyncPgConnection,
    letter: LetterRef,
) -> anyhow::Result<Option<CalendarEventRow>> {
    let mut rows = calendar_events::find_by_letter(conn, letter.kind, letter.id).await?;

    if rows.len() > 1 {
        tracing::warn!(
            letter_id = %letter.id,
            count = rows.len(),
            "multiple calendar events linked to one letter; keeping the oldest"
        );
        for extra in rows.split_off(1) {
            reminders::clear_reminders(conn, extra.id).await?;
            calendar_events::delete(conn, extra.id).await?;
        }
    }

    Ok(rows.into_iter().next())
}
