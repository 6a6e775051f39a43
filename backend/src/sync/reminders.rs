//! Reminder notifications for letter-derived calendar events.
//!
//! Two deliberately different inclusion rules exist: this module's
//! `due_offsets` sends every reminder the event has not yet passed ("at
//! least N days away"), so nothing is missed when an event is created close
//! to its date. The daily sweep matches the exact day window instead, which
//! catches thresholds crossed after creation. Keep them separate.

use chrono::{Local, NaiveDate};
use diesel_async::AsyncPgConnection;
use uuid::Uuid;

use shared::models::NotificationType;

use crate::db::{calendar_events, notifications};
use crate::models::NewNotification;

/// Days-before-event thresholds, largest first.
pub const REMINDER_OFFSETS: [i64; 3] = [7, 3, 1];

/// Offsets `k` for which the event is at least `k` days away. For a far
/// future event this yields all three at once; that is intentional.
pub fn due_offsets(today: NaiveDate, event_date: NaiveDate) -> Vec<i64> {
    let days_until = (event_date - today).num_days();
    REMINDER_OFFSETS
        .iter()
        .copied()
        .filter(|offset| days_until >= *offset)
        .collect()
}

/// One reminder notification row for the given threshold.
pub fn reminder_notification(
    event_id: Uuid,
    owner: Uuid,
    title: &str,
    event_date: NaiveDate,
    offset: i64,
) -> NewNotification {
    NewNotification {
        title: "Pengingat Acara".to_string(),
        message: format!(
            "\"{}\" akan berlangsung dalam {} hari ({})",
            title,
            offset,
            event_date.format("%d-%m-%Y"),
        ),
        notification_type: NotificationType::Warning.as_str().to_string(),
        user_id: Some(owner),
        calendar_event_id: Some(event_id),
    }
}

/// Insert all currently-due reminders for an event in one batch. An empty
/// set (event already past every threshold) is not an error. A failed batch
/// propagates so the enclosing letter transaction rolls back.
pub async fn emit_reminders(
    conn: &mut AsyncPgConnection,
    event_id: Uuid,
    owner: Uuid,
    title: &str,
    event_date: NaiveDate,
) -> anyhow::Result<()> {
    let today = Local::now().date_naive();
    let batch: Vec<NewNotification> = due_offsets(today, event_date)
        .into_iter()
        .map(|offset| reminder_notification(event_id, owner, title, event_date, offset))
        .collect();

    if batch.is_empty() {
        return Ok(());
    }

    let inserted = notifications::insert_batch(conn, batch).await?;
    tracing::debug!(event_id = %event_id, count = inserted, "emitted event reminders");

    Ok(())
}

/// Delete every notification tied to the event. Deleting zero rows is fine.
pub async fn clear_reminders(conn: &mut AsyncPgConnection, event_id: Uuid) -> anyhow::Result<()> {
    notifications::delete_for_event(conn, event_id).await?;
    Ok(())
}

/// The event's date changed: drop stale reminders, reset the monotonic
/// notified flags, and emit a fresh batch for the new date.
pub async fn refresh_reminders(
    conn: &mut AsyncPgConnection,
    event_id: Uuid,
    owner: Uuid,
    title: &str,
    new_event_date: NaiveDate,
) -> anyhow::Result<()> {
    clear_reminders(conn, event_id).await?;
    calendar_events::reset_notified_flags(conn, event_id).await?;
    emit_reminders(conn, event_id, owner, title, new_event_date).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn far_future_event_gets_all_three_reminders() {
        let today = date(2026, 8, 24);
        assert_eq!(due_offsets(today, date(2026, 9, 3)), vec![7, 3, 1]);
    }

    #[test]
    fn event_in_two_days_gets_only_the_one_day_reminder() {
        let today = date(2026, 8, 24);
        assert_eq!(due_offsets(today, date(2026, 8, 26)), vec![1]);
    }

    #[test]
    fn past_event_gets_no_reminders() {
        let today = date(2026, 8, 24);
        assert!(due_offsets(today, date(2026, 8, 23)).is_empty());
    }

    #[test]
    fn same_day_event_gets_no_reminders() {
        let today = date(2026, 8, 24);
        assert!(due_offsets(today, today).is_empty());
    }

    #[test]
    fn thresholds_are_inclusive() {
        let today = date(2026, 8, 24);
        // Exactly 7 days out still earns the 7-day reminder.
        assert_eq!(due_offsets(today, date(2026, 8, 31)), vec![7, 3, 1]);
        assert_eq!(due_offsets(today, date(2026, 8, 27)), vec![3, 1]);
        assert_eq!(due_offsets(today, date(2026, 8, 25)), vec![1]);
    }

    #[test]
    fn reminder_message_mentions_offset_and_date() {
        let note = reminder_notification(
            Uuid::nil(),
            Uuid::nil(),
            "[Undangan] Rapat koordinasi",
            date(2026, 9, 3),
            7,
        );
        assert!(note.message.contains("dalam 7 hari"));
        assert!(note.message.contains("03-09-2026"));
        assert_eq!(note.notification_type, "warning");
    }
}
