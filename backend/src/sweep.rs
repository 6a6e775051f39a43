//! Daily reminder sweep.
//!
//! Catches what the write-time synchronizer cannot: events created long ago
//! that have since crossed a 7/3/1-day threshold, and incoming letters whose
//! follow-up deadline lapsed. Unlike the emitter's "at least N days away"
//! rule, the sweep matches the exact day window; the `notified_*` flags and
//! the overdue stamp make each run idempotent. A run that dies partway is
//! simply finished by the next one.

use std::time::Duration;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use tokio::time;

use shared::models::NotificationType;

use crate::db::{calendar_events, incoming_letters, notifications, DbPool};
use crate::models::{CalendarEventRow, IncomingLetterRow, NewNotification};
use crate::sync::reminders::REMINDER_OFFSETS;

pub struct SweepScheduler {
    pool: DbPool,
    hour: u32,
}

/// Seconds until the next occurrence of `hour` o'clock, local wall clock.
/// A run scheduled for this exact second waits a full day; never returns 0.
pub fn seconds_until_next_run(now: NaiveDateTime, hour: u32) -> u64 {
    let run_time = NaiveTime::from_hms_opt(hour.min(23), 0, 0).unwrap_or(NaiveTime::MIN);
    let today_run = now.date().and_time(run_time);

    let next = if now < today_run {
        today_run
    } else {
        today_run + chrono::Duration::days(1)
    };

    (next - now).num_seconds().max(1) as u64
}

/// Exact-window target dates for one sweep run: an event is due for the
/// 7-day reminder when its date is exactly a week out, and so on.
pub fn sweep_targets(today: NaiveDate) -> [(i64, NaiveDate); 3] {
    REMINDER_OFFSETS.map(|offset| (offset, today + chrono::Duration::days(offset)))
}

impl SweepScheduler {
    pub fn new(pool: DbPool, hour: u32) -> Self {
        Self { pool, hour }
    }

    /// Runs forever; the caller holds the task handle and aborts it on
    /// shutdown. If several instances run behind a load balancer each fires
    /// its own sweep, so deployments must keep a single active scheduler.
    pub async fn run(&self) {
        tracing::info!(hour = self.hour, "Daily reminder sweep scheduler started");

        loop {
            let wait = seconds_until_next_run(Local::now().naive_local(), self.hour);
            tracing::debug!(seconds = wait, "Sweep sleeping until next scheduled run");
            time::sleep(Duration::from_secs(wait)).await;

            if let Err(e) = self.sweep_once().await {
                tracing::error!("Reminder sweep failed: {:?}", e);
                // Flags and stamps make the next run pick up the remainder.
            }
        }
    }

    /// One sweep pass. Per-item failures are logged and skipped; only an
    /// unusable connection aborts the pass.
    pub async fn sweep_once(&self) -> anyhow::Result<()> {
        let mut conn = self.pool.get().await?;
        let today = Local::now().date_naive();

        for (offset, target_date) in sweep_targets(today) {
            let due = calendar_events::list_due_on(&mut conn, target_date, offset).await?;

            for event in &due {
                if let Err(e) = notify_event(&mut conn, event, offset).await {
                    tracing::error!(
                        event_id = %event.id,
                        offset,
                        "failed to emit sweep reminder: {:?}",
                        e
                    );
                }
            }
        }

        let overdue = incoming_letters::list_overdue_follow_ups(&mut conn, today).await?;
        for letter in &overdue {
            if let Err(e) = notify_overdue_follow_up(&mut conn, letter).await {
                tracing::error!(
                    letter_id = %letter.id,
                    "failed to emit overdue follow-up notice: {:?}",
                    e
                );
            }
        }

        Ok(())
    }
}

/// Exact-window reminder: the event happens in exactly `offset` days. Sets
/// the matching notified flag so reruns on the same day stay silent.
async fn notify_event(
    conn: &mut diesel_async::AsyncPgConnection,
    event: &CalendarEventRow,
    offset: i64,
) -> anyhow::Result<()> {
    let note = NewNotification {
        title: "Pengingat Acara".to_string(),
        message: format!(
            "\"{}\" akan berlangsung dalam {} hari ({})",
            event.title,
            offset,
            event.date.format("%d-%m-%Y"),
        ),
        notification_type: NotificationType::Warning.as_str().to_string(),
        user_id: Some(event.owner_user_id),
        calendar_event_id: Some(event.id),
    };

    notifications::insert_batch(conn, vec![note]).await?;
    calendar_events::set_notified_flag(conn, event.id, offset).await?;

    Ok(())
}

/// Overdue follow-up notice, stamped so it fires once per letter.
async fn notify_overdue_follow_up(
    conn: &mut diesel_async::AsyncPgConnection,
    letter: &IncomingLetterRow,
) -> anyhow::Result<()> {
    let deadline = letter
        .follow_up_deadline
        .map(|d| d.format("%d-%m-%Y").to_string())
        .unwrap_or_else(|| "-".to_string());

    let note = NewNotification {
        title: "Tindak Lanjut Terlambat".to_string(),
        message: format!(
            "Surat \"{}\" ({}) melewati batas waktu tindak lanjut ({})",
            letter.subject, letter.number, deadline,
        ),
        notification_type: NotificationType::Error.as_str().to_string(),
        user_id: Some(letter.owner_user_id),
        calendar_event_id: None,
    };

    notifications::insert_batch(conn, vec![note]).await?;
    incoming_letters::mark_overdue_notified(conn, letter.id, Utc::now()).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 24)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn before_the_hour_waits_until_today() {
        assert_eq!(seconds_until_next_run(at(4, 0), 6), 2 * 3600);
    }

    #[test]
    fn after_the_hour_waits_until_tomorrow() {
        assert_eq!(seconds_until_next_run(at(7, 30), 6), 22 * 3600 + 1800);
    }

    #[test]
    fn exactly_on_the_hour_waits_a_full_day() {
        assert_eq!(seconds_until_next_run(at(6, 0), 6), 24 * 3600);
    }

    #[test]
    fn out_of_range_hour_is_clamped() {
        // Config validates this, but a bad value must not panic here.
        assert_eq!(seconds_until_next_run(at(22, 0), 30), 3600);
    }

    #[test]
    fn sweep_targets_pair_each_offset_with_its_exact_day() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        assert_eq!(
            sweep_targets(today),
            [
                (7, NaiveDate::from_ymd_opt(2026, 8, 31).unwrap()),
                (3, NaiveDate::from_ymd_opt(2026, 8, 27).unwrap()),
                (1, NaiveDate::from_ymd_opt(2026, 8, 25).unwrap()),
            ]
        );
    }

    #[test]
    fn sweep_targets_cross_month_boundaries() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();
        assert_eq!(
            sweep_targets(today)[0],
            (7, NaiveDate::from_ymd_opt(2026, 9, 6).unwrap())
        );
    }
}
