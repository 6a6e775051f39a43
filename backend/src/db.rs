use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use diesel_async::{
    pooled_connection::{deadpool::Pool, AsyncDieselConnectionManager},
    AsyncPgConnection, RunQueryDsl,
};
use uuid::Uuid;

use shared::models::LetterKind;

use crate::models::{
    CalendarEventRow, IncomingLetterChanges, IncomingLetterRow, NewCalendarEvent,
    NewIncomingLetter, NewNotification, NewOutgoingLetter, NotificationRow, OutgoingLetterChanges,
    OutgoingLetterRow,
};

pub type DbPool = Pool<AsyncPgConnection>;

pub fn establish_connection_pool(database_url: &str) -> anyhow::Result<DbPool> {
    let config = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
    let pool = Pool::builder(config).build()?;

    Ok(pool)
}

// Incoming letter database operations
pub mod incoming_letters {
    use super::*;

    pub async fn list(
        conn: &mut AsyncPgConnection,
        limit_val: i64,
        offset_val: i64,
        invitation_filter: Option<bool>,
    ) -> anyhow::Result<Vec<IncomingLetterRow>> {
        use crate::schema::incoming_letters::dsl::*;

        let mut query = incoming_letters
            .order_by(received_date.desc())
            .limit(limit_val)
            .offset(offset_val)
            .into_boxed();

        if let Some(flag) = invitation_filter {
            query = query.filter(is_invitation.eq(flag));
        }

        let rows = query.load::<IncomingLetterRow>(conn).await?;
        Ok(rows)
    }

    pub async fn count(
        conn: &mut AsyncPgConnection,
        invitation_filter: Option<bool>,
    ) -> anyhow::Result<i64> {
        use crate::schema::incoming_letters::dsl::*;

        let total: i64 = match invitation_filter {
            Some(flag) => {
                incoming_letters
                    .filter(is_invitation.eq(flag))
                    .count()
                    .get_result(conn)
                    .await?
            }
            None => incoming_letters.count().get_result(conn).await?,
        };

        Ok(total)
    }

    pub async fn get_by_id(
        conn: &mut AsyncPgConnection,
        letter_id: Uuid,
    ) -> anyhow::Result<Option<IncomingLetterRow>> {
        use crate::schema::incoming_letters::dsl::*;

        let row = incoming_letters
            .filter(id.eq(letter_id))
            .first::<IncomingLetterRow>(conn)
            .await
            .optional()?;

        Ok(row)
    }

    pub async fn get_by_number(
        conn: &mut AsyncPgConnection,
        number_val: &str,
    ) -> anyhow::Result<Option<IncomingLetterRow>> {
        use crate::schema::incoming_letters::dsl::*;

        let row = incoming_letters
            .filter(number.eq(number_val))
            .first::<IncomingLetterRow>(conn)
            .await
            .optional()?;

        Ok(row)
    }

    pub async fn create(
        conn: &mut AsyncPgConnection,
        new_letter: NewIncomingLetter,
    ) -> anyhow::Result<IncomingLetterRow> {
        use crate::schema::incoming_letters::dsl::*;

        let row = diesel::insert_into(incoming_letters)
            .values(new_letter)
            .get_result::<IncomingLetterRow>(conn)
            .await?;

        Ok(row)
    }

    pub async fn update(
        conn: &mut AsyncPgConnection,
        letter_id: Uuid,
        mut changes: IncomingLetterChanges,
    ) -> anyhow::Result<IncomingLetterRow> {
        use crate::schema::incoming_letters::dsl::*;

        changes.updated_at = Some(Utc::now());

        let row = diesel::update(incoming_letters.filter(id.eq(letter_id)))
            .set(changes)
            .get_result::<IncomingLetterRow>(conn)
            .await?;

        Ok(row)
    }

    pub async fn delete(conn: &mut AsyncPgConnection, letter_id: Uuid) -> anyhow::Result<()> {
        use crate::schema::incoming_letters::dsl::*;

        diesel::delete(incoming_letters.filter(id.eq(letter_id)))
            .execute(conn)
            .await?;

        Ok(())
    }

    /// Letters whose follow-up deadline has passed without an overdue notice.
    pub async fn list_overdue_follow_ups(
        conn: &mut AsyncPgConnection,
        today: NaiveDate,
    ) -> anyhow::Result<Vec<IncomingLetterRow>> {
        use crate::schema::incoming_letters::dsl::*;

        let rows = incoming_letters
            .filter(needs_follow_up.eq(true))
            .filter(follow_up_deadline.lt(today))
            .filter(overdue_notified_at.is_null())
            .order_by(follow_up_deadline.asc())
            .load::<IncomingLetterRow>(conn)
            .await?;

        Ok(rows)
    }

    pub async fn mark_overdue_notified(
        conn: &mut AsyncPgConnection,
        letter_id: Uuid,
        notified_at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        use crate::schema::incoming_letters::dsl::*;

        diesel::update(incoming_letters.filter(id.eq(letter_id)))
            .set(overdue_notified_at.eq(Some(notified_at)))
            .execute(conn)
            .await?;

        Ok(())
    }
}

// Outgoing letter database operations
pub mod outgoing_letters {
    use super::*;

    pub async fn list(
        conn: &mut AsyncPgConnection,
        limit_val: i64,
        offset_val: i64,
        invitation_filter: Option<bool>,
    ) -> anyhow::Result<Vec<OutgoingLetterRow>> {
        use crate::schema::outgoing_letters::dsl::*;

        let mut query = outgoing_letters
            .order_by(sent_date.desc())
            .limit(limit_val)
            .offset(offset_val)
            .into_boxed();

        if let Some(flag) = invitation_filter {
            query = query.filter(is_invitation.eq(flag));
        }

        let rows = query.load::<OutgoingLetterRow>(conn).await?;
        Ok(rows)
    }

    pub async fn count(
        conn: &mut AsyncPgConnection,
        invitation_filter: Option<bool>,
    ) -> anyhow::Result<i64> {
        use crate::schema::outgoing_letters::dsl::*;

        let total: i64 = match invitation_filter {
            Some(flag) => {
                outgoing_letters
                    .filter(is_invitation.eq(flag))
                    .count()
                    .get_result(conn)
                    .await?
            }
            None => outgoing_letters.count().get_result(conn).await?,
        };

        Ok(total)
    }

    pub async fn get_by_id(
        conn: &mut AsyncPgConnection,
        letter_id: Uuid,
    ) -> anyhow::Result<Option<OutgoingLetterRow>> {
        use crate::schema::outgoing_letters::dsl::*;

        let row = outgoing_letters
            .filter(id.eq(letter_id))
            .first::<OutgoingLetterRow>(conn)
            .await
            .optional()?;

        Ok(row)
    }

    pub async fn get_by_number(
        conn: &mut AsyncPgConnection,
        number_val: &str,
    ) -> anyhow::Result<Option<OutgoingLetterRow>> {
        use crate::schema::outgoing_letters::dsl::*;

        let row = outgoing_letters
            .filter(number.eq(number_val))
            .first::<OutgoingLetterRow>(conn)
            .await
            .optional()?;

        Ok(row)
    }

    pub async fn create(
        conn: &mut AsyncPgConnection,
        new_letter: NewOutgoingLetter,
    ) -> anyhow::Result<OutgoingLetterRow> {
        use crate::schema::outgoing_letters::dsl::*;

        let row = diesel::insert_into(outgoing_letters)
            .values(new_letter)
            .get_result::<OutgoingLetterRow>(conn)
            .await?;

        Ok(row)
    }

    pub async fn update(
        conn: &mut AsyncPgConnection,
        letter_id: Uuid,
        mut changes: OutgoingLetterChanges,
    ) -> anyhow::Result<OutgoingLetterRow> {
        use crate::schema::outgoing_letters::dsl::*;

        changes.updated_at = Some(Utc::now());

        let row = diesel::update(outgoing_letters.filter(id.eq(letter_id)))
            .set(changes)
            .get_result::<OutgoingLetterRow>(conn)
            .await?;

        Ok(row)
    }

    pub async fn delete(conn: &mut AsyncPgConnection, letter_id: Uuid) -> anyhow::Result<()> {
        use crate::schema::outgoing_letters::dsl::*;

        diesel::delete(outgoing_letters.filter(id.eq(letter_id)))
            .execute(conn)
            .await?;

        Ok(())
    }
}

// Calendar event database operations
pub mod calendar_events {
    use super::*;

    pub async fn list(
        conn: &mut AsyncPgConnection,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> anyhow::Result<Vec<CalendarEventRow>> {
        use crate::schema::calendar_events::dsl::*;

        let mut query = calendar_events.order_by(date.asc()).into_boxed();

        if let Some(start) = from {
            query = query.filter(date.ge(start));
        }
        if let Some(end) = to {
            query = query.filter(date.le(end));
        }

        let rows = query.load::<CalendarEventRow>(conn).await?;
        Ok(rows)
    }

    pub async fn list_upcoming(
        conn: &mut AsyncPgConnection,
        today: NaiveDate,
        limit_val: i64,
    ) -> anyhow::Result<Vec<CalendarEventRow>> {
        use crate::schema::calendar_events::dsl::*;

        let rows = calendar_events
            .filter(date.ge(today))
            .order_by(date.asc())
            .limit(limit_val)
            .load::<CalendarEventRow>(conn)
            .await?;

        Ok(rows)
    }

    pub async fn get_by_id(
        conn: &mut AsyncPgConnection,
        event_id: Uuid,
    ) -> anyhow::Result<Option<CalendarEventRow>> {
        use crate::schema::calendar_events::dsl::*;

        let row = calendar_events
            .filter(id.eq(event_id))
            .first::<CalendarEventRow>(conn)
            .await
            .optional()?;

        Ok(row)
    }

    /// Events linked to the given letter, oldest first.
    pub async fn find_by_letter(
        conn: &mut AsyncPgConnection,
        kind: LetterKind,
        letter_id: Uuid,
    ) -> anyhow::Result<Vec<CalendarEventRow>> {
        use crate::schema::calendar_events::dsl::*;

        let query = match kind {
            LetterKind::Incoming => calendar_events
                .filter(incoming_letter_id.eq(letter_id))
                .into_boxed(),
            LetterKind::Outgoing => calendar_events
                .filter(outgoing_letter_id.eq(letter_id))
                .into_boxed(),
        };

        let rows = query
            .order_by(created_at.asc())
            .load::<CalendarEventRow>(conn)
            .await?;

        Ok(rows)
    }

    pub async fn create(
        conn: &mut AsyncPgConnection,
        new_event: NewCalendarEvent,
    ) -> anyhow::Result<CalendarEventRow> {
        use crate::schema::calendar_events::dsl::*;

        let row = diesel::insert_into(calendar_events)
            .values(new_event)
            .get_result::<CalendarEventRow>(conn)
            .await?;

        Ok(row)
    }

    /// Rewrite the letter-derived fields of an event from its letter.
    pub async fn update_fields(
        conn: &mut AsyncPgConnection,
        event_id: Uuid,
        title_val: &str,
        description_val: Option<&str>,
        date_val: NaiveDate,
        time_val: Option<&str>,
        location_val: Option<&str>,
    ) -> anyhow::Result<CalendarEventRow> {
        use crate::schema::calendar_events::dsl::*;

        let row = diesel::update(calendar_events.filter(id.eq(event_id)))
            .set((
                title.eq(title_val),
                description.eq(description_val),
                date.eq(date_val),
                time.eq(time_val),
                location.eq(location_val),
                updated_at.eq(Utc::now()),
            ))
            .get_result::<CalendarEventRow>(conn)
            .await?;

        Ok(row)
    }

    pub async fn delete(conn: &mut AsyncPgConnection, event_id: Uuid) -> anyhow::Result<()> {
        use crate::schema::calendar_events::dsl::*;

        diesel::delete(calendar_events.filter(id.eq(event_id)))
            .execute(conn)
            .await?;

        Ok(())
    }

    /// Clear all three reminder flags. Only the "event date changed" path
    /// may call this; the flags are otherwise monotonic.
    pub async fn reset_notified_flags(
        conn: &mut AsyncPgConnection,
        event_id: Uuid,
    ) -> anyhow::Result<()> {
        use crate::schema::calendar_events::dsl::*;

        diesel::update(calendar_events.filter(id.eq(event_id)))
            .set((
                notified_7_days.eq(false),
                notified_3_days.eq(false),
                notified_1_day.eq(false),
            ))
            .execute(conn)
            .await?;

        Ok(())
    }

    /// Events happening exactly on `target_date` whose reminder for the
    /// given offset has not been sent yet.
    pub async fn list_due_on(
        conn: &mut AsyncPgConnection,
        target_date: NaiveDate,
        offset: i64,
    ) -> anyhow::Result<Vec<CalendarEventRow>> {
        use crate::schema::calendar_events::dsl::*;

        let query = match offset {
            7 => calendar_events
                .filter(date.eq(target_date))
                .filter(notified_7_days.eq(false))
                .into_boxed(),
            3 => calendar_events
                .filter(date.eq(target_date))
                .filter(notified_3_days.eq(false))
                .into_boxed(),
            1 => calendar_events
                .filter(date.eq(target_date))
                .filter(notified_1_day.eq(false))
                .into_boxed(),
            other => anyhow::bail!("unsupported reminder offset: {}", other),
        };

        let rows = query.load::<CalendarEventRow>(conn).await?;
        Ok(rows)
    }

    pub async fn set_notified_flag(
        conn: &mut AsyncPgConnection,
        event_id: Uuid,
        offset: i64,
    ) -> anyhow::Result<()> {
        use crate::schema::calendar_events::dsl::*;

        let target = calendar_events.filter(id.eq(event_id));
        match offset {
            7 => {
                diesel::update(target)
                    .set(notified_7_days.eq(true))
                    .execute(conn)
                    .await?
            }
            3 => {
                diesel::update(target)
                    .set(notified_3_days.eq(true))
                    .execute(conn)
                    .await?
            }
            1 => {
                diesel::update(target)
                    .set(notified_1_day.eq(true))
                    .execute(conn)
                    .await?
            }
            other => anyhow::bail!("unsupported reminder offset: {}", other),
        };

        Ok(())
    }
}

// Notification database operations
pub mod notifications {
    use super::*;

    pub async fn list(
        conn: &mut AsyncPgConnection,
        user_filter: Option<Uuid>,
        unread_only: bool,
        limit_val: i64,
    ) -> anyhow::Result<Vec<NotificationRow>> {
        use crate::schema::notifications::dsl::*;

        let mut query = notifications
            .order_by(created_at.desc())
            .limit(limit_val)
            .into_boxed();

        if let Some(target_user) = user_filter {
            // A user sees their own notifications plus broadcasts.
            query = query.filter(user_id.eq(target_user).or(user_id.is_null()));
        }
        if unread_only {
            query = query.filter(is_read.eq(false));
        }

        let rows = query.load::<NotificationRow>(conn).await?;
        Ok(rows)
    }

    pub async fn insert_batch(
        conn: &mut AsyncPgConnection,
        batch: Vec<NewNotification>,
    ) -> anyhow::Result<usize> {
        use crate::schema::notifications::dsl::*;

        let inserted = diesel::insert_into(notifications)
            .values(batch)
            .execute(conn)
            .await?;

        Ok(inserted)
    }

    pub async fn delete_for_event(
        conn: &mut AsyncPgConnection,
        event_id: Uuid,
    ) -> anyhow::Result<usize> {
        use crate::schema::notifications::dsl::*;

        let deleted = diesel::delete(notifications.filter(calendar_event_id.eq(event_id)))
            .execute(conn)
            .await?;

        Ok(deleted)
    }

    pub async fn mark_read(
        conn: &mut AsyncPgConnection,
        notification_id: Uuid,
    ) -> anyhow::Result<Option<NotificationRow>> {
        use crate::schema::notifications::dsl::*;

        let row = diesel::update(notifications.filter(id.eq(notification_id)))
            .set(is_read.eq(true))
            .get_result::<NotificationRow>(conn)
            .await
            .optional()?;

        Ok(row)
    }

    pub async fn mark_all_read(
        conn: &mut AsyncPgConnection,
        user_filter: Option<Uuid>,
    ) -> anyhow::Result<usize> {
        use crate::schema::notifications::dsl::*;

        let updated = match user_filter {
            Some(target_user) => {
                diesel::update(
                    notifications.filter(user_id.eq(target_user).or(user_id.is_null())),
                )
                .set(is_read.eq(true))
                .execute(conn)
                .await?
            }
            None => {
                diesel::update(notifications)
                    .set(is_read.eq(true))
                    .execute(conn)
                    .await?
            }
        };

        Ok(updated)
    }

    pub async fn delete(
        conn: &mut AsyncPgConnection,
        notification_id: Uuid,
    ) -> anyhow::Result<usize> {
        use crate::schema::notifications::dsl::*;

        let deleted = diesel::delete(notifications.filter(id.eq(notification_id)))
            .execute(conn)
            .await?;

        Ok(deleted)
    }
}
