// Database models for Diesel
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use shared::api::{
    CreateCalendarEventRequest, CreateIncomingLetterRequest, CreateOutgoingLetterRequest,
    UpdateIncomingLetterRequest, UpdateOutgoingLetterRequest,
};
use shared::models::{
    CalendarEvent, EventType, IncomingLetter, Notification, NotificationType, OutgoingLetter,
};

use crate::sync::merge::InvitationFacts;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::incoming_letters)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct IncomingLetterRow {
    pub id: Uuid,
    pub number: String,
    pub subject: String,
    pub sender: String,
    pub received_date: NaiveDate,
    pub is_invitation: bool,
    pub event_date: Option<NaiveDate>,
    pub event_time: Option<String>,
    pub event_location: Option<String>,
    pub event_notes: Option<String>,
    pub needs_follow_up: bool,
    pub follow_up_deadline: Option<NaiveDate>,
    pub overdue_notified_at: Option<DateTime<Utc>>,
    pub owner_user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl IncomingLetterRow {
    /// Invitation-relevant fields in the shape the synchronizer consumes.
    pub fn invitation_facts(&self) -> InvitationFacts {
        InvitationFacts {
            subject: self.subject.clone(),
            is_invitation: self.is_invitation,
            event_date: self.event_date,
            event_time: self.event_time.clone(),
            event_location: self.event_location.clone(),
            event_notes: self.event_notes.clone(),
        }
    }
}

impl From<IncomingLetterRow> for IncomingLetter {
    fn from(row: IncomingLetterRow) -> Self {
        IncomingLetter {
            id: row.id,
            number: row.number,
            subject: row.subject,
            sender: row.sender,
            received_date: row.received_date,
            is_invitation: row.is_invitation,
            event_date: row.event_date,
            event_time: row.event_time,
            event_location: row.event_location,
            event_notes: row.event_notes,
            needs_follow_up: row.needs_follow_up,
            follow_up_deadline: row.follow_up_deadline,
            overdue_notified_at: row.overdue_notified_at,
            owner_user_id: row.owner_user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::incoming_letters)]
pub struct NewIncomingLetter {
    pub number: String,
    pub subject: String,
    pub sender: String,
    pub received_date: NaiveDate,
    pub is_invitation: bool,
    pub event_date: Option<NaiveDate>,
    pub event_time: Option<String>,
    pub event_location: Option<String>,
    pub event_notes: Option<String>,
    pub needs_follow_up: bool,
    pub follow_up_deadline: Option<NaiveDate>,
    pub owner_user_id: Uuid,
}

impl NewIncomingLetter {
    pub fn from_request(req: &CreateIncomingLetterRequest) -> Self {
        Self {
            number: req.number.clone(),
            subject: req.subject.clone(),
            sender: req.sender.clone(),
            received_date: req.received_date,
            is_invitation: req.is_invitation,
            event_date: req.event_date,
            event_time: req.event_time.clone(),
            event_location: req.event_location.clone(),
            event_notes: req.event_notes.clone(),
            needs_follow_up: req.needs_follow_up,
            follow_up_deadline: req.follow_up_deadline,
            owner_user_id: req.owner_user_id,
        }
    }
}

/// Partial update for an incoming letter; `None` fields are left untouched.
#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = crate::schema::incoming_letters)]
pub struct IncomingLetterChanges {
    pub number: Option<String>,
    pub subject: Option<String>,
    pub sender: Option<String>,
    pub received_date: Option<NaiveDate>,
    pub is_invitation: Option<bool>,
    pub event_date: Option<NaiveDate>,
    pub event_time: Option<String>,
    pub event_location: Option<String>,
    pub event_notes: Option<String>,
    pub needs_follow_up: Option<bool>,
    pub follow_up_deadline: Option<NaiveDate>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl IncomingLetterChanges {
    pub fn from_request(req: &UpdateIncomingLetterRequest) -> Self {
        Self {
            number: req.number.clone(),
            subject: req.subject.clone(),
            sender: req.sender.clone(),
            received_date: req.received_date,
            is_invitation: req.is_invitation,
            event_date: req.event_date,
            event_time: req.event_time.clone(),
            event_location: req.event_location.clone(),
            event_notes: req.event_notes.clone(),
            needs_follow_up: req.needs_follow_up,
            follow_up_deadline: req.follow_up_deadline,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::outgoing_letters)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OutgoingLetterRow {
    pub id: Uuid,
    pub number: String,
    pub subject: String,
    pub recipient: String,
    pub sent_date: NaiveDate,
    pub is_invitation: bool,
    pub event_date: Option<NaiveDate>,
    pub event_time: Option<String>,
    pub event_location: Option<String>,
    pub event_notes: Option<String>,
    pub owner_user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OutgoingLetterRow {
    pub fn invitation_facts(&self) -> InvitationFacts {
        InvitationFacts {
            subject: self.subject.clone(),
            is_invitation: self.is_invitation,
            event_date: self.event_date,
            event_time: self.event_time.clone(),
            event_location: self.event_location.clone(),
            event_notes: self.event_notes.clone(),
        }
    }
}

impl From<OutgoingLetterRow> for OutgoingLetter {
    fn from(row: OutgoingLetterRow) -> Self {
        OutgoingLetter {
            id: row.id,
            number: row.number,
            subject: row.subject,
            recipient: row.recipient,
            sent_date: row.sent_date,
            is_invitation: row.is_invitation,
            event_date: row.event_date,
            event_time: row.event_time,
            event_location: row.event_location,
            event_notes: row.event_notes,
            owner_user_id: row.owner_user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::outgoing_letters)]
pub struct NewOutgoingLetter {
    pub number: String,
    pub subject: String,
    pub recipient: String,
    pub sent_date: NaiveDate,
    pub is_invitation: bool,
    pub event_date: Option<NaiveDate>,
    pub event_time: Option<String>,
    pub event_location: Option<String>,
    pub event_notes: Option<String>,
    pub owner_user_id: Uuid,
}

impl NewOutgoingLetter {
    pub fn from_request(req: &CreateOutgoingLetterRequest) -> Self {
        Self {
            number: req.number.clone(),
            subject: req.subject.clone(),
            recipient: req.recipient.clone(),
            sent_date: req.sent_date,
            is_invitation: req.is_invitation,
            event_date: req.event_date,
            event_time: req.event_time.clone(),
            event_location: req.event_location.clone(),
            event_notes: req.event_notes.clone(),
            owner_user_id: req.owner_user_id,
        }
    }
}

/// Partial update for an outgoing letter; `None` fields are left untouched.
#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = crate::schema::outgoing_letters)]
pub struct OutgoingLetterChanges {
    pub number: Option<String>,
    pub subject: Option<String>,
    pub recipient: Option<String>,
    pub sent_date: Option<NaiveDate>,
    pub is_invitation: Option<bool>,
    pub event_date: Option<NaiveDate>,
    pub event_time: Option<String>,
    pub event_location: Option<String>,
    pub event_notes: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl OutgoingLetterChanges {
    pub fn from_request(req: &UpdateOutgoingLetterRequest) -> Self {
        Self {
            number: req.number.clone(),
            subject: req.subject.clone(),
            recipient: req.recipient.clone(),
            sent_date: req.sent_date,
            is_invitation: req.is_invitation,
            event_date: req.event_date,
            event_time: req.event_time.clone(),
            event_location: req.event_location.clone(),
            event_notes: req.event_notes.clone(),
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::calendar_events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CalendarEventRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub time: Option<String>,
    pub location: Option<String>,
    pub event_type: String,
    pub owner_user_id: Uuid,
    pub incoming_letter_id: Option<Uuid>,
    pub outgoing_letter_id: Option<Uuid>,
    pub notified_7_days: bool,
    pub notified_3_days: bool,
    pub notified_1_day: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CalendarEventRow> for CalendarEvent {
    fn from(row: CalendarEventRow) -> Self {
        CalendarEvent {
            id: row.id,
            title: row.title,
            description: row.description,
            date: row.date,
            time: row.time,
            location: row.location,
            event_type: EventType::parse(&row.event_type),
            owner_user_id: row.owner_user_id,
            incoming_letter_id: row.incoming_letter_id,
            outgoing_letter_id: row.outgoing_letter_id,
            notified_7_days: row.notified_7_days,
            notified_3_days: row.notified_3_days,
            notified_1_day: row.notified_1_day,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::calendar_events)]
pub struct NewCalendarEvent {
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub time: Option<String>,
    pub location: Option<String>,
    pub event_type: String,
    pub owner_user_id: Uuid,
    pub incoming_letter_id: Option<Uuid>,
    pub outgoing_letter_id: Option<Uuid>,
}

impl NewCalendarEvent {
    /// A manually-created event; never linked to a letter.
    pub fn from_request(req: &CreateCalendarEventRequest) -> Self {
        Self {
            title: req.title.clone(),
            description: req.description.clone(),
            date: req.date,
            time: req.time.clone(),
            location: req.location.clone(),
            event_type: req.event_type.as_str().to_string(),
            owner_user_id: req.owner_user_id,
            incoming_letter_id: None,
            outgoing_letter_id: None,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NotificationRow {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub notification_type: String,
    pub user_id: Option<Uuid>,
    pub calendar_event_id: Option<Uuid>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<NotificationRow> for Notification {
    fn from(row: NotificationRow) -> Self {
        Notification {
            id: row.id,
            title: row.title,
            message: row.message,
            notification_type: NotificationType::parse(&row.notification_type),
            user_id: row.user_id,
            calendar_event_id: row.calendar_event_id,
            is_read: row.is_read,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::notifications)]
pub struct NewNotification {
    pub title: String,
    pub message: String,
    pub notification_type: String,
    pub user_id: Option<Uuid>,
    pub calendar_event_id: Option<Uuid>,
}
