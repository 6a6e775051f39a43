use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which letter register a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LetterKind {
    Incoming,
    Outgoing,
}

impl LetterKind {
    /// Calendar event title derived from a letter subject. Recomputed on
    /// every sync so renaming the subject renames the event.
    pub fn event_title(&self, subject: &str) -> String {
        match self {
            LetterKind::Incoming => format!("[Undangan] {}", subject),
            LetterKind::Outgoing => format!("[Undangan Keluar] {}", subject),
        }
    }
}

/// Category of a calendar event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Meeting,
    Ceremony,
    Deadline,
    Other,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Meeting => "meeting",
            EventType::Ceremony => "ceremony",
            EventType::Deadline => "deadline",
            EventType::Other => "other",
        }
    }

    /// Parse the database representation; unknown values fall back to Other.
    pub fn parse(value: &str) -> Self {
        match value {
            "meeting" => EventType::Meeting,
            "ceremony" => EventType::Ceremony,
            "deadline" => EventType::Deadline,
            _ => EventType::Other,
        }
    }
}

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Info,
    Warning,
    Success,
    Error,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Info => "info",
            NotificationType::Warning => "warning",
            NotificationType::Success => "success",
            NotificationType::Error => "error",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "warning" => NotificationType::Warning,
            "success" => NotificationType::Success,
            "error" => NotificationType::Error,
            _ => NotificationType::Info,
        }
    }
}

/// Incoming letter record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingLetter {
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

/// Outgoing letter record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutgoingLetter {
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

/// Calendar event, optionally derived from (and linked to) exactly one letter.
/// At most one of `incoming_letter_id`/`outgoing_letter_id` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub time: Option<String>,
    pub location: Option<String>,
    pub event_type: EventType,
    pub owner_user_id: Uuid,
    pub incoming_letter_id: Option<Uuid>,
    pub outgoing_letter_id: Option<Uuid>,
    pub notified_7_days: bool,
    pub notified_3_days: bool,
    pub notified_1_day: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User-facing notification, optionally tied to a calendar event.
/// `user_id = None` means the notification is broadcast to everyone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    pub user_id: Option<Uuid>,
    pub calendar_event_id: Option<Uuid>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}
