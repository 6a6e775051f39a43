use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{CalendarEvent, EventType, IncomingLetter, OutgoingLetter};

// ============================================================================
// Incoming Letter API Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateIncomingLetterRequest {
    #[validate(length(min = 1, max = 100))]
    pub number: String,

    #[validate(length(min = 1, max = 500))]
    pub subject: String,

    #[validate(length(min = 1, max = 255))]
    pub sender: String,

    pub received_date: NaiveDate,

    #[serde(default)]
    pub is_invitation: bool,

    pub event_date: Option<NaiveDate>,

    #[validate(length(max = 50))]
    pub event_time: Option<String>,

    #[validate(length(max = 255))]
    pub event_location: Option<String>,

    pub event_notes: Option<String>,

    #[serde(default)]
    pub needs_follow_up: bool,

    pub follow_up_deadline: Option<NaiveDate>,

    pub owner_user_id: Uuid,
}

/// Partial update; fields left out of the request keep their stored value.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct UpdateIncomingLetterRequest {
    #[validate(length(min = 1, max = 100))]
    pub number: Option<String>,

    #[validate(length(min = 1, max = 500))]
    pub subject: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub sender: Option<String>,

    pub received_date: Option<NaiveDate>,
    pub is_invitation: Option<bool>,
    pub event_date: Option<NaiveDate>,

    #[validate(length(max = 50))]
    pub event_time: Option<String>,

    #[validate(length(max = 255))]
    pub event_location: Option<String>,

    pub event_notes: Option<String>,
    pub needs_follow_up: Option<bool>,
    pub follow_up_deadline: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListIncomingLettersResponse {
    pub letters: Vec<IncomingLetter>,
    pub total: i64,
}

// ============================================================================
// Outgoing Letter API Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateOutgoingLetterRequest {
    #[validate(length(min = 1, max = 100))]
    pub number: String,

    #[validate(length(min = 1, max = 500))]
    pub subject: String,

    #[validate(length(min = 1, max = 255))]
    pub recipient: String,

    pub sent_date: NaiveDate,

    #[serde(default)]
    pub is_invitation: bool,

    pub event_date: Option<NaiveDate>,

    #[validate(length(max = 50))]
    pub event_time: Option<String>,

    #[validate(length(max = 255))]
    pub event_location: Option<String>,

    pub event_notes: Option<String>,

    pub owner_user_id: Uuid,
}

/// Partial update; fields left out of the request keep their stored value.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct UpdateOutgoingLetterRequest {
    #[validate(length(min = 1, max = 100))]
    pub number: Option<String>,

    #[validate(length(min = 1, max = 500))]
    pub subject: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub recipient: Option<String>,

    pub sent_date: Option<NaiveDate>,
    pub is_invitation: Option<bool>,
    pub event_date: Option<NaiveDate>,

    #[validate(length(max = 50))]
    pub event_time: Option<String>,

    #[validate(length(max = 255))]
    pub event_location: Option<String>,

    pub event_notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListOutgoingLettersResponse {
    pub letters: Vec<OutgoingLetter>,
    pub total: i64,
}

#[derive(Debug, Deserialize)]
pub struct ListLettersQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub is_invitation: Option<bool>,
}

// ============================================================================
// Calendar Event API Types
// ============================================================================

/// Creates a manually-managed event. Letter-derived events are created by
/// the synchronizer only; there is deliberately no way to set link fields
/// through the API.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateCalendarEventRequest {
    #[validate(length(min = 1, max = 500))]
    pub title: String,

    pub description: Option<String>,

    pub date: NaiveDate,

    #[validate(length(max = 50))]
    pub time: Option<String>,

    #[validate(length(max = 255))]
    pub location: Option<String>,

    pub event_type: EventType,

    pub owner_user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ListCalendarEventsQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListCalendarEventsResponse {
    pub events: Vec<CalendarEvent>,
    pub total: i64,
}

// ============================================================================
// Notification API Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ListNotificationsQuery {
    pub user_id: Option<Uuid>,
    pub unread_only: Option<bool>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct MarkAllReadQuery {
    pub user_id: Option<Uuid>,
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}
