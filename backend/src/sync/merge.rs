//! Explicit "merge patch onto stored record" step.
//!
//! Update requests are partial: fields absent from the payload keep their
//! stored value. The synchronizer only ever sees the merged result, so the
//! decision table can be tested without HTTP or ORM concerns.

use chrono::NaiveDate;

use shared::api::{UpdateIncomingLetterRequest, UpdateOutgoingLetterRequest};

/// Final invitation-relevant values of a letter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvitationFacts {
    pub subject: String,
    pub is_invitation: bool,
    pub event_date: Option<NaiveDate>,
    pub event_time: Option<String>,
    pub event_location: Option<String>,
    pub event_notes: Option<String>,
}

/// Invitation-relevant fields of a partial update. `None` means the field
/// was absent from the request.
#[derive(Debug, Clone, Default)]
pub struct InvitationPatch {
    pub subject: Option<String>,
    pub is_invitation: Option<bool>,
    pub event_date: Option<NaiveDate>,
    pub event_time: Option<String>,
    pub event_location: Option<String>,
    pub event_notes: Option<String>,
}

impl InvitationFacts {
    /// Apply a partial update, keeping stored values for absent fields.
    pub fn merged(&self, patch: &InvitationPatch) -> InvitationFacts {
        InvitationFacts {
            subject: patch
                .subject
                .clone()
                .unwrap_or_else(|| self.subject.clone()),
            is_invitation: patch.is_invitation.unwrap_or(self.is_invitation),
            event_date: patch.event_date.or(self.event_date),
            event_time: patch.event_time.clone().or_else(|| self.event_time.clone()),
            event_location: patch
                .event_location
                .clone()
                .or_else(|| self.event_location.clone()),
            event_notes: patch
                .event_notes
                .clone()
                .or_else(|| self.event_notes.clone()),
        }
    }
}

impl From<&UpdateIncomingLetterRequest> for InvitationPatch {
    fn from(req: &UpdateIncomingLetterRequest) -> Self {
        InvitationPatch {
            subject: req.subject.clone(),
            is_invitation: req.is_invitation,
            event_date: req.event_date,
            event_time: req.event_time.clone(),
            event_location: req.event_location.clone(),
            event_notes: req.event_notes.clone(),
        }
    }
}

impl From<&UpdateOutgoingLetterRequest> for InvitationPatch {
    fn from(req: &UpdateOutgoingLetterRequest) -> Self {
        InvitationPatch {
            subject: req.subject.clone(),
            is_invitation: req.is_invitation,
            event_date: req.event_date,
            event_time: req.event_time.clone(),
            event_location: req.event_location.clone(),
            event_notes: req.event_notes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored() -> InvitationFacts {
        InvitationFacts {
            subject: "Rapat koordinasi".to_string(),
            is_invitation: true,
            event_date: NaiveDate::from_ymd_opt(2026, 9, 10),
            event_time: Some("09:00".to_string()),
            event_location: Some("Ruang rapat utama".to_string()),
            event_notes: None,
        }
    }

    #[test]
    fn empty_patch_keeps_stored_values() {
        let merged = stored().merged(&InvitationPatch::default());
        assert_eq!(merged, stored());
    }

    #[test]
    fn present_fields_override_stored_values() {
        let patch = InvitationPatch {
            subject: Some("Rapat evaluasi".to_string()),
            event_date: NaiveDate::from_ymd_opt(2026, 9, 17),
            ..Default::default()
        };
        let merged = stored().merged(&patch);
        assert_eq!(merged.subject, "Rapat evaluasi");
        assert_eq!(merged.event_date, NaiveDate::from_ymd_opt(2026, 9, 17));
        // Untouched fields survive.
        assert!(merged.is_invitation);
        assert_eq!(merged.event_time.as_deref(), Some("09:00"));
    }

    #[test]
    fn flag_can_be_turned_off_without_touching_the_date() {
        let patch = InvitationPatch {
            is_invitation: Some(false),
            ..Default::default()
        };
        let merged = stored().merged(&patch);
        assert!(!merged.is_invitation);
        assert_eq!(merged.event_date, stored().event_date);
    }
}
