//! Decision table for the letter → calendar event reconciliation.

use chrono::NaiveDate;

/// Observed state of a letter at sync time, after the update payload has
/// been merged onto the stored record.
#[derive(Debug, Clone, Copy)]
pub struct SyncState {
    /// `is_invitation` before the mutation (false for freshly created letters).
    pub was_invitation: bool,
    /// `is_invitation` after the mutation.
    pub is_invitation: bool,
    /// Event date of the merged record, if any.
    pub new_event_date: Option<NaiveDate>,
    /// Date of the calendar event currently linked to the letter; `None`
    /// means no event exists.
    pub existing_event_date: Option<NaiveDate>,
}

/// Mutation the synchronizer must apply to a letter's calendar event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventAction {
    /// Create the event and emit its reminders.
    Create,
    /// Rewrite the event's fields from the letter. Reminders are refreshed
    /// only when the date actually changed; an unchanged date must leave
    /// them and the notified flags untouched.
    Update { refresh_reminders: bool },
    /// Clear the event's reminders and delete it.
    Delete,
    /// Nothing to do.
    Ignore,
}

/// Pick the event mutation for the observed state.
///
/// A letter wants an event exactly when it is an invitation with a usable
/// date; everything else converges on "no event". An invitation without a
/// date is treated the same as a non-invitation. The existing event is
/// always looked up before deciding, so an unexpected leftover event on the
/// "newly became invitation" path is updated in place rather than
/// duplicated.
pub fn plan_event_action(state: SyncState) -> EventAction {
    match (
        state.is_invitation,
        state.new_event_date,
        state.existing_event_date,
    ) {
        (true, Some(_), None) => EventAction::Create,
        (true, Some(new_date), Some(old_date)) => EventAction::Update {
            refresh_reminders: new_date != old_date,
        },
        (_, _, Some(_)) => EventAction::Delete,
        (_, _, None) => EventAction::Ignore,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2026, 9, day)
    }

    fn plan(
        was_invitation: bool,
        is_invitation: bool,
        new_event_date: Option<NaiveDate>,
        existing_event_date: Option<NaiveDate>,
    ) -> EventAction {
        plan_event_action(SyncState {
            was_invitation,
            is_invitation,
            new_event_date,
            existing_event_date,
        })
    }

    #[test]
    fn becomes_invitation_with_date_creates_event() {
        assert_eq!(plan(false, true, date(10), None), EventAction::Create);
    }

    #[test]
    fn unchanged_date_updates_without_touching_reminders() {
        // Re-saving identical final values twice must not re-emit reminders
        // or reset the notified flags.
        assert_eq!(
            plan(true, true, date(10), date(10)),
            EventAction::Update {
                refresh_reminders: false
            }
        );
    }

    #[test]
    fn changed_date_updates_and_refreshes_reminders() {
        assert_eq!(
            plan(true, true, date(20), date(10)),
            EventAction::Update {
                refresh_reminders: true
            }
        );
    }

    #[test]
    fn stray_event_on_flag_transition_updates_in_place() {
        // Recovery case: an event already exists on the false -> true
        // transition; it is reconciled, never duplicated.
        assert_eq!(
            plan(false, true, date(10), date(10)),
            EventAction::Update {
                refresh_reminders: false
            }
        );
        assert_eq!(
            plan(false, true, date(20), date(10)),
            EventAction::Update {
                refresh_reminders: true
            }
        );
    }

    #[test]
    fn invitation_without_event_recreates_it() {
        // "Was invitation with no date, now has a date" and manual-deletion
        // recovery both land here.
        assert_eq!(plan(true, true, date(10), None), EventAction::Create);
    }

    #[test]
    fn flag_dropped_deletes_existing_event() {
        assert_eq!(plan(true, false, date(10), date(10)), EventAction::Delete);
        assert_eq!(plan(true, false, None, date(10)), EventAction::Delete);
    }

    #[test]
    fn flag_dropped_without_event_is_noop() {
        assert_eq!(plan(true, false, date(10), None), EventAction::Ignore);
        assert_eq!(plan(true, false, None, None), EventAction::Ignore);
    }

    #[test]
    fn invitation_without_date_is_treated_as_no_event() {
        assert_eq!(plan(true, true, None, date(10)), EventAction::Delete);
        assert_eq!(plan(false, true, None, date(10)), EventAction::Delete);
        assert_eq!(plan(true, true, None, None), EventAction::Ignore);
        assert_eq!(plan(false, true, None, None), EventAction::Ignore);
    }

    #[test]
    fn plain_letter_stays_untouched() {
        assert_eq!(plan(false, false, None, None), EventAction::Ignore);
        assert_eq!(plan(false, false, date(10), None), EventAction::Ignore);
        // Stray event for a non-invitation letter gets cleaned up.
        assert_eq!(plan(false, false, None, date(10)), EventAction::Delete);
        assert_eq!(plan(false, false, date(10), date(10)), EventAction::Delete);
    }
}
