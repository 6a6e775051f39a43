//! Letter ↔ calendar event ↔ notification synchronization.
//!
//! Invitation letters carry an optional event date. Whenever a letter is
//! created, updated, or deleted, this module reconciles the letter's
//! invitation fields against its (at most one) derived calendar event and
//! that event's reminder notifications, inside the caller's transaction.
//!
//! The pure pieces (patch merging, the event decision table, reminder
//! windows) live in their own submodules so they can be unit-tested without
//! a database.

pub mod events;
pub mod merge;
pub mod plan;
pub mod reminders;
