pub mod calendar;
pub mod incoming;
pub mod notifications;
pub mod outgoing;
