//! Email notifications and appointment reminders.

pub mod reminder;
pub mod sender;
