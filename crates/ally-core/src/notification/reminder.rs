//! Appointment reminder dispatcher.
//!
//! Sends one reminder to the client and then one to the lawyer, but only
//! while appointment reminders are enabled in system settings.

use std::sync::Arc;

use chrono::{NaiveDateTime, Timelike};
use tracing::{info, warn};

use ally_types::error::ReminderError;
use ally_types::schedule::{Appointment, ReminderOutcome};

use crate::notification::sender::NotificationSender;
use crate::settings::repository::SettingsRepository;
use crate::settings::service::SettingsService;

pub const REMINDER_SUBJECT: &str = "Appointment Reminder";

/// A rendered reminder email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderEmail {
    pub subject: String,
    pub html_body: String,
}

/// Render the reminder addressed to `first_name` for a booking.
///
/// Seconds are only shown when non-zero (`14:30`, but `14:30:15`).
pub fn render_reminder_email(first_name: &str, booking_start: &NaiveDateTime) -> ReminderEmail {
    let date = booking_start.format("%Y-%m-%d");
    let time = if booking_start.second() == 0 {
        booking_start.format("%H:%M")
    } else {
        booking_start.format("%H:%M:%S")
    };
    let name = html_escape::encode_text(first_name);

    ReminderEmail {
        subject: REMINDER_SUBJECT.to_string(),
        html_body: format!(
            "<html><body><h3>Hi {name},</h3>\
             <p>This is a reminder for your upcoming appointment on {date} at {time}.</p>\
             <p>Thank you,</p><p>Ally Team</p></body></html>"
        ),
    }
}

/// Sends appointment reminders through a [`NotificationSender`].
pub struct ReminderService<R: SettingsRepository, N: NotificationSender> {
    settings: Arc<SettingsService<R>>,
    sender: N,
}

impl<R: SettingsRepository, N: NotificationSender> ReminderService<R, N> {
    pub fn new(settings: Arc<SettingsService<R>>, sender: N) -> Self {
        Self { settings, sender }
    }

    pub fn sender(&self) -> &N {
        &self.sender
    }

    /// Send reminders for one appointment, client first.
    ///
    /// A failed send stops the dispatch: if the client's email fails the
    /// lawyer is not contacted.
    pub async fn dispatch(&self, appointment: &Appointment) -> Result<ReminderOutcome, ReminderError> {
        if !self.settings.reminders_enabled().await? {
            info!(appointment_id = ?appointment.id, "Appointment reminders disabled, skipping");
            return Ok(ReminderOutcome::Disabled);
        }

        let mut recipients = Vec::with_capacity(2);
        for (role, participant) in appointment.participants() {
            let email = render_reminder_email(&participant.first_name, &appointment.booking_start);
            if let Err(e) = self
                .sender
                .send(&participant.email, &email.subject, &email.html_body)
                .await
            {
                warn!(
                    appointment_id = ?appointment.id,
                    %role,
                    error = %e,
                    "Reminder send failed"
                );
                return Err(e.into());
            }
            info!(appointment_id = ?appointment.id, %role, "Reminder sent");
            recipients.push(participant.email.clone());
        }

        Ok(ReminderOutcome::Sent { recipients })
    }
}
