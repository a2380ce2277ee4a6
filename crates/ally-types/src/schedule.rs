//! Appointment types consumed by the reminder dispatcher.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use std::fmt;

/// Which side of a booking a participant is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantRole {
    Client,
    Lawyer,
}

impl fmt::Display for ParticipantRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParticipantRole::Client => write!(f, "client"),
            ParticipantRole::Lawyer => write!(f, "lawyer"),
        }
    }
}

/// A person attending an appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub email: String,
    #[serde(alias = "fname")]
    pub first_name: String,
}

/// A scheduled consultation between a client and a lawyer.
///
/// `booking_start` is local wall-clock time, as booked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(default)]
    pub id: Option<i64>,
    pub client: Participant,
    pub lawyer: Participant,
    #[serde(alias = "bookingStartTime")]
    pub booking_start: NaiveDateTime,
}

impl Appointment {
    /// Participants in the order reminders go out: client first, then lawyer.
    pub fn participants(&self) -> [(ParticipantRole, &Participant); 2] {
        [
            (ParticipantRole::Client, &self.client),
            (ParticipantRole::Lawyer, &self.lawyer),
        ]
    }
}

/// What a reminder dispatch did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReminderOutcome {
    /// Reminders are switched off in system settings; nothing was sent.
    Disabled,
    /// Reminders were sent to these addresses, in order.
    Sent { recipients: Vec<String> },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn appointment() -> Appointment {
        serde_json::from_str(
            r#"{
                "client": { "email": "client@example.com", "first_name": "Maria" },
                "lawyer": { "email": "lawyer@example.com", "fname": "Jose" },
                "booking_start": "2026-11-02T14:30:00"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_appointment_deserialize_with_aliases() {
        let appt = appointment();
        assert_eq!(appt.id, None);
        assert_eq!(appt.lawyer.first_name, "Jose");
        assert_eq!(appt.booking_start.to_string(), "2026-11-02 14:30:00");
    }

    #[test]
    fn test_participants_client_first() {
        let appt = appointment();
        let [(first_role, first), (second_role, second)] = appt.participants();
        assert_eq!(first_role, ParticipantRole::Client);
        assert_eq!(first.email, "client@example.com");
        assert_eq!(second_role, ParticipantRole::Lawyer);
        assert_eq!(second.email, "lawyer@example.com");
    }

    #[test]
    fn test_outcome_serde() {
        let json = serde_json::to_value(ReminderOutcome::Disabled).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "disabled" }));
        let sent = ReminderOutcome::Sent {
            recipients: vec!["a@example.com".to_string()],
        };
        let json = serde_json::to_value(sent).unwrap();
        assert_eq!(json["status"], "sent");
        assert_eq!(json["recipients"][0], "a@example.com");
    }
}
