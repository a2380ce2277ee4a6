//! Administrative system settings (feature toggles).
//!
//! A single persisted record, addressed by [`SETTINGS_ID`], controls whether
//! email verification and appointment reminders are active.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed primary key of the one settings row.
pub const SETTINGS_ID: i64 = 1;

/// The persisted feature-toggle record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemSettings {
    pub id: i64,
    pub enable_email_verification: bool,
    pub enable_appointment_reminders: bool,
    pub updated_at: DateTime<Utc>,
}

impl SystemSettings {
    /// The record created on first read: verification on, reminders off.
    pub fn defaults() -> Self {
        Self {
            id: SETTINGS_ID,
            enable_email_verification: true,
            enable_appointment_reminders: false,
            updated_at: Utc::now(),
        }
    }

    /// Merge only the two toggles from an update, keeping identity intact.
    pub fn apply(&mut self, update: &SettingsUpdate) {
        self.enable_email_verification = update.enable_email_verification;
        self.enable_appointment_reminders = update.enable_appointment_reminders;
        self.updated_at = Utc::now();
    }
}

/// Body of a settings write.
///
/// Omitted fields take the same defaults as a freshly created record, so a
/// partial body behaves like the admin console's full-record PUT. Accepts the
/// console's camelCase field names as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsUpdate {
    #[serde(default = "default_true", alias = "enableEmailVerification")]
    pub enable_email_verification: bool,
    #[serde(default, alias = "enableAppointmentReminders")]
    pub enable_appointment_reminders: bool,
}

fn default_true() -> bool {
    true
}
