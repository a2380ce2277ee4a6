//! `ally remind`: dispatch reminders for a single appointment.

use anyhow::Result;
use chrono::NaiveDateTime;
use clap::Args;
use console::style;

use ally_types::schedule::{Appointment, Participant, ReminderOutcome};

use crate::state::AppState;

const BOOKING_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Args)]
pub struct RemindArgs {
    /// Client email address.
    #[arg(long)]
    pub client_email: String,

    /// Client first name.
    #[arg(long)]
    pub client_name: String,

    /// Lawyer email address.
    #[arg(long)]
    pub lawyer_email: String,

    /// Lawyer first name.
    #[arg(long)]
    pub lawyer_name: String,

    /// Local booking start, e.g. `2026-11-02T14:30`.
    #[arg(long, value_parser = parse_booking_start)]
    pub at: NaiveDateTime,
}

impl RemindArgs {
    pub fn appointment(&self) -> Appointment {
        Appointment {
            id: None,
            client: Participant {
                email: self.client_email.clone(),
                first_name: self.client_name.clone(),
            },
            lawyer: Participant {
                email: self.lawyer_email.clone(),
                first_name: self.lawyer_name.clone(),
            },
            booking_start: self.at,
        }
    }
}

/// Accepts `YYYY-MM-DD HH:MM[:SS]`, with either a space or `T` separator.
pub fn parse_booking_start(value: &str) -> Result<NaiveDateTime, String> {
    BOOKING_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value.trim(), fmt).ok())
        .ok_or_else(|| format!("invalid booking time '{value}' (expected YYYY-MM-DDTHH:MM)"))
}

pub async fn remind(state: &AppState, args: &RemindArgs, json: bool) -> Result<()> {
    let outcome = state.reminder_service.dispatch(&args.appointment()).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    match outcome {
        ReminderOutcome::Disabled => {
            println!(
                "  {} Appointment reminders are disabled. Enable them with: {}",
                style("i").blue().bold(),
                style("ally settings set --reminders true").yellow()
            );
        }
        ReminderOutcome::Sent { recipients } => {
            for recipient in recipients {
                println!("  {} Reminder sent to {}", style("✓").green().bold(), recipient);
            }
        }
    }
    Ok(())
}
