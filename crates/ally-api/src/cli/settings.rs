//! System settings CLI commands: show, set.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use ally_types::settings::{SettingsUpdate, SystemSettings};

use crate::state::AppState;

/// Print the current settings.
pub async fn show_settings(state: &AppState, json: bool) -> Result<()> {
    let settings = state.settings_service.get_settings().await?;
    print_settings(&settings, json)
}

/// Change toggles; `None` keeps the stored value.
pub async fn set_settings(
    state: &AppState,
    email_verification: Option<bool>,
    reminders: Option<bool>,
    json: bool,
) -> Result<()> {
    let current = state.settings_service.get_settings().await?;
    let update = SettingsUpdate {
        enable_email_verification: email_verification
            .unwrap_or(current.enable_email_verification),
        enable_appointment_reminders: reminders.unwrap_or(current.enable_appointment_reminders),
    };

    let saved = state.settings_service.update_settings(&update).await?;
    if !json {
        println!();
        println!("  {} Settings updated", style("✓").green().bold());
    }
    print_settings(&saved, json)
}

fn print_settings(settings: &SystemSettings, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(settings)?);
        return Ok(());
    }

    let on_off = |enabled: bool| {
        if enabled {
            Cell::new("on").fg(Color::Green)
        } else {
            Cell::new("off").fg(Color::DarkGrey)
        }
    };

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("SETTING").fg(Color::White),
            Cell::new("VALUE").fg(Color::White),
        ]);
    table.add_row(vec![
        Cell::new("email verification"),
        on_off(settings.enable_email_verification),
    ]);
    table.add_row(vec![
        Cell::new("appointment reminders"),
        on_off(settings.enable_appointment_reminders),
    ]);

    println!();
    println!("{table}");
    println!(
        "  {}",
        style(format!("updated {}", settings.updated_at.format("%Y-%m-%d %H:%M:%S UTC"))).dim()
    );
    println!();
    Ok(())
}
