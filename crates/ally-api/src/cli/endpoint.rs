//! `ally endpoint`: show where generation requests go.

use anyhow::Result;
use console::style;

use ally_core::credential::provider::TokenProvider;

use crate::state::AppState;

pub fn show_endpoint(state: &AppState, json: bool) -> Result<()> {
    let client = state.chat_service.client();
    let target = client.target();
    let url = client.endpoint_url();
    let credentials = state.chat_service.credentials().describe();

    if json {
        let out = serde_json::json!({
            "url": url,
            "kind": target.kind(),
            "project_id": target.project_id,
            "region": target.region,
            "model_id": target.model_id,
            "credentials": credentials,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!("  {:<12} {}", style("Endpoint").bold(), style(&url).cyan());
    println!("  {:<12} {:?}", style("Kind").bold(), target.kind());
    println!("  {:<12} {}", style("Model").bold(), target.model_id);
    println!("  {:<12} {}", style("Credentials").bold(), credentials);
    if target.project_id.trim().is_empty() {
        println!();
        println!(
            "  {} No project configured. Set {} or [vertex].project_id in config.toml.",
            style("!").yellow().bold(),
            style("GOOGLE_PROJECT_ID").yellow()
        );
    }
    println!();
    Ok(())
}
