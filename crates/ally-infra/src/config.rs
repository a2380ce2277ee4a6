//! Configuration loader for Ally.
//!
//! Reads `config.toml` from the data directory (`~/.ally/` in production),
//! then applies environment overrides. Falls back to defaults when the file is
//! missing or malformed.

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use ally_types::config::AllyConfig;

pub const DATA_DIR_ENV: &str = "ALLY_DATA_DIR";
pub const PROJECT_ID_ENV: &str = "GOOGLE_PROJECT_ID";
pub const MODEL_ID_ENV: &str = "GOOGLE_MODEL_ID";
pub const REGION_ENV: &str = "GOOGLE_REGION";
pub const MAIL_API_KEY_ENV: &str = "MAILERSEND_API_KEY";
pub const MAIL_FROM_ENV: &str = "MAILERSEND_FROM_EMAIL";

/// Resolve the data directory: `ALLY_DATA_DIR`, else `~/.ally`, else `./.ally`.
pub fn resolve_data_dir() -> PathBuf {
    resolve_data_dir_with(|key| std::env::var(key).ok())
}

/// [`resolve_data_dir`] with an injectable environment lookup. A blank
/// `ALLY_DATA_DIR` is ignored.
pub fn resolve_data_dir_with<F>(env: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(dir) = env(DATA_DIR_ENV).filter(|d| !d.trim().is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".ally")
}

/// Load `{data_dir}/config.toml` and apply environment overrides.
pub async fn load_config(data_dir: &Path) -> AllyConfig {
    let mut config = load_config_file(data_dir).await;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config
}

/// Load `{data_dir}/config.toml` without looking at the environment.
///
/// - Missing file: defaults.
/// - Unreadable or unparseable file: a warning, then defaults.
pub async fn load_config_file(data_dir: &Path) -> AllyConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return AllyConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return AllyConfig::default();
        }
    };

    match toml::from_str::<AllyConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", config_path.display());
            AllyConfig::default()
        }
    }
}

/// Overlay non-empty environment values onto the file configuration.
pub fn apply_env_overrides<F>(config: &mut AllyConfig, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    if let Some(project_id) = get(PROJECT_ID_ENV) {
        config.vertex.project_id = project_id;
    }
    if let Some(model_id) = get(MODEL_ID_ENV) {
        config.vertex.model_id = model_id;
    }
    if let Some(region) = get(REGION_ENV) {
        config.vertex.region = region;
    }
    if let Some(from_email) = get(MAIL_FROM_ENV) {
        config.mail.from_email = from_email;
    }
}

/// The MailerSend API key, if configured.
pub fn mail_api_key() -> Option<SecretString> {
    std::env::var(MAIL_API_KEY_ENV)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .map(SecretString::from)
}
