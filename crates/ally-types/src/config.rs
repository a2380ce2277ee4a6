//! Configuration types for the Ally backend.
//!
//! `AllyConfig` represents the top-level `config.toml`. Every section and
//! field has a default, so an empty file (or no file) yields a runnable
//! configuration for local development.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllyConfig {
    #[serde(default)]
    pub vertex: VertexConfig,
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Upstream generation endpoint coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexConfig {
    #[serde(default)]
    pub project_id: String,
    /// Numeric for a fine-tuned deployment, otherwise a published model name.
    #[serde(default = "default_model_id")]
    pub model_id: String,
    #[serde(default = "default_region")]
    pub region: String,
    /// Transport timeout for a single upstream call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Replaces the regional `aiplatform` host (private endpoints, proxies).
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_model_id() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_region() -> String {
    "us-central1".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for VertexConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            model_id: default_model_id(),
            region: default_region(),
            timeout_secs: default_timeout_secs(),
            base_url: None,
        }
    }
}

/// Transactional email settings. The API key is supplied via environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailConfig {
    #[serde(default)]
    pub from_email: String,
    #[serde(default = "default_from_name")]
    pub from_name: String,
    #[serde(default = "default_mail_base_url")]
    pub api_base_url: String,
}

fn default_from_name() -> String {
    "Ally Team".to_string()
}

fn default_mail_base_url() -> String {
    "https://api.mailersend.com".to_string()
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            from_email: String::new(),
            from_name: default_from_name(),
            api_base_url: default_mail_base_url(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Report failed chat exchanges as HTTP 502 instead of a 200 carrying the
    /// friendly error text.
    #[serde(default)]
    pub surface_chat_failures: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            surface_chat_failures: false,
        }
    }
}

/// Settings database location. `None` means `{data_dir}/ally.db`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: Option<String>,
}
