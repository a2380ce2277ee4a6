//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! Services are generic over port traits, but AppState pins them to the
//! concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use secrecy::SecretString;
use tracing::warn;

use ally_core::chat::service::ChatService;
use ally_core::notification::reminder::ReminderService;
use ally_core::settings::service::SettingsService;
use ally_infra::config::{load_config, mail_api_key, resolve_data_dir};
use ally_infra::credential::GoogleTokenProvider;
use ally_infra::mail::mailersend::MailerSendSender;
use ally_infra::sqlite::pool::{DatabasePool, default_database_url};
use ally_infra::sqlite::settings::SqliteSettingsRepository;
use ally_infra::vertex::client::VertexClient;
use ally_types::config::AllyConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteChatService = ChatService<VertexClient, GoogleTokenProvider>;

pub type ConcreteSettingsService = SettingsService<SqliteSettingsRepository>;

pub type ConcreteReminderService = ReminderService<SqliteSettingsRepository, MailerSendSender>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub settings_service: Arc<ConcreteSettingsService>,
    pub reminder_service: Arc<ConcreteReminderService>,
    pub config: Arc<AllyConfig>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize from the environment: data dir, config, DB, credentials.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("cannot create data directory {}", data_dir.display()))?;

        let config = load_config(&data_dir).await;

        let db_url = config
            .database
            .url
            .clone()
            .unwrap_or_else(|| default_database_url(&data_dir));
        let db_pool = DatabasePool::new(&db_url)
            .await
            .with_context(|| format!("cannot open settings database {db_url}"))?;

        let credentials =
            GoogleTokenProvider::discover().context("cannot resolve Google credentials")?;

        let mail_key = mail_api_key().unwrap_or_else(|| {
            warn!("MAILERSEND_API_KEY is not set; reminder emails will be rejected");
            SecretString::from(String::new())
        });

        Self::from_parts(config, data_dir, db_pool, credentials, mail_key)
    }

    /// Wire services from already-resolved dependencies.
    pub fn from_parts(
        config: AllyConfig,
        data_dir: PathBuf,
        db_pool: DatabasePool,
        credentials: GoogleTokenProvider,
        mail_api_key: SecretString,
    ) -> anyhow::Result<Self> {
        let vertex = VertexClient::from_config(&config.vertex)
            .context("cannot build the Vertex AI client")?;
        let chat_service = ChatService::new(vertex, credentials);

        let settings_service = Arc::new(SettingsService::new(SqliteSettingsRepository::new(
            db_pool.clone(),
        )));

        let reminder_service = ReminderService::new(
            Arc::clone(&settings_service),
            MailerSendSender::new(mail_api_key, &config.mail)
                .context("cannot build the MailerSend client")?,
        );

        Ok(Self {
            chat_service: Arc::new(chat_service),
            settings_service,
            reminder_service: Arc::new(reminder_service),
            config: Arc::new(config),
            data_dir,
            db_pool,
        })
    }
}
