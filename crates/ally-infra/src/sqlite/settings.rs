//! SQLite system-settings repository.

use ally_core::settings::repository::SettingsRepository;
use ally_types::error::RepositoryError;
use ally_types::settings::{SETTINGS_ID, SystemSettings};
use chrono::{DateTime, Utc};
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of [`SettingsRepository`].
pub struct SqliteSettingsRepository {
    pool: DatabasePool,
}

impl SqliteSettingsRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct SettingsRow {
    id: i64,
    enable_email_verification: bool,
    enable_appointment_reminders: bool,
    updated_at: String,
}

impl SettingsRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            enable_email_verification: row.try_get("enable_email_verification")?,
            enable_appointment_reminders: row.try_get("enable_appointment_reminders")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_settings(self) -> Result<SystemSettings, RepositoryError> {
        Ok(SystemSettings {
            id: self.id,
            enable_email_verification: self.enable_email_verification,
            enable_appointment_reminders: self.enable_appointment_reminders,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

impl SettingsRepository for SqliteSettingsRepository {
    async fn get(&self) -> Result<Option<SystemSettings>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, enable_email_verification, enable_appointment_reminders, updated_at \
             FROM system_settings WHERE id = ?",
        )
        .bind(SETTINGS_ID)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.map(|r| {
            SettingsRow::from_row(&r)
                .map_err(|e| RepositoryError::Query(e.to_string()))?
                .into_settings()
        })
        .transpose()
    }

    async fn insert_if_absent(
        &self,
        settings: &SystemSettings,
    ) -> Result<SystemSettings, RepositoryError> {
        sqlx::query(
            "INSERT INTO system_settings (id, enable_email_verification, enable_appointment_reminders, updated_at) \
             VALUES (?, ?, ?, ?) \
             ON CONFLICT(id) DO NOTHING",
        )
        .bind(SETTINGS_ID)
        .bind(settings.enable_email_verification)
        .bind(settings.enable_appointment_reminders)
        .bind(settings.updated_at.to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        self.get().await?.ok_or(RepositoryError::NotFound)
    }

    async fn save(&self, settings: &SystemSettings) -> Result<SystemSettings, RepositoryError> {
        sqlx::query(
            "INSERT INTO system_settings (id, enable_email_verification, enable_appointment_reminders, updated_at) \
             VALUES (?, ?, ?, ?) \
             ON CONFLICT(id) DO UPDATE SET \
                enable_email_verification = excluded.enable_email_verification, \
                enable_appointment_reminders = excluded.enable_appointment_reminders, \
                updated_at = excluded.updated_at",
        )
        .bind(SETTINGS_ID)
        .bind(settings.enable_email_verification)
        .bind(settings.enable_appointment_reminders)
        .bind(settings.updated_at.to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(SystemSettings {
            id: SETTINGS_ID,
            ..settings.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::default_database_url;
    use ally_core::settings::service::SettingsService;
    use ally_types::settings::SettingsUpdate;

    async fn test_pool() -> (DatabasePool, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let pool = DatabasePool::new(&default_database_url(dir.path()))
            .await
            .unwrap();
        (pool, dir)
    }

    #[tokio::test]
    async fn test_get_on_empty_table() {
        let (pool, _dir) = test_pool().await;
        let repo = SqliteSettingsRepository::new(pool);
        assert!(repo.get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_get() {
        let (pool, _dir) = test_pool().await;
        let repo = SqliteSettingsRepository::new(pool);

        let mut settings = SystemSettings::defaults();
        settings.enable_appointment_reminders = true;
        repo.save(&settings).await.unwrap();

        let loaded = repo.get().await.unwrap().unwrap();
        assert_eq!(loaded.id, SETTINGS_ID);
        assert!(loaded.enable_email_verification);
        assert!(loaded.enable_appointment_reminders);
        assert_eq!(loaded.updated_at.timestamp(), settings.updated_at.timestamp());
    }

    #[tokio::test]
    async fn test_insert_if_absent_creates_missing_row() {
        let (pool, _dir) = test_pool().await;
        let repo = SqliteSettingsRepository::new(pool);

        let stored = repo.insert_if_absent(&SystemSettings::defaults()).await.unwrap();
        assert_eq!(stored.id, SETTINGS_ID);
        assert!(stored.enable_email_verification);
        assert!(!stored.enable_appointment_reminders);
    }

    #[tokio::test]
    async fn test_insert_if_absent_keeps_existing_row() {
        let (pool, _dir) = test_pool().await;
        let repo = SqliteSettingsRepository::new(pool);

        let mut admin = SystemSettings::defaults();
        admin.enable_email_verification = false;
        admin.enable_appointment_reminders = true;
        repo.save(&admin).await.unwrap();

        let stored = repo.insert_if_absent(&SystemSettings::defaults()).await.unwrap();
        assert!(!stored.enable_email_verification);
        assert!(stored.enable_appointment_reminders);

        let reread = repo.get().await.unwrap().unwrap();
        assert!(reread.enable_appointment_reminders);
    }

    #[tokio::test]
    async fn test_save_forces_singleton_id() {
        let (pool, _dir) = test_pool().await;
        let repo = SqliteSettingsRepository::new(pool.clone());

        let mut settings = SystemSettings::defaults();
        settings.id = 42;
        let saved = repo.save(&settings).await.unwrap();
        assert_eq!(saved.id, SETTINGS_ID);

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM system_settings")
            .fetch_one(&pool.reader)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_service_roundtrip_through_sqlite() {
        let (pool, _dir) = test_pool().await;
        let svc = SettingsService::new(SqliteSettingsRepository::new(pool));

        let initial = svc.get_settings().await.unwrap();
        assert!(initial.enable_email_verification);
        assert!(!initial.enable_appointment_reminders);

        svc.update_settings(&SettingsUpdate {
            enable_email_verification: false,
            enable_appointment_reminders: true,
        })
        .await
        .unwrap();

        let stored = svc.repo().get().await.unwrap().unwrap();
        assert!(!stored.enable_email_verification);
        assert!(stored.enable_appointment_reminders);
    }
}
