//! Settings service: lazily-created singleton record with toggle updates.

use tracing::info;

use ally_types::error::RepositoryError;
use ally_types::settings::{SettingsUpdate, SystemSettings};

use crate::settings::repository::SettingsRepository;

/// Reads and updates the system feature toggles.
pub struct SettingsService<R: SettingsRepository> {
    repo: R,
}

impl<R: SettingsRepository> SettingsService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Return the settings record, persisting the defaults on first read.
    ///
    /// Defaults never overwrite a record written concurrently by an update.
    pub async fn get_settings(&self) -> Result<SystemSettings, RepositoryError> {
        if let Some(existing) = self.repo.get().await? {
            return Ok(existing);
        }
        info!("No system settings found, persisting defaults");
        self.repo.insert_if_absent(&SystemSettings::defaults()).await
    }

    /// Overwrite the two toggles. Creates the record first if needed.
    pub async fn update_settings(
        &self,
        update: &SettingsUpdate,
    ) -> Result<SystemSettings, RepositoryError> {
        let mut settings = self.get_settings().await?;
        settings.apply(update);
        let saved = self.repo.save(&settings).await?;
        info!(
            enable_email_verification = saved.enable_email_verification,
            enable_appointment_reminders = saved.enable_appointment_reminders,
            "System settings updated"
        );
        Ok(saved)
    }

    /// Whether appointment reminders should go out.
    pub async fn reminders_enabled(&self) -> Result<bool, RepositoryError> {
        Ok(self.get_settings().await?.enable_appointment_reminders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use ally_types::settings::SETTINGS_ID;

    #[derive(Default)]
    struct MemoryRepo {
        row: Mutex<Option<SystemSettings>>,
        inserts: AtomicUsize,
        saves: AtomicUsize,
    }

    impl SettingsRepository for MemoryRepo {
        async fn get(&self) -> Result<Option<SystemSettings>, RepositoryError> {
            Ok(self.row.lock().unwrap().clone())
        }

        async fn insert_if_absent(
            &self,
            settings: &SystemSettings,
        ) -> Result<SystemSettings, RepositoryError> {
            self.inserts.fetch_add(1, Ordering::SeqCst);
            let mut row = self.row.lock().unwrap();
            Ok(row.get_or_insert_with(|| settings.clone()).clone())
        }

        async fn save(&self, settings: &SystemSettings) -> Result<SystemSettings, RepositoryError> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            *self.row.lock().unwrap() = Some(settings.clone());
            Ok(settings.clone())
        }
    }

    struct BrokenRepo;

    impl SettingsRepository for BrokenRepo {
        async fn get(&self) -> Result<Option<SystemSettings>, RepositoryError> {
            Err(RepositoryError::Connection)
        }

        async fn insert_if_absent(
            &self,
            _settings: &SystemSettings,
        ) -> Result<SystemSettings, RepositoryError> {
            Err(RepositoryError::Connection)
        }

        async fn save(&self, _settings: &SystemSettings) -> Result<SystemSettings, RepositoryError> {
            Err(RepositoryError::Connection)
        }
    }

    #[tokio::test]
    async fn test_first_read_persists_defaults() {
        let svc = SettingsService::new(MemoryRepo::default());
        let settings = svc.get_settings().await.unwrap();
        assert_eq!(settings.id, SETTINGS_ID);
        assert!(settings.enable_email_verification);
        assert!(!settings.enable_appointment_reminders);
        assert_eq!(svc.repo().inserts.load(Ordering::SeqCst), 1);
        assert_eq!(svc.repo().saves.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_second_read_does_not_write() {
        let svc = SettingsService::new(MemoryRepo::default());
        svc.get_settings().await.unwrap();
        svc.get_settings().await.unwrap();
        assert_eq!(svc.repo().inserts.load(Ordering::SeqCst), 1);
    }

    /// Sees an empty table on `get`, but another writer stores toggles before
    /// the defaults are inserted.
    struct RacingRepo {
        inner: MemoryRepo,
        concurrent: SystemSettings,
    }

    impl SettingsRepository for RacingRepo {
        async fn get(&self) -> Result<Option<SystemSettings>, RepositoryError> {
            Ok(None)
        }

        async fn insert_if_absent(
            &self,
            settings: &SystemSettings,
        ) -> Result<SystemSettings, RepositoryError> {
            self.inner.save(&self.concurrent).await?;
            self.inner.insert_if_absent(settings).await
        }

        async fn save(&self, settings: &SystemSettings) -> Result<SystemSettings, RepositoryError> {
            self.inner.save(settings).await
        }
    }

    #[tokio::test]
    async fn test_defaults_do_not_clobber_concurrent_update() {
        let mut concurrent = SystemSettings::defaults();
        concurrent.enable_email_verification = false;
        concurrent.enable_appointment_reminders = true;
        let svc = SettingsService::new(RacingRepo {
            inner: MemoryRepo::default(),
            concurrent: concurrent.clone(),
        });

        let seen = svc.get_settings().await.unwrap();
        assert_eq!(seen, concurrent);
        assert_eq!(svc.repo().inner.row.lock().unwrap().clone(), Some(concurrent));
    }

    #[tokio::test]
    async fn test_update_overwrites_both_toggles() {
        let svc = SettingsService::new(MemoryRepo::default());
        let updated = svc
            .update_settings(&SettingsUpdate {
                enable_email_verification: false,
                enable_appointment_reminders: true,
            })
            .await
            .unwrap();
        assert_eq!(updated.id, SETTINGS_ID);
        assert!(!updated.enable_email_verification);
        assert!(updated.enable_appointment_reminders);

        let reread = svc.get_settings().await.unwrap();
        assert_eq!(reread, updated);
        assert!(svc.reminders_enabled().await.unwrap());
    }

    #[tokio::test]
    async fn test_repository_errors_propagate() {
        let svc = SettingsService::new(BrokenRepo);
        assert!(matches!(
            svc.get_settings().await,
            Err(RepositoryError::Connection)
        ));
        assert!(svc.reminders_enabled().await.is_err());
    }
}
