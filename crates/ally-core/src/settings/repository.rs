//! SettingsRepository trait definition.

use ally_types::error::RepositoryError;
use ally_types::settings::SystemSettings;

/// Repository trait for the single system-settings record.
///
/// Implementations live in ally-infra (e.g., `SqliteSettingsRepository`).
pub trait SettingsRepository: Send + Sync {
    /// Load the record with id [`SETTINGS_ID`](ally_types::settings::SETTINGS_ID), if it exists.
    fn get(
        &self,
    ) -> impl std::future::Future<Output = Result<Option<SystemSettings>, RepositoryError>> + Send;

    /// Store `settings` only if no record exists yet, then return the record
    /// that is stored. An existing record always wins.
    fn insert_if_absent(
        &self,
        settings: &SystemSettings,
    ) -> impl std::future::Future<Output = Result<SystemSettings, RepositoryError>> + Send;

    /// Insert or overwrite the record, returning what was stored.
    fn save(
        &self,
        settings: &SystemSettings,
    ) -> impl std::future::Future<Output = Result<SystemSettings, RepositoryError>> + Send;
}
