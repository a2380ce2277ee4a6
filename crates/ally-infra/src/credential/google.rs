//! Provider selection for this process.

use secrecy::SecretString;
use tracing::info;

use ally_core::credential::provider::TokenProvider;
use ally_types::credential::AccessToken;
use ally_types::error::CredentialError;

use super::adc::AdcTokenProvider;
use super::static_token::StaticTokenProvider;

pub const ACCESS_TOKEN_ENV: &str = "ALLY_ACCESS_TOKEN";

/// The token provider chosen at startup.
pub enum GoogleTokenProvider {
    Static(StaticTokenProvider),
    Adc(AdcTokenProvider),
}

impl GoogleTokenProvider {
    /// Resolve from the process environment.
    pub fn discover() -> Result<Self, CredentialError> {
        Self::discover_with(|key| std::env::var(key).ok())
    }

    /// Resolve with an injectable environment lookup.
    ///
    /// A non-blank `ALLY_ACCESS_TOKEN` wins; otherwise Application Default
    /// Credentials are used.
    pub fn discover_with<F>(env: F) -> Result<Self, CredentialError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = env(ACCESS_TOKEN_ENV).filter(|t| !t.trim().is_empty()) {
            info!("Using static access token from {ACCESS_TOKEN_ENV}");
            return Ok(Self::Static(StaticTokenProvider::new(SecretString::from(token))));
        }

        info!("Using Google application default credentials");
        Ok(Self::Adc(AdcTokenProvider::new()?))
    }
}

impl TokenProvider for GoogleTokenProvider {
    fn describe(&self) -> &str {
        match self {
            Self::Static(p) => p.describe(),
            Self::Adc(p) => p.describe(),
        }
    }

    async fn access_token(&self) -> Result<AccessToken, CredentialError> {
        match self {
            Self::Static(p) => p.access_token().await,
            Self::Adc(p) => p.access_token().await,
        }
    }
}
