//! Fixed token supplied out of band (development, tests).

use ally_core::credential::provider::TokenProvider;
use ally_types::credential::AccessToken;
use ally_types::error::CredentialError;
use secrecy::{ExposeSecret, SecretString};

/// A token that is never refreshed.
pub struct StaticTokenProvider {
    token: SecretString,
}

impl StaticTokenProvider {
    pub fn new(token: SecretString) -> Self {
        Self { token }
    }
}

impl TokenProvider for StaticTokenProvider {
    fn describe(&self) -> &str {
        "static"
    }

    async fn access_token(&self) -> Result<AccessToken, CredentialError> {
        Ok(AccessToken::new(self.token.expose_secret()))
    }
}
