//! Access token type for the upstream generation API.
//!
//! The token value is wrapped in [`SecretString`] and never appears in
//! `Debug` output or logs.

use secrecy::{ExposeSecret, SecretString};

use std::fmt;

/// OAuth scope requested for every token.
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// A bearer token ready to be sent upstream.
pub struct AccessToken {
    secret: SecretString,
}

impl AccessToken {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: SecretString::from(secret.into()),
        }
    }

    /// The raw token value, for building an `Authorization` header.
    pub fn expose(&self) -> &str {
        self.secret.expose_secret()
    }
}

impl Clone for AccessToken {
    fn clone(&self) -> Self {
        Self::new(self.secret.expose_secret().to_string())
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
