//! TokenProvider trait definition.

use std::future::Future;

use ally_types::credential::AccessToken;
use ally_types::error::CredentialError;

/// Capability that always yields a non-expired token.
///
/// Implementations live in ally-infra.
pub trait TokenProvider: Send + Sync {
    /// Short description for logs and the `endpoint` command (e.g., "static").
    fn describe(&self) -> &str;

    /// Return a valid token, refreshing first if the current one has expired.
    fn access_token(&self) -> impl Future<Output = Result<AccessToken, CredentialError>> + Send;
}
