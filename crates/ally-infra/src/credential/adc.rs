//! Application Default Credentials through `google-cloud-auth`.

use google_cloud_auth::credentials::{Builder, CacheableResource, Credentials};
use http::Extensions;
use http::header::{AUTHORIZATION, HeaderMap};
use tracing::debug;

use ally_core::credential::provider::TokenProvider;
use ally_types::credential::{AccessToken, CLOUD_PLATFORM_SCOPE};
use ally_types::error::CredentialError;

/// Token provider backed by Application Default Credentials.
///
/// `google-cloud-auth` resolves the source (`GOOGLE_APPLICATION_CREDENTIALS`,
/// the gcloud user credentials file, then the metadata server), caches the
/// token and refreshes it before it expires.
pub struct AdcTokenProvider {
    credentials: Credentials,
}

impl AdcTokenProvider {
    /// Build ADC credentials scoped to `cloud-platform`.
    ///
    /// A credentials file that is named but unreadable is an error here; no
    /// token is fetched until the first call.
    pub fn new() -> Result<Self, CredentialError> {
        let credentials = Builder::default()
            .with_scopes([CLOUD_PLATFORM_SCOPE])
            .build()
            .map_err(|e| CredentialError::Unavailable(e.to_string()))?;
        Ok(Self { credentials })
    }
}

impl TokenProvider for AdcTokenProvider {
    fn describe(&self) -> &str {
        "application-default"
    }

    async fn access_token(&self) -> Result<AccessToken, CredentialError> {
        let headers = match self.credentials.headers(Extensions::new()).await {
            Ok(CacheableResource::New { data, .. }) => data,
            // Only returned when the caller passed an entity tag, which we never do.
            Ok(CacheableResource::NotModified) => {
                return Err(CredentialError::Fetch(
                    "credentials returned no headers".to_string(),
                ));
            }
            Err(e) => return Err(CredentialError::Fetch(e.to_string())),
        };
        debug!("Obtained access token from application default credentials");
        bearer_token(&headers)
    }
}

/// Extract the token from an `Authorization: Bearer ...` header.
///
/// Error messages never include the header value.
fn bearer_token(headers: &HeaderMap) -> Result<AccessToken, CredentialError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| CredentialError::MalformedHeader("no Authorization header".to_string()))?
        .to_str()
        .map_err(|_| CredentialError::MalformedHeader("non-ASCII Authorization header".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(AccessToken::new)
        .ok_or_else(|| CredentialError::MalformedHeader("not a bearer token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extracted() {
        let token = bearer_token(&headers_with("Bearer ya29.adc")).unwrap();
        assert_eq!(token.expose(), "ya29.adc");
    }

    #[test]
    fn test_missing_header_is_an_error() {
        let err = bearer_token(&HeaderMap::new()).unwrap_err();
        assert!(matches!(err, CredentialError::MalformedHeader(_)));
    }

    #[test]
    fn test_other_scheme_is_rejected_without_leaking_value() {
        let err = bearer_token(&headers_with("Basic c2VjcmV0")).unwrap_err();
        assert!(matches!(err, CredentialError::MalformedHeader(_)));
        assert!(!err.to_string().contains("c2VjcmV0"));
    }

    #[test]
    fn test_empty_bearer_is_rejected() {
        assert!(bearer_token(&headers_with("Bearer ")).is_err());
    }
}
