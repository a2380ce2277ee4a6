//! Google access-token providers.
//!
//! Each provider implements `TokenProvider` from `ally-core`.
//! [`GoogleTokenProvider`] picks one at startup:
//!
//! 1. `ALLY_ACCESS_TOKEN` (static token, for development and tests)
//! 2. Application Default Credentials via `google-cloud-auth`

pub mod adc;
pub mod google;
pub mod static_token;

pub use google::GoogleTokenProvider;
