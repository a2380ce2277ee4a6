//! Upstream generation abstractions.
//!
//! - `GenerationClient`: RPITIT trait for the concrete HTTP client
//! - `endpoint`: model-id classification and URL resolution

pub mod client;
pub mod endpoint;
