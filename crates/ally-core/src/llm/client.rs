//! GenerationClient trait definition.

use ally_types::credential::AccessToken;
use ally_types::error::GenerationError;
use ally_types::generation::GenerationRequest;

/// Trait for the upstream `generateContent` transport.
///
/// Implementations resolve the endpoint, attach the bearer token, and return
/// the decoded JSON body. Interpreting that body is left to the caller, so a
/// well-formed but empty response is not an error at this layer.
///
/// Implementations live in ally-infra (e.g., `VertexClient`).
pub trait GenerationClient: Send + Sync {
    /// Human-readable client name (e.g., "vertex").
    fn name(&self) -> &str;

    /// POST a generation request and return the response body as JSON.
    fn generate(
        &self,
        request: &GenerationRequest,
        token: &AccessToken,
    ) -> impl std::future::Future<Output = Result<serde_json::Value, GenerationError>> + Send;
}
