//! VertexClient -- concrete [`GenerationClient`] for Vertex AI.
//!
//! Resolves the endpoint from the target on every call. The bearer token is
//! only exposed while building the request headers.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use tracing::{debug, warn};

use ally_core::llm::client::GenerationClient;
use ally_core::llm::endpoint::EndpointTarget;
use ally_types::config::VertexConfig;
use ally_types::credential::AccessToken;
use ally_types::error::GenerationError;
use ally_types::generation::GenerationRequest;

pub struct VertexClient {
    client: reqwest::Client,
    target: EndpointTarget,
    /// Replaces the regional host (proxies, tests).
    base_url: Option<String>,
}

impl VertexClient {
    pub fn new(target: EndpointTarget, timeout: Duration) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerationError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            target,
            base_url: None,
        })
    }

    pub fn from_config(config: &VertexConfig) -> Result<Self, GenerationError> {
        let client = Self::new(
            EndpointTarget::from(config),
            Duration::from_secs(config.timeout_secs),
        )?;
        Ok(match &config.base_url {
            Some(base_url) => client.with_base_url(base_url.clone()),
            None => client,
        })
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn target(&self) -> &EndpointTarget {
        &self.target
    }

    /// The URL every request is sent to.
    pub fn endpoint_url(&self) -> String {
        match &self.base_url {
            Some(base) => self.target.url_on(base),
            None => self.target.url(),
        }
    }
}

impl GenerationClient for VertexClient {
    fn name(&self) -> &str {
        "vertex"
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
        token: &AccessToken,
    ) -> Result<serde_json::Value, GenerationError> {
        let target = &self.target;
        if target.project_id.trim().is_empty() {
            return Err(GenerationError::InvalidRequest(
                "vertex project_id is not configured".to_string(),
            ));
        }
        let url = self.endpoint_url();
        debug!(
            endpoint = %url,
            model_id = %target.model_id,
            kind = ?target.kind(),
            "POST generateContent"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(token.expose())
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::Transport(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), endpoint = %url, "Vertex returned an error status");
            return Err(GenerationError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| GenerationError::Deserialization(e.to_string()))
    }
}
