//! Endpoint identity resolution.
//!
//! A configured model identifier made only of ASCII digits names a fine-tuned
//! deployment endpoint; anything else (including the empty string) names a
//! published base model. Resolution is cheap and done on every call.

use ally_types::config::VertexConfig;
use ally_types::generation::EndpointKind;

/// Classify a model identifier.
pub fn classify_model_id(model_id: &str) -> EndpointKind {
    if !model_id.is_empty() && model_id.bytes().all(|b| b.is_ascii_digit()) {
        EndpointKind::FineTuned
    } else {
        EndpointKind::Published
    }
}

/// Where generation requests are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointTarget {
    pub project_id: String,
    pub region: String,
    pub model_id: String,
}

impl EndpointTarget {
    pub fn new(
        project_id: impl Into<String>,
        region: impl Into<String>,
        model_id: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            region: region.into(),
            model_id: model_id.into(),
        }
    }

    pub fn kind(&self) -> EndpointKind {
        classify_model_id(&self.model_id)
    }

    /// Regional API host, e.g. `https://us-central1-aiplatform.googleapis.com`.
    pub fn host(&self) -> String {
        format!("https://{}-aiplatform.googleapis.com", self.region)
    }

    /// Path component of the `generateContent` URL.
    pub fn path(&self) -> String {
        let Self {
            project_id,
            region,
            model_id,
        } = self;
        match self.kind() {
            EndpointKind::FineTuned => format!(
                "/v1/projects/{project_id}/locations/{region}/endpoints/{model_id}:generateContent"
            ),
            EndpointKind::Published => format!(
                "/v1/projects/{project_id}/locations/{region}/publishers/google/models/{model_id}:generateContent"
            ),
        }
    }

    /// Full `generateContent` URL on the regional host.
    pub fn url(&self) -> String {
        format!("{}{}", self.host(), self.path())
    }

    /// Full URL on an overridden base (proxies, tests).
    pub fn url_on(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path())
    }
}

impl From<&VertexConfig> for EndpointTarget {
    fn from(config: &VertexConfig) -> Self {
        Self::new(&config.project_id, &config.region, &config.model_id)
    }
}
