use thiserror::Error;

/// Errors from repository operations (used by trait definitions in ally-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,
}

/// Errors obtaining or refreshing an access token.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("credentials unavailable: {0}")]
    Unavailable(String),

    #[error("token request failed: {0}")]
    Fetch(String),

    #[error("unexpected authorization header: {0}")]
    MalformedHeader(String),
}

/// Errors from a single upstream generation call.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("credential refresh failed: {0}")]
    Credential(#[from] CredentialError),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("HTTP request failed: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("failed to decode response: {0}")]
    Deserialization(String),
}

/// Errors from the transactional email sender.
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("failed to send email to {to}: {message}")]
    Provider { to: String, message: String },

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// Errors from the reminder dispatcher.
#[derive(Debug, Error)]
pub enum ReminderError {
    #[error("could not read reminder settings: {0}")]
    Settings(#[from] RepositoryError),

    #[error(transparent)]
    Notification(#[from] NotificationError),
}
