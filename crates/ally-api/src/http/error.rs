//! Application error type mapping to HTTP status codes and envelope format.

use axum::response::{IntoResponse, Response};

use ally_types::error::{NotificationError, ReminderError, RepositoryError};

use super::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Settings store errors.
    Settings(RepositoryError),
    /// Reminder dispatch errors.
    Reminder(ReminderError),
    /// Validation error.
    Validation(String),
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        AppError::Settings(e)
    }
}

impl From<ReminderError> for AppError {
    fn from(e: ReminderError) -> Self {
        AppError::Reminder(e)
    }
}

impl AppError {
    /// Envelope error code and message.
    pub fn code_and_message(&self) -> (&'static str, String) {
        match self {
            AppError::Settings(RepositoryError::NotFound) => {
                ("NOT_FOUND", "Settings not found".to_string())
            }
            AppError::Settings(e) => ("SETTINGS_ERROR", e.to_string()),
            AppError::Reminder(ReminderError::Settings(e)) => ("SETTINGS_ERROR", e.to_string()),
            AppError::Reminder(ReminderError::Notification(NotificationError::InvalidInput(msg))) => {
                ("VALIDATION_ERROR", msg.clone())
            }
            AppError::Reminder(ReminderError::Notification(e)) => {
                ("EMAIL_DELIVERY_FAILED", e.to_string())
            }
            AppError::Validation(msg) => ("VALIDATION_ERROR", msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, message) = self.code_and_message();
        if code == "SETTINGS_ERROR" {
            tracing::error!(code, %message, "request failed");
        }
        ApiResponse::error(code, &message, String::new(), 0).into_response()
    }
}
