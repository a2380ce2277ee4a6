//! NotificationSender trait definition and shared input validation.

use ally_types::error::NotificationError;

/// Message used when any required email field is blank.
pub const EMPTY_FIELDS_MESSAGE: &str = "Email to, subject, and body must not be empty";

/// Transactional email transport.
///
/// Implementations live in ally-infra (e.g., `MailerSendSender`) and must call
/// [`validate_email_fields`] before doing any network I/O.
pub trait NotificationSender: Send + Sync {
    fn send(
        &self,
        to: &str,
        subject: &str,
        html_body: &str,
    ) -> impl std::future::Future<Output = Result<(), NotificationError>> + Send;
}

/// Reject a send where any field is empty or whitespace only.
pub fn validate_email_fields(to: &str, subject: &str, html_body: &str) -> Result<(), NotificationError> {
    if [to, subject, html_body].iter().any(|field| field.trim().is_empty()) {
        return Err(NotificationError::InvalidInput(EMPTY_FIELDS_MESSAGE.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_fields_present() {
        assert!(validate_email_fields("a@example.com", "Hi", "<p>Body</p>").is_ok());
    }

    #[test]
    fn test_blank_fields_rejected() {
        for (to, subject, body) in [
            ("", "Hi", "<p>x</p>"),
            ("a@example.com", "   ", "<p>x</p>"),
            ("a@example.com", "Hi", "\n\t"),
        ] {
            let err = validate_email_fields(to, subject, body).unwrap_err();
            assert_eq!(err.to_string(), "Email to, subject, and body must not be empty");
        }
    }
}
