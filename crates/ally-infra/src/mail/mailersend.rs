//! MailerSendSender -- concrete [`NotificationSender`] for the MailerSend API.
//!
//! The API key is held as a [`SecretString`] and only exposed in the
//! `Authorization` header.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, warn};

use ally_core::notification::sender::{NotificationSender, validate_email_fields};
use ally_types::config::MailConfig;
use ally_types::error::NotificationError;

#[derive(Serialize)]
struct Address<'a> {
    email: &'a str,
    name: &'a str,
}

#[derive(Serialize)]
struct EmailRequest<'a> {
    from: Address<'a>,
    to: [Address<'a>; 1],
    subject: &'a str,
    html: &'a str,
}

pub struct MailerSendSender {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    from_email: String,
    from_name: String,
}

impl MailerSendSender {
    pub fn new(api_key: SecretString, config: &MailConfig) -> Result<Self, NotificationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| NotificationError::Client(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            from_email: config.from_email.clone(),
            from_name: config.from_name.clone(),
        })
    }
}

impl NotificationSender for MailerSendSender {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), NotificationError> {
        validate_email_fields(to, subject, html_body)?;

        let body = EmailRequest {
            from: Address {
                email: &self.from_email,
                name: &self.from_name,
            },
            to: [Address { email: to, name: "" }],
            subject,
            html: html_body,
        };

        let response = self
            .client
            .post(format!("{}/v1/email", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| NotificationError::Provider {
                to: to.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "MailerSend rejected email");
            return Err(NotificationError::Provider {
                to: to.to_string(),
                message: format!("HTTP {status}: {error_body}"),
            });
        }

        debug!(status = status.as_u16(), "Email accepted by MailerSend");
        Ok(())
    }
}
