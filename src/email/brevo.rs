//! Brevo transactional email delivery.
//!
//! Sends through the Brevo (formerly Sendinblue) `smtp/email` HTTP endpoint.
//! Authentication is a per-request `api-key` header.

use async_trait::async_trait;
use serde::Serialize;

use crate::config::EmailConfig;
use crate::email::errors::{EmailError, EmailResult};
use crate::email::{EmailMessage, Mailer};

const BREVO_ENDPOINT: &str = "https://api.brevo.com/v3/smtp/email";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BrevoAddress {
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BrevoSendRequest {
    sender: BrevoAddress,
    to: Vec<BrevoAddress>,
    subject: String,
    text_content: String,
}

/// Mailer backed by the Brevo HTTP API
pub struct BrevoMailer {
    http: reqwest::Client,
    api_key: String,
    sender_email: String,
    sender_name: Option<String>,
}

impl BrevoMailer {
    /// Build a mailer from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EmailError::Config`] when no usable API key is configured.
    pub fn new(config: &EmailConfig) -> EmailResult<Self> {
        let api_key = config
            .brevo_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| EmailError::Config("BREVO_API_KEY is required".to_string()))?
            .to_string();

        Ok(Self {
            http: reqwest::Client::new(),
            api_key,
            sender_email: config.sender_email.clone(),
            sender_name: config.sender_name.clone(),
        })
    }

    fn request_body(&self, message: &EmailMessage) -> BrevoSendRequest {
        BrevoSendRequest {
            sender: BrevoAddress {
                email: self.sender_email.clone(),
                name: self.sender_name.clone(),
            },
            to: vec![BrevoAddress {
                email: message.to.clone(),
                name: message.to_name.clone(),
            }],
            subject: message.subject.clone(),
            text_content: message.body.clone(),
        }
    }
}

#[async_trait]
impl Mailer for BrevoMailer {
    async fn send(&self, message: &EmailMessage) -> EmailResult<()> {
        let response = self
            .http
            .post(BREVO_ENDPOINT)
            .header("api-key", &self.api_key)
            .header("accept", "application/json")
            .json(&self.request_body(message))
            .send()
            .await
            .map_err(|err| EmailError::Transport(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let detail = response.text().await.unwrap_or_default();
        Err(EmailError::Rejected {
            status: status.as_u16(),
            detail,
        })
    }
}
