//! Outbound email delivery.
//!
//! Verification and password reset flows hand an [`EmailMessage`] to a
//! [`Mailer`]. The default production mailer delivers through the Brevo HTTP
//! API; when no API key is configured, outgoing mail is logged instead so the
//! rest of the system keeps working in local development.
//!
//! Delivery is synchronous with the calling operation. Callers persist their
//! state first and treat a failed send as a reportable error, not a rollback.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

pub mod brevo;
pub mod errors;

pub use brevo::BrevoMailer;
pub use errors::{EmailError, EmailResult};

use crate::config::EmailConfig;

/// A single outbound message, plain text only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub to_name: Option<String>,
    pub subject: String,
    pub body: String,
}

/// Email delivery abstraction
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver a message or return an error describing why it failed.
    async fn send(&self, message: &EmailMessage) -> EmailResult<()>;
}

/// Local dev mailer that logs the message instead of sending real email.
///
/// The full body is logged, codes included; that is the point in development.
#[derive(Clone, Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &EmailMessage) -> EmailResult<()> {
        log::info!(
            "Email send stub: to={} subject={:?} body={:?}",
            message.to,
            message.subject,
            message.body
        );
        Ok(())
    }
}

/// Mailer that records messages for later inspection.
#[derive(Clone, Default)]
pub struct MemoryMailer {
    sent: Arc<Mutex<Vec<EmailMessage>>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages recorded so far, in send order.
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// The most recently recorded message.
    pub fn last(&self) -> Option<EmailMessage> {
        self.sent.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, message: &EmailMessage) -> EmailResult<()> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// Build the mailer selected by configuration.
///
/// Brevo when an API key is present, the logging stub otherwise.
pub fn from_config(config: &EmailConfig) -> EmailResult<Arc<dyn Mailer>> {
    if config.brevo_configured() {
        Ok(Arc::new(BrevoMailer::new(config)?))
    } else {
        log::warn!("BREVO_API_KEY not set; outgoing email will be logged, not sent");
        Ok(Arc::new(LogMailer))
    }
}

/// Message carrying an email verification code.
pub fn verification_message(
    to_email: &str,
    to_name: &str,
    code: &str,
    expiry_secs: u64,
) -> EmailMessage {
    EmailMessage {
        to: to_email.to_string(),
        to_name: Some(to_name.to_string()),
        subject: "Your CoolCRM verification code".to_string(),
        body: format!(
            "Hi {to_name},\n\n\
             Your verification code is {code}. It expires in {}.\n\n\
             If you did not create a CoolCRM account, you can ignore this message.\n",
            expiry_phrase(expiry_secs)
        ),
    }
}

/// Message carrying a password reset code.
pub fn password_reset_message(
    to_email: &str,
    to_name: &str,
    code: &str,
    expiry_secs: u64,
) -> EmailMessage {
    EmailMessage {
        to: to_email.to_string(),
        to_name: Some(to_name.to_string()),
        subject: "Your CoolCRM password reset code".to_string(),
        body: format!(
            "Hi {to_name},\n\n\
             Your password reset code is {code}. It expires in {}.\n\n\
             If you did not request a reset, you can ignore this message and\n\
             your password will stay unchanged.\n",
            expiry_phrase(expiry_secs)
        ),
    }
}

fn expiry_phrase(secs: u64) -> String {
    if secs >= 60 && secs % 60 == 0 {
        let minutes = secs / 60;
        if minutes == 1 {
            "1 minute".to_string()
        } else {
            format!("{minutes} minutes")
        }
    } else if secs == 1 {
        "1 second".to_string()
    } else {
        format!("{secs} seconds")
    }
}
