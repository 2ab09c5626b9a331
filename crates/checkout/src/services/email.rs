//! E-mail sender trait and implementations.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use thiserror::Error;

use crate::retry::{self, CallError};

/// A composed message ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    /// Reply-to address, so replies to the owner's copy route to the adopter.
    pub reply_to: Option<String>,
    pub subject: String,
    pub text: String,
}

/// Errors from e-mail dispatch.
#[derive(Debug, Error)]
pub enum EmailError {
    /// The provider API key is not configured.
    #[error("e-mail provider API key not configured")]
    MissingApiKey,

    /// The provider did not answer within the deadline.
    #[error("e-mail provider timed out")]
    TimedOut,

    /// The provider could not be reached.
    #[error("e-mail provider transport error: {0}")]
    Transport(String),

    /// The provider refused the message.
    #[error("e-mail provider rejected the message ({status}): {message}")]
    Rejected { status: u16, message: String },
}

/// Trait for e-mail dispatch.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Dispatches one message.
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError>;
}

/// HTTP client for the Resend e-mail API.
#[derive(Clone)]
pub struct ResendMailer {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ResendMailer {
    /// Creates a mailer against the production Resend API.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, "https://api.resend.com")
    }

    /// Creates a mailer against an alternate endpoint (tests, sandboxes).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl EmailSender for ResendMailer {
    #[tracing::instrument(skip(self, message), fields(to = %message.to, subject = %message.subject))]
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError> {
        // A missing key fails closed instead of silently skipping dispatch.
        if self.api_key.is_empty() {
            return Err(EmailError::MissingApiKey);
        }

        let url = format!("{}/emails", self.base_url);
        let mut body = serde_json::json!({
            "from": message.from,
            "to": [message.to],
            "subject": message.subject,
            "text": message.text,
        });
        if let Some(reply_to) = &message.reply_to {
            body["reply_to"] = serde_json::json!(reply_to);
        }

        let response = retry::retry_once(
            retry::CALL_TIMEOUT,
            |err: &reqwest::Error| err.is_connect() || err.is_timeout(),
            || async {
                self.client
                    .post(&url)
                    .bearer_auth(&self.api_key)
                    .json(&body)
                    .send()
                    .await
            },
        )
        .await
        .map_err(|err| match err {
            CallError::TimedOut => EmailError::TimedOut,
            CallError::Inner(err) => EmailError::Transport(err.to_string()),
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EmailError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

#[derive(Debug, Default)]
struct InMemoryMailerState {
    sent: Vec<EmailMessage>,
    attempts: u32,
    fail_on_send: bool,
    fail_recipient: Option<String>,
}

/// In-memory mailer for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMailer {
    state: Arc<RwLock<InMemoryMailerState>>,
}

impl InMemoryMailer {
    /// Creates a new in-memory mailer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the mailer to fail every subsequent send.
    pub fn set_fail_on_send(&self, fail: bool) {
        self.state.write().unwrap().fail_on_send = fail;
    }

    /// Configures the mailer to fail sends addressed to one recipient.
    pub fn set_fail_recipient(&self, recipient: impl Into<String>) {
        self.state.write().unwrap().fail_recipient = Some(recipient.into());
    }

    /// Returns the number of send attempts, successful or not.
    pub fn attempt_count(&self) -> u32 {
        self.state.read().unwrap().attempts
    }

    /// Returns the number of successfully delivered messages.
    pub fn sent_count(&self) -> usize {
        self.state.read().unwrap().sent.len()
    }

    /// Returns copies of the delivered messages.
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.state.read().unwrap().sent.clone()
    }

    /// Returns the delivered messages addressed to `recipient`.
    pub fn sent_to(&self, recipient: &str) -> Vec<EmailMessage> {
        self.state
            .read()
            .unwrap()
            .sent
            .iter()
            .filter(|m| m.to == recipient)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl EmailSender for InMemoryMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError> {
        let mut state = self.state.write().unwrap();
        state.attempts += 1;

        let refused = state.fail_on_send
            || state
                .fail_recipient
                .as_deref()
                .is_some_and(|r| r == message.to);
        if refused {
            return Err(EmailError::Rejected {
                status: 502,
                message: "delivery refused".to_string(),
            });
        }

        state.sent.push(message.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(to: &str) -> EmailMessage {
        EmailMessage {
            from: "Adoptions <no-reply@example.com>".to_string(),
            to: to.to_string(),
            reply_to: None,
            subject: "Adoption confirmed".to_string(),
            text: "Details inside.".to_string(),
        }
    }

    #[tokio::test]
    async fn test_send_records_message() {
        let mailer = InMemoryMailer::new();
        mailer.send(&message("asha@example.com")).await.unwrap();

        assert_eq!(mailer.sent_count(), 1);
        assert_eq!(mailer.attempt_count(), 1);
        assert_eq!(mailer.sent_to("asha@example.com").len(), 1);
    }

    #[tokio::test]
    async fn test_fail_on_send_still_counts_attempts() {
        let mailer = InMemoryMailer::new();
        mailer.set_fail_on_send(true);

        let result = mailer.send(&message("asha@example.com")).await;
        assert!(matches!(result, Err(EmailError::Rejected { .. })));
        assert_eq!(mailer.sent_count(), 0);
        assert_eq!(mailer.attempt_count(), 1);
    }

    #[tokio::test]
    async fn test_fail_recipient_only_affects_that_recipient() {
        let mailer = InMemoryMailer::new();
        mailer.set_fail_recipient("owner@example.com");

        assert!(mailer.send(&message("asha@example.com")).await.is_ok());
        assert!(mailer.send(&message("owner@example.com")).await.is_err());
        assert_eq!(mailer.sent_count(), 1);
        assert_eq!(mailer.attempt_count(), 2);
    }
}
