//! # plug-mail
//!
//! Outbound transactional email.
//!
//! - [`Mailer`] - the seam handlers talk to
//! - [`resend::ResendMailer`] - HTTP client for a Resend-compatible API
//! - [`LogMailer`] - writes messages to the log instead of sending them
//! - [`MemoryMailer`] - keeps messages in memory for local runs and tests
//! - [`templates`] - waitlist email bodies

pub mod resend;
pub mod templates;

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::info;

/// Error types for mail delivery.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// The request never reached the provider or the connection failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// The provider answered with a non-success status.
    #[error("provider rejected message ({status}): {message}")]
    Rejected {
        /// HTTP status returned by the provider.
        status: u16,
        /// Provider-supplied reason.
        message: String,
    },

    /// The provider answered with a body we could not read.
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    /// The message itself is unusable (e.g. no recipients).
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}

/// Convenience result type for mail operations.
pub type Result<T> = std::result::Result<T, MailError>;

/// A structured send request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl EmailMessage {
    /// Reject messages without recipients or subject.
    pub fn validate(&self) -> Result<()> {
        if self.to.is_empty() || self.to.iter().any(|r| r.trim().is_empty()) {
            return Err(MailError::InvalidMessage("no recipient".into()));
        }
        if self.subject.trim().is_empty() {
            return Err(MailError::InvalidMessage("empty subject".into()));
        }
        Ok(())
    }
}

/// Something that can deliver an [`EmailMessage`].
///
/// Returns the provider's message identifier.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<String>;
}

/// Logs every message instead of delivering it.
///
/// Used when no email API key is configured.
#[derive(Debug, Default)]
pub struct LogMailer {
    counter: AtomicU64,
}

impl LogMailer {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &EmailMessage) -> Result<String> {
        message.validate()?;
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        info!(
            to = ?message.to,
            subject = %message.subject,
            "email delivery disabled, logging message #{n}"
        );
        Ok(format!("log-{n}"))
    }
}

/// Records every message in memory.
#[derive(Debug, Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<EmailMessage>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all messages sent so far.
    pub async fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, message: &EmailMessage) -> Result<String> {
        message.validate()?;
        let mut sent = self.sent.lock().await;
        sent.push(message.clone());
        Ok(format!("mem-{}", sent.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(to: &str) -> EmailMessage {
        EmailMessage {
            from: "PLUG <hello@plugservices.ng>".into(),
            to: vec![to.into()],
            subject: "Hello".into(),
            html: "<p>hi</p>".into(),
            text: None,
        }
    }

    #[test]
    fn test_validate() {
        assert!(message("ada@x.com").validate().is_ok());
        assert!(matches!(
            message(" ").validate(),
            Err(MailError::InvalidMessage(_))
        ));
    }

    #[test]
    fn test_text_omitted_from_json_when_absent() {
        let json = serde_json::to_value(message("ada@x.com")).expect("serialize");
        assert!(json.get("text").is_none());
        assert_eq!(json["to"][0], "ada@x.com");
    }

    #[tokio::test]
    async fn test_log_mailer_ids_increase() {
        let mailer = LogMailer::new();
        assert_eq!(mailer.send(&message("a@x.com")).await.expect("send"), "log-1");
        assert_eq!(mailer.send(&message("b@x.com")).await.expect("send"), "log-2");
    }

    #[tokio::test]
    async fn test_memory_mailer_records() {
        let mailer = MemoryMailer::new();
        let id = mailer.send(&message("a@x.com")).await.expect("send");
        assert_eq!(id, "mem-1");
        let sent = mailer.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, vec!["a@x.com".to_string()]);
    }

    #[tokio::test]
    async fn test_memory_mailer_rejects_invalid() {
        let mailer = MemoryMailer::new();
        assert!(mailer.send(&message("")).await.is_err());
        assert!(mailer.sent().await.is_empty());
    }
}
