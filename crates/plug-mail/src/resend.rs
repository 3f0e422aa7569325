//! HTTP client for a Resend-compatible transactional email API.
//!
//! `POST {base}/emails` with a bearer token and a JSON body of
//! `{from, to, subject, html, text}`. A success answers `{"id": "..."}`;
//! failures answer `{"name": "...", "message": "..."}`.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::{EmailMessage, MailError, Mailer, Result};

/// Public Resend endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.resend.com";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiErrorBody {
    name: Option<String>,
    message: Option<String>,
}

/// Sends mail through the provider's REST API.
#[derive(Debug, Clone)]
pub struct ResendMailer {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl ResendMailer {
    /// Build a client for `base_url` (no trailing `/emails`).
    pub fn new(api_key: impl Into<String>, base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MailError::Transport(format!("client setup failed: {e}")))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/emails", self.base_url)
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, message: &EmailMessage) -> Result<String> {
        message.validate()?;
        debug!(to = ?message.to, subject = %message.subject, "sending email");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(message)
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(rejection(status.as_u16(), &body));
        }

        let parsed: SendResponse = serde_json::from_str(&body)
            .map_err(|e| MailError::InvalidResponse(e.to_string()))?;
        Ok(parsed.id)
    }
}

fn rejection(status: u16, body: &str) -> MailError {
    let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = match (parsed.name, parsed.message) {
        (_, Some(message)) => message,
        (Some(name), None) => name,
        (None, None) if body.trim().is_empty() => "no response body".to_string(),
        (None, None) => body.trim().to_string(),
    };
    MailError::Rejected { status, message }
}
