//! Outgoing mail for the contact form.

use atelier_core::store::BoxFuture;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

pub const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

#[derive(Debug, Error)]
pub enum MailError {
    #[error("RESEND_API_KEY is not set")]
    MissingApiKey,
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    Rejected(String),
}

/// A plain text email.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Email {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub reply_to: String,
    pub text: String,
}

impl Email {
    /// Message forwarded to the site owner, who is both sender and recipient.
    pub fn contact(owner: &str, name: &str, email: &str, message: &str) -> Self {
        Self {
            from: format!("Website Contact <{}>", owner),
            to: vec![owner.to_string()],
            subject: format!("New message from {}", name),
            reply_to: email.to_string(),
            text: format!("Name: {}\nEmail: {}\nMessage:\n{}", name, email, message),
        }
    }
}

pub trait Mailer: Send + Sync {
    fn send<'a>(&'a self, email: &'a Email) -> BoxFuture<'a, Result<(), MailError>>;
}

/// Delivers mail through the Resend HTTP API.
pub struct ResendMailer {
    api_key: Option<String>,
    endpoint: String,
    client: reqwest::Client,
}

impl ResendMailer {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            endpoint: RESEND_ENDPOINT.to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

impl Mailer for ResendMailer {
    fn send<'a>(&'a self, email: &'a Email) -> BoxFuture<'a, Result<(), MailError>> {
        Box::pin(async move {
            let api_key = self.api_key.as_deref().ok_or(MailError::MissingApiKey)?;
            let response = self
                .client
                .post(&self.endpoint)
                .bearer_auth(api_key)
                .json(email)
                .send()
                .await
                .map_err(|e| MailError::Transport(e.to_string()))?;
            let status = response.status();
            if status.is_success() {
                tracing::info!(subject = %email.subject, "contact mail sent");
                return Ok(());
            }
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("mail delivery failed with status {}", status));
            Err(MailError::Rejected(message))
        })
    }
}
