//! JSON error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Map, Value};

/// Key under which the message is reported. Endpoints differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKey {
    Error,
    Message,
}

impl MessageKey {
    fn as_str(self) -> &'static str {
        match self {
            MessageKey::Error => "error",
            MessageKey::Message => "message",
        }
    }
}

/// An error response: `{ <key>: message, details? }`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: StatusCode,
    pub key: MessageKey,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, key: MessageKey, message: impl Into<String>) -> Self {
        Self {
            status,
            key,
            message: message.into(),
            details: None,
        }
    }

    /// 400 with an `error` key.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, MessageKey::Error, message)
    }

    /// 500 with an `error` key.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, MessageKey::Error, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, MessageKey::Error, message)
    }

    /// Report the message under `message` instead of `error`.
    pub fn keyed_message(mut self) -> Self {
        self.key = MessageKey::Message;
        self
    }

    pub fn with_details(mut self, details: impl ToString) -> Self {
        self.details = Some(details.to_string());
        self
    }

    pub fn body(&self) -> Value {
        let mut body = Map::new();
        body.insert(self.key.as_str().into(), self.message.clone().into());
        if let Some(details) = &self.details {
            body.insert("details".into(), details.clone().into());
        }
        Value::Object(body)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, details = ?self.details, "{}", self.message);
        }
        (self.status, Json(self.body())).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
