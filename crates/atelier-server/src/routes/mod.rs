//! HTTP handlers.

pub mod categories;
pub mod contact;
pub mod guestbook;
pub mod sculptures;

use crate::error::ApiError;
use serde_json::Value;

/// A string field that is present and not empty.
pub(crate) fn non_empty_str<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

/// Whether a field is set to anything a form would count as filled in:
/// not missing, `null`, `false`, `0` or `""`.
pub(crate) fn is_filled(body: &Value, key: &str) -> bool {
    match body.get(key) {
        None | Some(Value::Null) => false,
        Some(Value::Bool(set)) => *set,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

/// Not found
pub async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}

/// Health check
pub async fn health() -> &'static str {
    "ok"
}
