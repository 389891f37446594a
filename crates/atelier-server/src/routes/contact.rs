//! Contact form: mail the site owner and keep a copy in the store.

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::mail::Email;
use crate::routes::non_empty_str;
use atelier_core::documents::new_contact_message;
use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

/// `POST /api/contact`
pub async fn submit(State(state): State<AppState>, Json(body): Json<Value>) -> ApiResult<Json<Value>> {
    let Some(owner) = state.config.resend_email.as_deref() else {
        return Err(ApiError::internal("RESEND_EMAIL is not configured"));
    };
    let (Some(name), Some(email), Some(message)) = (
        non_empty_str(&body, "name"),
        non_empty_str(&body, "email"),
        non_empty_str(&body, "message"),
    ) else {
        return Err(ApiError::bad_request("Missing fields"));
    };

    state
        .mailer
        .send(&Email::contact(owner, name, email, message))
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    state
        .store
        .create(new_contact_message(name, email, message))
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(Json(json!({ "success": true })))
}
