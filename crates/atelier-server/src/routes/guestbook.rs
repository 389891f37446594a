//! Guestbook: public entries with a honeypot field against bots.

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::routes::{is_filled, non_empty_str};
use atelier_core::documents::{GuestEntry, new_guest_entry};
use atelier_core::store::GUESTBOOK_LIMIT;
use axum::Json;
use axum::extract::State;
use serde_json::Value;

/// `GET /api/guestbook`
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<GuestEntry>>> {
    let entries = state
        .store
        .guest_entries(GUESTBOOK_LIMIT)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch entries").with_details(e))?;
    Ok(Json(entries))
}

/// `POST /api/guestbook`
pub async fn create(State(state): State<AppState>, Json(body): Json<Value>) -> ApiResult<Json<Value>> {
    let (Some(name), Some(message)) = (non_empty_str(&body, "name"), non_empty_str(&body, "message"))
    else {
        return Err(ApiError::bad_request("Missing name or message"));
    };
    // Hidden field that only bots fill in.
    if is_filled(&body, "email_confirm") {
        tracing::info!("guestbook honeypot triggered");
        return Err(ApiError::bad_request("Spam detected"));
    }

    let created = state
        .store
        .create(new_guest_entry(name, message))
        .await
        .map_err(|e| ApiError::internal("Failed to create entry").with_details(e))?;
    Ok(Json(created))
}
