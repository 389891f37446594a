//! Sculpture edits from the admin canvas.

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::routes::non_empty_str;
use atelier_core::position::DimensionsUpdate;
use atelier_core::store::PatchSet;
use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

/// `POST /api/updateSculpture`: rename a sculpture.
pub async fn update_title(State(state): State<AppState>, Json(body): Json<Value>) -> ApiResult<Json<Value>> {
    let (Some(id), Some(title)) = (non_empty_str(&body, "id"), non_empty_str(&body, "newTitle")) else {
        return Err(ApiError::bad_request("Missing id or newTitle").keyed_message());
    };

    let mut set = PatchSet::new();
    set.insert("title".into(), title.into());
    let result = state
        .store
        .patch(id, set)
        .await
        .map_err(|e| ApiError::internal(e.to_string()).keyed_message())?;

    Ok(Json(json!({ "message": "Document updated", "result": result })))
}

/// Validate a dimensions body. Pixel values must be numbers, percentages strings.
pub fn parse_dimensions(body: &Value) -> Option<DimensionsUpdate> {
    let number = |key: &str| body.get(key).and_then(Value::as_f64);
    let percentage = |key: &str| match body.get(key) {
        None | Some(Value::Null) => Some(None),
        Some(Value::String(value)) => Some(Some(value.clone())),
        Some(_) => None,
    };

    Some(DimensionsUpdate {
        id: non_empty_str(body, "id")?.to_string(),
        top: number("top")?,
        left: number("left")?,
        left_percentage: percentage("left_percentage")?,
        width: number("width")?,
        width_percentage: percentage("width_percentage")?,
        height: number("height")?,
    })
}

/// `POST /api/updateSculptureDimensions`: persist one finished gesture.
pub async fn update_dimensions(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Json<Value>> {
    let Some(update) = parse_dimensions(&body) else {
        return Err(ApiError::bad_request("Invalid input").keyed_message());
    };

    state
        .store
        .patch(&update.id, update.to_patch())
        .await
        .map_err(|e| ApiError::internal(e.to_string()).keyed_message())?;

    tracing::debug!(id = %update.id, "dimensions updated");
    Ok(Json(json!({ "message": "Dimensions updated" })))
}
