//! Category pages and their background color.

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::routes::non_empty_str;
use atelier_core::documents::{CategoryLayout, Color, is_hex_color};
use atelier_core::store::PatchSet;
use axum::Json;
use axum::extract::{Path, State};
use serde_json::{Value, json};

async fn load_layout(state: &AppState, slug: &str) -> ApiResult<CategoryLayout> {
    state
        .store
        .category_layout(slug)
        .await
        .map_err(|e| ApiError::internal("Failed to load category").with_details(e))?
        .ok_or_else(|| ApiError::not_found("Category not found"))
}

/// `GET /api/categories/{slug}`
pub async fn layout(State(state): State<AppState>, Path(slug): Path<String>) -> ApiResult<Json<CategoryLayout>> {
    load_layout(&state, &slug).await.map(Json)
}

/// `GET /sculptures-admin/{slug}`: the same layout, flagged editable.
pub async fn admin_layout(State(state): State<AppState>, Path(slug): Path<String>) -> ApiResult<Json<Value>> {
    let layout = load_layout(&state, &slug).await?;
    let mut body = serde_json::to_value(&layout)
        .map_err(|e| ApiError::internal("Failed to load category").with_details(e))?;
    if let Some(map) = body.as_object_mut() {
        map.insert("editable".into(), Value::Bool(true));
    }
    Ok(Json(body))
}

/// `POST /api/updateCategoryColor`
pub async fn update_color(State(state): State<AppState>, Json(body): Json<Value>) -> ApiResult<Json<Value>> {
    let hex = body
        .get("background_color")
        .and_then(|color| color.get("hex"))
        .and_then(Value::as_str)
        .filter(|hex| is_hex_color(hex));
    let (Some(id), Some(hex)) = (non_empty_str(&body, "id"), hex) else {
        return Err(ApiError::bad_request(
            "Invalid ID or background_color format. Ensure it includes a valid .hex value.",
        ));
    };

    let color = serde_json::to_value(Color::new(hex))
        .map_err(|e| ApiError::internal("Failed to update category background color").with_details(e))?;
    let mut set = PatchSet::new();
    set.insert("background_color".into(), color);
    state
        .store
        .patch(id, set)
        .await
        .map_err(|e| ApiError::internal("Failed to update category background color").with_details(e))?;

    Ok(Json(json!({ "success": true })))
}
