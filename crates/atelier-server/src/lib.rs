//! Atelier HTTP API
//!
//! JSON endpoints for the sculpture gallery in front of a content store:
//! guestbook, contact form, password login and the admin edits made on the
//! category canvas. Pages under `/sculptures-admin` require a session cookie.

pub mod auth;
pub mod config;
pub mod error;
pub mod mail;
pub mod routes;

use atelier_core::store::{ContentStore, FileStore, MemoryStore, SanityStore, StoreResult};
use axum::{
    Router, middleware,
    routing::{get, post},
};
use config::Config;
use mail::Mailer;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ContentStore>,
    pub mailer: Arc<dyn Mailer>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn ContentStore>, mailer: Arc<dyn Mailer>, config: Config) -> Self {
        Self {
            store,
            mailer,
            config: Arc::new(config),
        }
    }
}

/// Pick the content store: Sanity when a project is configured, then a data
/// directory, then memory.
pub fn open_store(config: &Config) -> StoreResult<Arc<dyn ContentStore>> {
    if let Some(sanity) = &config.sanity {
        tracing::info!(project = %sanity.project_id, dataset = %sanity.dataset, "using Sanity store");
        return Ok(Arc::new(SanityStore::new(sanity.clone())));
    }
    if let Some(dir) = &config.data_dir {
        tracing::info!(path = %dir.display(), "using file store");
        return Ok(Arc::new(FileStore::new(dir.clone())?));
    }
    tracing::warn!("no SANITY_PROJECT_ID or ATELIER_DATA_DIR set, content is kept in memory only");
    Ok(Arc::new(MemoryStore::new()))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/api/login", post(auth::login))
        .route("/api/contact", post(routes::contact::submit))
        .route(
            "/api/guestbook",
            get(routes::guestbook::list).post(routes::guestbook::create),
        )
        .route("/api/categories/{slug}", get(routes::categories::layout))
        .route("/api/updateCategoryColor", post(routes::categories::update_color))
        .route("/api/updateSculpture", post(routes::sculptures::update_title))
        .route(
            "/api/updateSculptureDimensions",
            post(routes::sculptures::update_dimensions),
        )
        .route("/sculptures-admin/{slug}", get(routes::categories::admin_layout))
        .fallback(routes::not_found)
        // A full layer rather than a route layer, so unmatched admin paths redirect too.
        .layer(middleware::from_fn_with_state(state.clone(), auth::require_session))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
