//! Persistence of finished gestures.
//!
//! [`EditorSession`] feeds pointer events to a [`Canvas`] and hands each
//! completed gesture to a [`PositionSink`], usually the [`HttpGateway`] that
//! posts to `/api/updateSculptureDimensions`.

use crate::canvas::Canvas;
use crate::input::{LayoutEvent, PointerEvent};
use crate::position::DimensionsUpdate;
use crate::store::BoxFuture;
use serde_json::Value;
use thiserror::Error;

/// Path of the dimensions endpoint relative to the site root.
pub const DIMENSIONS_PATH: &str = "/api/updateSculptureDimensions";

/// Errors from persisting a geometry update.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("{message}")]
    Rejected { status: u16, message: String },
}

/// Destination for finished geometry updates.
pub trait PositionSink: Send + Sync {
    fn persist<'a>(&'a self, update: &'a DimensionsUpdate) -> BoxFuture<'a, Result<(), GatewayError>>;
}

/// Posts updates to a running site.
pub struct HttpGateway {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpGateway {
    /// Gateway for the site at `base_url`, e.g. `https://example.com`.
    pub fn new(base_url: &str) -> Self {
        Self {
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), DIMENSIONS_PATH),
            client: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl PositionSink for HttpGateway {
    fn persist<'a>(&'a self, update: &'a DimensionsUpdate) -> BoxFuture<'a, Result<(), GatewayError>> {
        Box::pin(async move {
            let response = self
                .client
                .post(&self.endpoint)
                .json(update)
                .send()
                .await
                .map_err(|e| GatewayError::Transport(e.to_string()))?;
            let status = response.status();
            if status.is_success() {
                return Ok(());
            }
            let message = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|body| body.get("message").and_then(Value::as_str).map(str::to_string))
                .unwrap_or_else(|| status.to_string());
            Err(GatewayError::Rejected {
                status: status.as_u16(),
                message,
            })
        })
    }
}

/// An editing session: one canvas, one sink.
pub struct EditorSession<S> {
    canvas: Canvas,
    sink: S,
}

impl<S: PositionSink> EditorSession<S> {
    pub fn new(canvas: Canvas, sink: S) -> Self {
        Self { canvas, sink }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Handle a pointer event. When it ends a gesture, the update is persisted
    /// exactly once and returned.
    ///
    /// A failed write is logged and otherwise ignored: the on-screen geometry
    /// stays where the user left it.
    pub async fn handle_pointer_event(&mut self, event: PointerEvent) -> Option<DimensionsUpdate> {
        let update = self.canvas.handle_pointer_event(event)?;
        match self.sink.persist(&update).await {
            Ok(()) => log::info!("updated dimensions of {}", update.id),
            Err(err) => log::error!("failed to update dimensions of {}: {}", update.id, err),
        }
        Some(update)
    }

    pub fn handle_layout_event(&mut self, event: LayoutEvent) -> bool {
        self.canvas.handle_layout_event(event)
    }
}
