//! HTTP server for the labeler.
//!
//! # Endpoints
//!
//! - `POST /webhook` - Accepts GitHub webhook deliveries and labels the PR
//! - `GET /health` - Returns 200 if server is running

use std::sync::Arc;

use axum::http::StatusCode;

use crate::labeler::{Labeler, LabelerBackend};

pub mod webhook;

pub use webhook::{WebhookError, webhook_handler};

/// Shared application state.
///
/// This is passed to all handlers via Axum's `State` extractor.
pub struct AppState<B> {
    inner: Arc<AppStateInner<B>>,
}

struct AppStateInner<B> {
    labeler: Labeler<B>,

    /// Webhook secret for HMAC-SHA256 signature verification.
    webhook_secret: Vec<u8>,
}

impl<B> Clone for AppState<B> {
    fn clone(&self) -> Self {
        AppState {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: LabelerBackend> AppState<B> {
    pub fn new(labeler: Labeler<B>, webhook_secret: impl Into<Vec<u8>>) -> Self {
        AppState {
            inner: Arc::new(AppStateInner {
                labeler,
                webhook_secret: webhook_secret.into(),
            }),
        }
    }

    pub fn labeler(&self) -> &Labeler<B> {
        &self.inner.labeler
    }

    pub fn webhook_secret(&self) -> &[u8] {
        &self.inner.webhook_secret
    }
}

/// Liveness check. Does not call GitHub.
pub async fn health_handler() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

/// Builds the axum Router with all endpoints.
pub fn build_router<B>(app_state: AppState<B>) -> axum::Router
where
    B: LabelerBackend + Send + Sync + 'static,
{
    use axum::routing::{get, post};

    axum::Router::new()
        .route("/webhook", post(webhook_handler::<B>))
        .route("/health", get(health_handler))
        .with_state(app_state)
}
