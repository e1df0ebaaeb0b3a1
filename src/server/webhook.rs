//! Webhook endpoint handler.
//!
//! Authenticates a GitHub delivery, runs it through the labeler, and reports
//! the outcome as the HTTP status. Processing happens inline: the response
//! is sent once labels have been written (or found up to date).

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::AppState;
use crate::labeler::{BackendError, LabelOutcome, LabelerBackend, LabelerError};
use crate::types::DeliveryId;
use crate::webhooks::{ParseError, verify_signature};

/// Header name for GitHub event type.
const HEADER_EVENT: &str = "x-github-event";
/// Header name for GitHub delivery ID.
const HEADER_DELIVERY: &str = "x-github-delivery";
/// Header name for GitHub signature.
const HEADER_SIGNATURE: &str = "x-hub-signature-256";

/// Errors that can occur when processing a webhook.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Missing required header.
    #[error("missing required header: {0}")]
    MissingHeader(&'static str),

    /// Missing or invalid signature.
    #[error("invalid signature")]
    InvalidSignature,

    /// The body is not a well-formed pull request event.
    #[error("invalid payload: {0}")]
    InvalidPayload(#[from] ParseError),

    /// The repository's labeler configuration was rejected.
    #[error("{0}")]
    Config(String),

    /// A GitHub API call failed and will likely fail again.
    #[error("{0}")]
    Backend(String),

    /// A GitHub API call failed in a way that may clear up (rate limit, 5xx,
    /// network); GitHub can redeliver.
    #[error("{0}")]
    Unavailable(String),
}

impl<E: BackendError> From<LabelerError<E>> for WebhookError {
    fn from(err: LabelerError<E>) -> Self {
        match err {
            LabelerError::Parse(e) => WebhookError::InvalidPayload(e),
            err if err.is_config_error() => WebhookError::Config(err.to_string()),
            err if err.is_transient() => WebhookError::Unavailable(err.to_string()),
            err => WebhookError::Backend(err.to_string()),
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = match &self {
            WebhookError::MissingHeader(_) => StatusCode::BAD_REQUEST,
            WebhookError::InvalidSignature => StatusCode::UNAUTHORIZED,
            WebhookError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            WebhookError::Config(_) => StatusCode::UNPROCESSABLE_ENTITY,
            WebhookError::Backend(_) => StatusCode::BAD_GATEWAY,
            WebhookError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        (status, self.to_string()).into_response()
    }
}

/// Webhook handler.
///
/// # Request
///
/// - Method: POST
/// - Required headers:
///   - `X-GitHub-Event`: Event type (e.g., "pull_request")
///   - `X-Hub-Signature-256`: HMAC-SHA256 signature of the payload
/// - Optional headers:
///   - `X-GitHub-Delivery`: Delivery ID, used only in logs
/// - Body: JSON webhook payload
///
/// # Response
///
/// - 200 OK: Labels replaced, already correct, or event ignored
/// - 400 Bad Request: Missing event header or malformed payload
/// - 401 Unauthorized: Missing or invalid signature
/// - 422 Unprocessable Entity: The repository's labeler config is invalid
/// - 502 Bad Gateway: A GitHub API call failed permanently
/// - 503 Service Unavailable: A GitHub API call failed transiently
///
/// # Example
///
/// ```ignore
/// POST /webhook HTTP/1.1
/// X-GitHub-Event: pull_request
/// X-GitHub-Delivery: 550e8400-e29b-41d4-a716-446655440000
/// X-Hub-Signature-256: sha256=...
/// Content-Type: application/json
///
/// {"action": "opened", "pull_request": {...}, "repository": {...}}
///
/// HTTP/1.1 200 OK
///
/// Labels replaced
/// ```
pub async fn webhook_handler<B>(
    State(app_state): State<AppState<B>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, &'static str), WebhookError>
where
    B: LabelerBackend + Send + Sync + 'static,
{
    let delivery_id = get_header(&headers, HEADER_DELIVERY)
        .map(DeliveryId::new)
        .unwrap_or_else(|_| DeliveryId::new("-"));

    // Nothing about the body is trusted until the signature checks out.
    let signature_header =
        get_header(&headers, HEADER_SIGNATURE).map_err(|_| WebhookError::InvalidSignature)?;
    if !verify_signature(&body, &signature_header, app_state.webhook_secret()) {
        warn!(delivery_id = %delivery_id, "Invalid webhook signature");
        return Err(WebhookError::InvalidSignature);
    }

    let event_type = get_header(&headers, HEADER_EVENT)?;

    debug!(
        delivery_id = %delivery_id,
        event_type = %event_type,
        "Received webhook"
    );

    match app_state.labeler().handle_event(&event_type, &body).await {
        Ok(LabelOutcome::Ignored) => {
            debug!(delivery_id = %delivery_id, event_type = %event_type, "Event ignored");
            Ok((StatusCode::OK, "Ignored"))
        }
        Ok(LabelOutcome::Unchanged { .. }) => Ok((StatusCode::OK, "Labels unchanged")),
        Ok(LabelOutcome::Replaced { labels, .. }) => {
            info!(delivery_id = %delivery_id, labels = %labels, "Webhook processed");
            Ok((StatusCode::OK, "Labels replaced"))
        }
        Err(e) => {
            warn!(
                delivery_id = %delivery_id,
                error = %e,
                "Failed to process webhook"
            );
            Err(e.into())
        }
    }
}

/// Extracts a required header value as a string.
fn get_header(headers: &HeaderMap, name: &'static str) -> Result<String, WebhookError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .ok_or(WebhookError::MissingHeader(name))
}
