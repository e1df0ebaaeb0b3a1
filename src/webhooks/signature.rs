//! Webhook delivery authentication.
//!
//! GitHub signs each delivery with HMAC-SHA256 over the raw request body,
//! keyed by the webhook secret, and sends the digest in the
//! `X-Hub-Signature-256` header as `sha256=<hex>`. Deliveries whose
//! signature does not verify are rejected before the body is parsed.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const HEADER_PREFIX: &str = "sha256=";

/// An HMAC-SHA256 digest as carried in `X-Hub-Signature-256`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookSignature(Vec<u8>);

impl WebhookSignature {
    /// Signs `payload` with `secret`.
    pub fn compute(payload: &[u8], secret: &[u8]) -> Self {
        let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts keys of any length");
        mac.update(payload);
        WebhookSignature(mac.finalize().into_bytes().to_vec())
    }

    /// Parses a header value such as `sha256=1f0a...`.
    ///
    /// Returns `None` for any other algorithm prefix or for invalid hex.
    ///
    /// # Examples
    ///
    /// ```
    /// use pr_labeler::webhooks::WebhookSignature;
    ///
    /// assert!(WebhookSignature::from_header("sha256=abcd1234").is_some());
    /// assert!(WebhookSignature::from_header("sha1=abcd1234").is_none());
    /// assert!(WebhookSignature::from_header("sha256=xyz").is_none());
    /// ```
    pub fn from_header(header: &str) -> Option<Self> {
        let digest = header.trim().strip_prefix(HEADER_PREFIX)?;
        hex::decode(digest).ok().map(WebhookSignature)
    }

    /// Formats this signature as a header value.
    pub fn to_header(&self) -> String {
        format!("{}{}", HEADER_PREFIX, hex::encode(&self.0))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Checks this signature against `payload` in constant time.
    pub fn verify(&self, payload: &[u8], secret: &[u8]) -> bool {
        let Ok(mut mac) = HmacSha256::new_from_slice(secret) else {
            return false;
        };
        mac.update(payload);
        mac.verify_slice(&self.0).is_ok()
    }
}

/// Verifies a delivery given the raw `X-Hub-Signature-256` header value.
///
/// A malformed header is a failed verification, never a panic.
///
/// # Examples
///
/// ```
/// use pr_labeler::webhooks::{verify_signature, WebhookSignature};
///
/// let body = br#"{"action":"opened"}"#;
/// let header = WebhookSignature::compute(body, b"s3cret").to_header();
///
/// assert!(verify_signature(body, &header, b"s3cret"));
/// assert!(!verify_signature(body, &header, b"other"));
/// ```
pub fn verify_signature(payload: &[u8], header: &str, secret: &[u8]) -> bool {
    WebhookSignature::from_header(header).is_some_and(|sig| sig.verify(payload, secret))
}
