//! Webhook handling for GitHub events.
//!
//! This module provides:
//! - Signature verification for webhook deliveries (HMAC-SHA256)
//! - Pull request event types
//! - Payload parsing into rule engine attributes

pub mod events;
pub mod parser;
pub mod signature;

pub use events::{PULL_REQUEST_EVENT, PrAction, PullRequestEvent};
pub use parser::{ParseError, parse_pull_request};
pub use signature::{WebhookSignature, verify_signature};
