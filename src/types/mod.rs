//! Core domain types for the labeler.
//!
//! Everything here is plain data: identifiers, the label set, and the pull
//! request attribute bundle that the rule engine evaluates.

pub mod ids;
pub mod labels;
pub mod pr;

pub use ids::{DeliveryId, PrNumber, RepoId};
pub use labels::LabelSet;
pub use pr::PullRequestAttributes;
