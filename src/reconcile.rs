//! Label reconciliation.
//!
//! Combines what the rules want with what is currently on the pull request:
//!
//! | Label is…                         | Result   |
//! |-----------------------------------|----------|
//! | desired                           | present  |
//! | current, not managed by any rule  | kept     |
//! | current, managed, not desired     | removed  |
//! | managed, not current, not desired | absent   |
//!
//! That is, `desired ∪ (current \ managed)`.

use crate::types::LabelSet;

/// Computes the label set to apply.
///
/// `desired` is the rule engine output and `managed` the set of labels named
/// by any matcher. Labels outside `managed` are never touched.
pub fn reconcile(desired: &LabelSet, current: &LabelSet, managed: &LabelSet) -> LabelSet {
    let mut result = desired.clone();
    result.extend(current.iter().filter(|label| !managed.contains(label)));
    result
}
