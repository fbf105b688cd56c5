use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Set of review IDs approved for public display.
///
/// Serializes to the snapshot format shared by the bundled seed file and the
/// file-backed store: `{ "approvedReviewIds": [...], "lastUpdated": "..." }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalState {
    #[serde(rename = "approvedReviewIds")]
    pub ids: BTreeSet<String>,
    #[serde(rename = "lastUpdated")]
    pub last_modified: DateTime<Utc>,
}

impl ApprovalState {
    /// Applies one approval change. Returns whether the ID set changed;
    /// `last_modified` is refreshed either way.
    pub fn apply(&mut self, review_id: &str, approved: bool, now: DateTime<Utc>) -> bool {
        let changed = if approved {
            self.ids.insert(review_id.to_string())
        } else {
            self.ids.remove(review_id)
        };
        self.last_modified = now;
        changed
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalsSummary {
    pub approved_review_ids: Vec<String>,
    pub total_approved: usize,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalChange {
    pub success: bool,
    pub review_id: String,
    pub approved: bool,
    pub total_approved: usize,
}
