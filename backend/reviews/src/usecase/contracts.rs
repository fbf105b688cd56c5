use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::domain::review::ProviderResponse;

/// Source of raw provider reviews. Implementations resolve their own
/// fallbacks; the pipeline only ever sees a response envelope.
#[cfg_attr(test, mockall::automock)]
pub trait ReviewProvider: Send + Sync {
    async fn fetch_reviews(&self) -> ProviderResponse;
}

/// Set of review IDs approved for public display.
///
/// Every backing medium seeds itself once per store lifetime and must make
/// each `set_approval` visible to subsequent reads through the same store.
/// Persistence failures are the adapter's concern: they never undo or fail
/// the in-memory change.
#[cfg_attr(test, mockall::automock)]
pub trait ApprovalStore: Send + Sync {
    async fn current_ids(&self) -> BTreeSet<String>;
    async fn is_approved(&self, review_id: &str) -> bool;
    async fn set_approval(&self, review_id: &str, approved: bool);
    async fn last_modified(&self) -> DateTime<Utc>;
}
