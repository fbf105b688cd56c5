pub mod file;
pub mod memory;

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::domain::approval::ApprovalState;
use crate::usecase::contracts::ApprovalStore;

pub use file::FileApprovalStore;
pub use memory::MemoryApprovalStore;

const SEED_SNAPSHOT: &str = include_str!("../../../data/approved_reviews.json");

/// Bundled approval snapshot every store starts from.
pub fn seed_state() -> ApprovalState {
    match serde_json::from_str(SEED_SNAPSHOT) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "bundled approval snapshot is malformed, starting empty");
            ApprovalState {
                ids: BTreeSet::new(),
                last_modified: Utc::now(),
            }
        }
    }
}

/// Backing medium picked once at startup from configuration.
pub enum ConfiguredApprovalStore {
    File(FileApprovalStore),
    Memory(MemoryApprovalStore),
}

impl ConfiguredApprovalStore {
    pub fn medium(&self) -> &'static str {
        match self {
            ConfiguredApprovalStore::File(_) => "file",
            ConfiguredApprovalStore::Memory(_) => "memory",
        }
    }
}

impl ApprovalStore for ConfiguredApprovalStore {
    async fn current_ids(&self) -> BTreeSet<String> {
        match self {
            ConfiguredApprovalStore::File(store) => store.current_ids().await,
            ConfiguredApprovalStore::Memory(store) => store.current_ids().await,
        }
    }

    async fn is_approved(&self, review_id: &str) -> bool {
        match self {
            ConfiguredApprovalStore::File(store) => store.is_approved(review_id).await,
            ConfiguredApprovalStore::Memory(store) => store.is_approved(review_id).await,
        }
    }

    async fn set_approval(&self, review_id: &str, approved: bool) {
        match self {
            ConfiguredApprovalStore::File(store) => store.set_approval(review_id, approved).await,
            ConfiguredApprovalStore::Memory(store) => {
                store.set_approval(review_id, approved).await
            }
        }
    }

    async fn last_modified(&self) -> DateTime<Utc> {
        match self {
            ConfiguredApprovalStore::File(store) => store.last_modified().await,
            ConfiguredApprovalStore::Memory(store) => store.last_modified().await,
        }
    }
}
