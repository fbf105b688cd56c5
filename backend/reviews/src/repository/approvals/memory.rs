use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use tokio::sync::{OnceCell, RwLock};

use crate::domain::approval::ApprovalState;
use crate::repository::approvals::seed_state;
use crate::usecase::contracts::ApprovalStore;

/// Process-lifetime approval store. Changes are lost on restart.
pub struct MemoryApprovalStore {
    seed: ApprovalState,
    state: OnceCell<RwLock<ApprovalState>>,
}

impl MemoryApprovalStore {
    pub fn new() -> Self {
        Self::with_seed(seed_state())
    }

    pub fn with_seed(seed: ApprovalState) -> Self {
        Self {
            seed,
            state: OnceCell::new(),
        }
    }

    async fn state(&self) -> &RwLock<ApprovalState> {
        self.state
            .get_or_init(|| async {
                tracing::info!(approved = self.seed.ids.len(), "seeding in-memory approval store");
                RwLock::new(self.seed.clone())
            })
            .await
    }
}

impl Default for MemoryApprovalStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ApprovalStore for MemoryApprovalStore {
    async fn current_ids(&self) -> BTreeSet<String> {
        self.state().await.read().await.ids.clone()
    }

    async fn is_approved(&self, review_id: &str) -> bool {
        self.state().await.read().await.ids.contains(review_id)
    }

    #[tracing::instrument(skip(self))]
    async fn set_approval(&self, review_id: &str, approved: bool) {
        let changed = self
            .state()
            .await
            .write()
            .await
            .apply(review_id, approved, Utc::now());

        tracing::debug!(changed, "approval applied in memory");
    }

    async fn last_modified(&self) -> DateTime<Utc> {
        self.state().await.read().await.last_modified
    }
}
