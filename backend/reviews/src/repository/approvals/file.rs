use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tokio::sync::{OnceCell, RwLock};

use crate::domain::approval::ApprovalState;
use crate::repository::approvals::seed_state;
use crate::repository::errors::RepositoryError;
use crate::usecase::contracts::ApprovalStore;

/// Approval store persisted as a JSON snapshot on disk.
///
/// Durability is best effort: a failed write is logged and counted, but the
/// in-memory state keeps the change and the caller is not told.
pub struct FileApprovalStore {
    path: PathBuf,
    seed: ApprovalState,
    state: OnceCell<RwLock<ApprovalState>>,
}

impl FileApprovalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_seed(path, seed_state())
    }

    pub fn with_seed(path: impl Into<PathBuf>, seed: ApprovalState) -> Self {
        Self {
            path: path.into(),
            seed,
            state: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn state(&self) -> &RwLock<ApprovalState> {
        self.state
            .get_or_init(|| async { RwLock::new(self.load().await) })
            .await
    }

    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> ApprovalState {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("no approval snapshot on disk, seeding from bundled snapshot");
                return self.seed.clone();
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to read approval snapshot, seeding from bundled snapshot");
                return self.seed.clone();
            }
        };

        match serde_json::from_str::<ApprovalState>(&contents) {
            Ok(state) => {
                tracing::info!(approved = state.ids.len(), "approval snapshot loaded");
                state
            }
            Err(e) => {
                tracing::warn!(error = %e, "approval snapshot is malformed, seeding from bundled snapshot");
                self.seed.clone()
            }
        }
    }

    async fn persist(&self, state: &ApprovalState) -> Result<(), RepositoryError> {
        let json = serde_json::to_vec_pretty(state)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, json).await?;
        tokio::fs::rename(&staging, &self.path).await?;
        Ok(())
    }
}

impl ApprovalStore for FileApprovalStore {
    async fn current_ids(&self) -> BTreeSet<String> {
        self.state().await.read().await.ids.clone()
    }

    async fn is_approved(&self, review_id: &str) -> bool {
        self.state().await.read().await.ids.contains(review_id)
    }

    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    async fn set_approval(&self, review_id: &str, approved: bool) {
        let mut state = self.state().await.write().await;
        let changed = state.apply(review_id, approved, Utc::now());

        if let Err(e) = self.persist(&state).await {
            metrics::counter!("reviews_approval_persist_failures_total").increment(1);
            tracing::error!(error = %e, "failed to persist approval snapshot, keeping in-memory state");
            return;
        }

        tracing::debug!(changed, "approval snapshot persisted");
    }

    async fn last_modified(&self) -> DateTime<Utc> {
        self.state().await.read().await.last_modified
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use tempfile::TempDir;

    use super::*;

    fn seed() -> ApprovalState {
        ApprovalState {
            ids: BTreeSet::from(["1".to_string()]),
            last_modified: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_missing_file_seeds_from_snapshot() {
        let dir = TempDir::new().unwrap();
        let store = FileApprovalStore::with_seed(dir.path().join("approvals.json"), seed());

        assert_eq!(store.current_ids().await, BTreeSet::from(["1".to_string()]));
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_changes_survive_a_new_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("approvals.json");

        let store = FileApprovalStore::with_seed(&path, seed());
        store.set_approval("2", true).await;
        store.set_approval("1", false).await;
        let modified = store.last_modified().await;

        let reopened = FileApprovalStore::with_seed(&path, seed());
        assert_eq!(reopened.current_ids().await, BTreeSet::from(["2".to_string()]));
        assert_eq!(reopened.last_modified().await, modified);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_malformed_file_falls_back_to_seed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("approvals.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = FileApprovalStore::with_seed(&path, seed());

        assert!(store.is_approved("1").await);
    }

    #[tokio::test]
    async fn test_write_failure_keeps_in_memory_state() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "regular file").unwrap();

        let store = FileApprovalStore::with_seed(blocker.join("approvals.json"), seed());
        store.set_approval("2", true).await;

        assert!(store.is_approved("2").await);
        assert_eq!(store.current_ids().await.len(), 2);
    }
}
