use std::sync::Arc;

use crate::domain::approval::{ApprovalChange, ApprovalsSummary};
use crate::usecase::contracts::ApprovalStore;
use crate::usecase::error::UsecaseError;

pub struct ApprovalsUseCase<S>
where
    S: ApprovalStore,
{
    approval_store: Arc<S>,
}

impl<S> ApprovalsUseCase<S>
where
    S: ApprovalStore,
{
    pub fn new(approval_store: Arc<S>) -> Self {
        Self { approval_store }
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_approvals(&self) -> ApprovalsSummary {
        tracing::debug!("getting approvals");

        let ids = self.approval_store.current_ids().await;
        let last_updated = self.approval_store.last_modified().await;

        ApprovalsSummary {
            total_approved: ids.len(),
            approved_review_ids: ids.into_iter().collect(),
            last_updated,
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn set_approval(&self, review_id: &str, approved: bool) -> Result<ApprovalChange, UsecaseError> {
        tracing::debug!("setting approval");

        let review_id = review_id.trim();
        if review_id.is_empty() {
            return Err(UsecaseError::Validation("reviewId is required".to_string()));
        }

        self.approval_store.set_approval(review_id, approved).await;
        let total_approved = self.approval_store.current_ids().await.len();

        metrics::counter!("reviews_approval_changes_total", "approved" => approved.to_string()).increment(1);
        tracing::info!(review_id, approved, total_approved, "approval updated");

        Ok(ApprovalChange {
            success: true,
            review_id: review_id.to_string(),
            approved,
            total_approved,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::domain::approval::ApprovalState;
    use crate::repository::approvals::MemoryApprovalStore;
    use crate::usecase::contracts::MockApprovalStore;

    fn memory_store() -> Arc<MemoryApprovalStore> {
        Arc::new(MemoryApprovalStore::with_seed(ApprovalState {
            ids: BTreeSet::from(["7453".to_string(), "7455".to_string()]),
            last_modified: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
        }))
    }

    #[tokio::test]
    async fn test_get_approvals() {
        let usecase = ApprovalsUseCase::new(memory_store());

        let summary = usecase.get_approvals().await;

        assert_eq!(summary.approved_review_ids, vec!["7453", "7455"]);
        assert_eq!(summary.total_approved, 2);
        assert_eq!(summary.last_updated, Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap());
    }

    #[tokio::test]
    async fn test_set_approval_success() {
        let mut store = MockApprovalStore::new();
        store
            .expect_set_approval()
            .with(mockall::predicate::eq("7460"), mockall::predicate::eq(true))
            .times(1)
            .returning(|_, _| ());
        store
            .expect_current_ids()
            .times(1)
            .returning(|| BTreeSet::from(["7453".to_string(), "7460".to_string()]));

        let usecase = ApprovalsUseCase::new(Arc::new(store));
        let change = usecase.set_approval("7460", true).await.unwrap();

        assert!(change.success);
        assert_eq!(change.review_id, "7460");
        assert!(change.approved);
        assert_eq!(change.total_approved, 2);
    }

    #[tokio::test]
    async fn test_set_approval_rejects_empty_id_before_touching_store() {
        let usecase = ApprovalsUseCase::new(Arc::new(MockApprovalStore::new()));

        let result = usecase.set_approval("", true).await;
        assert!(matches!(result, Err(UsecaseError::Validation(_))));

        let result = usecase.set_approval("   ", false).await;
        assert!(matches!(result, Err(UsecaseError::Validation(_))));
    }

    #[tokio::test]
    async fn test_set_approval_twice_is_idempotent() {
        let store = memory_store();
        let usecase = ApprovalsUseCase::new(store.clone());

        let first = usecase.set_approval("7460", true).await.unwrap();
        let ids_after_first = store.current_ids().await;
        let second = usecase.set_approval("7460", true).await.unwrap();

        assert_eq!(first.total_approved, 3);
        assert_eq!(second.total_approved, 3);
        assert_eq!(store.current_ids().await, ids_after_first);
        assert!(store.is_approved("7460").await);
    }

    #[tokio::test]
    async fn test_unapprove() {
        let store = memory_store();
        let usecase = ApprovalsUseCase::new(store.clone());

        let change = usecase.set_approval("7453", false).await.unwrap();

        assert!(!change.approved);
        assert_eq!(change.total_approved, 1);
        assert!(!store.is_approved("7453").await);
        assert!(usecase.get_approvals().await.last_updated > Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap());
    }
}
