use std::sync::Arc;

use crate::domain::performance::{DashboardSummary, PropertyPerformance};
use crate::domain::query::{DirectionFilter, ReviewFilter, SortSpec};
use crate::domain::review::{NormalizedResult, PropertyRef, PublicPropertyReviews, ReviewStatus};
use crate::usecase::aggregate::{average_rating, dashboard_summary, performance_for, portfolio_performance};
use crate::usecase::contracts::{ApprovalStore, ReviewProvider};
use crate::usecase::error::UsecaseError;
use crate::usecase::normalize::normalize_collection;
use crate::usecase::query::{filter, sort};

pub struct ReviewsUseCase<P, S>
where
    P: ReviewProvider,
    S: ApprovalStore,
{
    provider: P,
    approval_store: Arc<S>,
}

impl<P, S> ReviewsUseCase<P, S>
where
    P: ReviewProvider,
    S: ApprovalStore,
{
    pub fn new(provider: P, approval_store: Arc<S>) -> Self {
        Self {
            provider,
            approval_store,
        }
    }

    /// Fetches and normalizes the full collection against the current
    /// approval snapshot.
    async fn normalized(&self) -> NormalizedResult {
        let response = self.provider.fetch_reviews().await;
        let approved_ids = self.approval_store.current_ids().await;
        normalize_collection(&response, &approved_ids)
    }

    async fn collection(&self) -> Result<NormalizedResult, UsecaseError> {
        let result = self.normalized().await;
        if !result.success {
            let message = result
                .error
                .unwrap_or_else(|| "Reviews provider unavailable".to_string());
            return Err(UsecaseError::Unavailable(message));
        }
        Ok(result)
    }

    fn find_property(result: &NormalizedResult, property_id: &str) -> Result<PropertyRef, UsecaseError> {
        result
            .meta
            .properties
            .iter()
            .find(|p| p.id == property_id)
            .cloned()
            .ok_or_else(|| UsecaseError::NotFound("Property".to_string()))
    }

    /// Filtered and optionally re-sorted reviews. `meta` always describes the
    /// unfiltered collection.
    #[tracing::instrument(skip(self))]
    pub async fn list_reviews(&self, criteria: &ReviewFilter, sort_spec: Option<SortSpec>) -> NormalizedResult {
        tracing::debug!("listing reviews");

        let mut result = self.normalized().await;
        if !result.success {
            return result;
        }

        let reviews = filter(std::mem::take(&mut result.reviews), criteria);
        result.reviews = match sort_spec {
            Some(spec) => sort(reviews, spec),
            None => reviews,
        };

        tracing::debug!(total = result.meta.total, returned = result.reviews.len(), "reviews listed");
        result
    }

    #[tracing::instrument(skip(self))]
    pub async fn property_performance(&self, property_id: &str) -> Result<PropertyPerformance, UsecaseError> {
        tracing::debug!("computing property performance");

        let result = self.collection().await?;
        let property = Self::find_property(&result, property_id)?;

        Ok(performance_for(&result.reviews, &property))
    }

    #[tracing::instrument(skip(self))]
    pub async fn portfolio_performance(&self) -> Result<Vec<PropertyPerformance>, UsecaseError> {
        tracing::debug!("computing portfolio performance");

        let result = self.collection().await?;
        Ok(portfolio_performance(&result.reviews, &result.meta.properties))
    }

    #[tracing::instrument(skip(self))]
    pub async fn dashboard_summary(&self) -> Result<DashboardSummary, UsecaseError> {
        let result = self.collection().await?;
        Ok(dashboard_summary(&result.reviews))
    }

    /// Approved, published guest reviews of one property, newest first.
    #[tracing::instrument(skip(self))]
    pub async fn public_reviews(&self, property_id: &str) -> Result<PublicPropertyReviews, UsecaseError> {
        tracing::debug!("collecting public reviews");

        let result = self.collection().await?;
        let property = Self::find_property(&result, property_id)?;

        let criteria = ReviewFilter {
            property_id: Some(property.id.clone()),
            review_direction: Some(DirectionFilter::Guest),
            approved_only: Some(true),
            ..Default::default()
        };
        let reviews: Vec<_> = filter(result.reviews, &criteria)
            .into_iter()
            .filter(|r| r.status == ReviewStatus::Published)
            .collect();

        tracing::debug!(property_id, count = reviews.len(), "public reviews collected");
        Ok(PublicPropertyReviews {
            total: reviews.len(),
            average_rating: average_rating(&reviews),
            property,
            reviews,
        })
    }
}
