use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::domain::query::{DirectionFilter, ReviewFilter, SortDirection, SortField, SortSpec};
use crate::usecase::error::UsecaseError;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewsQuery {
    pub property_id: Option<String>,
    pub channel: Option<String>,
    pub min_rating: Option<f64>,
    pub review_type: Option<DirectionFilter>,
    pub approved_only: Option<bool>,
    pub sort_by: Option<SortField>,
    pub sort_order: Option<SortDirection>,
}

impl ReviewsQuery {
    pub fn criteria(&self) -> ReviewFilter {
        let non_empty = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());

        ReviewFilter {
            property_id: non_empty(&self.property_id),
            channel: non_empty(&self.channel),
            min_rating: self.min_rating,
            review_direction: self.review_type,
            approved_only: self.approved_only,
        }
    }

    pub fn sort_spec(&self) -> Option<SortSpec> {
        self.sort_by
            .map(|field| SortSpec::new(field, self.sort_order.unwrap_or_default()))
    }
}

#[tracing::instrument(skip(state))]
pub async fn list_reviews(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReviewsQuery>,
) -> impl IntoResponse {
    tracing::debug!("handling list reviews request");

    let result = state
        .reviews_usecase
        .list_reviews(&params.criteria(), params.sort_spec())
        .await;

    let status = if result.success {
        StatusCode::OK
    } else {
        StatusCode::BAD_GATEWAY
    };

    tracing::debug!(success = result.success, count = result.reviews.len(), "reviews listed");
    (status, Json(result))
}

#[tracing::instrument(skip(state))]
pub async fn get_summary(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling dashboard summary request");

    let summary = state.reviews_usecase.dashboard_summary().await?;

    Ok((StatusCode::OK, Json(summary)))
}
