use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::usecase::error::UsecaseError;
use crate::AppState;

#[tracing::instrument(skip(state))]
pub async fn list_performance(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling portfolio performance request");

    let performances = state.reviews_usecase.portfolio_performance().await?;

    tracing::debug!(count = performances.len(), "portfolio performance computed");
    Ok((StatusCode::OK, Json(performances)))
}

#[tracing::instrument(skip(state), fields(property_id = %property_id))]
pub async fn get_performance(
    State(state): State<Arc<AppState>>,
    Path(property_id): Path<String>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling property performance request");

    let performance = state
        .reviews_usecase
        .property_performance(&property_id)
        .await?;

    Ok((StatusCode::OK, Json(performance)))
}

#[tracing::instrument(skip(state), fields(property_id = %property_id))]
pub async fn get_public_reviews(
    State(state): State<Arc<AppState>>,
    Path(property_id): Path<String>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling public reviews request");

    let public = state.reviews_usecase.public_reviews(&property_id).await?;

    tracing::debug!(count = public.total, "public reviews served");
    Ok((StatusCode::OK, Json(public)))
}
