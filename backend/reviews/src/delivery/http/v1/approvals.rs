use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use crate::usecase::error::UsecaseError;
use crate::AppState;

/// `approved` is kept as raw JSON so that anything but a literal boolean can
/// be rejected as invalid input rather than coerced.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetApprovalRequest {
    #[validate(required, length(min = 1, max = 64))]
    pub review_id: Option<String>,
    pub approved: Option<Value>,
}

impl SetApprovalRequest {
    pub fn into_parts(self) -> Result<(String, bool), UsecaseError> {
        if let Err(validation_errors) = self.validate() {
            tracing::warn!(?validation_errors, "validation failed");
            return Err(UsecaseError::Validation(format!("{:?}", validation_errors)));
        }

        let approved = match self.approved {
            Some(Value::Bool(approved)) => approved,
            other => {
                tracing::warn!(approved = ?other, "approved is not a boolean");
                return Err(UsecaseError::Validation(
                    "approved must be a boolean".to_string(),
                ));
            }
        };

        Ok((self.review_id.unwrap_or_default(), approved))
    }
}

#[tracing::instrument(skip(state))]
pub async fn get_approvals(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    tracing::debug!("handling get approvals request");

    let summary = state.approvals_usecase.get_approvals().await;

    tracing::debug!(total_approved = summary.total_approved, "approvals retrieved");
    (StatusCode::OK, Json(summary))
}

#[tracing::instrument(skip(state, payload))]
pub async fn set_approval(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SetApprovalRequest>, JsonRejection>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling set approval request");

    let Json(payload) = payload.map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "rejected approval body");
        UsecaseError::Validation(rejection.body_text())
    })?;
    let (review_id, approved) = payload.into_parts()?;
    let change = state
        .approvals_usecase
        .set_approval(&review_id, approved)
        .await?;

    Ok((StatusCode::OK, Json(change)))
}
