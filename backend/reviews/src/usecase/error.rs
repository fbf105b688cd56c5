use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UsecaseError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unavailable(String),
}

impl IntoResponse for UsecaseError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            UsecaseError::NotFound(_) => StatusCode::NOT_FOUND,
            UsecaseError::Validation(_) => StatusCode::BAD_REQUEST,
            UsecaseError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        match &self {
            UsecaseError::Unavailable(_) => {
                tracing::warn!(error = %self, "upstream unavailable");
            }
            UsecaseError::NotFound(_) => {
                tracing::warn!(error = %self, "resource not found");
            }
            UsecaseError::Validation(_) => {
                tracing::debug!(error = %self);
            }
        }

        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (UsecaseError::NotFound("Property".to_string()), StatusCode::NOT_FOUND),
            (UsecaseError::Validation("bad".to_string()), StatusCode::BAD_REQUEST),
            (UsecaseError::Unavailable("down".to_string()), StatusCode::SERVICE_UNAVAILABLE),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(UsecaseError::NotFound("Property".to_string()).to_string(), "Property not found");
    }
}
