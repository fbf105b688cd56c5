use crate::domain::review::ProviderResponse;

const MOCK_REVIEWS: &str = include_str!("../../../data/mock_reviews.json");

/// Bundled review set served when the live provider is unavailable or empty.
pub fn mock_response() -> ProviderResponse {
    match serde_json::from_str(MOCK_REVIEWS) {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(error = %e, "bundled review fixtures are malformed");
            ProviderResponse::error(format!("Bundled review fixtures are malformed: {e}"))
        }
    }
}
