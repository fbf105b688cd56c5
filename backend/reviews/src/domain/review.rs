use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Direction tag the provider uses for reviews written by a guest about a stay.
pub const GUEST_TO_HOST: &str = "guest-to-host";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Published,
    Pending,
    Rejected,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDirection {
    Guest,
    Host,
}

impl ReviewDirection {
    pub fn from_provider_tag(tag: &str) -> Self {
        if tag == GUEST_TO_HOST {
            ReviewDirection::Guest
        } else {
            ReviewDirection::Host
        }
    }
}

/// Reads an explicit JSON `null` the same way as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parses provider records one by one so a single malformed record is
/// skipped instead of failing the whole batch.
fn lenient_records<'de, D>(deserializer: D) -> Result<Vec<RawReview>, D::Error>
where
    D: Deserializer<'de>,
{
    let values: Vec<Value> = null_as_default(deserializer)?;

    Ok(values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<RawReview>(value) {
            Ok(review) => Some(review),
            Err(e) => {
                metrics::counter!("reviews_provider_malformed_records_total").increment(1);
                tracing::warn!(index, error = %e, "skipping malformed provider review");
                None
            }
        })
        .collect())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCategoryRating {
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default)]
    pub rating: Option<f64>,
}

/// A review exactly as the booking-channel provider returns it.
///
/// Every field except `id` tolerates both a missing key and `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReview {
    pub id: i64,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub direction: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: ReviewStatus,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub public_review: String,
    #[serde(default)]
    pub private_review: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub review_category: Vec<RawCategoryRating>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub submitted_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub guest_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub listing_name: String,
    #[serde(default, alias = "listingMapId")]
    pub listing_id: Option<i64>,
    #[serde(default)]
    pub channel: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderStatus {
    Success,
    #[serde(other)]
    Error,
}

/// Response envelope of the reviews provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderResponse {
    pub status: ProviderStatus,
    #[serde(default, deserialize_with = "lenient_records")]
    pub result: Vec<RawReview>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ProviderResponse {
    pub fn success(result: Vec<RawReview>) -> Self {
        Self {
            status: ProviderStatus::Success,
            result,
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ProviderStatus::Error,
            result: Vec::new(),
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ProviderStatus::Success
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRef {
    pub id: String,
    pub name: String,
    pub short_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRating {
    pub name: String,
    pub display_name: String,
    pub rating: f64,
    pub max: u8,
}

/// Normalized, internally consistent review derived from one [`RawReview`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalReview {
    pub id: String,
    pub property_id: String,
    pub property: PropertyRef,
    pub guest_name: String,
    pub guest_initials: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_note: Option<String>,
    pub overall_rating: f64,
    pub categories: Vec<CategoryRating>,
    pub direction: ReviewDirection,
    pub status: ReviewStatus,
    pub channel: String,
    pub channel_display_name: String,
    /// `None` when the provider timestamp could not be parsed.
    pub submitted_at: Option<DateTime<Utc>>,
    pub submitted_at_display: String,
    pub approved: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub earliest: String,
    pub latest: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewsMeta {
    pub total: usize,
    pub properties: Vec<PropertyRef>,
    pub channels: Vec<String>,
    pub date_range: DateRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedResult {
    pub success: bool,
    pub reviews: Vec<CanonicalReview>,
    pub meta: ReviewsMeta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NormalizedResult {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            reviews: Vec::new(),
            meta: ReviewsMeta::default(),
            error: Some(message.into()),
        }
    }
}

/// Approved guest reviews of one property, as shown on its public page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicPropertyReviews {
    pub property: PropertyRef,
    pub reviews: Vec<CanonicalReview>,
    pub total: usize,
    pub average_rating: f64,
}
