use serde::{Deserialize, Serialize};

use crate::domain::review::ReviewDirection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectionFilter {
    Guest,
    Host,
    All,
}

impl DirectionFilter {
    pub fn admits(self, direction: ReviewDirection) -> bool {
        match self {
            DirectionFilter::All => true,
            DirectionFilter::Guest => direction == ReviewDirection::Guest,
            DirectionFilter::Host => direction == ReviewDirection::Host,
        }
    }
}

/// Optional, AND-combined review criteria. An unset field imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewFilter {
    pub property_id: Option<String>,
    pub channel: Option<String>,
    pub min_rating: Option<f64>,
    pub review_direction: Option<DirectionFilter>,
    pub approved_only: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Date,
    Rating,
    Property,
    Channel,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}
