use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::review::PropertyRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

/// Per-property rollup over guest reviews. Recomputed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyPerformance {
    pub property: PropertyRef,
    pub total_reviews: usize,
    pub average_rating: f64,
    /// Buckets 1..=5 keyed by the rounded overall rating.
    pub rating_distribution: BTreeMap<u8, usize>,
    pub category_averages: BTreeMap<String, f64>,
    pub approved_count: usize,
    pub pending_count: usize,
    pub trend: Trend,
    pub channel_breakdown: BTreeMap<String, usize>,
}

impl PropertyPerformance {
    pub fn empty(property: PropertyRef) -> Self {
        Self {
            property,
            total_reviews: 0,
            average_rating: 0.0,
            rating_distribution: (1..=5).map(|bucket| (bucket, 0)).collect(),
            category_averages: BTreeMap::new(),
            approved_count: 0,
            pending_count: 0,
            trend: Trend::Stable,
            channel_breakdown: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_reviews: usize,
    pub average_rating: f64,
    pub approved_count: usize,
    pub pending_count: usize,
    pub property_count: usize,
}
