use chrono::{DateTime, Utc};

use crate::domain::review::{CanonicalReview, PropertyRef, ReviewDirection, ReviewStatus};

pub fn property(id: &str, name: &str) -> PropertyRef {
    PropertyRef {
        id: id.to_string(),
        name: name.to_string(),
        short_name: name.to_string(),
        location: None,
    }
}

/// Published guest review on airbnb; tests override what they care about.
pub fn review(id: &str, property_id: &str, rating: f64, submitted_at: &str) -> CanonicalReview {
    let submitted_at = DateTime::parse_from_rfc3339(submitted_at)
        .map(|instant| instant.with_timezone(&Utc))
        .ok();

    CanonicalReview {
        id: id.to_string(),
        property_id: property_id.to_string(),
        property: property(property_id, &format!("Property {property_id}")),
        guest_name: "Test Guest".to_string(),
        guest_initials: "TG".to_string(),
        text: "Nice place".to_string(),
        private_note: None,
        overall_rating: rating,
        categories: vec![],
        direction: ReviewDirection::Guest,
        status: ReviewStatus::Published,
        channel: "airbnb".to_string(),
        channel_display_name: "Airbnb".to_string(),
        submitted_at,
        submitted_at_display: String::new(),
        approved: false,
    }
}
