use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

use crate::domain::review::{
    CanonicalReview, CategoryRating, DateRange, NormalizedResult, PropertyRef, ProviderResponse,
    RawReview, ReviewDirection, ReviewsMeta,
};

pub const UNKNOWN_PROPERTY: &str = "Unknown Property";
pub const DEFAULT_CHANNEL: &str = "direct";
pub const CATEGORY_MAX_RATING: u8 = 10;

const UNKNOWN_INITIALS: &str = "??";
const UNKNOWN_PROPERTY_SLUG: &str = "unknown-property";
const PROVIDER_ERROR: &str = "Provider returned an error";
const NAME_SEPARATORS: [char; 3] = ['-', '\u{2013}', '\u{2014}'];

/// Neighbourhoods recognised in listing names. Anything else gets no location.
const KNOWN_LOCATIONS: &[&str] = &[
    "Shoreditch",
    "Camden",
    "Kensington",
    "Notting Hill",
    "Soho",
    "Canary Wharf",
    "Islington",
    "Chelsea",
    "Westminster",
    "Greenwich",
    "Hackney",
    "Hoxton",
    "Clerkenwell",
    "Fitzrovia",
    "Marylebone",
    "Mayfair",
    "Covent Garden",
    "Brixton",
];

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn initials(name: &str) -> String {
    let words: Vec<&str> = name.split_whitespace().collect();
    match words.as_slice() {
        [] => UNKNOWN_INITIALS.to_string(),
        [single] => single.chars().take(2).collect::<String>().to_uppercase(),
        [first, .., last] => first
            .chars()
            .take(1)
            .chain(last.chars().take(1))
            .collect::<String>()
            .to_uppercase(),
    }
}

/// Segment of the listing name before the first dash-like separator.
pub fn short_property_name(full_name: &str) -> String {
    let trimmed = full_name.trim();
    if trimmed.is_empty() {
        return UNKNOWN_PROPERTY.to_string();
    }

    let head = trimmed.split(NAME_SEPARATORS).next().unwrap_or(trimmed).trim();
    if head.is_empty() {
        trimmed.to_string()
    } else {
        head.to_string()
    }
}

pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }

    if slug.is_empty() {
        UNKNOWN_PROPERTY_SLUG.to_string()
    } else {
        slug
    }
}

/// Best-effort neighbourhood lookup against [`KNOWN_LOCATIONS`].
pub fn extract_location(listing_name: &str) -> Option<String> {
    let lowered = listing_name.to_lowercase();
    KNOWN_LOCATIONS
        .iter()
        .find(|place| lowered.contains(&place.to_lowercase()))
        .map(|place| place.to_string())
}

pub fn category_display_name(category: &str) -> String {
    let known = match category {
        "cleanliness" => Some("Cleanliness"),
        "communication" => Some("Communication"),
        "respect_house_rules" => Some("House Rules"),
        "accuracy" => Some("Accuracy"),
        "location" => Some("Location"),
        "value" => Some("Value"),
        "check_in" | "checkin" => Some("Check-in"),
        "amenities" => Some("Amenities"),
        _ => None,
    };
    if let Some(name) = known {
        return name.to_string();
    }

    let spaced = category.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn channel_display_name(channel: &str) -> String {
    match channel.to_lowercase().as_str() {
        "airbnb" => "Airbnb".to_string(),
        "booking" | "booking.com" | "bookingcom" => "Booking.com".to_string(),
        "vrbo" | "homeaway" => "Vrbo".to_string(),
        "expedia" => "Expedia".to_string(),
        "google" => "Google".to_string(),
        "direct" => "Direct".to_string(),
        _ => channel.to_string(),
    }
}

/// Parses the provider's timestamp. Returns `None` when no supported format matches.
pub fn parse_submitted_at(raw: &str) -> Option<DateTime<Utc>> {
    let value = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Some(instant.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub fn display_date(instant: DateTime<Utc>) -> String {
    instant.format("%-d %b %Y").to_string()
}

fn overall_rating(raw: &RawReview) -> f64 {
    if let Some(rating) = raw.rating {
        return rating;
    }

    let ratings: Vec<f64> = raw.review_category.iter().filter_map(|c| c.rating).collect();
    if ratings.is_empty() {
        return 0.0;
    }

    round1(ratings.iter().sum::<f64>() / ratings.len() as f64 / 2.0)
}

/// Builds the canonical form of one provider review.
///
/// Pure in `(raw, approved_ids)`: the approval flag is a snapshot of the set
/// at call time. Malformed fields degrade to documented fallbacks and never
/// make this fail.
pub fn normalize(raw: &RawReview, approved_ids: &BTreeSet<String>) -> CanonicalReview {
    let id = raw.id.to_string();
    let property_id = raw
        .listing_id
        .map(|listing_id| listing_id.to_string())
        .unwrap_or_else(|| slugify(&raw.listing_name));

    let property = PropertyRef {
        id: property_id.clone(),
        name: raw.listing_name.clone(),
        short_name: short_property_name(&raw.listing_name),
        location: extract_location(&raw.listing_name),
    };

    // Unrated or unnamed categories carry nothing to display.
    let categories = raw
        .review_category
        .iter()
        .filter(|c| !c.category.trim().is_empty())
        .filter_map(|c| {
            c.rating.map(|rating| CategoryRating {
                name: c.category.clone(),
                display_name: category_display_name(&c.category),
                rating,
                max: CATEGORY_MAX_RATING,
            })
        })
        .collect();

    let channel = raw
        .channel
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_CHANNEL)
        .to_string();

    let submitted_at = parse_submitted_at(&raw.submitted_at);
    let submitted_at_display = match submitted_at {
        Some(instant) => display_date(instant),
        None => raw.submitted_at.clone(),
    };

    CanonicalReview {
        approved: approved_ids.contains(&id),
        id,
        property_id,
        property,
        guest_name: raw.guest_name.clone(),
        guest_initials: initials(&raw.guest_name),
        text: raw.public_review.clone(),
        private_note: raw
            .private_review
            .clone()
            .filter(|note| !note.trim().is_empty()),
        overall_rating: overall_rating(raw),
        categories,
        direction: ReviewDirection::from_provider_tag(&raw.direction),
        status: raw.status,
        channel_display_name: channel_display_name(&channel),
        channel,
        submitted_at,
        submitted_at_display,
    }
}

fn format_instant(instant: Option<DateTime<Utc>>) -> String {
    instant
        .map(|i| i.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}

/// Normalizes a whole provider response, newest review first.
///
/// A failed envelope short-circuits to a `success: false` result; nothing in
/// it is normalized.
pub fn normalize_collection(
    response: &ProviderResponse,
    approved_ids: &BTreeSet<String>,
) -> NormalizedResult {
    if !response.is_success() {
        let message = response
            .message
            .clone()
            .unwrap_or_else(|| PROVIDER_ERROR.to_string());
        tracing::warn!(%message, "provider response signalled failure");
        return NormalizedResult::failure(message);
    }

    let mut reviews: Vec<CanonicalReview> = response
        .result
        .iter()
        .map(|raw| normalize(raw, approved_ids))
        .collect();
    reviews.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));

    let properties: Vec<PropertyRef> = {
        let mut seen = HashSet::new();
        reviews
            .iter()
            .filter(|r| seen.insert(r.property_id.as_str()))
            .map(|r| r.property.clone())
            .collect()
    };

    let channels: Vec<String> = {
        let mut seen = HashSet::new();
        reviews
            .iter()
            .filter(|r| seen.insert(r.channel.as_str()))
            .map(|r| r.channel.clone())
            .collect()
    };

    let date_range = DateRange {
        earliest: format_instant(reviews.iter().filter_map(|r| r.submitted_at).min()),
        latest: format_instant(reviews.iter().filter_map(|r| r.submitted_at).max()),
    };

    tracing::debug!(
        total = reviews.len(),
        properties = properties.len(),
        channels = channels.len(),
        "reviews normalized"
    );

    NormalizedResult {
        success: true,
        meta: ReviewsMeta {
            total: reviews.len(),
            properties,
            channels,
            date_range,
        },
        reviews,
        error: None,
    }
}
