use std::collections::{BTreeMap, HashSet};

use crate::domain::performance::{DashboardSummary, PropertyPerformance, Trend};
use crate::domain::review::{CanonicalReview, PropertyRef, ReviewDirection, ReviewStatus};
use crate::usecase::normalize::round1;

/// Reviews on each side of the trend comparison.
pub const TREND_WINDOW: usize = 2;
/// Below this many guest reviews the trend is always stable.
pub const TREND_MIN_REVIEWS: usize = 2 * TREND_WINDOW;
/// Mean difference that must be exceeded to report up or down.
pub const TREND_THRESHOLD: f64 = 0.3;

fn mean<'a>(reviews: impl ExactSizeIterator<Item = &'a CanonicalReview>) -> f64 {
    let count = reviews.len();
    if count == 0 {
        return 0.0;
    }
    reviews.map(|r| r.overall_rating).sum::<f64>() / count as f64
}

fn is_guest_review_of(review: &CanonicalReview, property_id: &str) -> bool {
    review.direction == ReviewDirection::Guest && review.property_id == property_id
}

/// Compares the newest [`TREND_WINDOW`] reviews with the window before them.
pub fn trend(reviews: &[&CanonicalReview]) -> Trend {
    if reviews.len() < TREND_MIN_REVIEWS {
        return Trend::Stable;
    }

    let mut newest_first = reviews.to_vec();
    newest_first.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));

    let recent = mean(newest_first[..TREND_WINDOW].iter().copied());
    let older = mean(newest_first[TREND_WINDOW..TREND_MIN_REVIEWS].iter().copied());
    let delta = recent - older;

    if delta > TREND_THRESHOLD {
        Trend::Up
    } else if delta < -TREND_THRESHOLD {
        Trend::Down
    } else {
        Trend::Stable
    }
}

/// Folds the guest reviews of one property into its performance record.
/// Host-authored reviews never count.
pub fn performance_for(reviews: &[CanonicalReview], property: &PropertyRef) -> PropertyPerformance {
    let property_reviews: Vec<&CanonicalReview> = reviews
        .iter()
        .filter(|r| is_guest_review_of(r, &property.id))
        .collect();

    let mut performance = PropertyPerformance::empty(property.clone());
    if property_reviews.is_empty() {
        return performance;
    }

    performance.total_reviews = property_reviews.len();
    performance.average_rating = round1(mean(property_reviews.iter().copied()));

    let mut category_totals: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for review in &property_reviews {
        let bucket = review.overall_rating.round();
        if (1.0..=5.0).contains(&bucket) {
            *performance.rating_distribution.entry(bucket as u8).or_default() += 1;
        }

        for category in &review.categories {
            let entry = category_totals.entry(category.name.as_str()).or_default();
            entry.0 += category.rating;
            entry.1 += 1;
        }

        if review.approved {
            performance.approved_count += 1;
        }
        if review.status == ReviewStatus::Pending {
            performance.pending_count += 1;
        }

        *performance
            .channel_breakdown
            .entry(review.channel.clone())
            .or_default() += 1;
    }

    performance.category_averages = category_totals
        .into_iter()
        .map(|(name, (sum, count))| (name.to_string(), round1(sum / count as f64)))
        .collect();
    performance.trend = trend(&property_reviews);

    performance
}

pub fn portfolio_performance(
    reviews: &[CanonicalReview],
    properties: &[PropertyRef],
) -> Vec<PropertyPerformance> {
    properties
        .iter()
        .map(|property| performance_for(reviews, property))
        .collect()
}

/// Mean overall rating, one decimal; zero for an empty slice.
pub fn average_rating(reviews: &[CanonicalReview]) -> f64 {
    round1(mean(reviews.iter()))
}

/// Headline numbers across every property, guest reviews only.
pub fn dashboard_summary(reviews: &[CanonicalReview]) -> DashboardSummary {
    let guest_reviews: Vec<&CanonicalReview> = reviews
        .iter()
        .filter(|r| r.direction == ReviewDirection::Guest)
        .collect();

    let property_count = guest_reviews
        .iter()
        .map(|r| r.property_id.as_str())
        .collect::<HashSet<_>>()
        .len();

    DashboardSummary {
        total_reviews: guest_reviews.len(),
        average_rating: round1(mean(guest_reviews.iter().copied())),
        approved_count: guest_reviews.iter().filter(|r| r.approved).count(),
        pending_count: guest_reviews
            .iter()
            .filter(|r| r.status == ReviewStatus::Pending)
            .count(),
        property_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::review::CategoryRating;
    use crate::usecase::testing::{property, review};

    fn category(name: &str, rating: f64) -> CategoryRating {
        CategoryRating {
            name: name.to_string(),
            display_name: name.to_string(),
            rating,
            max: 10,
        }
    }

    fn trend_of(ratings_newest_first: &[f64]) -> Trend {
        let reviews: Vec<CanonicalReview> = ratings_newest_first
            .iter()
            .enumerate()
            .map(|(i, rating)| {
                review(
                    &i.to_string(),
                    "p1",
                    *rating,
                    &format!("2024-01-{:02}T00:00:00Z", 28 - i),
                )
            })
            .collect();
        performance_for(&reviews, &property("p1", "Property p1")).trend
    }

    #[test]
    fn test_performance_for_no_reviews() {
        let reviews = vec![review("1", "other", 5.0, "2024-01-01T00:00:00Z")];

        let performance = performance_for(&reviews, &property("p1", "Property p1"));

        assert_eq!(performance.total_reviews, 0);
        assert_eq!(performance.average_rating, 0.0);
        assert_eq!(performance.approved_count, 0);
        assert_eq!(performance.pending_count, 0);
        assert!(performance.category_averages.is_empty());
        assert!(performance.channel_breakdown.is_empty());
        assert_eq!(performance.trend, Trend::Stable);
    }

    #[test]
    fn test_performance_for_aggregates_guest_reviews() {
        let mut first = review("1", "p1", 4.6, "2024-01-03T00:00:00Z");
        first.categories = vec![category("cleanliness", 10.0), category("value", 7.0)];
        first.approved = true;

        let mut second = review("2", "p1", 3.8, "2024-01-02T00:00:00Z");
        second.categories = vec![category("cleanliness", 7.0)];
        second.status = ReviewStatus::Pending;
        second.channel = "booking.com".to_string();

        let mut host = review("3", "p1", 1.0, "2024-01-04T00:00:00Z");
        host.direction = ReviewDirection::Host;
        host.approved = true;

        let out_of_range = review("4", "p1", 0.2, "2024-01-01T00:00:00Z");

        let reviews = vec![first, second, host, out_of_range];
        let performance = performance_for(&reviews, &property("p1", "Property p1"));

        assert_eq!(performance.total_reviews, 3);
        assert_eq!(performance.average_rating, 2.9);
        assert_eq!(performance.rating_distribution[&5], 1);
        assert_eq!(performance.rating_distribution[&4], 1);
        assert_eq!(performance.rating_distribution.values().sum::<usize>(), 2);
        assert_eq!(performance.category_averages["cleanliness"], 8.5);
        assert_eq!(performance.category_averages["value"], 7.0);
        assert_eq!(performance.approved_count, 1);
        assert_eq!(performance.pending_count, 1);
        assert_eq!(performance.channel_breakdown["airbnb"], 2);
        assert_eq!(performance.channel_breakdown["booking.com"], 1);
        assert_eq!(performance.trend, Trend::Stable);
    }

    #[test]
    fn test_trend_needs_four_reviews() {
        assert_eq!(trend_of(&[5.0, 5.0, 1.0]), Trend::Stable);
        assert_eq!(trend_of(&[1.0]), Trend::Stable);
        assert_eq!(trend_of(&[]), Trend::Stable);
    }

    #[test]
    fn test_trend_thresholds() {
        assert_eq!(trend_of(&[4.8, 4.8, 4.0, 4.0]), Trend::Up);
        assert_eq!(trend_of(&[4.0, 4.0, 4.8, 4.8]), Trend::Down);
        assert_eq!(trend_of(&[4.2, 4.2, 4.1, 4.1]), Trend::Stable);
    }

    #[test]
    fn test_trend_ignores_reviews_beyond_window() {
        assert_eq!(trend_of(&[4.8, 4.8, 4.0, 4.0, 1.0, 1.0]), Trend::Up);
    }

    #[test]
    fn test_trend_orders_by_date() {
        let reviews = vec![
            review("old1", "p1", 4.0, "2024-01-01T00:00:00Z"),
            review("new1", "p1", 4.8, "2024-01-10T00:00:00Z"),
            review("old2", "p1", 4.0, "2024-01-02T00:00:00Z"),
            review("new2", "p1", 4.8, "2024-01-09T00:00:00Z"),
        ];
        let refs: Vec<&CanonicalReview> = reviews.iter().collect();

        assert_eq!(trend(&refs), Trend::Up);
    }

    #[test]
    fn test_trend_treats_undated_reviews_as_oldest() {
        let reviews = vec![
            review("undated1", "p1", 3.0, "sometime last summer"),
            review("dated1", "p1", 5.0, "2024-01-01T00:00:00Z"),
            review("undated2", "p1", 3.0, "n/a"),
            review("dated2", "p1", 5.0, "2024-01-02T00:00:00Z"),
        ];
        assert!(reviews[0].submitted_at.is_none());
        let refs: Vec<&CanonicalReview> = reviews.iter().collect();

        assert_eq!(trend(&refs), Trend::Up);

        let reviews = vec![
            review("undated1", "p1", 5.0, "unknown"),
            review("dated1", "p1", 3.0, "2024-01-01T00:00:00Z"),
            review("undated2", "p1", 5.0, "unknown"),
            review("dated2", "p1", 3.0, "2024-01-02T00:00:00Z"),
        ];
        let refs: Vec<&CanonicalReview> = reviews.iter().collect();

        assert_eq!(trend(&refs), Trend::Down);
    }

    #[test]
    fn test_portfolio_performance_keeps_property_order() {
        let reviews = vec![
            review("1", "p1", 4.0, "2024-01-01T00:00:00Z"),
            review("2", "p2", 5.0, "2024-01-01T00:00:00Z"),
        ];
        let properties = vec![property("p2", "B"), property("p1", "A"), property("p3", "C")];

        let performances = portfolio_performance(&reviews, &properties);

        assert_eq!(performances.len(), 3);
        assert_eq!(performances[0].property.id, "p2");
        assert_eq!(performances[0].average_rating, 5.0);
        assert_eq!(performances[2].total_reviews, 0);
    }

    #[test]
    fn test_dashboard_summary() {
        let mut approved = review("1", "p1", 4.0, "2024-01-01T00:00:00Z");
        approved.approved = true;
        let mut pending = review("2", "p2", 5.0, "2024-01-01T00:00:00Z");
        pending.status = ReviewStatus::Pending;
        let mut host = review("3", "p3", 1.0, "2024-01-01T00:00:00Z");
        host.direction = ReviewDirection::Host;

        let summary = dashboard_summary(&[approved, pending, host]);

        assert_eq!(summary.total_reviews, 2);
        assert_eq!(summary.average_rating, 4.5);
        assert_eq!(summary.approved_count, 1);
        assert_eq!(summary.pending_count, 1);
        assert_eq!(summary.property_count, 2);
    }

    #[test]
    fn test_average_rating() {
        let reviews = vec![
            review("1", "p1", 4.0, "2024-01-01T00:00:00Z"),
            review("2", "p1", 4.5, "2024-01-02T00:00:00Z"),
            review("3", "p1", 5.0, "2024-01-03T00:00:00Z"),
        ];

        assert_eq!(average_rating(&reviews), 4.5);
        assert_eq!(average_rating(&[]), 0.0);
    }

    #[test]
    fn test_dashboard_summary_empty() {
        assert_eq!(dashboard_summary(&[]), DashboardSummary::default());
    }
}
