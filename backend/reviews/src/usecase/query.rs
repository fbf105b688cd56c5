use std::cmp::Ordering;

use crate::domain::query::{ReviewFilter, SortDirection, SortField, SortSpec};
use crate::domain::review::CanonicalReview;

impl ReviewFilter {
    pub fn matches(&self, review: &CanonicalReview) -> bool {
        if let Some(property_id) = &self.property_id {
            if &review.property_id != property_id {
                return false;
            }
        }
        if let Some(channel) = &self.channel {
            if &review.channel != channel {
                return false;
            }
        }
        if let Some(min_rating) = self.min_rating {
            if review.overall_rating < min_rating {
                return false;
            }
        }
        if let Some(direction) = self.review_direction {
            if !direction.admits(review.direction) {
                return false;
            }
        }
        if self.approved_only == Some(true) && !review.approved {
            return false;
        }
        true
    }
}

/// Keeps the reviews matching every set criterion, in input order.
pub fn filter(reviews: Vec<CanonicalReview>, criteria: &ReviewFilter) -> Vec<CanonicalReview> {
    reviews.into_iter().filter(|r| criteria.matches(r)).collect()
}

fn compare(a: &CanonicalReview, b: &CanonicalReview, field: SortField) -> Ordering {
    match field {
        SortField::Date => a.submitted_at.cmp(&b.submitted_at),
        SortField::Rating => a.overall_rating.total_cmp(&b.overall_rating),
        SortField::Property => a.property.name.cmp(&b.property.name),
        SortField::Channel => a.channel.cmp(&b.channel),
    }
}

/// Stable sort; equal elements keep their input order in both directions.
pub fn sort(mut reviews: Vec<CanonicalReview>, spec: SortSpec) -> Vec<CanonicalReview> {
    match spec.direction {
        SortDirection::Asc => reviews.sort_by(|a, b| compare(a, b, spec.field)),
        SortDirection::Desc => reviews.sort_by(|a, b| compare(b, a, spec.field)),
    }
    reviews
}
