//! Product reviews.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::ReviewId;

/// Problems with a review before it is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReviewError {
    #[error("Please select a rating")]
    MissingRating,

    #[error("Rating must be between 1 and 5 (got {0})")]
    RatingOutOfRange(u8),

    #[error("Please write a comment")]
    EmptyComment,
}

/// Star rating, 1 to 5 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MAX: u8 = 5;

    /// # Errors
    ///
    /// Returns [`ReviewError::MissingRating`] for 0 and
    /// [`ReviewError::RatingOutOfRange`] above 5.
    pub const fn new(stars: u8) -> Result<Self, ReviewError> {
        match stars {
            0 => Err(ReviewError::MissingRating),
            1..=Self::MAX => Ok(Self(stars)),
            _ => Err(ReviewError::RatingOutOfRange(stars)),
        }
    }

    #[must_use]
    pub const fn stars(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = ReviewError;

    fn try_from(stars: u8) -> Result<Self, Self::Error> {
        Self::new(stars)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

/// Body of `POST /products/{slug}/reviews`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewSubmission {
    pub rating: Rating,
    pub comment: String,
}

impl ReviewSubmission {
    /// Validate a rating and comment; the comment is trimmed.
    ///
    /// # Errors
    ///
    /// Returns a [`ReviewError`] if the rating is missing or out of range, or
    /// the comment is blank.
    pub fn new(stars: u8, comment: &str) -> Result<Self, ReviewError> {
        let rating = Rating::new(stars)?;
        let comment = comment.trim();
        if comment.is_empty() {
            return Err(ReviewError::EmptyComment);
        }
        Ok(Self {
            rating,
            comment: comment.to_string(),
        })
    }
}

/// A published review as the backend returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub user_name: String,
    #[serde(default)]
    pub user_avatar: Option<String>,
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub verified_purchase: bool,
}

/// Average and count over a product's reviews.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ReviewSummary {
    pub count: usize,
    /// Mean rating; 0.0 with no reviews.
    pub average: f64,
}

impl ReviewSummary {
    #[must_use]
    pub fn from_reviews(reviews: &[Review]) -> Self {
        if reviews.is_empty() {
            return Self::default();
        }
        let total: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
        #[allow(clippy::cast_precision_loss)] // review counts never approach 2^52
        let average = f64::from(total) / reviews.len() as f64;
        Self {
            count: reviews.len(),
            average,
        }
    }

    /// e.g. `4.5 out of 5 (2 reviews)`.
    #[must_use]
    pub fn headline(&self) -> String {
        let noun = if self.count == 1 { "review" } else { "reviews" };
        format!("{:.1} out of 5 ({} {noun})", self.average, self.count)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn review(id: i64, rating: u8) -> Review {
        Review {
            id: ReviewId::new(id),
            user_name: "Ravi".to_string(),
            user_avatar: None,
            rating,
            comment: "Clean files".to_string(),
            created_at: "2026-01-05T10:00:00Z".parse().unwrap(),
            verified_purchase: true,
        }
    }

    #[test]
    fn test_rating_bounds() {
        assert_eq!(Rating::new(0), Err(ReviewError::MissingRating));
        assert_eq!(Rating::new(6), Err(ReviewError::RatingOutOfRange(6)));
        assert_eq!(Rating::new(5).map(Rating::stars), Ok(5));
    }

    #[test]
    fn test_submission_trims_comment() {
        let submission = ReviewSubmission::new(4, "  Great pack  ").unwrap();
        assert_eq!(submission.comment, "Great pack");
        assert_eq!(
            ReviewSubmission::new(4, "   "),
            Err(ReviewError::EmptyComment)
        );
    }

    #[test]
    fn test_submission_wire_format() {
        let submission = ReviewSubmission::new(5, "Loved it").unwrap();
        let json = serde_json::to_string(&submission).unwrap();
        assert_eq!(json, r#"{"rating":5,"comment":"Loved it"}"#);

        let bad: Result<ReviewSubmission, _> =
            serde_json::from_str(r#"{"rating":9,"comment":"x"}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_review_defaults() {
        let parsed: Review = serde_json::from_str(
            r#"{"id":1,"user_name":"A","rating":3,"comment":"ok","created_at":"2026-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert!(!parsed.verified_purchase);
        assert!(parsed.user_avatar.is_none());
    }

    #[test]
    fn test_summary() {
        let summary = ReviewSummary::from_reviews(&[review(1, 5), review(2, 4)]);
        assert_eq!(summary.count, 2);
        assert!((summary.average - 4.5).abs() < f64::EPSILON);
        assert_eq!(summary.headline(), "4.5 out of 5 (2 reviews)");

        assert_eq!(ReviewSummary::from_reviews(&[review(1, 3)]).headline(), "3.0 out of 5 (1 review)");
        assert_eq!(ReviewSummary::from_reviews(&[]).count, 0);
    }
}
