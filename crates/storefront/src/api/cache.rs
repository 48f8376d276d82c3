//! Cache types for backend API responses.

use std::sync::Arc;

use mercato_core::review::Review;

/// Cache key for API responses.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Reviews(String),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Reviews(Arc<Vec<Review>>),
}
