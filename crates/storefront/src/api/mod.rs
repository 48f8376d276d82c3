//! Mercato backend REST API client.
//!
//! # Architecture
//!
//! - Plain JSON over `reqwest` 0.13, bearer token auth when configured
//! - The backend is the source of truth for promo codes, gifts and reviews
//! - Review listings are cached in memory via `moka` (5 minute TTL)
//!
//! # Endpoints
//!
//! - `POST /promo-codes/validate` - judge a promo code
//! - `POST /products/{slug}/gift` - record a gift purchase
//! - `GET|POST /products/{slug}/reviews` - list and submit reviews
//!
//! # Example
//!
//! ```rust,ignore
//! use mercato_storefront::api::ApiClient;
//!
//! let client = ApiClient::new(&config)?;
//! let verdict = client.validate_promo("SAVE20").await?;
//! let reviews = client.list_reviews("icon-pack").await?;
//! ```

mod cache;
mod client;

pub use client::ApiClient;

use thiserror::Error;

/// Errors that can occur when talking to the Mercato backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Missing or rejected access token.
    #[error("Unauthorized")]
    Unauthorized,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Any other non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

impl ApiError {
    /// Message safe to show to a shopper.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized => "Please log in and try again".to_string(),
            Self::NotFound(_) => "That product could not be found".to_string(),
            Self::RateLimited(secs) => {
                format!("Too many requests, please try again in {secs} seconds")
            }
            Self::Http(_) | Self::Parse(_) | Self::Status { .. } => {
                "Something went wrong, please try again later".to_string()
            }
        }
    }

    /// Whether this error points at the backend rather than the caller.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        match self {
            Self::Http(_) | Self::Parse(_) => true,
            Self::Status { status, .. } => *status >= 500,
            Self::Unauthorized | Self::NotFound(_) | Self::RateLimited(_) => false,
        }
    }
}
