//! Unified error handling with Sentry integration.
//!
//! Session operations return [`StorefrontError`]. Callers show
//! [`StorefrontError::user_message`] to the shopper and call
//! [`StorefrontError::report`] so backend and storage failures reach Sentry.

use mercato_core::gift::GiftError;
use mercato_core::persistence::StorageError;
use mercato_core::review::ReviewError;
use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;

/// Application-level error type for the storefront client.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Backend API call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Local storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Gift form was rejected before sending.
    #[error("Gift error: {0}")]
    Gift(#[from] GiftError),

    /// Review was rejected before sending.
    #[error("Review error: {0}")]
    Review(#[from] ReviewError),
}

impl StorefrontError {
    /// Message safe to show to a shopper.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(err) => err.user_message(),
            Self::Storage(_) => "Could not access local storage".to_string(),
            Self::Gift(err) => err.to_string(),
            Self::Review(err) => err.to_string(),
            Self::Config(err) => err.to_string(),
        }
    }

    /// Log the error and capture server-side failures to Sentry.
    pub fn report(&self) {
        let capture = match self {
            Self::Api(err) => err.is_server_error(),
            Self::Storage(_) => true,
            Self::Config(_) | Self::Gift(_) | Self::Review(_) => false,
        };

        if capture {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront error"
            );
        } else {
            tracing::warn!(error = %self, "Storefront request rejected");
        }
    }
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("wishlist", "Saved product", Some(&[("product_id", "p1")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
