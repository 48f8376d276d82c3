//! Mercato Storefront library.
//!
//! Wires the in-memory stores from `mercato-core` to the outside world:
//! - [`api`] - REST client for promo validation, gifts and reviews
//! - [`storage`] - JSON-file key/value storage for the wishlist
//! - [`session`] - One shopper session tying the stores and clients together
//! - [`config`] - Environment-driven configuration
//! - [`error`] - Unified error type with Sentry reporting

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod session;
pub mod storage;

pub use api::{ApiClient, ApiError};
pub use config::{ConfigError, StorefrontConfig};
pub use error::StorefrontError;
pub use session::StorefrontSession;
pub use storage::FileStorage;
