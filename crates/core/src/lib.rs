//! Mercato Core - Shared types and client-side state.
//!
//! This crate provides the pieces of the Mercato marketplace client that hold
//! real invariants:
//! - `storefront` - API client, file storage and session wiring
//! - `cli` - Command-line tools for codes, wishlist and checkout actions
//!
//! # Architecture
//!
//! The core crate contains only types, traits and in-memory stores - no
//! network access and no filesystem access. Durable storage and the REST
//! backend are injected through traits ([`persistence::StorageBackend`],
//! [`promo::PromoValidator`]) so everything here runs in plain unit tests.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices and emails
//! - [`codes`] - License, gift, promo and affiliate code generation/validation
//! - [`cart`] - In-session shopping cart
//! - [`wishlist`] - Persisted wishlist
//! - [`persistence`] - Scoped persistence port over a key/value backend
//! - [`promo`] - Promo code application and seller promo records
//! - [`gift`] - Gift checkout payloads
//! - [`review`] - Product review submissions
//! - [`license`] - License records and rights

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod codes;
pub mod gift;
pub mod license;
pub mod persistence;
pub mod promo;
pub mod review;
pub mod store;
pub mod types;
pub mod wishlist;

pub use cart::{CartLineItem, CartStore, NewCartItem};
pub use codes::{CodeGenerator, EntropySource, validate_license_key, validate_promo_code};
pub use promo::{DiscountType, PromoApplication, PromoCodeInput, PromoInputState, PromoValidator};
pub use store::SubscriptionId;
pub use types::*;
pub use wishlist::{WishlistItem, WishlistStore};
