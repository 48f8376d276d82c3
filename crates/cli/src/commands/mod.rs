//! CLI command implementations.

pub mod codes;
pub mod gift;
pub mod license;
pub mod promo;
pub mod review;
pub mod wishlist;
