//! Local wishlist management.

use mercato_core::{CurrencyCode, Price, ProductId, WishlistItem, WishlistStore};
use mercato_storefront::session::FileWishlist;
use mercato_storefront::{FileStorage, StorefrontConfig};
use tracing::info;

fn open(config: &StorefrontConfig) -> FileWishlist {
    WishlistStore::with_backend(FileStorage::new(config.data_dir.clone()))
}

fn describe(item: &WishlistItem, currency: CurrencyCode) -> String {
    format!(
        "{}\t{}\t{}\t/products/{}",
        item.id,
        item.name,
        Price::new(item.price, currency).display(),
        item.slug
    )
}

/// Print saved products, one per line.
pub fn list(config: &StorefrontConfig) {
    let wishlist = open(config);
    if wishlist.is_empty() {
        info!("Wishlist is empty");
        return;
    }
    for item in wishlist.items() {
        println!("{}", describe(item, config.currency));
    }
}

pub fn add(config: &StorefrontConfig, item: WishlistItem) {
    let mut wishlist = open(config);
    let id = item.id.clone();
    if wishlist.add_item(item) {
        info!(product_id = %id, "Added to wishlist");
    } else {
        info!(product_id = %id, "Already in wishlist");
    }
}

pub fn remove(config: &StorefrontConfig, id: &str) {
    let mut wishlist = open(config);
    if wishlist.remove_item(&ProductId::new(id)) {
        info!(product_id = %id, "Removed from wishlist");
    } else {
        info!(product_id = %id, "Not in wishlist");
    }
}

pub fn toggle(config: &StorefrontConfig, item: WishlistItem) {
    let mut wishlist = open(config);
    let id = item.id.clone();
    if wishlist.toggle_item(item) {
        info!(product_id = %id, "Added to wishlist");
    } else {
        info!(product_id = %id, "Removed from wishlist");
    }
}

pub fn clear(config: &StorefrontConfig) {
    let mut wishlist = open(config);
    let count = wishlist.len();
    wishlist.clear_wishlist();
    info!(count, "Wishlist cleared");
}
