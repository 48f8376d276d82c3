//! Integration tests for wishlist persistence across restarts.

use std::cell::RefCell;
use std::rc::Rc;

use mercato_core::persistence::{MemoryStorage, StorageBackend};
use mercato_core::wishlist::WISHLIST_STORAGE_KEY;
use mercato_core::{ProductId, WishlistItem, WishlistStore};
use mercato_integration_tests::temp_data_dir;
use mercato_storefront::FileStorage;
use rust_decimal::Decimal;

fn item(id: &str, price: i64) -> WishlistItem {
    WishlistItem {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        price: Decimal::from(price),
        image: format!("/images/{id}.png"),
        slug: format!("product-{id}"),
    }
}

// =============================================================================
// Restart Behavior
// =============================================================================

#[test]
fn test_memory_backend_restart_keeps_items() {
    let storage = MemoryStorage::new();

    let mut wishlist = WishlistStore::with_backend(storage.clone());
    assert!(wishlist.add_item(item("p1", 999)));
    assert!(wishlist.add_item(item("p2", 499)));
    assert!(!wishlist.add_item(item("p1", 1)));
    drop(wishlist);

    let wishlist = WishlistStore::with_backend(storage);
    assert_eq!(wishlist.len(), 2);
    let first = wishlist.items().first().unwrap_or_else(|| panic!("empty"));
    assert_eq!(first.price, Decimal::from(999));
}

#[test]
fn test_file_backend_restart_keeps_items() {
    let dir = temp_data_dir("wishlist");

    let mut wishlist = WishlistStore::with_backend(FileStorage::new(&dir));
    wishlist.add_item(item("p1", 999));
    wishlist.toggle_item(item("p2", 499));
    wishlist.toggle_item(item("p1", 999));
    drop(wishlist.close());

    let wishlist = WishlistStore::with_backend(FileStorage::new(&dir));
    assert!(!wishlist.is_in_wishlist(&ProductId::new("p1")));
    assert!(wishlist.is_in_wishlist(&ProductId::new("p2")));

    std::fs::remove_dir_all(&dir).unwrap_or_else(|e| panic!("{e}"));
}

#[test]
fn test_clear_is_persisted() {
    let storage = MemoryStorage::new();

    let mut wishlist = WishlistStore::with_backend(storage.clone());
    wishlist.add_item(item("p1", 10));
    wishlist.clear_wishlist();
    drop(wishlist);

    assert!(WishlistStore::with_backend(storage).is_empty());
}

#[test]
fn test_bare_items_record_is_accepted() {
    let storage = MemoryStorage::new();
    storage
        .set_item(
            WISHLIST_STORAGE_KEY,
            r#"{"items":[{"id":"p9","name":"Old","price":"12.50","image":"","slug":"old"}]}"#,
        )
        .unwrap_or_else(|e| panic!("{e}"));

    let wishlist = WishlistStore::with_backend(storage);
    assert!(wishlist.is_in_wishlist(&ProductId::new("p9")));
}

#[test]
fn test_corrupt_record_starts_empty_and_recovers() {
    let storage = MemoryStorage::new();
    storage
        .set_item(WISHLIST_STORAGE_KEY, "][")
        .unwrap_or_else(|e| panic!("{e}"));

    let mut wishlist = WishlistStore::with_backend(storage.clone());
    assert!(wishlist.is_empty());
    wishlist.add_item(item("p1", 5));
    drop(wishlist);

    assert_eq!(WishlistStore::with_backend(storage).len(), 1);
}

// =============================================================================
// Storage Failures
// =============================================================================

#[test]
fn test_quota_failure_keeps_session_state() {
    let storage = MemoryStorage::with_quota(64);

    let mut wishlist = WishlistStore::with_backend(storage.clone());
    assert!(wishlist.add_item(item("p1", 999)));
    assert!(wishlist.is_in_wishlist(&ProductId::new("p1")));
    drop(wishlist);

    // Nothing fitted, so a restart sees an empty list.
    assert!(WishlistStore::with_backend(storage).is_empty());
}

#[test]
fn test_listeners_see_every_change() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut wishlist = WishlistStore::with_backend(MemoryStorage::new());

    let sink = Rc::clone(&seen);
    let id = wishlist.subscribe(move |items| sink.borrow_mut().push(items.len()));
    wishlist.add_item(item("p1", 1));
    wishlist.add_item(item("p2", 2));
    wishlist.add_item(item("p2", 2));
    wishlist.remove_item(&ProductId::new("p1"));
    assert!(wishlist.unsubscribe(id));
    wishlist.clear_wishlist();

    assert_eq!(*seen.borrow(), vec![1, 2, 1]);
}
