//! Persisted wishlist.
//!
//! The wishlist is a set of saved products keyed by ID, restored from storage
//! when the store is built and written back after every change. Storage
//! failures never reach the caller: the in-memory list stays authoritative for
//! the session and the failed write is logged.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::persistence::{PersistencePort, ScopedPersistence, StorageBackend};
use crate::store::{Listeners, SubscriptionId};
use crate::types::ProductId;

/// Storage key the wishlist is persisted under.
pub const WISHLIST_STORAGE_KEY: &str = "wishlist-storage";

/// A saved product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistItem {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub image: String,
    /// URL slug of the product page.
    pub slug: String,
}

/// Owner of the wishlist, generic over where it persists.
#[derive(Debug)]
pub struct WishlistStore<P> {
    items: Vec<WishlistItem>,
    persistence: P,
    listeners: Listeners<WishlistItem>,
}

impl<B: StorageBackend> WishlistStore<ScopedPersistence<B>> {
    /// Wishlist persisted under [`WISHLIST_STORAGE_KEY`] in `backend`.
    pub fn with_backend(backend: B) -> Self {
        Self::new(ScopedPersistence::new(backend, WISHLIST_STORAGE_KEY))
    }
}

impl<P: PersistencePort<WishlistItem>> WishlistStore<P> {
    /// Build the store and restore whatever `persistence` holds.
    ///
    /// Duplicate IDs in stored data are collapsed, keeping the first entry.
    pub fn new(persistence: P) -> Self {
        let mut items: Vec<WishlistItem> = Vec::new();
        for item in persistence.load() {
            if items.iter().all(|existing| existing.id != item.id) {
                items.push(item);
            }
        }
        debug!(count = items.len(), "Wishlist restored");

        Self {
            items,
            persistence,
            listeners: Listeners::new(),
        }
    }

    /// Save `item` unless an entry with the same ID exists. Returns whether it
    /// was inserted; an existing entry is left as is.
    pub fn add_item(&mut self, item: WishlistItem) -> bool {
        if self.is_in_wishlist(&item.id) {
            return false;
        }
        debug!(product_id = %item.id, "Wishlist item added");
        self.items.push(item);
        self.changed();
        true
    }

    /// Drop the entry for `id`. Returns whether anything was removed.
    pub fn remove_item(&mut self, id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.id != id);
        if self.items.len() == before {
            return false;
        }
        debug!(product_id = %id, "Wishlist item removed");
        self.changed();
        true
    }

    /// Remove `item` if saved, otherwise save it. Returns the new membership.
    pub fn toggle_item(&mut self, item: WishlistItem) -> bool {
        if self.is_in_wishlist(&item.id) {
            let id = item.id;
            self.remove_item(&id);
            false
        } else {
            self.add_item(item);
            true
        }
    }

    #[must_use]
    pub fn is_in_wishlist(&self, id: &ProductId) -> bool {
        self.items.iter().any(|item| &item.id == id)
    }

    /// Remove every entry.
    pub fn clear_wishlist(&mut self) {
        self.items.clear();
        self.changed();
    }

    #[must_use]
    pub fn items(&self) -> &[WishlistItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Run `listener` with the full item list after every change.
    pub fn subscribe(&mut self, listener: impl FnMut(&[WishlistItem]) + 'static) -> SubscriptionId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Write the current list once more, drop listeners and return the
    /// persistence port.
    pub fn close(mut self) -> P {
        self.persist();
        self.listeners.clear();
        self.persistence
    }

    fn changed(&mut self) {
        self.persist();
        self.listeners.notify(&self.items);
    }

    fn persist(&self) {
        if let Err(e) = self.persistence.save(&self.items) {
            warn!(error = %e, count = self.items.len(), "Failed to persist wishlist");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::persistence::{MemoryStorage, StorageBackend};

    fn item(id: &str) -> WishlistItem {
        WishlistItem {
            id: ProductId::new(id),
            name: format!("Template {id}"),
            price: Decimal::new(49_900, 2),
            image: format!("https://cdn.example.com/{id}.webp"),
            slug: format!("template-{id}"),
        }
    }

    #[test]
    fn test_add_twice_keeps_one_entry() {
        let mut wishlist = WishlistStore::with_backend(MemoryStorage::new());
        assert!(wishlist.add_item(item("a")));
        let mut renamed = item("a");
        renamed.name = "Different".to_string();
        assert!(!wishlist.add_item(renamed));

        assert_eq!(wishlist.len(), 1);
        assert_eq!(
            wishlist.items().first().map(|i| i.name.as_str()),
            Some("Template a")
        );
    }

    #[test]
    fn test_toggle_pair_restores_membership() {
        let mut wishlist = WishlistStore::with_backend(MemoryStorage::new());
        let id = ProductId::new("a");

        assert!(wishlist.toggle_item(item("a")));
        assert!(wishlist.is_in_wishlist(&id));
        assert!(!wishlist.toggle_item(item("a")));
        assert!(!wishlist.is_in_wishlist(&id));

        wishlist.add_item(item("b"));
        wishlist.toggle_item(item("b"));
        wishlist.toggle_item(item("b"));
        assert!(wishlist.is_in_wishlist(&ProductId::new("b")));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut wishlist = WishlistStore::with_backend(MemoryStorage::new());
        wishlist.add_item(item("a"));
        assert!(!wishlist.remove_item(&ProductId::new("zzz")));
        assert_eq!(wishlist.len(), 1);
    }

    #[test]
    fn test_survives_reload() {
        let storage = MemoryStorage::new();
        let mut wishlist = WishlistStore::with_backend(storage.clone());
        wishlist.add_item(item("a"));
        wishlist.add_item(item("b"));
        wishlist.remove_item(&ProductId::new("a"));
        wishlist.add_item(item("c"));
        let before = wishlist.items().to_vec();
        drop(wishlist);

        let reloaded = WishlistStore::with_backend(storage);
        assert_eq!(reloaded.items(), before.as_slice());
    }

    #[test]
    fn test_clear_is_persisted() {
        let storage = MemoryStorage::new();
        let mut wishlist = WishlistStore::with_backend(storage.clone());
        wishlist.add_item(item("a"));
        wishlist.clear_wishlist();

        let reloaded = WishlistStore::with_backend(storage);
        assert!(reloaded.is_empty());
    }

    #[test]
    fn test_corrupt_storage_starts_empty() {
        let storage = MemoryStorage::new();
        storage
            .set_item(WISHLIST_STORAGE_KEY, "\u{0}garbage")
            .unwrap();
        let mut wishlist = WishlistStore::with_backend(storage.clone());
        assert!(wishlist.is_empty());

        wishlist.add_item(item("a"));
        let reloaded = WishlistStore::with_backend(storage);
        assert_eq!(reloaded.len(), 1);
    }

    #[test]
    fn test_stored_duplicates_are_collapsed() {
        let storage = MemoryStorage::new();
        let record = serde_json::json!({
            "state": { "items": [item("a"), item("a"), item("b")] },
            "version": 0
        });
        storage
            .set_item(WISHLIST_STORAGE_KEY, &record.to_string())
            .unwrap();

        let wishlist = WishlistStore::with_backend(storage);
        assert_eq!(wishlist.len(), 2);
    }

    #[test]
    fn test_failed_writes_keep_memory_state() {
        let storage = MemoryStorage::with_quota(64);
        let mut wishlist = WishlistStore::with_backend(storage.clone());
        wishlist.add_item(item("a"));
        wishlist.add_item(item("b"));

        assert_eq!(wishlist.len(), 2);
        assert!(wishlist.is_in_wishlist(&ProductId::new("b")));
        assert!(storage.get_item(WISHLIST_STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_listeners_fire_on_changes_only() {
        let counts = Rc::new(RefCell::new(Vec::new()));
        let mut wishlist = WishlistStore::with_backend(MemoryStorage::new());
        let sink = Rc::clone(&counts);
        wishlist.subscribe(move |items| sink.borrow_mut().push(items.len()));

        wishlist.add_item(item("a"));
        wishlist.add_item(item("a"));
        wishlist.toggle_item(item("b"));
        wishlist.remove_item(&ProductId::new("missing"));
        wishlist.toggle_item(item("a"));

        assert_eq!(*counts.borrow(), vec![1, 2, 1]);
    }

    #[test]
    fn test_close_flushes_and_returns_port() {
        let storage = MemoryStorage::new();
        let mut wishlist = WishlistStore::with_backend(storage.clone());
        wishlist.add_item(item("a"));
        let port = wishlist.close();
        assert_eq!(port.key(), WISHLIST_STORAGE_KEY);
        assert!(storage.get_item(WISHLIST_STORAGE_KEY).unwrap().is_some());
    }
}
