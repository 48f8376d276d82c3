//! In-session shopping cart.
//!
//! The cart lives in memory only and is gone when the session ends. Lines are
//! keyed by product ID: adding a product that is already in the cart bumps its
//! quantity and leaves the stored name, price and image untouched.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::store::{Listeners, SubscriptionId};
use crate::types::ProductId;

/// Product details supplied when adding to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCartItem {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub image: String,
}

/// One line of the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    /// Always at least 1.
    pub quantity: u32,
    pub image: String,
}

impl CartLineItem {
    /// Price times quantity, saturating at the `Decimal` bounds.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }
}

impl From<NewCartItem> for CartLineItem {
    fn from(item: NewCartItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            price: item.price,
            quantity: 1,
            image: item.image,
        }
    }
}

/// Owner of the cart's line items.
#[derive(Debug, Default)]
pub struct CartStore {
    items: Vec<CartLineItem>,
    listeners: Listeners<CartLineItem>,
}

impl CartStore {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of `item`.
    ///
    /// An existing line keeps its original name, price and image; only its
    /// quantity changes.
    pub fn add_item(&mut self, item: NewCartItem) {
        if let Some(line) = self.items.iter_mut().find(|line| line.id == item.id) {
            line.quantity = line.quantity.saturating_add(1);
            debug!(product_id = %line.id, quantity = line.quantity, "Cart quantity incremented");
        } else {
            debug!(product_id = %item.id, "Cart line added");
            self.items.push(CartLineItem::from(item));
        }
        self.changed();
    }

    /// Remove the line for `id`. Absent IDs are ignored.
    pub fn remove_item(&mut self, id: &ProductId) {
        let before = self.items.len();
        self.items.retain(|line| &line.id != id);
        if self.items.len() != before {
            debug!(product_id = %id, "Cart line removed");
            self.changed();
        }
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) {
        self.items.clear();
        self.changed();
    }

    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|line| &line.id == id)
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |acc, line| acc.saturating_add(line.quantity))
    }

    /// Sum of line totals. No tax, shipping or discounts.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items
            .iter()
            .map(CartLineItem::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Run `listener` with the full line list after every change.
    pub fn subscribe(&mut self, listener: impl FnMut(&[CartLineItem]) + 'static) -> SubscriptionId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Drop all listeners and hand back the final lines.
    pub fn close(mut self) -> Vec<CartLineItem> {
        self.listeners.clear();
        self.items
    }

    fn changed(&mut self) {
        self.listeners.notify(&self.items);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn product(id: &str, price: i64) -> NewCartItem {
        NewCartItem {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Decimal::from(price),
            image: format!("https://cdn.example.com/{id}.png"),
        }
    }

    #[test]
    fn test_add_same_item_twice_increments_quantity() {
        let mut cart = CartStore::new();
        cart.add_item(product("p1", 100));
        cart.add_item(product("p1", 100));

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.get(&ProductId::new("p1")).map(|l| l.quantity), Some(2));
    }

    #[test]
    fn test_repeat_add_keeps_first_details() {
        let mut cart = CartStore::new();
        cart.add_item(product("p1", 100));
        let mut changed = product("p1", 250);
        changed.name = "Renamed".to_string();
        cart.add_item(changed);

        let line = cart.get(&ProductId::new("p1")).cloned();
        let line = line.unwrap_or_else(|| panic!("line missing"));
        assert_eq!(line.price, Decimal::from(100));
        assert_eq!(line.name, "Product p1");
        assert_eq!(line.quantity, 2);
    }

    #[test]
    fn test_remove_then_empty() {
        let mut cart = CartStore::new();
        cart.add_item(product("p1", 100));
        cart.add_item(product("p1", 100));
        cart.remove_item(&ProductId::new("p1"));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = CartStore::new();
        cart.add_item(product("p1", 100));
        cart.remove_item(&ProductId::new("nope"));
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_add_after_clear_starts_fresh() {
        let mut cart = CartStore::new();
        cart.add_item(product("p1", 100));
        cart.add_item(product("p1", 100));
        cart.clear_cart();
        cart.add_item(product("p1", 100));
        assert_eq!(cart.get(&ProductId::new("p1")).map(|l| l.quantity), Some(1));
    }

    #[test]
    fn test_subtotal_and_count() {
        let mut cart = CartStore::new();
        for _ in 0..3 {
            cart.add_item(product("p1", 100));
        }
        cart.add_item(product("p2", 49));

        assert_eq!(cart.subtotal(), Decimal::from(349));
        assert_eq!(cart.item_count(), 4);
        assert_eq!(cart.items().first().map(CartLineItem::line_total), Some(Decimal::from(300)));
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let mut cart = CartStore::new();
        cart.add_item(product("b", 1));
        cart.add_item(product("a", 1));
        cart.add_item(product("b", 1));
        let ids: Vec<&str> = cart.items().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_listeners_see_state_synchronously() {
        let snapshots = Rc::new(RefCell::new(Vec::new()));
        let mut cart = CartStore::new();
        let sink = Rc::clone(&snapshots);
        let id = cart.subscribe(move |items| {
            let count: u32 = items.iter().map(|l| l.quantity).sum();
            sink.borrow_mut().push(count);
        });

        cart.add_item(product("p1", 100));
        cart.add_item(product("p1", 100));
        cart.remove_item(&ProductId::new("missing"));
        cart.clear_cart();
        assert_eq!(*snapshots.borrow(), vec![1, 2, 0]);

        assert!(cart.unsubscribe(id));
        cart.add_item(product("p1", 100));
        assert_eq!(snapshots.borrow().len(), 3);
    }

    #[test]
    fn test_totals_saturate_instead_of_overflowing() {
        let mut cart = CartStore::new();
        for _ in 0..3 {
            cart.add_item(NewCartItem {
                price: Decimal::MAX,
                ..product("p1", 0)
            });
        }
        cart.add_item(NewCartItem {
            price: Decimal::MAX,
            ..product("p2", 0)
        });

        let line = cart.get(&ProductId::new("p1")).unwrap();
        assert_eq!(line.line_total(), Decimal::MAX);
        assert_eq!(cart.subtotal(), Decimal::MAX);
    }
}
