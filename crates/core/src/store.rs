//! Change listeners shared by the cart and wishlist stores.
//!
//! Stores call [`Listeners::notify`] after every state change, before the
//! mutating method returns, so subscribers always see the current collection.

use core::fmt;

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<T> = Box<dyn FnMut(&[T])>;

/// Registry of change callbacks over a collection of `T`.
pub struct Listeners<T> {
    next_id: u64,
    entries: Vec<(SubscriptionId, Listener<T>)>,
}

impl<T> Listeners<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    /// Register `listener`; it runs after every subsequent change.
    pub fn subscribe(&mut self, listener: impl FnMut(&[T]) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    /// Run every listener against `items`, in subscription order.
    pub fn notify(&mut self, items: &[T]) {
        for (_, listener) in &mut self.entries {
            listener(items);
        }
    }

    /// Drop all listeners.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for Listeners<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Listeners<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_notify_reaches_every_subscriber() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = Listeners::<u32>::new();

        let first = Rc::clone(&seen);
        listeners.subscribe(move |items| first.borrow_mut().push(("a", items.len())));
        let second = Rc::clone(&seen);
        listeners.subscribe(move |items| second.borrow_mut().push(("b", items.len())));

        listeners.notify(&[1, 2, 3]);
        assert_eq!(*seen.borrow(), vec![("a", 3), ("b", 3)]);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let count = Rc::new(RefCell::new(0));
        let mut listeners = Listeners::<u32>::new();
        let counter = Rc::clone(&count);
        let id = listeners.subscribe(move |_| *counter.borrow_mut() += 1);

        listeners.notify(&[]);
        assert!(listeners.unsubscribe(id));
        assert!(!listeners.unsubscribe(id));
        listeners.notify(&[]);

        assert_eq!(*count.borrow(), 1);
        assert!(listeners.is_empty());
    }
}
