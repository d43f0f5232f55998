use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::models::event::StoreEvent;

type Listener = Rc<RefCell<dyn FnMut(&StoreEvent)>>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

impl Registry {
    fn contains(&self, id: u64) -> bool {
        self.listeners.iter().any(|(lid, _)| *lid == id)
    }
}

/// Explicit observer list owned by the store.
///
/// Single-threaded: listeners run synchronously, in subscription order,
/// after the mutation has been fully applied.
#[derive(Default)]
pub struct Notifier {
    registry: Rc<RefCell<Registry>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. It stays registered until the returned handle is
    /// dropped or explicitly unsubscribed.
    #[must_use = "dropping the Subscription unsubscribes the listener immediately"]
    pub fn subscribe(&self, listener: impl FnMut(&StoreEvent) + 'static) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        let listener: Listener = Rc::new(RefCell::new(listener));
        registry.listeners.push((id, listener));

        Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Deliver an event to every listener registered right now.
    ///
    /// A listener removed while the round is in progress is skipped. A
    /// listener that re-enters its own notification round is skipped too.
    pub fn notify(&self, event: &StoreEvent) {
        let round: Vec<(u64, Listener)> = self
            .registry
            .borrow()
            .listeners
            .iter()
            .map(|(id, l)| (*id, Rc::clone(l)))
            .collect();

        for (id, listener) in round {
            if !self.registry.borrow().contains(id) {
                continue;
            }
            if let Ok(mut callback) = listener.try_borrow_mut() {
                (&mut *callback)(event);
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Scoped handle for a registered listener. Once it is dropped or
/// `unsubscribe` is called, the listener receives no further events.
#[derive(Debug)]
#[must_use = "dropping the Subscription unsubscribes the listener immediately"]
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        // Drop does the work.
    }

    /// True while the listener is still registered with a live store.
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .map(|r| r.borrow().contains(self.id))
            .unwrap_or(false)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            if let Ok(mut registry) = registry.try_borrow_mut() {
                registry.listeners.retain(|(id, _)| *id != self.id);
            }
        }
    }
}
