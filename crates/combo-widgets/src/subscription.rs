#![forbid(unsafe_code)]

//! Document-level pointer subscriptions.
//!
//! A combobox only learns about clicks elsewhere on the page if it holds a
//! [`DocumentSubscription`]. The host owns one [`DocumentListeners`]
//! registry and forwards every page-level pointer event to the ids returned
//! by [`DocumentListeners::subscribers`]. Dropping the guard unregisters it,
//! so an unmounted widget can never be called back.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Identity of one live subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl SubscriberId {
    /// Raw value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    live: Vec<(SubscriberId, String)>,
}

/// Page-wide listener registry (single-threaded).
#[derive(Debug, Clone, Default)]
pub struct DocumentListeners {
    inner: Rc<RefCell<Registry>>,
}

impl DocumentListeners {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `owner` for page-level pointer events.
    pub fn subscribe(&self, owner: impl Into<String>) -> DocumentSubscription {
        let owner = owner.into();
        let mut registry = self.inner.borrow_mut();
        let id = SubscriberId(registry.next_id);
        registry.next_id += 1;
        combo_core::debug!(%id, owner = owner.as_str(), "document listener added");
        registry.live.push((id, owner));
        DocumentSubscription {
            id,
            registry: Rc::downgrade(&self.inner),
        }
    }

    /// Live subscriber ids, in registration order.
    pub fn subscribers(&self) -> Vec<SubscriberId> {
        self.inner.borrow().live.iter().map(|(id, _)| *id).collect()
    }

    /// Owner label of a live subscriber.
    pub fn owner(&self, id: SubscriberId) -> Option<String> {
        self.inner
            .borrow()
            .live
            .iter()
            .find(|(live, _)| *live == id)
            .map(|(_, owner)| owner.clone())
    }

    /// Number of live subscriptions.
    pub fn len(&self) -> usize {
        self.inner.borrow().live.len()
    }

    /// True when nothing is subscribed.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().live.is_empty()
    }
}

/// RAII guard for one registration.
#[derive(Debug)]
pub struct DocumentSubscription {
    id: SubscriberId,
    registry: Weak<RefCell<Registry>>,
}

impl DocumentSubscription {
    /// Id under which this guard is registered.
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// True while the registry is alive and still lists this guard.
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.borrow().live.iter().any(|(id, _)| *id == self.id))
    }
}

impl Drop for DocumentSubscription {
    fn drop(&mut self) {
        // Registry borrows never outlive a method call, so this cannot clash.
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().live.retain(|(id, _)| *id != self.id);
            combo_core::debug!(id = %self.id, "document listener removed");
        }
    }
}
