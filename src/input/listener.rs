//! Key listener registry with scoped removal
//!
//! [`Document`] stands in for the page's global event target: listeners are
//! registered per event kind and phase, and every registration made by a
//! binding is owned by a [`Subscription`] that removes exactly those
//! listeners when unbound or dropped.

use super::event::{KeyEvent, KeyEventKind};
use log::{trace, warn};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Identifier of one registered listener
pub type ListenerId = u64;

type Callback = Rc<RefCell<dyn FnMut(&KeyEvent)>>;

struct Listener {
    id: ListenerId,
    kind: KeyEventKind,
    capture: bool,
    callback: Callback,
}

#[derive(Default)]
struct Registry {
    next_id: ListenerId,
    listeners: Vec<Listener>,
}

impl Registry {
    fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }
}

/// Ordered set of key listeners
///
/// Cloning yields another handle to the same registry.
#[derive(Clone, Default)]
pub struct Document {
    registry: Rc<RefCell<Registry>>,
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for events of `kind`
    ///
    /// Capture listeners run before bubble listeners; within a phase,
    /// listeners run in registration order.
    pub fn add_listener<F>(&self, kind: KeyEventKind, capture: bool, callback: F) -> ListenerId
    where
        F: FnMut(&KeyEvent) + 'static,
    {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push(Listener {
            id,
            kind,
            capture,
            callback: Rc::new(RefCell::new(callback)),
        });
        trace!("Added {:?} listener {} (capture: {})", kind, id, capture);
        id
    }

    /// Remove one listener; returns false if it was already gone
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.registry.borrow_mut().remove(id)
    }

    /// Wrap listener ids in a guard that removes them on unbind or drop
    pub fn subscription(&self, ids: Vec<ListenerId>) -> Subscription {
        Subscription {
            groups: vec![Registration {
                registry: Rc::downgrade(&self.registry),
                ids,
            }],
        }
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }

    /// Deliver an event to the listeners registered for its kind
    ///
    /// Listeners added or removed while dispatching only see the next
    /// event. Returns whether any listener called `prevent_default`.
    pub fn dispatch(&self, event: &KeyEvent) -> bool {
        let mut callbacks: Vec<Callback> = Vec::new();
        {
            let registry = self.registry.borrow();
            for capture in [true, false] {
                callbacks.extend(
                    registry
                        .listeners
                        .iter()
                        .filter(|l| l.kind == event.kind && l.capture == capture)
                        .map(|l| l.callback.clone()),
                );
            }
        }

        for callback in callbacks {
            if event.propagation_stopped() {
                break;
            }
            match callback.try_borrow_mut() {
                Ok(mut callback) => (*callback)(event),
                Err(_) => warn!("Skipping listener re-entered during dispatch of {:?}", event.key),
            }
        }

        event.default_prevented()
    }
}

/// Listener ids owned on one document
struct Registration {
    registry: Weak<RefCell<Registry>>,
    ids: Vec<ListenerId>,
}

/// Listeners installed by one binding
///
/// `unbind` is idempotent and also runs on drop, so every registration is
/// removed exactly once. Ids are only meaningful within their own document,
/// so each group of ids keeps a handle to the registry that issued it.
#[must_use = "dropping a Subscription unbinds its listeners"]
pub struct Subscription {
    groups: Vec<Registration>,
}

impl Subscription {
    /// Combine two subscriptions into one guard
    ///
    /// The subscriptions may come from different documents.
    pub fn merge(mut self, mut other: Subscription) -> Subscription {
        for group in std::mem::take(&mut other.groups) {
            match self
                .groups
                .iter_mut()
                .find(|g| Weak::ptr_eq(&g.registry, &group.registry))
            {
                Some(existing) => existing.ids.extend(group.ids),
                None => self.groups.push(group),
            }
        }
        self
    }

    /// Remove the listeners this subscription added
    pub fn unbind(&mut self) {
        for group in std::mem::take(&mut self.groups) {
            if let Some(registry) = group.registry.upgrade() {
                let mut registry = registry.borrow_mut();
                for id in group.ids {
                    registry.remove(id);
                }
            }
        }
    }

    /// Keep the listeners installed for the rest of the document's life
    pub fn detach(mut self) {
        self.groups.clear();
    }

    /// Whether any listener is still owned
    pub fn is_bound(&self) -> bool {
        self.groups.iter().any(|g| !g.ids.is_empty())
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unbind();
    }
}
