//! Synchronous change notification.
//!
//! Observers receive a payload-free "changed" signal together with a shared
//! reference to the notifying value, and re-pull whatever they need from it.
//! Each registration returns a [`Subscription`] that unregisters on drop.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

/// Identifier of a registered observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

type Observer<T> = Rc<dyn Fn(&T)>;

struct Registry<T: ?Sized> {
    next_id: u64,
    observers: BTreeMap<SubscriptionId, Observer<T>>,
}

/// Multicast registry of observers.
pub struct Notifier<T: ?Sized> {
    registry: Rc<RefCell<Registry<T>>>,
}

impl<T: ?Sized + 'static> Notifier<T> {
    /// Create an empty notifier.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 0,
                observers: BTreeMap::new(),
            })),
        }
    }

    /// Register an observer.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&T) + 'static,
    {
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = SubscriptionId(registry.next_id);
            registry.next_id += 1;
            registry.observers.insert(id, Rc::new(observer));
            id
        };
        tracing::debug!("Subscription {} added", id);

        let weak: Weak<RefCell<Registry<T>>> = Rc::downgrade(&self.registry);
        Subscription {
            id,
            disposer: Some(Box::new(move || {
                if let Some(registry) = weak.upgrade() {
                    if let Ok(mut registry) = registry.try_borrow_mut() {
                        if registry.observers.remove(&id).is_some() {
                            tracing::debug!("Subscription {} removed", id);
                        }
                    }
                }
            })),
        }
    }

    /// Call every observer in registration order.
    ///
    /// Observers may drop their own or other subscriptions while being
    /// notified; an observer removed mid-round is not called.
    pub fn notify(&self, value: &T) {
        let snapshot: Vec<(SubscriptionId, Observer<T>)> = self
            .registry
            .borrow()
            .observers
            .iter()
            .map(|(id, observer)| (*id, Rc::clone(observer)))
            .collect();

        for (id, observer) in snapshot {
            let live = self.registry.borrow().observers.contains_key(&id);
            if live {
                observer(value);
            }
        }
    }

    /// Unregister every observer. Outstanding handles become inert.
    pub fn clear(&self) {
        let count = {
            let mut registry = self.registry.borrow_mut();
            let count = registry.observers.len();
            registry.observers.clear();
            count
        };
        if count > 0 {
            tracing::debug!("Cleared {} subscriptions", count);
        }
    }

    /// Number of registered observers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.registry.borrow().observers.len()
    }
}

impl<T: ?Sized + 'static> Default for Notifier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for Notifier<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("subscribers", &self.registry.borrow().observers.len())
            .finish()
    }
}

/// Disposer handle for a registered observer.
///
/// Dropping the handle unregisters the observer.
#[must_use = "dropping a Subscription unregisters the observer immediately"]
pub struct Subscription {
    id: SubscriptionId,
    disposer: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// The observer's id.
    #[must_use]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Unregister the observer now.
    pub fn unsubscribe(mut self) {
        self.dispose();
    }

    fn dispose(&mut self) {
        if let Some(disposer) = self.disposer.take() {
            disposer();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
