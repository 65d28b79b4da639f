//! Change Listeners
//!
//! Single-threaded callback registry used for provider auth events,
//! session state and list state. Dropping the returned [`Subscription`]
//! removes the callback.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Callback<T> = Rc<dyn Fn(&T)>;

struct Registry<T: ?Sized> {
    next_id: u64,
    entries: Vec<(u64, Callback<T>)>,
}

/// A set of callbacks notified with `&T`
pub struct Listeners<T: ?Sized> {
    inner: Rc<RefCell<Registry<T>>>,
}

impl<T: ?Sized + 'static> Listeners<T> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Registry {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Register a callback; it stays registered until the subscription is dropped
    pub fn add(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let id = {
            let mut registry = self.inner.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.entries.push((id, Rc::new(callback)));
            id
        };
        let weak: Weak<RefCell<Registry<T>>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().entries.retain(|(entry_id, _)| *entry_id != id);
            }
        })
    }

    /// Call every registered callback.
    ///
    /// Callbacks run outside the registry borrow, so they may subscribe or
    /// unsubscribe while being notified.
    pub fn notify(&self, value: &T) {
        let callbacks: Vec<Callback<T>> = self
            .inner
            .borrow()
            .entries
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();
        for callback in callbacks {
            callback(value);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: ?Sized + 'static> Default for Listeners<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Clone for Listeners<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

/// Handle for a registered callback
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Remove the callback now
    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}
