//! Subscriber registry with scoped unsubscription.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, Weak};

/// Callback invoked with the new value after each change.
type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Registered callbacks keyed by subscription id.
struct Registry<T> {
    /// Id handed to the next subscriber.
    next_id: u64,
    /// Live subscribers in registration order.
    entries: Vec<(u64, Callback<T>)>,
}

/// Set of callbacks to notify when a value changes.
///
/// Cloning shares the registry.
pub struct Observers<T> {
    /// Shared registry; `Subscription` guards hold a weak handle to it.
    inner: Arc<Mutex<Registry<T>>>,
}

impl<T> Clone for Observers<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for Observers<T> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Registry {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }
}

impl<T> fmt::Debug for Observers<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("subscribers", &self.len())
            .finish()
    }
}

impl<T> Observers<T> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    /// Whether nobody is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: 'static> Observers<T> {
    /// What: Register `callback`.
    ///
    /// Output:
    /// - Guard that unregisters the callback when dropped.
    ///
    /// Details:
    /// - The guard does not keep the registry alive; dropping it after the
    ///   owning store is gone is a no-op.
    pub fn subscribe(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let id = {
            let mut reg = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            let id = reg.next_id;
            reg.next_id += 1;
            reg.entries.push((id, Arc::new(callback)));
            id
        };
        let weak: Weak<Mutex<Registry<T>>> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .entries
                    .retain(|(entry_id, _)| *entry_id != id);
            }
        })
    }

    /// What: Call every registered callback with `value`.
    ///
    /// Details:
    /// - Callbacks run on the caller's thread, in registration order, after the
    ///   registry lock is released, so a callback may subscribe, unsubscribe or
    ///   read the owning store.
    pub fn notify(&self, value: &T) {
        let callbacks: Vec<Callback<T>> = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();
        for cb in callbacks {
            cb(value);
        }
    }
}

/// Registration handle; dropping it unregisters the callback.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    /// Release action, taken on first use.
    release: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Wrap a release action run exactly once on drop.
    pub fn new(release: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Unregister now. Equivalent to dropping the guard.
    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    /// Run the release action if it has not run yet.
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

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}
