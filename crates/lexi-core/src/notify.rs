use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};

type Callback = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
struct Registry {
    next_id: u64,
    callbacks: BTreeMap<SubscriptionId, Callback>,
}

/// Change listeners of a store
#[derive(Clone, Default)]
pub(crate) struct Subscribers {
    registry: Arc<Mutex<Registry>>,
}

impl Subscribers {
    pub fn subscribe(&self, callback: impl Fn() + Send + Sync + 'static) -> Subscription {
        let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        let id = SubscriptionId(registry.next_id);
        registry.next_id += 1;
        registry.callbacks.insert(id, Arc::new(callback));

        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    pub fn remove(&self, id: SubscriptionId) -> bool {
        remove(&self.registry, id)
    }

    pub fn len(&self) -> usize {
        let registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        registry.callbacks.len()
    }

    /// Call every listener once. The lock is released first so a callback
    /// may unsubscribe itself.
    pub fn notify(&self) {
        let callbacks: Vec<Callback> = {
            let registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
            registry.callbacks.values().cloned().collect()
        };

        for callback in callbacks {
            callback();
        }
    }
}

fn remove(registry: &Mutex<Registry>, id: SubscriptionId) -> bool {
    let mut registry = registry.lock().unwrap_or_else(PoisonError::into_inner);
    registry.callbacks.remove(&id).is_some()
}

/// Handle returned by `subscribe`. Dropping it keeps the listener alive,
/// call [`Subscription::unsubscribe`] to detach.
pub struct Subscription {
    id: SubscriptionId,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Returns false if the listener was already gone or the store dropped
    pub fn unsubscribe(self) -> bool {
        match self.registry.upgrade() {
            Some(registry) => remove(&registry, self.id),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_notify_reaches_every_listener() {
        let subscribers = Subscribers::default();
        let hits = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let hits = hits.clone();
            subscribers.subscribe(move || {
                hits.fetch_add(1, Ordering::SeqCst);
            });
        }

        subscribers.notify();
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_unsubscribe_detaches() {
        let subscribers = Subscribers::default();
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = hits.clone();
        let subscription = subscribers.subscribe(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        subscribers.notify();
        assert!(subscription.unsubscribe());
        subscribers.notify();

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(subscribers.len(), 0);
    }

    #[test]
    fn test_unsubscribe_after_registry_dropped() {
        let subscribers = Subscribers::default();
        let subscription = subscribers.subscribe(|| {});
        drop(subscribers);

        assert!(!subscription.unsubscribe());
    }

    #[test]
    fn test_callback_can_remove_itself() {
        let subscribers = Subscribers::default();
        let inner = subscribers.clone();
        let own_id = Arc::new(Mutex::new(None::<SubscriptionId>));

        let slot = own_id.clone();
        let subscription = subscribers.subscribe(move || {
            if let Some(id) = *slot.lock().unwrap() {
                inner.remove(id);
            }
        });
        *own_id.lock().unwrap() = Some(subscription.id());

        subscribers.notify();
        assert_eq!(subscribers.len(), 0);
    }
}
