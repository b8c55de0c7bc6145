//! Observer primitive used by the stateful controllers to notify UI
//! bindings of state changes.
//!
//! Broadcasts carry no payload: observers re-read state through the
//! subject's own accessors. There is no queuing or replay; only the
//! observers registered at broadcast time are invoked.

use std::sync::{Arc, Mutex};

/// Receives change notifications from a [`Subject`].
pub trait Observer: Send + Sync {
    fn update(&self);
}

/// One-to-many synchronous broadcast, in registration order.
#[derive(Default)]
pub struct Subject {
    observers: Mutex<Vec<Arc<dyn Observer>>>,
}

impl Subject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer; re-adding the same observer is a no-op.
    pub fn add_observer(&self, observer: Arc<dyn Observer>) {
        let mut observers = self.observers.lock().unwrap();
        if !observers.iter().any(|existing| Arc::ptr_eq(existing, &observer)) {
            observers.push(observer);
        }
    }

    pub fn remove_observer(&self, observer: &Arc<dyn Observer>) {
        self.observers
            .lock()
            .unwrap()
            .retain(|existing| !Arc::ptr_eq(existing, observer));
    }

    /// Synchronously invoke every registered observer.
    pub fn broadcast(&self) {
        let observers = self.observers.lock().unwrap().clone();
        for observer in observers {
            observer.update();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Counter {
        updates: AtomicU32,
    }

    impl Counter {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                updates: AtomicU32::new(0),
            })
        }

        fn count(&self) -> u32 {
            self.updates.load(Ordering::SeqCst)
        }
    }

    impl Observer for Counter {
        fn update(&self) {
            self.updates.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_broadcast_reaches_all_observers() {
        let subject = Subject::new();
        let first = Counter::new();
        let second = Counter::new();

        subject.add_observer(first.clone());
        subject.add_observer(second.clone());
        subject.broadcast();

        assert_eq!(first.count(), 1);
        assert_eq!(second.count(), 1);
    }

    #[test]
    fn test_add_observer_is_idempotent() {
        let subject = Subject::new();
        let observer = Counter::new();

        subject.add_observer(observer.clone());
        subject.add_observer(observer.clone());
        subject.broadcast();

        assert_eq!(observer.count(), 1);
    }

    #[test]
    fn test_removed_observer_is_not_notified() {
        let subject = Subject::new();
        let observer = Counter::new();

        subject.add_observer(observer.clone());
        subject.broadcast();

        let handle: Arc<dyn Observer> = observer.clone();
        subject.remove_observer(&handle);
        subject.broadcast();

        assert_eq!(observer.count(), 1);
    }
}
