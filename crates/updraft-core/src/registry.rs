use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A subscriber callback. Identity is the `Arc` allocation: clones of the
/// same `Arc` are the same listener.
pub type Listener<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Set of listeners for one event channel.
pub struct ListenerRegistry<E> {
    listeners: Mutex<Vec<Listener<E>>>,
}

impl<E> Default for ListenerRegistry<E> {
    fn default() -> Self {
        Self {
            listeners: Mutex::new(Vec::new()),
        }
    }
}

impl<E> ListenerRegistry<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Listener<E>>> {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns `false` when the listener was already registered.
    pub fn add(&self, listener: &Listener<E>) -> bool {
        let mut listeners = self.lock();
        if listeners.iter().any(|l| same_listener(l, listener)) {
            return false;
        }
        listeners.push(Arc::clone(listener));
        true
    }

    /// Returns `false` when the listener was not registered.
    pub fn remove(&self, listener: &Listener<E>) -> bool {
        let mut listeners = self.lock();
        let before = listeners.len();
        listeners.retain(|l| !same_listener(l, listener));
        listeners.len() != before
    }

    #[must_use]
    pub fn contains(&self, listener: &Listener<E>) -> bool {
        self.lock().iter().any(|l| same_listener(l, listener))
    }

    #[must_use]
    pub fn has_any(&self) -> bool {
        !self.lock().is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.has_any()
    }

    /// Deliver `event` to every listener registered when delivery starts.
    ///
    /// Callbacks run outside the lock, so they may add or remove listeners
    /// (themselves included); such changes apply from the next event.
    pub fn emit(&self, event: &E) -> usize {
        let snapshot: Vec<Listener<E>> = self.lock().clone();
        for listener in &snapshot {
            listener(event);
        }
        snapshot.len()
    }
}

fn same_listener<E>(a: &Listener<E>, b: &Listener<E>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counting_listener() -> (Listener<u32>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let listener: Listener<u32> = Arc::new(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        (listener, calls)
    }

    #[test]
    fn double_add_is_idempotent() {
        let registry = ListenerRegistry::new();
        let (listener, calls) = counting_listener();

        assert!(registry.add(&listener));
        assert!(!registry.add(&Arc::clone(&listener)));
        assert_eq!(registry.len(), 1);

        assert_eq!(registry.emit(&1), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn remove_after_double_add_stops_delivery() {
        let registry = ListenerRegistry::new();
        let (listener, calls) = counting_listener();
        registry.add(&listener);
        registry.add(&listener);

        assert!(registry.remove(&listener));
        assert!(!registry.contains(&listener));
        assert!(registry.is_empty());

        registry.emit(&7);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!registry.remove(&listener));
    }

    #[test]
    fn identical_closures_are_distinct_listeners() {
        let registry = ListenerRegistry::new();
        let (first, first_calls) = counting_listener();
        let (second, second_calls) = counting_listener();
        registry.add(&first);
        registry.add(&second);

        registry.emit(&3);

        assert_eq!(registry.len(), 2);
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn listener_can_remove_itself_during_delivery() {
        let registry: Arc<ListenerRegistry<u32>> = Arc::new(ListenerRegistry::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let slot: Arc<Mutex<Option<Listener<u32>>>> = Arc::new(Mutex::new(None));

        let listener: Listener<u32> = {
            let registry = Arc::clone(&registry);
            let calls = Arc::clone(&calls);
            let slot = Arc::clone(&slot);
            Arc::new(move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                if let Some(me) = slot.lock().expect("slot lock").take() {
                    registry.remove(&me);
                }
            })
        };
        *slot.lock().expect("slot lock") = Some(Arc::clone(&listener));
        registry.add(&listener);

        registry.emit(&1);
        registry.emit(&2);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(registry.is_empty());
    }
}
