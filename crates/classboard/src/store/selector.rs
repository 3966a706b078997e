use super::bus::Subscription;
use super::engine::{Snapshot, Store};
use crate::record::Record;
use crate::storage::StorageBackend;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

type Selector<R, T> = Box<dyn Fn(&Snapshot<R>) -> T>;

struct BindingState<R, T> {
    selector: RefCell<Selector<R, T>>,
    value: RefCell<T>,
    version: Cell<u64>,
    on_change: RefCell<Option<Rc<dyn Fn()>>>,
}

impl<R, T> BindingState<R, T> {
    fn recompute(&self, snapshot: &Snapshot<R>) {
        let value = (self.selector.borrow())(snapshot);
        *self.value.borrow_mut() = value;
        self.version.set(self.version.get() + 1);

        let callback = self.on_change.borrow().clone();
        if let Some(callback) = callback {
            callback();
        }
    }
}

/// A UI-side view of a store projected through a selector.
///
/// The projection is recomputed on every store notification. Equal-by-value
/// projections are not deduplicated; only the underlying snapshot reference is
/// stable. Dropping the binding unsubscribes it.
pub struct StoreBinding<R: Record, B: StorageBackend + 'static, T: 'static> {
    store: Weak<Store<R, B>>,
    state: Rc<BindingState<R, T>>,
    subscription: Option<Subscription>,
}

impl<R: Record, B: StorageBackend + 'static, T: Clone + 'static> StoreBinding<R, B, T> {
    /// Bind to `store` through `selector`. Hydrates the store if needed.
    pub fn new<F>(store: &Rc<Store<R, B>>, selector: F) -> Self
    where
        F: Fn(&Snapshot<R>) -> T + 'static,
    {
        store.initialize();
        let initial = selector(&store.get_snapshot());
        let state = Rc::new(BindingState {
            selector: RefCell::new(Box::new(selector) as Selector<R, T>),
            value: RefCell::new(initial),
            version: Cell::new(0),
            on_change: RefCell::new(None),
        });

        let weak_store = Rc::downgrade(store);
        let weak_state = Rc::downgrade(&state);
        let subscription = store.subscribe(move || {
            if let (Some(store), Some(state)) = (weak_store.upgrade(), weak_state.upgrade()) {
                state.recompute(&store.get_snapshot());
            }
        });

        Self {
            store: Rc::downgrade(store),
            state,
            subscription: Some(subscription),
        }
    }

    /// The current projected value.
    pub fn get(&self) -> T {
        self.state.value.borrow().clone()
    }

    /// Borrow the current projected value.
    pub fn with<U>(&self, f: impl FnOnce(&T) -> U) -> U {
        f(&self.state.value.borrow())
    }

    /// Swap the selector and recompute immediately.
    pub fn set_selector<F>(&self, selector: F)
    where
        F: Fn(&Snapshot<R>) -> T + 'static,
    {
        *self.state.selector.borrow_mut() = Box::new(selector);
        if let Some(store) = self.store.upgrade() {
            self.state.recompute(&store.get_snapshot());
        }
    }

    /// Called after every recomputation (the re-render hook).
    pub fn on_change<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        *self.state.on_change.borrow_mut() = Some(Rc::new(callback));
    }

    /// Number of recomputations since the binding was created.
    pub fn version(&self) -> u64 {
        self.state.version.get()
    }
}

impl<R: Record, B: StorageBackend + 'static> StoreBinding<R, B, Snapshot<R>> {
    /// Bind to the whole collection.
    pub fn identity(store: &Rc<Store<R, B>>) -> Self {
        Self::new(store, |snapshot: &Snapshot<R>| Rc::clone(snapshot))
    }
}

impl<R: Record, B: StorageBackend + 'static, T: 'static> Drop for StoreBinding<R, B, T> {
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskRecord;
    use crate::storage::MemBackend;

    fn store() -> Rc<Store<TaskRecord, MemBackend>> {
        Rc::new(Store::new(MemBackend::new()))
    }

    #[test]
    fn test_identity_binding_tracks_snapshot_reference() {
        let store = store();
        let binding = StoreBinding::identity(&store);

        assert!(Rc::ptr_eq(&binding.get(), &store.get_snapshot()));

        store.mutate(|current| Rc::new(current[1..].to_vec()));
        assert!(Rc::ptr_eq(&binding.get(), &store.get_snapshot()));
        assert_eq!(binding.version(), 1);
    }

    #[test]
    fn test_projection_recomputes_on_notify() {
        let store = store();
        let id = store.get_snapshot()[0].id.clone();
        let target = id.clone();
        let binding = StoreBinding::new(&store, move |tasks: &Snapshot<TaskRecord>| {
            tasks.iter().find(|t| t.id == target).map(|t| t.progress)
        });

        assert_eq!(binding.get(), Some(store.get_snapshot()[0].progress));
        store.mark_task_complete(&id);
        assert_eq!(binding.get(), Some(100));
        store.remove_task(&id);
        assert_eq!(binding.get(), None);
    }

    #[test]
    fn test_set_selector_recomputes_without_resubscribing() {
        let store = store();
        let binding = StoreBinding::new(&store, |tasks: &Snapshot<TaskRecord>| tasks.len());
        let listeners = store.listener_count();

        binding.set_selector(|tasks: &Snapshot<TaskRecord>| tasks.len() * 10);
        assert_eq!(binding.get(), store.get_snapshot().len() * 10);
        assert_eq!(store.listener_count(), listeners);

        store.mutate(|_| Rc::new(Vec::new()));
        assert_eq!(binding.get(), 0);
    }

    #[test]
    fn test_on_change_fires_after_recompute() {
        let store = store();
        let binding = Rc::new(StoreBinding::new(&store, |tasks: &Snapshot<TaskRecord>| {
            tasks.len()
        }));
        let seen = Rc::new(Cell::new(usize::MAX));

        let weak = Rc::downgrade(&binding);
        let inner = Rc::clone(&seen);
        binding.on_change(move || {
            if let Some(binding) = weak.upgrade() {
                inner.set(binding.get());
            }
        });

        store.mutate(|current| Rc::new(current[..1].to_vec()));
        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let store = store();
        let binding = StoreBinding::identity(&store);
        assert_eq!(store.listener_count(), 1);
        drop(binding);
        assert_eq!(store.listener_count(), 0);
    }

    #[test]
    fn test_binding_survives_store_drop() {
        let store = store();
        let binding = StoreBinding::new(&store, |tasks: &Snapshot<TaskRecord>| tasks.len());
        let len = binding.get();
        drop(store);
        binding.set_selector(|_: &Snapshot<TaskRecord>| 0);
        assert_eq!(binding.get(), len);
    }
}
