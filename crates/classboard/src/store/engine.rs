use super::bus::{Bus, Subscription};
use crate::record::{normalize_loaded, Record};
use crate::storage::StorageBackend;
use log::{debug, warn};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Immutable view of a collection. Shared, never mutated in place.
pub type Snapshot<R> = Rc<Vec<R>>;

/// Where a store's current collection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hydration {
    /// `initialize` has not run. The snapshot is the seed.
    Uninitialized,
    /// No durable storage in this environment. Seed data, never persisted.
    Seed,
    /// Nothing valid was persisted; seed data adopted and written out.
    SeedPersisted,
    /// Valid persisted data adopted.
    Persisted,
}

pub struct Store<R: Record, B: StorageBackend> {
    backend: B,
    key: String,
    seed: Vec<R>,
    current: RefCell<Snapshot<R>>,
    hydration: Cell<Hydration>,
    bus: Bus,
}

impl<R: Record, B: StorageBackend> Store<R, B> {
    /// A store seeded from [`Record::seed`], persisted under [`Record::STORAGE_KEY`].
    pub fn new(backend: B) -> Self {
        Self::with_seed(backend, R::seed())
    }

    pub fn with_seed(backend: B, seed: Vec<R>) -> Self {
        Self {
            backend,
            key: R::STORAGE_KEY.to_string(),
            current: RefCell::new(Rc::new(seed.clone())),
            seed,
            hydration: Cell::new(Hydration::Uninitialized),
            bus: Bus::new(),
        }
    }

    /// Override the storage key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn hydration(&self) -> Hydration {
        self.hydration.get()
    }

    /// Hydrate from durable storage. Runs at most once; later calls are no-ops.
    ///
    /// 1. Storage unavailable → keep seed, never persist.
    /// 2. Valid persisted collection → adopt it.
    /// 3. Otherwise (missing, unreadable, malformed, empty) → keep seed and write it out.
    pub fn initialize(&self) -> Hydration {
        let state = self.hydration.get();
        if state != Hydration::Uninitialized {
            return state;
        }

        let next = if !self.backend.is_available() {
            debug!(
                "event=store_init kind={} key={} source=seed status=detached",
                R::KIND,
                self.key
            );
            Hydration::Seed
        } else if let Some((records, repaired)) = self.load() {
            // Derived ids must survive the next reload.
            let rewritten = repaired && self.persist(&records);
            debug!(
                "event=store_init kind={} key={} source=persisted count={} repaired={} rewritten={}",
                R::KIND,
                self.key,
                records.len(),
                repaired,
                rewritten
            );
            *self.current.borrow_mut() = Rc::new(records);
            Hydration::Persisted
        } else {
            let seed = self.get_snapshot();
            let written = self.persist(&seed);
            debug!(
                "event=store_init kind={} key={} source=seed count={} persisted={}",
                R::KIND,
                self.key,
                seed.len(),
                written
            );
            Hydration::SeedPersisted
        };

        self.hydration.set(next);
        next
    }

    /// Read and normalize the persisted collection.
    ///
    /// The flag is set when normalization changed anything (dropped, deduplicated,
    /// defaulted, or derived an id), i.e. storage no longer matches memory.
    fn load(&self) -> Option<(Vec<R>, bool)> {
        let raw = match self.backend.read(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(
                    "event=store_read kind={} key={} status=error error={}",
                    R::KIND,
                    self.key,
                    err
                );
                return None;
            }
        };

        let value: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(
                    "event=store_decode kind={} key={} status=error error={}",
                    R::KIND,
                    self.key,
                    err
                );
                return None;
            }
        };

        let Some(records) = normalize_loaded::<R>(value.clone()) else {
            warn!(
                "event=store_decode kind={} key={} status=invalid_shape",
                R::KIND,
                self.key
            );
            return None;
        };
        let repaired = !serde_json::to_value(&records).is_ok_and(|clean| clean == value);
        Some((records, repaired))
    }

    /// Best-effort write-through. Failures are logged and swallowed.
    fn persist(&self, records: &[R]) -> bool {
        if !self.backend.is_available() {
            return false;
        }

        let encoded = match serde_json::to_string(records) {
            Ok(encoded) => encoded,
            Err(err) => {
                warn!(
                    "event=store_encode kind={} key={} status=error error={}",
                    R::KIND,
                    self.key,
                    err
                );
                return false;
            }
        };

        match self.backend.write(&self.key, &encoded) {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    "event=store_write kind={} key={} status=error error={}",
                    R::KIND,
                    self.key,
                    err
                );
                false
            }
        }
    }

    /// Register a change listener. The first subscription hydrates the store.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + 'static,
    {
        self.initialize();
        self.bus.register(Rc::new(listener))
    }

    pub fn listener_count(&self) -> usize {
        self.bus.len()
    }

    /// The current collection. The same `Rc` is returned until a mutation happens.
    pub fn get_snapshot(&self) -> Snapshot<R> {
        Rc::clone(&self.current.borrow())
    }

    /// A fresh copy of the seed collection, regardless of storage.
    pub fn get_server_snapshot(&self) -> Snapshot<R> {
        Rc::new(self.seed.clone())
    }

    /// Project the current collection.
    pub fn select<T, F>(&self, selector: F) -> T
    where
        F: FnOnce(&[R]) -> T,
    {
        selector(&self.get_snapshot())
    }

    /// Replace the collection with `updater(current)`, persist it, and notify.
    ///
    /// The updater returns the next collection; returning `Rc::clone(current)`
    /// leaves the snapshot reference unchanged. Listeners are notified either way.
    pub fn mutate<F>(&self, updater: F) -> Snapshot<R>
    where
        F: FnOnce(&Snapshot<R>) -> Snapshot<R>,
    {
        self.initialize();

        let current = self.get_snapshot();
        let next = updater(&current);
        *self.current.borrow_mut() = Rc::clone(&next);

        self.persist(&next);
        self.bus.notify();
        next
    }

    /// Replace the first record matching `predicate` with `update(record)`.
    /// No match, or an update the loader would reject, leaves the collection unchanged.
    pub(crate) fn update_where<P, F>(&self, predicate: P, update: F) -> Snapshot<R>
    where
        P: Fn(&R) -> bool,
        F: FnOnce(&R) -> R,
    {
        self.mutate(|current| {
            let Some(index) = current.iter().position(predicate) else {
                return Rc::clone(current);
            };
            let updated = update(&current[index]);
            if !updated.is_loadable() {
                debug!(
                    "event=store_update kind={} key={} status=rejected",
                    R::KIND,
                    self.key
                );
                return Rc::clone(current);
            }
            let mut next = current.to_vec();
            next[index] = updated;
            Rc::new(next)
        })
    }

    /// Drop every record matching `predicate`.
    /// No match leaves the collection unchanged.
    pub(crate) fn remove_where<P>(&self, predicate: P) -> Snapshot<R>
    where
        P: Fn(&R) -> bool,
    {
        self.mutate(|current| {
            if !current.iter().any(&predicate) {
                return Rc::clone(current);
            }
            Rc::new(current.iter().filter(|r| !predicate(*r)).cloned().collect())
        })
    }
}
