//! # Reactive Record Stores
//!
//! One generic engine, [`Store<R, B>`], holds a record collection in memory,
//! mirrors every change to durable storage, and notifies subscribers. It is
//! instantiated three times: [`TaskStore`], [`ExamStore`], [`ResultStore`].
//!
//! ## Data Flow
//!
//! ```text
//! UI mutation ─► Store::mutate(updater) ─► new Rc<Vec<R>> ─► storage write ─► Bus::notify
//!                                                                               │
//!                 UI re-render ◄── StoreBinding recompute ◄── get_snapshot ◄───┘
//! ```
//!
//! ## Hydration
//!
//! ```text
//! Uninitialized ──initialize()──┬─► Seed           (no durable storage)
//!                               ├─► Persisted      (valid data adopted)
//!                               └─► SeedPersisted  (seed written out)
//! ```
//!
//! `initialize` runs at most once per store and there is no way back to
//! `Uninitialized`. It is called explicitly by [`crate::AppStores::initialize`],
//! and implicitly by the first `subscribe` or `mutate`.
//!
//! ## Snapshots
//!
//! - [`Store::get_snapshot`] returns the same `Rc` until a mutation replaces it.
//!   Consumers compare with `Rc::ptr_eq` to detect "no change".
//! - [`Store::get_server_snapshot`] always returns a fresh copy of the seed, so the
//!   first render is identical whether or not storage is reachable.
//!
//! ## Failure Policy
//!
//! No store operation returns an error:
//! - **Read/decode failure, invalid shape**: fall back to seed, rewrite storage.
//! - **Write failure**: logged; memory stays authoritative for the session.
//! - **Unknown id**: the mutation is a no-op and returns the prior snapshot.
//!
//! ## Threading
//!
//! Stores are single-threaded (`Rc`, `RefCell`). Every operation runs to
//! completion; listeners are called synchronously after each mutation.

pub mod bus;
pub mod engine;
pub mod exams;
pub mod results;
pub mod selector;
pub mod tasks;

pub use bus::{Listener, Subscription};
pub use engine::{Hydration, Snapshot, Store};
pub use exams::ExamStore;
pub use results::ResultStore;
pub use selector::StoreBinding;
pub use tasks::TaskStore;
