//! # classboard
//!
//! Client-side data layer of the classboard admin dashboard: three reactive
//! record stores (task assignments, registered exams, per-student exam results)
//! that hold state in memory, persist it to local key/value storage, and notify
//! UI subscribers of every change.
//!
//! ## Architecture
//!
//! ```text
//! AppStores ──owns──► Store<TaskRecord, B>
//!                     Store<RegisteredExam, B>      ──► StorageBackend (fs / memory / detached)
//!                     Store<StudentExamResult, B>
//!                          │
//!                          └── Bus ──► listeners / StoreBinding (selector projections)
//! ```
//!
//! - [`record`]: The `Record` trait and defensive load normalization.
//! - [`model`]: The three record families.
//! - [`seed`]: Deterministic initial data.
//! - [`id`]: Derived record ids.
//! - [`storage`]: Durable key/value backends.
//! - [`store`]: The generic store engine, notification bus, and selector bindings.
//! - [`context`]: The application root owning all stores.
//! - [`config`]: Layered configuration.

pub mod config;
pub mod context;
pub mod error;
pub mod id;
pub mod model;
pub mod record;
pub mod seed;
pub mod storage;
pub mod store;

pub use config::StoreConfig;
pub use context::{AppStores, HydrationReport};
pub use error::{Result, StoreError};
pub use record::{normalize_loaded, Record};
pub use store::{Hydration, Snapshot, Store, StoreBinding, Subscription};
