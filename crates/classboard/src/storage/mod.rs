//! # Durable Storage
//!
//! Key/value persistence underneath the record stores, standing in for browser
//! local storage. The [`backend::StorageBackend`] trait is the only seam the
//! stores touch.
//!
//! ## Contract
//!
//! - One dedicated key per store; the value is the JSON encoding of the full collection.
//! - No schema version tag is written. Compatibility is handled by shape
//!   validation at load time (see [`crate::record`]).
//! - Storage is read once, at hydration, and written through after every mutation.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: One JSON file per key, atomic writes.
//! - [`mem_backend::MemBackend`]: In-memory map with failure simulation, for tests and embedding.
//! - [`detached::DetachedBackend`]: No storage at all (server render). Never read or written.
//!
//! ## Storage Layout
//!
//! ```text
//! <storage_dir>/
//! ├── classboard.tasks.json
//! ├── classboard.exams.json
//! └── classboard.exam-results.json
//! ```

pub mod backend;
pub mod detached;
pub mod fs_backend;
pub mod mem_backend;

pub use backend::StorageBackend;
pub use detached::DetachedBackend;
pub use fs_backend::FsBackend;
pub use mem_backend::MemBackend;
