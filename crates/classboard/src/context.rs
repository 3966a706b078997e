//! # Application Context
//!
//! [`AppStores`] is the explicit root that owns the three record stores. Build it
//! once at application start and hand references (or the `Rc` store handles)
//! to whatever needs them; there is no process-global store state.
//!
//! All three stores share one storage backend instance.
//!
//! ## Constructors
//!
//! - [`AppStores::new`]: Any backend, default keys.
//! - [`AppStores::with_config`]: Any backend, keys from [`StoreConfig`].
//! - [`AppStores::open`]: File backend at the configured storage directory.
//! - [`AppStores::server`]: Detached backend. Seed data only, nothing persisted.
//!
//! Hydration is explicit: call [`AppStores::initialize`] before the first read
//! that should see persisted data.

use crate::config::StoreConfig;
use crate::error::Result;
use crate::model::{RegisteredExam, StudentExamResult, TaskRecord};
use crate::storage::{DetachedBackend, FsBackend, StorageBackend};
use crate::store::{Hydration, Store};
use log::info;
use std::rc::Rc;

/// Hydration outcome of each store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HydrationReport {
    pub tasks: Hydration,
    pub exams: Hydration,
    pub results: Hydration,
}

pub struct AppStores<B: StorageBackend> {
    pub tasks: Rc<Store<TaskRecord, Rc<B>>>,
    pub exams: Rc<Store<RegisteredExam, Rc<B>>>,
    pub results: Rc<Store<StudentExamResult, Rc<B>>>,
    backend: Rc<B>,
}

impl<B: StorageBackend> AppStores<B> {
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, &StoreConfig::default())
    }

    pub fn with_config(backend: B, config: &StoreConfig) -> Self {
        let backend = Rc::new(backend);
        Self {
            tasks: Rc::new(Store::new(Rc::clone(&backend)).with_key(config.task_key.clone())),
            exams: Rc::new(Store::new(Rc::clone(&backend)).with_key(config.exam_key.clone())),
            results: Rc::new(
                Store::new(Rc::clone(&backend)).with_key(config.result_key.clone()),
            ),
            backend,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Hydrate all three stores. Safe to call repeatedly.
    pub fn initialize(&self) -> HydrationReport {
        let report = HydrationReport {
            tasks: self.tasks.initialize(),
            exams: self.exams.initialize(),
            results: self.results.initialize(),
        };
        info!(
            "event=stores_init tasks={:?} exams={:?} results={:?}",
            report.tasks, report.exams, report.results
        );
        report
    }
}

impl AppStores<FsBackend> {
    /// File-backed stores at the configured storage directory.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let root = config.storage_dir()?;
        info!("event=stores_open storage_dir={}", root.display());
        Ok(Self::with_config(FsBackend::new(root), config))
    }
}

impl AppStores<DetachedBackend> {
    /// Stores for rendering without durable storage.
    pub fn server() -> Self {
        Self::new(DetachedBackend)
    }
}
