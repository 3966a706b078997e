use super::backend::StorageBackend;
use crate::error::{Result, StoreError};

/// Backend for environments without durable storage (server-side rendering).
///
/// Reports itself unavailable; stores backed by it keep seed data and never persist.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedBackend;

impl StorageBackend for DetachedBackend {
    fn read(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn write(&self, _key: &str, _value: &str) -> Result<()> {
        Err(StoreError::Storage(
            "No durable storage in this environment".to_string(),
        ))
    }

    fn is_available(&self) -> bool {
        false
    }
}
