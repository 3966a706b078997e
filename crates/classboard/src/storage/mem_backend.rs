use super::backend::StorageBackend;
use crate::error::{Result, StoreError};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// In-memory storage backend.
///
/// Uses `RefCell` for interior mutability since the store layer is single-threaded.
/// This avoids the overhead of `RwLock` while still allowing the
/// `StorageBackend` trait to use `&self` for all methods.
#[derive(Default)]
pub struct MemBackend {
    entries: RefCell<HashMap<String, String>>,
    simulate_read_error: Cell<bool>,
    simulate_write_error: Cell<bool>,
    writes: Cell<usize>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a key, bypassing failure simulation.
    pub fn with_entry(self, key: &str, value: &str) -> Self {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self
    }

    /// Enable read error simulation (disabled or inaccessible storage).
    pub fn set_simulate_read_error(&self, simulate: bool) {
        self.simulate_read_error.set(simulate);
    }

    /// Enable write error simulation (quota exceeded).
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Number of successful writes since construction.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    /// Raw value under `key`, ignoring failure simulation.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl StorageBackend for MemBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        if self.simulate_read_error.get() {
            return Err(StoreError::Storage("Simulated read error".to_string()));
        }
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(StoreError::Storage("Simulated write error".to_string()));
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_missing_key_is_none() {
        let backend = MemBackend::new();
        assert_eq!(backend.read("nope").unwrap(), None);
    }

    #[test]
    fn test_write_then_read() {
        let backend = MemBackend::new();
        backend.write("k", "[1,2]").unwrap();
        assert_eq!(backend.read("k").unwrap().as_deref(), Some("[1,2]"));
        assert_eq!(backend.write_count(), 1);
    }

    #[test]
    fn test_simulated_write_error_keeps_previous_value() {
        let backend = MemBackend::new().with_entry("k", "old");
        backend.set_simulate_write_error(true);

        assert!(backend.write("k", "new").is_err());
        assert_eq!(backend.peek("k").as_deref(), Some("old"));
        assert_eq!(backend.write_count(), 0);
    }

    #[test]
    fn test_simulated_read_error() {
        let backend = MemBackend::new().with_entry("k", "v");
        backend.set_simulate_read_error(true);
        assert!(backend.read("k").is_err());
    }
}
