use crate::error::Result;
use std::rc::Rc;

/// Abstract interface for durable key/value storage.
/// This trait handles the "how" of persistence (filesystem vs memory),
/// while `Store` handles the "what" (hydration, normalization, notification).
///
/// Every store owns exactly one key; the value is the JSON encoding of the
/// whole collection.
pub trait StorageBackend {
    /// Read the raw value stored under `key`.
    /// Returns Ok(None) if nothing has been written yet.
    /// Returns Err only on actual access errors (permissions, disabled storage).
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`.
    /// MUST be atomic: a failed write leaves the previous value intact.
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Whether durable storage is reachable at all.
    /// A store backed by an unavailable backend never reads or writes it.
    fn is_available(&self) -> bool;
}

// Lets the three stores of one application share a single storage instance.
impl<B: StorageBackend + ?Sized> StorageBackend for Rc<B> {
    fn read(&self, key: &str) -> Result<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        (**self).write(key, value)
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }
}
