//! Persistent key-value seam.
//!
//! The engine persists each piece of state under its own string key and
//! never performs any other I/O. The browser shell backs this with
//! `localStorage`; tests and the sim harness use [`MemoryStore`].

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Trait for abstracting scoped key-value persistence.
/// Platform-specific implementations should provide this.
///
/// Writes are assumed to be synchronous and durable for the session; a
/// failed backend write degrades persistence, never engine consistency,
/// which is why the methods are infallible.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory store with shared interior state; clones observe each other's
/// writes, so a test can keep a handle while the engine owns its own clone.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Overwrite a raw entry, bypassing the engine. Used by tests to
    /// simulate corrupt persisted state.
    pub fn inject(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}
