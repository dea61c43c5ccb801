use super::StorageBackend;
use crate::error::{BarcodezError, Result};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// In-memory storage backend for testing.
///
/// Interior mutability keeps the `&self` signatures of [`StorageBackend`];
/// barcodez is single-threaded so `RefCell` is enough.
#[derive(Default)]
pub struct MemBackend {
    entries: RefCell<HashMap<String, Value>>,
    simulate_write_error: Cell<bool>,
    simulate_read_error: Cell<bool>,
    writes: Cell<usize>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    pub fn set_simulate_read_error(&self, simulate: bool) {
        self.simulate_read_error.set(simulate);
    }

    /// Number of successful `set` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl StorageBackend for MemBackend {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        if self.simulate_read_error.get() {
            return Err(BarcodezError::Store("Simulated read error".to_string()));
        }
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &Value) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(BarcodezError::Store("Simulated write error".to_string()));
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.clone());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
