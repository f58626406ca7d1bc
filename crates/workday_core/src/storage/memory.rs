//! Process-local store with no persistence.
//!
//! Used for ephemeral sessions and tests; writes can be made to fail on
//! demand to exercise write-through error handling.

use super::{Collection, DocumentStore, StoreError, StoreResult};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RefCell<BTreeMap<Collection, String>>,
    fail_writes: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// When enabled, `save` and `remove` return `StoreError::Unavailable`.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    pub fn len(&self) -> usize {
        self.documents.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.borrow().is_empty()
    }

    fn check_writable(&self) -> StoreResult<()> {
        if self.fail_writes.get() {
            return Err(StoreError::Unavailable(
                "memory store is rejecting writes".to_string(),
            ));
        }
        Ok(())
    }
}

impl DocumentStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn load(&self, collection: Collection) -> StoreResult<Option<String>> {
        Ok(self.documents.borrow().get(&collection).cloned())
    }

    fn save(&self, collection: Collection, json: &str) -> StoreResult<()> {
        self.check_writable()?;
        self.documents
            .borrow_mut()
            .insert(collection, json.to_string());
        Ok(())
    }

    fn remove(&self, collection: Collection) -> StoreResult<()> {
        self.check_writable()?;
        self.documents.borrow_mut().remove(&collection);
        Ok(())
    }
}
