use std::collections::HashMap;
use std::sync::RwLock;

use pantry_types::Produce;

use crate::error::{StoreError, StoreResult};
use crate::traits::ProduceStore;

/// In-memory, HashMap-based produce store.
///
/// The whole map sits behind a single multi-reader/single-writer lock:
/// writes are uncoordinated and each holds the lock only for one map
/// operation, so finer-grained (per-key) locking would buy nothing. Records
/// are cloned on the way out so callers never alias the guarded state.
pub struct InMemoryProduceStore {
    items: RwLock<HashMap<String, Produce>>,
}

impl InMemoryProduceStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
        }
    }

    /// Number of records currently stored.
    pub fn len(&self) -> usize {
        self.items.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.items.read().expect("lock poisoned").is_empty()
    }
}

impl Default for InMemoryProduceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProduceStore for InMemoryProduceStore {
    fn add(&self, item: Produce) -> StoreResult<()> {
        let mut map = self.items.write().expect("lock poisoned");
        if map.contains_key(&item.code) {
            return Err(StoreError::AlreadyExists(item.code));
        }
        map.insert(item.code.clone(), item);
        Ok(())
    }

    fn delete(&self, code: &str) -> StoreResult<()> {
        let mut map = self.items.write().expect("lock poisoned");
        match map.remove(code) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(code.to_owned())),
        }
    }

    fn list_all(&self) -> StoreResult<Vec<Produce>> {
        let map = self.items.read().expect("lock poisoned");
        Ok(map.values().cloned().collect())
    }

    fn clear(&self) -> StoreResult<()> {
        self.items.write().expect("lock poisoned").clear();
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryProduceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryProduceStore")
            .field("record_count", &self.len())
            .finish()
    }
}
