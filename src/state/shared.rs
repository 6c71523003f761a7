//! Thread-safe state handle for parallel invocation processing
//!
//! `SharedState` wraps a `DashMap` in an `Arc`, so cloning the handle is cheap
//! and every clone sees the same entries. Fine-grained sharding lets tasks that
//! touch different keys proceed without a global lock.
//!
//! # Thread Safety
//!
//! Individual gets, puts and deletes are atomic. A sequence of them is not:
//! callers must keep invocations with overlapping keys on the same task (see
//! `core::batch_processor`).

use super::{MemoryState, StateAccessor, StateError};
use dashmap::DashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct SharedState {
    entries: Arc<DashMap<String, Vec<u8>>>,
}

impl SharedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy the current entries into a `MemoryState`
    ///
    /// The copy is a snapshot; later writes through any handle are not
    /// reflected in it.
    pub fn to_memory(&self) -> MemoryState {
        MemoryState::from_entries(
            self.entries
                .iter()
                .map(|entry| (entry.key().clone(), entry.value().clone())),
        )
    }
}

impl From<MemoryState> for SharedState {
    fn from(state: MemoryState) -> Self {
        let entries = DashMap::new();
        for (key, value) in state.into_entries() {
            entries.insert(key, value);
        }
        SharedState {
            entries: Arc::new(entries),
        }
    }
}

impl StateAccessor for SharedState {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StateError> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<(), StateError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StateError> {
        self.entries.remove(key);
        Ok(())
    }

    /// Insert every write in one pass
    ///
    /// Inserts cannot fail, so the batch never lands partially. Readers on
    /// other clones may observe it mid-way; the batch processor keeps groups
    /// that share a key on one task.
    fn put_batch(&mut self, writes: Vec<(String, Vec<u8>)>) -> Result<(), StateError> {
        for (key, value) in writes {
            self.entries.insert(key, value);
        }
        Ok(())
    }
}
