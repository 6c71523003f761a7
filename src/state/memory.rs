//! Single-owner in-memory state
//!
//! `MemoryState` keeps every key in an ordered map so snapshots and listings
//! are deterministic. It counts the writes it has applied, which lets callers
//! check how many mutations an operation performed.

use super::{StateAccessor, StateError};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryState {
    entries: BTreeMap<String, Vec<u8>>,
    writes: u64,
}

impl MemoryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a state from existing entries without counting them as writes
    pub fn from_entries(entries: impl IntoIterator<Item = (String, Vec<u8>)>) -> Self {
        MemoryState {
            entries: entries.into_iter().collect(),
            writes: 0,
        }
    }

    /// Number of puts and deletes applied so far
    pub fn write_count(&self) -> u64 {
        self.writes
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries in key order
    pub fn entries(&self) -> impl Iterator<Item = (&String, &Vec<u8>)> {
        self.entries.iter()
    }

    pub fn into_entries(self) -> BTreeMap<String, Vec<u8>> {
        self.entries
    }

    /// Load a JSON snapshot (object of key to UTF-8 value)
    pub fn load_snapshot(path: &Path) -> Result<Self, StateError> {
        let content = fs::read_to_string(path).map_err(|e| {
            StateError::snapshot(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        let entries: BTreeMap<String, String> = serde_json::from_str(&content).map_err(|e| {
            StateError::snapshot(format!("Failed to parse '{}': {}", path.display(), e))
        })?;

        Ok(Self::from_entries(
            entries.into_iter().map(|(k, v)| (k, v.into_bytes())),
        ))
    }

    /// Write all entries as a JSON snapshot
    ///
    /// Values must be valid UTF-8; every value the ledger writes is.
    pub fn save_snapshot(&self, path: &Path) -> Result<(), StateError> {
        let mut entries = BTreeMap::new();
        for (key, value) in &self.entries {
            let text = std::str::from_utf8(value).map_err(|e| {
                StateError::snapshot(format!("Value under '{key}' is not UTF-8: {e}"))
            })?;
            entries.insert(key.as_str(), text);
        }

        let json = serde_json::to_string_pretty(&entries)
            .map_err(|e| StateError::snapshot(format!("Failed to encode snapshot: {e}")))?;
        fs::write(path, json).map_err(|e| {
            StateError::snapshot(format!("Failed to write '{}': {}", path.display(), e))
        })
    }
}

impl StateAccessor for MemoryState {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StateError> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<(), StateError> {
        self.entries.insert(key.to_string(), value);
        self.writes += 1;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StateError> {
        self.entries.remove(key);
        self.writes += 1;
        Ok(())
    }

    // Inserting into the map cannot fail, so the batch lands as a whole.
    fn put_batch(&mut self, writes: Vec<(String, Vec<u8>)>) -> Result<(), StateError> {
        self.writes += writes.len() as u64;
        self.entries.extend(writes);
        Ok(())
    }
}
