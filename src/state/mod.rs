//! State access module
//!
//! The ledger logic never owns durable bytes. It reaches the key/value store of
//! record only through the [`StateAccessor`] trait, which mirrors the narrow
//! get/put/delete interface a hosting runtime provides.
//!
//! # Implementations
//!
//! - [`MemoryState`] - single-owner ordered map with JSON snapshots
//! - [`SharedState`] - cloneable handle over a concurrent map, used by the
//!   async host to run non-conflicting invocations in parallel
//!
//! # Consistency
//!
//! Implementations must offer read-your-writes within one invocation. Nothing
//! here serializes invocations against each other; callers that share a store
//! must keep invocations with overlapping keys from interleaving.

pub mod memory;
pub mod shared;

pub use memory::MemoryState;
pub use shared::SharedState;

use thiserror::Error;

/// Failure reported by a state accessor
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StateError {
    /// The backend rejected a read, write or delete
    #[error("state backend failed for key '{key}': {message}")]
    Backend { key: String, message: String },

    /// A snapshot could not be read, parsed or written
    #[error("snapshot error: {message}")]
    Snapshot { message: String },
}

impl StateError {
    pub fn backend(key: &str, message: impl ToString) -> Self {
        StateError::Backend {
            key: key.to_string(),
            message: message.to_string(),
        }
    }

    pub fn snapshot(message: impl ToString) -> Self {
        StateError::Snapshot {
            message: message.to_string(),
        }
    }
}

/// Key/value access used by the ledger logic
pub trait StateAccessor {
    /// Read the value stored under `key`, `None` when the key is absent
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StateError>;

    /// Store `value` under `key`, replacing any previous value
    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<(), StateError>;

    /// Remove `key`; removing an absent key succeeds
    fn delete(&mut self, key: &str) -> Result<(), StateError>;

    /// Store several values in order
    ///
    /// The default applies the writes one by one and stops at the first
    /// failure, so earlier writes stay applied. Implementations that can commit
    /// all writes together should override it.
    fn put_batch(&mut self, writes: Vec<(String, Vec<u8>)>) -> Result<(), StateError> {
        for (key, value) in writes {
            self.put(&key, value)?;
        }
        Ok(())
    }
}

impl<S: StateAccessor + ?Sized> StateAccessor for &mut S {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StateError> {
        (**self).get(key)
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<(), StateError> {
        (**self).put(key, value)
    }

    fn delete(&mut self, key: &str) -> Result<(), StateError> {
        (**self).delete(key)
    }

    fn put_batch(&mut self, writes: Vec<(String, Vec<u8>)>) -> Result<(), StateError> {
        (**self).put_batch(writes)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! State doubles for exercising failure paths

    use super::{MemoryState, StateAccessor, StateError};

    /// Memory state whose n-th put (1-based) and every delete can be made to fail
    ///
    /// Uses the default, non-atomic `put_batch`.
    #[derive(Debug, Default)]
    pub struct FlakyState {
        pub inner: MemoryState,
        pub fail_put_at: Option<usize>,
        pub fail_deletes: bool,
        pub fail_gets: bool,
        pub puts: usize,
    }

    impl StateAccessor for FlakyState {
        fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StateError> {
            if self.fail_gets {
                return Err(StateError::backend(key, "read unavailable"));
            }
            self.inner.get(key)
        }

        fn put(&mut self, key: &str, value: Vec<u8>) -> Result<(), StateError> {
            self.puts += 1;
            if self.fail_put_at == Some(self.puts) {
                return Err(StateError::backend(key, "write rejected"));
            }
            self.inner.put(key, value)
        }

        fn delete(&mut self, key: &str) -> Result<(), StateError> {
            if self.fail_deletes {
                return Err(StateError::backend(key, "delete rejected"));
            }
            self.inner.delete(key)
        }
    }
}
