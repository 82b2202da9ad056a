//! Driven port for keyed string storage.
//!
//! The browser-profile analogue: the auth token lives in a persistent store,
//! status overrides in a session-scoped one. Both services receive the store
//! as `Arc<dyn KeyValueStore>`, so tests inject the in-memory adapter while
//! the binary wires the file-backed one.

/// Synchronous keyed string storage.
///
/// Writes fully replace the stored value (read-modify-write, not a delta).
/// Under concurrent writers the last write wins; callers accept this, it is
/// the documented behaviour of the original storage layer.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    /// Returns [`KeyValueStoreError`] when the backing storage cannot be
    /// read.
    fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns [`KeyValueStoreError`] when the backing storage cannot be
    /// written.
    fn put(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError>;

    /// Remove the entry under `key`; removing an absent key succeeds.
    ///
    /// # Errors
    /// Returns [`KeyValueStoreError`] when the backing storage cannot be
    /// written.
    fn remove(&self, key: &str) -> Result<(), KeyValueStoreError>;
}

/// Failures reported by [`KeyValueStore`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyValueStoreError {
    /// The backing storage could not be accessed.
    #[error("storage backend failed: {message}")]
    Backend {
        /// Adapter-specific failure description.
        message: String,
    },
    /// The key cannot be represented by the backing storage.
    #[error("invalid storage key: {message}")]
    InvalidKey {
        /// Why the key was rejected.
        message: String,
    },
}

impl KeyValueStoreError {
    /// Construct a [`KeyValueStoreError::Backend`] error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// Construct a [`KeyValueStoreError::InvalidKey`] error.
    pub fn invalid_key(message: impl Into<String>) -> Self {
        Self::InvalidKey {
            message: message.into(),
        }
    }
}
