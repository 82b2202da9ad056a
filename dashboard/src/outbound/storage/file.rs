//! File-backed persistent store.

use std::io::ErrorKind;
use std::path::PathBuf;

use crate::domain::ports::{KeyValueStore, KeyValueStoreError};

/// One-file-per-key storage under a directory; the local-storage analogue.
///
/// Writes replace the file wholesale with no cross-process coordination, so
/// concurrent writers resolve as last-write-wins, matching the storage model
/// the services are written against.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    ///
    /// # Errors
    /// Returns [`KeyValueStoreError`] when the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, KeyValueStoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|err| {
            KeyValueStoreError::backend(format!(
                "failed to create storage directory {}: {err}",
                dir.display()
            ))
        })?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, KeyValueStoreError> {
        if key.is_empty()
            || key
                .chars()
                .any(|c| std::path::is_separator(c) || c == '\0' || c == '.')
        {
            return Err(KeyValueStoreError::invalid_key(format!(
                "key {key:?} is not a plain file name"
            )));
        }
        Ok(self.dir.join(key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(KeyValueStoreError::backend(format!(
                "failed to read {}: {err}",
                path.display()
            ))),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError> {
        let path = self.path_for(key)?;
        std::fs::write(&path, value).map_err(|err| {
            KeyValueStoreError::backend(format!("failed to write {}: {err}", path.display()))
        })
    }

    fn remove(&self, key: &str) -> Result<(), KeyValueStoreError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(KeyValueStoreError::backend(format!(
                "failed to remove {}: {err}",
                path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the file-backed adapter.

    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    fn store() -> (TempDir, FileStore) {
        let dir = TempDir::new().expect("temp dir");
        let store = FileStore::new(dir.path()).expect("store opens");
        (dir, store)
    }

    #[test]
    fn round_trips_values_across_instances() {
        let (dir, store) = store();
        store.put("lendsqr_auth_token", "abc123").expect("put succeeds");

        // A second instance over the same directory sees the value.
        let reopened = FileStore::new(dir.path()).expect("store reopens");
        assert_eq!(
            reopened
                .get("lendsqr_auth_token")
                .expect("get succeeds")
                .as_deref(),
            Some("abc123")
        );
    }

    #[test]
    fn absent_keys_read_as_none_and_remove_is_idempotent() {
        let (_dir, store) = store();
        assert_eq!(store.get("missing").expect("get succeeds"), None);
        store.remove("missing").expect("remove succeeds");
    }

    #[test]
    fn remove_deletes_the_backing_file() {
        let (_dir, store) = store();
        store.put("key", "value").expect("put succeeds");
        store.remove("key").expect("remove succeeds");
        assert_eq!(store.get("key").expect("get succeeds"), None);
    }

    #[rstest]
    #[case::empty("")]
    #[case::separator("a/b")]
    #[case::dotted("..")]
    fn rejects_keys_that_are_not_plain_file_names(#[case] key: &str) {
        let (_dir, store) = store();
        let err = store.get(key).expect_err("key must be rejected");
        assert!(matches!(err, KeyValueStoreError::InvalidKey { .. }));
    }
}
