//! Session-scoped status override store.
//!
//! Status "changes" never touch the fetched records; they are a keyed map of
//! user id to status layered on top during view derivation. The map lives in
//! a session-scoped [`KeyValueStore`] under one fixed key and is rewritten
//! whole on every change, so concurrent writers resolve as last-write-wins.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use crate::domain::error::Error;
use crate::domain::ports::KeyValueStore;
use crate::domain::user::UserStatus;

/// Storage key holding the serialized override map.
pub const STATUS_OVERRIDES_KEY: &str = "lendsqr_user_status_overrides";

/// Keyed status overrides atop the fetched user list.
#[derive(Clone)]
pub struct StatusOverrideStore {
    store: Arc<dyn KeyValueStore>,
}

impl StatusOverrideStore {
    /// Build an override store over the given session-scoped backing.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Read the full override map.
    ///
    /// Absent or corrupt storage yields an empty map; corruption is logged
    /// and otherwise treated as if nothing were stored.
    #[must_use]
    pub fn overrides(&self) -> HashMap<String, UserStatus> {
        let raw = match self.store.get(STATUS_OVERRIDES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return HashMap::new(),
            Err(err) => {
                warn!(error = %err, "status override storage unreadable; treating as empty");
                return HashMap::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(overrides) => overrides,
            Err(err) => {
                warn!(error = %err, "status override map corrupt; treating as empty");
                HashMap::new()
            }
        }
    }

    /// Set or replace the override for `user_id`.
    ///
    /// # Errors
    /// Returns [`Error`] when the backing storage rejects the write.
    pub fn set_status(&self, user_id: &str, status: UserStatus) -> Result<(), Error> {
        let mut overrides = self.overrides();
        overrides.insert(user_id.to_owned(), status);
        self.write(&overrides)
    }

    /// Read the override for `user_id`, if any.
    #[must_use]
    pub fn status(&self, user_id: &str) -> Option<UserStatus> {
        self.overrides().get(user_id).copied()
    }

    /// Remove the override for `user_id`; removing an absent entry succeeds.
    ///
    /// # Errors
    /// Returns [`Error`] when the backing storage rejects the write.
    pub fn clear_status(&self, user_id: &str) -> Result<(), Error> {
        let mut overrides = self.overrides();
        overrides.remove(user_id);
        self.write(&overrides)
    }

    /// Drop the entire override map.
    ///
    /// # Errors
    /// Returns [`Error`] when the backing storage rejects the removal.
    pub fn clear_all(&self) -> Result<(), Error> {
        self.store
            .remove(STATUS_OVERRIDES_KEY)
            .map_err(|err| Error::internal(format!("failed to clear status overrides: {err}")))
    }

    fn write(&self, overrides: &HashMap<String, UserStatus>) -> Result<(), Error> {
        let raw = serde_json::to_string(overrides)
            .map_err(|err| Error::internal(format!("failed to serialize overrides: {err}")))?;
        self.store
            .put(STATUS_OVERRIDES_KEY, &raw)
            .map_err(|err| Error::internal(format!("failed to persist overrides: {err}")))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for override layering and corruption recovery.

    use super::*;
    use crate::outbound::storage::MemoryStore;

    fn store() -> (Arc<MemoryStore>, StatusOverrideStore) {
        let backing = Arc::new(MemoryStore::new());
        let overrides = StatusOverrideStore::new(backing.clone());
        (backing, overrides)
    }

    #[test]
    fn set_then_get_round_trips_and_leaves_other_ids_untouched() {
        let (_, overrides) = store();
        overrides
            .set_status("USR001", UserStatus::Blacklisted)
            .expect("write succeeds");

        assert_eq!(overrides.status("USR001"), Some(UserStatus::Blacklisted));
        assert_eq!(overrides.status("USR002"), None);
    }

    #[test]
    fn overwriting_replaces_the_previous_override() {
        let (_, overrides) = store();
        overrides
            .set_status("USR001", UserStatus::Blacklisted)
            .expect("first write");
        overrides
            .set_status("USR001", UserStatus::Active)
            .expect("second write");

        assert_eq!(overrides.status("USR001"), Some(UserStatus::Active));
        assert_eq!(overrides.overrides().len(), 1);
    }

    #[test]
    fn clear_status_removes_one_entry() {
        let (_, overrides) = store();
        overrides
            .set_status("USR001", UserStatus::Blacklisted)
            .expect("write one");
        overrides
            .set_status("USR002", UserStatus::Pending)
            .expect("write two");

        overrides.clear_status("USR001").expect("clear succeeds");
        let map = overrides.overrides();
        assert!(!map.contains_key("USR001"));
        assert_eq!(map.get("USR002"), Some(&UserStatus::Pending));
    }

    #[test]
    fn clear_all_empties_the_map() {
        let (_, overrides) = store();
        overrides
            .set_status("USR001", UserStatus::Inactive)
            .expect("write");
        overrides.clear_all().expect("clear succeeds");
        assert!(overrides.overrides().is_empty());
    }

    #[test]
    fn corrupt_storage_reads_as_empty() {
        let (backing, overrides) = store();
        backing
            .put(STATUS_OVERRIDES_KEY, "{not json")
            .expect("raw write");

        assert!(overrides.overrides().is_empty());
        assert_eq!(overrides.status("USR001"), None);
    }

    #[test]
    fn writes_survive_corrupt_previous_state() {
        let (backing, overrides) = store();
        backing
            .put(STATUS_OVERRIDES_KEY, "[1, 2, 3]")
            .expect("raw write");

        overrides
            .set_status("USR001", UserStatus::Pending)
            .expect("write replaces corrupt state");
        assert_eq!(overrides.status("USR001"), Some(UserStatus::Pending));
    }
}
