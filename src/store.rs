//! Durable key-value storage, one file per key, string values only.
//!
//! Writes are not transactional: a crash between two related writes can
//! leave an inconsistent pair, which the session restore path recovers
//! from by discarding both entries.

use anyhow::Result;
use std::path::{Path, PathBuf};

pub struct Store {
    dir: PathBuf,
}

impl Store {
    /// Open (creating if needed) the storage directory.
    pub fn open(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    /// Read a value; `None` if the key is absent or unreadable.
    pub fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.key_path(key)).ok()
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        std::fs::write(self.key_path(key), value)?;
        Ok(())
    }

    /// Remove a key. Removing an absent key is not an error.
    pub fn remove(&self, key: &str) -> Result<()> {
        match std::fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// True if the key currently has a value.
    pub fn contains(&self, key: &str) -> bool {
        self.key_path(key).exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();

        assert_eq!(store.get("currentUser"), None);
        store.set("currentUser", "{\"id\":1}").unwrap();
        assert_eq!(store.get("currentUser").as_deref(), Some("{\"id\":1}"));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();

        store.set("isAuthenticated", "true").unwrap();
        store.remove("isAuthenticated").unwrap();
        assert!(!store.contains("isAuthenticated"));
        // Second removal of an absent key succeeds.
        store.remove("isAuthenticated").unwrap();
    }

    #[test]
    fn test_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();

        store.set("k", "a").unwrap();
        store.set("k", "b").unwrap();
        assert_eq!(store.get("k").as_deref(), Some("b"));
    }
}
