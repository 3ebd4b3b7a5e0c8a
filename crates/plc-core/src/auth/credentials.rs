use std::path::{Path, PathBuf};
use std::sync::Mutex;

use keyring::Entry;
use thiserror::Error;
use tracing::debug;

use crate::config::APP_NAME;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to access credential file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Keychain error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("Credential slot lock poisoned")]
    Poisoned,
}

/// A single persistent string slot holding the session credential.
///
/// Implementations must survive across `SessionManager` instances where the
/// backend allows it. Removing an empty slot is not an error.
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Result<Option<String>, StoreError>;
    fn set(&self, token: &str) -> Result<(), StoreError>;
    fn remove(&self) -> Result<(), StoreError>;
}

/// In-process slot. Lives as long as the value does.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryStore {
    fn get(&self) -> Result<Option<String>, StoreError> {
        Ok(self.slot.lock().map_err(|_| StoreError::Poisoned)?.clone())
    }

    fn set(&self, token: &str) -> Result<(), StoreError> {
        *self.slot.lock().map_err(|_| StoreError::Poisoned)? = Some(token.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<(), StoreError> {
        self.slot.lock().map_err(|_| StoreError::Poisoned)?.take();
        Ok(())
    }
}

/// Slot backed by a single file holding the raw credential.
///
/// Reads return the file contents verbatim, except that one trailing line
/// ending (`\n` or `\r\n`) is dropped so hand-written files work. An empty
/// file reads as an empty slot.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Slot file `<dir>/<key>`.
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(key),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl TokenStore for FileStore {
    fn get(&self) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents
                    .strip_suffix('\n')
                    .map(|rest| rest.strip_suffix('\r').unwrap_or(rest))
                    .unwrap_or(contents.as_str());
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn set(&self, token: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        std::fs::write(&self.path, token).map_err(|e| self.io_error(e))?;
        debug!(path = %self.path.display(), "Stored credential");
        Ok(())
    }

    fn remove(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "Removed credential");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

/// Slot backed by the OS keychain, one entry per storage key.
pub struct KeyringStore {
    key: String,
}

impl KeyringStore {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
        }
    }

    fn entry(&self) -> Result<Entry, StoreError> {
        Ok(Entry::new(APP_NAME, &self.key)?)
    }
}

impl TokenStore for KeyringStore {
    fn get(&self) -> Result<Option<String>, StoreError> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, token: &str) -> Result<(), StoreError> {
        self.entry()?.set_password(token)?;
        Ok(())
    }

    fn remove(&self) -> Result<(), StoreError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_lifecycle() {
        let store = MemoryStore::new();
        assert_eq!(store.get().unwrap(), None);

        store.set("first").unwrap();
        store.set("second").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("second"));

        store.remove().unwrap();
        assert_eq!(store.get().unwrap(), None);
        // Removing again is a no-op
        store.remove().unwrap();
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"), "plcJwt");
        assert_eq!(store.get().unwrap(), None);

        store.set("abc.def.ghi").unwrap();
        assert_eq!(store.path(), dir.path().join("nested").join("plcJwt"));

        let reopened = FileStore::new(dir.path().join("nested"), "plcJwt");
        assert_eq!(reopened.get().unwrap().as_deref(), Some("abc.def.ghi"));

        reopened.remove().unwrap();
        assert_eq!(store.get().unwrap(), None);
        store.remove().unwrap();
    }

    #[test]
    fn test_file_store_blank_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("plcJwt"), "\n").unwrap();
        let store = FileStore::new(dir.path(), "plcJwt");
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn test_file_store_keeps_raw_contents() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path(), "plcJwt");

        std::fs::write(store.path(), " a.b.c \t").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some(" a.b.c \t"));

        // Only a single trailing line ending is dropped
        std::fs::write(store.path(), "a.b.c\n").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("a.b.c"));
        std::fs::write(store.path(), "a.b.c\r\n").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("a.b.c"));
        std::fs::write(store.path(), "a.b.c\n\n").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("a.b.c\n"));
    }

    #[test]
    fn test_file_store_round_trips_set_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path(), "plcJwt");
        store.set("  padded token ").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("  padded token "));
    }

    #[test]
    fn test_file_store_read_error_surfaces() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the slot file should be
        std::fs::create_dir(dir.path().join("plcJwt")).unwrap();
        let store = FileStore::new(dir.path(), "plcJwt");
        assert!(matches!(store.get(), Err(StoreError::Io { .. })));
    }
}
