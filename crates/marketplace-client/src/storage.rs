//! Persisted key-value session store.
//!
//! Values are stored as JSON text under a fixed set of keys. There is no
//! schema version; a value that no longer parses is treated as absent.

use crate::error::ClientError;
use parking_lot::RwLock;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const SESSION_FILE: &str = "session.json";
const APP_DIR: &str = "marketplace";

/// Keys the client persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// Bearer access token
    Token,
    /// Refresh token
    RefreshToken,
    /// Serialized current user
    User,
    /// UI theme
    Theme,
    /// User settings
    Settings,
    /// Stripe onboarding alert dismissed
    StripeAlertDismissed,
}

impl StorageKey {
    /// Every key, in a stable order.
    pub const ALL: [Self; 6] = [
        Self::Token,
        Self::RefreshToken,
        Self::User,
        Self::Theme,
        Self::Settings,
        Self::StripeAlertDismissed,
    ];

    /// Name the value is stored under.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Token => "token",
            Self::RefreshToken => "refreshToken",
            Self::User => "user",
            Self::Theme => "theme",
            Self::Settings => "settings",
            Self::StripeAlertDismissed => "stripe-alert-dismissed",
        }
    }
}

/// Raw string store. Implementations must be cheap to call from async code.
pub trait SessionStore: Send + Sync {
    /// Raw JSON text stored under `key`.
    fn get_raw(&self, key: StorageKey) -> Option<String>;

    /// Replace the JSON text under `key`.
    fn set_raw(&self, key: StorageKey, value: String) -> Result<(), ClientError>;

    /// Delete `key`.
    fn remove(&self, key: StorageKey) -> Result<(), ClientError>;

    /// Delete every key.
    fn clear(&self) -> Result<(), ClientError>;
}

impl dyn SessionStore {
    /// Typed read. Unparseable values are logged and reported as absent.
    pub fn get<T: DeserializeOwned>(&self, key: StorageKey) -> Option<T> {
        let raw = self.get_raw(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Ignoring unreadable stored value for '{}': {}", key.as_str(), e);
                None
            }
        }
    }

    /// Typed write.
    pub fn set<T: Serialize + ?Sized>(
        &self,
        key: StorageKey,
        value: &T,
    ) -> Result<(), ClientError> {
        let raw = serde_json::to_string(value)
            .map_err(|e| ClientError::Storage(format!("serialize '{}': {}", key.as_str(), e)))?;
        self.set_raw(key, raw)
    }

    /// Whether `key` holds any value.
    pub fn contains(&self, key: StorageKey) -> bool {
        self.get_raw(key).is_some()
    }
}

/// Ephemeral store, for tests and one-shot tools.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<BTreeMap<&'static str, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get_raw(&self, key: StorageKey) -> Option<String> {
        self.values.read().get(key.as_str()).cloned()
    }

    fn set_raw(&self, key: StorageKey, value: String) -> Result<(), ClientError> {
        self.values.write().insert(key.as_str(), value);
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> Result<(), ClientError> {
        self.values.write().remove(key.as_str());
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        self.values.write().clear();
        Ok(())
    }
}

/// Store backed by a single JSON object file.
///
/// The whole map is kept in memory and written through on every change with
/// a temp-file + rename.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ClientError> {
        let path = path.into();
        let values = if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| ClientError::Storage(format!("read {}: {}", path.display(), e)))?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content).unwrap_or_else(|e| {
                    tracing::warn!(
                        "Session file {} is corrupt, starting fresh: {}",
                        path.display(),
                        e
                    );
                    BTreeMap::new()
                })
            }
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, values: RwLock::new(values) })
    }

    /// Open the store in the platform data directory.
    pub fn open_default() -> Result<Self, ClientError> {
        Self::open(default_session_path()?)
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> Result<(), ClientError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .map_err(|e| ClientError::Storage(format!("create {}: {}", dir.display(), e)))?;
        }
        let content = serde_json::to_string_pretty(values)
            .map_err(|e| ClientError::Storage(format!("serialize session: {}", e)))?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, content)
            .map_err(|e| ClientError::Storage(format!("write {}: {}", temp_path.display(), e)))?;
        fs::rename(&temp_path, &self.path)
            .map_err(|e| ClientError::Storage(format!("save {}: {}", self.path.display(), e)))
    }
}

impl SessionStore for FileStore {
    fn get_raw(&self, key: StorageKey) -> Option<String> {
        self.values.read().get(key.as_str()).cloned()
    }

    fn set_raw(&self, key: StorageKey, value: String) -> Result<(), ClientError> {
        let mut values = self.values.write();
        values.insert(key.as_str().to_string(), value);
        self.persist(&values)
    }

    fn remove(&self, key: StorageKey) -> Result<(), ClientError> {
        let mut values = self.values.write();
        if values.remove(key.as_str()).is_some() {
            self.persist(&values)?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        let mut values = self.values.write();
        values.clear();
        self.persist(&values)
    }
}

/// `<data dir>/marketplace/session.json`
pub fn default_session_path() -> Result<PathBuf, ClientError> {
    let base = dirs::data_dir()
        .ok_or_else(|| ClientError::Storage("Failed to resolve data directory".to_string()))?;
    Ok(base.join(APP_DIR).join(SESSION_FILE))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_wire_names() {
        let names: Vec<&str> = StorageKey::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(
            names,
            ["token", "refreshToken", "user", "theme", "settings", "stripe-alert-dismissed"]
        );
    }

    #[test]
    fn test_values_are_json_text() {
        let store: Arc<dyn SessionStore> = Arc::new(MemoryStore::new());
        store.set(StorageKey::Token, "abc").unwrap();
        assert_eq!(store.get_raw(StorageKey::Token).as_deref(), Some("\"abc\""));
        assert_eq!(store.get::<String>(StorageKey::Token).as_deref(), Some("abc"));
    }

    #[test]
    fn test_unparseable_value_reads_as_absent() {
        let store: Arc<dyn SessionStore> = Arc::new(MemoryStore::new());
        store.set_raw(StorageKey::User, "{not json".to_string()).unwrap();
        assert!(store.get::<serde_json::Value>(StorageKey::User).is_none());
        assert!(store.contains(StorageKey::User));
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        {
            let store: Arc<dyn SessionStore> = Arc::new(FileStore::open(&path).unwrap());
            store.set(StorageKey::Token, "tok").unwrap();
            store.set(StorageKey::StripeAlertDismissed, &true).unwrap();
        }

        let store: Arc<dyn SessionStore> = Arc::new(FileStore::open(&path).unwrap());
        assert_eq!(store.get::<String>(StorageKey::Token).as_deref(), Some("tok"));
        assert_eq!(store.get::<bool>(StorageKey::StripeAlertDismissed), Some(true));

        store.clear().unwrap();
        let reopened = FileStore::open(&path).unwrap();
        assert!(reopened.get_raw(StorageKey::Token).is_none());
    }

    #[test]
    fn test_corrupt_file_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "garbage").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert!(store.get_raw(StorageKey::Token).is_none());
    }
}
