/// Durable client-local storage for user selections.
///
/// The dashboard remembers the user's time-range choice and the currently
/// selected IPAL across sessions. Each storage key maps to one TOML file
/// under the configured directory; values are serde structs.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Fixed storage key for the currently selected IPAL.
const SELECTED_IPAL_KEY: &str = "selected_ipal";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("stored value for key '{key}' is malformed: {detail}")]
    Malformed { key: String, detail: String },

    #[error("invalid storage key '{0}': keys must be non-empty and filesystem-safe")]
    InvalidKey(String),
}

/// A directory of persisted selections, one TOML file per key.
#[derive(Debug, Clone)]
pub struct SelectionStore {
    dir: PathBuf,
}

/// Wrapper so the selected IPAL id serializes as a TOML table.
#[derive(Debug, Clone, Serialize, serde::Deserialize)]
struct SelectedIpal {
    ipal_id: String,
}

impl SelectionStore {
    /// Opens (and creates if needed) the storage directory.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            key: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.toml")))
    }

    /// Persists `value` under `key`, replacing any previous value.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let body = toml::to_string(value).map_err(|e| StorageError::Malformed {
            key: key.to_string(),
            detail: e.to_string(),
        })?;
        fs::write(&path, body).map_err(|source| StorageError::Io {
            key: key.to_string(),
            source,
        })
    }

    /// Loads the value stored under `key`, or `None` if nothing was ever saved.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let path = self.path_for(key)?;
        let body = match fs::read_to_string(&path) {
            Ok(body) => body,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StorageError::Io { key: key.to_string(), source });
            }
        };
        let value = toml::from_str(&body).map_err(|e| StorageError::Malformed {
            key: key.to_string(),
            detail: e.to_string(),
        })?;
        Ok(Some(value))
    }

    /// Remembers the currently selected IPAL id under the fixed key.
    pub fn save_selected_ipal(&self, ipal_id: &str) -> Result<(), StorageError> {
        self.save(SELECTED_IPAL_KEY, &SelectedIpal { ipal_id: ipal_id.to_string() })
    }

    /// Restores the selected IPAL id, if one was persisted.
    pub fn load_selected_ipal(&self) -> Result<Option<String>, StorageError> {
        Ok(self
            .load::<SelectedIpal>(SELECTED_IPAL_KEY)?
            .map(|s| s.ipal_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        label: String,
        count: u32,
    }

    fn temp_store(tag: &str) -> SelectionStore {
        let dir = std::env::temp_dir().join(format!(
            "ipalmon_storage_{}_{}",
            tag,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        SelectionStore::open(&dir).expect("temp store should open")
    }

    #[test]
    fn test_load_before_save_returns_none() {
        let store = temp_store("fresh");
        let loaded: Option<Sample> = store.load("nothing-here").expect("load should succeed");
        assert!(loaded.is_none(), "unsaved key should load as None, not error");
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let store = temp_store("roundtrip");
        let value = Sample { label: "dashboard".into(), count: 3 };
        store.save("sample", &value).expect("save should succeed");

        let loaded: Sample = store
            .load("sample")
            .expect("load should succeed")
            .expect("value should be present");
        assert_eq!(loaded, value);
    }

    #[test]
    fn test_save_replaces_previous_value() {
        let store = temp_store("replace");
        store.save("sample", &Sample { label: "a".into(), count: 1 }).unwrap();
        store.save("sample", &Sample { label: "b".into(), count: 2 }).unwrap();

        let loaded: Sample = store.load("sample").unwrap().unwrap();
        assert_eq!(loaded.label, "b");
        assert_eq!(loaded.count, 2);
    }

    #[test]
    fn test_path_traversal_key_rejected() {
        let store = temp_store("traversal");
        let result = store.save("../escape", &Sample { label: "x".into(), count: 0 });
        assert!(
            matches!(result, Err(StorageError::InvalidKey(_))),
            "keys with path separators must be rejected"
        );
    }

    #[test]
    fn test_empty_key_rejected() {
        let store = temp_store("empty");
        let result: Result<Option<Sample>, _> = store.load("");
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[test]
    fn test_selected_ipal_round_trips() {
        let store = temp_store("ipal");
        assert!(store.load_selected_ipal().unwrap().is_none());

        store.save_selected_ipal("ipal1").expect("save should succeed");
        assert_eq!(store.load_selected_ipal().unwrap().as_deref(), Some("ipal1"));
    }

    #[test]
    fn test_malformed_file_surfaces_as_malformed_error() {
        let store = temp_store("malformed");
        store.save("sample", &Sample { label: "ok".into(), count: 1 }).unwrap();

        // Corrupt the file on disk behind the store's back.
        let path = store.dir.join("sample.toml");
        fs::write(&path, "not = [valid toml").unwrap();

        let result: Result<Option<Sample>, _> = store.load("sample");
        assert!(
            matches!(result, Err(StorageError::Malformed { .. })),
            "corrupt file should be reported, got {:?}",
            result
        );
    }
}
