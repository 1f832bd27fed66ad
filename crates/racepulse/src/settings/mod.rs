//! Persistent user settings.
//!
//! Settings are plain string key-value pairs. Components that need a setting
//! take an `Arc<dyn SettingsStore>` so tests can hand them an in-memory
//! store instead of a database on disk.

pub mod migrations;
pub mod schema;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, RwLock};

use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Settings key holding the completion API key.
pub const API_KEY_SETTING: &str = "groq_api_key";

/// A synchronous string key-value store.
pub trait SettingsStore: Send + Sync {
    /// Read a setting.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a setting, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a setting. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<bool>;
}

/// Store the completion API key after trimming it.
///
/// # Errors
///
/// Returns [`Error::InvalidSetting`] for a blank key, or a store error.
pub fn store_api_key(store: &dyn SettingsStore, key: &str) -> Result<()> {
    let key = key.trim();
    if key.is_empty() {
        return Err(Error::invalid_setting(
            API_KEY_SETTING,
            "API key must not be empty",
        ));
    }
    store.set(API_KEY_SETTING, key)
}

/// Load the completion API key. A stored blank value counts as absent.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn load_api_key(store: &dyn SettingsStore) -> Result<Option<String>> {
    Ok(store
        .get(API_KEY_SETTING)?
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty()))
}

/// Settings stored in a `SQLite` database.
#[derive(Debug)]
pub struct SqliteSettingsStore {
    path: PathBuf,
    conn: Mutex<Connection>,
}

impl SqliteSettingsStore {
    /// Open or create the settings database at `path`.
    ///
    /// Parent directories are created as needed and the schema is brought
    /// up to date.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory, database or schema cannot be
    /// created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening settings database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;
        migrations::initialize_schema(&conn)?;

        info!("Settings database ready at {}", path.display());
        Ok(Self {
            path,
            conn: Mutex::new(conn),
        })
    }

    /// Open a throwaway in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn: Mutex::new(conn),
        })
    }

    /// Path of the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::internal("settings connection lock poisoned"))
    }
}

impl SettingsStore for SqliteSettingsStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn()?
            .query_row("SELECT value FROM settings WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn()?.execute(
            r"
            INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            ",
            (key, value),
        )?;
        debug!(key, "Stored setting");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let removed = self
            .conn()?
            .execute("DELETE FROM settings WHERE key = ?1", [key])?;
        Ok(removed > 0)
    }
}

/// Settings held in process memory.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemorySettingsStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .read()
            .map_err(|_| Error::internal("settings lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .write()
            .map_err(|_| Error::internal("settings lock poisoned"))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        Ok(self
            .values
            .write()
            .map_err(|_| Error::internal("settings lock poisoned"))?
            .remove(key)
            .is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn exercise(store: &dyn SettingsStore) {
        assert_eq!(store.get("theme").unwrap(), None);

        store.set("theme", "dark").unwrap();
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));

        store.set("theme", "light").unwrap();
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("light"));

        assert!(store.remove("theme").unwrap());
        assert!(!store.remove("theme").unwrap());
        assert_eq!(store.get("theme").unwrap(), None);
    }

    #[test]
    fn test_sqlite_store_crud() {
        exercise(&SqliteSettingsStore::open_in_memory().unwrap());
    }

    #[test]
    fn test_memory_store_crud() {
        exercise(&MemorySettingsStore::new());
    }

    #[test]
    fn test_open_creates_parent_dirs_and_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deeper").join("settings.db");

        {
            let store = SqliteSettingsStore::open(&path).unwrap();
            assert_eq!(store.path(), path.as_path());
            store_api_key(&store, "gsk_test").unwrap();
        }

        let reopened = SqliteSettingsStore::open(&path).unwrap();
        assert_eq!(load_api_key(&reopened).unwrap().as_deref(), Some("gsk_test"));
    }

    #[test]
    fn test_store_api_key_trims() {
        let store = MemorySettingsStore::new();
        store_api_key(&store, "  gsk_abc \n").unwrap();
        assert_eq!(
            store.get(API_KEY_SETTING).unwrap().as_deref(),
            Some("gsk_abc")
        );
    }

    #[test]
    fn test_store_api_key_rejects_blank() {
        let store = MemorySettingsStore::new();
        let err = store_api_key(&store, "   ").unwrap_err();
        assert!(matches!(err, Error::InvalidSetting { .. }));
        assert_eq!(store.get(API_KEY_SETTING).unwrap(), None);
    }

    #[test]
    fn test_load_api_key_treats_blank_as_absent() {
        let store = MemorySettingsStore::new();
        assert_eq!(load_api_key(&store).unwrap(), None);

        store.set(API_KEY_SETTING, "").unwrap();
        assert_eq!(load_api_key(&store).unwrap(), None);
    }
}
