//! Key/value persistence for the to-do state.
//!
//! Values are JSON strings under the keys below, one file per key on disk.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;
use tracing::{debug, warn};

pub const TASKS_KEY: &str = "tasks";
pub const STREAK_KEY: &str = "streak";
pub const DARK_MODE_KEY: &str = "darkMode";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed stored value: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not determine a data directory; pass --data-dir or set TASKSTREAK_HOME")]
    NoDataDir,
}

pub type Result<T> = std::result::Result<T, StoreError>;

pub trait Store {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Reads `key` as JSON, falling back to `T::default()` when nothing is stored.
pub fn load_json<T: DeserializeOwned + Default>(store: &dyn Store, key: &str) -> Result<T> {
    match store.get(key)? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(T::default()),
    }
}

pub fn save_json<T: Serialize + ?Sized>(store: &mut dyn Store, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string_pretty(value)?;
    store.set(key, &raw)
}

/// One `<key>.json` file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn read_backup(&self, key: &str) -> Option<String> {
        let backup_path = self.path_for(key).with_extension("json.bak");
        fs::read_to_string(backup_path)
            .ok()
            .filter(|content| serde_json::from_str::<serde_json::Value>(content).is_ok())
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        // A torn or hand-edited file reads from the last good copy instead.
        if serde_json::from_str::<serde_json::Value>(&content).is_err() {
            if let Some(backup) = self.read_backup(key) {
                warn!("{} is not valid JSON, using its backup", path.display());
                return Ok(Some(backup));
            }
        }
        Ok(Some(content))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let path = self.path_for(key);
        if path.exists() {
            let backup_path = path.with_extension("json.bak");
            if let Err(e) = fs::copy(&path, &backup_path) {
                warn!("Failed to create backup of {}: {}", path.display(), e);
            }
        }

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, value)?;
        fs::rename(&tmp_path, &path)?;
        debug!(key, path = %path.display(), "saved");
        Ok(())
    }
}

/// In-memory store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.raw(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
