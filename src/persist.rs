use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const APP_DIR: &str = "scoreboard_terminal";
const STORE_FILE: &str = "scoreboard.json";
const STORE_VERSION: u32 = 1;

/// Key/value persistence for match records. Values are plain JSON.
pub trait Store {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&self, key: &str, value: Value) -> Result<()>;
}

/// Reads `key` as `T`. Missing or unparseable records are treated as absent.
pub fn load<T: DeserializeOwned>(store: &dyn Store, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_value(raw) {
        Ok(record) => Some(record),
        Err(err) => {
            tracing::warn!(key, %err, "ignoring unreadable record");
            None
        }
    }
}

pub fn save<T: Serialize>(store: &dyn Store, key: &str, record: &T) -> Result<()> {
    let value = serde_json::to_value(record).with_context(|| format!("serialize {key}"))?;
    store.set(key, value)
}

/// Like [`save`], but a failed write only gets logged.
pub fn save_or_warn<T: Serialize>(store: &dyn Store, key: &str, record: &T) {
    if let Err(err) = save(store, key, record) {
        tracing::warn!(key, error = %format!("{err:#}"), "failed to persist record");
    }
}

/// In-memory store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        self.entries.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct StoreFile {
    version: u32,
    entries: HashMap<String, Value>,
}

/// Single JSON file holding every record, swapped in atomically on write.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(STORE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> Option<StoreFile> {
        let raw = fs::read_to_string(&self.path).ok()?;
        let file = serde_json::from_str::<StoreFile>(&raw).ok()?;
        if file.version != STORE_VERSION {
            tracing::warn!(
                path = %self.path.display(),
                found = file.version,
                expected = STORE_VERSION,
                "store version mismatch, starting fresh"
            );
            return None;
        }
        Some(file)
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.read_file()?.entries.remove(key)
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut file = self.read_file().unwrap_or_else(|| StoreFile {
            version: STORE_VERSION,
            entries: HashMap::new(),
        });
        file.version = STORE_VERSION;
        file.entries.insert(key.to_string(), value);

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let json = serde_json::to_string(&file).context("serialize store")?;
        fs::write(&tmp, json).context("write store")?;
        fs::rename(&tmp, &self.path).context("swap store")?;
        Ok(())
    }
}

/// `$XDG_CACHE_HOME/scoreboard_terminal`, falling back to `~/.cache`.
pub fn default_data_dir() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(APP_DIR));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(APP_DIR))
}
