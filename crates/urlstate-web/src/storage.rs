#![forbid(unsafe_code)]

//! Persisted key-value state.
//!
//! [`KeyValueStorage`] mirrors the browser's string store. Only remembered
//! table columns live here; nothing else depends on it.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;

/// String-to-string store.
pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for &S {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        (**self).remove_item(key)
    }
}

// ── MemoryStorage ───────────────────────────────────────────────────────

/// Volatile storage, for tests and hosts without persistence.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<BTreeMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

// ── JsonFileStorage ─────────────────────────────────────────────────────

/// Storage backed by one JSON object on disk.
///
/// Every operation reads the file; writes rewrite it whole. A missing file
/// reads as empty and is created on first write, parent directories
/// included.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write(&self, items: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(items)?;
        fs::write(&self.path, content)?;
        debug!(path = %self.path.display(), items = items.len(), "storage written");
        Ok(())
    }
}

impl KeyValueStorage for JsonFileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self.read()?;
        items.insert(key.to_string(), value.to_string());
        self.write(&items)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut items = self.read()?;
        if items.remove(key).is_some() {
            self.write(&items)?;
        }
        Ok(())
    }
}

// ── ColumnStore ─────────────────────────────────────────────────────────

/// Remembered visible columns per table, stored comma-joined under
/// `table-columns/{table}`.
#[derive(Debug, Clone, Copy)]
pub struct ColumnStore<S> {
    storage: S,
}

impl<S: KeyValueStorage> ColumnStore<S> {
    pub const PREFIX: &'static str = "table-columns/";

    #[must_use]
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    #[must_use]
    pub fn key(table: &str) -> String {
        format!("{}{table}", Self::PREFIX)
    }

    /// Persisted columns, or `None` when nothing (or an empty list) is
    /// stored.
    pub fn load(&self, table: &str) -> Result<Option<Vec<String>>> {
        let Some(raw) = self.storage.get_item(&Self::key(table))? else {
            return Ok(None);
        };
        let columns: Vec<String> = raw
            .split(',')
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        Ok((!columns.is_empty()).then_some(columns))
    }

    pub fn save<C: AsRef<str>>(&self, table: &str, columns: &[C]) -> Result<()> {
        let joined = columns
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(",");
        self.storage.set_item(&Self::key(table), &joined)
    }

    pub fn clear(&self, table: &str) -> Result<()> {
        self.storage.remove_item(&Self::key(table))
    }
}
