//! Process-local scene storage.

use super::{Storage, StorageError, StorageResult, snapshot};
use crate::shapes::Shape;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Scenes held as serialized text in a map.
///
/// Entries go through the same codec as the file backend, so a scene that
/// survives a round trip here survives one on disk.
#[derive(Default)]
pub struct MemoryStorage {
    scenes: RwLock<HashMap<String, String>>,
}

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Other(format!("Scene map lock poisoned: {e}"))
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put raw text under `key` without encoding it. Lets callers plant a
    /// malformed snapshot.
    pub fn insert_raw(&self, key: &str, json: impl Into<String>) -> StorageResult<()> {
        self.writer()?.insert(key.to_string(), json.into());
        Ok(())
    }

    fn reader(&self) -> StorageResult<RwLockReadGuard<'_, HashMap<String, String>>> {
        self.scenes.read().map_err(poisoned)
    }

    fn writer(&self) -> StorageResult<RwLockWriteGuard<'_, HashMap<String, String>>> {
        self.scenes.write().map_err(poisoned)
    }
}

impl Storage for MemoryStorage {
    fn save(&self, key: &str, shapes: &[Shape]) -> StorageResult<()> {
        self.insert_raw(key, snapshot::to_json(shapes)?)
    }

    fn load(&self, key: &str) -> StorageResult<Vec<Shape>> {
        match self.reader()?.get(key) {
            Some(json) => snapshot::from_json(json),
            None => Err(StorageError::NotFound(key.to_string())),
        }
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        self.writer()?.remove(key);
        Ok(())
    }

    fn list(&self) -> StorageResult<Vec<String>> {
        Ok(self.reader()?.keys().cloned().collect())
    }

    fn exists(&self, key: &str) -> StorageResult<bool> {
        Ok(self.reader()?.contains_key(key))
    }
}
