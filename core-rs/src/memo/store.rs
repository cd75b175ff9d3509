/**
 * store.rs
 * Key-value memoization of resolved ports
 *
 * The resolver consults an injected store at the start of a memoized
 * resolution and writes the result back at the end; the store is never
 * ambient global state. The file-backed implementation keeps a flat
 * name -> port map in a .fports JSON file, so repeated runs of the same
 * tool keep landing on the same port while it stays free.
 */

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{FreeportError, Result};

/// Injected key-value collaborator for port memoization
pub trait MemoStore {
    /// Look up a previously memoized port
    fn get(&self, key: &str) -> Option<u16>;

    /// Persist a resolved port under `key`
    fn set(&mut self, key: &str, port: u16) -> Result<()>;
}

/// Memo map structure (.fports file format)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoMap {
    pub entries: HashMap<String, u16>,
}

/// File-backed memo store
pub struct FileMemo {
    memo_path: PathBuf,
    map: MemoMap,
}

impl FileMemo {
    /// Open (or lazily create) the memo file in `dir`
    ///
    /// # Example
    /// ```no_run
    /// use freeport_core::FileMemo;
    ///
    /// let memo = FileMemo::new(".").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let memo_path = dir.as_ref().join(".fports");
        let map = Self::load(&memo_path)?;

        Ok(FileMemo { memo_path, map })
    }

    /// Load the memo map, empty if the file doesn't exist
    fn load(memo_path: &Path) -> Result<MemoMap> {
        if !memo_path.exists() {
            return Ok(MemoMap::default());
        }

        let content = fs::read_to_string(memo_path)
            .map_err(|e| FreeportError::Memo(format!("Failed to read .fports: {}", e)))?;

        let map: MemoMap = serde_json::from_str(&content)
            .map_err(|e| FreeportError::Memo(format!("Invalid .fports JSON: {}", e)))?;

        Ok(map)
    }

    fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.map)
            .map_err(|e| FreeportError::Memo(format!("Failed to serialize .fports: {}", e)))?;

        fs::write(&self.memo_path, json)
            .map_err(|e| FreeportError::Memo(format!("Failed to write .fports: {}", e)))?;

        Ok(())
    }

    /// Remove one memoized entry
    ///
    /// # Returns
    /// true if removed, false if not present
    pub fn remove(&mut self, key: &str) -> Result<bool> {
        if self.map.entries.remove(key).is_some() {
            self.save()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Drop every memoized entry
    pub fn clear(&mut self) -> Result<()> {
        self.map.entries.clear();
        self.save()
    }

    /// All memoized entries
    pub fn entries(&self) -> &HashMap<String, u16> {
        &self.map.entries
    }
}

impl MemoStore for FileMemo {
    fn get(&self, key: &str) -> Option<u16> {
        self.map.entries.get(key).copied()
    }

    fn set(&mut self, key: &str, port: u16) -> Result<()> {
        self.map.entries.insert(key.to_string(), port);
        self.save()
    }
}
