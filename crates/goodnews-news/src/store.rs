//! Key-value substrates behind [`crate::NewsCache`].

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cache::CacheEntry;
use crate::error::NewsError;

/// Opaque storage for cache entries. Expiry and eviction policy live in
/// [`crate::NewsCache`]; a store only remembers what it is given.
pub trait CacheStore: Send + Debug {
    fn load(&self, key: &str) -> Option<CacheEntry>;

    /// Insert or overwrite.
    ///
    /// # Errors
    ///
    /// Returns an error when a durable store cannot persist the change.
    fn save(&mut self, key: &str, entry: CacheEntry) -> Result<(), NewsError>;

    /// # Errors
    ///
    /// Returns an error when a durable store cannot persist the change.
    fn remove(&mut self, key: &str) -> Result<(), NewsError>;

    /// Every stored `(key, entry)` pair, in key order.
    fn entries(&self) -> Vec<(String, CacheEntry)>;

    /// # Errors
    ///
    /// Returns an error when a durable store cannot persist the change.
    fn clear(&mut self) -> Result<(), NewsError>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-lifetime store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, CacheEntry>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryStore {
    fn load(&self, key: &str) -> Option<CacheEntry> {
        self.entries.get(key).cloned()
    }

    fn save(&mut self, key: &str, entry: CacheEntry) -> Result<(), NewsError> {
        self.entries.insert(key.to_string(), entry);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), NewsError> {
        self.entries.remove(key);
        Ok(())
    }

    fn entries(&self) -> Vec<(String, CacheEntry)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn clear(&mut self) -> Result<(), NewsError> {
        self.entries.clear();
        Ok(())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// JSON-file store that survives restarts of a single client.
///
/// The whole map is held in memory and rewritten on every change through a
/// sibling temp file, so a crash mid-write leaves the previous file intact.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, CacheEntry>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`.
    ///
    /// A missing file starts empty. A file that cannot be read or parsed is
    /// also treated as empty and will be overwritten on the next write.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "cache file is corrupt; starting empty"
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "cache file unreadable; starting empty"
                );
                BTreeMap::new()
            }
        };
        Self { path, entries }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> NewsError {
        NewsError::Store {
            path: self.path.display().to_string(),
            source,
        }
    }

    fn persist(&self) -> Result<(), NewsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }
        let body = serde_json::to_string_pretty(&self.entries)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, body).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))
    }
}

impl CacheStore for FileStore {
    fn load(&self, key: &str) -> Option<CacheEntry> {
        self.entries.get(key).cloned()
    }

    fn save(&mut self, key: &str, entry: CacheEntry) -> Result<(), NewsError> {
        self.entries.insert(key.to_string(), entry);
        self.persist()
    }

    fn remove(&mut self, key: &str) -> Result<(), NewsError> {
        if self.entries.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }

    fn entries(&self) -> Vec<(String, CacheEntry)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn clear(&mut self) -> Result<(), NewsError> {
        self.entries.clear();
        self.persist()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
