use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::cache::keys::CacheKey;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid cache key: {0}")]
    InvalidKey(String),
}

/// Pull-based, write-through cache of JSON artifacts.
///
/// Implementations replace a value wholesale on `store_bytes`; readers never
/// observe a partially written value. Freshness is not tracked here: TTL lives
/// in each value's own `meta.expires_at`.
pub trait CacheStore {
    fn load_bytes(&self, key: &CacheKey) -> Result<Option<Vec<u8>>, CacheError>;

    fn store_bytes(&self, key: &CacheKey, bytes: &[u8]) -> Result<(), CacheError>;

    fn contains(&self, key: &CacheKey) -> Result<bool, CacheError> {
        Ok(self.load_bytes(key)?.is_some())
    }

    fn load<T: DeserializeOwned>(&self, key: &CacheKey) -> Result<Option<T>, CacheError>
    where
        Self: Sized,
    {
        match self.load_bytes(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn store<T: Serialize>(&self, key: &CacheKey, value: &T) -> Result<(), CacheError>
    where
        Self: Sized,
    {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.store_bytes(key, &bytes)
    }
}

impl<S: CacheStore + ?Sized> CacheStore for &S {
    fn load_bytes(&self, key: &CacheKey) -> Result<Option<Vec<u8>>, CacheError> {
        (**self).load_bytes(key)
    }

    fn store_bytes(&self, key: &CacheKey, bytes: &[u8]) -> Result<(), CacheError> {
        (**self).store_bytes(key, bytes)
    }
}

/// Filesystem-backed store rooted at a data directory (usually `data/`).
///
/// Single writer per path is assumed: there is no cross-process locking, so
/// concurrent writers race and the last rename wins.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &CacheKey) -> Result<PathBuf, CacheError> {
        Ok(self.root.join(key.relative_path()?))
    }
}

impl CacheStore for FsStore {
    fn load_bytes(&self, key: &CacheKey) -> Result<Option<Vec<u8>>, CacheError> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn store_bytes(&self, key: &CacheKey, bytes: &[u8]) -> Result<(), CacheError> {
        let path = self.path_for(key)?;
        write_atomic(&path, bytes)?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "cache write");
        Ok(())
    }
}

/// Write to a temp file beside `path`, fsync, then rename over it.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), CacheError> {
    let parent = path
        .parent()
        .ok_or_else(|| CacheError::InvalidKey(path.display().to_string()))?;
    fs::create_dir_all(parent)?;

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);

    let result = (|| -> std::io::Result<()> {
        let mut f = fs::File::create(&tmp)?;
        f.write_all(bytes)?;
        f.sync_all()?;
        fs::rename(&tmp, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result.map_err(CacheError::from)
}

/// In-process store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<BTreeMap<String, Vec<u8>>>>,
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

    pub fn keys(&self) -> Vec<String> {
        self.entries.borrow().keys().cloned().collect()
    }
}

impl CacheStore for MemoryStore {
    fn load_bytes(&self, key: &CacheKey) -> Result<Option<Vec<u8>>, CacheError> {
        let path = key.relative_path()?;
        Ok(self
            .entries
            .borrow()
            .get(&path.to_string_lossy().into_owned())
            .cloned())
    }

    fn store_bytes(&self, key: &CacheKey, bytes: &[u8]) -> Result<(), CacheError> {
        let path = key.relative_path()?;
        self.entries
            .borrow_mut()
            .insert(path.to_string_lossy().into_owned(), bytes.to_vec());
        Ok(())
    }
}
