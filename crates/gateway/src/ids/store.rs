//! Stable storage for the last allocated order id

use crate::error::PersistenceError;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Where the generator records its high-water mark
pub trait OrderIdStore: Send + Sync {
    /// Last persisted order id, `None` if nothing was ever written
    fn load(&self) -> Result<Option<u64>, PersistenceError>;

    /// Durably record `last_order_id`; must not return before the write is stable
    fn save(&self, last_order_id: u64) -> Result<(), PersistenceError>;
}

/// On-disk record format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderIdRecord {
    pub last_order_id: u64,
}

/// JSON record on disk, replaced atomically on every save
#[derive(Debug, Clone)]
pub struct FileIdStore {
    path: PathBuf,
}

impl FileIdStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }

    fn io_error(&self, op: &'static str, source: std::io::Error) -> PersistenceError {
        PersistenceError::Io {
            op,
            path: self.display_path(),
            source,
        }
    }
}

impl OrderIdStore for FileIdStore {
    fn load(&self) -> Result<Option<u64>, PersistenceError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error("read", e)),
        };

        let record: OrderIdRecord =
            serde_json::from_str(&content).map_err(|e| PersistenceError::Corrupt {
                path: self.display_path(),
                reason: e.to_string(),
            })?;
        Ok(Some(record.last_order_id))
    }

    fn save(&self, last_order_id: u64) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error("create directory for", e))?;
        }

        let tmp = self.path.with_extension("tmp");
        let data = serde_json::to_vec(&OrderIdRecord { last_order_id }).map_err(|e| {
            PersistenceError::Corrupt {
                path: self.display_path(),
                reason: e.to_string(),
            }
        })?;

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp)
            .map_err(|e| self.io_error("open", e))?;
        file.write_all(&data).map_err(|e| self.io_error("write", e))?;
        file.sync_all().map_err(|e| self.io_error("sync", e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error("rename", e))?;
        fsync_dir(self.parent_dir()).map_err(|e| self.io_error("sync directory of", e))?;
        Ok(())
    }
}

impl FileIdStore {
    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

/// Make a completed rename durable
#[cfg(unix)]
fn fsync_dir(path: &Path) -> std::io::Result<()> {
    let dir = File::open(path)?;
    dir.sync_all()?;
    Ok(())
}

#[cfg(not(unix))]
fn fsync_dir(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

/// In-process store. Clones share the same value, which lets tests and the
/// paper exchange simulate a restart by handing a clone to a new generator.
#[derive(Debug, Clone, Default)]
pub struct MemoryIdStore {
    value: Arc<Mutex<Option<u64>>>,
}

impl MemoryIdStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_last(last_order_id: u64) -> Self {
        Self {
            value: Arc::new(Mutex::new(Some(last_order_id))),
        }
    }
}

impl OrderIdStore for MemoryIdStore {
    fn load(&self) -> Result<Option<u64>, PersistenceError> {
        Ok(*self.value.lock())
    }

    fn save(&self, last_order_id: u64) -> Result<(), PersistenceError> {
        *self.value.lock() = Some(last_order_id);
        Ok(())
    }
}
