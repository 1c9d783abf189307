use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::attribution::Attribution;
use crate::errors::StoreError;

/// Where the session's attribution record lives. Backends are chosen at
/// construction time; exactly one record exists per store.
pub trait AttributionStore: Send + Sync {
    /// Reads the stored record, if any.
    fn load(&self) -> Result<Option<Attribution>, StoreError>;

    /// Replaces the stored record.
    fn save(&self, record: &Attribution) -> Result<(), StoreError>;

    /// Removes the stored record. Always succeeds.
    fn clear(&self);
}

/// A store persisting the record as a single JSON blob on disk.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }
}

impl AttributionStore for FileStore {
    fn load(&self) -> Result<Option<Attribution>, StoreError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::ReadFailed { source }),
        };

        let record = serde_json::from_slice(&raw)
            .map_err(|source| StoreError::MalformedRecord { source })?;

        Ok(Some(record))
    }

    fn save(&self, record: &Attribution) -> Result<(), StoreError> {
        let raw = serde_json::to_vec(record)
            .map_err(|source| StoreError::MalformedRecord { source })?;

        fs::write(&self.path, raw).map_err(|source| StoreError::WriteFailed { source })
    }

    fn clear(&self) {
        // a missing blob is already cleared
        let _ = fs::remove_file(&self.path);
    }
}

/// A last-resort store keeping the record in process memory. Does not
/// survive a restart.
#[derive(Default)]
pub struct MemoryStore {
    slot: RwLock<Option<Attribution>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Default::default()
    }
}

impl AttributionStore for MemoryStore {
    fn load(&self) -> Result<Option<Attribution>, StoreError> {
        Ok(self.slot.read().unwrap().clone())
    }

    fn save(&self, record: &Attribution) -> Result<(), StoreError> {
        *self.slot.write().unwrap() = Some(record.clone());

        Ok(())
    }

    fn clear(&self) {
        *self.slot.write().unwrap() = None;
    }
}
