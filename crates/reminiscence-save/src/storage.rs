//! Persistence capability and simple backends

use crate::error::StorageError;
use std::cell::RefCell;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Whole-document persistence medium
pub trait Storage {
    /// Read the stored document; `None` when nothing was ever saved
    fn load(&self) -> Result<Option<Vec<u8>>, StorageError>;

    /// Replace the stored document
    fn save(&mut self, bytes: &[u8]) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn load(&self) -> Result<Option<Vec<u8>>, StorageError> {
        (**self).load()
    }

    fn save(&mut self, bytes: &[u8]) -> Result<(), StorageError> {
        (**self).save(bytes)
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    bytes: Option<Vec<u8>>,
    writes: usize,
}

/// In-memory storage; clones share the same document
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryStorage {
    /// Create empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage that already holds a document
    pub fn with_contents(bytes: impl Into<Vec<u8>>) -> Self {
        let storage = Self::new();
        storage.state.borrow_mut().bytes = Some(bytes.into());
        storage
    }

    /// Current stored bytes
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.state.borrow().bytes.clone()
    }

    /// Number of saves performed
    pub fn writes(&self) -> usize {
        self.state.borrow().writes
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.contents())
    }

    fn save(&mut self, bytes: &[u8]) -> Result<(), StorageError> {
        let mut state = self.state.borrow_mut();
        state.bytes = Some(bytes.to_vec());
        state.writes += 1;
        Ok(())
    }
}

/// File-backed storage
///
/// Writes go to a sibling temp file which is then renamed over the target.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Store the document at `path`
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Location of the document
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for FileStorage {
    fn load(&self) -> Result<Option<Vec<u8>>, StorageError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, bytes: &[u8]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_clones_share_contents() {
        let storage = MemoryStorage::new();
        let mut writer = storage.clone();
        assert_eq!(storage.load().unwrap(), None);

        writer.save(b"{}").unwrap();
        assert_eq!(storage.load().unwrap(), Some(b"{}".to_vec()));
        assert_eq!(storage.writes(), 1);
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("nested").join("save.json"));
        assert_eq!(storage.load().unwrap(), None);

        storage.save(b"{\"a\":1}").unwrap();
        storage.save(b"{\"a\":2}").unwrap();
        assert_eq!(storage.load().unwrap(), Some(b"{\"a\":2}".to_vec()));
        assert!(!storage.path().with_extension("tmp").exists());
    }

    #[test]
    fn test_file_storage_reports_io_errors() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be read as a document.
        let storage = FileStorage::new(dir.path());
        assert!(matches!(storage.load(), Err(StorageError::Io(_))));
    }
}
