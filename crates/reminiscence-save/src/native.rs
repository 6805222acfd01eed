//! native_db backed storage.

use crate::config::SaveConfig;
use crate::error::StorageError;
use crate::storage::Storage;
use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

/// Stored save document - one row per record key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 1, version = 1)]
#[native_db]
pub struct StoredDocument {
    /// Primary key - record name.
    #[primary_key]
    pub key: String,
    /// Serialized JSON document.
    pub data: Vec<u8>,
}

// Static models for the database
static MODELS: LazyLock<Models> = LazyLock::new(|| {
    let mut models = Models::new();
    models
        .define::<StoredDocument>()
        .expect("StoredDocument model is well-formed");
    models
});

/// Storage keeping the document as a single native_db row.
pub struct NativeDbStorage {
    db: Database<'static>,
    key: String,
}

impl NativeDbStorage {
    /// Open or create a database at the given path.
    pub fn open(path: impl AsRef<Path>, key: impl Into<String>) -> Result<Self, StorageError> {
        let db = Builder::new().create(&MODELS, path.as_ref())?;
        Ok(Self {
            db,
            key: key.into(),
        })
    }

    /// Create an in-memory database.
    pub fn in_memory(key: impl Into<String>) -> Result<Self, StorageError> {
        let db = Builder::new().create_in_memory(&MODELS)?;
        Ok(Self {
            db,
            key: key.into(),
        })
    }

    /// Open a database at `path` using the record name from `config`.
    pub fn from_config(path: impl AsRef<Path>, config: &SaveConfig) -> Result<Self, StorageError> {
        Self::open(path, config.key.clone())
    }

    /// Record name this storage reads and writes.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Storage for NativeDbStorage {
    fn load(&self) -> Result<Option<Vec<u8>>, StorageError> {
        let r = self.db.r_transaction()?;
        let stored: Option<StoredDocument> = r.get().primary(self.key.clone())?;
        Ok(stored.map(|s| s.data))
    }

    fn save(&mut self, bytes: &[u8]) -> Result<(), StorageError> {
        let rw = self.db.rw_transaction()?;
        rw.upsert(StoredDocument {
            key: self.key.clone(),
            data: bytes.to_vec(),
        })?;
        rw.commit()?;
        Ok(())
    }
}
