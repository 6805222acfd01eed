//! Error types for save-data operations.

use thiserror::Error;

/// Failure of the persistence medium itself.
#[derive(Debug, Error)]
pub enum StorageError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Native DB error.
    #[error("Database error: {0}")]
    Database(String),

    /// Medium missing, full or refusing writes.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl From<native_db::db_type::Error> for StorageError {
    fn from(err: native_db::db_type::Error) -> Self {
        StorageError::Database(err.to_string())
    }
}

/// Errors that can occur during save-data operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading or writing the medium failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Persisted text does not parse into the expected structure.
    #[error("Corrupt save data: {0}")]
    CorruptData(String),

    /// Slot index outside `0..SLOT_COUNT`.
    #[error("Invalid slot index: {0}")]
    InvalidSlotIndex(usize),

    /// Read before anything was loaded.
    #[error("Save data not loaded")]
    NotLoaded,

    /// Write refused because the document would no longer load.
    #[error("Invalid value at '{path}': {reason}")]
    InvalidValue { path: String, reason: String },

    /// Path or value conversion error.
    #[error(transparent)]
    Core(#[from] reminiscence_core::Error),

    /// Configuration could not be read.
    #[error("Config error: {0}")]
    Config(String),
}

/// Result type for save-data operations.
pub type Result<T> = std::result::Result<T, Error>;
