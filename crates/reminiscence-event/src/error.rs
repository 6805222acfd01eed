//! Error types for reminiscence-event

use thiserror::Error;

/// Event loading error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("Duplicate event: {0}")]
    DuplicateEvent(String),

    #[error("Event {event} requires unknown event {required}")]
    UnknownPrerequisite { event: String, required: String },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
