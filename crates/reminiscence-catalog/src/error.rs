//! Error types for reminiscence-catalog

use thiserror::Error;

/// Catalog loading error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("Duplicate item: {0}")]
    DuplicateItem(String),

    #[error("Unknown item: {0}")]
    UnknownItem(String),

    #[error("Recipe for {item} references unknown ingredient {ingredient}")]
    UnknownIngredient { item: String, ingredient: String },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
