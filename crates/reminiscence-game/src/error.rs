//! Error types for reminiscence-game

use thiserror::Error;

/// Orchestration error type
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Save(#[from] reminiscence_save::Error),

    #[error(transparent)]
    Catalog(#[from] reminiscence_catalog::Error),

    #[error("Unknown event: {0}")]
    UnknownEvent(String),

    #[error("Event not eligible: {0}")]
    EventNotEligible(String),

    #[error("Event {0} is already in progress")]
    EventInProgress(String),

    #[error("No event in progress")]
    NoOngoingEvent,

    #[error("{0} cannot be bought")]
    NotForSale(String),

    #[error("{0} has no recipe")]
    NotCraftable(String),

    #[error("Recipe for {0} is locked")]
    RecipeLocked(String),

    #[error("Missing ingredients for {0}")]
    MissingIngredients(String),

    #[error("Insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: f64, available: f64 },

    #[error("Insufficient stock of {item}: need {needed}, have {available}")]
    InsufficientStock {
        item: String,
        needed: u32,
        available: u32,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
