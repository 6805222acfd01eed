//! Reminiscence Core - shared value model for the bakery game
//!
//! This crate provides the building blocks the other crates agree on:
//! - Dynamic value tree (`Value`, `ValueMap`) mirroring the persisted document
//! - Dotted path addressing (`Path`) with missing-aware lookups
//! - Default-fill reconciliation of documents against templates
//! - Identifiers for events and items

mod error;
mod identity;
mod path;
mod reconcile;
mod value;

pub use error::{Error, Result};
pub use identity::{EventId, ItemId};
pub use path::Path;
pub use reconcile::reconcile;
pub use value::{Value, ValueMap};
