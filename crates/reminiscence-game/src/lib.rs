//! Reminiscence Game - orchestration of a play session
//!
//! The `Director` owns the save store, the item catalog and the event book.
//! It evaluates event conditions against the active slot, drives playback,
//! applies rewards when an event completes, and performs the bakery's
//! buy/craft/sell inventory changes.

mod director;
mod error;

pub use director::Director;
pub use error::{Error, Result};
