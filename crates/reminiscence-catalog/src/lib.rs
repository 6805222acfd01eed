//! Reminiscence Catalog - static item data for the bakery
//!
//! Pure lookup, no mutation:
//! - Ingredient and product definitions (`Item`)
//! - Recipe checks against an inventory (`Item::can_craft`)
//! - RON loading and the built-in bakery catalog (`ItemCatalog::bakery`)

mod catalog;
mod error;
mod item;

pub use catalog::ItemCatalog;
pub use error::{Error, Result};
pub use item::{Inventory, Item, Recipe};
