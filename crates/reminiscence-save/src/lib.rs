//! Reminiscence Save - persistent game state
//!
//! Provides the save-data store for:
//! - Five independent save slots plus global settings (`SettingsRoot`, `GameSlot`)
//! - Dotted-path reads and writes over the stored document
//! - Default-template reconciliation when older saves are loaded
//! - Pluggable persistence (`Storage`): memory, file, or native_db

mod config;
mod error;
mod native;
mod slot;
mod storage;
mod store;

pub use config::SaveConfig;
pub use error::{Error, Result, StorageError};
pub use native::NativeDbStorage;
pub use slot::{EmptySlot, GameSlot, SettingsRoot, SlotEntry, SlotSummary, SLOT_COUNT};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::SaveStore;
