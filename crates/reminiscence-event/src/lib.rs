//! Reminiscence Event - scripted story events
//!
//! Each authored event is a small playback state machine:
//! - An ordered list of steps (`EventStep`) advanced one `play()` at a time
//! - A gating condition over a save slot (`EventCondition`)
//! - Rewards applied to the slot on completion (`EventReward`)
//! - A synchronous notification channel (`Notification`) for observers
//!
//! Events are authored in code or loaded from RON through `EventBook`.

mod book;
mod condition;
mod error;
mod event;
mod notification;
mod reward;
mod step;

pub use book::{EventBook, EventDef};
pub use condition::{EventCondition, ItemCount};
pub use error::{Error, Result};
pub use event::{GameEvent, LanguageMap, PlaybackState};
pub use notification::{Notification, NotificationKind, SubscriberId};
pub use reward::{apply_rewards, EventReward};
pub use step::EventStep;
