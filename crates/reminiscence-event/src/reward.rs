//! Rewards granted when an event completes

use reminiscence_core::ItemId;
use reminiscence_save::GameSlot;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A typed effect on a save slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventReward {
    /// Add to an inventory count
    Item { name: ItemId, count: i64 },
    /// Set a story flag
    Flag { name: String, value: bool },
    /// Add to money
    Money { amount: f64 },
    /// Unlock a recipe
    Recipe { name: String },
    /// Add to fame
    Fame { amount: f64 },
}

impl EventReward {
    pub fn item(name: impl Into<ItemId>, count: i64) -> Self {
        EventReward::Item {
            name: name.into(),
            count,
        }
    }

    pub fn flag(name: impl Into<String>, value: bool) -> Self {
        EventReward::Flag {
            name: name.into(),
            value,
        }
    }

    pub fn money(amount: f64) -> Self {
        EventReward::Money { amount }
    }

    pub fn recipe(name: impl Into<String>) -> Self {
        EventReward::Recipe { name: name.into() }
    }

    pub fn fame(amount: f64) -> Self {
        EventReward::Fame { amount }
    }

    /// Apply this reward to a slot.
    ///
    /// Inventory counts saturate at zero and `u32::MAX`; money and fame are
    /// added as given.
    pub fn apply(&self, slot: &mut GameSlot) {
        match self {
            EventReward::Item { name, count } => {
                let current = i64::from(slot.count(name.as_str()));
                let target = current.saturating_add(*count);
                let clamped = target.clamp(0, i64::from(u32::MAX));
                if clamped != target {
                    warn!(item = %name, current, count, "Item reward out of range, clamped");
                }
                slot.inventory.insert(name.clone(), clamped as u32);
            }
            EventReward::Flag { name, value } => {
                slot.flags.insert(name.clone(), *value);
            }
            EventReward::Money { amount } => slot.money += amount,
            EventReward::Recipe { name } => {
                slot.recipes.insert(name.clone(), true);
            }
            EventReward::Fame { amount } => slot.fame += amount,
        }
    }
}

/// Apply rewards in declared order; earlier rewards are never rolled back
pub fn apply_rewards(rewards: &[EventReward], slot: &mut GameSlot) {
    for reward in rewards {
        reward.apply(slot);
    }
}
