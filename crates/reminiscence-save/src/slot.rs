//! Typed save document: global settings and per-slot game state

use indexmap::IndexMap;
use reminiscence_catalog::Inventory;
use reminiscence_core::{EventId, ItemId, Value, ValueMap};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of independent save slots
pub const SLOT_COUNT: usize = 5;

/// State of one save game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSlot {
    /// Days played
    pub day: u32,
    /// Discrete in-day tick
    pub time: u32,
    pub money: f64,
    pub fame: f64,
    /// Event currently mid-playback, if any
    pub ongoing_event: Option<EventId>,
    /// Finished events; kept free of duplicates by `record_completion`
    pub completed_events: Vec<EventId>,
    pub inventory: Inventory,
    /// Display shelf; reserved and kept null
    #[serde(default)]
    pub shelf: Value,
    /// Unlocked recipes
    pub recipes: IndexMap<String, bool>,
    pub flags: IndexMap<String, bool>,
    /// Fields this version does not model, carried through untouched
    #[serde(flatten)]
    pub extra: ValueMap,
}

impl Default for GameSlot {
    fn default() -> Self {
        let inventory = [("flour", 20), ("sugar", 10), ("egg", 10), ("butter", 10)]
            .into_iter()
            .map(|(item, count)| (ItemId::new(item), count))
            .collect();
        let mut recipes = IndexMap::new();
        recipes.insert("whiteBread".to_string(), true);

        Self {
            day: 0,
            time: 2,
            money: 99999.0,
            fame: 0.0,
            ongoing_event: None,
            completed_events: Vec::new(),
            inventory,
            shelf: Value::Null,
            recipes,
            flags: IndexMap::new(),
            extra: ValueMap::new(),
        }
    }
}

impl GameSlot {
    /// Held count of an item, zero when absent
    pub fn count(&self, item: &str) -> u32 {
        self.inventory.get(item).copied().unwrap_or(0)
    }

    /// Whether an event id is in the completed set
    pub fn has_completed(&self, id: &EventId) -> bool {
        self.completed_events.contains(id)
    }

    /// Add an event id to the completed set; returns false if already present
    pub fn record_completion(&mut self, id: EventId) -> bool {
        if self.has_completed(&id) {
            return false;
        }
        self.completed_events.push(id);
        true
    }

    /// Whether a recipe has been unlocked
    pub fn knows_recipe(&self, name: &str) -> bool {
        self.recipes.get(name).copied().unwrap_or(false)
    }

    /// Value of a story flag, false when unset
    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }
}

/// Marker for an unused slot, persisted as `{}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmptySlot {}

/// A slot entry in the saves table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SlotEntry {
    Empty(EmptySlot),
    Occupied(Box<GameSlot>),
}

impl SlotEntry {
    /// Whether the slot has never been written
    pub fn is_empty(&self) -> bool {
        matches!(self, SlotEntry::Empty(_))
    }

    /// The stored game, if any
    pub fn game(&self) -> Option<&GameSlot> {
        match self {
            SlotEntry::Empty(_) => None,
            SlotEntry::Occupied(slot) => Some(slot.as_ref()),
        }
    }
}

impl Default for SlotEntry {
    fn default() -> Self {
        SlotEntry::Empty(EmptySlot {})
    }
}

/// Root of the persisted document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsRoot {
    /// Slot index -> game or empty placeholder
    pub saves: BTreeMap<usize, SlotEntry>,
    /// Free-form settings (`language`, ...)
    pub settings: ValueMap,
    /// Slot to open on start-up
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_load: Option<usize>,
}

impl SettingsRoot {
    /// Top-level keys modelled by this type
    pub const FIELDS: [&'static str; 3] = ["saves", "settings", "autoLoad"];

    /// Fresh settings with all slots empty
    pub fn with_language(language: impl Into<String>) -> Self {
        let saves = (0..SLOT_COUNT).map(|i| (i, SlotEntry::default())).collect();
        let mut settings = ValueMap::new();
        settings.insert("language".to_string(), Value::String(language.into()));
        Self {
            saves,
            settings,
            auto_load: None,
        }
    }

    /// Configured language, if set
    pub fn language(&self) -> Option<&str> {
        self.settings.get("language").and_then(|v| v.as_str())
    }
}

/// Overview of a slot for a load/save screen
#[derive(Debug, Clone, PartialEq)]
pub struct SlotSummary {
    pub index: usize,
    pub occupied: bool,
    pub day: u32,
    pub money: f64,
    pub fame: f64,
}

impl SlotSummary {
    pub(crate) fn from_entry(index: usize, entry: Option<&GameSlot>) -> Self {
        match entry {
            Some(slot) => Self {
                index,
                occupied: true,
                day: slot.day,
                money: slot.money,
                fame: slot.fame,
            },
            None => Self {
                index,
                occupied: false,
                day: 0,
                money: 0.0,
                fame: 0.0,
            },
        }
    }
}
