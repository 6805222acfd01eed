//! Event definitions and the RON loader

use crate::condition::EventCondition;
use crate::error::{Error, Result};
use crate::event::{GameEvent, LanguageMap};
use crate::reward::EventReward;
use crate::step::EventStep;
use indexmap::IndexMap;
use reminiscence_core::EventId;
use reminiscence_save::GameSlot;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Serializable definition of a story event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDef {
    /// Unique identifier for this event
    pub id: EventId,
    /// Steps played in order
    #[serde(default)]
    pub sequence: Vec<EventStep>,
    /// When this event may start
    #[serde(default)]
    pub condition: EventCondition,
    /// Locale strings for step text
    #[serde(default)]
    pub language_map: LanguageMap,
    /// Granted on completion, in order
    #[serde(default)]
    pub rewards: Vec<EventReward>,
    /// Whether the event can be replayed after completion
    #[serde(default)]
    pub repeatable: bool,
}

impl From<EventDef> for GameEvent {
    fn from(def: EventDef) -> Self {
        let mut event = GameEvent::new(def.id)
            .with_condition(def.condition)
            .with_lang(def.language_map);
        for step in def.sequence {
            match step {
                EventStep::Dialog { name, text, icon } => event.dialog(name, text, icon),
                EventStep::Text(content) => event.text(content),
            };
        }
        for reward in def.rewards {
            event.reward(reward);
        }
        event.set_repeatable(def.repeatable);
        event
    }
}

/// All authored events, keyed by id in authoring order
#[derive(Debug, Default)]
pub struct EventBook {
    events: IndexMap<EventId, GameEvent>,
}

impl EventBook {
    /// Create an empty book
    pub fn new() -> Self {
        Self::default()
    }

    /// Load events from a RON string of the form `(events: [...])`
    pub fn load_str(&mut self, content: &str) -> Result<()> {
        #[derive(Deserialize)]
        struct EventFile {
            events: Vec<EventDef>,
        }

        let file: EventFile = ron::from_str(content)?;
        for def in file.events {
            self.insert(def.into())?;
        }
        Ok(())
    }

    /// Load events from a RON file
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let content = fs::read_to_string(path)?;
        self.load_str(&content)
    }

    /// Register an event
    pub fn insert(&mut self, event: GameEvent) -> Result<()> {
        let id = event.id().clone();
        if self.events.contains_key(&id) {
            return Err(Error::DuplicateEvent(id.to_string()));
        }
        self.events.insert(id, event);
        Ok(())
    }

    /// Check that every prerequisite names a known event
    pub fn validate(&self) -> Result<()> {
        for event in self.events.values() {
            for required in &event.condition().event_completed {
                if !self.events.contains_key(required) {
                    return Err(Error::UnknownPrerequisite {
                        event: event.id().to_string(),
                        required: required.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&GameEvent> {
        self.events.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut GameEvent> {
        self.events.get_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut GameEvent> {
        self.events.values_mut()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events whose condition holds for `slot`.
    ///
    /// Completed non-repeatable events are excluded, as are events with no
    /// steps since they can never complete.
    pub fn eligible<'a>(&'a self, slot: &'a GameSlot) -> impl Iterator<Item = &'a GameEvent> {
        self.events.values().filter(move |event| {
            !event.sequence().is_empty()
                && (event.is_repeatable() || !slot.has_completed(event.id()))
                && event.condition().is_met(slot)
        })
    }
}
