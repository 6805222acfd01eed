//! Gating conditions evaluated against a save slot

use reminiscence_core::{EventId, ItemId};
use reminiscence_save::GameSlot;
use serde::{Deserialize, Serialize};

/// Minimum held count of an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCount {
    pub item: ItemId,
    pub count: u32,
}

/// Predicate gating an event; absent fields do not constrain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCondition {
    /// Earliest day
    #[serde(default)]
    pub day: Option<u32>,
    /// Earliest in-day tick
    #[serde(default)]
    pub time: Option<u32>,
    /// Items the slot must hold
    #[serde(default)]
    pub has_item: Vec<ItemCount>,
    /// Events that must be completed first
    #[serde(default)]
    pub event_completed: Vec<EventId>,
}

impl EventCondition {
    /// An unconstrained condition
    pub fn new() -> Self {
        Self::default()
    }

    /// Require at least this day
    pub fn from_day(mut self, day: u32) -> Self {
        self.day = Some(day);
        self
    }

    /// Require at least this in-day tick
    pub fn from_time(mut self, time: u32) -> Self {
        self.time = Some(time);
        self
    }

    /// Require holding at least `count` of `item`
    pub fn holding(mut self, item: impl Into<ItemId>, count: u32) -> Self {
        self.has_item.push(ItemCount {
            item: item.into(),
            count,
        });
        self
    }

    /// Require another event to be completed
    pub fn after(mut self, event: impl Into<EventId>) -> Self {
        self.event_completed.push(event.into());
        self
    }

    /// Conjunction over the fields that are present
    pub fn is_met(&self, slot: &GameSlot) -> bool {
        self.day.map_or(true, |day| day <= slot.day)
            && self.time.map_or(true, |time| time <= slot.time)
            && self
                .has_item
                .iter()
                .all(|need| slot.count(need.item.as_str()) >= need.count)
            && self
                .event_completed
                .iter()
                .all(|id| slot.has_completed(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(day: u32, flour: u32) -> GameSlot {
        let mut slot = GameSlot {
            day,
            ..GameSlot::default()
        };
        slot.inventory.insert("flour".into(), flour);
        slot
    }

    #[test]
    fn test_day_and_item_thresholds() {
        let condition = EventCondition::new().from_day(3).holding("flour", 2);

        assert!(condition.is_met(&slot(5, 2)));
        assert!(!condition.is_met(&slot(5, 1)));
        assert!(!condition.is_met(&slot(2, 5)));
    }

    #[test]
    fn test_empty_condition_always_holds() {
        assert!(EventCondition::new().is_met(&GameSlot::default()));
    }

    #[test]
    fn test_time_threshold() {
        let condition = EventCondition::new().from_time(3);
        let mut slot = GameSlot::default();
        assert!(!condition.is_met(&slot));
        slot.time = 3;
        assert!(condition.is_met(&slot));
    }

    #[test]
    fn test_missing_item_counts_as_zero() {
        let condition = EventCondition::new().holding("vanilla", 1);
        assert!(!condition.is_met(&GameSlot::default()));
        assert!(EventCondition::new().holding("vanilla", 0).is_met(&GameSlot::default()));
    }

    #[test]
    fn test_prerequisite_events() {
        let condition = EventCondition::new().after("opening_day").after("first_sale");
        let mut slot = GameSlot::default();
        slot.record_completion("opening_day".into());
        assert!(!condition.is_met(&slot));
        slot.record_completion("first_sale".into());
        assert!(condition.is_met(&slot));
    }

    #[test]
    fn test_condition_ron() {
        let condition: EventCondition = ron::from_str(
            r#"(day: Some(3), has_item: [(item: "flour", count: 2)], event_completed: ["intro"])"#,
        )
        .unwrap();
        assert_eq!(condition.day, Some(3));
        assert_eq!(condition.time, None);
        assert_eq!(condition.has_item[0].count, 2);
    }
}
