//! Session orchestration over the active save slot

use crate::error::{Error, Result};
use reminiscence_catalog::ItemCatalog;
use reminiscence_core::{EventId, ItemId};
use reminiscence_event::{apply_rewards, EventBook, PlaybackState};
use reminiscence_save::{GameSlot, SaveStore, Storage};
use tracing::{debug, info};

/// Drives events and inventory changes for one save slot at a time.
///
/// Every change to the slot is written back through the store immediately.
pub struct Director<S: Storage> {
    store: SaveStore<S>,
    catalog: ItemCatalog,
    events: EventBook,
    active_slot: usize,
}

impl<S: Storage> Director<S> {
    /// Create a director on slot 0; call `load` before playing.
    pub fn new(store: SaveStore<S>, catalog: ItemCatalog, events: EventBook) -> Self {
        Self {
            store,
            catalog,
            events,
            active_slot: 0,
        }
    }

    /// Load saves and open the auto-load slot, if one is set.
    ///
    /// Returns whether a prior save existed.
    pub fn load(&mut self) -> Result<bool> {
        let restored = self.store.load()?.is_some();
        if let Some(index) = self.store.auto_load() {
            self.switch_slot(index)?;
        }
        Ok(restored)
    }

    pub fn store(&self) -> &SaveStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SaveStore<S> {
        &mut self.store
    }

    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    pub fn events(&self) -> &EventBook {
        &self.events
    }

    /// Mutable access, e.g. to subscribe to an event's notifications
    pub fn events_mut(&mut self) -> &mut EventBook {
        &mut self.events
    }

    pub fn active_slot(&self) -> usize {
        self.active_slot
    }

    /// Current state of the active slot
    pub fn slot(&self) -> Result<GameSlot> {
        Ok(self.store.slot(self.active_slot)?)
    }

    fn put(&mut self, slot: &GameSlot) -> Result<()> {
        Ok(self.store.put_slot(self.active_slot, slot)?)
    }

    /// Make another slot active.
    ///
    /// All playback is reset to `Idle`; an event left ongoing in the new slot
    /// restarts from its first step on the next `advance`.
    pub fn switch_slot(&mut self, index: usize) -> Result<()> {
        self.store.slot(index)?;
        for event in self.events.iter_mut() {
            event.terminate();
        }
        self.active_slot = index;
        info!(slot = index, "Switched save slot");
        Ok(())
    }

    /// Ids of events that may start now
    pub fn eligible_events(&self) -> Result<Vec<EventId>> {
        let slot = self.slot()?;
        Ok(self
            .events
            .eligible(&slot)
            .map(|event| event.id().clone())
            .collect())
    }

    /// The event mid-playback in the active slot
    pub fn ongoing_event(&self) -> Result<Option<EventId>> {
        Ok(self.slot()?.ongoing_event)
    }

    /// Start an eligible event and play its first step.
    pub fn begin(&mut self, id: &str) -> Result<PlaybackState> {
        let mut slot = self.slot()?;
        if let Some(current) = &slot.ongoing_event {
            return Err(Error::EventInProgress(current.to_string()));
        }
        if self.events.get(id).is_none() {
            return Err(Error::UnknownEvent(id.to_string()));
        }
        if !self.events.eligible(&slot).any(|event| event.id().as_str() == id) {
            return Err(Error::EventNotEligible(id.to_string()));
        }

        slot.ongoing_event = Some(EventId::new(id));
        self.put(&slot)?;
        if let Some(event) = self.events.get_mut(id) {
            event.terminate();
        }
        info!(event = id, slot = self.active_slot, "Event started");
        self.advance()
    }

    /// Play the next step of the ongoing event.
    ///
    /// When the last step is reached the rewards are applied in order, the
    /// event is recorded as completed and the slot is saved. Repeatable
    /// events are reset so they can be played again.
    ///
    /// If saving the completed slot fails the event is reset to `Idle` and
    /// stays ongoing, so the next `advance` restarts it from its first step.
    pub fn advance(&mut self) -> Result<PlaybackState> {
        let mut slot = self.slot()?;
        let id = slot.ongoing_event.clone().ok_or(Error::NoOngoingEvent)?;
        let event = self
            .events
            .get_mut(id.as_str())
            .ok_or_else(|| Error::UnknownEvent(id.to_string()))?;

        if event.state() == PlaybackState::Completed {
            event.terminate();
        }
        let state = event.play();
        if state != PlaybackState::Completed {
            return Ok(state);
        }

        apply_rewards(event.rewards(), &mut slot);
        slot.record_completion(id.clone());
        slot.ongoing_event = None;
        if event.is_repeatable() {
            event.terminate();
        }
        if let Err(err) = self.store.put_slot(self.active_slot, &slot) {
            event.terminate();
            return Err(err.into());
        }
        info!(event = %id, slot = self.active_slot, "Event completed");
        Ok(state)
    }

    /// Drop the ongoing event without granting anything.
    pub fn abandon(&mut self) -> Result<EventId> {
        let mut slot = self.slot()?;
        let id = slot.ongoing_event.take().ok_or(Error::NoOngoingEvent)?;
        if let Some(event) = self.events.get_mut(id.as_str()) {
            event.terminate();
        }
        self.put(&slot)?;
        info!(event = %id, "Event abandoned");
        Ok(id)
    }

    /// Buy `batches` purchase batches of an ingredient; returns units received.
    ///
    /// One batch costs the item's price and yields its `buy_count` units.
    pub fn buy(&mut self, item: &str, batches: u32) -> Result<u32> {
        let def = self.catalog.require(item)?;
        if def.is_product() || def.buy_count.is_none() {
            return Err(Error::NotForSale(item.to_string()));
        }
        let cost = def.price * f64::from(batches);
        let units = def.batch_size().saturating_mul(batches);

        let mut slot = self.slot()?;
        if slot.money < cost {
            return Err(Error::InsufficientFunds {
                needed: cost,
                available: slot.money,
            });
        }
        slot.money -= cost;
        let held = slot.inventory.entry(ItemId::new(item)).or_insert(0);
        *held = held.saturating_add(units);
        self.store.put_slot(self.active_slot, &slot)?;
        debug!(item, units, cost, "Bought ingredients");
        Ok(units)
    }

    /// Craft one batch of a product; returns units produced.
    pub fn craft(&mut self, item: &str) -> Result<u32> {
        let def = self.catalog.require(item)?;
        let recipe = def
            .recipe
            .as_ref()
            .ok_or_else(|| Error::NotCraftable(item.to_string()))?;

        let mut slot = self.slot()?;
        if !slot.knows_recipe(item) {
            return Err(Error::RecipeLocked(item.to_string()));
        }
        if !def.can_craft(&slot.inventory) {
            return Err(Error::MissingIngredients(item.to_string()));
        }

        for (ingredient, required) in recipe {
            if let Some(held) = slot.inventory.get_mut(ingredient) {
                *held -= required;
            }
        }
        let units = def.yield_count();
        let held = slot.inventory.entry(ItemId::new(item)).or_insert(0);
        *held = held.saturating_add(units);
        self.store.put_slot(self.active_slot, &slot)?;
        debug!(item, units, "Crafted");
        Ok(units)
    }

    /// Sell units of an item at its catalog price; returns the income.
    pub fn sell(&mut self, item: &str, count: u32) -> Result<f64> {
        let def = self.catalog.require(item)?;
        let mut slot = self.slot()?;
        let available = slot.count(item);
        if available < count {
            return Err(Error::InsufficientStock {
                item: item.to_string(),
                needed: count,
                available,
            });
        }

        let income = def.price * f64::from(count);
        slot.inventory.insert(ItemId::new(item), available - count);
        slot.money += income;
        self.store.put_slot(self.active_slot, &slot)?;
        debug!(item, count, income, "Sold");
        Ok(income)
    }
}
