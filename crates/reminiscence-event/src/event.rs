//! Per-event playback state machine

use crate::condition::EventCondition;
use crate::notification::{Notification, NotificationKind, SubscriberId, Subscribers};
use crate::reward::EventReward;
use crate::step::EventStep;
use indexmap::IndexMap;
use reminiscence_core::EventId;
use std::fmt;
use tracing::{debug, trace};

/// Locale -> (string key -> text)
pub type LanguageMap = IndexMap<String, IndexMap<String, String>>;

/// Where playback stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaybackState {
    /// Nothing played yet (`cursor == 0`)
    Idle,
    /// Somewhere inside the sequence
    Playing,
    /// Every step played (`cursor == len`)
    Completed,
}

/// An authored story event with its playback cursor
///
/// The sequence is expected to be fully authored before the first `play()`.
pub struct GameEvent {
    id: EventId,
    sequence: Vec<EventStep>,
    condition: EventCondition,
    language_map: LanguageMap,
    rewards: Vec<EventReward>,
    repeatable: bool,
    cursor: usize,
    subscribers: Subscribers,
}

impl GameEvent {
    /// Create an empty, non-repeatable event
    pub fn new(id: impl Into<EventId>) -> Self {
        Self {
            id: id.into(),
            sequence: Vec::new(),
            condition: EventCondition::default(),
            language_map: LanguageMap::new(),
            rewards: Vec::new(),
            repeatable: false,
            cursor: 0,
            subscribers: Subscribers::default(),
        }
    }

    // === Authoring ===

    /// Append a dialog step
    pub fn dialog(
        &mut self,
        name: impl Into<String>,
        text: impl Into<String>,
        icon: impl Into<String>,
    ) -> &mut Self {
        self.sequence.push(EventStep::dialog(name, text, icon));
        self
    }

    /// Append a narration step
    pub fn text(&mut self, content: impl Into<String>) -> &mut Self {
        self.sequence.push(EventStep::text(content));
        self
    }

    /// Append a reward
    pub fn reward(&mut self, reward: EventReward) -> &mut Self {
        self.rewards.push(reward);
        self
    }

    /// Replace the gating condition
    pub fn set_condition(&mut self, condition: EventCondition) -> &mut Self {
        self.condition = condition;
        self
    }

    /// Attach the locale map used to render step text
    pub fn lang(&mut self, map: LanguageMap) -> &mut Self {
        self.language_map = map;
        self
    }

    /// Allow replaying after completion
    pub fn set_repeatable(&mut self, repeatable: bool) -> &mut Self {
        self.repeatable = repeatable;
        self
    }

    /// Builder form of `dialog`
    pub fn with_dialog(
        mut self,
        name: impl Into<String>,
        text: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        self.dialog(name, text, icon);
        self
    }

    /// Builder form of `text`
    pub fn with_text(mut self, content: impl Into<String>) -> Self {
        self.text(content);
        self
    }

    /// Builder form of `reward`
    pub fn with_reward(mut self, reward: EventReward) -> Self {
        self.rewards.push(reward);
        self
    }

    /// Builder form of `set_condition`
    pub fn with_condition(mut self, condition: EventCondition) -> Self {
        self.condition = condition;
        self
    }

    /// Builder form of `lang`
    pub fn with_lang(mut self, map: LanguageMap) -> Self {
        self.language_map = map;
        self
    }

    /// Builder form of `set_repeatable(true)`
    pub fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }

    // === Accessors ===

    pub fn id(&self) -> &EventId {
        &self.id
    }

    pub fn sequence(&self) -> &[EventStep] {
        &self.sequence
    }

    pub fn condition(&self) -> &EventCondition {
        &self.condition
    }

    pub fn rewards(&self) -> &[EventReward] {
        &self.rewards
    }

    pub fn language_map(&self) -> &LanguageMap {
        &self.language_map
    }

    pub fn is_repeatable(&self) -> bool {
        self.repeatable
    }

    /// Index of the next step to play
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Current playback state.
    ///
    /// An empty sequence reports `Idle`: it can never start or complete.
    pub fn state(&self) -> PlaybackState {
        if self.cursor == 0 {
            PlaybackState::Idle
        } else if self.cursor >= self.sequence.len() {
            PlaybackState::Completed
        } else {
            PlaybackState::Playing
        }
    }

    /// Look up a string for a locale; no fallback between locales
    pub fn translate(&self, locale: &str, key: &str) -> Option<&str> {
        self.language_map
            .get(locale)
            .and_then(|strings| strings.get(key))
            .map(String::as_str)
    }

    // === Notifications ===

    /// Register a handler; handlers run synchronously in registration order.
    ///
    /// Handlers must not call back into `play()` of the same event.
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriberId
    where
        F: FnMut(&Notification<'_>) + 'static,
    {
        self.subscribers.add(Box::new(handler))
    }

    /// Register a handler for one kind of notification only
    pub fn on<F>(&mut self, kind: NotificationKind, mut handler: F) -> SubscriberId
    where
        F: FnMut(&Notification<'_>) + 'static,
    {
        self.subscribe(move |notification| {
            if notification.kind() == kind {
                handler(notification);
            }
        })
    }

    /// Remove a handler; returns false if it was not registered
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.subscribers.remove(id)
    }

    // === Playback ===

    /// Advance one step.
    ///
    /// Emits `Start` before the first step, `Step` for the step entered, and
    /// `Complete` with the rewards once the last step is entered. A finished
    /// or empty sequence is left untouched.
    pub fn play(&mut self) -> PlaybackState {
        let Self {
            id,
            sequence,
            rewards,
            cursor,
            subscribers,
            ..
        } = self;

        if *cursor >= sequence.len() {
            return self.state();
        }

        if *cursor == 0 {
            trace!(event = %id, "start");
            subscribers.emit(&Notification::Start(id));
        }

        trace!(event = %id, step = *cursor, "step");
        subscribers.emit(&Notification::Step(&sequence[*cursor]));
        *cursor += 1;

        if *cursor == sequence.len() {
            trace!(event = %id, rewards = rewards.len(), "complete");
            subscribers.emit(&Notification::Complete(rewards.as_slice()));
        }

        self.state()
    }

    /// Reset to `Idle` without notifying; already delivered steps stand
    pub fn terminate(&mut self) {
        if self.cursor != 0 {
            debug!(event = %self.id, cursor = self.cursor, "Playback reset");
        }
        self.cursor = 0;
    }
}

impl fmt::Debug for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameEvent")
            .field("id", &self.id)
            .field("sequence", &self.sequence)
            .field("condition", &self.condition)
            .field("rewards", &self.rewards)
            .field("repeatable", &self.repeatable)
            .field("cursor", &self.cursor)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
