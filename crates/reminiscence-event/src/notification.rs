//! Synchronous notification channel of a `GameEvent`

use crate::reward::EventReward;
use crate::step::EventStep;
use reminiscence_core::EventId;

/// What playback just did, with its payload
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Notification<'a> {
    /// Playback left `Idle`; fired before the first step
    Start(&'a EventId),
    /// A step was entered
    Step(&'a EventStep),
    /// The last step was entered; carries the full reward list in order
    Complete(&'a [EventReward]),
}

/// Payload-free discriminant of a `Notification`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Start,
    Step,
    Complete,
}

impl Notification<'_> {
    /// The kind of this notification
    pub fn kind(&self) -> NotificationKind {
        match self {
            Notification::Start(_) => NotificationKind::Start,
            Notification::Step(_) => NotificationKind::Step,
            Notification::Complete(_) => NotificationKind::Complete,
        }
    }
}

/// Handle returned by `GameEvent::subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub(crate) u64);

pub(crate) type Handler = Box<dyn FnMut(&Notification<'_>)>;

/// Subscribers in registration order
#[derive(Default)]
pub(crate) struct Subscribers {
    handlers: Vec<(SubscriberId, Handler)>,
    next_id: u64,
}

impl Subscribers {
    pub(crate) fn add(&mut self, handler: Handler) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, handler));
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriberId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(existing, _)| *existing != id);
        self.handlers.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Run every handler to completion, in registration order
    pub(crate) fn emit(&mut self, notification: &Notification<'_>) {
        for (_, handler) in self.handlers.iter_mut() {
            handler(notification);
        }
    }
}
