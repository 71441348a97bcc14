//! Session events: the engine's hooks for a presentation layer.
//!
//! Registration is explicit and scoped: the owner of a session subscribes at
//! setup and unsubscribes (or drops the session) at teardown. Nothing here
//! relies on finalization.

use crate::cards::{Card, Choice, ChoiceSide};

/// A notification from the narrative session. Borrows the session's data;
/// listeners copy out whatever they need to keep.
#[derive(Debug)]
pub enum SessionEvent<'a> {
    /// A new card was selected and presented.
    CardSelected { card: &'a Card, week: u32 },
    /// The player committed to a choice.
    ChoiceMade { choice: &'a Choice },
    /// The player is hovering over (or leaving) a choice.
    ChoiceHover {
        choice: &'a Choice,
        entering: bool,
        side: ChoiceSide,
    },
}

/// Handle for an event subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&SessionEvent<'_>)>;

/// Dispatches session events to registered listeners, in subscription order.
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    listeners: Vec<(ListenerId, Listener)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Returns the handle needed to unsubscribe.
    pub fn subscribe(&mut self, listener: impl FnMut(&SessionEvent<'_>) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Deliver an event to every listener.
    pub fn emit(&mut self, event: &SessionEvent<'_>) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
