//! One-shot UI events.
//!
//! A `UiEvent` is pending from `set` until somebody calls `consume`. Observers
//! only ever see values that are still pending when they run, so a consumed
//! event is never replayed: not to a late or re-attached observer, and not to
//! a second observer notified by the same `set`. Whoever acts on an event
//! must consume it before yielding.

use crate::core::live::{LiveValue, Subscription};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventSlot<T> {
    Empty,
    Pending(T),
}

impl<T> EventSlot<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, EventSlot::Pending(_))
    }
}

pub struct UiEvent<T> {
    slot: LiveValue<EventSlot<T>>,
}

impl<T> Clone for UiEvent<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Default for UiEvent<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync + 'static> UiEvent<T> {
    pub fn new() -> Self {
        Self {
            slot: LiveValue::new(EventSlot::Empty),
        }
    }

    /// Store a pending value and notify observers. A value that is still
    /// pending is replaced.
    pub fn set(&self, value: T) {
        self.slot.set(EventSlot::Pending(value));
    }

    /// Reset to empty and return what was pending. Consuming an empty event
    /// does nothing and notifies nobody.
    pub fn consume(&self) -> Option<T> {
        let mut taken = None;
        self.slot.update(|slot| match std::mem::replace(slot, EventSlot::Empty) {
            EventSlot::Pending(value) => {
                taken = Some(value);
                true
            }
            EventSlot::Empty => false,
        });
        taken
    }

    pub fn peek(&self) -> Option<T> {
        match self.slot.get() {
            EventSlot::Pending(value) => Some(value),
            EventSlot::Empty => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.slot.with(EventSlot::is_pending)
    }

    /// Call `f` for every pending value, including one still pending at
    /// subscription time. Skipped once another observer has consumed it.
    pub fn observe(&self, f: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        self.slot.observe_latest(move |slot| {
            if let EventSlot::Pending(value) = slot {
                f(value);
            }
        })
    }

    /// Raw slot, for observers that also need to see resets.
    pub fn slot(&self) -> &LiveValue<EventSlot<T>> {
        &self.slot
    }
}
