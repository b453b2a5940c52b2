// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Multi-subscriber notification.
//!
//! Interactors and interactables publish their state changes through an [`EventHub`].
//! Subscribers receive each event by reference, in emission order.
//! The relative call order between *different* subscribers is not part of the contract.
//!
//! ```
//! use core::cell::Cell;
//! use std::rc::Rc;
//! use understory_interaction::event::EventHub;
//!
//! let seen = Rc::new(Cell::new(0));
//! let mut hub: EventHub<u32> = EventHub::new();
//! let sink = seen.clone();
//! let sub = hub.subscribe(move |v: &u32| sink.set(sink.get() + *v));
//! hub.emit(&2);
//! assert!(hub.unsubscribe(sub));
//! hub.emit(&5);
//! assert_eq!(seen.get(), 2);
//! ```

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::id::{InteractableId, InteractorId};
use crate::state::{InteractableState, InteractorState};

/// Token returned by [`EventHub::subscribe`], used to unsubscribe.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct SubscriptionId(u32);

type Subscriber<E> = Box<dyn FnMut(&E)>;

/// A list of subscribers for one event type.
pub struct EventHub<E> {
    subscribers: Vec<(SubscriptionId, Subscriber<E>)>,
    next: u32,
}

impl<E> Default for EventHub<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> core::fmt::Debug for EventHub<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventHub")
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

impl<E> EventHub<E> {
    /// Create a hub with no subscribers.
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            next: 0,
        }
    }

    /// Register a subscriber. It stays registered until [`EventHub::unsubscribe`].
    ///
    /// Subscribers must not reach back into the registry or interactor that is emitting;
    /// they run while that object is mid-update.
    pub fn subscribe(&mut self, f: impl FnMut(&E) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next);
        self.next = self.next.wrapping_add(1);
        self.subscribers.push((id, Box::new(f)));
        id
    }

    /// Remove a subscriber. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        before != self.subscribers.len()
    }

    /// Deliver `event` to every subscriber.
    pub fn emit(&mut self, event: &E) {
        for (_, f) in &mut self.subscribers {
            f(event);
        }
    }

    /// Number of registered subscribers.
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Returns true if nobody is listening.
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

/// A state transition, carrying the previous and the new value.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct StateChange<S> {
    /// State before the transition.
    pub previous: S,
    /// State after the transition.
    pub new: S,
}

/// Notifications published by an [`Interactable`](crate::Interactable).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InteractableEvent {
    /// The derived state changed.
    StateChanged(StateChange<InteractableState>),
    /// An interactor started hovering.
    InteractorAdded(InteractorId),
    /// An interactor stopped hovering.
    InteractorRemoved(InteractorId),
    /// An interactor started selecting.
    SelectingInteractorAdded(InteractorId),
    /// An interactor stopped selecting.
    SelectingInteractorRemoved(InteractorId),
    /// The number of hovering interactors changed.
    InteractorCountChanged(usize),
    /// The number of selecting interactors changed.
    SelectingInteractorCountChanged(usize),
}

/// Notifications published by an interactor.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InteractorEvent {
    /// The interactor changed state.
    StateChanged(StateChange<InteractorState>),
    /// The interactor now hovers this interactable.
    InteractableSet(InteractableId),
    /// The interactor no longer hovers this interactable.
    InteractableUnset(InteractableId),
    /// The interactor now selects this interactable.
    InteractableSelected(InteractableId),
    /// The interactor no longer selects this interactable.
    InteractableUnselected(InteractableId),
    /// Preprocessing for this tick finished.
    Preprocessed,
    /// One processing pass finished.
    Processed,
    /// Postprocessing for this tick finished.
    Postprocessed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;

    #[test]
    fn every_subscriber_sees_every_event() {
        let a = Rc::new(RefCell::new(Vec::new()));
        let b = Rc::new(RefCell::new(Vec::new()));
        let mut hub = EventHub::new();
        let (sa, sb) = (a.clone(), b.clone());
        hub.subscribe(move |e: &u8| sa.borrow_mut().push(*e));
        hub.subscribe(move |e: &u8| sb.borrow_mut().push(*e));
        hub.emit(&1);
        hub.emit(&2);
        assert_eq!(*a.borrow(), vec![1, 2]);
        assert_eq!(*b.borrow(), vec![1, 2]);
        assert_eq!(hub.len(), 2);
    }

    #[test]
    fn unsubscribe_is_idempotent() {
        let mut hub: EventHub<()> = EventHub::new();
        let id = hub.subscribe(|_| {});
        assert!(hub.unsubscribe(id));
        assert!(!hub.unsubscribe(id));
        assert!(hub.is_empty());
    }
}
