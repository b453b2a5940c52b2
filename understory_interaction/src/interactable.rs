// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Passive interaction targets: hover/select membership and capacity.
//!
//! ## Membership
//!
//! An [`Interactable`] keeps two ordered sets of [`InteractorId`]s: the hovering
//! interactors and the selecting interactors. They are tracked independently.
//! All four mutators are idempotent: adding a member twice or removing an absent
//! member changes nothing and emits nothing.
//!
//! ## State
//!
//! The [`InteractableState`] is a pure function of the two counts
//! (see [`InteractableState::from_counts`]), overridden to `Disabled` while the
//! interactable is not enabled in its registry.
//!
//! ## Capacity
//!
//! [`Interactable::can_be_selected_by`] is the gate used by candidate pruning and by
//! selection. Adds that would exceed a bounded capacity are refused, so the counts
//! never exceed their limits.

use alloc::vec::Vec;

use crate::config::{Capacity, InteractableConfig};
use crate::event::{EventHub, InteractableEvent, StateChange};
use crate::id::{InteractableId, InteractorId};
use crate::state::InteractableState;

/// A target that interactors hover and select, carrying an application payload `T`.
///
/// Interactables live inside an [`InteractableRegistry`](crate::InteractableRegistry);
/// enabling and disabling goes through the registry so that registration and state
/// never disagree.
pub struct Interactable<T> {
    id: InteractableId,
    data: T,
    config: InteractableConfig,
    state: InteractableState,
    interactors: Vec<InteractorId>,
    selecting: Vec<InteractorId>,
    events: EventHub<InteractableEvent>,
}

impl<T: core::fmt::Debug> core::fmt::Debug for Interactable<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Interactable")
            .field("id", &self.id)
            .field("data", &self.data)
            .field("config", &self.config)
            .field("state", &self.state)
            .field("interactors", &self.interactors)
            .field("selecting", &self.selecting)
            .finish_non_exhaustive()
    }
}

impl<T> Interactable<T> {
    pub(crate) fn new(id: InteractableId, data: T, config: InteractableConfig) -> Self {
        Self {
            id,
            data,
            config,
            state: InteractableState::Disabled,
            interactors: Vec::new(),
            selecting: Vec::new(),
            events: EventHub::new(),
        }
    }

    /// Registry handle of this interactable.
    pub fn id(&self) -> InteractableId {
        self.id
    }

    /// Current aggregated state.
    pub fn state(&self) -> InteractableState {
        self.state
    }

    /// Returns true unless the interactable is disabled.
    pub fn is_enabled(&self) -> bool {
        self.state != InteractableState::Disabled
    }

    /// Application payload.
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Mutable application payload.
    pub fn data_mut(&mut self) -> &mut T {
        &mut self.data
    }

    /// Capacity configuration.
    pub fn config(&self) -> InteractableConfig {
        self.config
    }

    /// Subscribe to or unsubscribe from this interactable's notifications.
    pub fn events_mut(&mut self) -> &mut EventHub<InteractableEvent> {
        &mut self.events
    }

    /// Hovering interactors, in arrival order.
    pub fn interactors(&self) -> &[InteractorId] {
        &self.interactors
    }

    /// Selecting interactors, in arrival order.
    pub fn selecting_interactors(&self) -> &[InteractorId] {
        &self.selecting
    }

    /// Number of hovering interactors.
    pub fn interactors_count(&self) -> usize {
        self.interactors.len()
    }

    /// Number of selecting interactors.
    pub fn selecting_interactors_count(&self) -> usize {
        self.selecting.len()
    }

    /// Returns true if `interactor` is in the hover set.
    pub fn is_hovered_by(&self, interactor: InteractorId) -> bool {
        self.interactors.contains(&interactor)
    }

    /// Returns true if `interactor` is in the select set.
    pub fn is_selected_by(&self, interactor: InteractorId) -> bool {
        self.selecting.contains(&interactor)
    }

    /// Whether `interactor` may select this interactable right now.
    ///
    /// False while disabled, while the selecting set is at capacity, or while the
    /// hover set is at capacity and `interactor` is not already in it.
    pub fn can_be_selected_by(&self, interactor: InteractorId) -> bool {
        if !self.is_enabled() {
            return false;
        }
        if self.config.max_selecting_interactors.is_full(self.selecting.len()) {
            return false;
        }
        if self.config.max_interactors.is_full(self.interactors.len())
            && !self.is_hovered_by(interactor)
        {
            return false;
        }
        true
    }

    /// Capacity check used while computing candidates.
    ///
    /// An interactor that already hovers this interactable is already counted, so it
    /// keeps it as a candidate even once the selecting set is full; selection itself
    /// is still gated by [`Interactable::can_be_selected_by`].
    pub fn accepts_candidate(&self, interactor: InteractorId) -> bool {
        if !self.is_enabled() {
            return false;
        }
        self.is_hovered_by(interactor) || self.can_be_selected_by(interactor)
    }

    /// Limit the hover set. Members beyond a lowered limit are evicted, newest first.
    pub fn set_max_interactors(&mut self, max: Capacity) {
        self.config.max_interactors = max;
        if let Capacity::Limited(n) = max {
            while self.interactors.len() > n {
                let Some(&last) = self.interactors.last() else {
                    break;
                };
                self.remove_interactor(last);
            }
        }
    }

    /// Limit the select set. Members beyond a lowered limit are evicted, newest first.
    pub fn set_max_selecting_interactors(&mut self, max: Capacity) {
        self.config.max_selecting_interactors = max;
        if let Capacity::Limited(n) = max {
            while self.selecting.len() > n {
                let Some(&last) = self.selecting.last() else {
                    break;
                };
                self.remove_selecting_interactor(last);
            }
        }
    }

    /// Add `interactor` to the hover set.
    ///
    /// Returns true if it was added. Duplicates are a no-op; adds while disabled or at
    /// capacity are refused.
    pub fn add_interactor(&mut self, interactor: InteractorId) -> bool {
        if !self.is_enabled() || self.is_hovered_by(interactor) {
            return false;
        }
        if self.config.max_interactors.is_full(self.interactors.len()) {
            tracing::trace!(interactable = %self.id, %interactor, "hover refused at capacity");
            return false;
        }
        self.interactors.push(interactor);
        tracing::debug!(interactable = %self.id, %interactor, "interactor added");
        self.events
            .emit(&InteractableEvent::InteractorAdded(interactor));
        self.events.emit(&InteractableEvent::InteractorCountChanged(
            self.interactors.len(),
        ));
        self.refresh_state();
        true
    }

    /// Remove `interactor` from the hover set. Returns true if it was a member.
    pub fn remove_interactor(&mut self, interactor: InteractorId) -> bool {
        let Some(pos) = self.interactors.iter().position(|&i| i == interactor) else {
            return false;
        };
        self.interactors.remove(pos);
        tracing::debug!(interactable = %self.id, %interactor, "interactor removed");
        self.events
            .emit(&InteractableEvent::InteractorRemoved(interactor));
        self.events.emit(&InteractableEvent::InteractorCountChanged(
            self.interactors.len(),
        ));
        self.refresh_state();
        true
    }

    /// Add `interactor` to the select set.
    ///
    /// Returns true if it was added. Duplicates are a no-op; adds while disabled or at
    /// capacity are refused.
    pub fn add_selecting_interactor(&mut self, interactor: InteractorId) -> bool {
        if !self.is_enabled() || self.is_selected_by(interactor) {
            return false;
        }
        if self
            .config
            .max_selecting_interactors
            .is_full(self.selecting.len())
        {
            tracing::trace!(interactable = %self.id, %interactor, "select refused at capacity");
            return false;
        }
        self.selecting.push(interactor);
        tracing::debug!(interactable = %self.id, %interactor, "selecting interactor added");
        self.events
            .emit(&InteractableEvent::SelectingInteractorAdded(interactor));
        self.events
            .emit(&InteractableEvent::SelectingInteractorCountChanged(
                self.selecting.len(),
            ));
        self.refresh_state();
        true
    }

    /// Remove `interactor` from the select set. Returns true if it was a member.
    pub fn remove_selecting_interactor(&mut self, interactor: InteractorId) -> bool {
        let Some(pos) = self.selecting.iter().position(|&i| i == interactor) else {
            return false;
        };
        self.selecting.remove(pos);
        tracing::debug!(interactable = %self.id, %interactor, "selecting interactor removed");
        self.events
            .emit(&InteractableEvent::SelectingInteractorRemoved(interactor));
        self.events
            .emit(&InteractableEvent::SelectingInteractorCountChanged(
                self.selecting.len(),
            ));
        self.refresh_state();
        true
    }

    /// Evict an interactor known only by id: first from the select set, then from the
    /// hover set. Returns true if it was found in either.
    pub fn remove_interactor_by_id(&mut self, id: InteractorId) -> bool {
        let selecting = self.remove_selecting_interactor(id);
        let hovering = self.remove_interactor(id);
        selecting || hovering
    }

    pub(crate) fn into_data(self) -> T {
        self.data
    }

    /// Leave `Disabled`. Returns true on the transition.
    pub(crate) fn enable(&mut self) -> bool {
        if self.state != InteractableState::Disabled {
            return false;
        }
        self.set_state(InteractableState::Normal);
        true
    }

    /// Evict every selecting interactor, then every hovering interactor, then enter
    /// `Disabled`. Returns true on the transition.
    pub(crate) fn disable(&mut self) -> bool {
        if self.state == InteractableState::Disabled {
            return false;
        }
        while let Some(&first) = self.selecting.first() {
            self.remove_selecting_interactor(first);
        }
        while let Some(&first) = self.interactors.first() {
            self.remove_interactor(first);
        }
        self.set_state(InteractableState::Disabled);
        true
    }

    fn refresh_state(&mut self) {
        if self.state == InteractableState::Disabled {
            return;
        }
        let next = InteractableState::from_counts(self.interactors.len(), self.selecting.len());
        self.set_state(next);
    }

    fn set_state(&mut self, new: InteractableState) {
        let previous = self.state;
        if previous == new {
            return;
        }
        self.state = new;
        tracing::debug!(interactable = %self.id, %previous, %new, "interactable state changed");
        self.events
            .emit(&InteractableEvent::StateChanged(StateChange { previous, new }));
    }
}
