// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Leaf interactor: the concrete state machine over one registry.
//!
//! ## Overview
//!
//! [`LeafInteractor<T, B>`] owns the relationship bookkeeping (which interactable it
//! hovers and selects) and delegates the kind-specific parts to an
//! [`InteractorBehavior<T>`]: candidate scoring and, optionally, select/unselect
//! decisions that replace the [`Selector`].
//!
//! ## Desynchronisation
//!
//! An interactable can be disabled behind an interactor's back. At preprocess the
//! interactor checks that its hovered and selected interactables still list it; if
//! not, it drops the stale reference and emits `InteractableUnset` /
//! `InteractableUnselected` without touching the interactable again.
//!
//! ## Example
//!
//! ```
//! use understory_interaction::{
//!     Candidates, CandidateProperties, Interactor, InteractorBehavior, InteractorState,
//!     InteractableConfig, InteractableRegistry, LeafInteractor, PulseSelector,
//! };
//!
//! /// Always proposes the first eligible interactable.
//! struct First;
//! impl InteractorBehavior<()> for First {
//!     fn compute_candidate(&mut self, mut c: Candidates<'_, ()>) -> Option<CandidateProperties> {
//!         c.next().map(|it| CandidateProperties::new(it.id(), 0.0))
//!     }
//! }
//!
//! let registry = InteractableRegistry::shared();
//! let target = registry.borrow_mut().insert((), InteractableConfig::default());
//! registry.borrow_mut().enable(target).unwrap();
//!
//! let selector = PulseSelector::new();
//! let mut hand = LeafInteractor::new(registry.clone(), First).with_selector(selector.clone());
//! hand.drive();
//! assert_eq!(hand.state(), InteractorState::Hover);
//! selector.request_select();
//! hand.drive();
//! assert_eq!(hand.state(), InteractorState::Select);
//! assert_eq!(hand.selected_interactable(), Some(target));
//! ```

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::capability::{ActiveState, InteractableFilter, Selector, SelectorPulses};
use crate::candidate::CandidateProperties;
use crate::config::InteractorConfig;
use crate::error::ConfigError;
use crate::event::{EventHub, InteractorEvent, StateChange};
use crate::id::{InteractableId, InteractorId};
use crate::interactable::Interactable;
use crate::interactor::Interactor;
use crate::registry::{Candidates, SharedRegistry};
use crate::state::InteractorState;

/// Kind-specific logic plugged into a [`LeafInteractor`].
pub trait InteractorBehavior<T> {
    /// Pick the best candidate from the pruned sequence, or none.
    fn compute_candidate(&mut self, candidates: Candidates<'_, T>) -> Option<CandidateProperties>;

    /// Start-of-tick hook, before selector pulses are sampled.
    fn preprocess(&mut self) {}

    /// Per-iteration hook.
    fn process(&mut self) {}

    /// End-of-tick hook.
    fn postprocess(&mut self) {}

    /// Decide Hover → Select instead of the selector. `None` defers to the selector.
    fn compute_should_select(&self, _hovered: Option<&Interactable<T>>) -> Option<bool> {
        None
    }

    /// Decide Select → Hover/Normal instead of the selector. `None` defers to the selector.
    fn compute_should_unselect(&self, _selected: Option<&Interactable<T>>) -> Option<bool> {
        None
    }

    /// Called after entering Select, with the selected interactable if any.
    fn on_select(&mut self, _selected: Option<&Interactable<T>>) {}

    /// Called after leaving Select.
    fn on_unselect(&mut self) {}
}

/// A concrete interactor over the interactables of one kind `T`.
pub struct LeafInteractor<T, B> {
    id: InteractorId,
    registry: SharedRegistry<T>,
    behavior: B,
    config: InteractorConfig,
    state: InteractorState,
    candidate: Option<CandidateProperties>,
    interactable: Option<InteractableId>,
    selected: Option<InteractableId>,
    active_state: Option<Box<dyn ActiveState>>,
    selector: Option<Box<dyn Selector>>,
    filters: Vec<Box<dyn InteractableFilter<T>>>,
    pulses: SelectorPulses,
    root_driver: bool,
    events: EventHub<InteractorEvent>,
}

impl<T, B: core::fmt::Debug> core::fmt::Debug for LeafInteractor<T, B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LeafInteractor")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("candidate", &self.candidate)
            .field("interactable", &self.interactable)
            .field("selected", &self.selected)
            .field("behavior", &self.behavior)
            .field("filters", &self.filters.len())
            .finish_non_exhaustive()
    }
}

impl<T, B: InteractorBehavior<T>> LeafInteractor<T, B> {
    /// Create an interactor over `registry`, starting `Disabled`.
    ///
    /// Without an active-state gate it is always active; without a selector it never
    /// receives pulses.
    pub fn new(registry: SharedRegistry<T>, behavior: B) -> Self {
        Self {
            id: InteractorId::next(),
            registry,
            behavior,
            config: InteractorConfig::default(),
            state: InteractorState::Disabled,
            candidate: None,
            interactable: None,
            selected: None,
            active_state: None,
            selector: None,
            filters: Vec::new(),
            pulses: SelectorPulses::default(),
            root_driver: true,
            events: EventHub::new(),
        }
    }

    /// Gate this interactor on `gate`.
    #[must_use]
    pub fn with_active_state(mut self, gate: impl ActiveState + 'static) -> Self {
        self.active_state = Some(Box::new(gate));
        self
    }

    /// Take select/unselect pulses from `selector`.
    #[must_use]
    pub fn with_selector(mut self, selector: impl Selector + 'static) -> Self {
        self.selector = Some(Box::new(selector));
        self
    }

    /// Append an eligibility filter; all filters must pass.
    #[must_use]
    pub fn with_filter(mut self, filter: impl InteractableFilter<T> + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Apply drive settings.
    pub fn with_config(mut self, config: InteractorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// The registry this interactor draws candidates from.
    pub fn registry(&self) -> &SharedRegistry<T> {
        &self.registry
    }

    /// Currently hovered interactable.
    pub fn interactable(&self) -> Option<InteractableId> {
        self.interactable
    }

    /// Currently selected interactable.
    pub fn selected_interactable(&self) -> Option<InteractableId> {
        self.selected
    }

    /// The plugged-in behavior.
    pub fn behavior(&self) -> &B {
        &self.behavior
    }

    /// The plugged-in behavior, mutably.
    pub fn behavior_mut(&mut self) -> &mut B {
        &mut self.behavior
    }

    fn set_state(&mut self, new: InteractorState) {
        let previous = self.state;
        if previous == new {
            return;
        }
        self.state = new;
        tracing::debug!(interactor = %self.id, %previous, %new, "interactor state changed");
        self.events
            .emit(&InteractorEvent::StateChanged(StateChange { previous, new }));
    }

    /// Drop references the interactables no longer agree with.
    fn reconcile(&mut self) {
        let (stale_selected, stale_hovered) = {
            let reg = self.registry.borrow();
            let selected = self
                .selected
                .filter(|&id| !reg.get(id).is_some_and(|it| it.is_selected_by(self.id)));
            let hovered = self
                .interactable
                .filter(|&id| !reg.get(id).is_some_and(|it| it.is_hovered_by(self.id)));
            (selected, hovered)
        };
        if let Some(id) = stale_selected {
            tracing::warn!(interactor = %self.id, interactable = %id, "dropping stale selection");
            self.selected = None;
            self.events
                .emit(&InteractorEvent::InteractableUnselected(id));
        }
        if let Some(id) = stale_hovered {
            tracing::warn!(interactor = %self.id, interactable = %id, "dropping stale hover");
            self.interactable = None;
            self.events.emit(&InteractorEvent::InteractableUnset(id));
        }
    }

    fn unset_interactable(&mut self) {
        let Some(id) = self.interactable.take() else {
            return;
        };
        if let Some(it) = self.registry.borrow_mut().get_mut(id) {
            it.remove_interactor(self.id);
        }
        self.events.emit(&InteractorEvent::InteractableUnset(id));
    }

    fn unselect_interactable(&mut self) {
        let Some(id) = self.selected.take() else {
            return;
        };
        if let Some(it) = self.registry.borrow_mut().get_mut(id) {
            if it.is_selected_by(self.id) {
                it.remove_selecting_interactor(self.id);
            }
        }
        self.events
            .emit(&InteractorEvent::InteractableUnselected(id));
    }
}

impl<T, B: InteractorBehavior<T>> Interactor for LeafInteractor<T, B> {
    fn id(&self) -> InteractorId {
        self.id
    }

    fn state(&self) -> InteractorState {
        self.state
    }

    fn max_iterations_per_frame(&self) -> usize {
        self.config.max_iterations_per_frame
    }

    fn is_root_driver(&self) -> bool {
        self.root_driver
    }

    fn set_root_driver(&mut self, root: bool) {
        self.root_driver = root;
    }

    fn events_mut(&mut self) -> &mut EventHub<InteractorEvent> {
        &mut self.events
    }

    fn candidate(&self) -> Option<CandidateProperties> {
        self.candidate
    }

    fn has_interactable(&self) -> bool {
        self.interactable.is_some()
    }

    fn has_selected_interactable(&self) -> bool {
        self.selected.is_some()
    }

    fn preprocess(&mut self) {
        self.behavior.preprocess();
        self.pulses = match self.selector.as_mut() {
            Some(s) => s.poll(),
            None => SelectorPulses::default(),
        };
        self.reconcile();
        self.events.emit(&InteractorEvent::Preprocessed);
    }

    fn process(&mut self) {
        self.behavior.process();
        self.events.emit(&InteractorEvent::Processed);
    }

    fn postprocess(&mut self) {
        self.behavior.postprocess();
        // Pulses only live for the tick they arrived in.
        self.pulses = SelectorPulses::default();
        self.events.emit(&InteractorEvent::Postprocessed);
    }

    fn update_active_state(&mut self) -> bool {
        self.active_state.as_ref().is_none_or(|g| g.is_active())
    }

    fn process_candidate(&mut self) {
        let reg = self.registry.borrow();
        let candidates = reg.list_for(self.id, &self.filters);
        self.candidate = self.behavior.compute_candidate(candidates);
    }

    fn should_hover(&self) -> bool {
        self.state == InteractorState::Normal && self.candidate.is_some()
    }

    fn should_unhover(&self) -> bool {
        if self.state != InteractorState::Hover {
            return false;
        }
        match self.candidate {
            None => true,
            Some(c) => Some(c.interactable) != self.interactable,
        }
    }

    fn should_select(&self) -> bool {
        if self.state != InteractorState::Hover {
            return false;
        }
        let reg = self.registry.borrow();
        let hovered = self.interactable.and_then(|id| reg.get(id));
        self.behavior
            .compute_should_select(hovered)
            .unwrap_or(self.pulses.select)
    }

    fn should_unselect(&self) -> bool {
        if self.state != InteractorState::Select {
            return false;
        }
        let reg = self.registry.borrow();
        let selected = self.selected.and_then(|id| reg.get(id));
        self.behavior
            .compute_should_unselect(selected)
            .unwrap_or(self.pulses.unselect)
    }

    fn hover(&mut self) {
        if self.state != InteractorState::Normal {
            return;
        }
        let Some(candidate) = self.candidate else {
            return;
        };
        let target = candidate.interactable;
        let accepted = match self.registry.borrow_mut().get_mut(target) {
            Some(it) => it.is_hovered_by(self.id) || it.add_interactor(self.id),
            None => false,
        };
        if !accepted {
            tracing::trace!(interactor = %self.id, interactable = %target, "hover refused");
            return;
        }
        self.interactable = Some(target);
        self.events.emit(&InteractorEvent::InteractableSet(target));
        self.set_state(InteractorState::Hover);
    }

    fn unhover(&mut self) {
        if self.state != InteractorState::Hover {
            return;
        }
        self.unset_interactable();
        self.set_state(InteractorState::Normal);
    }

    fn select(&mut self) {
        if self.state != InteractorState::Hover {
            return;
        }
        self.pulses.select = false;
        if let Some(target) = self.interactable {
            let mut reg = self.registry.borrow_mut();
            match reg.get_mut(target) {
                Some(it) if it.is_selected_by(self.id) || it.can_be_selected_by(self.id) => {
                    it.add_selecting_interactor(self.id);
                    self.selected = Some(target);
                }
                Some(_) => {
                    tracing::debug!(
                        interactor = %self.id,
                        interactable = %target,
                        "select rejected by capacity"
                    );
                    return;
                }
                // Stale target: selecting without one is allowed.
                None => {}
            }
        }
        {
            let reg = self.registry.borrow();
            let selected = self.selected.and_then(|id| reg.get(id));
            self.behavior.on_select(selected);
        }
        if let Some(id) = self.selected {
            self.events
                .emit(&InteractorEvent::InteractableSelected(id));
        }
        self.set_state(InteractorState::Select);
    }

    fn unselect(&mut self) {
        if self.state != InteractorState::Select {
            return;
        }
        self.pulses.unselect = false;
        self.unselect_interactable();
        self.behavior.on_unselect();
        if self.interactable.is_some() {
            self.set_state(InteractorState::Hover);
        } else {
            self.set_state(InteractorState::Normal);
        }
    }

    fn enable(&mut self) {
        if self.state == InteractorState::Disabled {
            self.set_state(InteractorState::Normal);
        }
    }

    fn disable(&mut self) {
        if self.state == InteractorState::Disabled {
            return;
        }
        if self.state == InteractorState::Select {
            self.unselect();
        }
        if self.state == InteractorState::Hover {
            self.unhover();
        }
        self.candidate = None;
        self.pulses = SelectorPulses::default();
        self.set_state(InteractorState::Disabled);
    }
}
