// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Multi-hover interactor group.
//!
//! [`InteractorGroupMulti`] lets several children hover at once (a hand with a poke, a
//! ray and a grab interactor, say) while still allowing only one of them to select.
//!
//! Per iteration, while the group hovers, each child is hovered or unhovered on its own
//! and a select candidate is ranked among the hovering children that want to select.
//! The group leaves hover only when every hovering child wants to. On select, every
//! sibling of the winner is disabled; on unselect they are all re-enabled.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::candidate::{BoxedComparer, CandidateComparer, CandidateProperties};
use crate::capability::ActiveState;
use crate::config::InteractorConfig;
use crate::error::GroupError;
use crate::event::{EventHub, InteractorEvent, StateChange};
use crate::group::{choose_candidate, rank, refresh_children};
use crate::id::InteractorId;
use crate::interactor::Interactor;
use crate::state::InteractorState;

/// Multi-hover, single-select coordination over child interactors.
pub struct InteractorGroupMulti {
    id: InteractorId,
    children: Vec<Box<dyn Interactor>>,
    comparer: Option<BoxedComparer>,
    config: InteractorConfig,
    state: InteractorState,
    active_state: Option<Box<dyn ActiveState>>,
    root_driver: bool,
    candidate_index: Option<usize>,
    select_candidate: Option<usize>,
    selecting_index: Option<usize>,
    events: EventHub<InteractorEvent>,
}

impl core::fmt::Debug for InteractorGroupMulti {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InteractorGroupMulti")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("children", &self.children.len())
            .field("candidate_index", &self.candidate_index)
            .field("select_candidate", &self.select_candidate)
            .field("selecting_index", &self.selecting_index)
            .finish_non_exhaustive()
    }
}

impl InteractorGroupMulti {
    /// Create a group over `children`, in priority order. Children are marked non-root.
    pub fn new(mut children: Vec<Box<dyn Interactor>>) -> Result<Self, GroupError> {
        if children.is_empty() {
            return Err(GroupError::Empty);
        }
        for child in &mut children {
            child.set_root_driver(false);
        }
        Ok(Self {
            id: InteractorId::next(),
            children,
            comparer: None,
            config: InteractorConfig::default(),
            state: InteractorState::Disabled,
            active_state: None,
            root_driver: true,
            candidate_index: None,
            select_candidate: None,
            selecting_index: None,
            events: EventHub::new(),
        })
    }

    /// Rank children with `comparer` instead of list order.
    #[must_use]
    pub fn with_comparer(mut self, comparer: impl CandidateComparer + 'static) -> Self {
        self.comparer = Some(Box::new(comparer));
        self
    }

    /// Gate the whole group on `gate`.
    #[must_use]
    pub fn with_active_state(mut self, gate: impl ActiveState + 'static) -> Self {
        self.active_state = Some(Box::new(gate));
        self
    }

    /// Apply drive settings.
    pub fn with_config(mut self, config: InteractorConfig) -> Result<Self, GroupError> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// The children, in priority order.
    pub fn children(&self) -> &[Box<dyn Interactor>] {
        &self.children
    }

    /// Index of the child whose candidate is the group candidate.
    pub fn candidate_child(&self) -> Option<usize> {
        self.candidate_index
    }

    /// Index of the selecting child.
    pub fn selecting_child(&self) -> Option<usize> {
        self.selecting_index
    }

    /// Indices of the children currently hovering.
    pub fn hovering_children(&self) -> impl Iterator<Item = usize> + '_ {
        self.children
            .iter()
            .enumerate()
            .filter(|(_, c)| c.state() == InteractorState::Hover)
            .map(|(idx, _)| idx)
    }

    fn any_hovering(&self) -> bool {
        self.hovering_children().next().is_some()
    }

    fn set_state(&mut self, new: InteractorState) {
        let previous = self.state;
        if previous == new {
            return;
        }
        self.state = new;
        tracing::debug!(group = %self.id, %previous, %new, "multi group state changed");
        self.events
            .emit(&InteractorEvent::StateChanged(StateChange { previous, new }));
    }

    fn settle_after_release(&mut self) {
        if self.any_hovering() {
            self.set_state(InteractorState::Hover);
        } else {
            self.set_state(InteractorState::Normal);
        }
    }

    /// Follow children that left hover or select on their own.
    fn reconcile(&mut self) {
        match self.state {
            InteractorState::Select => {
                let held = self
                    .selecting_index
                    .is_some_and(|idx| self.children[idx].state() == InteractorState::Select);
                if !held {
                    tracing::debug!(group = %self.id, child = ?self.selecting_index, "selecting child dropped out");
                    self.selecting_index = None;
                    refresh_children(&mut self.children, None);
                    self.settle_after_release();
                }
            }
            InteractorState::Hover if !self.any_hovering() => {
                self.set_state(InteractorState::Normal);
            }
            _ => {}
        }
    }

    /// Hover or unhover each child individually, then rank the select candidate.
    fn update_children_hover(&mut self) {
        for child in &mut self.children {
            match child.state() {
                InteractorState::Normal if child.should_hover() => child.hover(),
                InteractorState::Hover if child.should_unhover() => child.unhover(),
                _ => {}
            }
        }
        self.select_candidate = rank(
            self.comparer.as_deref(),
            self.children
                .iter()
                .enumerate()
                .filter(|(_, c)| c.state() == InteractorState::Hover && c.should_select())
                .map(|(idx, c)| (idx, c.candidate())),
        );
    }
}

impl Interactor for InteractorGroupMulti {
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
        self.candidate_index
            .and_then(|idx| self.children[idx].candidate())
    }

    fn has_interactable(&self) -> bool {
        self.children.iter().any(|c| c.has_interactable())
    }

    fn has_selected_interactable(&self) -> bool {
        self.selecting_index
            .is_some_and(|idx| self.children[idx].has_selected_interactable())
    }

    fn preprocess(&mut self) {
        for child in &mut self.children {
            child.preprocess();
        }
        self.events.emit(&InteractorEvent::Preprocessed);
    }

    fn process(&mut self) {
        for child in &mut self.children {
            if child.state() != InteractorState::Disabled {
                child.process();
            }
        }
        if self.state == InteractorState::Hover {
            self.update_children_hover();
        } else {
            self.select_candidate = None;
        }
        self.events.emit(&InteractorEvent::Processed);
    }

    fn postprocess(&mut self) {
        for child in &mut self.children {
            child.postprocess();
        }
        self.events.emit(&InteractorEvent::Postprocessed);
    }

    fn update_active_state(&mut self) -> bool {
        if !self.active_state.as_ref().is_none_or(|g| g.is_active()) {
            return false;
        }
        refresh_children(&mut self.children, self.selecting_index);
        self.reconcile();
        true
    }

    fn process_candidate(&mut self) {
        self.candidate_index = choose_candidate(&mut self.children, self.comparer.as_deref());
    }

    fn should_hover(&self) -> bool {
        self.state == InteractorState::Normal && self.children.iter().any(|c| c.should_hover())
    }

    fn should_unhover(&self) -> bool {
        self.state == InteractorState::Hover
            && self
                .children
                .iter()
                .filter(|c| c.state() == InteractorState::Hover)
                .all(|c| c.should_unhover())
    }

    fn should_select(&self) -> bool {
        self.state == InteractorState::Hover && self.select_candidate.is_some()
    }

    fn should_unselect(&self) -> bool {
        self.state == InteractorState::Select
            && self
                .selecting_index
                .is_some_and(|idx| self.children[idx].should_unselect())
    }

    fn hover(&mut self) {
        if self.state != InteractorState::Normal {
            return;
        }
        for child in &mut self.children {
            if child.should_hover() {
                child.hover();
            }
        }
        if self.any_hovering() {
            self.set_state(InteractorState::Hover);
        }
    }

    fn unhover(&mut self) {
        if self.state != InteractorState::Hover {
            return;
        }
        for child in &mut self.children {
            if child.state() == InteractorState::Hover {
                child.unhover();
            }
        }
        self.select_candidate = None;
        self.set_state(InteractorState::Normal);
    }

    fn select(&mut self) {
        if self.state != InteractorState::Hover {
            return;
        }
        let Some(idx) = self.select_candidate.take() else {
            return;
        };
        self.children[idx].select();
        if self.children[idx].state() != InteractorState::Select {
            tracing::trace!(group = %self.id, child = idx, "child refused select");
            return;
        }
        for (i, sibling) in self.children.iter_mut().enumerate() {
            if i != idx {
                sibling.disable();
            }
        }
        self.selecting_index = Some(idx);
        self.set_state(InteractorState::Select);
    }

    fn unselect(&mut self) {
        if self.state != InteractorState::Select {
            return;
        }
        if let Some(idx) = self.selecting_index.take() {
            self.children[idx].unselect();
        }
        refresh_children(&mut self.children, None);
        self.settle_after_release();
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
        for child in &mut self.children {
            child.disable();
        }
        self.candidate_index = None;
        self.select_candidate = None;
        self.set_state(InteractorState::Disabled);
    }
}
