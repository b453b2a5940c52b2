// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted interactor and fixed-target leaves used by group tests.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::Cell;

use crate::candidate::CandidateProperties;
use crate::capability::PulseSelector;
use crate::event::{EventHub, InteractorEvent};
use crate::id::{InteractableId, InteractorId};
use crate::interactor::Interactor;
use crate::leaf::{InteractorBehavior, LeafInteractor};
use crate::registry::{Candidates, SharedRegistry};
use crate::state::InteractorState;

/// Proposes one interactable whenever it is eligible.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Reach(pub(crate) InteractableId);

impl InteractorBehavior<u32> for Reach {
    fn compute_candidate(
        &mut self,
        mut candidates: Candidates<'_, u32>,
    ) -> Option<CandidateProperties> {
        candidates
            .find(|it| it.id() == self.0)
            .map(|it| CandidateProperties::new(it.id(), 0.0))
    }
}

/// A boxed leaf reaching for `target`, selecting through `selector`.
pub(crate) fn reaching_leaf(
    registry: &SharedRegistry<u32>,
    target: InteractableId,
    selector: &PulseSelector,
) -> Box<dyn Interactor> {
    Box::new(LeafInteractor::new(registry.clone(), Reach(target)).with_selector(selector.clone()))
}

/// Shared knobs and observations for a [`Scripted`] interactor.
#[derive(Debug)]
pub(crate) struct Script {
    pub(crate) active: Cell<bool>,
    pub(crate) candidate: Cell<Option<CandidateProperties>>,
    pub(crate) unhover: Cell<bool>,
    pub(crate) select: Cell<bool>,
    pub(crate) reject_select: Cell<bool>,
    pub(crate) unselect: Cell<bool>,
    pub(crate) state: Cell<InteractorState>,
}

impl Script {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self {
            active: Cell::new(true),
            candidate: Cell::new(None),
            unhover: Cell::new(false),
            select: Cell::new(false),
            reject_select: Cell::new(false),
            unselect: Cell::new(false),
            state: Cell::new(InteractorState::Disabled),
        })
    }

    /// Propose a candidate on slot `slot` with `score`.
    pub(crate) fn propose(&self, slot: u32, score: f32) {
        self.candidate.set(Some(CandidateProperties::new(
            InteractableId::new(slot, 1),
            score,
        )));
    }
}

/// An interactor whose decisions come from a [`Script`].
#[derive(Debug)]
pub(crate) struct Scripted {
    id: InteractorId,
    script: Rc<Script>,
    root: bool,
    events: EventHub<InteractorEvent>,
}

impl Scripted {
    pub(crate) fn boxed(script: &Rc<Script>) -> Box<dyn Interactor> {
        Box::new(Self {
            id: InteractorId::next(),
            script: script.clone(),
            root: true,
            events: EventHub::new(),
        })
    }

    fn set(&self, s: InteractorState) {
        self.script.state.set(s);
    }
}

impl Interactor for Scripted {
    fn id(&self) -> InteractorId {
        self.id
    }
    fn state(&self) -> InteractorState {
        self.script.state.get()
    }
    fn max_iterations_per_frame(&self) -> usize {
        3
    }
    fn is_root_driver(&self) -> bool {
        self.root
    }
    fn set_root_driver(&mut self, root: bool) {
        self.root = root;
    }
    fn events_mut(&mut self) -> &mut EventHub<InteractorEvent> {
        &mut self.events
    }
    fn candidate(&self) -> Option<CandidateProperties> {
        if self.state() == InteractorState::Disabled {
            return None;
        }
        self.script.candidate.get()
    }
    fn has_interactable(&self) -> bool {
        matches!(self.state(), InteractorState::Hover | InteractorState::Select)
    }
    fn has_selected_interactable(&self) -> bool {
        self.state() == InteractorState::Select
    }
    fn preprocess(&mut self) {}
    fn process(&mut self) {}
    fn postprocess(&mut self) {}
    fn update_active_state(&mut self) -> bool {
        self.script.active.get()
    }
    fn process_candidate(&mut self) {}
    fn should_hover(&self) -> bool {
        self.state() == InteractorState::Normal && self.candidate().is_some()
    }
    fn should_unhover(&self) -> bool {
        self.state() == InteractorState::Hover
            && (self.script.unhover.get() || self.candidate().is_none())
    }
    fn should_select(&self) -> bool {
        self.state() == InteractorState::Hover && self.script.select.get()
    }
    fn should_unselect(&self) -> bool {
        self.state() == InteractorState::Select && self.script.unselect.get()
    }
    fn hover(&mut self) {
        if self.should_hover() {
            self.set(InteractorState::Hover);
        }
    }
    fn unhover(&mut self) {
        if self.state() == InteractorState::Hover {
            self.set(InteractorState::Normal);
        }
    }
    fn select(&mut self) {
        if self.state() == InteractorState::Hover && !self.script.reject_select.get() {
            self.set(InteractorState::Select);
        }
    }
    fn unselect(&mut self) {
        if self.state() == InteractorState::Select {
            self.set(InteractorState::Hover);
        }
    }
    fn enable(&mut self) {
        if self.state() == InteractorState::Disabled {
            self.set(InteractorState::Normal);
        }
    }
    fn disable(&mut self) {
        self.set(InteractorState::Disabled);
    }
}
