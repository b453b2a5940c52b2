// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-select interactor group.
//!
//! ## Overview
//!
//! An [`InteractorGroup`] owns an ordered list of child interactors and lets exactly one
//! of them drive at a time. Each tick it refreshes every child's candidate, ranks the
//! children with the optional [`CandidateComparer`] and routes hover, select and
//! unselect to the chosen child only. While a child is selecting, all its siblings are
//! disabled.
//!
//! ## Ranking
//!
//! Children are scanned in list order and the current best is replaced only when the
//! comparer prefers the later child (see [`compare_candidates`]). Without a comparer the
//! first-listed child with a candidate wins. If no child has a candidate the group falls
//! back to its last child.
//!
//! ## Children
//!
//! Children are marked non-root when added: they are stepped by the group and must not
//! be driven on their own. A child whose own active-state gate closes is disabled by the
//! group even when the group itself stays active.
//!
//! ```
//! use understory_interaction::{
//!     Candidates, CandidateProperties, Interactor, InteractorBehavior, InteractorGroup,
//!     InteractableConfig, InteractableRegistry, InteractorState, LeafInteractor,
//! };
//!
//! struct First;
//! impl InteractorBehavior<&'static str> for First {
//!     fn compute_candidate(
//!         &mut self,
//!         mut c: Candidates<'_, &'static str>,
//!     ) -> Option<CandidateProperties> {
//!         c.next().map(|it| CandidateProperties::new(it.id(), 0.0))
//!     }
//! }
//!
//! let registry = InteractableRegistry::shared();
//! let door = registry.borrow_mut().insert("door", InteractableConfig::default());
//! registry.borrow_mut().enable(door).unwrap();
//!
//! let near = LeafInteractor::new(registry.clone(), First);
//! let far = LeafInteractor::new(registry.clone(), First);
//! let children: Vec<Box<dyn Interactor>> = vec![Box::new(near), Box::new(far)];
//! let mut group = InteractorGroup::new(children).unwrap();
//! group.drive();
//! assert_eq!(group.state(), InteractorState::Hover);
//! // First-listed child wins the tie.
//! assert_eq!(group.active_child(), Some(0));
//! ```

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::candidate::{BoxedComparer, CandidateComparer, CandidateProperties, compare_candidates};
use crate::capability::ActiveState;
use crate::config::InteractorConfig;
use crate::error::GroupError;
use crate::event::{EventHub, InteractorEvent, StateChange};
use crate::id::InteractorId;
use crate::interactor::Interactor;
use crate::state::InteractorState;

/// Index of the preferred contender, scanning in order and replacing only on `Greater`.
pub(crate) fn rank(
    comparer: Option<&dyn CandidateComparer>,
    contenders: impl IntoIterator<Item = (usize, Option<CandidateProperties>)>,
) -> Option<usize> {
    let mut best: Option<(usize, Option<CandidateProperties>)> = None;
    for (idx, candidate) in contenders {
        match &best {
            None => best = Some((idx, candidate)),
            Some((_, current)) => {
                if compare_candidates(comparer, current.as_ref(), candidate.as_ref())
                    == Ordering::Greater
                {
                    best = Some((idx, candidate));
                }
            }
        }
    }
    best.map(|(idx, _)| idx)
}

/// Sample every child's gate: disable closed ones, enable open ones unless a sibling
/// other than `selecting` holds the selection.
pub(crate) fn refresh_children(children: &mut [Box<dyn Interactor>], selecting: Option<usize>) {
    for (idx, child) in children.iter_mut().enumerate() {
        if !child.update_active_state() {
            child.disable();
        } else if selecting.is_none_or(|s| s == idx) {
            child.enable();
        }
    }
}

/// Recompute candidates of all enabled children and pick the group candidate.
pub(crate) fn choose_candidate(
    children: &mut [Box<dyn Interactor>],
    comparer: Option<&dyn CandidateComparer>,
) -> Option<usize> {
    for child in children.iter_mut() {
        if child.state() != InteractorState::Disabled {
            child.process_candidate();
        }
    }
    let best = rank(
        comparer,
        children
            .iter()
            .enumerate()
            .filter(|(_, c)| c.state() != InteractorState::Disabled)
            .map(|(idx, c)| (idx, c.candidate())),
    );
    match best {
        Some(idx) if children[idx].has_candidate() => Some(idx),
        _ => children.len().checked_sub(1),
    }
}

/// Single-select coordination over child interactors.
pub struct InteractorGroup {
    id: InteractorId,
    children: Vec<Box<dyn Interactor>>,
    comparer: Option<BoxedComparer>,
    config: InteractorConfig,
    state: InteractorState,
    active_state: Option<Box<dyn ActiveState>>,
    root_driver: bool,
    candidate_index: Option<usize>,
    // Child currently hovering or selecting on behalf of the group.
    active_index: Option<usize>,
    events: EventHub<InteractorEvent>,
}

impl core::fmt::Debug for InteractorGroup {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InteractorGroup")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("children", &self.children.len())
            .field("candidate_index", &self.candidate_index)
            .field("active_index", &self.active_index)
            .field("has_comparer", &self.comparer.is_some())
            .finish_non_exhaustive()
    }
}

impl InteractorGroup {
    /// Create a group over `children`, in priority order.
    ///
    /// Each child is marked non-root. Fails with [`GroupError::Empty`] when there are no
    /// children.
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
            active_index: None,
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

    /// Index of the child hovering or selecting for the group.
    pub fn active_child(&self) -> Option<usize> {
        self.active_index
    }

    fn set_state(&mut self, new: InteractorState) {
        let previous = self.state;
        if previous == new {
            return;
        }
        self.state = new;
        tracing::debug!(group = %self.id, %previous, %new, "group state changed");
        self.events
            .emit(&InteractorEvent::StateChanged(StateChange { previous, new }));
    }

    fn active(&self) -> Option<&dyn Interactor> {
        self.active_index.map(|idx| &*self.children[idx])
    }

    fn selecting_index(&self) -> Option<usize> {
        if self.state == InteractorState::Select {
            self.active_index
        } else {
            None
        }
    }

    /// Follow children that left hover or select on their own (gate loss, self-heal).
    fn reconcile(&mut self) {
        let Some(child_state) = self.active().map(|c| c.state()) else {
            if self.state == InteractorState::Hover || self.state == InteractorState::Select {
                self.set_state(InteractorState::Normal);
            }
            return;
        };
        match (self.state, child_state) {
            (InteractorState::Select, InteractorState::Select)
            | (InteractorState::Hover, InteractorState::Hover) => {}
            (InteractorState::Select, InteractorState::Hover) => {
                refresh_children(&mut self.children, None);
                self.set_state(InteractorState::Hover);
            }
            (InteractorState::Select | InteractorState::Hover, _) => {
                tracing::debug!(group = %self.id, child = ?self.active_index, "active child dropped out");
                self.active_index = None;
                refresh_children(&mut self.children, None);
                self.set_state(InteractorState::Normal);
            }
            _ => {}
        }
    }
}

impl Interactor for InteractorGroup {
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
        self.active().is_some_and(|c| c.has_interactable())
    }

    fn has_selected_interactable(&self) -> bool {
        self.state == InteractorState::Select
            && self.active().is_some_and(|c| c.has_selected_interactable())
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
        let selecting = self.selecting_index();
        refresh_children(&mut self.children, selecting);
        self.reconcile();
        true
    }

    fn process_candidate(&mut self) {
        self.candidate_index = choose_candidate(&mut self.children, self.comparer.as_deref());
    }

    fn should_hover(&self) -> bool {
        if self.state != InteractorState::Normal {
            return false;
        }
        self.candidate_index.is_some_and(|idx| {
            let child = &self.children[idx];
            child.has_candidate() && child.should_hover()
        })
    }

    fn should_unhover(&self) -> bool {
        if self.state != InteractorState::Hover {
            return false;
        }
        match self.active() {
            None => true,
            Some(child) => {
                self.candidate_index != self.active_index
                    || child.state() != InteractorState::Hover
                    || child.should_unhover()
            }
        }
    }

    fn should_select(&self) -> bool {
        self.state == InteractorState::Hover && self.active().is_some_and(|c| c.should_select())
    }

    fn should_unselect(&self) -> bool {
        self.state == InteractorState::Select
            && self.active().is_some_and(|c| c.should_unselect())
    }

    fn hover(&mut self) {
        if self.state != InteractorState::Normal {
            return;
        }
        let Some(idx) = self.candidate_index else {
            return;
        };
        self.children[idx].hover();
        if self.children[idx].state() == InteractorState::Hover {
            self.active_index = Some(idx);
            self.set_state(InteractorState::Hover);
        }
    }

    fn unhover(&mut self) {
        if self.state != InteractorState::Hover {
            return;
        }
        if let Some(idx) = self.active_index.take() {
            self.children[idx].unhover();
        }
        self.set_state(InteractorState::Normal);
    }

    fn select(&mut self) {
        if self.state != InteractorState::Hover {
            return;
        }
        let Some(idx) = self.active_index else {
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
        self.set_state(InteractorState::Select);
    }

    fn unselect(&mut self) {
        if self.state != InteractorState::Select {
            return;
        }
        let still_hovering = match self.active_index {
            Some(idx) => {
                self.children[idx].unselect();
                self.children[idx].state() == InteractorState::Hover
            }
            None => false,
        };
        refresh_children(&mut self.children, None);
        if still_hovering {
            self.set_state(InteractorState::Hover);
        } else {
            self.active_index = None;
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
        for child in &mut self.children {
            child.disable();
        }
        self.candidate_index = None;
        self.active_index = None;
        self.set_state(InteractorState::Disabled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::LowerScoreFirst;
    use crate::capability::PulseSelector;
    use crate::config::InteractableConfig;
    use crate::registry::InteractableRegistry;
    use crate::state::InteractableState;
    use crate::test_util::{Script, Scripted, reaching_leaf};
    use alloc::rc::Rc;
    use alloc::vec;

    fn group_of(n: usize) -> (InteractorGroup, Vec<Rc<Script>>) {
        let scripts: Vec<_> = (0..n).map(|_| Script::new()).collect();
        let children = scripts.iter().map(Scripted::boxed).collect();
        (InteractorGroup::new(children).unwrap(), scripts)
    }

    #[test]
    fn empty_group_is_rejected() {
        assert!(matches!(
            InteractorGroup::new(Vec::new()),
            Err(GroupError::Empty)
        ));
    }

    #[test]
    fn children_become_non_root() {
        let (group, _) = group_of(2);
        assert!(group.is_root_driver());
        assert!(group.children().iter().all(|c| !c.is_root_driver()));
    }

    #[test]
    fn first_listed_child_with_candidate_wins() {
        let (mut group, scripts) = group_of(3);
        scripts[1].propose(0, 5.0);
        scripts[2].propose(1, 1.0);
        group.drive();
        assert_eq!(group.candidate_child(), Some(1));
        assert_eq!(group.active_child(), Some(1));
        assert_eq!(scripts[1].state.get(), InteractorState::Hover);
        assert_eq!(scripts[2].state.get(), InteractorState::Normal);
    }

    #[test]
    fn no_candidate_falls_back_to_last_child() {
        let (mut group, _) = group_of(3);
        group.drive();
        assert_eq!(group.candidate_child(), Some(2));
        assert!(!group.has_candidate());
        assert_eq!(group.state(), InteractorState::Normal);
    }

    #[test]
    fn comparer_overrides_list_order() {
        let (group, scripts) = group_of(3);
        let mut group = group.with_comparer(LowerScoreFirst);
        scripts[0].propose(0, 3.0);
        scripts[1].propose(1, 2.0);
        scripts[2].propose(2, 2.0);
        group.drive();
        // Ties keep the earlier child.
        assert_eq!(group.active_child(), Some(1));
    }

    #[test]
    fn selecting_child_disables_siblings_until_release() {
        let (mut group, scripts) = group_of(2);
        scripts[0].propose(0, 0.0);
        scripts[1].propose(1, 0.0);
        group.drive();
        scripts[0].select.set(true);
        group.drive();
        scripts[0].select.set(false);
        assert_eq!(group.state(), InteractorState::Select);
        assert_eq!(scripts[1].state.get(), InteractorState::Disabled);

        // Siblings stay disabled across ticks while the selection holds.
        group.drive();
        assert_eq!(scripts[1].state.get(), InteractorState::Disabled);

        scripts[0].unselect.set(true);
        group.drive();
        scripts[0].unselect.set(false);
        assert_eq!(group.state(), InteractorState::Hover);
        assert_eq!(scripts[0].state.get(), InteractorState::Hover);
        assert_eq!(scripts[1].state.get(), InteractorState::Normal);
    }

    #[test]
    fn rejected_select_keeps_hover() {
        let (mut group, scripts) = group_of(2);
        scripts[0].propose(0, 0.0);
        scripts[1].propose(1, 0.0);
        group.drive();
        scripts[0].select.set(true);
        scripts[0].reject_select.set(true);
        group.drive();
        assert_eq!(group.state(), InteractorState::Hover);
        assert_eq!(scripts[1].state.get(), InteractorState::Normal);
    }

    #[test]
    fn candidate_moving_to_another_child_rehovers() {
        let (mut group, scripts) = group_of(2);
        scripts[1].propose(1, 0.0);
        group.drive();
        assert_eq!(group.active_child(), Some(1));
        scripts[0].propose(0, 0.0);
        group.drive();
        assert_eq!(group.active_child(), Some(0));
        assert_eq!(scripts[1].state.get(), InteractorState::Normal);
        assert_eq!(scripts[0].state.get(), InteractorState::Hover);
    }

    #[test]
    fn child_gate_loss_releases_the_group() {
        let (mut group, scripts) = group_of(2);
        scripts[0].propose(0, 0.0);
        group.drive();
        scripts[0].select.set(true);
        group.drive();
        scripts[0].select.set(false);
        assert_eq!(group.state(), InteractorState::Select);

        scripts[0].active.set(false);
        group.drive();
        assert_eq!(scripts[0].state.get(), InteractorState::Disabled);
        assert_eq!(group.active_child(), None);
        assert_eq!(group.state(), InteractorState::Normal);
        assert_eq!(scripts[1].state.get(), InteractorState::Normal);
    }

    #[test]
    fn group_gate_disables_everything() {
        let (group, scripts) = group_of(2);
        let gate = crate::capability::ActiveFlag::new(true);
        let mut group = group.with_active_state(gate.clone());
        scripts[0].propose(0, 0.0);
        group.drive();
        gate.set(false);
        group.drive();
        assert_eq!(group.state(), InteractorState::Disabled);
        assert!(
            scripts
                .iter()
                .all(|s| s.state.get() == InteractorState::Disabled)
        );
        gate.set(true);
        group.drive();
        assert_eq!(group.state(), InteractorState::Hover);
    }

    #[test]
    fn membership_follows_the_group_over_real_leaves() {
        let registry = InteractableRegistry::shared();
        let (a, b) = {
            let mut reg = registry.borrow_mut();
            let a = reg.insert(0, InteractableConfig::default());
            let b = reg.insert(1, InteractableConfig::default());
            reg.enable(a).unwrap();
            reg.enable(b).unwrap();
            (a, b)
        };
        let (sa, sb) = (PulseSelector::new(), PulseSelector::new());
        let children = vec![
            reaching_leaf(&registry, a, &sa),
            reaching_leaf(&registry, b, &sb),
        ];
        let mut group = InteractorGroup::new(children).unwrap();
        let (first, second) = (group.children()[0].id(), group.children()[1].id());

        // Only the chosen child hovers; its sibling stays out of every member set.
        group.drive();
        {
            let reg = registry.borrow();
            assert_eq!(reg.get(a).unwrap().interactors(), [first]);
            assert!(reg.get(b).unwrap().interactors().is_empty());
        }

        sa.request_select();
        group.drive();
        assert_eq!(group.state(), InteractorState::Select);
        assert_eq!(group.children()[1].state(), InteractorState::Disabled);
        {
            let reg = registry.borrow();
            let held = reg.get(a).unwrap();
            assert_eq!(held.state(), InteractableState::Select);
            assert_eq!(held.selecting_interactors(), [first]);
            assert!(!reg.get(b).unwrap().is_hovered_by(second));
        }

        sa.request_unselect();
        group.drive();
        assert_eq!(group.state(), InteractorState::Hover);
        assert_eq!(group.children()[1].state(), InteractorState::Normal);
        {
            let reg = registry.borrow();
            let held = reg.get(a).unwrap();
            assert_eq!(held.state(), InteractableState::Hover);
            assert!(held.selecting_interactors().is_empty());
            assert_eq!(held.interactors(), [first]);
        }

        sa.request_select();
        group.drive();
        assert_eq!(group.state(), InteractorState::Select);
        group.disable();
        assert_eq!(group.state(), InteractorState::Disabled);
        let reg = registry.borrow();
        for id in [a, b] {
            let it = reg.get(id).unwrap();
            assert!(it.interactors().is_empty(), "{id} still hovered");
            assert!(it.selecting_interactors().is_empty(), "{id} still selected");
            assert_eq!(it.state(), InteractableState::Normal);
        }
    }

    #[test]
    fn rank_contract() {
        let c = |slot| Some(CandidateProperties::new(crate::id::InteractableId::new(slot, 1), 0.0));
        assert_eq!(rank(None, vec![(0, None), (1, None)]), Some(0));
        assert_eq!(rank(None, vec![(0, None), (1, c(1)), (2, c(2))]), Some(1));
        assert_eq!(rank(None, Vec::<(usize, Option<CandidateProperties>)>::new()), None);
    }
}
