// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The interactor protocol and its bounded per-tick drive loop.
//!
//! ## Overview
//!
//! An interactor is an active agent: each tick it computes a candidate interactable,
//! hovers it, and selects or unselects it on request. [`Interactor`] exposes the
//! primitive steps; [`drive`] sequences them. Leaf interactors
//! ([`LeafInteractor`](crate::LeafInteractor)) and groups
//! ([`InteractorGroup`](crate::InteractorGroup),
//! [`InteractorGroupMulti`](crate::InteractorGroupMulti)) all implement the same trait,
//! so groups can contain groups.
//!
//! ## Drive loop
//!
//! 1) `preprocess`.
//! 2) Sample the active-state gate. If it is closed: `disable`, `postprocess`, done.
//! 3) `enable` (leaves `Disabled` for `Normal`).
//! 4) Up to [`Interactor::max_iterations_per_frame`] iterations:
//!    - recompute the candidate when `Normal`, or when `Hover` and the previous
//!      iteration did not start from `Normal`;
//!    - `process`;
//!    - `Normal`: hover if [`Interactor::should_hover`];
//!    - `Hover`: select if [`Interactor::should_select`], else unhover if
//!      [`Interactor::should_unhover`];
//!    - `Select`: unselect if [`Interactor::should_unselect`];
//!    - stop as soon as no transition happened.
//! 5) `postprocess`.
//!
//! The iteration bound lets chained transitions (unselect → unhover → hover) settle
//! within one tick while guaranteeing termination.
//!
//! ## Root drivers
//!
//! Only root interactors are advanced from outside, once per tick (see
//! [`Driver`](crate::Driver)). Children of a group are stepped by the group and
//! must never be driven independently.

use crate::candidate::CandidateProperties;
use crate::event::{EventHub, InteractorEvent};
use crate::id::InteractorId;
use crate::state::InteractorState;

/// An active agent that hovers and selects interactables.
pub trait Interactor {
    /// Identity of this interactor.
    fn id(&self) -> InteractorId;

    /// Current state.
    fn state(&self) -> InteractorState;

    /// Settling iterations per tick.
    fn max_iterations_per_frame(&self) -> usize;

    /// Whether this interactor is advanced directly by a [`Driver`](crate::Driver).
    fn is_root_driver(&self) -> bool;

    /// Mark this interactor as root (driven externally) or owned by a group.
    fn set_root_driver(&mut self, root: bool);

    /// Notifications published by this interactor.
    fn events_mut(&mut self) -> &mut EventHub<InteractorEvent>;

    /// Best eligible target this tick, if any.
    fn candidate(&self) -> Option<CandidateProperties>;

    /// Returns true if a candidate exists.
    fn has_candidate(&self) -> bool {
        self.candidate().is_some()
    }

    /// Returns true if an interactable is currently hovered.
    fn has_interactable(&self) -> bool;

    /// Returns true if an interactable is currently selected.
    fn has_selected_interactable(&self) -> bool;

    /// Start-of-tick work: sample inputs, reconcile stale references.
    fn preprocess(&mut self);

    /// Per-iteration work.
    fn process(&mut self);

    /// End-of-tick work.
    fn postprocess(&mut self);

    /// Sample the active-state gate. Returns true if the interactor may run this tick.
    fn update_active_state(&mut self) -> bool;

    /// Recompute [`Interactor::candidate`].
    fn process_candidate(&mut self);

    /// Normal → Hover is wanted.
    fn should_hover(&self) -> bool;

    /// Hover → Normal is wanted.
    fn should_unhover(&self) -> bool;

    /// Hover → Select is wanted.
    fn should_select(&self) -> bool;

    /// Select → Hover/Normal is wanted.
    fn should_unselect(&self) -> bool;

    /// Transition Normal → Hover.
    fn hover(&mut self);

    /// Transition Hover → Normal.
    fn unhover(&mut self);

    /// Transition Hover → Select.
    fn select(&mut self);

    /// Transition Select → Hover (still hovering) or Normal.
    fn unselect(&mut self);

    /// Transition Disabled → Normal.
    fn enable(&mut self);

    /// Force-unselect, force-unhover, then enter Disabled.
    fn disable(&mut self);

    /// Advance one tick. See the [module docs](self).
    fn drive(&mut self) {
        drive(self);
    }
}

/// Run one tick of the bounded drive loop on `interactor`.
pub fn drive<I: Interactor + ?Sized>(interactor: &mut I) {
    interactor.preprocess();
    if !interactor.update_active_state() {
        interactor.disable();
        interactor.postprocess();
        return;
    }
    interactor.enable();

    let budget = interactor.max_iterations_per_frame();
    let mut previous = interactor.state();
    let mut settled = false;
    for _ in 0..budget {
        let state = interactor.state();
        if state == InteractorState::Normal
            || (state == InteractorState::Hover && previous != InteractorState::Normal)
        {
            interactor.process_candidate();
        }
        previous = interactor.state();
        interactor.process();

        match interactor.state() {
            InteractorState::Disabled => {}
            InteractorState::Normal => {
                if interactor.should_hover() {
                    interactor.hover();
                    continue;
                }
            }
            InteractorState::Hover => {
                if interactor.should_select() {
                    interactor.select();
                    continue;
                }
                if interactor.should_unhover() {
                    interactor.unhover();
                    continue;
                }
            }
            InteractorState::Select => {
                if interactor.should_unselect() {
                    interactor.unselect();
                    continue;
                }
            }
        }
        settled = true;
        break;
    }
    if !settled {
        tracing::trace!(
            interactor = %interactor.id(),
            budget,
            state = %interactor.state(),
            "iteration budget exhausted before settling"
        );
    }
    interactor.postprocess();
}
