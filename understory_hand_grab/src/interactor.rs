// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hand-grab interactor behavior.
//!
//! [`HandGrabBehavior`] plugs hand tracking into a
//! [`LeafInteractor`](understory_interaction::LeafInteractor) over [`HandGrabbable`]
//! payloads: candidates are scored by grab strength, select and unselect follow the
//! finger edges instead of a selector, and the fingers that started a grab are frozen
//! so that release is judged on those fingers only.
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use understory_hand_grab::{HandFingerFlags, HandFingerSnapshot, HandGrabBehavior, HandGrabbable};
//! use understory_interaction::{
//!     Interactor, InteractorState, InteractableConfig, InteractableRegistry, LeafInteractor,
//! };
//!
//! let registry = InteractableRegistry::shared();
//! let mug = registry.borrow_mut().insert(HandGrabbable::default(), InteractableConfig::default());
//! registry.borrow_mut().enable(mug).unwrap();
//!
//! let hand = Rc::new(Cell::new(HandFingerSnapshot::default()));
//! let feed = hand.clone();
//! let mut grab = LeafInteractor::new(registry.clone(), HandGrabBehavior::new(move || feed.get()));
//!
//! let mut reaching = HandFingerSnapshot::default();
//! reaching.pinch_strength = [0.5; 5];
//! hand.set(reaching);
//! grab.drive();
//! assert_eq!(grab.state(), InteractorState::Hover);
//!
//! hand.set(HandFingerSnapshot::pinch(HandFingerFlags::THUMB | HandFingerFlags::INDEX));
//! grab.drive();
//! assert_eq!(grab.state(), InteractorState::Select);
//! ```

use alloc::boxed::Box;

use understory_interaction::{
    CandidateProperties, Candidates, Interactable, InteractorBehavior,
};

use crate::api::{FingerStateSource, HandGrabApi};
use crate::finger::{GrabTypeFlags, HandFingerFlags};
use crate::hand_grab::{
    HandGrabbable, compute_hand_grab_score, compute_should_select, compute_should_unselect,
    grabbing_fingers,
};

/// Interactor behavior driven by hand tracking.
pub struct HandGrabBehavior {
    source: Box<dyn FingerStateSource>,
    api: HandGrabApi,
    supported_grab_types: GrabTypeFlags,
    frozen: Option<HandGrabbable>,
}

impl core::fmt::Debug for HandGrabBehavior {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HandGrabBehavior")
            .field("api", &self.api)
            .field("supported_grab_types", &self.supported_grab_types)
            .field("frozen", &self.frozen)
            .finish_non_exhaustive()
    }
}

impl HandGrabBehavior {
    /// Create a behavior sampling `source` once per tick, supporting every grab type.
    pub fn new(source: impl FingerStateSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            api: HandGrabApi::new(),
            supported_grab_types: GrabTypeFlags::all(),
            frozen: None,
        }
    }

    /// Restrict the grab types this hand may use.
    #[must_use]
    pub fn with_grab_types(mut self, types: GrabTypeFlags) -> Self {
        self.supported_grab_types = types;
        self
    }

    /// Finger trackers for the current tick.
    pub fn api(&self) -> &HandGrabApi {
        &self.api
    }

    /// Grab types this hand may use.
    pub fn supported_grab_types(&self) -> GrabTypeFlags {
        self.supported_grab_types
    }

    /// The rules captured when the current grab started.
    pub fn frozen(&self) -> Option<&HandGrabbable> {
        self.frozen.as_ref()
    }

    /// Fingers holding the current grab.
    pub fn grabbing_fingers(&self) -> HandFingerFlags {
        self.frozen.as_ref().map_or(HandFingerFlags::empty(), |f| {
            grabbing_fingers(&self.api, self.supported_grab_types, f)
        })
    }
}

impl InteractorBehavior<HandGrabbable> for HandGrabBehavior {
    fn compute_candidate(
        &mut self,
        candidates: Candidates<'_, HandGrabbable>,
    ) -> Option<CandidateProperties> {
        let mut best: Option<CandidateProperties> = None;
        for it in candidates {
            let (score, kind) =
                compute_hand_grab_score(&self.api, self.supported_grab_types, it.data(), true);
            if kind.is_empty() || best.is_some_and(|b| score <= b.score) {
                continue;
            }
            best = Some(CandidateProperties::new(it.id(), score));
        }
        best
    }

    fn preprocess(&mut self) {
        let snapshot = self.source.snapshot();
        self.api.update(&snapshot);
    }

    fn compute_should_select(&self, hovered: Option<&Interactable<HandGrabbable>>) -> Option<bool> {
        let fired = hovered.map_or(GrabTypeFlags::empty(), |it| {
            compute_should_select(&self.api, self.supported_grab_types, it.data())
        });
        Some(!fired.is_empty())
    }

    fn compute_should_unselect(&self, _selected: Option<&Interactable<HandGrabbable>>) -> Option<bool> {
        let released = match &self.frozen {
            Some(frozen) => compute_should_unselect(&self.api, self.supported_grab_types, frozen),
            None => compute_should_unselect(
                &self.api,
                self.supported_grab_types,
                &HandGrabbable::with_types(GrabTypeFlags::empty()),
            ),
        };
        Some(released)
    }

    fn on_select(&mut self, selected: Option<&Interactable<HandGrabbable>>) {
        let frozen = selected.map(|it| {
            HandGrabbable::frozen_from(&self.api, self.supported_grab_types, it.data())
        });
        let fingers = self.api.pinch().grabbing() | self.api.palm().grabbing();
        tracing::debug!(
            types = ?frozen.map(|f| f.supported_grab_types),
            ?fingers,
            "grab started"
        );
        self.frozen = frozen;
    }

    fn on_unselect(&mut self) {
        tracing::debug!("grab released");
        self.frozen = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::HandFingerSnapshot;
    use alloc::rc::Rc;
    use core::cell::Cell;
    use understory_interaction::{
        Capacity, Interactor, InteractableConfig, InteractableRegistry, InteractorState,
        LeafInteractor, SharedRegistry,
    };

    const THUMB_INDEX: HandFingerFlags = HandFingerFlags::THUMB.union(HandFingerFlags::INDEX);

    fn reaching() -> HandFingerSnapshot {
        HandFingerSnapshot {
            pinch_strength: [0.5; 5],
            ..HandFingerSnapshot::default()
        }
    }

    fn setup(
        payload: HandGrabbable,
    ) -> (
        SharedRegistry<HandGrabbable>,
        LeafInteractor<HandGrabbable, HandGrabBehavior>,
        Rc<Cell<HandFingerSnapshot>>,
    ) {
        let registry = InteractableRegistry::shared();
        let id = registry
            .borrow_mut()
            .insert(payload, InteractableConfig::default());
        registry.borrow_mut().enable(id).unwrap();
        let hand = Rc::new(Cell::new(HandFingerSnapshot::default()));
        let feed = hand.clone();
        let grab = LeafInteractor::new(registry.clone(), HandGrabBehavior::new(move || feed.get()));
        (registry, grab, hand)
    }

    #[test]
    fn pinch_grab_lifecycle() {
        let (_registry, mut grab, hand) = setup(HandGrabbable::default());
        grab.drive();
        assert_eq!(grab.state(), InteractorState::Normal, "no strength, no candidate");

        hand.set(reaching());
        grab.drive();
        assert_eq!(grab.state(), InteractorState::Hover);

        hand.set(HandFingerSnapshot::pinch(THUMB_INDEX));
        grab.drive();
        assert_eq!(grab.state(), InteractorState::Select);
        let frozen = grab.behavior().frozen().copied().unwrap();
        assert_eq!(frozen.supported_grab_types, GrabTypeFlags::PINCH);
        assert_eq!(grab.behavior().grabbing_fingers(), THUMB_INDEX);

        // Holding does not re-trigger, and dropping the index keeps the grab.
        grab.drive();
        hand.set(HandFingerSnapshot::pinch(HandFingerFlags::THUMB));
        grab.drive();
        assert_eq!(grab.state(), InteractorState::Select);

        hand.set(reaching());
        grab.drive();
        assert_eq!(grab.state(), InteractorState::Hover);
        assert!(grab.behavior().frozen().is_none());
    }

    #[test]
    fn late_fingers_do_not_extend_the_frozen_grab() {
        let (_registry, mut grab, hand) = setup(HandGrabbable::default());
        hand.set(reaching());
        grab.drive();
        hand.set(HandFingerSnapshot::pinch(HandFingerFlags::THUMB));
        grab.drive();
        assert_eq!(grab.state(), InteractorState::Select);

        // The middle finger joins, then the thumb lets go: the frozen rule only knew
        // the thumb, so the grab ends even though the middle finger still pinches.
        hand.set(HandFingerSnapshot::pinch(
            HandFingerFlags::THUMB | HandFingerFlags::MIDDLE,
        ));
        grab.drive();
        let mut thumb_gone = HandFingerSnapshot::pinch(HandFingerFlags::MIDDLE);
        thumb_gone.pinch_strength = [0.5; 5];
        hand.set(thumb_gone);
        grab.drive();
        assert_eq!(grab.state(), InteractorState::Hover);
    }

    #[test]
    fn palm_grab_releases_despite_a_pinching_finger() {
        let (_registry, mut grab, hand) = setup(HandGrabbable::default());
        let near_palm = HandFingerSnapshot {
            palm_strength: [0.5; 5],
            ..HandFingerSnapshot::default()
        };
        hand.set(near_palm);
        grab.drive();
        assert_eq!(grab.state(), InteractorState::Hover);

        let mut grip =
            HandFingerSnapshot::palm(HandFingerFlags::INDEX | HandFingerFlags::MIDDLE | HandFingerFlags::RING);
        grip.pinching = HandFingerFlags::INDEX;
        hand.set(grip);
        grab.drive();
        assert_eq!(grab.state(), InteractorState::Select);
        assert_eq!(
            grab.behavior().frozen().map(|f| f.supported_grab_types),
            Some(GrabTypeFlags::PALM)
        );

        hand.set(near_palm);
        grab.drive();
        assert_eq!(grab.state(), InteractorState::Hover);
        assert!(grab.behavior().frozen().is_none());
    }

    #[test]
    fn unsupported_type_is_never_a_candidate() {
        let (_registry, mut grab, hand) = setup(HandGrabbable::with_types(GrabTypeFlags::PALM));
        hand.set(reaching());
        grab.drive();
        assert_eq!(grab.state(), InteractorState::Normal);
    }

    #[test]
    fn capacity_still_applies_to_grabs() {
        let registry = InteractableRegistry::shared();
        let id = registry.borrow_mut().insert(
            HandGrabbable::default(),
            InteractableConfig::limited(Capacity::Unbounded, Capacity::Limited(1)),
        );
        registry.borrow_mut().enable(id).unwrap();
        let hand = Rc::new(Cell::new(reaching()));
        let (a, b) = (hand.clone(), hand.clone());
        let mut left = LeafInteractor::new(registry.clone(), HandGrabBehavior::new(move || a.get()));
        let mut right = LeafInteractor::new(registry.clone(), HandGrabBehavior::new(move || b.get()));
        left.drive();
        right.drive();
        hand.set(HandFingerSnapshot::pinch(HandFingerFlags::THUMB));
        left.drive();
        right.drive();
        assert_eq!(left.state(), InteractorState::Select);
        assert_eq!(right.state(), InteractorState::Hover);
    }
}
