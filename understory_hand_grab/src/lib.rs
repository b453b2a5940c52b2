// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_hand_grab --heading-base-level=0

//! Understory Hand Grab: per-finger grab policies for hand-tracked interactors.
//!
//! ## Overview
//!
//! - [`GrabbingRule`] marks each finger as required, optional or ignored for a grab and
//!   picks a release policy. Presets: [`GrabbingRule::DEFAULT_PINCH_RULE`],
//!   [`GrabbingRule::DEFAULT_PALM_RULE`] and [`GrabbingRule::FULL_GRAB`].
//! - [`HandGrabApi`] tracks pinching and palm-grabbing fingers across ticks and reports
//!   select and unselect edges for a rule.
//! - The [`hand_grab`] functions resolve pinch against palm for a grabbable.
//! - [`HandGrabBehavior`] plugs all of it into an
//!   [`understory_interaction::LeafInteractor`].
//!
//! Hand tracking itself is external: supply a [`HandFingerSnapshot`] every tick through a
//! [`FingerStateSource`].
//!
//! ## Frozen grabs
//!
//! When a grab starts, the fingers that started it are captured with
//! [`GrabbingRule::with_mask`]. Release is then judged against those fingers only, so
//! fingers joining mid-grab cannot keep it alive.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod api;
pub mod finger;
pub mod hand_grab;
pub mod interactor;
pub mod rule;

pub use api::{FingerGrabTracker, FingerStateSource, HandFingerSnapshot, HandGrabApi};
pub use finger::{FingerRequirement, FingerUnselectMode, GrabTypeFlags, HandFinger, HandFingerFlags};
pub use hand_grab::{
    HandGrabTarget, HandGrabbable, compute_hand_grab_score, compute_should_select,
    compute_should_unselect, grabbing_fingers,
};
pub use interactor::HandGrabBehavior;
pub use rule::GrabbingRule;
