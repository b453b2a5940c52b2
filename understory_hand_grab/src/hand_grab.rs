// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grab-type resolution between a grabbing hand and a grabbable.
//!
//! Pinch and palm are evaluated independently, each only when both the grabber and the
//! grabbable support it.

use crate::api::HandGrabApi;
use crate::finger::{GrabTypeFlags, HandFingerFlags};
use crate::rule::GrabbingRule;

/// The grabbable side: which grab types it accepts and the rule for each.
pub trait HandGrabTarget {
    /// Grab types this target currently accepts.
    fn supported_grab_types(&self) -> GrabTypeFlags;
    /// Rule for pinch grabs.
    fn pinch_grab_rules(&self) -> &GrabbingRule;
    /// Rule for palm grabs.
    fn palm_grab_rules(&self) -> &GrabbingRule;
}

/// A grabbable interactable payload.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HandGrabbable {
    /// Accepted grab types.
    pub supported_grab_types: GrabTypeFlags,
    /// Rule for pinch grabs.
    pub pinch_grab_rules: GrabbingRule,
    /// Rule for palm grabs.
    pub palm_grab_rules: GrabbingRule,
}

impl Default for HandGrabbable {
    fn default() -> Self {
        Self {
            supported_grab_types: GrabTypeFlags::all(),
            pinch_grab_rules: GrabbingRule::DEFAULT_PINCH_RULE,
            palm_grab_rules: GrabbingRule::DEFAULT_PALM_RULE,
        }
    }
}

impl HandGrabbable {
    /// A grabbable accepting only `types`, with the default rules.
    pub fn with_types(types: GrabTypeFlags) -> Self {
        Self {
            supported_grab_types: types,
            ..Self::default()
        }
    }

    /// `target` frozen to the fingers grabbing right now.
    ///
    /// Only the grab types whose select edge fired this tick are kept (every mutually
    /// supported type when none fired). Each kept rule is masked with
    /// [`GrabbingRule::with_mask`] to the fingers of its type that are currently
    /// grabbing, and a type with no such finger is dropped.
    pub fn frozen_from(api: &HandGrabApi, types: GrabTypeFlags, target: &impl HandGrabTarget) -> Self {
        let fired = compute_should_select(api, types, target);
        let types = if fired.is_empty() {
            types & target.supported_grab_types()
        } else {
            fired
        };
        let pinch_mask = target.pinch_grab_rules().strip_irrelevant(api.pinch().grabbing());
        let palm_mask = target.palm_grab_rules().strip_irrelevant(api.palm().grabbing());
        let mut supported = GrabTypeFlags::empty();
        if types.contains(GrabTypeFlags::PINCH) && !pinch_mask.is_empty() {
            supported |= GrabTypeFlags::PINCH;
        }
        if types.contains(GrabTypeFlags::PALM) && !palm_mask.is_empty() {
            supported |= GrabTypeFlags::PALM;
        }
        Self {
            supported_grab_types: supported,
            pinch_grab_rules: GrabbingRule::with_mask(pinch_mask, target.pinch_grab_rules()),
            palm_grab_rules: GrabbingRule::with_mask(palm_mask, target.palm_grab_rules()),
        }
    }
}

impl HandGrabTarget for HandGrabbable {
    fn supported_grab_types(&self) -> GrabTypeFlags {
        self.supported_grab_types
    }

    fn pinch_grab_rules(&self) -> &GrabbingRule {
        &self.pinch_grab_rules
    }

    fn palm_grab_rules(&self) -> &GrabbingRule {
        &self.palm_grab_rules
    }
}

/// Best grab score among the mutually supported types, and the type achieving it.
///
/// Pinch is evaluated first and palm only replaces it with a strictly greater score.
/// Returns `(0.0, empty)` when nothing scores.
pub fn compute_hand_grab_score(
    api: &HandGrabApi,
    grabber_types: GrabTypeFlags,
    target: &impl HandGrabTarget,
    include_grabbing: bool,
) -> (f32, GrabTypeFlags) {
    let types = grabber_types & target.supported_grab_types();
    let mut best = (0.0, GrabTypeFlags::empty());
    if types.contains(GrabTypeFlags::PINCH) {
        let s = api.pinch().score(target.pinch_grab_rules(), include_grabbing);
        if s > best.0 {
            best = (s, GrabTypeFlags::PINCH);
        }
    }
    if types.contains(GrabTypeFlags::PALM) {
        let s = api.palm().score(target.palm_grab_rules(), include_grabbing);
        if s > best.0 {
            best = (s, GrabTypeFlags::PALM);
        }
    }
    best
}

/// Grab types whose select edge fired this tick. Both may fire together.
pub fn compute_should_select(
    api: &HandGrabApi,
    grabber_types: GrabTypeFlags,
    target: &impl HandGrabTarget,
) -> GrabTypeFlags {
    let types = grabber_types & target.supported_grab_types();
    let mut fired = GrabTypeFlags::empty();
    if types.contains(GrabTypeFlags::PINCH) && api.pinch().select_edge(target.pinch_grab_rules()) {
        fired |= GrabTypeFlags::PINCH;
    }
    if types.contains(GrabTypeFlags::PALM) && api.palm().select_edge(target.palm_grab_rules()) {
        fired |= GrabTypeFlags::PALM;
    }
    fired
}

/// Returns true if the grab on `target` should be released this tick.
///
/// When `target` reports no supported grab type, release requires that neither pinch
/// nor palm sustains [`GrabbingRule::FULL_GRAB`]. A grabber sharing none of the
/// target's types cannot hold it and releases. Otherwise some shared type must have met
/// its release condition while no shared type still sustains its rule.
pub fn compute_should_unselect(
    api: &HandGrabApi,
    grabber_types: GrabTypeFlags,
    target: &impl HandGrabTarget,
) -> bool {
    if target.supported_grab_types().is_empty() {
        return !api.pinch().is_sustaining(&GrabbingRule::FULL_GRAB)
            && !api.palm().is_sustaining(&GrabbingRule::FULL_GRAB);
    }
    let types = grabber_types & target.supported_grab_types();
    if types.is_empty() {
        return true;
    }
    let mut released = false;
    let mut sustained = false;
    if types.contains(GrabTypeFlags::PINCH) {
        let rule = target.pinch_grab_rules();
        released |= api.pinch().unselect_edge(rule);
        sustained |= api.pinch().is_sustaining(rule);
    }
    if types.contains(GrabTypeFlags::PALM) {
        let rule = target.palm_grab_rules();
        released |= api.palm().unselect_edge(rule);
        sustained |= api.palm().is_sustaining(rule);
    }
    released && !sustained
}

/// Fingers currently grabbing `target`, over both types, ignoring irrelevant fingers.
pub fn grabbing_fingers(
    api: &HandGrabApi,
    grabber_types: GrabTypeFlags,
    target: &impl HandGrabTarget,
) -> HandFingerFlags {
    let types = grabber_types & target.supported_grab_types();
    let mut fingers = HandFingerFlags::empty();
    if types.contains(GrabTypeFlags::PINCH) {
        fingers |= target.pinch_grab_rules().strip_irrelevant(api.pinch().grabbing());
    }
    if types.contains(GrabTypeFlags::PALM) {
        fingers |= target.palm_grab_rules().strip_irrelevant(api.palm().grabbing());
    }
    fingers
}
