// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Finger-state tracking across ticks.
//!
//! ## Overview
//!
//! An external tracking system supplies one [`HandFingerSnapshot`] per tick through a
//! [`FingerStateSource`]. [`HandGrabApi`] keeps one [`FingerGrabTracker`] per grab type
//! and remembers the previous tick's flags so it can report edges: which fingers
//! *started* and which *stopped* grabbing this tick.
//!
//! ## Edges
//!
//! For a [`GrabbingRule`]:
//! - select edge: every required finger is grabbing and at least one of them started
//!   this tick. A rule with no required fingers fires when any optional finger starts.
//! - unselect edge, [`FingerUnselectMode::AllReleased`]: no relevant finger is grabbing
//!   and at least one relevant finger stopped this tick.
//! - unselect edge, [`FingerUnselectMode::AnyReleased`]: a required finger stopped this
//!   tick (any relevant finger when the rule requires none).

use crate::finger::{FingerUnselectMode, GrabTypeFlags, HandFinger, HandFingerFlags};
use crate::rule::GrabbingRule;

/// Finger state for one tick, as reported by hand tracking.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct HandFingerSnapshot {
    /// Fingers currently pinching.
    pub pinching: HandFingerFlags,
    /// Fingers currently gripping against the palm.
    pub palm_grabbing: HandFingerFlags,
    /// Pinch strength per finger, `0.0..=1.0`, indexed by [`HandFinger::index`].
    pub pinch_strength: [f32; HandFinger::COUNT],
    /// Palm grip strength per finger, `0.0..=1.0`, indexed by [`HandFinger::index`].
    pub palm_strength: [f32; HandFinger::COUNT],
}

impl HandFingerSnapshot {
    /// A snapshot where every finger in `pinching` pinches at full strength.
    pub fn pinch(pinching: HandFingerFlags) -> Self {
        let mut s = Self {
            pinching,
            ..Self::default()
        };
        for f in pinching.fingers() {
            s.pinch_strength[f.index()] = 1.0;
        }
        s
    }

    /// A snapshot where every finger in `grabbing` grips the palm at full strength.
    pub fn palm(grabbing: HandFingerFlags) -> Self {
        let mut s = Self {
            palm_grabbing: grabbing,
            ..Self::default()
        };
        for f in grabbing.fingers() {
            s.palm_strength[f.index()] = 1.0;
        }
        s
    }
}

/// Per-tick source of finger state.
pub trait FingerStateSource {
    /// Sample the hand for this tick.
    fn snapshot(&mut self) -> HandFingerSnapshot;
}

impl<F: FnMut() -> HandFingerSnapshot> FingerStateSource for F {
    fn snapshot(&mut self) -> HandFingerSnapshot {
        self()
    }
}

/// Grabbing flags and strengths for one grab type, with the previous tick's flags.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FingerGrabTracker {
    previous: HandFingerFlags,
    current: HandFingerFlags,
    strength: [f32; HandFinger::COUNT],
}

impl FingerGrabTracker {
    /// Advance to a new tick.
    pub fn update(&mut self, grabbing: HandFingerFlags, strength: [f32; HandFinger::COUNT]) {
        self.previous = self.current;
        self.current = grabbing;
        self.strength = strength;
    }

    /// Fingers grabbing this tick.
    pub fn grabbing(&self) -> HandFingerFlags {
        self.current
    }

    /// Returns true if `finger` is grabbing this tick.
    pub fn is_grabbing(&self, finger: HandFinger) -> bool {
        self.current.has(finger)
    }

    /// Returns true if `finger` changed this tick to grabbing (`target = true`) or to
    /// released (`target = false`).
    pub fn is_grabbing_changed(&self, finger: HandFinger, target: bool) -> bool {
        self.current.has(finger) == target && self.previous.has(finger) != target
    }

    /// Fingers that started grabbing this tick.
    pub fn started(&self) -> HandFingerFlags {
        self.current - self.previous
    }

    /// Fingers that stopped grabbing this tick.
    pub fn stopped(&self) -> HandFingerFlags {
        self.previous - self.current
    }

    /// Strength of `finger`.
    pub fn strength(&self, finger: HandFinger) -> f32 {
        self.strength[finger.index()]
    }

    /// How close the hand is to satisfying `rule`, in `0.0..=1.0`.
    ///
    /// The weakest required finger decides; without required fingers, the strongest
    /// optional one. With `include_grabbing = false`, fingers already grabbing are left
    /// out, and a rule whose considered fingers all grab already scores `1.0`.
    pub fn score(&self, rule: &GrabbingRule, include_grabbing: bool) -> f32 {
        let considered = |set: HandFingerFlags| {
            if include_grabbing {
                set
            } else {
                set - self.current
            }
        };
        let required = rule.required_fingers();
        if !required.is_empty() {
            let pending = considered(required);
            if pending.is_empty() {
                return 1.0;
            }
            return pending
                .fingers()
                .map(|f| self.strength(f))
                .fold(f32::INFINITY, f32::min);
        }
        let optional = rule.optional_fingers();
        if optional.is_empty() {
            return 0.0;
        }
        let pending = considered(optional);
        if pending.is_empty() {
            return 1.0;
        }
        pending
            .fingers()
            .map(|f| self.strength(f))
            .fold(0.0, f32::max)
    }

    /// Returns true if the fingers grabbing now sustain `rule`.
    ///
    /// See [`GrabbingRule::sustaining_grab`].
    pub fn is_sustaining(&self, rule: &GrabbingRule) -> bool {
        rule.sustaining_grab(self.current)
    }

    /// Returns true if `rule` became satisfied this tick.
    pub fn select_edge(&self, rule: &GrabbingRule) -> bool {
        let required = rule.required_fingers();
        if required.is_empty() {
            return self.started().intersects(rule.optional_fingers());
        }
        self.current.contains(required) && self.started().intersects(required)
    }

    /// Returns true if `rule`'s release condition was met this tick.
    pub fn unselect_edge(&self, rule: &GrabbingRule) -> bool {
        let relevant = rule.relevant_fingers();
        match rule.unselect_mode {
            FingerUnselectMode::AllReleased => {
                !self.current.intersects(relevant) && self.stopped().intersects(relevant)
            }
            FingerUnselectMode::AnyReleased => {
                let required = rule.required_fingers();
                let watched = if required.is_empty() {
                    relevant
                } else {
                    required
                };
                self.stopped().intersects(watched)
            }
        }
    }
}

/// Pinch and palm trackers for one hand.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct HandGrabApi {
    pinch: FingerGrabTracker,
    palm: FingerGrabTracker,
}

impl HandGrabApi {
    /// Create trackers with nothing grabbing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance both trackers to `snapshot`.
    pub fn update(&mut self, snapshot: &HandFingerSnapshot) {
        self.pinch
            .update(snapshot.pinching, snapshot.pinch_strength);
        self.palm
            .update(snapshot.palm_grabbing, snapshot.palm_strength);
    }

    /// The pinch tracker.
    pub fn pinch(&self) -> &FingerGrabTracker {
        &self.pinch
    }

    /// The palm tracker.
    pub fn palm(&self) -> &FingerGrabTracker {
        &self.palm
    }

    /// The tracker for a single grab type; `None` unless `kind` is exactly one type.
    pub fn tracker(&self, kind: GrabTypeFlags) -> Option<&FingerGrabTracker> {
        if kind == GrabTypeFlags::PINCH {
            Some(&self.pinch)
        } else if kind == GrabTypeFlags::PALM {
            Some(&self.palm)
        } else {
            None
        }
    }

    /// Returns true if the `kind` tracker sustains `rule`.
    pub fn is_sustaining_grab(&self, rule: &GrabbingRule, kind: GrabTypeFlags) -> bool {
        self.tracker(kind).is_some_and(|t| t.is_sustaining(rule))
    }
}
