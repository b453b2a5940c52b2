// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Declarative per-finger grab policy.
//!
//! A [`GrabbingRule`] states, for each finger, whether it is required, optional or
//! ignored for a grab, and how the grab is released. Rules are plain values. The only
//! derived construction is [`GrabbingRule::with_mask`], which freezes a rule to the
//! fingers that actually started a grab.
//!
//! ```
//! use understory_hand_grab::{GrabbingRule, HandFingerFlags};
//!
//! let rule = GrabbingRule::DEFAULT_PINCH_RULE;
//! assert!(rule.sustaining_grab(HandFingerFlags::THUMB));
//! assert!(!rule.sustaining_grab(HandFingerFlags::INDEX));
//! // Ring and pinky are ignored by the default pinch.
//! assert_eq!(
//!     rule.strip_irrelevant(HandFingerFlags::all()),
//!     HandFingerFlags::THUMB | HandFingerFlags::INDEX | HandFingerFlags::MIDDLE
//! );
//! ```

use crate::finger::{FingerRequirement, FingerUnselectMode, HandFinger, HandFingerFlags};

use FingerRequirement::{Ignored, Optional, Required};

/// Per-finger requirements plus a release policy.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GrabbingRule {
    /// Thumb requirement.
    pub thumb: FingerRequirement,
    /// Index finger requirement.
    pub index: FingerRequirement,
    /// Middle finger requirement.
    pub middle: FingerRequirement,
    /// Ring finger requirement.
    pub ring: FingerRequirement,
    /// Pinky requirement.
    pub pinky: FingerRequirement,
    /// When the grab is released.
    pub unselect_mode: FingerUnselectMode,
}

impl GrabbingRule {
    /// Palm grab: index, middle and ring required; thumb and pinky optional.
    pub const DEFAULT_PALM_RULE: Self = Self {
        thumb: Optional,
        index: Required,
        middle: Required,
        ring: Required,
        pinky: Optional,
        unselect_mode: FingerUnselectMode::AllReleased,
    };

    /// Pinch: thumb required; index and middle optional; ring and pinky ignored.
    pub const DEFAULT_PINCH_RULE: Self = Self {
        thumb: Required,
        index: Optional,
        middle: Optional,
        ring: Ignored,
        pinky: Ignored,
        unselect_mode: FingerUnselectMode::AllReleased,
    };

    /// Every finger required.
    pub const FULL_GRAB: Self = Self {
        thumb: Required,
        index: Required,
        middle: Required,
        ring: Required,
        pinky: Required,
        unselect_mode: FingerUnselectMode::AllReleased,
    };

    /// Build a rule from requirements in thumb-to-pinky order.
    pub const fn new(
        requirements: [FingerRequirement; HandFinger::COUNT],
        unselect_mode: FingerUnselectMode,
    ) -> Self {
        let [thumb, index, middle, ring, pinky] = requirements;
        Self {
            thumb,
            index,
            middle,
            ring,
            pinky,
            unselect_mode,
        }
    }

    /// `base` restricted to the fingers in `mask`; every other finger is ignored.
    ///
    /// Used to freeze the subset of fingers that started a grab, so that release is
    /// judged against those fingers only.
    pub fn with_mask(mask: HandFingerFlags, base: &Self) -> Self {
        let mut rule = Self {
            unselect_mode: base.unselect_mode,
            ..Self::default()
        };
        for finger in mask.fingers() {
            rule = rule.with_requirement(finger, base.requirement(finger));
        }
        rule
    }

    /// The requirement for `finger`.
    pub const fn requirement(&self, finger: HandFinger) -> FingerRequirement {
        match finger {
            HandFinger::Thumb => self.thumb,
            HandFinger::Index => self.index,
            HandFinger::Middle => self.middle,
            HandFinger::Ring => self.ring,
            HandFinger::Pinky => self.pinky,
        }
    }

    /// A copy with `finger` set to `requirement`.
    #[must_use]
    pub const fn with_requirement(mut self, finger: HandFinger, requirement: FingerRequirement) -> Self {
        match finger {
            HandFinger::Thumb => self.thumb = requirement,
            HandFinger::Index => self.index = requirement,
            HandFinger::Middle => self.middle = requirement,
            HandFinger::Ring => self.ring = requirement,
            HandFinger::Pinky => self.pinky = requirement,
        }
        self
    }

    /// Fingers whose requirement is exactly `requirement`.
    pub fn fingers_with(&self, requirement: FingerRequirement) -> HandFingerFlags {
        HandFinger::ALL
            .into_iter()
            .filter(|&f| self.requirement(f) == requirement)
            .fold(HandFingerFlags::empty(), |acc, f| acc | f.flag())
    }

    /// Required fingers.
    pub fn required_fingers(&self) -> HandFingerFlags {
        self.fingers_with(Required)
    }

    /// Optional fingers.
    pub fn optional_fingers(&self) -> HandFingerFlags {
        self.fingers_with(Optional)
    }

    /// Fingers that are not ignored.
    pub fn relevant_fingers(&self) -> HandFingerFlags {
        self.required_fingers() | self.optional_fingers()
    }

    /// Clear the fingers this rule ignores.
    pub fn strip_irrelevant(&self, fingers: HandFingerFlags) -> HandFingerFlags {
        fingers & self.relevant_fingers()
    }

    /// Returns true if every required finger is in `active`.
    ///
    /// A rule without required fingers is sustained while any of its optional fingers
    /// is active, and a rule ignoring every finger is never sustained.
    pub fn sustaining_grab(&self, active: HandFingerFlags) -> bool {
        let required = self.required_fingers();
        if required.is_empty() {
            return active.intersects(self.optional_fingers());
        }
        active.contains(required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask(bits: u8) -> HandFingerFlags {
        HandFingerFlags::from_bits_truncate(bits)
    }

    #[test]
    fn thumb_and_index_pinch_is_sustained_only_by_both() {
        let rule = GrabbingRule::new(
            [Required, Required, Optional, Ignored, Ignored],
            FingerUnselectMode::AllReleased,
        );
        assert!(rule.sustaining_grab(HandFingerFlags::THUMB | HandFingerFlags::INDEX));
        assert!(rule.sustaining_grab(HandFingerFlags::all()));
        assert!(!rule.sustaining_grab(HandFingerFlags::THUMB));
    }

    #[test]
    fn masking_full_grab_round_trips() {
        for bits in 0..32 {
            let m = mask(bits);
            let frozen = GrabbingRule::with_mask(m, &GrabbingRule::FULL_GRAB);
            assert_eq!(frozen.strip_irrelevant(HandFingerFlags::all()), m, "mask {bits:#07b}");
            assert_eq!(frozen.required_fingers(), m);
        }
    }

    #[test]
    fn masking_keeps_only_relevant_fingers_of_the_base() {
        let base = GrabbingRule::DEFAULT_PINCH_RULE;
        for bits in 0..32 {
            let m = mask(bits);
            let frozen = GrabbingRule::with_mask(m, &base);
            assert_eq!(
                frozen.strip_irrelevant(HandFingerFlags::all()),
                m & base.relevant_fingers()
            );
            assert_eq!(frozen.unselect_mode, base.unselect_mode);
        }
        let frozen = GrabbingRule::with_mask(
            HandFingerFlags::THUMB | HandFingerFlags::MIDDLE,
            &GrabbingRule::DEFAULT_PALM_RULE,
        );
        assert_eq!(frozen.thumb, Optional);
        assert_eq!(frozen.middle, Required);
        assert_eq!(frozen.index, Ignored);
    }

    #[test]
    fn presets() {
        assert_eq!(
            GrabbingRule::DEFAULT_PALM_RULE.required_fingers(),
            HandFingerFlags::INDEX | HandFingerFlags::MIDDLE | HandFingerFlags::RING
        );
        assert_eq!(GrabbingRule::FULL_GRAB.required_fingers(), HandFingerFlags::all());
        assert!(!GrabbingRule::default().sustaining_grab(HandFingerFlags::all()));
    }

    #[test]
    fn optional_only_rule_is_sustained_by_its_own_fingers() {
        let index_only = GrabbingRule::with_mask(HandFingerFlags::INDEX, &GrabbingRule::DEFAULT_PINCH_RULE);
        assert!(index_only.required_fingers().is_empty());
        assert!(index_only.sustaining_grab(HandFingerFlags::INDEX | HandFingerFlags::RING));
        assert!(!index_only.sustaining_grab(HandFingerFlags::empty()));
        assert!(!index_only.sustaining_grab(HandFingerFlags::RING));
    }
}
