// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fingers, finger sets and per-finger policies.

use bitflags::bitflags;

/// One finger of a hand.
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    PartialEq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HandFinger {
    /// Thumb.
    Thumb,
    /// Index finger.
    Index,
    /// Middle finger.
    Middle,
    /// Ring finger.
    Ring,
    /// Pinky.
    Pinky,
}

impl HandFinger {
    /// Number of fingers.
    pub const COUNT: usize = 5;

    /// All fingers, thumb first.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Thumb,
        Self::Index,
        Self::Middle,
        Self::Ring,
        Self::Pinky,
    ];

    /// Position in [`HandFinger::ALL`], for per-finger arrays.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The single-finger flag.
    pub const fn flag(self) -> HandFingerFlags {
        match self {
            Self::Thumb => HandFingerFlags::THUMB,
            Self::Index => HandFingerFlags::INDEX,
            Self::Middle => HandFingerFlags::MIDDLE,
            Self::Ring => HandFingerFlags::RING,
            Self::Pinky => HandFingerFlags::PINKY,
        }
    }
}

bitflags! {
    /// A set of fingers.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct HandFingerFlags: u8 {
        /// Thumb.
        const THUMB  = 0b0000_0001;
        /// Index finger.
        const INDEX  = 0b0000_0010;
        /// Middle finger.
        const MIDDLE = 0b0000_0100;
        /// Ring finger.
        const RING   = 0b0000_1000;
        /// Pinky.
        const PINKY  = 0b0001_0000;
    }
}

impl HandFingerFlags {
    /// Returns true if `finger` is in the set.
    pub const fn has(self, finger: HandFinger) -> bool {
        self.contains(finger.flag())
    }

    /// The fingers in the set, thumb first.
    pub fn fingers(self) -> impl Iterator<Item = HandFinger> {
        HandFinger::ALL.into_iter().filter(move |f| self.has(*f))
    }
}

impl From<HandFinger> for HandFingerFlags {
    fn from(finger: HandFinger) -> Self {
        finger.flag()
    }
}

/// How much a finger matters to a grab.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Eq,
    PartialEq,
    Hash,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FingerRequirement {
    /// Not considered at all.
    #[default]
    Ignored,
    /// Counts toward the grab but is not needed to sustain it.
    Optional,
    /// Must be engaged to sustain the grab.
    Required,
}

/// When a grab is released.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Eq,
    PartialEq,
    Hash,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FingerUnselectMode {
    /// Release once every engaged finger has let go.
    #[default]
    AllReleased,
    /// Release as soon as any required finger lets go.
    AnyReleased,
}

bitflags! {
    /// Grab types supported by a grabber or a grabbable.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct GrabTypeFlags: u8 {
        /// Fingertip pinch against the thumb.
        const PINCH = 0b0000_0001;
        /// Whole-hand grip against the palm.
        const PALM  = 0b0000_0010;
    }
}
