// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration values for interactors and interactables.

use crate::error::ConfigError;

/// Number of settling iterations an interactor runs per tick unless configured otherwise.
pub const DEFAULT_MAX_ITERATIONS_PER_FRAME: usize = 3;

/// Membership limit of an interactable.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Capacity {
    /// No limit.
    #[default]
    Unbounded,
    /// At most this many members.
    Limited(usize),
}

impl Capacity {
    /// Convert from the `-1 = unbounded` convention used by authoring tools.
    ///
    /// Any negative value is unbounded.
    pub const fn from_raw(raw: i32) -> Self {
        if raw < 0 {
            Self::Unbounded
        } else {
            Self::Limited(raw as usize)
        }
    }

    /// Back to the `-1 = unbounded` convention.
    pub fn to_raw(self) -> i32 {
        match self {
            Self::Unbounded => -1,
            Self::Limited(n) => i32::try_from(n).unwrap_or(i32::MAX),
        }
    }

    /// Returns true if `count` members already exhaust this capacity.
    pub const fn is_full(self, count: usize) -> bool {
        match self {
            Self::Unbounded => false,
            Self::Limited(n) => count >= n,
        }
    }
}

impl From<i32> for Capacity {
    fn from(raw: i32) -> Self {
        Self::from_raw(raw)
    }
}

/// Capacity limits applied to one interactable.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InteractableConfig {
    /// How many interactors may hover at once.
    pub max_interactors: Capacity,
    /// How many interactors may select at once.
    pub max_selecting_interactors: Capacity,
}

impl InteractableConfig {
    /// Limit both hover and select membership.
    pub const fn limited(max_interactors: Capacity, max_selecting_interactors: Capacity) -> Self {
        Self {
            max_interactors,
            max_selecting_interactors,
        }
    }
}

/// Per-interactor (or per-group) drive settings.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InteractorConfig {
    /// Upper bound on state transitions settled within a single tick.
    pub max_iterations_per_frame: usize,
}

impl Default for InteractorConfig {
    fn default() -> Self {
        Self {
            max_iterations_per_frame: DEFAULT_MAX_ITERATIONS_PER_FRAME,
        }
    }
}

impl InteractorConfig {
    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_iterations_per_frame == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        Ok(())
    }
}
