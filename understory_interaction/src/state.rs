// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! State enums shared by interactors and interactables.

/// Lifecycle state of an interactor (or interactor group).
///
/// A fresh interactor starts `Disabled` and becomes `Normal` the first tick its
/// active-state gate is open.
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
pub enum InteractorState {
    /// Gate closed or explicitly disabled.
    #[default]
    Disabled,
    /// Enabled, hovering nothing.
    Normal,
    /// Hovering an interactable.
    Hover,
    /// Selecting (possibly without a target).
    Select,
}

/// Aggregated state of an interactable.
///
/// Derived from the membership counts: any selecting interactor means `Select`,
/// otherwise any hovering interactor means `Hover`, otherwise `Normal`.
/// `Disabled` overrides all of them.
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
pub enum InteractableState {
    /// Not registered; accepts no interactors.
    #[default]
    Disabled,
    /// Registered, nobody interacting.
    Normal,
    /// At least one hovering interactor, nobody selecting.
    Hover,
    /// At least one selecting interactor.
    Select,
}

impl InteractableState {
    /// Derive the enabled state from membership counts.
    pub const fn from_counts(interactors: usize, selecting: usize) -> Self {
        if selecting > 0 {
            Self::Select
        } else if interactors > 0 {
            Self::Hover
        } else {
            Self::Normal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn select_outranks_hover() {
        assert_eq!(InteractableState::from_counts(0, 0), InteractableState::Normal);
        assert_eq!(InteractableState::from_counts(2, 0), InteractableState::Hover);
        assert_eq!(InteractableState::from_counts(2, 1), InteractableState::Select);
        assert_eq!(InteractableState::from_counts(0, 1), InteractableState::Select);
    }

    #[test]
    fn states_render_snake_case() {
        assert_eq!(InteractorState::Hover.to_string(), "hover");
        assert_eq!(InteractableState::Disabled.as_ref(), "disabled");
    }
}
