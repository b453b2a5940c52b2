// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Capabilities consumed from outside the core.
//!
//! ## Overview
//!
//! - [`ActiveState`]: a boolean gate sampled once per tick. A closed gate disables the
//!   interactor regardless of its internal state.
//! - [`Selector`]: an edge-triggered source of select/unselect pulses for the current tick.
//! - [`InteractableFilter`]: an eligibility predicate an interactor applies to candidates.
//!
//! Each has a blanket implementation for closures. [`ActiveFlag`] and [`PulseSelector`]
//! are small shared handles that let application code drive a gate or a selector from
//! elsewhere (an input system, a test).

use alloc::rc::Rc;
use core::cell::Cell;

use crate::interactable::Interactable;

/// Boolean gate that enables or disables an interactor.
pub trait ActiveState {
    /// Returns true if the owner may interact this tick.
    fn is_active(&self) -> bool;
}

impl<F: Fn() -> bool> ActiveState for F {
    fn is_active(&self) -> bool {
        self()
    }
}

/// Select/unselect pulses for one tick.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct SelectorPulses {
    /// A select was requested since the last poll.
    pub select: bool,
    /// An unselect was requested since the last poll.
    pub unselect: bool,
}

/// Edge-triggered selection input.
///
/// Polled once per tick. A pulse is reported by exactly one poll, so holding a button
/// down does not repeatedly select.
pub trait Selector {
    /// Take the pulses raised since the previous poll.
    fn poll(&mut self) -> SelectorPulses;
}

impl<F: FnMut() -> SelectorPulses> Selector for F {
    fn poll(&mut self) -> SelectorPulses {
        self()
    }
}

/// Eligibility predicate applied to every candidate interactable.
pub trait InteractableFilter<T> {
    /// Returns true if `interactable` may be considered.
    fn filter(&self, interactable: &Interactable<T>) -> bool;
}

impl<T, F: Fn(&Interactable<T>) -> bool> InteractableFilter<T> for F {
    fn filter(&self, interactable: &Interactable<T>) -> bool {
        self(interactable)
    }
}

/// Shared on/off switch implementing [`ActiveState`].
///
/// Clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct ActiveFlag(Rc<Cell<bool>>);

impl ActiveFlag {
    /// Create a flag with the given initial value.
    pub fn new(active: bool) -> Self {
        Self(Rc::new(Cell::new(active)))
    }

    /// Open or close the gate.
    pub fn set(&self, active: bool) {
        self.0.set(active);
    }

    /// Current value.
    pub fn get(&self) -> bool {
        self.0.get()
    }
}

impl ActiveState for ActiveFlag {
    fn is_active(&self) -> bool {
        self.0.get()
    }
}

/// Shared selector handle implementing [`Selector`].
///
/// Application code calls [`PulseSelector::request_select`] or
/// [`PulseSelector::request_unselect`]; the interactor owning a clone consumes the
/// pulses on its next tick.
#[derive(Clone, Debug, Default)]
pub struct PulseSelector(Rc<Cell<SelectorPulses>>);

impl PulseSelector {
    /// Create a selector with no pending pulses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise a select pulse for the next tick.
    pub fn request_select(&self) {
        let mut p = self.0.get();
        p.select = true;
        self.0.set(p);
    }

    /// Raise an unselect pulse for the next tick.
    pub fn request_unselect(&self) {
        let mut p = self.0.get();
        p.unselect = true;
        self.0.set(p);
    }
}

impl Selector for PulseSelector {
    fn poll(&mut self) -> SelectorPulses {
        self.0.take()
    }
}
