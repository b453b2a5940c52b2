// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_interaction --heading-base-level=0

//! Understory Interaction: deterministic, `no_std` coordination of interactors and interactables.
//!
//! ## Overview
//!
//! An *interactor* is an active agent (a hand, a ray, a poke finger) that hovers and selects
//! *interactables*, the passive targets it can reach. This crate keeps the many-to-many
//! relationship between the two consistent, one discrete tick at a time:
//!
//! - [`Interactable`] owns its hovering and selecting members, enforces capacity limits and
//!   derives its state from the member counts.
//! - [`InteractableRegistry`] is the catalog of enabled interactables of one kind and prunes
//!   candidates for an interactor (filters and capacity).
//! - [`LeafInteractor`] runs the Disabled / Normal / Hover / Select state machine, with the
//!   kind-specific scoring supplied by an [`InteractorBehavior`].
//! - [`InteractorGroup`] and [`InteractorGroupMulti`] coordinate sibling interactors by
//!   priority, so only one of them selects at a time.
//! - [`Driver`] steps each root interactor exactly once per tick.
//!
//! It does not do tracking, hit testing or rendering. Inputs arrive through capabilities
//! ([`ActiveState`], [`Selector`], [`InteractableFilter`]) and outputs leave as events
//! ([`InteractorEvent`], [`InteractableEvent`]).
//!
//! ## Ticks
//!
//! Each tick, an interactor runs a bounded settling loop (see [`interactor`]): it samples its
//! active-state gate, recomputes its candidate, then hovers, selects or unselects as needed.
//! The loop runs at most [`InteractorConfig::max_iterations_per_frame`] times (3 by default)
//! so chained transitions settle within one tick and the tick always terminates.
//!
//! ## Ownership
//!
//! There is no global state apart from the interactor id counter. A registry is created
//! explicitly and handed to the interactors of its kind as a [`SharedRegistry`]. All work is
//! single-threaded; subscribers receive events by value and must not re-enter the registry.
//!
//! ## Minimal example
//!
//! ```
//! use understory_interaction::{
//!     Candidates, CandidateProperties, Capacity, Driver, Interactor, InteractorBehavior,
//!     InteractableConfig, InteractableRegistry, InteractableState, LeafInteractor,
//!     PulseSelector,
//! };
//!
//! struct First;
//! impl InteractorBehavior<&'static str> for First {
//!     fn compute_candidate(
//!         &mut self,
//!         mut c: Candidates<'_, &'static str>,
//!     ) -> Option<CandidateProperties> {
//!         c.next().map(|it| CandidateProperties::new(it.id(), 0.0))
//!     }
//! }
//!
//! let registry = InteractableRegistry::shared();
//! let one_at_a_time = InteractableConfig::limited(Capacity::Unbounded, Capacity::Limited(1));
//! let lever = registry.borrow_mut().insert("lever", one_at_a_time);
//! registry.borrow_mut().enable(lever).unwrap();
//!
//! let (left, right) = (PulseSelector::new(), PulseSelector::new());
//! let mut driver = Driver::new();
//! driver.add(Box::new(LeafInteractor::new(registry.clone(), First).with_selector(left.clone()))).unwrap();
//! driver.add(Box::new(LeafInteractor::new(registry.clone(), First).with_selector(right.clone()))).unwrap();
//! driver.tick();
//!
//! // Both hands grab in the same tick; the lever only admits one.
//! left.request_select();
//! right.request_select();
//! driver.tick();
//! let reg = registry.borrow();
//! let lever = reg.get(lever).unwrap();
//! assert_eq!(lever.state(), InteractableState::Select);
//! assert_eq!(lever.selecting_interactors_count(), 1);
//! assert_eq!(lever.interactors_count(), 2);
//! ```
//!
//! ## Features
//!
//! - `std`: forward `std` to dependencies.
//! - `serde`: serialize configuration values and state enums.
//! - `proximity_adapter`: distance-based reference strategy over `kurbo` points.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapters;
pub mod candidate;
pub mod capability;
pub mod config;
pub mod driver;
pub mod error;
pub mod event;
pub mod group;
pub mod group_multi;
pub mod id;
pub mod interactable;
pub mod interactor;
pub mod leaf;
pub mod registry;
pub mod state;

#[cfg(test)]
mod test_util;

pub use candidate::{
    BoxedComparer, CandidateComparer, CandidateProperties, HigherScoreFirst, LowerScoreFirst,
    compare_candidates,
};
pub use capability::{ActiveFlag, ActiveState, InteractableFilter, PulseSelector, Selector, SelectorPulses};
pub use config::{Capacity, DEFAULT_MAX_ITERATIONS_PER_FRAME, InteractableConfig, InteractorConfig};
pub use driver::Driver;
pub use error::{ConfigError, DriverError, Error, GroupError, RegistryError};
pub use event::{EventHub, InteractableEvent, InteractorEvent, StateChange, SubscriptionId};
pub use group::InteractorGroup;
pub use group_multi::InteractorGroupMulti;
pub use id::{InteractableId, InteractorId};
pub use interactable::Interactable;
pub use interactor::Interactor;
pub use leaf::{InteractorBehavior, LeafInteractor};
pub use registry::{Candidates, InteractableRegistry, SharedRegistry};
pub use state::{InteractableState, InteractorState};

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::boxed::Box;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    struct First;
    impl InteractorBehavior<u8> for First {
        fn compute_candidate(&mut self, mut c: Candidates<'_, u8>) -> Option<CandidateProperties> {
            c.next().map(|it| CandidateProperties::new(it.id(), 0.0))
        }
    }

    #[test]
    fn disabling_a_busy_interactable_evicts_selectors_first() {
        let registry = InteractableRegistry::shared();
        let target = registry.borrow_mut().insert(0, InteractableConfig::default());
        registry.borrow_mut().enable(target).unwrap();

        let mut driver = Driver::new();
        let selectors: Vec<PulseSelector> = (0..5).map(|_| PulseSelector::new()).collect();
        for s in &selectors {
            let hand = LeafInteractor::new(registry.clone(), First).with_selector(s.clone());
            driver.add(Box::new(hand)).unwrap();
        }
        driver.tick();
        selectors[0].request_select();
        selectors[1].request_select();
        driver.tick();

        let log = Rc::new(RefCell::new(Vec::new()));
        {
            let sink = log.clone();
            let mut reg = registry.borrow_mut();
            let it = reg.get_mut(target).unwrap();
            assert_eq!(it.selecting_interactors_count(), 2);
            assert_eq!(it.interactors_count(), 5);
            it.events_mut()
                .subscribe(move |e: &InteractableEvent| sink.borrow_mut().push(*e));
        }
        registry.borrow_mut().disable(target).unwrap();

        let log = log.borrow();
        let kind = |e: &InteractableEvent| match e {
            InteractableEvent::SelectingInteractorRemoved(_) => Some('s'),
            InteractableEvent::InteractorRemoved(_) => Some('h'),
            _ => None,
        };
        let order: alloc::string::String = log.iter().filter_map(kind).collect();
        // Selecting interactors also hover, so all five leave the hover set.
        assert_eq!(order, "sshhhhh");
        assert!(matches!(
            log.last(),
            Some(InteractableEvent::StateChanged(StateChange {
                new: InteractableState::Disabled,
                ..
            }))
        ));
        assert!(registry.borrow().list().is_empty());

        drop(log);

        // Every interactor self-heals on the next tick.
        driver.tick();
        let reg = registry.borrow();
        assert!(reg.get(target).unwrap().interactors().is_empty());
    }
}
