// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover, select and release one interactable from a single interactor.
//!
//! A leaf interactor always proposes the first registered interactable. A
//! [`PulseSelector`] stands in for a trigger button, and every event published by the
//! interactor and the interactable is logged.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_demos --example interaction_basics`

use understory_interaction::{
    CandidateProperties, Candidates, Driver, Error, InteractableConfig, InteractableRegistry,
    InteractorBehavior, LeafInteractor, PulseSelector,
};

struct FirstInReach;

impl InteractorBehavior<&'static str> for FirstInReach {
    fn compute_candidate(
        &mut self,
        mut candidates: Candidates<'_, &'static str>,
    ) -> Option<CandidateProperties> {
        candidates
            .next()
            .map(|it| CandidateProperties::new(it.id(), 1.0))
    }
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let registry = InteractableRegistry::shared();
    let button = registry
        .borrow_mut()
        .insert("button", InteractableConfig::default());
    if let Some(it) = registry.borrow_mut().get_mut(button) {
        it.events_mut()
            .subscribe(|e| tracing::info!(target: "button", event = ?e));
    }

    let trigger = PulseSelector::new();
    let mut driver = Driver::new();
    let hand = driver.add(Box::new(
        LeafInteractor::new(registry.clone(), FirstInReach).with_selector(trigger.clone()),
    ))?;
    if let Some(hand) = driver.get_mut(hand) {
        hand.events_mut()
            .subscribe(|e| tracing::info!(target: "hand", event = ?e));
    }

    // Nothing is registered yet, so the hand stays in Normal.
    driver.tick();

    registry.borrow_mut().enable(button)?;
    driver.tick();

    trigger.request_select();
    driver.tick();

    trigger.request_unselect();
    driver.tick();

    // Disabling evicts the hand; it drops back to Normal on the next tick.
    registry.borrow_mut().disable(button)?;
    driver.tick();

    if let Some(hand) = driver.get(hand) {
        println!("after {} ticks the hand is {}", driver.ticks(), hand.state());
    }
    Ok(())
}
