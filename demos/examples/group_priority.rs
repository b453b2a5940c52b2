// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two proximity interactors competing inside one group.
//!
//! A short-reach "poke" and a long-reach "ray" share a registry of knobs. The group
//! ranks their candidates by distance, so whichever child sees the closer knob
//! hovers it while its sibling idles. A knob then slides out of reach, and the group
//! hands control to the other child.
//!
//! Run:
//! - `RUST_LOG=trace cargo run -p understory_demos --example group_priority`

use kurbo::Point;
use understory_interaction::adapters::proximity::ProximityBehavior;
use understory_interaction::{
    Driver, Error, InteractableConfig, InteractableId, InteractableRegistry, Interactor,
    InteractorGroup, LeafInteractor, LowerScoreFirst,
};

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let registry = InteractableRegistry::shared();
    let near = registry
        .borrow_mut()
        .insert(Point::new(0.5, 0.0), InteractableConfig::default());
    let far = registry
        .borrow_mut()
        .insert(Point::new(8.0, 0.0), InteractableConfig::default());
    registry.borrow_mut().enable(near)?;
    registry.borrow_mut().enable(far)?;

    let poke = LeafInteractor::new(
        registry.clone(),
        ProximityBehavior::new(Point::ORIGIN, 1.0),
    );
    let ray = LeafInteractor::new(
        registry.clone(),
        ProximityBehavior::new(Point::ORIGIN, 10.0),
    );
    let children: Vec<Box<dyn Interactor>> = vec![Box::new(poke), Box::new(ray)];
    let group = InteractorGroup::new(children)?.with_comparer(LowerScoreFirst);

    let mut driver = Driver::new();
    let hand = driver.add(Box::new(group))?;
    if let Some(hand) = driver.get_mut(hand) {
        hand.events_mut()
            .subscribe(|e| tracing::info!(target: "hand", event = ?e));
    }

    driver.tick();
    report(&registry.borrow(), near, far);

    // The near knob slides away: the poke loses it and the ray picks the closest
    // knob still in its reach.
    if let Some(knob) = registry.borrow_mut().get_mut(near) {
        *knob.data_mut() = Point::new(9.0, 0.0);
    }
    driver.tick();
    report(&registry.borrow(), near, far);

    Ok(())
}

fn report(registry: &InteractableRegistry<Point>, near: InteractableId, far: InteractableId) {
    for (name, id) in [("near", near), ("far", far)] {
        if let Some(knob) = registry.get(id) {
            println!(
                "{name:>4} at {:?}: {} ({} hovering)",
                knob.data(),
                knob.state(),
                knob.interactors_count()
            );
        }
    }
}
