// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A hand pinching and releasing a mug from recorded finger frames.
//!
//! Each frame is one tracker sample. The hand approaches, pinches with thumb and
//! index, lets go of the index (the thumb alone still sustains the pinch), then
//! opens.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_demos --example hand_grab`

use std::cell::Cell;
use std::rc::Rc;

use understory_hand_grab::{HandFingerFlags, HandFingerSnapshot, HandGrabBehavior, HandGrabbable};
use understory_interaction::{
    Driver, Error, InteractableConfig, InteractableRegistry, LeafInteractor,
};

fn approaching() -> HandFingerSnapshot {
    HandFingerSnapshot {
        pinch_strength: [0.4; 5],
        ..HandFingerSnapshot::default()
    }
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let registry = InteractableRegistry::shared();
    let mug = registry
        .borrow_mut()
        .insert(HandGrabbable::default(), InteractableConfig::default());
    registry.borrow_mut().enable(mug)?;

    let frames = [
        ("idle", HandFingerSnapshot::default()),
        ("approach", approaching()),
        (
            "pinch",
            HandFingerSnapshot::pinch(HandFingerFlags::THUMB | HandFingerFlags::INDEX),
        ),
        ("thumb only", HandFingerSnapshot::pinch(HandFingerFlags::THUMB)),
        ("open", approaching()),
    ];

    let hand = Rc::new(Cell::new(HandFingerSnapshot::default()));
    let feed = hand.clone();
    let mut driver = Driver::new();
    let grabber = driver.add(Box::new(LeafInteractor::new(
        registry.clone(),
        HandGrabBehavior::new(move || feed.get()),
    )))?;

    for (label, frame) in frames {
        hand.set(frame);
        driver.tick();
        let state = driver.get(grabber).map(|g| g.state());
        let reg = registry.borrow();
        let mug_state = reg.get(mug).map(|m| m.state());
        println!("{label:>10}: hand {state:?}, mug {mug_state:?}");
    }
    Ok(())
}
