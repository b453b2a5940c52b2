// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Distance-based candidate strategy over `kurbo` points.
//!
//! ## Feature
//!
//! Enable with `proximity_adapter`.
//!
//! ## Notes
//!
//! The candidate score is the distance from the interactor's origin, so groups mixing
//! proximity interactors should rank children with
//! [`LowerScoreFirst`](crate::candidate::LowerScoreFirst).
//!
//! ```
//! use kurbo::Point;
//! use understory_interaction::adapters::proximity::{Positioned, ProximityBehavior};
//! use understory_interaction::{
//!     Interactor, InteractableConfig, InteractableRegistry, LeafInteractor,
//! };
//!
//! struct Knob(Point);
//! impl Positioned for Knob {
//!     fn position(&self) -> Point { self.0 }
//! }
//!
//! let registry = InteractableRegistry::shared();
//! let far = registry.borrow_mut().insert(Knob(Point::new(5.0, 0.0)), InteractableConfig::default());
//! let near = registry.borrow_mut().insert(Knob(Point::new(1.0, 0.0)), InteractableConfig::default());
//! registry.borrow_mut().enable(far).unwrap();
//! registry.borrow_mut().enable(near).unwrap();
//!
//! let mut finger = LeafInteractor::new(registry.clone(), ProximityBehavior::new(Point::ORIGIN, 2.0));
//! finger.drive();
//! assert_eq!(finger.interactable(), Some(near));
//! ```

use kurbo::Point;

use crate::candidate::CandidateProperties;
use crate::leaf::InteractorBehavior;
use crate::registry::Candidates;

/// Payloads with a world position.
pub trait Positioned {
    /// Current position.
    fn position(&self) -> Point;
}

impl Positioned for Point {
    fn position(&self) -> Point {
        *self
    }
}

/// Picks the nearest interactable within `radius` of `origin`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ProximityBehavior {
    /// Where the interactor is.
    pub origin: Point,
    /// Maximum reach; interactables farther away are ignored.
    pub radius: f64,
}

impl ProximityBehavior {
    /// Create a strategy at `origin` reaching `radius`.
    pub const fn new(origin: Point, radius: f64) -> Self {
        Self { origin, radius }
    }

    /// Move the interactor.
    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }
}

impl<T: Positioned> InteractorBehavior<T> for ProximityBehavior {
    fn compute_candidate(&mut self, candidates: Candidates<'_, T>) -> Option<CandidateProperties> {
        let mut best: Option<(f64, CandidateProperties)> = None;
        for it in candidates {
            let d = self.origin.distance(it.data().position());
            if d > self.radius || best.is_some_and(|(b, _)| d >= b) {
                continue;
            }
            #[allow(
                clippy::cast_possible_truncation,
                reason = "Scores are f32; distances beyond f32 range are not meaningful here."
            )]
            let score = d as f32;
            best = Some((d, CandidateProperties::new(it.id(), score)));
        }
        best.map(|(_, c)| c)
    }
}
