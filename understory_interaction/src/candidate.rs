// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Candidates and how groups rank them.
//!
//! ## Comparer contract
//!
//! [`CandidateComparer::compare`] returns `Less` or `Equal` when the first argument is
//! preferred and `Greater` when the second is. Groups scan children in list order and
//! only replace the current best on `Greater`, so list order breaks every tie.

use alloc::boxed::Box;
use core::cmp::Ordering;

use crate::id::InteractableId;

/// What an interactor would select if a select edge fired now.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CandidateProperties {
    /// The candidate interactable.
    pub interactable: InteractableId,
    /// Strategy-specific ranking value (a distance, a grab strength, ...).
    ///
    /// Interpretation is left to the [`CandidateComparer`] in use.
    pub score: f32,
}

impl CandidateProperties {
    /// Candidate with a score.
    pub const fn new(interactable: InteractableId, score: f32) -> Self {
        Self {
            interactable,
            score,
        }
    }
}

/// Ranks two candidates from sibling interactors.
pub trait CandidateComparer {
    /// `Less`/`Equal` prefers `a`, `Greater` prefers `b`.
    fn compare(&self, a: &CandidateProperties, b: &CandidateProperties) -> Ordering;
}

impl<F: Fn(&CandidateProperties, &CandidateProperties) -> Ordering> CandidateComparer for F {
    fn compare(&self, a: &CandidateProperties, b: &CandidateProperties) -> Ordering {
        self(a, b)
    }
}

/// Prefers the larger score (strengths, confidences).
#[derive(Copy, Clone, Debug, Default)]
pub struct HigherScoreFirst;

impl CandidateComparer for HigherScoreFirst {
    fn compare(&self, a: &CandidateProperties, b: &CandidateProperties) -> Ordering {
        // NaN compares equal so the earlier child keeps priority.
        b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal)
    }
}

/// Prefers the smaller score (distances).
#[derive(Copy, Clone, Debug, Default)]
pub struct LowerScoreFirst;

impl CandidateComparer for LowerScoreFirst {
    fn compare(&self, a: &CandidateProperties, b: &CandidateProperties) -> Ordering {
        a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal)
    }
}

/// Compare two optional candidates the way groups rank children.
///
/// Mirrors the group contract exactly:
/// - neither side has a candidate: first preferred;
/// - only one side has a candidate: that side;
/// - both do: the comparer decides, and without one the first is preferred.
pub fn compare_candidates(
    comparer: Option<&dyn CandidateComparer>,
    a: Option<&CandidateProperties>,
    b: Option<&CandidateProperties>,
) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Less,
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (Some(a), Some(b)) => match comparer {
            None => Ordering::Less,
            Some(c) => match c.compare(a, b) {
                Ordering::Greater => Ordering::Greater,
                _ => Ordering::Less,
            },
        },
    }
}

/// Boxed comparer, as stored by groups.
pub type BoxedComparer = Box<dyn CandidateComparer>;
