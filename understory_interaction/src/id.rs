// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Identity primitives for interactors and interactables.

use core::sync::atomic::{AtomicU32, Ordering};

static NEXT_INTERACTOR: AtomicU32 = AtomicU32::new(1);

/// Opaque identity of an interactor (or an interactor group).
///
/// Identifiers are allocated from a process-wide counter and are never reused,
/// so an interactable can hold them without worrying about aliasing.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InteractorId(u32);

impl InteractorId {
    /// Allocate a fresh, unique identifier.
    pub fn next() -> Self {
        Self(NEXT_INTERACTOR.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value, useful for logs.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for InteractorId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "interactor#{}", self.0)
    }
}

/// Handle to an interactable stored in an [`InteractableRegistry`](crate::InteractableRegistry).
///
/// A slot index plus a generation counter, in the same spirit as a box-tree node id:
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed and every handle to it becomes stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct id.
///
/// Stale handles never alias a different live interactable because the generation must match.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InteractableId(pub(crate) u32, pub(crate) u32);

impl InteractableId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

impl core::fmt::Display for InteractableId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "interactable#{}v{}", self.0, self.1)
    }
}
