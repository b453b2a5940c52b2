// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Root driver: advances each root interactor exactly once per tick.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::error::DriverError;
use crate::id::InteractorId;
use crate::interactor::Interactor;

/// Owns root interactors and steps them in insertion order.
#[derive(Default)]
pub struct Driver {
    roots: Vec<Box<dyn Interactor>>,
    ticks: u64,
}

impl core::fmt::Debug for Driver {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let ids: Vec<InteractorId> = self.roots.iter().map(|r| r.id()).collect();
        f.debug_struct("Driver")
            .field("roots", &ids)
            .field("ticks", &self.ticks)
            .finish()
    }
}

impl Driver {
    /// Create an empty driver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a root interactor.
    ///
    /// Children of a group are not root and are rejected, as is an interactor that is
    /// already driven.
    pub fn add(&mut self, interactor: Box<dyn Interactor>) -> Result<InteractorId, DriverError> {
        let id = interactor.id();
        if !interactor.is_root_driver() {
            return Err(DriverError::NotRoot(id));
        }
        if self.roots.iter().any(|r| r.id() == id) {
            return Err(DriverError::Duplicate(id));
        }
        tracing::debug!(interactor = %id, "root added");
        self.roots.push(interactor);
        Ok(id)
    }

    /// Release a root interactor, disabling it first.
    pub fn remove(&mut self, id: InteractorId) -> Option<Box<dyn Interactor>> {
        let pos = self.roots.iter().position(|r| r.id() == id)?;
        let mut root = self.roots.remove(pos);
        root.disable();
        tracing::debug!(interactor = %id, "root removed");
        Some(root)
    }

    /// Look up a root interactor.
    pub fn get(&self, id: InteractorId) -> Option<&dyn Interactor> {
        self.roots.iter().find(|r| r.id() == id).map(|r| &**r)
    }

    /// Look up a root interactor mutably.
    pub fn get_mut(&mut self, id: InteractorId) -> Option<&mut (dyn Interactor + 'static)> {
        self.roots.iter_mut().find(|r| r.id() == id).map(|r| &mut **r)
    }

    /// Number of roots.
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// Returns true if no roots are registered.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Advance every root once.
    pub fn tick(&mut self) {
        self.ticks += 1;
        tracing::trace!(tick = self.ticks, roots = self.roots.len(), "tick");
        for root in &mut self.roots {
            root.drive();
        }
    }

    /// Ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
