// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-kind catalog of interactables and candidate pruning.
//!
//! ## Overview
//!
//! An [`InteractableRegistry<T>`] stores every interactable of one kind (identified by
//! its payload type `T`) and tracks which of them are currently enabled.
//! Interactors of the matching kind share it as a [`SharedRegistry<T>`], handed to
//! them at construction; there is no global registry.
//!
//! ## Registration
//!
//! An interactable appears in [`InteractableRegistry::list`] exactly while it is enabled.
//! [`InteractableRegistry::enable`] registers it and [`InteractableRegistry::disable`]
//! evicts its members and unregisters it, so nothing is ever registered twice.
//!
//! ## Candidate pruning
//!
//! [`InteractableRegistry::list_for`] lazily yields the live interactables an interactor
//! may consider: those passing every filter of the interactor and whose capacity
//! admits it (see [`Interactable::accepts_candidate`]). Registration order is
//! preserved. The sequence borrows the registry immutably, so it cannot be mutated
//! while a traversal is in flight.
//!
//! ```
//! use understory_interaction::{InteractableConfig, InteractableRegistry, InteractorId};
//!
//! let mut registry: InteractableRegistry<&str> = InteractableRegistry::new();
//! let cube = registry.insert("cube", InteractableConfig::default());
//! let ball = registry.insert("ball", InteractableConfig::default());
//! registry.enable(cube).unwrap();
//! registry.enable(ball).unwrap();
//! registry.disable(cube).unwrap();
//!
//! let me = InteractorId::next();
//! let names: Vec<_> = registry.list_for(me, &[]).map(|it| *it.data()).collect();
//! assert_eq!(names, ["ball"]);
//! ```

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use crate::capability::InteractableFilter;
use crate::config::InteractableConfig;
use crate::error::RegistryError;
use crate::id::{InteractableId, InteractorId};
use crate::interactable::Interactable;

/// A registry shared between the interactors of one kind.
pub type SharedRegistry<T> = Rc<RefCell<InteractableRegistry<T>>>;

/// Arena and live list of interactables of one kind.
pub struct InteractableRegistry<T> {
    slots: Vec<Option<Interactable<T>>>, // slots
    generations: Vec<u32>,               // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    live: Vec<InteractableId>, // enabled, in registration order
}

impl<T> Default for InteractableRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> core::fmt::Debug for InteractableRegistry<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.slots.len();
        let alive = self.slots.iter().filter(|s| s.is_some()).count();
        f.debug_struct("InteractableRegistry")
            .field("slots_total", &total)
            .field("slots_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("live", &self.live)
            .finish_non_exhaustive()
    }
}

impl<T> InteractableRegistry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            live: Vec::new(),
        }
    }

    /// Create an empty registry ready to be shared with interactors.
    pub fn shared() -> SharedRegistry<T> {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Store a new interactable. It starts `Disabled` and unregistered.
    pub fn insert(&mut self, data: T, config: InteractableConfig) -> InteractableId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            (idx, generation)
        } else {
            self.slots.push(None);
            self.generations.push(1);
            (self.slots.len() - 1, 1)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "InteractableId uses 32-bit indices by design."
        )]
        let id = InteractableId::new(idx as u32, generation);
        self.slots[idx] = Some(Interactable::new(id, data, config));
        id
    }

    /// Returns true if `id` refers to a stored interactable.
    pub fn is_alive(&self, id: InteractableId) -> bool {
        self.get(id).is_some()
    }

    /// Look up an interactable.
    pub fn get(&self, id: InteractableId) -> Option<&Interactable<T>> {
        self.slots
            .get(id.idx())?
            .as_ref()
            .filter(|it| it.id().generation() == id.generation())
    }

    /// Look up an interactable mutably.
    pub fn get_mut(&mut self, id: InteractableId) -> Option<&mut Interactable<T>> {
        self.slots
            .get_mut(id.idx())?
            .as_mut()
            .filter(|it| it.id().generation() == id.generation())
    }

    /// Enable and register an interactable.
    ///
    /// Returns `Ok(false)` if it was already enabled.
    pub fn enable(&mut self, id: InteractableId) -> Result<bool, RegistryError> {
        let it = self.get_mut(id).ok_or(RegistryError::Stale(id))?;
        if !it.enable() {
            return Ok(false);
        }
        self.live.push(id);
        tracing::debug!(interactable = %id, "registered");
        Ok(true)
    }

    /// Evict all members (selecting first, then hovering), disable and unregister.
    ///
    /// Interactors that referenced it drop their stale references on their next
    /// update. Returns `Ok(false)` if it was already disabled.
    pub fn disable(&mut self, id: InteractableId) -> Result<bool, RegistryError> {
        let it = self.get_mut(id).ok_or(RegistryError::Stale(id))?;
        if !it.disable() {
            return Ok(false);
        }
        self.live.retain(|&l| l != id);
        tracing::debug!(interactable = %id, "unregistered");
        Ok(true)
    }

    /// Disable an interactable and free its slot, returning its payload.
    pub fn remove(&mut self, id: InteractableId) -> Result<T, RegistryError> {
        self.disable(id)?;
        let slot = self
            .slots
            .get_mut(id.idx())
            .and_then(Option::take)
            .ok_or(RegistryError::Stale(id))?;
        self.free_list.push(id.idx());
        Ok(slot.into_data())
    }

    /// The enabled interactables, in registration order.
    pub fn list(&self) -> &[InteractableId] {
        &self.live
    }

    /// Iterate the enabled interactables, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Interactable<T>> + '_ {
        self.live.iter().filter_map(|&id| self.get(id))
    }

    /// Number of enabled interactables.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Returns true if nothing is enabled.
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Lazily yield the enabled interactables `interactor` may consider as candidates.
    ///
    /// An interactable is included iff every filter accepts it and its capacity admits
    /// `interactor`. Calling this again restarts the traversal.
    pub fn list_for<'a>(
        &'a self,
        interactor: InteractorId,
        filters: &'a [Box<dyn InteractableFilter<T>>],
    ) -> Candidates<'a, T> {
        Candidates {
            registry: self,
            interactor,
            filters,
            cursor: 0,
        }
    }
}

/// Lazy candidate sequence produced by [`InteractableRegistry::list_for`].
pub struct Candidates<'a, T> {
    registry: &'a InteractableRegistry<T>,
    interactor: InteractorId,
    filters: &'a [Box<dyn InteractableFilter<T>>],
    cursor: usize,
}

impl<T> Clone for Candidates<'_, T> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry,
            interactor: self.interactor,
            filters: self.filters,
            cursor: self.cursor,
        }
    }
}

impl<T> core::fmt::Debug for Candidates<'_, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Candidates")
            .field("interactor", &self.interactor)
            .field("filters", &self.filters.len())
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

impl<'a, T> Candidates<'a, T> {
    /// The interactor the sequence was pruned for.
    pub fn interactor(&self) -> InteractorId {
        self.interactor
    }
}

impl<'a, T> Iterator for Candidates<'a, T> {
    type Item = &'a Interactable<T>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&id) = self.registry.live.get(self.cursor) {
            self.cursor += 1;
            let Some(it) = self.registry.get(id) else {
                continue;
            };
            if !self.filters.iter().all(|f| f.filter(it)) {
                continue;
            }
            if !it.accepts_candidate(self.interactor) {
                continue;
            }
            return Some(it);
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.registry.live.len().saturating_sub(self.cursor)))
    }
}
