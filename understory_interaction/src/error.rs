// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction and configuration errors.
//!
//! Nothing inside a tick reports an error: capacity rejections and stale references
//! are ordinary outcomes. These types cover setup only.

use crate::id::{InteractableId, InteractorId};

/// Invalid interactor or group configuration.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// `max_iterations_per_frame` was zero, so the interactor could never transition.
    #[error("max_iterations_per_frame must be at least 1")]
    ZeroIterations,
}

/// Interactor group construction failures.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum GroupError {
    /// A group needs at least one child to route to.
    #[error("interactor group has no children")]
    Empty,
    /// Group-level configuration was invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Registry operations addressed at an interactable that no longer exists.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum RegistryError {
    /// The handle's slot was freed or reused.
    #[error("stale interactable handle {0}")]
    Stale(InteractableId),
}

/// Root driver misuse.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum DriverError {
    /// The interactor is owned by a group and must only be advanced by it.
    #[error("{0} is not a root driver")]
    NotRoot(InteractorId),
    /// The interactor is already driven by this driver.
    #[error("{0} is already driven")]
    Duplicate(InteractorId),
}

/// Any error produced by this crate.
///
/// Setup code touching the registry, groups and the driver can propagate all of them
/// with `?`:
///
/// ```
/// use understory_interaction::{
///     Candidates, CandidateProperties, Driver, Error, Interactor, InteractorBehavior,
///     InteractorGroup, InteractableConfig, InteractableRegistry, LeafInteractor,
///     RegistryError,
/// };
///
/// struct First;
/// impl InteractorBehavior<u8> for First {
///     fn compute_candidate(&mut self, mut c: Candidates<'_, u8>) -> Option<CandidateProperties> {
///         c.next().map(|it| CandidateProperties::new(it.id(), 0.0))
///     }
/// }
///
/// fn setup() -> Result<Driver, Error> {
///     let registry = InteractableRegistry::shared();
///     let knob = registry.borrow_mut().insert(7, InteractableConfig::default());
///     registry.borrow_mut().enable(knob)?;
///     let children: Vec<Box<dyn Interactor>> = vec![Box::new(LeafInteractor::new(registry.clone(), First))];
///     let mut driver = Driver::new();
///     driver.add(Box::new(InteractorGroup::new(children)?))?;
///     registry.borrow_mut().remove(knob)?;
///     // The handle is stale now.
///     registry.borrow_mut().enable(knob)?;
///     Ok(driver)
/// }
///
/// assert!(matches!(setup(), Err(Error::Registry(RegistryError::Stale(_)))));
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    /// See [`ConfigError`].
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// See [`GroupError`].
    #[error(transparent)]
    Group(#[from] GroupError),
    /// See [`RegistryError`].
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// See [`DriverError`].
    #[error(transparent)]
    Driver(#[from] DriverError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn messages_name_the_problem() {
        assert_eq!(
            GroupError::Empty.to_string(),
            "interactor group has no children"
        );
        let stale = RegistryError::Stale(InteractableId::new(4, 2));
        assert_eq!(stale.to_string(), "stale interactable handle interactable#4v2");
    }

    #[test]
    fn nested_errors_convert() {
        let e: GroupError = ConfigError::ZeroIterations.into();
        assert_eq!(e, GroupError::Config(ConfigError::ZeroIterations));
        let top: Error = e.into();
        assert!(matches!(top, Error::Group(GroupError::Config(_))));
    }
}
