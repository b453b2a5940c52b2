// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reference candidate strategies built on other crates.
//!
//! Enabled via feature flags to keep the core small and `no_std` by default.

#[cfg(feature = "proximity_adapter")]
pub mod proximity;
