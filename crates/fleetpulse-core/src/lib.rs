//! FleetPulse core: fixture store, metrics randomizer, wire records, and errors.
//!
//! This crate defines the data shared by the gateway and the companion client.
//! It intentionally carries no transport or runtime dependencies; randomness is
//! always supplied by the caller so every draw can be reproduced from a seed.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod fixture;
pub mod randomizer;
pub mod tick;

/// Shared result type.
pub use error::{FleetPulseError, Result};
pub use fixture::{FixtureStore, ServerDescriptor};
pub use randomizer::{randomize, randomize_all, ServerMetricSnapshot, ServerStatus};
pub use tick::ScalarTick;
