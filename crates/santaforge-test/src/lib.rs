//! Shared test fixtures for SantaForge crates.
//!
//! - [`fixtures`] - participant lists, exclusion maps and records
//! - [`assertions`] - checks for the derangement invariants
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! santaforge-test = { workspace = true }
//! ```
//!
//! Then import the fixtures you need:
//!
//! ```ignore
//! use santaforge_test::{participants, exclusions, assert_valid_derangement};
//! ```

pub mod assertions;
pub mod fixtures;

pub use assertions::assert_valid_derangement;
pub use fixtures::{couples, exclusions, numbered_participants, participants, records};
