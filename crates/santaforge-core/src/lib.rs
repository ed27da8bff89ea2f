//! SantaForge Core - Core types for gift-exchange draws
//!
//! This crate provides the plain data the draw engine works on:
//! - Participant identifiers
//! - Directed exclusion records and the sparse exclusion map
//! - The assignment produced by a draw
//! - Error types for configuration and input validation

pub mod assignment;
pub mod error;
pub mod exclusion;
pub mod participant;
pub mod validation;


pub use assignment::Assignment;
pub use error::{Result, SantaForgeError};
pub use exclusion::{ExclusionMap, ExclusionRecord};
pub use participant::ParticipantId;
pub use validation::{validate_exclusion, validate_participants};
