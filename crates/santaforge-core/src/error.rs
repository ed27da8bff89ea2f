//! Error types for SantaForge

use thiserror::Error;

use crate::participant::ParticipantId;

/// Main error type for SantaForge operations.
///
/// The draw engine itself never returns these; an impossible draw is `None`
/// and a refused exclusion is a decision value. Errors come from loading
/// configuration and from the opt-in validation helpers.
#[derive(Debug, Error)]
pub enum SantaForgeError {
    /// Error in draw configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The participant list is malformed
    #[error("Invalid participants: duplicate id {0}")]
    InvalidParticipants(ParticipantId),

    /// An exclusion cannot be applied to the participant list
    #[error("Invalid exclusion {giver} -> {excluded}: {message}")]
    InvalidExclusion {
        giver: ParticipantId,
        excluded: ParticipantId,
        message: &'static str,
    },
}

/// Result type alias for SantaForge operations
pub type Result<T> = std::result::Result<T, SantaForgeError>;
