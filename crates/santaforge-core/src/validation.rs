//! Opt-in input checks for callers that want them.
//!
//! The draw engine assumes well-formed input and degrades gracefully when it
//! is not. Request handlers can run these first to turn bad input into a
//! proper error instead.

use std::collections::HashSet;

use crate::error::{Result, SantaForgeError};
use crate::participant::ParticipantId;

/// Rejects participant lists containing the same id twice.
pub fn validate_participants(participants: &[ParticipantId]) -> Result<()> {
    let mut seen = HashSet::with_capacity(participants.len());
    for id in participants {
        if !seen.insert(id) {
            return Err(SantaForgeError::InvalidParticipants(id.clone()));
        }
    }
    Ok(())
}

/// Rejects self-exclusions and exclusions naming unknown participants.
pub fn validate_exclusion(
    giver: &ParticipantId,
    excluded: &ParticipantId,
    participants: &[ParticipantId],
) -> Result<()> {
    let invalid = |message| SantaForgeError::InvalidExclusion {
        giver: giver.clone(),
        excluded: excluded.clone(),
        message,
    };

    if giver == excluded {
        return Err(invalid("a participant cannot exclude themselves"));
    }
    if !participants.contains(giver) {
        return Err(invalid("giver is not a participant"));
    }
    if !participants.contains(excluded) {
        return Err(invalid("excluded receiver is not a participant"));
    }
    Ok(())
}
