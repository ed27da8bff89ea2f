//! The result of a successful draw.

use std::collections::HashSet;

use crate::exclusion::ExclusionMap;
use crate::participant::ParticipantId;

/// Receivers positionally aligned with the participant slice that produced
/// them: `receivers()[i]` is who `participants[i]` gives to.
///
/// An `Assignment` does not carry its participants; pass the same slice back
/// to the accessors that need it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Assignment {
    receivers: Vec<ParticipantId>,
}

impl Assignment {
    pub fn new(receivers: Vec<ParticipantId>) -> Self {
        Self { receivers }
    }

    /// Builds an assignment from a permutation of participant indices.
    pub fn from_indices(participants: &[ParticipantId], indices: &[usize]) -> Self {
        Self {
            receivers: indices.iter().map(|&i| participants[i].clone()).collect(),
        }
    }

    pub fn receivers(&self) -> &[ParticipantId] {
        &self.receivers
    }

    pub fn into_receivers(self) -> Vec<ParticipantId> {
        self.receivers
    }

    pub fn len(&self) -> usize {
        self.receivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receivers.is_empty()
    }

    /// Pairs each giver with its receiver.
    pub fn pairs<'a>(
        &'a self,
        participants: &'a [ParticipantId],
    ) -> impl Iterator<Item = (&'a ParticipantId, &'a ParticipantId)> + 'a {
        participants.iter().zip(self.receivers.iter())
    }

    /// Returns who `giver` was assigned, if `giver` is in `participants`.
    pub fn receiver_of(&self, participants: &[ParticipantId], giver: &str) -> Option<&ParticipantId> {
        participants
            .iter()
            .position(|p| p.as_str() == giver)
            .and_then(|i| self.receivers.get(i))
    }

    /// Checks that this is a permutation of `participants` with no giver
    /// drawing themselves and no excluded pair.
    pub fn is_valid_for(&self, participants: &[ParticipantId], exclusions: Option<&ExclusionMap>) -> bool {
        if self.receivers.len() != participants.len() {
            return false;
        }

        let pool: HashSet<&ParticipantId> = participants.iter().collect();
        let mut seen = HashSet::with_capacity(self.receivers.len());
        for (giver, receiver) in self.pairs(participants) {
            if giver == receiver || !pool.contains(receiver) || !seen.insert(receiver) {
                return false;
            }
            if exclusions.is_some_and(|ex| ex.is_excluded(giver.as_str(), receiver.as_str())) {
                return false;
            }
        }
        true
    }
}
