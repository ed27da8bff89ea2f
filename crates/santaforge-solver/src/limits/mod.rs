//! Exclusion limits and the add-exclusion policy.
//!
//! Cheap arithmetic caps run first; the feasibility oracle is the final
//! gate. The total cap is a heuristic pre-filter and deliberately not tight.

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use santaforge_config::{DrawConfig, MatchingAlgorithm, DEFAULT_MIN_PARTICIPANTS};
use santaforge_core::{ExclusionMap, ExclusionRecord, ParticipantId};

use crate::matching::is_derangement_possible_with;

/// Maximum number of directed exclusion records for a group.
///
/// Zero below three participants, otherwise
/// `floor((n - 2) * n / 4) * 2`.
///
/// # Examples
///
/// ```
/// use santaforge_solver::calculate_max_exclusions;
///
/// assert_eq!(calculate_max_exclusions(2), 0);
/// assert_eq!(calculate_max_exclusions(3), 0);
/// assert_eq!(calculate_max_exclusions(4), 4);
/// assert_eq!(calculate_max_exclusions(6), 12);
/// ```
pub fn calculate_max_exclusions(participant_count: usize) -> usize {
    if participant_count < DEFAULT_MIN_PARTICIPANTS {
        return 0;
    }
    (participant_count - 2) * participant_count / 4 * 2
}

/// Per-participant cap, both as giver and as excluded receiver.
fn max_per_person(participant_count: usize) -> usize {
    participant_count.saturating_sub(2)
}

/// How many exclusion records name each participant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionUsage {
    /// Records where the participant is the giver.
    pub as_giver: HashMap<ParticipantId, usize>,
    /// Records where the participant is the excluded receiver.
    pub as_receiver: HashMap<ParticipantId, usize>,
}

impl ExclusionUsage {
    pub fn for_giver(&self, id: &str) -> usize {
        self.as_giver.get(id).copied().unwrap_or(0)
    }

    pub fn for_receiver(&self, id: &str) -> usize {
        self.as_receiver.get(id).copied().unwrap_or(0)
    }
}

/// Tallies exclusion records per participant.
///
/// Every participant appears in both maps, with zero if unused. Records
/// naming unknown ids are not counted.
pub fn count_exclusions_per_person(
    exclusions: &[ExclusionRecord],
    participant_ids: &[ParticipantId],
) -> ExclusionUsage {
    let mut usage = ExclusionUsage {
        as_giver: participant_ids.iter().map(|id| (id.clone(), 0)).collect(),
        as_receiver: participant_ids.iter().map(|id| (id.clone(), 0)).collect(),
    };

    for record in exclusions {
        if let Some(count) = usage.as_giver.get_mut(record.giver_id.as_str()) {
            *count += 1;
        }
        if let Some(count) = usage.as_receiver.get_mut(record.excluded_id.as_str()) {
            *count += 1;
        }
    }
    usage
}

/// Why an exclusion was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    NotEnoughParticipants { minimum: usize },
    TotalLimitReached { max: usize },
    GiverLimitReached { max_per_person: usize },
    ReceiverLimitReached { max_per_person: usize },
    DrawWouldBeImpossible,
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::NotEnoughParticipants { minimum } => {
                write!(f, "At least {minimum} participants are required to add exclusions")
            }
            RejectionReason::TotalLimitReached { max } => {
                write!(f, "The group has reached its total limit of {max} exclusions")
            }
            RejectionReason::GiverLimitReached { max_per_person } => write!(
                f,
                "This participant already excludes the maximum of {max_per_person} people"
            ),
            RejectionReason::ReceiverLimitReached { max_per_person } => write!(
                f,
                "This participant is already excluded by the maximum of {max_per_person} people"
            ),
            RejectionReason::DrawWouldBeImpossible => {
                f.write_str("This exclusion would make the draw impossible")
            }
        }
    }
}

/// Whether one more exclusion may be added, with remaining headroom.
///
/// Headroom counts as if the pending exclusion were added, floored at zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionDecision {
    pub can_add: bool,
    pub reason: Option<RejectionReason>,
    pub remaining_total: usize,
    pub remaining_for_giver: usize,
    pub remaining_for_receiver: usize,
}

/// Read-only limits overview for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExclusionLimitsSummary {
    pub current: usize,
    pub max: usize,
    pub remaining: usize,
    pub max_per_person: usize,
}

/// Exclusion policy with a configurable minimum group size and matching
/// algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExclusionPolicy {
    min_participants: usize,
    matching_algorithm: MatchingAlgorithm,
}

impl Default for ExclusionPolicy {
    fn default() -> Self {
        Self {
            min_participants: DEFAULT_MIN_PARTICIPANTS,
            matching_algorithm: MatchingAlgorithm::default(),
        }
    }
}

impl ExclusionPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &DrawConfig) -> Self {
        Self {
            min_participants: config.limits.min_participants,
            matching_algorithm: config.matching_algorithm,
        }
    }

    pub fn min_participants(&self) -> usize {
        self.min_participants
    }

    /// Decides whether `giver_id -> excluded_id` may be added.
    ///
    /// Gates run in order: group size, total cap, giver cap, receiver cap,
    /// then feasibility of the draw with the new exclusion in place.
    pub fn can_add_exclusion(
        &self,
        giver_id: &ParticipantId,
        excluded_id: &ParticipantId,
        current_exclusions: &[ExclusionRecord],
        participant_ids: &[ParticipantId],
    ) -> ExclusionDecision {
        let n = participant_ids.len();
        let max_total = calculate_max_exclusions(n);
        let max_per_person = max_per_person(n);
        let current = current_exclusions.len();

        let usage = count_exclusions_per_person(current_exclusions, participant_ids);
        let giver_count = usage.for_giver(giver_id.as_str());
        let receiver_count = usage.for_receiver(excluded_id.as_str());

        let reason = if n < self.min_participants {
            Some(RejectionReason::NotEnoughParticipants {
                minimum: self.min_participants,
            })
        } else if current >= max_total {
            Some(RejectionReason::TotalLimitReached { max: max_total })
        } else if giver_count >= max_per_person {
            Some(RejectionReason::GiverLimitReached { max_per_person })
        } else if receiver_count >= max_per_person {
            Some(RejectionReason::ReceiverLimitReached { max_per_person })
        } else {
            let mut simulated = ExclusionMap::from_records(current_exclusions);
            simulated.insert(giver_id.clone(), excluded_id.clone());
            (!is_derangement_possible_with(participant_ids, &simulated, self.matching_algorithm))
                .then_some(RejectionReason::DrawWouldBeImpossible)
        };

        let decision = ExclusionDecision {
            can_add: reason.is_none(),
            reason,
            remaining_total: max_total.saturating_sub(current + 1),
            remaining_for_giver: max_per_person.saturating_sub(giver_count + 1),
            remaining_for_receiver: max_per_person.saturating_sub(receiver_count + 1),
        };

        let reason_text = decision.reason.map(|r| r.to_string()).unwrap_or_default();
        debug!(
            event = "exclusion_check",
            giver = %giver_id,
            excluded = %excluded_id,
            participant_count = n as u64,
            current = current as u64,
            can_add = decision.can_add,
            reason = reason_text.as_str(),
        );

        decision
    }

    /// Current usage against the caps, without any feasibility check.
    pub fn limits_summary(
        &self,
        current_exclusions: &[ExclusionRecord],
        participant_count: usize,
    ) -> ExclusionLimitsSummary {
        let max = calculate_max_exclusions(participant_count);
        let current = current_exclusions.len();
        ExclusionLimitsSummary {
            current,
            max,
            remaining: max.saturating_sub(current),
            max_per_person: max_per_person(participant_count),
        }
    }
}

/// Decides whether `giver_id -> excluded_id` may be added, with the default
/// policy.
///
/// # Examples
///
/// ```
/// use santaforge_core::ParticipantId;
/// use santaforge_solver::can_add_exclusion;
///
/// let people: Vec<ParticipantId> = ["A", "B", "C", "D"].into_iter().map(Into::into).collect();
/// let decision = can_add_exclusion(&people[0], &people[1], &[], &people);
/// assert!(decision.can_add);
/// assert_eq!(decision.remaining_total, 3);
/// assert_eq!(decision.remaining_for_giver, 1);
/// ```
pub fn can_add_exclusion(
    giver_id: &ParticipantId,
    excluded_id: &ParticipantId,
    current_exclusions: &[ExclusionRecord],
    participant_ids: &[ParticipantId],
) -> ExclusionDecision {
    ExclusionPolicy::default().can_add_exclusion(
        giver_id,
        excluded_id,
        current_exclusions,
        participant_ids,
    )
}

/// Current usage against the caps for display.
pub fn exclusion_limits_summary(
    current_exclusions: &[ExclusionRecord],
    participant_count: usize,
) -> ExclusionLimitsSummary {
    ExclusionPolicy::default().limits_summary(current_exclusions, participant_count)
}
