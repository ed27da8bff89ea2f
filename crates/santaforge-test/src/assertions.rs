//! Assertions over draw results.

use std::collections::HashSet;

use santaforge_core::{Assignment, ExclusionMap, ParticipantId};

/// Panics with a descriptive message unless `assignment` is a permutation of
/// `participants` with no self-draw and no excluded pair.
pub fn assert_valid_derangement(
    participants: &[ParticipantId],
    assignment: &Assignment,
    exclusions: Option<&ExclusionMap>,
) {
    assert_eq!(
        assignment.len(),
        participants.len(),
        "assignment length differs from participant count"
    );

    let expected: HashSet<&ParticipantId> = participants.iter().collect();
    let actual: HashSet<&ParticipantId> = assignment.receivers().iter().collect();
    assert_eq!(actual.len(), participants.len(), "a receiver is drawn twice");
    assert_eq!(actual, expected, "receivers are not a permutation of participants");

    for (giver, receiver) in assignment.pairs(participants) {
        assert_ne!(giver, receiver, "{giver} drew themselves");
        if let Some(ex) = exclusions {
            assert!(
                !ex.is_excluded(giver.as_str(), receiver.as_str()),
                "{giver} drew excluded receiver {receiver}"
            );
        }
    }
}
