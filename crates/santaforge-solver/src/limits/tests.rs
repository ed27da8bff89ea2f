//! Tests for exclusion limits.

use super::*;

use santaforge_test::{numbered_participants, participants, records};

fn id(name: &str) -> ParticipantId {
    ParticipantId::from(name)
}

#[test]
fn test_max_exclusions_known_values() {
    assert_eq!(calculate_max_exclusions(0), 0);
    assert_eq!(calculate_max_exclusions(2), 0);
    assert_eq!(calculate_max_exclusions(3), 0);
    assert_eq!(calculate_max_exclusions(4), 4);
    assert_eq!(calculate_max_exclusions(5), 6);
    assert_eq!(calculate_max_exclusions(6), 12);
    assert_eq!(calculate_max_exclusions(10), 40);
}

#[test]
fn test_max_exclusions_monotonic_and_even() {
    let mut previous = 0;
    for n in 3..500 {
        let max = calculate_max_exclusions(n);
        assert!(max >= previous, "cap decreased at {n}");
        assert_eq!(max % 2, 0);
        previous = max;
    }
}

#[test]
fn test_count_exclusions_per_person() {
    let people = participants(&["A", "B", "C"]);
    let existing = records(&[("A", "B"), ("A", "C"), ("B", "A"), ("Z", "A")]);
    let usage = count_exclusions_per_person(&existing, &people);

    assert_eq!(usage.as_giver.len(), 3);
    assert_eq!(usage.as_receiver.len(), 3);
    assert_eq!(usage.for_giver("A"), 2);
    assert_eq!(usage.for_giver("B"), 1);
    assert_eq!(usage.for_giver("C"), 0);
    assert_eq!(usage.as_giver.get("C"), Some(&0));
    assert_eq!(usage.for_receiver("A"), 2);
    assert_eq!(usage.for_receiver("B"), 1);
    assert_eq!(usage.for_receiver("C"), 1);
    assert!(!usage.as_giver.contains_key("Z"));
}

#[test]
fn test_rejects_small_groups() {
    let people = participants(&["A", "B"]);
    let decision = can_add_exclusion(&id("A"), &id("B"), &[], &people);

    assert!(!decision.can_add);
    assert_eq!(
        decision.reason,
        Some(RejectionReason::NotEnoughParticipants { minimum: 3 })
    );
    assert!(decision.reason.unwrap().to_string().contains("At least 3 participants"));
    assert_eq!(decision.remaining_total, 0);
}

#[test]
fn test_rejects_at_total_limit() {
    let people = participants(&["A", "B", "C", "D"]);
    let existing = records(&[("A", "B"), ("B", "A"), ("C", "D"), ("D", "C")]);
    let decision = can_add_exclusion(&id("A"), &id("C"), &existing, &people);

    assert!(!decision.can_add);
    assert_eq!(decision.reason, Some(RejectionReason::TotalLimitReached { max: 4 }));
    assert!(decision.reason.unwrap().to_string().contains("total limit of 4"));
    assert_eq!(decision.remaining_total, 0);
}

#[test]
fn test_three_participants_cannot_exclude() {
    let people = participants(&["A", "B", "C"]);
    let decision = can_add_exclusion(&id("A"), &id("B"), &[], &people);
    assert_eq!(decision.reason, Some(RejectionReason::TotalLimitReached { max: 0 }));
}

#[test]
fn test_rejects_at_giver_limit() {
    let people = participants(&["A", "B", "C", "D", "E"]);
    let existing = records(&[("A", "B"), ("A", "C"), ("A", "D")]);
    let decision = can_add_exclusion(&id("A"), &id("E"), &existing, &people);

    assert!(!decision.can_add);
    assert_eq!(
        decision.reason,
        Some(RejectionReason::GiverLimitReached { max_per_person: 3 })
    );
    assert_eq!(decision.remaining_for_giver, 0);
    assert_eq!(decision.remaining_for_receiver, 2);
    assert_eq!(decision.remaining_total, 2);
}

#[test]
fn test_rejects_at_receiver_limit() {
    let people = participants(&["A", "B", "C", "D", "E"]);
    let existing = records(&[("B", "A"), ("C", "A"), ("D", "A")]);
    let decision = can_add_exclusion(&id("E"), &id("A"), &existing, &people);

    assert!(!decision.can_add);
    assert_eq!(
        decision.reason,
        Some(RejectionReason::ReceiverLimitReached { max_per_person: 3 })
    );
    assert_eq!(decision.remaining_for_receiver, 0);
    assert_eq!(decision.remaining_for_giver, 2);
}

#[test]
fn test_rejects_when_draw_becomes_impossible() {
    // With B -> D excluded too, B, C and D could only give to A or B.
    let people = participants(&["A", "B", "C", "D"]);
    let existing = records(&[("C", "D"), ("D", "C"), ("B", "C")]);
    let decision = can_add_exclusion(&id("B"), &id("D"), &existing, &people);

    assert!(!decision.can_add);
    assert_eq!(decision.reason, Some(RejectionReason::DrawWouldBeImpossible));
    assert_eq!(
        decision.reason.unwrap().to_string(),
        "This exclusion would make the draw impossible"
    );
    assert_eq!(decision.remaining_total, 0);
}

#[test]
fn test_accepts_feasible_exclusion() {
    let people = participants(&["A", "B", "C", "D"]);
    let existing = records(&[("A", "B")]);
    let decision = can_add_exclusion(&id("B"), &id("A"), &existing, &people);

    assert_eq!(
        decision,
        ExclusionDecision {
            can_add: true,
            reason: None,
            remaining_total: 2,
            remaining_for_giver: 1,
            remaining_for_receiver: 1,
        }
    );
}

#[test]
fn test_policy_min_participants_from_config() {
    let config = DrawConfig::new().with_min_participants(6);
    let policy = ExclusionPolicy::from_config(&config);
    assert_eq!(policy.min_participants(), 6);

    let people = numbered_participants(5);
    let decision = policy.can_add_exclusion(&people[0], &people[1], &[], &people);
    assert_eq!(
        decision.reason,
        Some(RejectionReason::NotEnoughParticipants { minimum: 6 })
    );

    let people = numbered_participants(6);
    assert!(policy.can_add_exclusion(&people[0], &people[1], &[], &people).can_add);
}

#[test]
fn test_policy_with_kuhn_agrees() {
    let config = DrawConfig::new().with_matching_algorithm(MatchingAlgorithm::Kuhn);
    let policy = ExclusionPolicy::from_config(&config);
    let people = participants(&["A", "B", "C", "D"]);
    let existing = records(&[("C", "D"), ("D", "C"), ("B", "C")]);

    let decision = policy.can_add_exclusion(&id("B"), &id("D"), &existing, &people);
    assert_eq!(decision.reason, Some(RejectionReason::DrawWouldBeImpossible));
}

#[test]
fn test_limits_summary() {
    let existing = records(&[("A", "B"), ("B", "A")]);
    assert_eq!(
        exclusion_limits_summary(&existing, 6),
        ExclusionLimitsSummary {
            current: 2,
            max: 12,
            remaining: 10,
            max_per_person: 4,
        }
    );

    let over = records(&[("A", "B"), ("B", "A"), ("A", "C")]);
    assert_eq!(
        exclusion_limits_summary(&over, 2),
        ExclusionLimitsSummary {
            current: 3,
            max: 0,
            remaining: 0,
            max_per_person: 0,
        }
    );
}
