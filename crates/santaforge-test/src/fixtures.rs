//! Participant and exclusion fixtures.

use santaforge_core::{ExclusionMap, ExclusionRecord, ParticipantId};

/// Participant ids from string literals.
pub fn participants(names: &[&str]) -> Vec<ParticipantId> {
    names.iter().map(|&n| ParticipantId::from(n)).collect()
}

/// `n` participants named `p0`, `p1`, ...
pub fn numbered_participants(n: usize) -> Vec<ParticipantId> {
    (0..n).map(|i| ParticipantId::new(format!("p{i}"))).collect()
}

/// Directed exclusion map from `(giver, receiver)` pairs.
pub fn exclusions(pairs: &[(&str, &str)]) -> ExclusionMap {
    pairs.iter().copied().collect()
}

/// Exclusion map where each couple excludes each other both ways.
pub fn couples(pairs: &[(&str, &str)]) -> ExclusionMap {
    let mut map = ExclusionMap::new();
    for &(a, b) in pairs {
        map.insert_mutual(a, b);
    }
    map
}

/// Persisted exclusion rows from `(giver, receiver)` pairs.
pub fn records(pairs: &[(&str, &str)]) -> Vec<ExclusionRecord> {
    pairs
        .iter()
        .map(|&(giver, excluded)| ExclusionRecord::new(giver, excluded))
        .collect()
}
