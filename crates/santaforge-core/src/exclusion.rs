//! Directed exclusion constraints.
//!
//! An exclusion says "this giver must not be assigned this receiver". The
//! relation is directed: excluding `A -> B` says nothing about `B -> A`.
//! Couples that must not draw each other need both directions, which
//! [`ExclusionMap::insert_mutual`] does in one call.

use std::collections::hash_map;
use std::collections::{HashMap, HashSet};

use crate::participant::ParticipantId;

/// One persisted exclusion row, as an upstream store would hand it over.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExclusionRecord {
    /// The participant doing the giving.
    pub giver_id: ParticipantId,
    /// The participant the giver must not draw.
    pub excluded_id: ParticipantId,
}

impl ExclusionRecord {
    pub fn new(giver_id: impl Into<ParticipantId>, excluded_id: impl Into<ParticipantId>) -> Self {
        Self {
            giver_id: giver_id.into(),
            excluded_id: excluded_id.into(),
        }
    }
}

/// Sparse adjacency of forbidden giver -> receiver pairs.
///
/// A giver with no entry has no exclusions. Entries naming ids that are not
/// part of a draw are harmless: they never match anyone.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExclusionMap {
    by_giver: HashMap<ParticipantId, HashSet<ParticipantId>>,
}

impl ExclusionMap {
    /// Creates an empty exclusion map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map from persisted exclusion rows.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a ExclusionRecord>) -> Self {
        records
            .into_iter()
            .map(|r| (r.giver_id.clone(), r.excluded_id.clone()))
            .collect()
    }

    /// Forbids `giver` from drawing `receiver`.
    ///
    /// Returns `false` if the pair was already excluded.
    pub fn insert(
        &mut self,
        giver: impl Into<ParticipantId>,
        receiver: impl Into<ParticipantId>,
    ) -> bool {
        self.by_giver
            .entry(giver.into())
            .or_default()
            .insert(receiver.into())
    }

    /// Forbids `a` and `b` from drawing each other.
    pub fn insert_mutual(&mut self, a: impl Into<ParticipantId>, b: impl Into<ParticipantId>) {
        let a = a.into();
        let b = b.into();
        self.insert(a.clone(), b.clone());
        self.insert(b, a);
    }

    /// Lifts the exclusion `giver -> receiver`, returning whether it existed.
    pub fn remove(&mut self, giver: &str, receiver: &str) -> bool {
        let Some(set) = self.by_giver.get_mut(giver) else {
            return false;
        };
        let removed = set.remove(receiver);
        if set.is_empty() {
            self.by_giver.remove(giver);
        }
        removed
    }

    /// Returns true if `giver` must not draw `receiver`.
    pub fn is_excluded(&self, giver: &str, receiver: &str) -> bool {
        self.by_giver
            .get(giver)
            .is_some_and(|set| set.contains(receiver))
    }

    /// Returns the receivers excluded for `giver`, if any.
    pub fn excluded_for(&self, giver: &str) -> Option<&HashSet<ParticipantId>> {
        self.by_giver.get(giver)
    }

    /// Number of directed excluded pairs.
    pub fn len(&self) -> usize {
        self.by_giver.values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_giver.values().all(HashSet::is_empty)
    }

    /// Iterates givers with their excluded receivers, in arbitrary order.
    pub fn iter(&self) -> hash_map::Iter<'_, ParticipantId, HashSet<ParticipantId>> {
        self.by_giver.iter()
    }

    /// Iterates every directed excluded pair as records.
    pub fn records(&self) -> impl Iterator<Item = ExclusionRecord> + '_ {
        self.by_giver.iter().flat_map(|(giver, receivers)| {
            receivers.iter().map(move |receiver| ExclusionRecord {
                giver_id: giver.clone(),
                excluded_id: receiver.clone(),
            })
        })
    }
}

impl<G, R> FromIterator<(G, R)> for ExclusionMap
where
    G: Into<ParticipantId>,
    R: Into<ParticipantId>,
{
    fn from_iter<I: IntoIterator<Item = (G, R)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (giver, receiver) in iter {
            map.insert(giver, receiver);
        }
        map
    }
}

impl<'a> IntoIterator for &'a ExclusionMap {
    type Item = (&'a ParticipantId, &'a HashSet<ParticipantId>);
    type IntoIter = hash_map::Iter<'a, ParticipantId, HashSet<ParticipantId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.by_giver.iter()
    }
}
