//! Feasibility oracle based on maximum bipartite matching.
//!
//! Givers form the left side, receivers the right side. An edge
//! `giver -> receiver` exists when the two are different participants and
//! the pair is not excluded. A valid derangement exists exactly when this
//! graph has a perfect matching.
//!
//! Participants are addressed by their index in the input slice throughout;
//! ids are assumed unique.

mod hopcroft_karp;
mod kuhn;


use rand::seq::SliceRandom;
use rand::Rng;
use smallvec::SmallVec;

use santaforge_config::MatchingAlgorithm;
use santaforge_core::{Assignment, ExclusionMap, ParticipantId};

/// Marker for an unmatched node.
pub(crate) const UNMATCHED: usize = usize::MAX;

/// Allowed receivers of one giver.
pub(crate) type Edges = SmallVec<[usize; 8]>;

/// Giver/receiver graph with the allowed edges of one draw.
#[derive(Clone, Debug)]
pub struct BipartiteGraph {
    adjacency: Vec<Edges>,
}

impl BipartiteGraph {
    /// Builds the allowed-edge graph from participants and exclusions.
    ///
    /// Exclusions naming ids outside `participants` are ignored.
    pub fn from_participants(
        participants: &[ParticipantId],
        exclusions: Option<&ExclusionMap>,
    ) -> Self {
        let adjacency = participants
            .iter()
            .enumerate()
            .map(|(giver, giver_id)| {
                let excluded = exclusions.and_then(|ex| ex.excluded_for(giver_id.as_str()));
                participants
                    .iter()
                    .enumerate()
                    .filter(|&(receiver, receiver_id)| {
                        receiver != giver && !excluded.is_some_and(|set| set.contains(receiver_id))
                    })
                    .map(|(receiver, _)| receiver)
                    .collect::<Edges>()
            })
            .collect();

        Self { adjacency }
    }

    /// Number of nodes on each side.
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Total number of allowed edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(|edges| edges.len()).sum()
    }

    /// Receivers `giver` may be assigned.
    pub fn allowed(&self, giver: usize) -> &[usize] {
        &self.adjacency[giver]
    }

    /// Returns true if some giver has no allowed receiver at all.
    pub fn has_isolated_giver(&self) -> bool {
        self.adjacency.iter().any(|edges| edges.is_empty())
    }

    /// Randomizes the order in which each giver's receivers are explored.
    ///
    /// Matching results stay maximum but differ from run to run.
    pub fn shuffle_edges<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for edges in &mut self.adjacency {
            edges.shuffle(rng);
        }
    }

    /// Computes a maximum matching with the given algorithm.
    pub fn maximum_matching(&self, algorithm: MatchingAlgorithm) -> Matching {
        let giver_to_receiver = match algorithm {
            MatchingAlgorithm::HopcroftKarp => hopcroft_karp::solve(&self.adjacency),
            MatchingAlgorithm::Kuhn => kuhn::solve(&self.adjacency),
        };
        Matching::new(giver_to_receiver)
    }

    /// Returns true if every giver can be matched to a distinct receiver.
    pub fn has_perfect_matching(&self, algorithm: MatchingAlgorithm) -> bool {
        if self.node_count() < 2 || self.has_isolated_giver() {
            return false;
        }
        self.maximum_matching(algorithm).is_perfect()
    }
}

/// A maximum matching between givers and receivers, by participant index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Matching {
    giver_to_receiver: Vec<Option<usize>>,
    size: usize,
}

impl Matching {
    fn new(raw: Vec<usize>) -> Self {
        let giver_to_receiver: Vec<Option<usize>> = raw
            .into_iter()
            .map(|r| (r != UNMATCHED).then_some(r))
            .collect();
        let size = giver_to_receiver.iter().flatten().count();
        Self {
            giver_to_receiver,
            size,
        }
    }

    /// Number of matched givers.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns true if every giver is matched. Fewer than two participants
    /// never form a perfect matching.
    pub fn is_perfect(&self) -> bool {
        self.giver_to_receiver.len() >= 2 && self.size == self.giver_to_receiver.len()
    }

    /// Receiver index matched to `giver`, if any.
    pub fn receiver_for(&self, giver: usize) -> Option<usize> {
        self.giver_to_receiver.get(giver).copied().flatten()
    }

    /// Converts a perfect matching into a receiver permutation.
    pub fn into_permutation(self) -> Option<Vec<usize>> {
        if !self.is_perfect() {
            return None;
        }
        self.giver_to_receiver.into_iter().collect()
    }
}

/// Returns true if at least one valid derangement exists.
///
/// Uses Hopcroft-Karp. See [`is_derangement_possible_with`] to pick the
/// algorithm.
///
/// # Examples
///
/// ```
/// use santaforge_core::{ExclusionMap, ParticipantId};
/// use santaforge_solver::is_derangement_possible;
///
/// let participants: Vec<ParticipantId> = ["A", "B", "C"].into_iter().map(Into::into).collect();
/// let mut exclusions = ExclusionMap::new();
/// exclusions.insert("A", "B");
/// assert!(is_derangement_possible(&participants, &exclusions));
///
/// exclusions.insert("A", "C");
/// assert!(!is_derangement_possible(&participants, &exclusions));
/// ```
pub fn is_derangement_possible(participants: &[ParticipantId], exclusions: &ExclusionMap) -> bool {
    is_derangement_possible_with(participants, exclusions, MatchingAlgorithm::default())
}

/// Returns true if at least one valid derangement exists, using `algorithm`.
pub fn is_derangement_possible_with(
    participants: &[ParticipantId],
    exclusions: &ExclusionMap,
    algorithm: MatchingAlgorithm,
) -> bool {
    BipartiteGraph::from_participants(participants, Some(exclusions)).has_perfect_matching(algorithm)
}

/// Computes a maximum giver/receiver matching for the draw.
pub fn maximum_matching(
    participants: &[ParticipantId],
    exclusions: Option<&ExclusionMap>,
    algorithm: MatchingAlgorithm,
) -> Matching {
    BipartiteGraph::from_participants(participants, exclusions).maximum_matching(algorithm)
}

/// Returns one valid assignment derived from a perfect matching, or `None`
/// if no valid derangement exists.
///
/// The result is deterministic for a given input.
pub fn find_perfect_matching(
    participants: &[ParticipantId],
    exclusions: Option<&ExclusionMap>,
    algorithm: MatchingAlgorithm,
) -> Option<Assignment> {
    let permutation = maximum_matching(participants, exclusions, algorithm).into_permutation()?;
    Some(Assignment::from_indices(participants, &permutation))
}
