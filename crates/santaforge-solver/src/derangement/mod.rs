//! Randomized derangement generation.
//!
//! Without exclusions, full shuffles are drawn until one has no fixed point;
//! if the budget runs out, a cyclic shuffle (Sattolo) produces a single
//! n-cycle, which never has a fixed point.
//!
//! With exclusions, the feasibility oracle runs first. Feasible draws are
//! built by randomized greedy construction; if the budget runs out, a
//! perfect matching on a randomly ordered graph is used instead, so a
//! feasible draw never comes back empty.


use std::fmt;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use smallvec::SmallVec;
use tracing::{debug, info, trace};

use santaforge_config::{DrawConfig, MatchingAlgorithm, DEFAULT_ATTEMPTS};
use santaforge_core::{Assignment, ExclusionMap, ParticipantId};

use crate::matching::{BipartiteGraph, UNMATCHED};

/// How a draw produced its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawStrategy {
    /// A rejection-sampled full shuffle.
    Shuffle,
    /// The single-cycle shuffle used when shuffles kept failing.
    CyclicFallback,
    /// A randomized greedy construction honoring exclusions.
    RandomizedSearch,
    /// A perfect matching used when greedy construction kept failing.
    MatchingFallback,
    /// No valid derangement exists.
    Impossible,
}

impl DrawStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DrawStrategy::Shuffle => "shuffle",
            DrawStrategy::CyclicFallback => "cyclic_fallback",
            DrawStrategy::RandomizedSearch => "randomized_search",
            DrawStrategy::MatchingFallback => "matching_fallback",
            DrawStrategy::Impossible => "impossible",
        }
    }
}

impl fmt::Display for DrawStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one draw with the work it took.
#[derive(Debug, Clone)]
pub struct DrawReport {
    /// The assignment, or `None` if no valid derangement exists.
    pub assignment: Option<Assignment>,
    /// Which strategy produced the result.
    pub strategy: DrawStrategy,
    /// Randomized attempts made, including the successful one.
    pub attempts: usize,
    /// Wall-clock time spent.
    pub duration: Duration,
}

impl DrawReport {
    pub fn is_feasible(&self) -> bool {
        self.assignment.is_some()
    }
}

/// Configurable derangement generator.
///
/// Generic over the random source; defaults to [`StdRng`].
///
/// # Examples
///
/// ```
/// use santaforge_core::ParticipantId;
/// use santaforge_solver::DerangementGenerator;
///
/// let participants: Vec<ParticipantId> = ["A", "B"].into_iter().map(Into::into).collect();
/// let mut generator = DerangementGenerator::with_seed(7);
/// let assignment = generator.generate(&participants, None).unwrap();
/// assert_eq!(assignment.receivers()[0].as_str(), "B");
/// assert_eq!(assignment.receivers()[1].as_str(), "A");
/// ```
pub struct DerangementGenerator<R = StdRng> {
    rng: R,
    shuffle_attempts: usize,
    search_attempts: usize,
    matching_algorithm: MatchingAlgorithm,
}

impl<R> fmt::Debug for DerangementGenerator<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerangementGenerator")
            .field("shuffle_attempts", &self.shuffle_attempts)
            .field("search_attempts", &self.search_attempts)
            .field("matching_algorithm", &self.matching_algorithm)
            .finish()
    }
}

impl DerangementGenerator<StdRng> {
    /// Creates a generator seeded from OS entropy with default budgets.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Creates a reproducible generator with default budgets.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Creates a generator from configuration, seeded if the config has a seed.
    pub fn from_config(config: &DrawConfig) -> Self {
        let rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(rng).with_config(config)
    }
}

impl Default for DerangementGenerator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> DerangementGenerator<R> {
    /// Creates a generator drawing from `rng` with default budgets.
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            shuffle_attempts: DEFAULT_ATTEMPTS,
            search_attempts: DEFAULT_ATTEMPTS,
            matching_algorithm: MatchingAlgorithm::default(),
        }
    }

    /// Applies the budgets and matching algorithm of `config`.
    ///
    /// The seed is ignored; the random source is fixed at construction.
    pub fn with_config(mut self, config: &DrawConfig) -> Self {
        self.shuffle_attempts = config.shuffle_attempts;
        self.search_attempts = config.search_attempts;
        self.matching_algorithm = config.matching_algorithm;
        self
    }

    /// Draws a derangement of `participants`, or `None` if none exists.
    ///
    /// `result[i]` is who `participants[i]` gives to. An absent or empty
    /// exclusion map means no exclusions.
    pub fn generate(
        &mut self,
        participants: &[ParticipantId],
        exclusions: Option<&ExclusionMap>,
    ) -> Option<Assignment> {
        self.generate_with_report(participants, exclusions).assignment
    }

    /// Like [`generate`](Self::generate), also reporting how the result was found.
    pub fn generate_with_report(
        &mut self,
        participants: &[ParticipantId],
        exclusions: Option<&ExclusionMap>,
    ) -> DrawReport {
        let start = Instant::now();
        let exclusions = exclusions.filter(|ex| !ex.is_empty());

        info!(
            event = "draw_start",
            participant_count = participants.len() as u64,
            exclusion_count = exclusions.map_or(0, ExclusionMap::len) as u64,
        );

        let (permutation, strategy, attempts) = if participants.len() < 2 {
            (None, DrawStrategy::Impossible, 0)
        } else if let Some(exclusions) = exclusions {
            self.draw_with_exclusions(participants, exclusions)
        } else {
            let (permutation, strategy, attempts) = self.draw_unconstrained(participants.len());
            (Some(permutation), strategy, attempts)
        };

        let assignment = permutation.map(|p| Assignment::from_indices(participants, &p));
        debug_assert!(assignment
            .as_ref()
            .map_or(true, |a| a.is_valid_for(participants, exclusions)));

        let report = DrawReport {
            assignment,
            strategy,
            attempts,
            duration: start.elapsed(),
        };

        info!(
            event = "draw_end",
            strategy = report.strategy.as_str(),
            attempts = report.attempts as u64,
            duration_ms = report.duration.as_millis() as u64,
            feasible = report.is_feasible(),
        );

        report
    }

    fn draw_unconstrained(&mut self, n: usize) -> (Vec<usize>, DrawStrategy, usize) {
        let mut permutation: Vec<usize> = (0..n).collect();

        for attempt in 1..=self.shuffle_attempts {
            permutation.shuffle(&mut self.rng);
            if is_fixed_point_free(&permutation) {
                return (permutation, DrawStrategy::Shuffle, attempt);
            }
            trace!(event = "attempt_rejected", strategy = "shuffle", attempt = attempt as u64);
        }

        debug!(
            event = "fallback",
            from = "shuffle",
            to = "cyclic_fallback",
            attempts = self.shuffle_attempts as u64,
        );
        (
            cyclic_shuffle(n, &mut self.rng),
            DrawStrategy::CyclicFallback,
            self.shuffle_attempts,
        )
    }

    fn draw_with_exclusions(
        &mut self,
        participants: &[ParticipantId],
        exclusions: &ExclusionMap,
    ) -> (Option<Vec<usize>>, DrawStrategy, usize) {
        let mut graph = BipartiteGraph::from_participants(participants, Some(exclusions));
        if !graph.has_perfect_matching(self.matching_algorithm) {
            debug!(event = "infeasible", participant_count = participants.len() as u64);
            return (None, DrawStrategy::Impossible, 0);
        }

        for attempt in 1..=self.search_attempts {
            if let Some(permutation) = greedy_construction(&graph, &mut self.rng) {
                return (Some(permutation), DrawStrategy::RandomizedSearch, attempt);
            }
            trace!(
                event = "attempt_rejected",
                strategy = "randomized_search",
                attempt = attempt as u64,
            );
        }

        debug!(
            event = "fallback",
            from = "randomized_search",
            to = "matching_fallback",
            attempts = self.search_attempts as u64,
        );
        graph.shuffle_edges(&mut self.rng);
        let permutation = graph
            .maximum_matching(self.matching_algorithm)
            .into_permutation();
        let strategy = if permutation.is_some() {
            DrawStrategy::MatchingFallback
        } else {
            DrawStrategy::Impossible
        };
        (permutation, strategy, self.search_attempts)
    }
}

/// Draws a derangement with a fresh entropy-seeded generator.
///
/// Returns `None` for fewer than two participants or when the exclusions
/// leave no valid assignment.
///
/// # Examples
///
/// ```
/// use santaforge_core::{ExclusionMap, ParticipantId};
/// use santaforge_solver::generate_derangement;
///
/// let participants: Vec<ParticipantId> = ["A", "B", "C"].into_iter().map(Into::into).collect();
/// let exclusions: ExclusionMap = [("A", "B"), ("A", "C")].into_iter().collect();
/// assert!(generate_derangement(&participants, Some(&exclusions)).is_none());
/// ```
pub fn generate_derangement(
    participants: &[ParticipantId],
    exclusions: Option<&ExclusionMap>,
) -> Option<Assignment> {
    DerangementGenerator::new().generate(participants, exclusions)
}

fn is_fixed_point_free(permutation: &[usize]) -> bool {
    permutation.iter().enumerate().all(|(i, &j)| i != j)
}

// Sattolo's algorithm: each position swaps with a strictly earlier one, so
// the result is one n-cycle. Requires n >= 2.
fn cyclic_shuffle<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<usize> {
    let mut permutation: Vec<usize> = (0..n).collect();
    for i in (1..n).rev() {
        let j = rng.random_range(0..i);
        permutation.swap(i, j);
    }
    permutation
}

// Visits givers in random order, giving each a uniformly random receiver
// still free. Returns `None` on a dead end.
fn greedy_construction<R: Rng + ?Sized>(graph: &BipartiteGraph, rng: &mut R) -> Option<Vec<usize>> {
    let n = graph.node_count();
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);

    let mut taken = vec![false; n];
    let mut permutation = vec![UNMATCHED; n];
    for giver in order {
        let free: SmallVec<[usize; 8]> = graph
            .allowed(giver)
            .iter()
            .copied()
            .filter(|&receiver| !taken[receiver])
            .collect();
        if free.is_empty() {
            return None;
        }
        let receiver = free[rng.random_range(0..free.len())];
        taken[receiver] = true;
        permutation[giver] = receiver;
    }
    Some(permutation)
}
