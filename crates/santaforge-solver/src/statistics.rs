//! Draw statistics collection.
//!
//! Records outcomes across many draws: strategy counts, attempts and how
//! often each giver/receiver pair came up. Pair frequencies are how draw
//! fairness is checked.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rayon::prelude::*;

use santaforge_config::DrawConfig;
use santaforge_core::{ExclusionMap, ParticipantId};

use crate::derangement::{DerangementGenerator, DrawReport, DrawStrategy};

/// How often each giver/receiver pair was drawn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairFrequencies {
    counts: HashMap<(ParticipantId, ParticipantId), u64>,
}

impl PairFrequencies {
    /// Times `giver` was assigned `receiver`.
    pub fn count(&self, giver: &str, receiver: &str) -> u64 {
        self.counts
            .get(&(ParticipantId::from(giver), ParticipantId::from(receiver)))
            .copied()
            .unwrap_or(0)
    }

    /// Number of distinct pairs drawn at least once.
    pub fn distinct_pairs(&self) -> usize {
        self.counts.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&(ParticipantId, ParticipantId), &u64)> {
        self.counts.iter()
    }

    fn record(&mut self, giver: &ParticipantId, receiver: &ParticipantId) {
        *self
            .counts
            .entry((giver.clone(), receiver.clone()))
            .or_insert(0) += 1;
    }
}

/// Statistics over a batch of draws.
#[derive(Debug, Clone)]
pub struct DrawStatistics {
    /// Total time since collection started.
    pub total_duration: Duration,
    /// Draws recorded.
    pub draw_count: u64,
    /// Draws that found no valid assignment.
    pub impossible_count: u64,
    /// Randomized attempts across all draws.
    pub total_attempts: u64,
    /// Draws per strategy.
    pub strategy_counts: HashMap<DrawStrategy, u64>,
    /// Giver/receiver pair tallies of successful draws.
    pub pair_frequencies: PairFrequencies,
}

impl DrawStatistics {
    /// Average randomized attempts per draw.
    pub fn avg_attempts(&self) -> f64 {
        if self.draw_count == 0 {
            0.0
        } else {
            self.total_attempts as f64 / self.draw_count as f64
        }
    }

    /// Draws that used `strategy`.
    pub fn strategy_count(&self, strategy: DrawStrategy) -> u64 {
        self.strategy_counts.get(&strategy).copied().unwrap_or(0)
    }

    /// Fraction of draws that needed a fallback strategy.
    pub fn fallback_rate(&self) -> f64 {
        let feasible = self.draw_count - self.impossible_count;
        if feasible == 0 {
            return 0.0;
        }
        let fallbacks = self.strategy_count(DrawStrategy::CyclicFallback)
            + self.strategy_count(DrawStrategy::MatchingFallback);
        fallbacks as f64 / feasible as f64
    }
}

/// Thread-safe collector for draw statistics.
///
/// Record draws with [`record`](Self::record), then call
/// [`into_statistics`](Self::into_statistics).
pub struct DrawStatisticsCollector {
    start_time: Instant,
    draws: AtomicU64,
    impossible: AtomicU64,
    attempts: AtomicU64,
    strategies: Mutex<HashMap<DrawStrategy, u64>>,
    pairs: Mutex<PairFrequencies>,
}

impl DrawStatisticsCollector {
    /// Creates a new collector. The start time is recorded now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            draws: AtomicU64::new(0),
            impossible: AtomicU64::new(0),
            attempts: AtomicU64::new(0),
            strategies: Mutex::new(HashMap::new()),
            pairs: Mutex::new(PairFrequencies::default()),
        }
    }

    /// Records one draw over `participants`.
    pub fn record(&self, participants: &[ParticipantId], report: &DrawReport) {
        self.draws.fetch_add(1, Ordering::Relaxed);
        self.attempts
            .fetch_add(report.attempts as u64, Ordering::Relaxed);

        if let Ok(mut strategies) = self.strategies.lock() {
            *strategies.entry(report.strategy).or_insert(0) += 1;
        }

        let Some(assignment) = &report.assignment else {
            self.impossible.fetch_add(1, Ordering::Relaxed);
            return;
        };
        if let Ok(mut pairs) = self.pairs.lock() {
            for (giver, receiver) in assignment.pairs(participants) {
                pairs.record(giver, receiver);
            }
        }
    }

    pub fn current_draw_count(&self) -> u64 {
        self.draws.load(Ordering::Relaxed)
    }

    pub fn current_impossible_count(&self) -> u64 {
        self.impossible.load(Ordering::Relaxed)
    }

    /// Takes a snapshot without consuming the collector.
    pub fn snapshot(&self) -> DrawStatistics {
        DrawStatistics {
            total_duration: self.start_time.elapsed(),
            draw_count: self.draws.load(Ordering::Relaxed),
            impossible_count: self.impossible.load(Ordering::Relaxed),
            total_attempts: self.attempts.load(Ordering::Relaxed),
            strategy_counts: self
                .strategies
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
            pair_frequencies: self
                .pairs
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
        }
    }

    /// Converts this collector into final statistics.
    pub fn into_statistics(self) -> DrawStatistics {
        DrawStatistics {
            total_duration: self.start_time.elapsed(),
            draw_count: self.draws.into_inner(),
            impossible_count: self.impossible.into_inner(),
            total_attempts: self.attempts.into_inner(),
            strategy_counts: self
                .strategies
                .into_inner()
                .unwrap_or_else(PoisonError::into_inner),
            pair_frequencies: self
                .pairs
                .into_inner()
                .unwrap_or_else(PoisonError::into_inner),
        }
    }
}

impl Default for DrawStatisticsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs `draws` independent draws in parallel and collects their statistics.
///
/// With a seed in `config`, draw `i` uses seed `seed + i`, so the result is
/// reproducible regardless of thread scheduling.
pub fn sample_pair_frequencies(
    participants: &[ParticipantId],
    exclusions: Option<&ExclusionMap>,
    draws: usize,
    config: &DrawConfig,
) -> DrawStatistics {
    let collector = DrawStatisticsCollector::new();

    match config.random_seed {
        Some(seed) => (0..draws).into_par_iter().for_each(|i| {
            let mut generator = DerangementGenerator::from_config(
                &config.clone().with_random_seed(seed.wrapping_add(i as u64)),
            );
            let report = generator.generate_with_report(participants, exclusions);
            collector.record(participants, &report);
        }),
        None => (0..draws).into_par_iter().for_each_init(
            || DerangementGenerator::<StdRng>::from_config(config),
            |generator, _| {
                let report = generator.generate_with_report(participants, exclusions);
                collector.record(participants, &report);
            },
        ),
    }

    collector.into_statistics()
}

#[cfg(test)]
mod tests {
    use super::*;
    use santaforge_test::{couples, participants};

    #[test]
    fn test_collector_records_draws() {
        let people = participants(&["A", "B", "C"]);
        let collector = DrawStatisticsCollector::new();
        let mut generator = DerangementGenerator::with_seed(1);

        for _ in 0..10 {
            let report = generator.generate_with_report(&people, None);
            collector.record(&people, &report);
        }
        let report = generator.generate_with_report(&people[..1], None);
        collector.record(&people[..1], &report);

        assert_eq!(collector.current_draw_count(), 11);
        assert_eq!(collector.current_impossible_count(), 1);

        let stats = collector.into_statistics();
        assert_eq!(stats.strategy_count(DrawStrategy::Impossible), 1);
        assert_eq!(
            stats.strategy_count(DrawStrategy::Shuffle)
                + stats.strategy_count(DrawStrategy::CyclicFallback),
            10
        );
        // Three givers per successful draw.
        let total: u64 = stats.pair_frequencies.iter().map(|(_, &c)| c).sum();
        assert_eq!(total, 30);
        assert_eq!(stats.pair_frequencies.count("A", "A"), 0);
    }

    #[test]
    fn test_collector_snapshot() {
        let people = participants(&["A", "B"]);
        let collector = DrawStatisticsCollector::new();
        let mut generator = DerangementGenerator::with_seed(2);

        collector.record(&people, &generator.generate_with_report(&people, None));
        let snapshot = collector.snapshot();
        assert_eq!(snapshot.draw_count, 1);
        assert_eq!(snapshot.pair_frequencies.count("A", "B"), 1);

        // Can still use collector after snapshot
        collector.record(&people, &generator.generate_with_report(&people, None));
        assert_eq!(collector.current_draw_count(), 2);
    }

    #[test]
    fn test_collector_thread_safety() {
        let people = participants(&["A", "B", "C", "D"]);
        let collector = DrawStatisticsCollector::new();

        rayon::scope(|s| {
            for seed in 0..4 {
                let collector = &collector;
                let people = &people;
                s.spawn(move |_| {
                    let mut generator = DerangementGenerator::with_seed(seed);
                    for _ in 0..250 {
                        let report = generator.generate_with_report(people, None);
                        collector.record(people, &report);
                    }
                });
            }
        });

        let stats = collector.into_statistics();
        assert_eq!(stats.draw_count, 1000);
        assert_eq!(stats.impossible_count, 0);
    }

    #[test]
    fn test_sample_pair_frequencies_is_fair_and_respects_exclusions() {
        let people = participants(&["A", "B", "C", "D"]);
        let ex = couples(&[("A", "B")]);
        let config = DrawConfig::new().with_random_seed(5);

        let stats = sample_pair_frequencies(&people, Some(&ex), 1000, &config);
        assert_eq!(stats.draw_count, 1000);
        assert_eq!(stats.impossible_count, 0);

        for giver in &people {
            for receiver in &people {
                let count = stats.pair_frequencies.count(giver.as_str(), receiver.as_str());
                if giver == receiver || ex.is_excluded(giver.as_str(), receiver.as_str()) {
                    assert_eq!(count, 0, "{giver} -> {receiver}");
                } else {
                    assert!(count > 0, "{giver} -> {receiver} never drawn");
                }
            }
        }
    }

    #[test]
    fn test_seeded_sampling_is_reproducible() {
        let people = participants(&["A", "B", "C", "D", "E"]);
        let config = DrawConfig::new().with_random_seed(11);

        let first = sample_pair_frequencies(&people, None, 200, &config);
        let second = sample_pair_frequencies(&people, None, 200, &config);
        assert_eq!(first.pair_frequencies, second.pair_frequencies);
    }

    #[test]
    fn test_unseeded_sampling() {
        let people = participants(&["A", "B", "C"]);
        let stats = sample_pair_frequencies(&people, None, 100, &DrawConfig::default());
        assert_eq!(stats.draw_count, 100);
        assert_eq!(stats.fallback_rate(), 0.0);
        assert!(stats.avg_attempts() >= 1.0);
    }

    #[test]
    fn test_empty_statistics_rates() {
        let stats = DrawStatisticsCollector::new().into_statistics();
        assert_eq!(stats.avg_attempts(), 0.0);
        assert_eq!(stats.fallback_rate(), 0.0);
    }
}
