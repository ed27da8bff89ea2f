//! SantaForge Solver Engine
//!
//! This crate provides the draw engine:
//! - Derangement generation, optionally honoring exclusions
//! - Feasibility checking through maximum bipartite matching
//! - Exclusion limits and the add-exclusion policy
//! - Statistics over many draws
//!
//! Everything here is synchronous and keeps no state between calls, so any
//! number of callers may use it concurrently.
//!
//! # Example
//!
//! ```
//! use santaforge_core::{ExclusionMap, ParticipantId};
//! use santaforge_solver::{generate_derangement, is_derangement_possible};
//!
//! let participants: Vec<ParticipantId> =
//!     ["ann", "bob", "cat", "dan"].into_iter().map(Into::into).collect();
//! let mut exclusions = ExclusionMap::new();
//! exclusions.insert_mutual("ann", "bob");
//!
//! assert!(is_derangement_possible(&participants, &exclusions));
//! let assignment = generate_derangement(&participants, Some(&exclusions)).unwrap();
//! assert!(assignment.is_valid_for(&participants, Some(&exclusions)));
//! ```

pub mod derangement;
pub mod limits;
pub mod matching;
pub mod statistics;

pub use derangement::{generate_derangement, DerangementGenerator, DrawReport, DrawStrategy};
pub use limits::{
    calculate_max_exclusions, can_add_exclusion, count_exclusions_per_person,
    exclusion_limits_summary, ExclusionDecision, ExclusionLimitsSummary, ExclusionPolicy,
    ExclusionUsage, RejectionReason,
};
pub use matching::{
    find_perfect_matching, is_derangement_possible, is_derangement_possible_with,
    maximum_matching, BipartiteGraph, Matching,
};
pub use statistics::{
    sample_pair_frequencies, DrawStatistics, DrawStatisticsCollector, PairFrequencies,
};

pub use santaforge_config::MatchingAlgorithm;
