//! SantaForge - Secret Santa draws in Rust
//!
//! Assigns every participant someone to give to, never themselves, while
//! honoring exclusions such as couples who should not draw each other.
//! Exclusion requests can be checked up front so the draw never becomes
//! impossible.
//!
//! # Example
//!
//! ```rust
//! use santaforge::prelude::*;
//!
//! let participants: Vec<ParticipantId> =
//!     ["ann", "bob", "cat", "dan"].into_iter().map(Into::into).collect();
//! let existing = vec![ExclusionRecord::new("ann", "bob")];
//!
//! let decision = can_add_exclusion(&participants[1], &participants[0], &existing, &participants);
//! assert!(decision.can_add);
//!
//! let mut exclusions = ExclusionMap::from_records(&existing);
//! exclusions.insert("bob", "ann");
//! let assignment = generate_derangement(&participants, Some(&exclusions)).unwrap();
//! assert!(assignment.is_valid_for(&participants, Some(&exclusions)));
//! ```

// Core types
pub use santaforge_core::{
    validate_exclusion, validate_participants, Assignment, ExclusionMap, ExclusionRecord,
    ParticipantId, Result, SantaForgeError,
};

// Configuration
pub use santaforge_config::{ConfigError, DrawConfig, LimitsConfig, MatchingAlgorithm};

// Engine
pub use santaforge_solver::{
    calculate_max_exclusions, can_add_exclusion, count_exclusions_per_person,
    exclusion_limits_summary, find_perfect_matching, generate_derangement,
    is_derangement_possible, is_derangement_possible_with, maximum_matching,
    sample_pair_frequencies, BipartiteGraph, DerangementGenerator, DrawReport,
    DrawStatistics, DrawStatisticsCollector, DrawStrategy, ExclusionDecision,
    ExclusionLimitsSummary, ExclusionPolicy, ExclusionUsage, Matching, PairFrequencies,
    RejectionReason,
};

mod draw;
pub use draw::{run_draw, run_draw_with_config};

pub mod prelude {
    pub use super::{Assignment, ExclusionMap, ExclusionRecord, ParticipantId};
    pub use super::{DrawConfig, MatchingAlgorithm};
    pub use super::{
        calculate_max_exclusions, can_add_exclusion, exclusion_limits_summary,
        generate_derangement, is_derangement_possible, DerangementGenerator, ExclusionPolicy,
    };
    pub use super::{run_draw, run_draw_with_config};
}
