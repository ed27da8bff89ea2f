//! Draw entry point for services holding persisted exclusion rows.

use tracing::warn;

use santaforge_config::DrawConfig;
use santaforge_core::{ExclusionMap, ExclusionRecord, ParticipantId};
use santaforge_solver::{DerangementGenerator, DrawReport};

/// Runs a draw configured from `draw.toml` in the working directory, or
/// defaults if the file is missing or invalid.
pub fn run_draw(participants: &[ParticipantId], exclusions: &[ExclusionRecord]) -> DrawReport {
    let config = match DrawConfig::load("draw.toml") {
        Ok(config) => config,
        Err(santaforge_config::ConfigError::Io(_)) => DrawConfig::default(),
        Err(err) => {
            warn!(event = "config_ignored", error = %err);
            DrawConfig::default()
        }
    };
    run_draw_with_config(participants, exclusions, &config)
}

/// Runs a draw over persisted exclusion rows with an explicit configuration.
pub fn run_draw_with_config(
    participants: &[ParticipantId],
    exclusions: &[ExclusionRecord],
    config: &DrawConfig,
) -> DrawReport {
    #[cfg(feature = "console")]
    santaforge_console::init();

    let exclusions = ExclusionMap::from_records(exclusions);
    DerangementGenerator::from_config(config).generate_with_report(participants, Some(&exclusions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use santaforge_solver::DrawStrategy;
    use santaforge_test::{assert_valid_derangement, participants, records};

    #[test]
    fn test_run_draw_with_config_honors_records() {
        let people = participants(&["A", "B", "C", "D"]);
        let existing = records(&[("A", "B"), ("B", "A")]);
        let config = DrawConfig::new().with_random_seed(3);

        let report = run_draw_with_config(&people, &existing, &config);
        let exclusions = ExclusionMap::from_records(&existing);
        assert_valid_derangement(&people, report.assignment.as_ref().unwrap(), Some(&exclusions));
        assert_eq!(report.strategy, DrawStrategy::RandomizedSearch);
    }

    #[test]
    fn test_run_draw_without_records() {
        let people = participants(&["A", "B"]);
        let report = run_draw(&people, &[]);
        let assignment = report.assignment.unwrap();
        assert_eq!(assignment.receivers()[0].as_str(), "B");
        assert_eq!(report.strategy, DrawStrategy::Shuffle);
    }

    #[test]
    fn test_run_draw_impossible() {
        let people = participants(&["A", "B", "C"]);
        let existing = records(&[("A", "B"), ("A", "C")]);
        let report = run_draw_with_config(&people, &existing, &DrawConfig::default());
        assert!(report.assignment.is_none());
        assert_eq!(report.strategy, DrawStrategy::Impossible);
    }
}
