//! Colorful console output for draw events.
//!
//! Provides a custom `tracing` layer that formats draw events with colors.
//!
//! ## Log Levels
//!
//! - **INFO**: Draw start and end
//! - **DEBUG**: Fallbacks, infeasible draws and exclusion checks
//! - **TRACE**: Individual rejected attempts

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::OnceLock;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{filter::LevelFilter, EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();

/// Package version for banner display.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initializes the draw console output.
///
/// Safe to call multiple times - only the first call has effect.
/// Prints the SantaForge banner and sets up tracing. `RUST_LOG` overrides
/// the default `info` level.
pub fn init() {
    INIT.get_or_init(|| {
        print_banner();

        let filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::INFO.into())
            .from_env_lossy();

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(DrawConsoleLayer)
            .try_init();
    });
}

fn print_banner() {
    let banner = r#"
 ____              _        _____
/ ___|  __ _ _ __ | |_ __ _|  ___|__  _ __ __ _  ___
\___ \ / _` | '_ \| __/ _` | |_ / _ \| '__/ _` |/ _ \
 ___) | (_| | | | | || (_| |  _| (_) | | | (_| |  __/
|____/ \__,_|_| |_|\__\__,_|_|  \___/|_|  \__, |\___|
                                          |___/
"#;

    let version_line = format!("                  v{} - Gift Exchange Draws\n", VERSION);

    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", banner.bright_red());
    let _ = writeln!(stdout, "{}", version_line.bright_white().bold());
    let _ = stdout.flush();
}

/// A tracing layer that formats draw events with colors.
pub struct DrawConsoleLayer;

impl<S: Subscriber> Layer<S> for DrawConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let target = metadata.target();

        if !target.starts_with("santaforge_solver") && !target.starts_with("santaforge::") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor, *metadata.level());
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    strategy: Option<String>,
    from: Option<String>,
    to: Option<String>,
    giver: Option<String>,
    excluded: Option<String>,
    reason: Option<String>,
    participant_count: Option<u64>,
    exclusion_count: Option<u64>,
    attempts: Option<u64>,
    attempt: Option<u64>,
    duration_ms: Option<u64>,
    current: Option<u64>,
    feasible: Option<bool>,
    can_add: Option<bool>,
}

impl EventVisitor {
    fn set_str(&mut self, name: &str, value: String) {
        match name {
            "event" => self.event = Some(value),
            "strategy" => self.strategy = Some(value),
            "from" => self.from = Some(value),
            "to" => self.to = Some(value),
            "giver" => self.giver = Some(value),
            "excluded" => self.excluded = Some(value),
            "reason" => self.reason = Some(value),
            _ => {}
        }
    }
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        self.set_str(field.name(), s.trim_matches('"').to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "participant_count" => self.participant_count = Some(value),
            "exclusion_count" => self.exclusion_count = Some(value),
            "attempts" => self.attempts = Some(value),
            "attempt" => self.attempt = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            "current" => self.current = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        match field.name() {
            "feasible" => self.feasible = Some(value),
            "can_add" => self.can_add = Some(value),
            _ => {}
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.set_str(field.name(), value.to_string());
    }
}

fn format_event(v: &EventVisitor, level: Level) -> String {
    match v.event.as_deref().unwrap_or("") {
        "draw_start" => format_draw_start(v),
        "draw_end" => format_draw_end(v),
        "fallback" => format_fallback(v),
        "infeasible" => format_infeasible(v),
        "exclusion_check" => format_exclusion_check(v),
        "attempt_rejected" => format_attempt_rejected(v, level),
        _ => String::new(),
    }
}

fn format_count(n: u64) -> String {
    n.to_formatted_string(&Locale::en)
}

fn format_draw_start(v: &EventVisitor) -> String {
    let participants = v.participant_count.unwrap_or(0);
    let exclusions = v.exclusion_count.unwrap_or(0);

    let mut output = format!(
        "{} Drawing │ {} participants",
        "▶".bright_green().bold(),
        format_count(participants).bright_yellow(),
    );
    if exclusions > 0 {
        output.push_str(&format!(
            " │ {} exclusions",
            format_count(exclusions).bright_yellow()
        ));
    }
    output
}

fn format_draw_end(v: &EventVisitor) -> String {
    let strategy = v.strategy.as_deref().unwrap_or("unknown");
    let attempts = v.attempts.unwrap_or(0);
    let duration = v.duration_ms.unwrap_or(0);

    let status = if v.feasible.unwrap_or(false) {
        "ASSIGNED".bright_green().bold().to_string()
    } else {
        "IMPOSSIBLE".bright_red().bold().to_string()
    };

    format!(
        "{} Draw complete │ {} │ {} │ {} attempts │ {}",
        "■".bright_cyan().bold(),
        status,
        strategy.white().bold(),
        format_count(attempts).white(),
        format_duration_ms(duration).yellow(),
    )
}

fn format_fallback(v: &EventVisitor) -> String {
    format!(
        "{} {} exhausted after {} attempts, using {}",
        "↺".bright_yellow(),
        v.from.as_deref().unwrap_or("unknown").white(),
        format_count(v.attempts.unwrap_or(0)).bright_yellow(),
        v.to.as_deref().unwrap_or("unknown").white().bold(),
    )
}

fn format_infeasible(v: &EventVisitor) -> String {
    format!(
        "{} No valid assignment exists for {} participants",
        "✗".bright_red(),
        format_count(v.participant_count.unwrap_or(0)).bright_yellow(),
    )
}

fn format_exclusion_check(v: &EventVisitor) -> String {
    let giver = v.giver.as_deref().unwrap_or("?");
    let excluded = v.excluded.as_deref().unwrap_or("?");
    let current = v.current.unwrap_or(0);

    if v.can_add.unwrap_or(false) {
        format!(
            "{} Exclusion {} → {} allowed │ {} existing",
            "✓".bright_green(),
            giver.white(),
            excluded.white(),
            format_count(current),
        )
    } else {
        format!(
            "{} Exclusion {} → {} refused │ {}",
            "✗".bright_red(),
            giver.white(),
            excluded.white(),
            v.reason.as_deref().unwrap_or("").yellow(),
        )
    }
}

fn format_attempt_rejected(v: &EventVisitor, level: Level) -> String {
    if level != Level::TRACE {
        return String::new();
    }

    format!(
        "{} {} attempt {:>6} rejected",
        "·".bright_black(),
        v.strategy.as_deref().unwrap_or("unknown").bright_black(),
        format_count(v.attempt.unwrap_or(0)).bright_black(),
    )
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip_ansi(s: &str) -> String {
        let mut out = String::new();
        let mut in_escape = false;
        for c in s.chars() {
            match (in_escape, c) {
                (false, '\u{1b}') => in_escape = true,
                (true, 'm') => in_escape = false,
                (true, _) => {}
                (false, c) => out.push(c),
            }
        }
        out
    }

    #[test]
    fn test_format_duration_ms() {
        assert_eq!(format_duration_ms(12), "12ms");
        assert_eq!(format_duration_ms(1500), "1.50s");
        assert_eq!(format_duration_ms(125_000), "2m 5s");
    }

    #[test]
    fn test_format_draw_start() {
        let v = EventVisitor {
            event: Some("draw_start".to_string()),
            participant_count: Some(1200),
            exclusion_count: Some(4),
            ..Default::default()
        };
        let line = strip_ansi(&format_event(&v, Level::INFO));
        assert!(line.contains("1,200 participants"));
        assert!(line.contains("4 exclusions"));
    }

    #[test]
    fn test_format_draw_end() {
        let v = EventVisitor {
            event: Some("draw_end".to_string()),
            strategy: Some("shuffle".to_string()),
            attempts: Some(3),
            duration_ms: Some(0),
            feasible: Some(true),
            ..Default::default()
        };
        let line = strip_ansi(&format_event(&v, Level::INFO));
        assert!(line.contains("ASSIGNED"));
        assert!(line.contains("shuffle"));
        assert!(line.contains("3 attempts"));

        let v = EventVisitor {
            feasible: Some(false),
            ..v
        };
        assert!(strip_ansi(&format_event(&v, Level::INFO)).contains("IMPOSSIBLE"));
    }

    #[test]
    fn test_format_exclusion_check_refused() {
        let v = EventVisitor {
            event: Some("exclusion_check".to_string()),
            giver: Some("ann".to_string()),
            excluded: Some("bob".to_string()),
            can_add: Some(false),
            reason: Some("This exclusion would make the draw impossible".to_string()),
            ..Default::default()
        };
        let line = strip_ansi(&format_event(&v, Level::DEBUG));
        assert!(line.contains("ann → bob refused"));
        assert!(line.contains("draw impossible"));
    }

    #[test]
    fn test_attempts_only_shown_at_trace() {
        let v = EventVisitor {
            event: Some("attempt_rejected".to_string()),
            strategy: Some("shuffle".to_string()),
            attempt: Some(2),
            ..Default::default()
        };
        assert!(format_event(&v, Level::DEBUG).is_empty());
        assert!(strip_ansi(&format_event(&v, Level::TRACE)).contains("shuffle attempt"));
    }

    #[test]
    fn test_unknown_event_is_silent() {
        let v = EventVisitor {
            event: Some("something_else".to_string()),
            ..Default::default()
        };
        assert!(format_event(&v, Level::INFO).is_empty());
    }
}
