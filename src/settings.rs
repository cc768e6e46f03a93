//! Runtime settings and log filter construction

use crate::scheduler::RunMode;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Settings derived from CLI flags and their environment fallbacks.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory holding SSH keyfiles and the windows password store.
    pub keyfile_location: PathBuf,
    /// One-shot or scheduled operation.
    pub run_mode: RunMode,
    /// Substitute the auto-decline policy for every operator prompt.
    pub non_interactive: bool,
}

impl Settings {
    pub fn new(
        keyfile_location: PathBuf,
        one_shot: bool,
        interval_minutes: u64,
        non_interactive: bool,
    ) -> Self {
        let run_mode = if one_shot {
            RunMode::OneShot
        } else {
            RunMode::Interval(Duration::from_secs(interval_minutes * 60))
        };
        Self {
            keyfile_location,
            run_mode,
            non_interactive,
        }
    }
}

/// Build the tracing filter from a global level plus per-target overrides.
///
/// Overrides are space-separated `target:level` pairs, e.g.
/// `"aws_config:warn chef_deploy::knife:debug"`.
pub fn log_filter(global_level: &str, overrides: &str) -> Result<EnvFilter> {
    let mut filter = EnvFilter::new(global_level);
    for (target, level) in parse_log_targets(overrides) {
        let directive = format!("{target}={level}")
            .parse()
            .with_context(|| format!("Invalid log override '{target}:{level}'"))?;
        filter = filter.add_directive(directive);
    }
    Ok(filter)
}

/// Split a `target:level` override list; entries without a level are dropped.
fn parse_log_targets(overrides: &str) -> Vec<(String, String)> {
    overrides
        .split_whitespace()
        .filter_map(|entry| {
            let (target, level) = entry.split_once(':')?;
            if target.is_empty() || level.is_empty() {
                return None;
            }
            Some((target.to_string(), level.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_target_level_pairs() {
        let targets = parse_log_targets("aws_config:warn chef_deploy::knife:debug");
        assert_eq!(
            targets,
            vec![
                ("aws_config".to_string(), "warn".to_string()),
                ("chef_deploy::knife".to_string(), "debug".to_string()),
            ]
        );
    }

    #[test]
    fn ignores_malformed_entries() {
        let targets = parse_log_targets("no-colon :warn target: ok:info");
        assert_eq!(targets, vec![("ok".to_string(), "info".to_string())]);
    }

    #[test]
    fn empty_override_list_is_empty() {
        assert!(parse_log_targets("").is_empty());
        assert!(parse_log_targets("   ").is_empty());
    }

    #[test]
    fn filter_accepts_global_and_overrides() {
        assert!(log_filter("info", "aws_config:warn").is_ok());
        assert!(log_filter("debug", "").is_ok());
    }

    #[test]
    fn one_shot_wins_over_interval() {
        let settings = Settings::new(PathBuf::from("keys"), true, 60, false);
        assert_eq!(settings.run_mode, RunMode::OneShot);
    }

    #[test]
    fn interval_is_minutes() {
        let settings = Settings::new(PathBuf::from("keys"), false, 5, false);
        assert_eq!(
            settings.run_mode,
            RunMode::Interval(Duration::from_secs(300))
        );
    }
}
