//! Analysis selection, config resolution and input reading behind the CLI.

use std::io::Read;

use anyhow::{Context, Result};
use clap::Subcommand;
use tracing::debug;

use crate::analyzers::aggregate::aggregate_errors;
use crate::analyzers::arrival::check_arrival_times;
use crate::analyzers::on_demand::check_on_demand_stops;
use crate::analyzers::routes::summarize_routes;
use crate::analyzers::structure::analyze_roles;
use crate::analyzers::validator::RuleSet;
use crate::config::{AnalyzerConfig, ValidationMode};
use crate::output::Report;
use crate::record::StopRecord;

/// Environment variable naming the config file when `--config` is absent.
pub const CONFIG_ENV_VAR: &str = "EASYRIDER_CONFIG";

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Analysis {
    /// Count field validation errors per field
    Validate,
    /// Number of stops on each line
    Routes,
    /// Start, transfer and finish stops, if every line has one start and one finish
    Roles,
    /// Check that arrival times increase along each line
    Arrival,
    /// Check that on-demand stops are not start, transfer or finish stops
    OnDemand,
    /// Run every analysis in order
    All,
}

/// Defaults, then the JSON config file, then command-line overrides.
///
/// The file is `flag_path` when given, otherwise `env_path` (the value of
/// [`CONFIG_ENV_VAR`]). Without either, defaults are used.
pub fn load_config(
    flag_path: Option<&str>,
    env_path: Option<&str>,
    strict_stop_names: Option<bool>,
    mode: Option<ValidationMode>,
) -> Result<AnalyzerConfig> {
    let config = match flag_path.or(env_path) {
        Some(path) => {
            debug!(path, "Loading config file");
            AnalyzerConfig::load(path)?
        }
        None => AnalyzerConfig::default(),
    };

    Ok(config.with_overrides(strict_stop_names, mode))
}

/// Reads the whole dataset from a file, or from `stdin` for `-`.
#[tracing::instrument(skip(stdin))]
pub fn read_input(source: &str, mut stdin: impl Read) -> Result<Vec<u8>> {
    if source == "-" {
        let mut buffer = Vec::new();
        stdin
            .read_to_end(&mut buffer)
            .context("failed to read dataset from standard input")?;
        return Ok(buffer);
    }

    std::fs::read(source).with_context(|| format!("failed to read dataset file '{source}'"))
}

/// Runs the selected analysis. `All` yields validation, routes, roles,
/// arrival times and on-demand stops, in that order.
pub fn run(analysis: Analysis, records: &[StopRecord], config: &AnalyzerConfig) -> Vec<Report> {
    let validation = || {
        let rules = RuleSet::from_config(config);
        Report::Validation(aggregate_errors(records, &rules, config.mode))
    };

    match analysis {
        Analysis::Validate => vec![validation()],
        Analysis::Routes => vec![Report::Routes(summarize_routes(records))],
        Analysis::Roles => vec![Report::Roles(analyze_roles(records))],
        Analysis::Arrival => vec![Report::ArrivalTimes(check_arrival_times(records))],
        Analysis::OnDemand => vec![Report::OnDemand(check_on_demand_stops(records))],
        Analysis::All => vec![
            validation(),
            Report::Routes(summarize_routes(records)),
            Report::Roles(analyze_roles(records)),
            Report::ArrivalTimes(check_arrival_times(records)),
            Report::OnDemand(check_on_demand_stops(records)),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, name: &str, body: &str) -> String {
        let path = dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        path.to_str().unwrap().to_string()
    }

    fn two_stop_line() -> Vec<StopRecord> {
        serde_json::from_value(json!([
            {"bus_id": 1, "stop_id": 1, "stop_name": "A", "next_stop": 2, "stop_type": "S", "a_time": "08:00"},
            {"bus_id": 1, "stop_id": 2, "stop_name": "B", "next_stop": 0, "stop_type": "F", "a_time": "08:10"}
        ]))
        .unwrap()
    }

    #[test]
    fn test_env_config_used_without_flag() {
        let dir = tempfile::tempdir().unwrap();
        let env_path = write_config(&dir, "env.json", r#"{"mode": "format"}"#);

        let config = load_config(None, Some(&env_path), None, None).unwrap();
        assert_eq!(config.mode, ValidationMode::Format);
        assert!(!config.strict_stop_name_suffix);
    }

    #[test]
    fn test_flag_config_wins_over_env() {
        let dir = tempfile::tempdir().unwrap();
        let flag_path = write_config(&dir, "flag.json", r#"{"strict_stop_name_suffix": true}"#);
        let env_path = write_config(&dir, "env.json", r#"{"mode": "format"}"#);

        let config = load_config(Some(&flag_path), Some(&env_path), None, None).unwrap();
        assert!(config.strict_stop_name_suffix);
        assert_eq!(config.mode, ValidationMode::Full);
    }

    #[test]
    fn test_cli_overrides_win_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            "config.json",
            r#"{"strict_stop_name_suffix": true, "mode": "format"}"#,
        );

        let config =
            load_config(Some(&path), None, Some(false), Some(ValidationMode::Full)).unwrap();
        assert!(!config.strict_stop_name_suffix);
        assert_eq!(config.mode, ValidationMode::Full);
    }

    #[test]
    fn test_no_config_source_gives_defaults() {
        let config = load_config(None, None, None, None).unwrap();
        assert_eq!(config, AnalyzerConfig::default());
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json");

        assert!(load_config(missing.to_str(), None, None, None).is_err());
    }

    #[test]
    fn test_dash_reads_stdin() {
        let bytes = read_input("-", Cursor::new(b"[]".to_vec())).unwrap();
        assert_eq!(bytes, b"[]");
    }

    #[test]
    fn test_path_reads_file_not_stdin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stops.json");
        std::fs::write(&path, "[{}]").unwrap();

        let bytes = read_input(path.to_str().unwrap(), Cursor::new(b"ignored".to_vec())).unwrap();
        assert_eq!(bytes, b"[{}]");
    }

    #[test]
    fn test_missing_input_file_is_an_error() {
        let err = read_input("/nonexistent/stops.json", std::io::empty()).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/stops.json"));
    }

    #[test]
    fn test_all_runs_every_analysis_in_order() {
        let reports = run(Analysis::All, &two_stop_line(), &AnalyzerConfig::default());

        assert_eq!(reports.len(), 5);
        assert!(matches!(reports[0], Report::Validation(_)));
        assert!(matches!(reports[1], Report::Routes(_)));
        assert!(matches!(reports[2], Report::Roles(_)));
        assert!(matches!(reports[3], Report::ArrivalTimes(_)));
        assert!(matches!(reports[4], Report::OnDemand(_)));
    }

    #[test]
    fn test_single_analysis_yields_one_report() {
        let records = two_stop_line();
        let config = AnalyzerConfig::default();

        for analysis in [
            Analysis::Validate,
            Analysis::Routes,
            Analysis::Roles,
            Analysis::Arrival,
            Analysis::OnDemand,
        ] {
            assert_eq!(run(analysis, &records, &config).len(), 1, "{analysis:?}");
        }
    }

    #[test]
    fn test_validation_uses_configured_mode() {
        let config = AnalyzerConfig {
            mode: ValidationMode::Format,
            ..Default::default()
        };
        let reports = run(Analysis::Validate, &two_stop_line(), &config);

        assert_eq!(reports[0].lines()[0], "Format validation: 0 errors");
    }
}
