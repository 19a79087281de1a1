use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Which set of fields the validation report covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Types and required values of every field.
    #[default]
    Full,
    /// Only the formatted fields: `stop_name`, `stop_type`, `a_time`.
    Format,
}

/// Analyzer settings.
///
/// Stored as a JSON object on disk, every key optional:
/// ```json
/// {
///   "strict_stop_name_suffix": true,
///   "mode": "format"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Require stop names to end in Road, Avenue, Boulevard or Street.
    pub strict_stop_name_suffix: bool,
    pub mode: ValidationMode,
}

impl AnalyzerConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{path}'"))?;
        Self::from_json(&content).with_context(|| format!("invalid config file '{path}'"))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Applies command-line overrides on top of the loaded values. `None`
    /// keeps the loaded value.
    pub fn with_overrides(
        mut self,
        strict_stop_names: Option<bool>,
        mode: Option<ValidationMode>,
    ) -> Self {
        if let Some(strict) = strict_stop_names {
            self.strict_stop_name_suffix = strict;
        }
        if let Some(mode) = mode {
            self.mode = mode;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_gives_defaults() {
        let config = AnalyzerConfig::from_json("{}").unwrap();
        assert_eq!(config, AnalyzerConfig::default());
        assert!(!config.strict_stop_name_suffix);
        assert_eq!(config.mode, ValidationMode::Full);
    }

    #[test]
    fn test_from_json_reads_all_keys() {
        let config =
            AnalyzerConfig::from_json(r#"{"strict_stop_name_suffix": true, "mode": "format"}"#)
                .unwrap();
        assert!(config.strict_stop_name_suffix);
        assert_eq!(config.mode, ValidationMode::Format);
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        assert!(AnalyzerConfig::from_json(r#"{"mode": "lenient"}"#).is_err());
    }

    #[test]
    fn test_overrides_win_over_file() {
        let config =
            AnalyzerConfig::default().with_overrides(Some(true), Some(ValidationMode::Format));
        assert!(config.strict_stop_name_suffix);
        assert_eq!(config.mode, ValidationMode::Format);

        let unchanged = config.clone().with_overrides(None, None);
        assert_eq!(unchanged, config);
    }

    #[test]
    fn test_override_turns_strict_names_off() {
        let from_file = AnalyzerConfig::from_json(r#"{"strict_stop_name_suffix": true}"#).unwrap();
        let config = from_file.with_overrides(Some(false), None);
        assert!(!config.strict_stop_name_suffix);
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(AnalyzerConfig::load("/nonexistent/easyrider.json").is_err());
    }
}
