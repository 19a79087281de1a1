//! Per-record field validation.

use regex::Regex;
use serde_json::Value;

use crate::config::{AnalyzerConfig, ValidationMode};
use crate::record::{Field, StopRecord, as_integer};

/// Capitalized words followed by a road-type suffix.
const STRICT_STOP_NAME: &str = r"^([A-Z][a-z]+ )+(Road|Avenue|Boulevard|Street)$";
const STOP_TYPE: &str = r"^[SOF]?$";
const ARRIVAL_TIME: &str = r"^([01][0-9]|2[0-3]):[0-5][0-9]$";

/// Check applied to a single field value.
#[derive(Debug, Clone)]
pub enum FieldRule {
    /// JSON integer. Floats and numeric strings fail.
    Integer,
    NonEmptyString,
    /// String matching an anchored pattern.
    Pattern(Regex),
}

impl FieldRule {
    fn pattern(re: &str) -> Self {
        // Patterns are compile-time constants.
        FieldRule::Pattern(Regex::new(re).expect("field pattern must compile"))
    }

    /// A missing value never passes.
    pub fn accepts(&self, value: Option<&Value>) -> bool {
        match (self, value) {
            (FieldRule::Integer, Some(value)) => as_integer(value).is_some(),
            (FieldRule::NonEmptyString, Some(Value::String(s))) => !s.is_empty(),
            (FieldRule::Pattern(re), Some(Value::String(s))) => re.is_match(s),
            _ => false,
        }
    }
}

/// Field-to-rule mapping, in report order.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<(Field, FieldRule)>,
}

impl RuleSet {
    pub fn from_config(config: &AnalyzerConfig) -> Self {
        let stop_name = if config.strict_stop_name_suffix {
            FieldRule::pattern(STRICT_STOP_NAME)
        } else {
            FieldRule::NonEmptyString
        };

        let rules = Field::ALL
            .into_iter()
            .filter(|field| match config.mode {
                ValidationMode::Full => true,
                ValidationMode::Format => {
                    matches!(field, Field::StopName | Field::StopType | Field::ATime)
                }
            })
            .map(|field| {
                let rule = match field {
                    Field::BusId | Field::StopId | Field::NextStop => FieldRule::Integer,
                    Field::StopName => stop_name.clone(),
                    Field::StopType => FieldRule::pattern(STOP_TYPE),
                    Field::ATime => FieldRule::pattern(ARRIVAL_TIME),
                };
                (field, rule)
            })
            .collect();

        Self { rules }
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.rules.iter().map(|(field, _)| *field)
    }

    pub fn rule(&self, field: Field) -> Option<&FieldRule> {
        self.rules
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, rule)| rule)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::from_config(&AnalyzerConfig::default())
    }
}

/// Checks every field of the rule set against one record.
///
/// Returns `(field, 0)` for a valid field and `(field, 1)` for an invalid
/// or missing one.
pub fn check_record(rules: &RuleSet, record: &StopRecord) -> Vec<(Field, u8)> {
    rules
        .rules
        .iter()
        .map(|(field, rule)| (*field, u8::from(!rule.accepts(record.get(*field)))))
        .collect()
}
