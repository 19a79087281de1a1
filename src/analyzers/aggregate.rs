use serde::{Serialize, Serializer};
use tracing::debug;

use crate::analyzers::validator::{RuleSet, check_record};
use crate::config::ValidationMode;
use crate::record::{Field, StopRecord};

/// Number of records failing each checked field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldErrorReport {
    pub(crate) mode: ValidationMode,
    #[serde(rename = "errors", serialize_with = "counts_as_map")]
    pub(crate) counts: Vec<(Field, usize)>,
}

fn counts_as_map<S: Serializer>(
    counts: &[(Field, usize)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(counts.iter().map(|(field, count)| (field.name(), count)))
}

impl FieldErrorReport {
    /// A zeroed report covering the fields of `rules`.
    pub fn empty(rules: &RuleSet, mode: ValidationMode) -> Self {
        Self {
            mode,
            counts: rules.fields().map(|field| (field, 0)).collect(),
        }
    }

    pub fn add_record(&mut self, rules: &RuleSet, record: &StopRecord) {
        for (field, result) in check_record(rules, record) {
            if let Some((_, count)) = self.counts.iter_mut().find(|(f, _)| *f == field) {
                *count += usize::from(result);
            }
        }
    }

    /// Combines two partial reports over disjoint record chunks.
    pub fn merge(mut self, other: &FieldErrorReport) -> Self {
        for (field, extra) in &other.counts {
            match self.counts.iter_mut().find(|(f, _)| f == field) {
                Some((_, count)) => *count += extra,
                None => self.counts.push((*field, *extra)),
            }
        }
        self.counts.sort_by_key(|(field, _)| *field);
        self
    }

    pub fn count(&self, field: Field) -> Option<usize> {
        self.counts
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, count)| *count)
    }

    pub fn counts(&self) -> &[(Field, usize)] {
        &self.counts
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, count)| count).sum()
    }
}

/// Runs the field validator over every record and sums failures per field.
#[tracing::instrument(skip_all, fields(records = records.len()))]
pub fn aggregate_errors(
    records: &[StopRecord],
    rules: &RuleSet,
    mode: ValidationMode,
) -> FieldErrorReport {
    let mut report = FieldErrorReport::empty(rules, mode);
    for record in records {
        report.add_record(rules, record);
    }

    debug!(total = report.total(), "Field validation finished");
    report
}
