use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::Value;

use crate::analyzers::structure::classify_stop_roles;
use crate::record::{Field, StopRecord};

/// On-demand (`O`) stops that are also start, transfer or finish stops.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OnDemandReport {
    pub(crate) wrong_stop_type: BTreeSet<String>,
}

impl OnDemandReport {
    pub fn is_ok(&self) -> bool {
        self.wrong_stop_type.is_empty()
    }

    pub fn wrong_stop_type(&self) -> &BTreeSet<String> {
        &self.wrong_stop_type
    }
}

/// Flags stops marked `O` whose name has a start, transfer or finish role
/// anywhere in the dataset. Only the literal `O` counts, not an empty
/// `stop_type`.
#[tracing::instrument(skip_all, fields(records = records.len()))]
pub fn check_on_demand_stops(records: &[StopRecord]) -> OnDemandReport {
    let roles = classify_stop_roles(records);

    let wrong_stop_type = records
        .iter()
        .filter(|record| record.get(Field::StopType).and_then(Value::as_str) == Some("O"))
        .filter_map(StopRecord::stop_name)
        .filter(|name| roles.contains(*name))
        .map(str::to_string)
        .collect();

    OnDemandReport { wrong_stop_type }
}
