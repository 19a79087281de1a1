//! Arrival time ordering along each route.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, warn};

use crate::record::{BusId, StopRecord};

/// First stop of a route whose arrival time does not follow its predecessor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeViolation {
    pub bus_id: BusId,
    pub stop_name: String,
}

/// Violations in the order they were found. Empty means every route is ok.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArrivalReport {
    pub(crate) violations: Vec<TimeViolation>,
}

impl ArrivalReport {
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[TimeViolation] {
        &self.violations
    }
}

/// Checks that arrival times strictly increase along each route, walking
/// records in dataset order without re-sorting.
///
/// A change of `bus_id` starts a new route and resets the previous time.
/// Only the first violation of a route is kept; the rest of a flagged
/// route is skipped. `HH:MM` values are fixed width, so string order is
/// time order.
#[tracing::instrument(skip_all, fields(records = records.len()))]
pub fn check_arrival_times(records: &[StopRecord]) -> ArrivalReport {
    let mut report = ArrivalReport::default();
    let mut flagged: HashSet<BusId> = HashSet::new();
    let mut current: Option<BusId> = None;
    let mut previous: Option<&str> = None;

    for (position, record) in records.iter().enumerate() {
        let Some(bus_id) = record.bus_id() else {
            warn!(position, "Record has no integer bus_id, skipped for arrival check");
            continue;
        };

        if current != Some(bus_id) {
            current = Some(bus_id);
            previous = record.a_time();
            continue;
        }

        if flagged.contains(&bus_id) {
            continue;
        }

        let Some(a_time) = record.a_time() else {
            warn!(
                position,
                bus_id = %bus_id,
                "Record has no string a_time, skipped for arrival check"
            );
            continue;
        };

        if previous.is_some_and(|prev| a_time <= prev) {
            let stop_name = record.stop_name().unwrap_or_default().to_string();
            debug!(bus_id = %bus_id, stop_name = %stop_name, a_time, "Arrival time out of order");
            flagged.insert(bus_id);
            report.violations.push(TimeViolation { bus_id, stop_name });
            continue;
        }

        previous = Some(a_time);
    }

    report
}
