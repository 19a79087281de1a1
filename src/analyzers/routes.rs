//! Grouping of stop records by route.

use std::collections::HashMap;

use serde::Serialize;
use tracing::warn;

use crate::record::{BusId, StopRecord};

/// Stops per line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteSummary {
    pub(crate) routes: Vec<RouteCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteCount {
    pub bus_id: BusId,
    pub stops: usize,
}

impl RouteSummary {
    /// Routes in the order they first appear in the dataset.
    pub fn routes(&self) -> &[RouteCount] {
        &self.routes
    }

    pub fn stops(&self, bus_id: BusId) -> Option<usize> {
        self.routes
            .iter()
            .find(|r| r.bus_id == bus_id)
            .map(|r| r.stops)
    }
}

/// Partitions records by `bus_id`, keeping first-seen order of the routes
/// and the dataset order of records within each route.
///
/// Records without an integer `bus_id` belong to no route and are skipped.
pub fn group_by_route(records: &[StopRecord]) -> Vec<(BusId, Vec<&StopRecord>)> {
    let mut groups: Vec<(BusId, Vec<&StopRecord>)> = Vec::new();
    let mut index: HashMap<BusId, usize> = HashMap::new();

    for (position, record) in records.iter().enumerate() {
        let Some(bus_id) = record.bus_id() else {
            warn!(position, "Record has no integer bus_id, skipped for route analysis");
            continue;
        };

        let slot = *index.entry(bus_id).or_insert_with(|| {
            groups.push((bus_id, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(record);
    }

    groups
}

/// Counts stops per route.
#[tracing::instrument(skip_all, fields(records = records.len()))]
pub fn summarize_routes(records: &[StopRecord]) -> RouteSummary {
    let routes = group_by_route(records)
        .into_iter()
        .map(|(bus_id, stops)| RouteCount {
            bus_id,
            stops: stops.len(),
        })
        .collect();

    RouteSummary { routes }
}
