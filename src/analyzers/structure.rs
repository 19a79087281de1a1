//! Start/finish structure of each route and classification of stops by role.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::analyzers::routes::group_by_route;
use crate::record::{BusId, StopRecord, StopType};

/// Why a route failed the structural gate.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StructureViolation {
    #[error("line {bus_id} has more than one start stop")]
    DuplicateStart { bus_id: BusId },

    #[error("line {bus_id} has more than one finish stop")]
    DuplicateFinish { bus_id: BusId },

    #[error("line {bus_id} has no start stop")]
    MissingStart { bus_id: BusId },

    #[error("line {bus_id} has no finish stop")]
    MissingFinish { bus_id: BusId },
}

impl StructureViolation {
    pub fn bus_id(&self) -> BusId {
        match *self {
            StructureViolation::DuplicateStart { bus_id }
            | StructureViolation::DuplicateFinish { bus_id }
            | StructureViolation::MissingStart { bus_id }
            | StructureViolation::MissingFinish { bus_id } => bus_id,
        }
    }
}

/// Start, transfer and finish stop names, deduplicated and sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StopRoleSets {
    pub start: BTreeSet<String>,
    pub transfer: BTreeSet<String>,
    pub finish: BTreeSet<String>,
}

impl StopRoleSets {
    /// True when `name` is a start, transfer or finish stop.
    pub fn contains(&self, name: &str) -> bool {
        self.start.contains(name) || self.transfer.contains(name) || self.finish.contains(name)
    }
}

/// Outcome of the role analysis: either the role sets, or the first route
/// that failed the structural gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleReport {
    StopRoles(StopRoleSets),
    GateFailed(StructureViolation),
}

/// Verifies that every route has exactly one start and one finish stop.
///
/// Routes are checked in first-seen order and the first failing route is
/// returned. A second start or finish fails the route as soon as it is
/// seen.
pub fn check_structure(records: &[StopRecord]) -> Result<(), StructureViolation> {
    for (bus_id, stops) in group_by_route(records) {
        let mut starts = 0;
        let mut finishes = 0;

        for stop in stops {
            match stop.stop_type() {
                Some(StopType::Start) => {
                    starts += 1;
                    if starts > 1 {
                        return Err(StructureViolation::DuplicateStart { bus_id });
                    }
                }
                Some(StopType::Finish) => {
                    finishes += 1;
                    if finishes > 1 {
                        return Err(StructureViolation::DuplicateFinish { bus_id });
                    }
                }
                _ => {}
            }
        }

        if starts == 0 {
            return Err(StructureViolation::MissingStart { bus_id });
        }
        if finishes == 0 {
            return Err(StructureViolation::MissingFinish { bus_id });
        }
        debug!(bus_id = %bus_id, "Route structure ok");
    }

    Ok(())
}

/// Classifies stop names by role across the whole dataset.
///
/// A transfer stop is any name seen more than once, regardless of route.
/// Records without a string `stop_name` are ignored.
pub fn classify_stop_roles(records: &[StopRecord]) -> StopRoleSets {
    let mut roles = StopRoleSets::default();
    let mut seen: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let Some(name) = record.stop_name() else {
            continue;
        };

        *seen.entry(name).or_default() += 1;

        match record.stop_type() {
            Some(StopType::Start) => {
                roles.start.insert(name.to_string());
            }
            Some(StopType::Finish) => {
                roles.finish.insert(name.to_string());
            }
            _ => {}
        }
    }

    roles.transfer = seen
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(name, _)| name.to_string())
        .collect();

    roles
}

/// Runs the structural gate and, only if every route passes it, the role
/// classification. One bad route suppresses the roles of all routes.
#[tracing::instrument(skip_all, fields(records = records.len()))]
pub fn analyze_roles(records: &[StopRecord]) -> RoleReport {
    match check_structure(records) {
        Ok(()) => RoleReport::StopRoles(classify_stop_roles(records)),
        Err(violation) => {
            debug!(%violation, "Structural gate failed, skipping role classification");
            RoleReport::GateFailed(violation)
        }
    }
}
