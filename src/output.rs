//! Output formatting for analysis reports.
//!
//! Supports the plain text report lines and JSON serialization.

use std::io::Write;

use anyhow::Result;
use itertools::Itertools;
use serde::Serialize;
use tracing::debug;

use crate::analyzers::aggregate::FieldErrorReport;
use crate::analyzers::arrival::ArrivalReport;
use crate::analyzers::on_demand::OnDemandReport;
use crate::analyzers::routes::RouteSummary;
use crate::analyzers::structure::RoleReport;
use crate::config::ValidationMode;

/// Result of one analysis, ready to be printed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Report {
    Validation(FieldErrorReport),
    Routes(RouteSummary),
    Roles(RoleReport),
    ArrivalTimes(ArrivalReport),
    OnDemand(OnDemandReport),
}

impl Report {
    /// Renders the report as human-readable lines.
    pub fn lines(&self) -> Vec<String> {
        match self {
            Report::Validation(report) => validation_lines(report),
            Report::Routes(summary) => route_lines(summary),
            Report::Roles(roles) => role_lines(roles),
            Report::ArrivalTimes(arrival) => arrival_lines(arrival),
            Report::OnDemand(on_demand) => on_demand_lines(on_demand),
        }
    }
}

fn validation_lines(report: &FieldErrorReport) -> Vec<String> {
    let title = match report.mode() {
        ValidationMode::Full => "Type and required field validation",
        ValidationMode::Format => "Format validation",
    };

    std::iter::once(format!("{title}: {} errors", report.total()))
        .chain(
            report
                .counts()
                .iter()
                .map(|(field, count)| format!("{}: {count}", field.name())),
        )
        .collect()
}

fn route_lines(summary: &RouteSummary) -> Vec<String> {
    std::iter::once("Line names and number of stops:".to_string())
        .chain(
            summary
                .routes()
                .iter()
                .map(|r| format!("bus_id: {}, stops: {}", r.bus_id, r.stops)),
        )
        .collect()
}

fn role_lines(report: &RoleReport) -> Vec<String> {
    match report {
        RoleReport::GateFailed(violation) => vec![format!(
            "There is no start or end stop for the line: {}.",
            violation.bus_id()
        )],
        RoleReport::StopRoles(roles) => [
            ("Start stops", &roles.start),
            ("Transfer stops", &roles.transfer),
            ("Finish stops", &roles.finish),
        ]
        .into_iter()
        .map(|(label, names)| format!("{label}: {} {}", names.len(), name_list(names)))
        .collect(),
    }
}

fn arrival_lines(report: &ArrivalReport) -> Vec<String> {
    let mut lines = vec!["Arrival time test:".to_string()];
    if report.is_ok() {
        lines.push("OK".to_string());
    } else {
        lines.extend(report.violations().iter().map(|v| {
            format!(
                "bus_id line {}: wrong time on station {}",
                v.bus_id, v.stop_name
            )
        }));
    }
    lines
}

fn on_demand_lines(report: &OnDemandReport) -> Vec<String> {
    let verdict = if report.is_ok() {
        "OK".to_string()
    } else {
        format!("Wrong stop type: {}", name_list(report.wrong_stop_type()))
    };
    vec!["On demand stops test:".to_string(), verdict]
}

/// Formats names as a bracketed, quoted list: `['A', 'B']`.
pub fn name_list<'a>(names: impl IntoIterator<Item = &'a String>) -> String {
    format!("[{}]", names.into_iter().map(|n| format!("'{n}'")).join(", "))
}

/// Writes the text lines of every report, one report after another.
pub fn print_text(out: &mut impl Write, reports: &[Report]) -> Result<()> {
    for report in reports {
        for line in report.lines() {
            writeln!(out, "{line}")?;
        }
    }
    Ok(())
}

/// Writes all reports as one pretty-printed JSON array.
pub fn print_json(out: &mut impl Write, reports: &[Report]) -> Result<()> {
    debug!(reports = reports.len(), "Serializing reports as JSON");
    serde_json::to_writer_pretty(&mut *out, reports)?;
    writeln!(out)?;
    Ok(())
}
