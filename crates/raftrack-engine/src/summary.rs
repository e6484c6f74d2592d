//! Resource-summary formatting
//!
//! Turns the (resource, project) pivot into the two-level display table:
//! one header per consultant followed by that consultant's projects, each
//! joined with its deployment data, theoretical workload and Ecart.

use chrono::NaiveDate;
use raftrack_core::{
    PhaseSelection, ProjectRow, ResourceHeaderRow, ResourceSummary, SummaryColumn, SummaryRow,
    WorkloadRules,
};
use tracing::debug;

use crate::lookup::SummaryLookups;
use crate::pivot::PivotEntry;

/// Caller choices for one summary run
#[derive(Clone, Debug, Default)]
pub struct SummaryOptions {
    pub phases: PhaseSelection,
    /// Columns removed from the output
    pub dropped_columns: Vec<SummaryColumn>,
    /// Reference date for the "Durée" column; blank durations when unset
    pub as_of: Option<NaiveDate>,
}

/// Build the resource summary from pivoted workload.
///
/// `pivot` must be grouped by resource (as [`crate::pivot_workload`] returns
/// it); a new header starts whenever the resource changes.
pub fn format_resource_summary(
    pivot: &[PivotEntry],
    lookups: &SummaryLookups,
    workload_rules: &WorkloadRules,
    options: &SummaryOptions,
) -> ResourceSummary {
    let mut rows = Vec::with_capacity(pivot.len() * 2);
    let mut current: Option<&str> = None;

    for entry in pivot {
        if current != Some(entry.resource.as_str()) {
            rows.push(SummaryRow::Resource(ResourceHeaderRow {
                resource: entry.resource.clone(),
                aggregate: 0.0,
            }));
            current = Some(&entry.resource);
        }
        rows.push(SummaryRow::Project(project_row(
            entry,
            lookups,
            workload_rules,
            options.as_of,
        )));
    }

    let mut summary = ResourceSummary::from_rows(rows);
    let before = summary.rows.len();
    summary = apply_phase_filter(&summary, &options.phases);
    debug!(
        rows_before = before,
        rows_after = summary.rows.len(),
        "phase filter applied"
    );

    summary.drop_columns(&options.dropped_columns);
    summary
}

fn project_row(
    entry: &PivotEntry,
    lookups: &SummaryLookups,
    workload_rules: &WorkloadRules,
    as_of: Option<NaiveDate>,
) -> ProjectRow {
    let project = entry.project.as_str();
    let connection_level = lookups.connection_level(project);
    let phase = lookups.phase(project);
    let amount = lookups.amount(project);

    let theoretical =
        workload_rules.theoretical(amount, phase.as_deref(), connection_level.as_deref());
    let ecart = match (entry.workload, theoretical) {
        (Some(actual), Some(expected)) => Some(actual - expected),
        _ => None,
    };
    let days_elapsed = match (as_of, lookups.assignment_date(project)) {
        (Some(as_of), Some(assigned)) => Some((as_of - assigned).num_days()),
        _ => None,
    };

    ProjectRow {
        resource: entry.resource.clone(),
        project: entry.project.clone(),
        workload: entry.workload,
        connection_level,
        phase,
        amount,
        ca: lookups.ca(project),
        theoretical,
        ecart,
        last_note: lookups.last_note(project),
        days_elapsed,
    }
}

/// Keep projects whose phase is selected.
///
/// A header survives when it still has a project, or when its aggregate
/// before filtering was non-zero. Aggregates are recomputed afterwards, so a
/// header left without projects reports 0.
fn apply_phase_filter(summary: &ResourceSummary, phases: &PhaseSelection) -> ResourceSummary {
    let mut rows = Vec::with_capacity(summary.rows.len());
    let mut pending: Option<&SummaryRow> = None;

    for row in &summary.rows {
        match row {
            SummaryRow::Resource(header) => {
                if header.aggregate != 0.0 {
                    rows.push(row.clone());
                    pending = None;
                } else {
                    pending = Some(row);
                }
            }
            SummaryRow::Project(p) if phases.contains(p.phase.as_deref()) => {
                if let Some(header) = pending.take() {
                    rows.push(header.clone());
                }
                rows.push(row.clone());
            }
            SummaryRow::Project(_) => {}
        }
    }

    let mut out = ResourceSummary {
        columns: summary.columns.clone(),
        rows,
        total_ecart: 0.0,
    };
    out.recompute_aggregates();
    out
}
