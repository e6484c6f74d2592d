//! Pipeline orchestration
//!
//! Each job runs one full pipeline over in-memory tables, logging a line per
//! step. Inputs are never modified.

use raftrack_core::{
    columns, MonthlyRaf, RafCalendar, RafRules, ResourceSummary, Table, WorkloadRules,
};
use thiserror::Error;
use tracing::info;

use crate::{
    calculate_charge_jh, calculate_monthly_raf, calculate_raf, format_resource_summary,
    pivot_workload, raf_calendar, validate_columns, SummaryLookups, SummaryOptions,
};

/// Job error
#[derive(Debug, Error)]
pub enum JobError {
    #[error("Missing required columns in {table}: {}", missing.join(", "))]
    MissingColumns { table: String, missing: Vec<String> },
}

fn require(table: &Table, name: &str, required: &[&str]) -> Result<(), JobError> {
    let validation = validate_columns(table, required);
    if validation.is_valid {
        Ok(())
    } else {
        Err(JobError::MissingColumns {
            table: name.to_string(),
            missing: validation.missing,
        })
    }
}

// ============================================================================
// Resource summary
// ============================================================================

/// Consumption + deployments → resource summary
#[derive(Clone, Debug, Default)]
pub struct ResourceSummaryJob {
    pub workload_rules: WorkloadRules,
    pub options: SummaryOptions,
}

impl ResourceSummaryJob {
    pub fn new(workload_rules: WorkloadRules, options: SummaryOptions) -> Self {
        Self {
            workload_rules,
            options,
        }
    }

    pub fn run(&self, consumption: &Table, deployments: &Table) -> Result<ResourceSummary, JobError> {
        let mut consumption = consumption.clone();
        if !consumption.has_column(columns::RESSOURCE)
            && consumption.rename_column(columns::RESOURCE_FALLBACK, columns::RESSOURCE)
        {
            info!("renamed column {:?} to {:?}", columns::RESOURCE_FALLBACK, columns::RESSOURCE);
        }

        info!("Validating consumption columns");
        require(&consumption, "consumption", &columns::CONSUMPTION_REQUIRED)?;

        info!("Building lookups from {} deployment rows", deployments.len());
        let lookups = SummaryLookups::from_deployments(deployments);

        info!("Computing Charge JH for {} rows", consumption.len());
        let consumption = calculate_charge_jh(&consumption);

        info!("Pivoting workload by resource and project");
        let pivot = pivot_workload(
            &consumption,
            columns::RESSOURCE,
            columns::PROJET,
            columns::CHARGE_JH,
        );

        info!("Formatting resource summary from {} pivot entries", pivot.len());
        let summary =
            format_resource_summary(&pivot, &lookups, &self.workload_rules, &self.options);
        info!(
            resources = summary.resources().count(),
            projects = summary.projects().count(),
            total_ecart = summary.total_ecart,
            "Resource summary ready"
        );

        Ok(summary)
    }
}

// ============================================================================
// RAF
// ============================================================================

/// Deployments augmented with RAF, plus its period breakdown
#[derive(Clone, Debug, PartialEq)]
pub struct RafReport {
    /// The deployments table with a "RAF" column
    pub table: Table,
    pub calendar: RafCalendar,
    pub monthly: Vec<MonthlyRaf>,
}

impl RafReport {
    /// RAF per input row, in row order
    pub fn raf_values(&self) -> Vec<Option<f64>> {
        (0..self.table.len())
            .map(|row| self.table.get(row, columns::RAF).as_f64())
            .collect()
    }
}

/// Deployments → RAF column and monthly/weekly summary
#[derive(Clone, Debug, Default)]
pub struct RafJob {
    pub rules: RafRules,
}

impl RafJob {
    pub fn new(rules: RafRules) -> Self {
        Self { rules }
    }

    pub fn run(&self, deployments: &Table) -> Result<RafReport, JobError> {
        info!("Validating deployment columns");
        require(deployments, "deployments", &columns::RAF_REQUIRED)?;

        info!("Computing RAF for {} rows", deployments.len());
        let table = calculate_raf(deployments, &self.rules);

        info!("Aggregating RAF by month and week");
        let calendar = raf_calendar(&table);
        let monthly = calculate_monthly_raf(&table);
        info!(
            months = monthly.len(),
            total = calendar.total(),
            "RAF summary ready"
        );

        Ok(RafReport {
            table,
            calendar,
            monthly,
        })
    }
}
