//! Resource-summary rows
//!
//! A summary is a flat list of rows forming a two-level hierarchy: one
//! [`ResourceHeaderRow`] per consultant, immediately followed by one
//! [`ProjectRow`] per project that consultant worked on. Renderers derive
//! indentation and emphasis from the row variant.

use serde::Serialize;

use crate::Value;

// ============================================================================
// Columns
// ============================================================================

/// Output columns of the resource summary, in display order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum SummaryColumn {
    Label,
    Workload,
    ResourceTotal,
    ConnectionLevel,
    Phase,
    Amount,
    Ca,
    Theoretical,
    Ecart,
    LastNote,
    Duration,
    TotalEcart,
}

impl SummaryColumn {
    pub const ALL: [SummaryColumn; 12] = [
        SummaryColumn::Label,
        SummaryColumn::Workload,
        SummaryColumn::ResourceTotal,
        SummaryColumn::ConnectionLevel,
        SummaryColumn::Phase,
        SummaryColumn::Amount,
        SummaryColumn::Ca,
        SummaryColumn::Theoretical,
        SummaryColumn::Ecart,
        SummaryColumn::LastNote,
        SummaryColumn::Duration,
        SummaryColumn::TotalEcart,
    ];

    /// Header text written to the output sheet
    pub fn header(self) -> &'static str {
        match self {
            SummaryColumn::Label => "Resource/ PROJET",
            SummaryColumn::Workload => "Somme de Charge JH",
            SummaryColumn::ResourceTotal => "Total Consultant",
            SummaryColumn::ConnectionLevel => crate::columns::NIVEAU_CONNEXION,
            SummaryColumn::Phase => crate::columns::PHASE_PROJET,
            SummaryColumn::Amount => crate::columns::MONTANT,
            SummaryColumn::Ca => crate::columns::CA,
            SummaryColumn::Theoretical => "Charge théorique",
            SummaryColumn::Ecart => "Ecart",
            SummaryColumn::LastNote => crate::columns::DERNIERE_NOTE,
            SummaryColumn::Duration => "Durée",
            SummaryColumn::TotalEcart => "Total Ecart",
        }
    }

    /// Look a column up by header text (case-insensitive)
    pub fn from_header(header: &str) -> Option<Self> {
        let wanted = header.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.header().to_lowercase() == wanted)
    }

    /// Whether the column holds numbers
    pub fn is_numeric(self) -> bool {
        !matches!(
            self,
            SummaryColumn::Label
                | SummaryColumn::ConnectionLevel
                | SummaryColumn::Phase
                | SummaryColumn::LastNote
        )
    }
}

// ============================================================================
// Rows
// ============================================================================

/// Aggregate line for one consultant
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResourceHeaderRow {
    pub resource: String,
    /// Sum of the workload of the project rows below this header
    pub aggregate: f64,
}

/// One (consultant, project) line
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ProjectRow {
    pub resource: String,
    pub project: String,
    /// Submitted workload in person-days
    pub workload: Option<f64>,
    pub connection_level: Option<String>,
    pub phase: Option<String>,
    /// Contract amount
    pub amount: Option<f64>,
    pub ca: Option<f64>,
    /// Expected workload from the rule table
    pub theoretical: Option<f64>,
    /// `workload - theoretical`
    pub ecart: Option<f64>,
    pub last_note: Option<String>,
    /// Days since the project was assigned
    pub days_elapsed: Option<i64>,
}

impl ProjectRow {
    pub fn new(resource: impl Into<String>, project: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            project: project.into(),
            ..Self::default()
        }
    }

    pub fn ecart_sign(&self) -> Option<EcartSign> {
        self.ecart.map(EcartSign::of)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SummaryRow {
    Resource(ResourceHeaderRow),
    Project(ProjectRow),
}

impl SummaryRow {
    /// Consultant roll-up rows are exactly the resource headers
    pub fn is_consultant(&self) -> bool {
        matches!(self, SummaryRow::Resource(_))
    }

    pub fn resource(&self) -> &str {
        match self {
            SummaryRow::Resource(r) => &r.resource,
            SummaryRow::Project(p) => &p.resource,
        }
    }

    /// Cell value of this row in `column`. The label is not indented.
    pub fn cell(&self, column: SummaryColumn) -> Value {
        match self {
            SummaryRow::Resource(r) => match column {
                SummaryColumn::Label => Value::from(r.resource.clone()),
                SummaryColumn::ResourceTotal => Value::from(r.aggregate),
                _ => Value::Empty,
            },
            SummaryRow::Project(p) => match column {
                SummaryColumn::Label => Value::from(p.project.clone()),
                SummaryColumn::Workload => p.workload.into(),
                SummaryColumn::ConnectionLevel => p.connection_level.clone().into(),
                SummaryColumn::Phase => p.phase.clone().into(),
                SummaryColumn::Amount => p.amount.into(),
                SummaryColumn::Ca => p.ca.into(),
                SummaryColumn::Theoretical => p.theoretical.into(),
                SummaryColumn::Ecart => p.ecart.into(),
                SummaryColumn::LastNote => p.last_note.clone().into(),
                SummaryColumn::Duration => p.days_elapsed.into(),
                SummaryColumn::ResourceTotal | SummaryColumn::TotalEcart => Value::Empty,
            },
        }
    }
}

// ============================================================================
// Ecart classification
// ============================================================================

/// Sign of a variance, used for colour-coding
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum EcartSign {
    Positive,
    Negative,
    Zero,
}

impl EcartSign {
    pub fn of(ecart: f64) -> Self {
        if ecart > 0.0 {
            EcartSign::Positive
        } else if ecart < 0.0 {
            EcartSign::Negative
        } else {
            EcartSign::Zero
        }
    }
}

/// Count of project rows per Ecart sign
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct EcartDistribution {
    pub positive: usize,
    pub negative: usize,
    pub zero: usize,
}

impl EcartDistribution {
    pub fn total(&self) -> usize {
        self.positive + self.negative + self.zero
    }
}

// ============================================================================
// Summary
// ============================================================================

/// The formatted resource summary
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResourceSummary {
    /// Columns to render, in order
    pub columns: Vec<SummaryColumn>,
    pub rows: Vec<SummaryRow>,
    /// Sum of every project row's Ecart, shown once in the first data row
    pub total_ecart: f64,
}

impl ResourceSummary {
    /// Build a summary with all columns, recomputing aggregates and the Ecart total
    pub fn from_rows(rows: Vec<SummaryRow>) -> Self {
        let mut summary = Self {
            columns: SummaryColumn::ALL.to_vec(),
            rows,
            total_ecart: 0.0,
        };
        summary.recompute_aggregates();
        summary
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn resources(&self) -> impl Iterator<Item = &ResourceHeaderRow> {
        self.rows.iter().filter_map(|row| match row {
            SummaryRow::Resource(r) => Some(r),
            SummaryRow::Project(_) => None,
        })
    }

    pub fn projects(&self) -> impl Iterator<Item = &ProjectRow> {
        self.rows.iter().filter_map(|row| match row {
            SummaryRow::Project(p) => Some(p),
            SummaryRow::Resource(_) => None,
        })
    }

    /// Set every header's aggregate to the workload sum of the project rows
    /// that follow it, and refresh the Ecart total. Idempotent.
    pub fn recompute_aggregates(&mut self) {
        let mut current: Option<usize> = None;
        let mut sums: Vec<(usize, f64)> = Vec::new();

        for (idx, row) in self.rows.iter().enumerate() {
            match row {
                SummaryRow::Resource(_) => {
                    sums.push((idx, 0.0));
                    current = Some(sums.len() - 1);
                }
                SummaryRow::Project(p) => {
                    if let (Some(slot), Some(workload)) = (current, p.workload) {
                        sums[slot].1 += workload;
                    }
                }
            }
        }

        for (idx, sum) in sums {
            if let SummaryRow::Resource(header) = &mut self.rows[idx] {
                header.aggregate = sum;
            }
        }

        self.total_ecart = self.projects().filter_map(|p| p.ecart).sum();
    }

    /// Remove columns from the output (the label column is always kept)
    pub fn drop_columns(&mut self, dropped: &[SummaryColumn]) {
        self.columns
            .retain(|c| *c == SummaryColumn::Label || !dropped.contains(c));
    }

    /// Value at `row` in `column`, with the Ecart total placed in the first row
    pub fn cell(&self, row: usize, column: SummaryColumn) -> Value {
        match column {
            SummaryColumn::TotalEcart if row == 0 => Value::from(self.total_ecart),
            SummaryColumn::TotalEcart => Value::Empty,
            _ => self.rows.get(row).map(|r| r.cell(column)).unwrap_or_default(),
        }
    }

    pub fn ecart_distribution(&self) -> EcartDistribution {
        let mut dist = EcartDistribution::default();
        for sign in self.projects().filter_map(ProjectRow::ecart_sign) {
            match sign {
                EcartSign::Positive => dist.positive += 1,
                EcartSign::Negative => dist.negative += 1,
                EcartSign::Zero => dist.zero += 1,
            }
        }
        dist
    }

    /// Sub-summary keeping only project rows matching `keep`.
    ///
    /// Headers left without any project row are dropped; aggregates and the
    /// Ecart total are recomputed over what remains.
    pub fn filter_projects(&self, keep: impl Fn(&ProjectRow) -> bool) -> ResourceSummary {
        let mut rows = Vec::new();
        let mut pending_header: Option<&SummaryRow> = None;

        for row in &self.rows {
            match row {
                SummaryRow::Resource(_) => pending_header = Some(row),
                SummaryRow::Project(p) if keep(p) => {
                    if let Some(header) = pending_header.take() {
                        rows.push(header.clone());
                    }
                    rows.push(row.clone());
                }
                SummaryRow::Project(_) => {}
            }
        }

        let mut out = ResourceSummary {
            columns: self.columns.clone(),
            rows,
            total_ecart: 0.0,
        };
        out.recompute_aggregates();
        out
    }

    /// Projects whose contract amount is strictly above `threshold`
    pub fn high_ca(&self, threshold: f64) -> ResourceSummary {
        self.filter_projects(|p| p.amount.is_some_and(|a| a > threshold))
    }
}
