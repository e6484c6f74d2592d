//! # raftrack-core
//!
//! Core domain model and traits for raftrack.
//!
//! This crate provides:
//! - Tabular types: `Value`, `Table`
//! - Column names of the consumption and deployment exports (`columns`)
//! - Resource-summary rows and RAF period buckets (`summary`, `period`)
//! - Rule tables for RAF and theoretical workload (`rules`)
//! - The `Renderer` trait and error types
//!
//! ## Example
//!
//! ```rust
//! use raftrack_core::{columns, Table, Value};
//!
//! let table = Table::from_columns(vec![
//!     (columns::RESSOURCE, vec![Value::from("Alice"), Value::from("Bob")]),
//!     (columns::SOUMISE_H, vec![Value::from(8.0), Value::from(16.0)]),
//! ]);
//!
//! assert_eq!(table.len(), 2);
//! assert_eq!(table.get(1, columns::SOUMISE_H).as_f64(), Some(16.0));
//! ```

pub mod columns;
pub mod period;
pub mod phase;
pub mod rules;
pub mod summary;

pub use period::{MonthlyRaf, RafCalendar, RafMonth, RafWeek, RafYear};
pub use phase::PhaseSelection;
pub use rules::{RafRules, RuleSet, WorkloadRules};
pub use summary::{
    EcartDistribution, EcartSign, ProjectRow, ResourceHeaderRow, ResourceSummary, SummaryColumn,
    SummaryRow,
};

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// Constants
// ============================================================================

/// One working day, in hours
pub const HOURS_PER_DAY: f64 = 8.0;

/// Day zero of the Excel 1900 date system (accounts for the 1900 leap-year bug)
const EXCEL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// Largest serial Excel accepts (9999-12-31)
const EXCEL_MAX_SERIAL: f64 = 2_958_465.0;

// ============================================================================
// Value
// ============================================================================

/// A single spreadsheet cell
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Date(NaiveDateTime),
    Text(String),
}

impl Value {
    /// True for blank cells and whitespace-only text
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Empty => true,
            Value::Text(s) => s.trim().is_empty(),
            Value::Number(n) => n.is_nan(),
            _ => false,
        }
    }

    /// Spreadsheet truthiness: blank, zero, `false` and empty text are falsy
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Empty => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Date(_) => true,
            Value::Text(s) => !s.trim().is_empty(),
        }
    }

    /// Numeric view of the cell.
    ///
    /// Text is parsed leniently: surrounding whitespace, thousands spaces and
    /// a decimal comma are accepted. Anything else is `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) if n.is_finite() => Some(*n),
            Value::Text(s) => parse_number(s),
            _ => None,
        }
    }

    /// Text view of the cell, `None` when blank
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Empty => None,
            Value::Bool(b) => Some(if *b { "TRUE" } else { "FALSE" }.to_string()),
            Value::Number(n) if n.is_nan() => None,
            Value::Number(n) => Some(format_number(*n)),
            Value::Date(dt) => Some(if dt.time() == chrono::NaiveTime::MIN {
                dt.format("%Y-%m-%d").to_string()
            } else {
                dt.format("%Y-%m-%d %H:%M:%S").to_string()
            }),
            Value::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
        }
    }

    /// Calendar date of the cell.
    ///
    /// Accepts date cells, Excel serial numbers and text in ISO
    /// (`2023-01-31`, optionally with a time) or day-first (`31/01/2023`) form.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(dt) => Some(dt.date()),
            Value::Number(n) => excel_serial_to_date(*n),
            Value::Text(s) => parse_date(s),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d.and_time(chrono::NaiveTime::MIN))
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::Date(dt)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Empty, Into::into)
    }
}

/// Number from exported text, French conventions first.
///
/// Spaces (including no-break spaces) are thousands separators. A comma with
/// no dot is always a decimal comma, so `"1,250"` reads as 1.25 and never as
/// 1250; this applies to amounts and CA as well as hours. When a dot is
/// present, commas are thousands separators (`"1,250.5"` is 1250.5).
fn parse_number(s: &str) -> Option<f64> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}' && *c != '\u{202f}')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    let normalized = if cleaned.contains(',') && !cleaned.contains('.') {
        cleaned.replace(',', ".")
    } else {
        cleaned.replace(',', "")
    };
    normalized.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];
    const DATETIME_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M",
    ];

    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Convert an Excel 1900-system serial number to a date
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !(1.0..=EXCEL_MAX_SERIAL).contains(&serial) {
        return None;
    }
    let (y, m, d) = EXCEL_EPOCH;
    let epoch = NaiveDate::from_ymd_opt(y, m, d)?;
    epoch.checked_add_signed(Duration::days(serial.floor() as i64))
}

// ============================================================================
// Table
// ============================================================================

/// A rectangular dataset with named columns.
///
/// Column names are matched by exact string. Every row holds exactly one value
/// per column.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

static EMPTY: Value = Value::Empty;

impl Table {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Build a table column by column; shorter columns are padded with blanks
    pub fn from_columns<S: Into<String>>(columns: Vec<(S, Vec<Value>)>) -> Self {
        let height = columns.iter().map(|(_, v)| v.len()).max().unwrap_or(0);
        let mut names = Vec::with_capacity(columns.len());
        let mut data = Vec::with_capacity(columns.len());
        for (name, values) in columns {
            names.push(name.into());
            data.push(values);
        }
        let rows = (0..height)
            .map(|r| {
                data.iter()
                    .map(|col| col.get(r).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();
        Self {
            columns: names,
            rows,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Append a row, padding or truncating it to the table width
    pub fn push_row(&mut self, mut row: Vec<Value>) {
        row.resize(self.columns.len(), Value::Empty);
        self.rows.push(row);
    }

    /// Cell at `row` in column `name`; blank when either is missing
    pub fn get(&self, row: usize, name: &str) -> &Value {
        self.column_index(name)
            .and_then(|c| self.rows.get(row).and_then(|r| r.get(c)))
            .unwrap_or(&EMPTY)
    }

    /// All values of a column, `None` if the column does not exist
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Value> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |r| &r[idx]))
    }

    /// Copy of this table with `name` set to `values`.
    ///
    /// The column is appended when absent and overwritten in place otherwise.
    /// Missing trailing values are blank.
    pub fn with_column(&self, name: &str, values: Vec<Value>) -> Table {
        let mut out = self.clone();
        let idx = match out.column_index(name) {
            Some(idx) => idx,
            None => {
                out.columns.push(name.to_string());
                for row in &mut out.rows {
                    row.push(Value::Empty);
                }
                out.columns.len() - 1
            }
        };
        let mut values = values.into_iter();
        for row in &mut out.rows {
            row[idx] = values.next().unwrap_or_default();
        }
        out
    }

    /// Rename a column in place. Returns false when `from` does not exist.
    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        match self.column_index(from) {
            Some(idx) => {
                self.columns[idx] = to.to_string();
                true
            }
            None => false,
        }
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Output rendering
pub trait Renderer<T: ?Sized> {
    type Output;

    /// Render the input to the output format
    fn render(&self, input: &T) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Rule table loading error
#[derive(Debug, Error)]
pub enum RulesError {
    #[error("IO error reading rules: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid rules file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Cannot serialize rules: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn value_numbers_from_text() {
        assert_eq!(Value::from("16").as_f64(), Some(16.0));
        assert_eq!(Value::from(" 7,5 ").as_f64(), Some(7.5));
        assert_eq!(Value::from("1 250.5").as_f64(), Some(1250.5));
        assert_eq!(Value::from("n/a").as_f64(), None);
        assert_eq!(Value::Empty.as_f64(), None);
        assert_eq!(Value::Number(f64::NAN).as_f64(), None);
    }

    #[test]
    fn lone_comma_is_a_decimal_comma() {
        assert_eq!(Value::from("1,250").as_f64(), Some(1.25));
        assert_eq!(Value::from("1 250,75").as_f64(), Some(1250.75));
        assert_eq!(Value::from("1,250.5").as_f64(), Some(1250.5));
    }

    #[test]
    fn value_truthiness() {
        assert!(!Value::Empty.is_truthy());
        assert!(!Value::from("  ").is_truthy());
        assert!(!Value::from(0.0).is_truthy());
        assert!(!Value::from(false).is_truthy());
        assert!(Value::from("A").is_truthy());
        assert!(Value::from(2.0).is_truthy());
    }

    #[test]
    fn value_text_formats_integers_without_decimals() {
        assert_eq!(Value::from(3000.0).as_text().as_deref(), Some("3000"));
        assert_eq!(Value::from(2.5).as_text().as_deref(), Some("2.5"));
        assert_eq!(Value::from("  P1 ").as_text().as_deref(), Some("P1"));
        assert_eq!(Value::Empty.as_text(), None);
    }

    #[test]
    fn value_dates() {
        assert_eq!(Value::from("2023-01-01").as_date(), Some(date(2023, 1, 1)));
        assert_eq!(Value::from("15/03/2024").as_date(), Some(date(2024, 3, 15)));
        assert_eq!(
            Value::from("2024-03-15 10:30:00").as_date(),
            Some(date(2024, 3, 15))
        );
        assert_eq!(Value::from(date(2024, 2, 29)).as_date(), Some(date(2024, 2, 29)));
        assert_eq!(Value::from("not a date").as_date(), None);
        assert_eq!(Value::Empty.as_date(), None);
    }

    #[test]
    fn excel_serial_conversion() {
        // 44927 is 2023-01-01 in the 1900 date system
        assert_eq!(excel_serial_to_date(44927.0), Some(date(2023, 1, 1)));
        assert_eq!(excel_serial_to_date(44927.75), Some(date(2023, 1, 1)));
        assert_eq!(excel_serial_to_date(0.0), None);
        assert_eq!(excel_serial_to_date(-3.0), None);
    }

    #[test]
    fn table_from_columns_pads_short_columns() {
        let table = Table::from_columns(vec![
            ("a", vec![Value::from(1.0), Value::from(2.0)]),
            ("b", vec![Value::from("x")]),
        ]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1, "b"), &Value::Empty);
        assert_eq!(table.get(0, "missing"), &Value::Empty);
        assert_eq!(table.get(9, "a"), &Value::Empty);
    }

    #[test]
    fn table_with_column_copies() {
        let table = Table::from_columns(vec![("a", vec![Value::from(1.0), Value::from(2.0)])]);
        let added = table.with_column("b", vec![Value::from("x")]);

        assert!(!table.has_column("b"));
        assert_eq!(added.columns(), &["a".to_string(), "b".to_string()]);
        assert_eq!(added.get(0, "b"), &Value::from("x"));
        assert_eq!(added.get(1, "b"), &Value::Empty);

        let replaced = added.with_column("a", vec![Value::from(5.0), Value::from(6.0)]);
        assert_eq!(replaced.columns().len(), 2);
        assert_eq!(replaced.get(1, "a").as_f64(), Some(6.0));
    }

    #[test]
    fn table_rename_column() {
        let mut table = Table::new(["Resource", "Projet"]);
        assert!(table.rename_column("Resource", "Ressource"));
        assert!(table.has_column("Ressource"));
        assert!(!table.rename_column("Resource", "Ressource"));
    }

    #[test]
    fn table_push_row_pads() {
        let mut table = Table::new(["a", "b", "c"]);
        table.push_row(vec![Value::from(1.0)]);
        assert_eq!(table.rows()[0].len(), 3);
    }

    #[test]
    fn render_error_display() {
        let err = RenderError::InvalidData("no rows".into());
        assert!(format!("{}", err).contains("no rows"));
    }
}
