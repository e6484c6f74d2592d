//! Required-column validation

use raftrack_core::Table;

/// Outcome of a column check
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Validation {
    pub is_valid: bool,
    /// Required names absent from the table, in the caller's order
    pub missing: Vec<String>,
}

/// Check that `table` carries every column in `required`
pub fn validate_columns<S: AsRef<str>>(table: &Table, required: &[S]) -> Validation {
    let missing: Vec<String> = required
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| !table.has_column(name))
        .map(str::to_string)
        .collect();

    Validation {
        is_valid: missing.is_empty(),
        missing,
    }
}
