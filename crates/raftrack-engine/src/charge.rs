//! Workload ("Charge JH") from submitted hours

use raftrack_core::{columns, Table, Value, HOURS_PER_DAY};

/// Person-days for a submitted-hours cell; `None` when the cell is not numeric
pub fn charge_jh(hours: &Value) -> Option<f64> {
    hours.as_f64().map(|h| h / HOURS_PER_DAY)
}

/// Copy of `table` with a "Charge JH" column derived from "Soumise (h)".
///
/// Rows whose hours are blank or non-numeric get a blank workload.
pub fn calculate_charge_jh(table: &Table) -> Table {
    let values = (0..table.len())
        .map(|row| charge_jh(table.get(row, columns::SOUMISE_H)).into())
        .collect();
    table.with_column(columns::CHARGE_JH, values)
}
