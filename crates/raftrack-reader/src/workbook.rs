//! Workbook loading through calamine

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use raftrack_core::{Table, Value};

use crate::{unnamed_column, ReadError, Sheet};

pub(crate) fn read_first_sheet(path: &Path) -> Result<Sheet, ReadError> {
    let invalid = |e: calamine::Error| ReadError::InvalidWorkbook {
        path: path.to_path_buf(),
        details: e.to_string(),
    };

    let mut workbook = open_workbook_auto(path).map_err(invalid)?;
    let name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ReadError::NoSheets(path.to_path_buf()))?;
    let range = workbook.worksheet_range(&name).map_err(invalid)?;

    let header_row = range.start().map_or(0, |(row, _)| row);
    let mut rows = range.rows();

    let Some(header) = rows.next() else {
        return Ok(Sheet {
            name,
            header_row,
            delimiter: None,
            table: Table::default(),
        });
    };

    let columns: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(idx, cell)| header_text(cell).unwrap_or_else(|| unnamed_column(idx)))
        .collect();

    let mut table = Table::new(columns);
    for row in rows {
        table.push_row(row.iter().map(to_value).collect());
    }

    Ok(Sheet {
        name,
        header_row,
        delimiter: None,
        table,
    })
}

fn header_text(cell: &Data) -> Option<String> {
    match to_value(cell) {
        Value::Empty => None,
        Value::Text(s) => Some(s),
        other => other.as_text(),
    }
}

fn to_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Empty,
        Data::String(s) => Value::Text(s.clone()),
        Data::Float(n) => Value::Number(*n),
        Data::Int(n) => Value::Number(*n as f64),
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map_or_else(|| Value::Number(dt.as_f64()), Value::Date),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::Text(s.clone()),
        Data::Error(e) => {
            tracing::debug!(error = ?e, "cell error read as blank");
            Value::Empty
        }
    }
}
