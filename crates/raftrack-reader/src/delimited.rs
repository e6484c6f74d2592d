//! CSV loading
//!
//! Values are kept as text; numeric and date views are derived on demand by
//! [`Value`].

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use csv::ReaderBuilder;
use raftrack_core::{Table, Value};

use crate::{unnamed_column, ReadError, Sheet};

pub(crate) fn read_csv(path: &Path) -> Result<Sheet, ReadError> {
    let delimiter = sniff_delimiter(path)?;

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)?;

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(idx, h)| {
            let h = h.trim_start_matches('\u{feff}');
            if h.is_empty() {
                unnamed_column(idx)
            } else {
                h.to_string()
            }
        })
        .collect();

    let mut table = Table::new(columns);
    for record in reader.records() {
        let record = record?;
        table.push_row(
            record
                .iter()
                .map(|field| {
                    if field.trim().is_empty() {
                        Value::Empty
                    } else {
                        Value::Text(field.to_string())
                    }
                })
                .collect(),
        );
    }

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();

    Ok(Sheet {
        name,
        header_row: 0,
        delimiter: Some(delimiter),
        table,
    })
}

/// `;` when the header line has more semicolons than commas, `,` otherwise
fn sniff_delimiter(path: &Path) -> Result<u8, ReadError> {
    let mut first_line = String::new();
    BufReader::new(File::open(path)?).read_line(&mut first_line)?;
    Ok(delimiter_for(&first_line))
}

fn delimiter_for(header_line: &str) -> u8 {
    let semicolons = header_line.matches(';').count();
    let commas = header_line.matches(',').count();
    if semicolons > commas {
        b';'
    } else {
        b','
    }
}
