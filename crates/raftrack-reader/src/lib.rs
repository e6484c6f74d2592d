//! # raftrack-reader
//!
//! Loads the consumption and deployments exports into a [`Table`].
//!
//! This crate provides:
//! - Workbook loading (.xlsx, .xlsm, .xlsb, .xls, .ods) through calamine
//! - Delimited text loading (.csv) with `,`/`;` detection
//!
//! The first used row of the first sheet holds the headers; every following
//! row becomes one table row, blank rows included, so that table row `i`
//! maps back to sheet row `header_row + 1 + i`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use raftrack_reader::read_table;
//!
//! let table = read_table(std::path::Path::new("consommation.xlsx"))?;
//! println!("{} rows, columns: {:?}", table.len(), table.columns());
//! # Ok::<(), raftrack_reader::ReadError>(())
//! ```

mod delimited;
mod workbook;

use std::path::{Path, PathBuf};

use raftrack_core::Table;
use thiserror::Error;

/// Loading error
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Unsupported file format: {0:?}")]
    UnsupportedFormat(String),

    #[error("Invalid workbook {}: {details}", path.display())]
    InvalidWorkbook { path: PathBuf, details: String },

    #[error("Workbook {} has no sheets", .0.display())]
    NoSheets(PathBuf),

    #[error("Invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Supported input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Any workbook calamine can open
    Workbook,
    /// Comma or semicolon separated text
    Csv,
}

/// Detect file format from extension
pub fn detect_format(path: &Path) -> Result<FileFormat, ReadError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(FileFormat::Workbook),
        "csv" => Ok(FileFormat::Csv),
        _ => Err(ReadError::UnsupportedFormat(extension)),
    }
}

/// A loaded sheet and where its header sits
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    /// 0-based row index of the header row in the source sheet
    pub header_row: u32,
    /// Field separator, for delimited text sources
    pub delimiter: Option<u8>,
    pub table: Table,
}

/// Load the first sheet of a file
pub fn read_sheet(path: &Path) -> Result<Sheet, ReadError> {
    if !path.exists() {
        return Err(ReadError::FileNotFound(path.to_path_buf()));
    }

    let sheet = match detect_format(path)? {
        FileFormat::Workbook => workbook::read_first_sheet(path)?,
        FileFormat::Csv => delimited::read_csv(path)?,
    };

    tracing::debug!(
        path = %path.display(),
        sheet = %sheet.name,
        rows = sheet.table.len(),
        columns = sheet.table.columns().len(),
        "loaded table"
    );
    Ok(sheet)
}

/// Load the first sheet of a file as a table
pub fn read_table(path: &Path) -> Result<Table, ReadError> {
    read_sheet(path).map(|s| s.table)
}

/// Column name for a blank header cell, as spreadsheet tools name them
pub(crate) fn unnamed_column(index: usize) -> String {
    format!("Unnamed: {index}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_format_workbooks() {
        for name in ["a.xlsx", "a.XLSX", "a.xls", "a.xlsm", "a.ods"] {
            assert_eq!(detect_format(Path::new(name)).unwrap(), FileFormat::Workbook);
        }
    }

    #[test]
    fn test_detect_format_csv() {
        assert_eq!(detect_format(Path::new("data.csv")).unwrap(), FileFormat::Csv);
    }

    #[test]
    fn test_detect_format_unknown() {
        let err = detect_format(Path::new("data.txt")).unwrap_err();
        assert!(matches!(err, ReadError::UnsupportedFormat(ext) if ext == "txt"));
        assert!(detect_format(Path::new("data")).is_err());
    }

    #[test]
    fn test_read_file_not_found() {
        let result = read_table(Path::new("/nonexistent/not_a_file.xlsx"));
        assert!(matches!(result, Err(ReadError::FileNotFound(_))));
    }

    #[test]
    fn test_read_error_display() {
        let err = ReadError::FileNotFound(PathBuf::from("missing.xlsx"));
        assert!(format!("{}", err).contains("missing.xlsx"));
    }
}
