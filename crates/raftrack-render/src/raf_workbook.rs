//! RAF output: the deployments workbook with an extra "RAF" column and a
//! "RAF Summary" sheet.
//!
//! The source file is copied to the output path and edited in place, so every
//! other sheet, style and formula of the original survives. A sheet that
//! already has a "RAF" header gets that column rewritten. Delimited text
//! sources get the RAF column only, with their own field separator.

use std::path::Path;

use raftrack_core::{columns, RafCalendar, RenderError, Table};
use tracing::{debug, info, warn};
use umya_spreadsheet::{Border, HorizontalAlignmentValues, Spreadsheet, Style, Worksheet};

pub const RAF_SUMMARY_SHEET: &str = "RAF Summary";

const BLUE: &str = "FF4472C4";
const LIGHT_BLUE: &str = "FF8EA9DB";
const NAVY: &str = "FF000080";
const WHITE: &str = "FFFFFFFF";

/// Writes the RAF column and summary into a copy of the deployments file
#[derive(Clone, Debug)]
pub struct RafWorkbookWriter {
    /// Zero-based sheet row holding the headers
    pub header_row: u32,
    /// Field separator for CSV output
    pub delimiter: u8,
}

impl Default for RafWorkbookWriter {
    fn default() -> Self {
        Self {
            header_row: 0,
            delimiter: b',',
        }
    }
}

impl RafWorkbookWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sheet row of the headers (as reported by the reader)
    pub fn header_row(mut self, row: u32) -> Self {
        self.header_row = row;
        self
    }

    /// Set the CSV field separator (as reported by the reader)
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Copy `source` to `output`, then add the RAF column of `table` and the
    /// period breakdown of `calendar`.
    pub fn write(
        &self,
        source: &Path,
        output: &Path,
        table: &Table,
        calendar: &RafCalendar,
    ) -> Result<(), RenderError> {
        if !table.has_column(columns::RAF) {
            return Err(RenderError::InvalidData("table has no RAF column".into()));
        }

        match extension(output).as_str() {
            "xlsx" | "xlsm" => {
                if !matches!(extension(source).as_str(), "xlsx" | "xlsm") {
                    return Err(RenderError::InvalidData(format!(
                        "{} cannot be edited in place; save it as .xlsx first",
                        source.display()
                    )));
                }
                copy_unless_same(source, output)?;
                self.augment_workbook(output, table, calendar)
            }
            "csv" => {
                if !calendar.is_empty() {
                    warn!("{} is not a workbook; skipping the RAF Summary sheet", output.display());
                }
                write_csv(output, table, self.delimiter)
            }
            other => Err(RenderError::InvalidData(format!(
                "cannot write RAF into a .{other} file; use .xlsx or .csv"
            ))),
        }
    }

    fn augment_workbook(
        &self,
        path: &Path,
        table: &Table,
        calendar: &RafCalendar,
    ) -> Result<(), RenderError> {
        let mut book = umya_spreadsheet::reader::xlsx::read(path)
            .map_err(|e| RenderError::Format(format!("Failed to open {}: {e}", path.display())))?;

        let sheet = book
            .get_sheet_mut(&0)
            .ok_or_else(|| RenderError::InvalidData("workbook has no sheets".into()))?;
        let raf_col = self.write_raf_column(sheet, table);
        debug!(column = raf_col, rows = table.len(), "RAF column written");

        add_summary_sheet(&mut book, calendar)?;

        umya_spreadsheet::writer::xlsx::write(&book, path)
            .map_err(|e| RenderError::Format(format!("Failed to save {}: {e}", path.display())))?;
        info!("RAF workbook written to {}", path.display());
        Ok(())
    }

    /// One value per data row, under the existing "RAF" header or a new one
    /// after the last used column. Returns the 1-based column index.
    fn write_raf_column(&self, sheet: &mut Worksheet, table: &Table) -> u32 {
        let header = self.header_row + 1;
        let highest = sheet.get_highest_column();
        let existing = (1..=highest).find(|&col| {
            sheet
                .get_cell((col, header))
                .is_some_and(|cell| cell.get_value().trim() == columns::RAF)
        });
        let col = existing.unwrap_or(highest + 1);

        sheet.get_cell_mut((col, header)).set_value(columns::RAF);
        sheet
            .get_style_mut((col, header))
            .get_font_mut()
            .set_bold(true);

        for row in 0..table.len() {
            let coordinate = (col, header + 1 + row as u32);
            match table.get(row, columns::RAF).as_f64() {
                Some(raf) => {
                    sheet.get_cell_mut(coordinate).set_value_number(raf);
                }
                None if existing.is_some() => {
                    sheet.remove_cell(coordinate);
                }
                None => {}
            }
        }
        col
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default()
}

fn copy_unless_same(source: &Path, output: &Path) -> Result<(), RenderError> {
    let same = match (source.canonicalize(), output.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    };
    if !same {
        std::fs::copy(source, output)?;
    }
    Ok(())
}

fn write_csv(path: &Path, table: &Table, delimiter: u8) -> Result<(), RenderError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .map_err(|e| RenderError::Format(e.to_string()))?;
    writer
        .write_record(table.columns())
        .map_err(|e| RenderError::Format(e.to_string()))?;
    for row in table.rows() {
        writer
            .write_record(row.iter().map(|v| v.as_text().unwrap_or_default()))
            .map_err(|e| RenderError::Format(e.to_string()))?;
    }
    writer.flush()?;
    info!("RAF table written to {}", path.display());
    Ok(())
}

// ============================================================================
// RAF Summary sheet
// ============================================================================

fn add_summary_sheet(book: &mut Spreadsheet, calendar: &RafCalendar) -> Result<(), RenderError> {
    if book.get_sheet_by_name(RAF_SUMMARY_SHEET).is_some() {
        book.remove_sheet_by_name(RAF_SUMMARY_SHEET)
            .map_err(|e| RenderError::Format(e.to_string()))?;
    }
    let sheet = book
        .new_sheet(RAF_SUMMARY_SHEET)
        .map_err(|e| RenderError::Format(e.to_string()))?;

    sheet.add_merge_cells("A1:E1");
    sheet.get_cell_mut("A1").set_value("RAF Summary Report");
    {
        let style = sheet.get_style_mut("A1");
        style
            .get_font_mut()
            .set_size(16.0)
            .set_bold(true)
            .get_color_mut()
            .set_argb(NAVY);
        style
            .get_alignment_mut()
            .set_horizontal(HorizontalAlignmentValues::Center);
    }

    sheet.get_column_dimension_mut("A").set_width(35.0);
    sheet.get_column_dimension_mut("B").set_width(15.0);

    for (col, header) in [(1, "Period"), (2, "RAF Value")] {
        sheet.get_cell_mut((col, 3)).set_value(header);
        let style = sheet.get_style_mut((col, 3));
        style.get_font_mut().set_size(12.0).set_bold(true).get_color_mut().set_argb(WHITE);
        style.set_background_color(BLUE);
        style
            .get_alignment_mut()
            .set_horizontal(HorizontalAlignmentValues::Center);
        set_borders(style, Border::BORDER_MEDIUM);
    }

    let mut row = 4u32;
    for year in &calendar.years {
        sheet
            .get_cell_mut((1, row))
            .set_value(format!("Year {}", year.year));
        for col in 1..=2 {
            let style = sheet.get_style_mut((col, row));
            style.set_background_color(BLUE);
            set_borders(style, Border::BORDER_THIN);
        }
        sheet
            .get_style_mut((1, row))
            .get_font_mut()
            .set_size(14.0)
            .set_bold(true)
            .get_color_mut()
            .set_argb(WHITE);
        row += 1;

        for month in &year.months {
            sheet.get_cell_mut((1, row)).set_value(month.name());
            sheet.get_cell_mut((2, row)).set_value_number(month.total);
            for col in 1..=2 {
                let style = sheet.get_style_mut((col, row));
                style.get_font_mut().set_size(12.0).set_bold(true);
                style.set_background_color(LIGHT_BLUE);
                set_borders(style, Border::BORDER_THIN);
            }
            center(sheet.get_style_mut((2, row)));
            row += 1;

            for week in &month.weeks {
                sheet
                    .get_cell_mut((1, row))
                    .set_value(format!("  • {}", week.label()));
                sheet.get_cell_mut((2, row)).set_value_number(week.total);
                for col in 1..=2 {
                    let style = sheet.get_style_mut((col, row));
                    style.get_font_mut().set_size(11.0);
                    set_borders(style, Border::BORDER_THIN);
                }
                center(sheet.get_style_mut((2, row)));
                row += 1;
            }
        }
    }

    debug!(rows = row - 4, "RAF Summary sheet written");
    Ok(())
}

fn set_borders(style: &mut Style, border: &str) {
    let borders = style.get_borders_mut();
    borders.get_left_mut().set_border_style(border);
    borders.get_right_mut().set_border_style(border);
    borders.get_top_mut().set_border_style(border);
    borders.get_bottom_mut().set_border_style(border);
}

fn center(style: &mut Style) {
    style
        .get_alignment_mut()
        .set_horizontal(HorizontalAlignmentValues::Center);
}
