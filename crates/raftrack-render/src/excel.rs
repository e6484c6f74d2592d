//! Resource-summary workbook renderer
//!
//! Generates an XLSX file with up to three sheets:
//! - Resource Summary: one bold row per consultant followed by its indented
//!   projects, with the Ecart column filled green (positive) or red (negative)
//! - High CA: the same layout restricted to projects above the contract threshold
//! - Charts: the chart source data, a column chart of workload per consultant
//!   and a pie chart of Ecart signs, side by side
//!
//! ## Example Output Structure
//!
//! ```text
//! Sheet: Resource Summary
//! | Resource/ PROJET | Somme de Charge JH | Total Consultant | ... | Ecart | ... | Total Ecart |
//! |------------------|--------------------|------------------|-----|-------|-----|-------------|
//! | Alice            |                    | 4.5              |     |       |     | -3.5        |
//! |     Portail RH   | 1.5                |                  |     | -3.5  |     |             |
//! ```

use chrono::Datelike;
use rust_xlsxwriter::{
    Chart, ChartType, ExcelDateTime, Format, FormatAlign, FormatBorder, Workbook, Worksheet,
};
use raftrack_core::{
    EcartSign, RenderError, Renderer, ResourceSummary, SummaryColumn, SummaryRow, Value,
};
use tracing::{debug, warn};

pub const SUMMARY_SHEET: &str = "Resource Summary";
pub const HIGH_CA_SHEET: &str = "High CA";
pub const CHARTS_SHEET: &str = "Charts";

/// Prefix written before project labels
pub const PROJECT_INDENT: &str = "    ";

const GREEN: u32 = 0xC6E0B4;
const RED: u32 = 0xF8CBAD;

/// Excel resource-summary renderer
#[derive(Clone, Debug)]
pub struct ExcelRenderer {
    /// Contract amount above which a project appears on the High CA sheet
    pub high_ca_threshold: f64,
    /// Whether to include the High CA sheet
    pub include_high_ca: bool,
    /// Whether to include the Charts sheet
    pub include_charts: bool,
}

impl Default for ExcelRenderer {
    fn default() -> Self {
        Self {
            high_ca_threshold: 3000.0,
            include_high_ca: true,
            include_charts: true,
        }
    }
}

impl ExcelRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the High CA threshold
    pub fn high_ca_threshold(mut self, threshold: f64) -> Self {
        self.high_ca_threshold = threshold;
        self
    }

    /// Disable the High CA sheet
    pub fn no_high_ca(mut self) -> Self {
        self.include_high_ca = false;
        self
    }

    /// Disable the Charts sheet
    pub fn no_charts(mut self) -> Self {
        self.include_charts = false;
        self
    }

    /// Generate Excel workbook bytes
    pub fn render_to_bytes(&self, summary: &ResourceSummary) -> Result<Vec<u8>, RenderError> {
        let mut workbook = Workbook::new();
        let formats = create_formats();

        self.add_summary_sheet(&mut workbook, SUMMARY_SHEET, summary, &formats)?;

        if self.include_high_ca {
            let high = summary.high_ca(self.high_ca_threshold);
            debug!(
                threshold = self.high_ca_threshold,
                projects = high.projects().count(),
                "High CA projects"
            );
            self.add_summary_sheet(&mut workbook, HIGH_CA_SHEET, &high, &formats)?;
        }

        if self.include_charts {
            self.add_charts_sheet(&mut workbook, summary, &formats)?;
        }

        let buffer = workbook
            .save_to_buffer()
            .map_err(|e| RenderError::Format(format!("Failed to create Excel: {e}")))?;

        Ok(buffer)
    }

    /// Write one summary table: header row, then one row per summary row
    fn add_summary_sheet(
        &self,
        workbook: &mut Workbook,
        name: &str,
        summary: &ResourceSummary,
        formats: &ExcelFormats,
    ) -> Result<(), RenderError> {
        let sheet = workbook.add_worksheet();
        sheet
            .set_name(name)
            .map_err(|e| RenderError::Format(e.to_string()))?;

        for (col, column) in summary.columns.iter().enumerate() {
            let col = col as u16;
            sheet
                .write_with_format(0, col, column.header(), &formats.header)
                .map_err(|e| RenderError::Format(e.to_string()))?;
            let width = if *column == SummaryColumn::Label { 35 } else { 18 };
            sheet.set_column_width(col, width).ok();
        }

        for (idx, row) in summary.rows.iter().enumerate() {
            let excel_row = idx as u32 + 1;
            for (col, column) in summary.columns.iter().enumerate() {
                let value = match (row, column) {
                    (SummaryRow::Project(p), SummaryColumn::Label) => {
                        Value::from(format!("{PROJECT_INDENT}{}", p.project))
                    }
                    _ => summary.cell(idx, *column),
                };
                let format = formats.for_cell(row, *column, &value);
                write_value(sheet, excel_row, col as u16, &value, format)?;
            }
        }

        sheet.set_freeze_panes(1, 0).ok();
        Ok(())
    }

    /// Chart source data on the left, the two charts to its right
    fn add_charts_sheet(
        &self,
        workbook: &mut Workbook,
        summary: &ResourceSummary,
        formats: &ExcelFormats,
    ) -> Result<(), RenderError> {
        let sheet = workbook.add_worksheet();
        sheet
            .set_name(CHARTS_SHEET)
            .map_err(|e| RenderError::Format(e.to_string()))?;

        sheet.set_column_width(0, 30).ok();
        sheet.set_column_width(1, 15).ok();
        sheet.set_column_width(3, 15).ok();
        sheet.set_column_width(4, 10).ok();

        // Workload per consultant
        let headers = [(0, "Consultant"), (1, "Charge JH"), (3, "Ecart"), (4, "Projets")];
        for (col, header) in headers {
            sheet
                .write_with_format(0, col, header, &formats.header)
                .map_err(|e| RenderError::Format(e.to_string()))?;
        }

        let mut row = 1u32;
        for resource in summary.resources() {
            sheet
                .write_with_format(row, 0, resource.resource.as_str(), &formats.text)
                .map_err(|e| RenderError::Format(e.to_string()))?;
            sheet
                .write_with_format(row, 1, resource.aggregate, &formats.number)
                .map_err(|e| RenderError::Format(e.to_string()))?;
            row += 1;
        }
        let last_resource_row = row - 1;

        // Ecart distribution
        let dist = summary.ecart_distribution();
        let counts = [
            ("Positive", dist.positive),
            ("Negative", dist.negative),
            ("Zero", dist.zero),
        ];
        for (i, (label, count)) in counts.iter().enumerate() {
            let row = i as u32 + 1;
            sheet
                .write_with_format(row, 3, *label, &formats.text)
                .map_err(|e| RenderError::Format(e.to_string()))?;
            sheet
                .write_with_format(row, 4, *count as f64, &formats.integer)
                .map_err(|e| RenderError::Format(e.to_string()))?;
        }

        let chart_row = last_resource_row.max(4) + 2;

        if last_resource_row >= 1 {
            let categories = format!("{CHARTS_SHEET}!$A$2:$A${}", last_resource_row + 1);
            let values = format!("{CHARTS_SHEET}!$B$2:$B${}", last_resource_row + 1);

            let mut chart = Chart::new(ChartType::Column);
            chart.title().set_name("Charge JH par consultant");
            chart.legend().set_hidden();
            chart
                .add_series()
                .set_name("Charge JH")
                .set_categories(categories.as_str())
                .set_values(values.as_str());
            chart.set_width(640).set_height(360);
            sheet
                .insert_chart(chart_row, 0, &chart)
                .map_err(|e| RenderError::Format(e.to_string()))?;
        }

        if dist.total() > 0 {
            let categories = format!("{CHARTS_SHEET}!$D$2:$D$4");
            let values = format!("{CHARTS_SHEET}!$E$2:$E$4");

            let mut pie = Chart::new(ChartType::Pie);
            pie.title().set_name("Distribution des écarts");
            pie.add_series()
                .set_name("Ecart")
                .set_categories(categories.as_str())
                .set_values(values.as_str());
            pie.set_width(480).set_height(360);
            sheet
                .insert_chart(chart_row, 7, &pie)
                .map_err(|e| RenderError::Format(e.to_string()))?;
        }

        Ok(())
    }
}

/// Write a cell, keeping the border on blanks
fn write_value(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &Value,
    format: &Format,
) -> Result<(), RenderError> {
    let result = match value {
        Value::Empty => sheet.write_blank(row, col, format),
        Value::Bool(b) => sheet.write_boolean_with_format(row, col, *b, format),
        Value::Number(n) => sheet.write_number_with_format(row, col, *n, format),
        Value::Text(s) => sheet.write_string_with_format(row, col, s, format),
        Value::Date(dt) => {
            let date = ExcelDateTime::from_ymd(dt.year() as u16, dt.month() as u8, dt.day() as u8)
                .map_err(|e| RenderError::Format(e.to_string()))?;
            sheet.write_with_format(row, col, &date, format)
        }
    };
    result
        .map(|_| ())
        .map_err(|e| RenderError::Format(e.to_string()))
}

/// Create reusable formats
fn create_formats() -> ExcelFormats {
    let header = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_background_color(0x4472C4)
        .set_font_color(0xFFFFFF)
        .set_border(FormatBorder::Thin);

    let text = Format::new().set_border(FormatBorder::Thin);

    let number = Format::new()
        .set_num_format("#,##0.00")
        .set_border(FormatBorder::Thin);

    let integer = Format::new()
        .set_num_format("#,##0")
        .set_border(FormatBorder::Thin);

    let resource_text = Format::new().set_bold().set_border(FormatBorder::Thin);

    let resource_number = Format::new()
        .set_bold()
        .set_num_format("#,##0.00")
        .set_border(FormatBorder::Thin);

    let ecart_positive = Format::new()
        .set_num_format("#,##0.00")
        .set_background_color(GREEN)
        .set_border(FormatBorder::Thin);

    let ecart_negative = Format::new()
        .set_num_format("#,##0.00")
        .set_background_color(RED)
        .set_border(FormatBorder::Thin);

    ExcelFormats {
        header,
        text,
        number,
        integer,
        resource_text,
        resource_number,
        ecart_positive,
        ecart_negative,
    }
}

struct ExcelFormats {
    header: Format,
    text: Format,
    number: Format,
    integer: Format,
    // Consultant rows are bold
    resource_text: Format,
    resource_number: Format,
    ecart_positive: Format,
    ecart_negative: Format,
}

impl ExcelFormats {
    fn for_cell(&self, row: &SummaryRow, column: SummaryColumn, value: &Value) -> &Format {
        if row.is_consultant() {
            return if column.is_numeric() {
                &self.resource_number
            } else {
                &self.resource_text
            };
        }

        match column {
            SummaryColumn::Ecart => match value.as_f64().map(EcartSign::of) {
                Some(EcartSign::Positive) => &self.ecart_positive,
                Some(EcartSign::Negative) => &self.ecart_negative,
                _ => &self.number,
            },
            SummaryColumn::Duration => &self.integer,
            c if c.is_numeric() => &self.number,
            _ => &self.text,
        }
    }
}

impl Renderer<ResourceSummary> for ExcelRenderer {
    type Output = Vec<u8>;

    fn render(&self, summary: &ResourceSummary) -> Result<Vec<u8>, RenderError> {
        if summary.is_empty() {
            warn!("resource summary is empty; writing headers only");
        }
        self.render_to_bytes(summary)
    }
}
