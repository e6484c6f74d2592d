//! Plain text output for the console

use raftrack_core::{RafCalendar, RenderError, Renderer, ResourceSummary, SummaryRow, Value};

use crate::excel::PROJECT_INDENT;

/// Aligned text table of a resource summary
#[derive(Clone, Debug)]
pub struct TextRenderer {
    /// Decimals shown for numbers
    pub precision: usize,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self { precision: 2 }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    fn format_value(&self, value: &Value) -> String {
        match value {
            Value::Number(n) if n.fract() == 0.0 => format!("{n:.0}"),
            Value::Number(n) => format!("{n:.prec$}", prec = self.precision),
            other => other.as_text().unwrap_or_default(),
        }
    }
}

impl Renderer<ResourceSummary> for TextRenderer {
    type Output = String;

    fn render(&self, summary: &ResourceSummary) -> Result<String, RenderError> {
        let mut grid: Vec<Vec<String>> = Vec::with_capacity(summary.rows.len() + 1);
        grid.push(
            summary
                .columns
                .iter()
                .map(|c| c.header().to_string())
                .collect(),
        );
        for (idx, row) in summary.rows.iter().enumerate() {
            let cells = summary
                .columns
                .iter()
                .enumerate()
                .map(|(col, column)| {
                    let text = self.format_value(&summary.cell(idx, *column));
                    match row {
                        SummaryRow::Project(_) if col == 0 => format!("{PROJECT_INDENT}{text}"),
                        _ => text,
                    }
                })
                .collect();
            grid.push(cells);
        }

        let widths: Vec<usize> = (0..summary.columns.len())
            .map(|col| {
                grid.iter()
                    .map(|r| r[col].chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        for (i, row) in grid.iter().enumerate() {
            let line: Vec<String> = row
                .iter()
                .zip(&widths)
                .enumerate()
                .map(|(col, (cell, width))| {
                    let pad = width - cell.chars().count();
                    if col == 0 || i == 0 || !summary.columns[col].is_numeric() {
                        format!("{cell}{}", " ".repeat(pad))
                    } else {
                        format!("{}{cell}", " ".repeat(pad))
                    }
                })
                .collect();
            out.push_str(line.join(" | ").trim_end());
            out.push('\n');
            if i == 0 {
                let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
                out.push_str(&rule.join("-+-"));
                out.push('\n');
            }
        }
        Ok(out)
    }
}

/// Year / month / week listing of a RAF calendar
#[derive(Clone, Debug, Default)]
pub struct RafTextRenderer;

impl Renderer<RafCalendar> for RafTextRenderer {
    type Output = String;

    fn render(&self, calendar: &RafCalendar) -> Result<String, RenderError> {
        let mut out = String::from("RAF Summary Report\n");
        if calendar.is_empty() {
            out.push_str("  (no dated RAF values)\n");
            return Ok(out);
        }
        for year in &calendar.years {
            out.push_str(&format!("Year {}\n", year.year));
            for month in &year.months {
                out.push_str(&format!("  {:<33} {:>10.2}\n", month.name(), month.total));
                for week in &month.weeks {
                    out.push_str(&format!("    • {:<29} {:>10.2}\n", week.label(), week.total));
                }
            }
        }
        out.push_str(&format!("Total {:>39.2}\n", calendar.total()));
        Ok(out)
    }
}
