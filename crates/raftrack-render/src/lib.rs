//! # raftrack-render
//!
//! Output backends for raftrack reports.
//!
//! This crate provides:
//! - The resource-summary workbook (Resource Summary, High CA and Charts sheets)
//! - RAF output: the deployments workbook with a RAF column and a RAF Summary sheet
//! - Text tables for console output
//!
//! ## Example
//!
//! ```rust,ignore
//! use raftrack_core::Renderer;
//! use raftrack_render::{ExcelRenderer, RafWorkbookWriter, TextRenderer};
//!
//! // Resource summary workbook
//! let bytes = ExcelRenderer::new().high_ca_threshold(3000.0).render(&summary)?;
//! std::fs::write("export_resource_summary.xlsx", bytes)?;
//!
//! // Console table
//! println!("{}", TextRenderer::new().render(&summary)?);
//!
//! // RAF column and summary written into a copy of the deployments file
//! RafWorkbookWriter::new()
//!     .header_row(0)
//!     .write(source, output, &report.table, &report.calendar)?;
//! ```

pub mod excel;
pub mod raf_workbook;
pub mod text;

pub use excel::ExcelRenderer;
pub use raf_workbook::RafWorkbookWriter;
pub use text::{RafTextRenderer, TextRenderer};
