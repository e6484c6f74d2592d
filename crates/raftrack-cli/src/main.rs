//! raftrack CLI - workload and RAF reports
//!
//! Command-line interface for building the resource summary workbook and the
//! RAF report from consumption and deployment exports.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use raftrack_core::{PhaseSelection, Renderer, RuleSet, SummaryColumn};
use raftrack_engine::{RafJob, ResourceSummaryJob, SummaryOptions};
use raftrack_reader::{read_sheet, read_table};
use raftrack_render::{ExcelRenderer, RafTextRenderer, RafWorkbookWriter, TextRenderer};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "raftrack")]
#[command(author, version, about = "Workload and RAF reports from spreadsheet exports", long_about = None)]
struct Cli {
    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Rule file (TOML) replacing the built-in rules
    #[arg(long, value_name = "FILE", env = "RAFTRACK_RULES", global = true)]
    rules: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the resource summary workbook
    Summary {
        /// Consumption export (hours per resource and project)
        #[arg(value_name = "CONSUMPTION")]
        consumption: PathBuf,

        /// Deployments export (project attributes)
        #[arg(value_name = "DEPLOYMENTS")]
        deployments: PathBuf,

        /// Output workbook (default: <consumption>_resource_summary.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Keep only projects in this phase (repeatable)
        #[arg(long = "phase", value_name = "PHASE")]
        phases: Vec<String>,

        /// Keep every phase
        #[arg(long, conflicts_with = "phases")]
        all_phases: bool,

        /// Remove a column from the output, by header (repeatable)
        #[arg(long = "drop-column", value_name = "HEADER")]
        drop_columns: Vec<String>,

        /// Reference date for durations (default: today)
        #[arg(long, value_name = "YYYY-MM-DD")]
        as_of: Option<NaiveDate>,

        /// Skip the Charts sheet
        #[arg(long)]
        no_charts: bool,

        /// Also print the summary as a text table
        #[arg(long)]
        print: bool,

        /// Also print the summary as JSON
        #[arg(long, conflicts_with = "print")]
        json: bool,
    },

    /// Compute RAF and write it into a copy of the deployments file
    Raf {
        /// Deployments export
        #[arg(value_name = "DEPLOYMENTS")]
        deployments: PathBuf,

        /// Output file (default: <deployments>_with_raf.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also print the period breakdown
        #[arg(long)]
        print: bool,

        /// Also print per-row RAF and monthly totals as JSON
        #[arg(long, conflicts_with = "print")]
        json: bool,
    },

    /// Print the effective rules as TOML
    Rules,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();

    let rules = load_rules(cli.rules.as_deref())?;

    match cli.command {
        Some(Commands::Summary {
            consumption,
            deployments,
            output,
            phases,
            all_phases,
            drop_columns,
            as_of,
            no_charts,
            print,
            json,
        }) => {
            let phases = if all_phases {
                PhaseSelection::All
            } else if phases.is_empty() {
                PhaseSelection::default()
            } else {
                PhaseSelection::only(phases)
            };
            let options = SummaryOptions {
                phases,
                dropped_columns: parse_columns(&drop_columns)?,
                as_of: Some(as_of.unwrap_or_else(|| Local::now().date_naive())),
            };
            let output = output
                .unwrap_or_else(|| default_output(&consumption, "_resource_summary", Some("xlsx")));
            let summary = cmd_summary(
                &rules,
                options,
                &consumption,
                &deployments,
                &output,
                no_charts,
            )?;
            if print {
                print!("{}", TextRenderer::new().render(&summary)?);
            } else if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
        }
        Some(Commands::Raf {
            deployments,
            output,
            print,
            json,
        }) => {
            let output = output.unwrap_or_else(|| default_output(&deployments, "_with_raf", None));
            let report = cmd_raf(&rules, &deployments, &output)?;
            if print {
                print!("{}", RafTextRenderer.render(&report.calendar)?);
            } else if json {
                let value = serde_json::json!({
                    "raf": report.raf_values(),
                    "monthly": report.monthly,
                    "calendar": report.calendar,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            }
        }
        Some(Commands::Rules) => {
            print!("{}", rules.to_toml_string()?);
        }
        None => {
            println!("raftrack - workload and RAF reports");
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

fn load_rules(path: Option<&Path>) -> Result<RuleSet> {
    match path {
        Some(path) => {
            debug!("Loading rules from {}", path.display());
            RuleSet::from_path(path).with_context(|| format!("Failed to load rules from {}", path.display()))
        }
        None => Ok(RuleSet::default()),
    }
}

fn cmd_summary(
    rules: &RuleSet,
    options: SummaryOptions,
    consumption_path: &Path,
    deployments_path: &Path,
    output: &Path,
    no_charts: bool,
) -> Result<raftrack_core::ResourceSummary> {
    let consumption = read_table(consumption_path)
        .with_context(|| format!("Failed to read {}", consumption_path.display()))?;
    let deployments = read_table(deployments_path)
        .with_context(|| format!("Failed to read {}", deployments_path.display()))?;

    let summary = ResourceSummaryJob::new(rules.workload.clone(), options)
        .run(&consumption, &deployments)?;

    let mut renderer = ExcelRenderer::new().high_ca_threshold(rules.high_ca_threshold);
    if no_charts {
        renderer = renderer.no_charts();
    }
    let bytes = renderer
        .render(&summary)
        .context("Failed to render the resource summary")?;
    std::fs::write(output, bytes).with_context(|| format!("Failed to write {}", output.display()))?;

    info!("Resource summary written to {}", output.display());
    eprintln!("Wrote {}", output.display());
    Ok(summary)
}

fn cmd_raf(rules: &RuleSet, deployments_path: &Path, output: &Path) -> Result<raftrack_engine::RafReport> {
    let sheet = read_sheet(deployments_path)
        .with_context(|| format!("Failed to read {}", deployments_path.display()))?;
    debug!(sheet = %sheet.name, header_row = sheet.header_row, "Deployments sheet loaded");

    let report = RafJob::new(rules.raf.clone()).run(&sheet.table)?;

    let mut writer = RafWorkbookWriter::new().header_row(sheet.header_row);
    if let Some(delimiter) = sheet.delimiter {
        writer = writer.delimiter(delimiter);
    }
    writer
        .write(deployments_path, output, &report.table, &report.calendar)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    eprintln!("Wrote {}", output.display());
    Ok(report)
}

/// Droppable summary columns by header; the label column always stays
fn parse_columns(headers: &[String]) -> Result<Vec<SummaryColumn>> {
    headers
        .iter()
        .map(|h| match SummaryColumn::from_header(h) {
            Some(SummaryColumn::Label) => Err(anyhow!("Summary column {h:?} cannot be dropped")),
            Some(column) => Ok(column),
            None => Err(anyhow!("Unknown summary column: {h:?}")),
        })
        .collect()
}

/// `<dir>/<stem><suffix>.<ext>`, keeping the input's extension when `extension` is None
fn default_output(input: &Path, suffix: &str, extension: Option<&str>) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let extension = extension
        .map(str::to_string)
        .or_else(|| input.extension().map(|e| e.to_string_lossy().into_owned()));
    let name = match extension {
        Some(ext) => format!("{stem}{suffix}.{ext}"),
        None => format!("{stem}{suffix}"),
    };
    input.with_file_name(name)
}
