//! `bom-merge merge` - merge BOMs and check them against the inventory

use chrono::{DateTime, Utc};
use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::cli::helpers::load_pipeline;
use crate::cli::table::render;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{AnnotatedBom, HighlightClass, MergeReport, MergeStats, ProjectBom};
use crate::workbook::{combined_table, load_ledger, load_sources, WorkbookWriter};

#[derive(clap::Args, Debug)]
pub struct MergeArgs {
    /// Input BOMs: spreadsheets, CSV files, or directories of CSV files
    #[arg(long = "in", short = 'i', value_name = "FILE", required = true, num_args = 1..)]
    pub inputs: Vec<PathBuf>,

    /// Write the output workbook (one CSV per sheet) into this directory
    #[arg(long, short = 'o', value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Inventory workbook to check stock against
    #[arg(long, value_name = "PATH")]
    pub inventory: Option<PathBuf>,
}

/// JSON document for `-f json`
#[derive(Serialize)]
struct MergeOutput<'a> {
    generated_at: DateTime<Utc>,
    stats: &'a MergeStats,
    projects: &'a [ProjectBom],
    combined: &'a AnnotatedBom,
}

pub fn run(args: MergeArgs, global: &GlobalOpts) -> Result<()> {
    let (config, pipeline) = load_pipeline(global)?;

    let sources = load_sources(&args.inputs, &config.sheets)?;
    let ledger = match &args.inventory {
        Some(path) => Some(load_ledger(path, &config.sheets, pipeline.parser())?),
        None => None,
    };

    let report = pipeline.run(&sources, ledger.as_ref())?;

    if let Some(out) = &args.out {
        write_workbook(out, &report, global)?;
    }

    match global.format {
        OutputFormat::Json => {
            let output = MergeOutput {
                generated_at: Utc::now(),
                stats: &report.stats,
                projects: &report.projects,
                combined: &report.combined,
            };
            println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
        }
        format => {
            print!(
                "{}",
                render(&combined_table(&report.combined), format, Some("Stock"))
            );
        }
    }

    if !global.quiet {
        eprintln!("{}", summary_line(&report));
    }
    Ok(())
}

fn write_workbook(out: &Path, report: &MergeReport, global: &GlobalOpts) -> Result<()> {
    let writer = WorkbookWriter::new(out)?;
    let mut written = 0;
    for project in &report.projects {
        writer.write_project(project)?;
        written += 1;
    }
    writer.write_combined(&report.combined)?;
    written += 1;

    if !global.quiet {
        eprintln!(
            "{} Wrote {} sheet(s) to {}",
            style("✓").green(),
            written,
            style(writer.dir().display()).cyan()
        );
    }
    Ok(())
}

fn summary_line(report: &MergeReport) -> String {
    let combined = &report.combined;
    let mut line = format!(
        "{} part(s), {} piece(s) from {} source(s)",
        style(combined.parts.len()).cyan(),
        combined.total_quantity(),
        report.stats.sources
    );
    if report.stats.rows_excluded > 0 {
        line.push_str(&format!(", {} row(s) excluded", report.stats.rows_excluded));
    }

    if combined.inventory_available {
        let missing = combined.count(HighlightClass::Missing);
        let low = combined.count(HighlightClass::Low);
        line.push_str(&format!(
            "; {} missing, {} low",
            if missing > 0 {
                style(missing).red().bold().to_string()
            } else {
                missing.to_string()
            },
            if low > 0 {
                style(low).yellow().to_string()
            } else {
                low.to_string()
            }
        ));
    } else {
        line.push_str(&format!("; {}", style("inventory not checked").dim()));
    }
    line
}
