//! `bom-merge inventory` - list what an inventory workbook holds

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::helpers::load_config;
use crate::cli::table::render;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{InventoryEntry, LedgerFamily, StockStatus};
use crate::workbook::{load_ledger, Table};

#[derive(clap::Args, Debug)]
pub struct InventoryArgs {
    /// Inventory workbook (spreadsheet or directory of CSV sheets)
    pub path: PathBuf,

    /// Only list one sub-ledger
    #[arg(long, value_enum)]
    pub family: Option<FamilyFilter>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FamilyFilter {
    Resistor,
    Ceramic,
    Film,
    Electrolytic,
}

impl From<FamilyFilter> for LedgerFamily {
    fn from(filter: FamilyFilter) -> Self {
        match filter {
            FamilyFilter::Resistor => LedgerFamily::Resistor,
            FamilyFilter::Ceramic => LedgerFamily::CeramicCap,
            FamilyFilter::Film => LedgerFamily::FilmCap,
            FamilyFilter::Electrolytic => LedgerFamily::ElectrolyticCap,
        }
    }
}

pub fn run(args: InventoryArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;
    let parser = config.value_parser();
    let ledger = load_ledger(&args.path, &config.sheets, &parser)?;

    let families: Vec<LedgerFamily> = match args.family {
        Some(filter) => vec![filter.into()],
        None => LedgerFamily::all().to_vec(),
    };
    let entries: Vec<&InventoryEntry> = families
        .iter()
        .flat_map(|family| ledger.entries(*family))
        .collect();

    if global.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&entries).into_diagnostic()?);
        return Ok(());
    }

    let mut table = Table {
        headers: ["Family", "Value", "Status"]
            .iter()
            .map(|h| h.to_string())
            .collect(),
        rows: Vec::new(),
    };
    for entry in &entries {
        let status = match entry.status {
            StockStatus::Plenty => "",
            StockStatus::Few => "low",
        };
        table.rows.push(vec![
            entry.family.to_string(),
            entry.value.to_string(),
            status.to_string(),
        ]);
    }
    print!("{}", render(&table, global.format, Some("Status")));

    if !global.quiet {
        let mut line = format!("{} entr(ies)", style(entries.len()).cyan());
        if ledger.skipped() > 0 {
            line.push_str(&format!(
                ", {} unparseable value(s) skipped",
                style(ledger.skipped()).yellow()
            ));
        }
        let conflicts = ledger.conflicts().len();
        if conflicts > 0 {
            line.push_str(&format!(
                ", {} duplicate(s) with conflicting status",
                style(conflicts).yellow()
            ));
        }
        eprintln!("{}", line);
    }
    Ok(())
}
