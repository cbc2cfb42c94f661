//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    classify::ClassifyArgs, completions::CompletionsArgs, inventory::InventoryArgs,
    merge::MergeArgs, value::ValueArgs,
};

#[derive(Parser)]
#[command(name = "bom-merge")]
#[command(author, version, about = "Merge pedal-kit BOMs into one shopping list")]
#[command(long_about = "Reads bills of materials from spreadsheets or CSV files, normalizes component values, merges identical parts across projects and checks them against an optional stock inventory.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable verbose output (debug logging)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Configuration file layered over the global one
    #[arg(long, global = true, env = "BOM_MERGE_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Merge BOMs into per-project and combined sheets
    Merge(MergeArgs),

    /// Show how component values are normalized
    Value(ValueArgs),

    /// Show which category a BOM row falls into
    Classify(ClassifyArgs),

    /// List the entries of an inventory workbook
    Inventory(InventoryArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Markdown table on a terminal, with a coloured stock column
    #[default]
    Auto,
    /// Markdown tables
    Md,
    /// CSV format (for spreadsheets)
    Csv,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
}
