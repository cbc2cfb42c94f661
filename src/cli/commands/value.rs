//! `bom-merge value` - show how value text is normalized

use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::load_config;
use crate::cli::table::render;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Category;
use crate::workbook::Table;

#[derive(clap::Args, Debug)]
pub struct ValueArgs {
    /// Category to parse for (resistor, capacitor, ...)
    pub category: Category,

    /// Value text, e.g. 2k2 or "4.7 uF"
    #[arg(required = true)]
    pub values: Vec<String>,
}

pub fn run(args: ValueArgs, global: &GlobalOpts) -> Result<()> {
    let parser = load_config(global)?.value_parser();

    let mut table = Table {
        headers: ["Input", "Family", "Magnitude", "Display"]
            .iter()
            .map(|h| h.to_string())
            .collect(),
        rows: Vec::new(),
    };
    let mut parsed = Vec::with_capacity(args.values.len());

    for raw in &args.values {
        let value = parser.parse(args.category, raw);
        table.rows.push(vec![
            raw.clone(),
            value.family().to_string(),
            value
                .base_magnitude()
                .map(|m| m.to_string())
                .unwrap_or_else(|| "-".to_string()),
            value.display().to_string(),
        ]);
        parsed.push(serde_json::json!({
            "input": raw,
            "value": value,
            "magnitude": value.base_magnitude(),
        }));
    }

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&parsed).into_diagnostic()?)
        }
        format => print!("{}", render(&table, format, None)),
    }
    Ok(())
}
