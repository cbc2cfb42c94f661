//! `bom-merge classify` - show the category and filter verdict for a row

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::load_pipeline;
use crate::cli::GlobalOpts;
use crate::cli::OutputFormat;
use crate::core::{Decision, RawRow, SourceRef};

#[derive(clap::Args, Debug)]
pub struct ClassifyArgs {
    /// Designator(s), e.g. "R1, R2"
    #[arg(long, default_value = "")]
    pub part: String,

    /// Value text
    #[arg(long, default_value = "")]
    pub value: String,

    /// Description text
    #[arg(long, default_value = "")]
    pub description: String,

    /// Quantity
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub qty: i64,
}

pub fn run(args: ClassifyArgs, global: &GlobalOpts) -> Result<()> {
    let (_, pipeline) = load_pipeline(global)?;

    let row = RawRow::new(SourceRef::new("command line", ""))
        .with_part(args.part)
        .with_value(args.value)
        .with_description(args.description)
        .with_quantity(args.qty);

    let (category, decision) = pipeline.categorizer().explain(&row);
    let value = pipeline.parser().parse(category, row.value());
    let exclusion = pipeline.filter().exclusion(&row);

    let reason = match decision {
        Decision::Rule(rule) => format!(
            "{} rule '{}'",
            format!("{:?}", rule.field).to_lowercase(),
            rule.pattern
        ),
        Decision::ParsedValue => "value parses as a component value".to_string(),
        Decision::Fallback => "no rule matched".to_string(),
    };

    if global.format == OutputFormat::Json {
        let output = serde_json::json!({
            "category": category,
            "reason": reason,
            "value": value,
            "excluded": exclusion.as_ref().map(|e| e.to_string()),
        });
        println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
        return Ok(());
    }

    println!("{:<10} {}", style("Category").bold(), style(category).cyan());
    println!("{:<10} {}", style("Reason").bold(), reason);
    println!("{:<10} {} ({})", style("Value").bold(), value, value.family());
    match exclusion {
        Some(reason) => println!(
            "{:<10} {}",
            style("Filter").bold(),
            style(format!("excluded: {}", reason)).yellow()
        ),
        None => println!("{:<10} {}", style("Filter").bold(), style("kept").green()),
    }
    Ok(())
}
