//! Rendering output tables for the terminal and for pipes
//!
//! Markdown output goes through tabled; CSV through the csv writer; TSV is
//! padded columns like the rest of the CLI's list output. Stock labels are
//! coloured when the output format is `auto`.

use console::style;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::truncate_str;
use crate::cli::OutputFormat;
use crate::workbook::Table;

/// Widest a TSV text column gets before truncation
const MAX_TSV_WIDTH: usize = 48;

/// Colour a stock label ("low" yellow, "missing" red)
pub fn style_stock(label: &str) -> String {
    match label {
        "missing" => style(label).red().bold().to_string(),
        "low" => style(label).yellow().to_string(),
        _ => label.to_string(),
    }
}

/// Render a table in the requested format
///
/// `stock_column` names the column holding stock labels, if any.
pub fn render(table: &Table, format: OutputFormat, stock_column: Option<&str>) -> String {
    let stock_idx = stock_column.and_then(|name| table.headers.iter().position(|h| h == name));
    match format {
        OutputFormat::Auto => render_markdown(table, stock_idx),
        OutputFormat::Md => render_markdown(table, None),
        OutputFormat::Csv => render_csv(table),
        OutputFormat::Tsv => render_tsv(table),
        OutputFormat::Json => render_json(table),
    }
}

fn render_markdown(table: &Table, colour_idx: Option<usize>) -> String {
    let mut builder = Builder::default();
    builder.push_record(table.headers.iter().map(String::as_str));
    for row in &table.rows {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                if Some(i) == colour_idx {
                    style_stock(cell)
                } else {
                    cell.clone()
                }
            })
            .collect();
        builder.push_record(cells);
    }
    let mut out = builder.build().with(Style::markdown()).to_string();
    out.push('\n');
    out
}

fn render_csv(table: &Table) -> String {
    let mut buf = Vec::new();
    if table.write_csv(&mut buf).is_err() {
        return String::new();
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn render_tsv(table: &Table) -> String {
    let widths: Vec<usize> = table
        .headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            table
                .rows
                .iter()
                .filter_map(|r| r.get(i))
                .map(|c| c.chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
                .min(MAX_TSV_WIDTH)
        })
        .collect();

    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{:<w$}", truncate_str(cell, w), w = w))
            .collect::<Vec<_>>()
            .join("\t")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&line(&table.headers));
    out.push('\n');
    for row in &table.rows {
        out.push_str(&line(row));
        out.push('\n');
    }
    out
}

/// Rows as JSON objects keyed by header
fn render_json(table: &Table) -> String {
    let rows: Vec<serde_json::Map<String, serde_json::Value>> = table
        .rows
        .iter()
        .map(|row| {
            table
                .headers
                .iter()
                .zip(row)
                .map(|(h, c)| (h.to_lowercase(), serde_json::Value::String(c.clone())))
                .collect()
        })
        .collect();
    serde_json::to_string_pretty(&rows).unwrap_or_default()
}
