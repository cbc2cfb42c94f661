//! Turning input sheets into raw BOM rows

use std::collections::{HashMap, HashSet};
use std::path::Path;

use super::writer::sanitize_file_name;
use super::{Sheet, Workbook, WorkbookError};
use crate::core::config::SheetConfig;
use crate::core::pipeline::Source;
use crate::core::row::{split_designators, RawRow, SourceRef};

/// Output sheet names are capped at the spreadsheet limit
const MAX_PROJECT_NAME: usize = 31;

/// Rows scanned for a header before a sheet is treated as headerless
const HEADER_SCAN_ROWS: usize = 10;

/// Name reserved for the merged output sheet
pub const COMBINED_SHEET: &str = "Combined";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Column {
    Part,
    Value,
    Description,
    Notes,
    Quantity,
}

impl Column {
    fn from_header(header: &str) -> Option<Self> {
        match header.trim().to_lowercase().as_str() {
            "part" | "parts" | "designator" | "designators" | "reference" | "ref" => {
                Some(Column::Part)
            }
            "value" => Some(Column::Value),
            "description" | "desc" => Some(Column::Description),
            "notes" | "note" | "link url (non-mouser)" => Some(Column::Notes),
            "qty" | "quantity" | "count" => Some(Column::Quantity),
            _ => None,
        }
    }
}

/// Project name for an input path: the file stem up to the first " - "
pub fn project_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .or_else(|| path.file_name())
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let name = stem.split(" - ").next().unwrap_or("").trim();
    let name = if name.is_empty() { stem.trim() } else { name };
    name.chars().take(MAX_PROJECT_NAME).collect()
}

/// Build a map from column to index from the header row
fn build_header_map(row: &[super::Cell]) -> HashMap<Column, usize> {
    let mut map = HashMap::new();
    for (i, cell) in row.iter().enumerate() {
        if let Some(column) = cell.text().as_deref().and_then(Column::from_header) {
            map.entry(column).or_insert(i);
        }
    }
    map
}

/// First row within the scan window that names a value or description column
fn find_header(sheet: &Sheet) -> Option<(usize, HashMap<Column, usize>)> {
    sheet
        .rows
        .iter()
        .take(HEADER_SCAN_ROWS)
        .enumerate()
        .map(|(i, row)| (i, build_header_map(row)))
        .find(|(_, map)| {
            map.contains_key(&Column::Value) || map.contains_key(&Column::Description)
        })
}

/// Get a field value from a sheet row
fn get_field(row: &[super::Cell], header_map: &HashMap<Column, usize>, column: Column) -> Option<String> {
    header_map
        .get(&column)
        .and_then(|&idx| row.get(idx))
        .and_then(|cell| cell.text())
}

/// Quantity of a row: explicit count column, else designator count, else 1
///
/// A count that is not a whole number maps to 0 so the row filter drops it.
fn row_quantity(explicit: Option<&str>, part: Option<&str>) -> i64 {
    if let Some(text) = explicit {
        return match text.trim().parse::<f64>() {
            Ok(n) if n.fract() == 0.0 && n.is_finite() => n as i64,
            _ => 0,
        };
    }
    match part.map(split_designators) {
        Some(designators) if !designators.is_empty() => designators.len() as i64,
        _ => 1,
    }
}

/// Raw rows of one sheet; blank rows and the header are dropped
pub fn sheet_rows(sheet: &Sheet, file_label: &str) -> Vec<RawRow> {
    let Some((header_row, header_map)) = find_header(sheet) else {
        tracing::debug!(sheet = %sheet.name, "no header row, skipping sheet");
        return Vec::new();
    };

    let source = SourceRef::new(file_label, sheet.name.clone());
    sheet
        .rows
        .iter()
        .skip(header_row + 1)
        .filter(|row| row.iter().any(|cell| !cell.is_blank()))
        .filter_map(|row| {
            let part = get_field(row, &header_map, Column::Part);
            let value = get_field(row, &header_map, Column::Value);
            let description = get_field(row, &header_map, Column::Description);
            if part.is_none() && value.is_none() && description.is_none() {
                return None;
            }
            let quantity = get_field(row, &header_map, Column::Quantity);
            let quantity = row_quantity(quantity.as_deref(), part.as_deref());

            let mut raw = RawRow::new(source.clone()).with_quantity(quantity);
            if let Some(part) = part {
                raw = raw.with_part(part);
            }
            if let Some(value) = value {
                raw = raw.with_value(value);
            }
            if let Some(description) = description {
                raw = raw.with_description(description);
            }
            if let Some(notes) = get_field(row, &header_map, Column::Notes) {
                raw = raw.with_notes(notes);
            }
            Some(raw)
        })
        .collect()
}

fn is_skipped(sheet: &Sheet, skip_keywords: &[String]) -> bool {
    let name = sheet.name.to_lowercase();
    skip_keywords
        .iter()
        .any(|k| !k.trim().is_empty() && name.contains(&k.trim().to_lowercase()))
}

/// Read every input into a named source, one per path
///
/// Project names are unique across the run, compared by the file name their
/// sheet is written under; repeats get " (2)", " (3)", ...
pub fn load_sources(paths: &[impl AsRef<Path>], sheets: &SheetConfig) -> Result<Vec<Source>, WorkbookError> {
    let mut taken: HashSet<String> = HashSet::new();
    taken.insert(sheet_key(COMBINED_SHEET));

    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        let workbook = Workbook::open(path)?;
        let file_label = workbook.file_label();

        let mut rows = Vec::new();
        for sheet in &workbook.sheets {
            if is_skipped(sheet, &sheets.skip_keywords) {
                tracing::debug!(file = %file_label, sheet = %sheet.name, "skipping sheet");
                continue;
            }
            rows.extend(sheet_rows(sheet, &file_label));
        }

        let base = project_name(path);
        let name = unique_name(base.clone(), &mut taken);
        if name != base {
            tracing::warn!(file = %file_label, project = %name, "duplicate project name, renamed");
        }
        tracing::info!(file = %file_label, project = %name, rows = rows.len(), "read source");
        sources.push(Source { name, rows });
    }
    Ok(sources)
}

fn sheet_key(name: &str) -> String {
    sanitize_file_name(name).to_lowercase()
}

fn unique_name(base: String, taken: &mut HashSet<String>) -> String {
    let base = if base.is_empty() { "Project".to_string() } else { base };
    let mut candidate = base.clone();
    let mut n = 2;
    while taken.contains(&sheet_key(&candidate)) {
        let suffix = format!(" ({})", n);
        let keep = MAX_PROJECT_NAME.saturating_sub(suffix.chars().count());
        candidate = format!("{}{}", base.chars().take(keep).collect::<String>(), suffix);
        n += 1;
    }
    taken.insert(sheet_key(&candidate));
    candidate
}
