//! Output sheets: tables for the combined and per-project BOMs
//!
//! The output workbook is a directory with one CSV file per sheet:
//! `<project>.csv` for each input and `Combined.csv` for the merge.

use std::fs;
use std::path::{Path, PathBuf};

use super::rows::COMBINED_SHEET;
use super::WorkbookError;
use crate::core::inventory::AnnotatedBom;
use crate::core::pipeline::ProjectBom;

/// A header row and string cells, shared by the CSV writer and the CLI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render as CSV into any writer
    pub fn write_csv<W: std::io::Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&self.headers)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Combined sheet; the Stock column only appears when a ledger was used
pub fn combined_table(bom: &AnnotatedBom) -> Table {
    let mut headers = vec!["Type", "Count", "Value", "Description", "Sources"];
    if bom.inventory_available {
        headers.push("Stock");
    }

    let mut table = Table::new(&headers);
    for annotated in &bom.parts {
        let part = &annotated.part;
        let mut row = vec![
            part.category.to_string(),
            part.quantity.to_string(),
            part.value.to_string(),
            part.description.clone(),
            part.source_labels().join(", "),
        ];
        if bom.inventory_available {
            row.push(annotated.highlight.label().to_string());
        }
        table.rows.push(row);
    }
    table
}

/// Per-project sheet
pub fn project_table(project: &ProjectBom) -> Table {
    let mut table = Table::new(&["Type", "Part", "Value", "Description", "Notes"]);
    for part in &project.parts {
        table.rows.push(vec![
            part.category.to_string(),
            part.designator_list(),
            part.value.to_string(),
            part.description.clone(),
            part.notes.clone(),
        ]);
    }
    table
}

/// Writes output sheets into a directory
#[derive(Debug)]
pub struct WorkbookWriter {
    dir: PathBuf,
}

impl WorkbookWriter {
    /// Create the output directory if needed
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, WorkbookError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| WorkbookError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn write_project(&self, project: &ProjectBom) -> Result<PathBuf, WorkbookError> {
        self.write_sheet(&project.name, &project_table(project))
    }

    pub fn write_combined(&self, bom: &AnnotatedBom) -> Result<PathBuf, WorkbookError> {
        self.write_sheet(COMBINED_SHEET, &combined_table(bom))
    }

    fn write_sheet(&self, name: &str, table: &Table) -> Result<PathBuf, WorkbookError> {
        let path = self.dir.join(format!("{}.csv", sanitize_file_name(name)));
        let file = fs::File::create(&path).map_err(|source| WorkbookError::Io {
            path: path.clone(),
            source,
        })?;
        table.write_csv(file).map_err(|source| WorkbookError::Csv {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), rows = table.len(), "wrote sheet");
        Ok(path)
    }
}

/// File name a sheet is written under, minus the extension
pub(crate) fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim().trim_matches('.');
    if cleaned.is_empty() {
        "sheet".to_string()
    } else {
        cleaned.to_string()
    }
}
