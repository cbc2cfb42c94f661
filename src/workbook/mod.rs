//! Spreadsheet I/O around the engine
//!
//! A [`Workbook`] is a named list of sheets of cells, read from an Excel or
//! OpenDocument file, a single CSV file, or a directory of CSV files (one
//! sheet per file). Output workbooks are written in the directory form.

pub mod ledger;
pub mod reader;
pub mod rows;
pub mod writer;

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

pub use ledger::load_ledger;
pub use rows::{load_sources, project_name, sheet_rows};
pub use writer::{combined_table, project_table, Table, WorkbookWriter};

#[derive(Debug, Error, Diagnostic)]
pub enum WorkbookError {
    #[error("failed to access {}", .path.display())]
    #[diagnostic(code(bom_merge::workbook::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read spreadsheet {}: {message}", .path.display())]
    #[diagnostic(code(bom_merge::workbook::spreadsheet))]
    Spreadsheet { path: PathBuf, message: String },

    #[error("CSV error in {}", .path.display())]
    #[diagnostic(code(bom_merge::workbook::csv))]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("unsupported input: {}", .path.display())]
    #[diagnostic(
        code(bom_merge::workbook::unsupported),
        help("use .xlsx, .xlsm, .xlsb, .xls, .ods, .csv, or a directory of .csv files")
    )]
    Unsupported { path: PathBuf },

    #[error("none of the sheets {expected:?} found in {}", .path.display())]
    #[diagnostic(code(bom_merge::workbook::missing_sheet))]
    MissingSheet { path: PathBuf, expected: Vec<String> },
}

/// A single spreadsheet cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    /// Trimmed cell text, `None` for blank cells
    ///
    /// Integral numbers render without a fractional part ("10", not "10.0").
    pub fn text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => Some(format!("{}", *n as i64)),
            Cell::Number(n) => Some(n.to_string()),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text().is_none()
    }
}

/// A named grid of cells
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Cell text at (row, column), `None` if blank or out of range
    pub fn text_at(&self, row: usize, column: usize) -> Option<String> {
        self.rows.get(row)?.get(column)?.text()
    }
}

/// All sheets of one input
#[derive(Debug, Clone)]
pub struct Workbook {
    pub path: PathBuf,
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Sheet by name, ignoring case and surrounding whitespace
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        let wanted = name.trim().to_lowercase();
        self.sheets
            .iter()
            .find(|s| s.name.trim().to_lowercase() == wanted)
    }

    /// File name used in provenance
    pub fn file_label(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}
