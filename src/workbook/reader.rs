//! Opening spreadsheets, CSV files and CSV directories as workbooks

use calamine::{open_workbook_auto, DataType, Range, Reader};
use std::path::Path;
use walkdir::WalkDir;

use super::{Cell, Sheet, Workbook, WorkbookError};

const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

impl Workbook {
    /// Open any supported input as a workbook
    pub fn open(path: &Path) -> Result<Self, WorkbookError> {
        if path.is_dir() {
            return read_csv_dir(path);
        }
        if !path.exists() {
            return Err(WorkbookError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            });
        }

        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if extension == "csv" {
            let sheet = read_csv_sheet(path)?;
            Ok(Workbook {
                path: path.to_path_buf(),
                sheets: vec![sheet],
            })
        } else if SPREADSHEET_EXTENSIONS.contains(&extension.as_str()) {
            read_spreadsheet(path)
        } else {
            Err(WorkbookError::Unsupported {
                path: path.to_path_buf(),
            })
        }
    }
}

fn read_spreadsheet(path: &Path) -> Result<Workbook, WorkbookError> {
    let spreadsheet_error = |message: String| WorkbookError::Spreadsheet {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| spreadsheet_error(e.to_string()))?;
    let names: Vec<String> = workbook.sheet_names().to_vec();

    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        match workbook.worksheet_range(&name) {
            Some(Ok(range)) => sheets.push(Sheet::new(name, range_cells(&range))),
            Some(Err(e)) => return Err(spreadsheet_error(format!("sheet '{}': {}", name, e))),
            None => tracing::debug!(sheet = %name, "sheet has no cell data"),
        }
    }

    Ok(Workbook {
        path: path.to_path_buf(),
        sheets,
    })
}

/// Cells of a range, re-anchored at A1 so column indexes are absolute
fn range_cells(range: &Range<DataType>) -> Vec<Vec<Cell>> {
    let (first_row, first_col) = range.start().unwrap_or((0, 0));

    let mut rows: Vec<Vec<Cell>> = (0..first_row).map(|_| Vec::new()).collect();
    for row in range.rows() {
        let mut cells: Vec<Cell> = (0..first_col).map(|_| Cell::Empty).collect();
        cells.extend(row.iter().map(cell_from));
        rows.push(cells);
    }
    rows
}

fn cell_from(data: &DataType) -> Cell {
    match data {
        DataType::Empty => Cell::Empty,
        DataType::Int(i) => Cell::Number(*i as f64),
        DataType::Float(f) => Cell::Number(*f),
        DataType::String(s) => Cell::Text(s.clone()),
        other => Cell::Text(other.to_string()),
    }
}

fn read_csv_sheet(path: &Path) -> Result<Sheet, WorkbookError> {
    let csv_error = |source: csv::Error| WorkbookError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        rows.push(
            record
                .iter()
                .map(|field| {
                    if field.trim().is_empty() {
                        Cell::Empty
                    } else {
                        Cell::Text(field.to_string())
                    }
                })
                .collect(),
        );
    }

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    Ok(Sheet::new(name, rows))
}

fn read_csv_dir(dir: &Path) -> Result<Workbook, WorkbookError> {
    let mut sheets = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| WorkbookError::Io {
            path: dir.to_path_buf(),
            source: e.into(),
        })?;
        let is_csv = entry
            .path()
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        if entry.file_type().is_file() && is_csv {
            sheets.push(read_csv_sheet(entry.path())?);
        }
    }

    Ok(Workbook {
        path: dir.to_path_buf(),
        sheets,
    })
}
