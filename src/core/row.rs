//! Raw BOM rows as handed over by the spreadsheet layer

use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Where a row came from: input file and sheet within it
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SourceRef {
    pub file: String,
    pub sheet: String,
}

impl SourceRef {
    pub fn new(file: impl Into<String>, sheet: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            sheet: sheet.into(),
        }
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Single-sheet inputs name their only sheet after the file
        let stem = Path::new(&self.file).file_stem().and_then(|s| s.to_str());
        if self.sheet.is_empty() || self.sheet == self.file || stem == Some(self.sheet.as_str()) {
            write!(f, "{}", self.file)
        } else {
            write!(f, "{}/{}", self.file, self.sheet)
        }
    }
}

/// One line of a source sheet
///
/// Text fields are `None` when the cell was missing or blank. The quantity
/// is signed so that malformed counts survive until the row filter sees them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// Designator(s) or part identifier, e.g. "R1, R2"
    pub part: Option<String>,
    pub value: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub quantity: i64,
    pub source: SourceRef,
}

impl RawRow {
    /// Empty row with quantity 1
    pub fn new(source: SourceRef) -> Self {
        Self {
            part: None,
            value: None,
            description: None,
            notes: None,
            quantity: 1,
            source,
        }
    }

    pub fn with_part(mut self, part: impl Into<String>) -> Self {
        self.part = non_blank(part.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = non_blank(value.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = non_blank(description.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = non_blank(notes.into());
        self
    }

    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn part(&self) -> &str {
        self.part.as_deref().unwrap_or("")
    }

    pub fn value(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    pub fn notes(&self) -> &str {
        self.notes.as_deref().unwrap_or("")
    }

    /// Individual designators listed in the part field
    pub fn designators(&self) -> Vec<&str> {
        split_designators(self.part())
    }
}

/// Split a designator list such as "R1, R2 R3;R4"
pub fn split_designators(part: &str) -> Vec<&str> {
    part.split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn non_blank(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
