//! Loading the inventory ledger from a stock workbook
//!
//! The resistor sheet has no header: value in column A, status in column B.
//! The capacitor sheet starts with a header row and holds three side-by-side
//! lists: ceramic (A/B), film (D/E) and electrolytic (F/G).

use std::path::Path;

use super::{Sheet, Workbook, WorkbookError};
use crate::core::config::SheetConfig;
use crate::core::inventory::{InventoryLedger, LedgerFamily};
use crate::core::value::ValueParser;

const RESISTOR_COLUMNS: (usize, usize) = (0, 1);

const CAPACITOR_COLUMNS: [(LedgerFamily, usize, usize); 3] = [
    (LedgerFamily::CeramicCap, 0, 1),
    (LedgerFamily::FilmCap, 3, 4),
    (LedgerFamily::ElectrolyticCap, 5, 6),
];

/// Read the ledger; at least one of the two inventory sheets must exist
pub fn load_ledger(
    path: &Path,
    sheets: &SheetConfig,
    parser: &ValueParser,
) -> Result<InventoryLedger, WorkbookError> {
    let workbook = Workbook::open(path)?;
    let resistors = workbook.sheet(&sheets.resistor_inventory);
    let capacitors = workbook.sheet(&sheets.capacitor_inventory);

    if resistors.is_none() && capacitors.is_none() {
        return Err(WorkbookError::MissingSheet {
            path: path.to_path_buf(),
            expected: vec![
                sheets.resistor_inventory.clone(),
                sheets.capacitor_inventory.clone(),
            ],
        });
    }

    let mut ledger = InventoryLedger::new();
    match resistors {
        Some(sheet) => read_resistors(sheet, parser, &mut ledger),
        None => tracing::warn!(sheet = %sheets.resistor_inventory, "inventory sheet not found"),
    }
    match capacitors {
        Some(sheet) => read_capacitors(sheet, parser, &mut ledger),
        None => tracing::warn!(sheet = %sheets.capacitor_inventory, "inventory sheet not found"),
    }

    for (first, later) in ledger.conflicts() {
        tracing::warn!(
            family = %first.family,
            value = %first.value,
            using = ?first.status,
            ignored = ?later.status,
            "duplicate inventory entry with different status"
        );
    }
    tracing::info!(
        entries = ledger.len(),
        skipped = ledger.skipped(),
        "loaded inventory"
    );
    Ok(ledger)
}

fn read_resistors(sheet: &Sheet, parser: &ValueParser, ledger: &mut InventoryLedger) {
    let (value_col, status_col) = RESISTOR_COLUMNS;
    for row in 0..sheet.rows.len() {
        push_cell_pair(sheet, row, value_col, status_col, LedgerFamily::Resistor, parser, ledger);
    }
}

fn read_capacitors(sheet: &Sheet, parser: &ValueParser, ledger: &mut InventoryLedger) {
    // Column-major so each family keeps its own top-to-bottom order
    for (family, value_col, status_col) in CAPACITOR_COLUMNS {
        for row in 1..sheet.rows.len() {
            push_cell_pair(sheet, row, value_col, status_col, family, parser, ledger);
        }
    }
}

fn push_cell_pair(
    sheet: &Sheet,
    row: usize,
    value_col: usize,
    status_col: usize,
    family: LedgerFamily,
    parser: &ValueParser,
    ledger: &mut InventoryLedger,
) {
    let Some(value) = sheet.text_at(row, value_col) else {
        return;
    };
    let status = sheet.text_at(row, status_col).unwrap_or_default();
    ledger.push(parser, family, &value, &status);
}
