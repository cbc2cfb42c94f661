//! bom-merge: consolidated bills of materials
//!
//! Reads per-project parts lists, normalizes resistor and capacitor values,
//! merges identical parts across projects and checks the result against a
//! stock inventory.

pub mod cli;
pub mod core;
pub mod logging;
pub mod workbook;
pub mod yaml;
