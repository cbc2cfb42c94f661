//! Aggregation of prepared rows into merged parts
//!
//! Rows are keyed by (category, canonical value, description signature).
//! Everything a merged part exposes is derived from the multiset of rows
//! that fed it, never from arrival order: quantities are sums, provenance is
//! a set, and the representative description is the smallest contributing
//! spelling. The final order comes from [`compare_parts`].

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use crate::core::category::Category;
use crate::core::natural::natural_cmp;
use crate::core::row::{RawRow, SourceRef};
use crate::core::value::CanonicalValue;

/// Lowercased description with whitespace runs collapsed
pub fn description_signature(description: &str) -> String {
    description
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// A row that passed filtering and has been categorized and parsed
#[derive(Debug, Clone)]
pub struct PreparedRow {
    pub category: Category,
    pub value: CanonicalValue,
    pub row: RawRow,
}

impl PreparedRow {
    pub(crate) fn new(category: Category, value: CanonicalValue, row: RawRow) -> Self {
        Self {
            category,
            value,
            row,
        }
    }

    fn signature(&self) -> String {
        description_signature(self.row.description())
    }
}

/// Identity of a merged part
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MergeKey {
    pub category: Category,
    pub value: CanonicalValue,
    pub signature: String,
}

/// One consolidated line of the combined BOM
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergedPart {
    pub category: Category,
    pub value: CanonicalValue,
    pub description: String,
    pub sources: BTreeSet<SourceRef>,
    pub quantity: u64,
    #[serde(skip)]
    signature: String,
}

impl MergedPart {
    pub fn key(&self) -> MergeKey {
        MergeKey {
            category: self.category,
            value: self.value.clone(),
            signature: self.signature.clone(),
        }
    }

    /// Provenance as "file/sheet" strings
    pub fn source_labels(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.to_string()).collect()
    }
}

/// Total order of the combined BOM
///
/// Category display order, then value (numeric ascending, opaque natural),
/// then description ignoring case. The description signature breaks any
/// remaining tie, so distinct keys never compare equal.
pub fn compare_parts(a: &MergedPart, b: &MergedPart) -> Ordering {
    a.category
        .cmp(&b.category)
        .then_with(|| a.value.cmp(&b.value))
        .then_with(|| compare_descriptions(&a.description, &b.description))
        .then_with(|| a.signature.cmp(&b.signature))
}

fn compare_descriptions(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Single-owner aggregation of prepared rows
#[derive(Debug, Default)]
pub struct MergeEngine {
    parts: HashMap<MergeKey, MergedPart>,
    rows_merged: usize,
}

impl MergeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one row into its merged part, creating the part on first sight
    pub fn add(&mut self, prepared: PreparedRow) {
        if prepared.row.quantity <= 0 {
            tracing::debug!(source = %prepared.row.source, "ignoring row with non-positive quantity");
            return;
        }

        let signature = prepared.signature();
        let key = MergeKey {
            category: prepared.category,
            value: prepared.value.clone(),
            signature: signature.clone(),
        };
        let description = prepared.row.description().to_string();
        let quantity = prepared.row.quantity as u64;

        let part = self.parts.entry(key).or_insert_with(|| MergedPart {
            category: prepared.category,
            value: prepared.value.clone(),
            description: description.clone(),
            sources: BTreeSet::new(),
            quantity: 0,
            signature,
        });
        part.quantity = part.quantity.saturating_add(quantity);
        part.sources.insert(prepared.row.source);
        if description < part.description {
            part.description = description;
        }
        self.rows_merged += 1;
    }

    pub fn rows_merged(&self) -> usize {
        self.rows_merged
    }

    /// Finalize into the sorted combined list
    pub fn finish(self) -> Vec<MergedPart> {
        let mut parts: Vec<MergedPart> = self.parts.into_values().collect();
        parts.sort_by(compare_parts);
        parts
    }
}

/// One grouped line of a single project's BOM
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectPart {
    pub category: Category,
    pub value: CanonicalValue,
    /// Natural-sorted, de-duplicated designators
    pub designators: Vec<String>,
    pub description: String,
    pub notes: String,
    pub quantity: u64,
}

impl ProjectPart {
    pub fn designator_list(&self) -> String {
        self.designators.join(", ")
    }
}

/// Group one source's rows by (category, value, description, notes)
///
/// This is the per-project view: no rows from other sources take part.
pub fn group_project(rows: impl IntoIterator<Item = PreparedRow>) -> Vec<ProjectPart> {
    let mut groups: HashMap<(MergeKey, String), ProjectPart> = HashMap::new();

    for prepared in rows {
        if prepared.row.quantity <= 0 {
            continue;
        }
        let notes = prepared.row.notes().to_string();
        let key = MergeKey {
            category: prepared.category,
            value: prepared.value.clone(),
            signature: prepared.signature(),
        };
        let description = prepared.row.description().to_string();

        let group = groups
            .entry((key, notes.clone()))
            .or_insert_with(|| ProjectPart {
                category: prepared.category,
                value: prepared.value.clone(),
                designators: Vec::new(),
                description: description.clone(),
                notes,
                quantity: 0,
            });
        group.quantity = group.quantity.saturating_add(prepared.row.quantity as u64);
        group
            .designators
            .extend(prepared.row.designators().into_iter().map(str::to_string));
        if description < group.description {
            group.description = description;
        }
    }

    let mut parts: Vec<ProjectPart> = groups
        .into_values()
        .map(|mut part| {
            part.designators.sort_by(|a, b| natural_cmp(a, b));
            part.designators.dedup();
            part
        })
        .collect();

    parts.sort_by(|a, b| {
        a.category
            .cmp(&b.category)
            .then_with(|| a.value.cmp(&b.value))
            .then_with(|| compare_descriptions(&a.description, &b.description))
            .then_with(|| a.description.cmp(&b.description))
            .then_with(|| natural_cmp(&a.notes, &b.notes))
    });
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::ValueParser;

    fn prepared(category: Category, value: &str, description: &str, qty: i64, file: &str) -> PreparedRow {
        let parser = ValueParser::default();
        let row = RawRow::new(SourceRef::new(file, "BOM"))
            .with_value(value)
            .with_description(description)
            .with_quantity(qty);
        PreparedRow::new(category, parser.parse(category, value), row)
    }

    #[test]
    fn test_signature_normalizes_case_and_spacing() {
        assert_eq!(description_signature("  Metal  Film\tResistor "), "metal film resistor");
    }

    #[test]
    fn test_same_part_across_sources_is_summed() {
        let mut engine = MergeEngine::new();
        engine.add(prepared(Category::Resistor, "4.7k", "Resistor", 2, "a.xlsx"));
        engine.add(prepared(Category::Resistor, "4k7", "Resistor", 2, "b.xlsx"));
        let parts = engine.finish();

        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].quantity, 4);
        assert_eq!(parts[0].value.base_magnitude(), Some(4700.0));
        assert_eq!(parts[0].sources.len(), 2);
    }

    #[test]
    fn test_different_descriptions_stay_apart() {
        let mut engine = MergeEngine::new();
        engine.add(prepared(Category::Capacitor, "100n", "Film capacitor", 1, "a.xlsx"));
        engine.add(prepared(Category::Capacitor, "100n", "MLCC capacitor", 1, "a.xlsx"));
        engine.add(prepared(Category::Capacitor, "0.1u", "film  CAPACITOR", 3, "b.xlsx"));
        let parts = engine.finish();

        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].description, "Film capacitor");
        assert_eq!(parts[0].quantity, 4);
        assert_eq!(parts[1].quantity, 1);
    }

    #[test]
    fn test_final_order() {
        let mut engine = MergeEngine::new();
        engine.add(prepared(Category::IC, "TL074", "Quad op-amp", 1, "a"));
        engine.add(prepared(Category::Resistor, "10k", "Resistor", 1, "a"));
        engine.add(prepared(Category::IC, "TL072", "Dual op-amp", 1, "a"));
        engine.add(prepared(Category::Resistor, "1k", "Resistor", 1, "a"));
        engine.add(prepared(Category::Capacitor, "22p", "Capacitor", 1, "a"));
        engine.add(prepared(Category::Other, "R10", "Thing", 1, "a"));
        engine.add(prepared(Category::Other, "R2", "Thing", 1, "a"));

        let shown: Vec<String> = engine
            .finish()
            .iter()
            .map(|p| format!("{} {}", p.category, p.value))
            .collect();
        assert_eq!(
            shown,
            vec![
                "Resistor 1k",
                "Resistor 10k",
                "Capacitor 22p",
                "IC TL072",
                "IC TL074",
                "Other R2",
                "Other R10",
            ]
        );
    }

    #[test]
    fn test_arrival_order_does_not_matter() {
        let rows = vec![
            prepared(Category::Resistor, "10k", "resistor", 1, "a"),
            prepared(Category::Resistor, "10K", "Resistor", 2, "b"),
            prepared(Category::Diode, "1N4148", "Diode", 5, "c"),
        ];

        let mut forward = MergeEngine::new();
        rows.iter().cloned().for_each(|r| forward.add(r));
        let mut backward = MergeEngine::new();
        rows.iter().rev().cloned().for_each(|r| backward.add(r));

        assert_eq!(forward.finish(), backward.finish());
    }

    #[test]
    fn test_non_positive_rows_are_ignored() {
        let mut engine = MergeEngine::new();
        engine.add(prepared(Category::Resistor, "10k", "Resistor", 0, "a"));
        assert_eq!(engine.rows_merged(), 0);
        assert!(engine.finish().is_empty());
    }

    #[test]
    fn test_huge_quantities_saturate() {
        let mut engine = MergeEngine::new();
        for file in ["a", "b", "c"] {
            engine.add(prepared(Category::Resistor, "10k", "Resistor", i64::MAX, file));
        }
        let parts = engine.finish();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].quantity, u64::MAX);

        let grouped = group_project(vec![
            prepared(Category::Resistor, "10k", "Resistor", i64::MAX, "a"),
            prepared(Category::Resistor, "10k", "Resistor", i64::MAX, "a"),
            prepared(Category::Resistor, "10k", "Resistor", i64::MAX, "a"),
        ]);
        assert_eq!(grouped[0].quantity, u64::MAX);
    }

    #[test]
    fn test_project_grouping_joins_designators() {
        let parser = ValueParser::default();
        let make = |part: &str, value: &str, notes: &str| {
            let row = RawRow::new(SourceRef::new("fuzz.xlsx", "BOM"))
                .with_part(part)
                .with_value(value)
                .with_description("Resistor")
                .with_notes(notes)
                .with_quantity(part.split(',').count() as i64);
            PreparedRow::new(Category::Resistor, parser.parse(Category::Resistor, value), row)
        };

        let parts = group_project(vec![
            make("R10, R2", "10k", ""),
            make("R1", "10K", ""),
            make("R5", "10k", "metal film"),
        ]);

        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].designator_list(), "R1, R2, R10");
        assert_eq!(parts[0].quantity, 3);
        assert_eq!(parts[1].notes, "metal film");
    }
}
