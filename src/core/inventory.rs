//! Inventory ledger and stock classification of merged parts
//!
//! The ledger holds one resistor list and three capacitor lists (ceramic,
//! film, electrolytic). Values are canonicalized on load, so `4k7` in the
//! ledger matches a `4.7K` part. Lookups scan in ledger order and the first
//! entry with an equal value wins, even if a later duplicate disagrees on
//! status; [`InventoryLedger::conflicts`] reports such duplicates.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::category::Category;
use crate::core::merge::MergedPart;
use crate::core::value::{CanonicalValue, ValueParser};

/// Sub-ledger an entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerFamily {
    Resistor,
    CeramicCap,
    FilmCap,
    ElectrolyticCap,
}

impl LedgerFamily {
    /// Capacitor sub-ledgers in lookup order
    pub const CAPACITORS: [LedgerFamily; 3] = [
        LedgerFamily::CeramicCap,
        LedgerFamily::FilmCap,
        LedgerFamily::ElectrolyticCap,
    ];

    pub fn all() -> &'static [LedgerFamily] {
        &[
            LedgerFamily::Resistor,
            LedgerFamily::CeramicCap,
            LedgerFamily::FilmCap,
            LedgerFamily::ElectrolyticCap,
        ]
    }

    /// Sub-ledgers to search for a category, in order
    pub fn for_category(category: Category) -> &'static [LedgerFamily] {
        match category {
            Category::Resistor => &[LedgerFamily::Resistor],
            Category::Capacitor => &Self::CAPACITORS,
            _ => &[],
        }
    }

    fn parse(&self, parser: &ValueParser, text: &str) -> Option<CanonicalValue> {
        match self {
            LedgerFamily::Resistor => parser.parse_resistor(text),
            _ => parser.parse_capacitor(text),
        }
    }
}

impl fmt::Display for LedgerFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerFamily::Resistor => write!(f, "resistor"),
            LedgerFamily::CeramicCap => write!(f, "ceramic"),
            LedgerFamily::FilmCap => write!(f, "film"),
            LedgerFamily::ElectrolyticCap => write!(f, "electrolytic"),
        }
    }
}

/// Stock level recorded in the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    Plenty,
    Few,
}

impl StockStatus {
    /// "few" means low stock; blank, numbers and any other text mean plenty
    pub fn from_text(text: &str) -> Self {
        if text.trim().eq_ignore_ascii_case("few") {
            StockStatus::Few
        } else {
            StockStatus::Plenty
        }
    }
}

/// One ledger line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryEntry {
    pub family: LedgerFamily,
    pub value: CanonicalValue,
    pub status: StockStatus,
}

/// The full inventory, in ledger order
#[derive(Debug, Clone, Default)]
pub struct InventoryLedger {
    entries: Vec<InventoryEntry>,
    skipped: usize,
}

impl InventoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a (value, status) pair; unparseable values are skipped
    ///
    /// Returns whether the entry was added.
    pub fn push(
        &mut self,
        parser: &ValueParser,
        family: LedgerFamily,
        value_text: &str,
        status_text: &str,
    ) -> bool {
        match family.parse(parser, value_text) {
            Some(value) => {
                self.entries.push(InventoryEntry {
                    family,
                    value,
                    status: StockStatus::from_text(status_text),
                });
                true
            }
            None => {
                if !value_text.trim().is_empty() {
                    tracing::warn!(%family, value = value_text, "skipping unparseable inventory value");
                    self.skipped += 1;
                }
                false
            }
        }
    }

    /// Build a ledger from per-family (value, status) pairs
    pub fn from_pairs<'a, I>(parser: &ValueParser, pairs: I) -> Self
    where
        I: IntoIterator<Item = (LedgerFamily, &'a str, &'a str)>,
    {
        let mut ledger = Self::new();
        for (family, value, status) in pairs {
            ledger.push(parser, family, value, status);
        }
        ledger
    }

    pub fn entries(&self, family: LedgerFamily) -> impl Iterator<Item = &InventoryEntry> {
        self.entries.iter().filter(move |e| e.family == family)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of non-blank values that could not be parsed
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// First entry of `family` whose value equals `value`
    pub fn lookup(&self, family: LedgerFamily, value: &CanonicalValue) -> Option<&InventoryEntry> {
        self.entries(family).find(|e| &e.value == value)
    }

    /// Duplicate values within a sub-ledger whose statuses disagree
    ///
    /// Lookups resolve these to the first entry; callers may want to warn.
    pub fn conflicts(&self) -> Vec<(&InventoryEntry, &InventoryEntry)> {
        let mut found = Vec::new();
        for (i, first) in self.entries.iter().enumerate() {
            let earlier_dup = self.entries[..i]
                .iter()
                .any(|e| e.family == first.family && e.value == first.value);
            if earlier_dup {
                continue;
            }
            if let Some(later) = self.entries[i + 1..]
                .iter()
                .find(|e| e.family == first.family && e.value == first.value && e.status != first.status)
            {
                found.push((first, later));
            }
        }
        found
    }
}

/// Stock-driven highlight of a merged part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightClass {
    #[default]
    None,
    Low,
    Missing,
}

impl HighlightClass {
    /// Short label for output sheets, empty for `None`
    pub fn label(&self) -> &'static str {
        match self {
            HighlightClass::None => "",
            HighlightClass::Low => "low",
            HighlightClass::Missing => "missing",
        }
    }
}

impl fmt::Display for HighlightClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Result of looking one part up, before collapsing to a highlight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Category is never stocked (diodes, ICs, ...)
    NotApplicable,
    /// Value did not parse, so there is nothing to compare numerically
    Ineligible,
    /// No ledger was supplied
    NoLedger,
    Found {
        family: LedgerFamily,
        status: StockStatus,
    },
    NotFound,
}

impl MatchOutcome {
    pub fn highlight(&self) -> HighlightClass {
        match self {
            MatchOutcome::Found {
                status: StockStatus::Few,
                ..
            } => HighlightClass::Low,
            MatchOutcome::NotFound => HighlightClass::Missing,
            _ => HighlightClass::None,
        }
    }
}

/// A merged part with its stock highlight
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotatedPart {
    #[serde(flatten)]
    pub part: MergedPart,
    pub highlight: HighlightClass,
}

/// Combined BOM ready for presentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotatedBom {
    pub parts: Vec<AnnotatedPart>,
    /// False when no ledger was supplied, so every highlight is `None`
    pub inventory_available: bool,
}

impl AnnotatedBom {
    pub fn count(&self, highlight: HighlightClass) -> usize {
        self.parts.iter().filter(|p| p.highlight == highlight).count()
    }

    pub fn total_quantity(&self) -> u64 {
        self.parts
            .iter()
            .fold(0u64, |total, p| total.saturating_add(p.part.quantity))
    }
}

/// Matches merged parts against an optional ledger
#[derive(Debug, Clone, Copy)]
pub struct InventoryMatcher<'a> {
    ledger: Option<&'a InventoryLedger>,
}

impl<'a> InventoryMatcher<'a> {
    pub fn new(ledger: Option<&'a InventoryLedger>) -> Self {
        Self { ledger }
    }

    pub fn is_available(&self) -> bool {
        self.ledger.is_some()
    }

    pub fn lookup(&self, part: &MergedPart) -> MatchOutcome {
        if !part.category.is_stocked() {
            return MatchOutcome::NotApplicable;
        }
        let Some(ledger) = self.ledger else {
            return MatchOutcome::NoLedger;
        };
        if !part.value.is_numeric() {
            return MatchOutcome::Ineligible;
        }

        let outcome = LedgerFamily::for_category(part.category)
            .iter()
            .find_map(|family| {
                ledger.lookup(*family, &part.value).map(|entry| MatchOutcome::Found {
                    family: entry.family,
                    status: entry.status,
                })
            })
            .unwrap_or(MatchOutcome::NotFound);

        tracing::debug!(
            category = %part.category,
            value = %part.value,
            ?outcome,
            "inventory lookup"
        );
        outcome
    }

    pub fn classify(&self, part: &MergedPart) -> HighlightClass {
        self.lookup(part).highlight()
    }

    pub fn annotate(&self, parts: Vec<MergedPart>) -> AnnotatedBom {
        let parts = parts
            .into_iter()
            .map(|part| {
                let highlight = self.classify(&part);
                AnnotatedPart { part, highlight }
            })
            .collect();
        AnnotatedBom {
            parts,
            inventory_available: self.is_available(),
        }
    }
}
