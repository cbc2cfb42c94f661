//! Row exclusion: accessories, incomplete rows, bad quantities

use crate::core::row::RawRow;

/// Why a row was dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exclusion {
    /// Part or description contains an excluded keyword
    Accessory(String),
    /// No part, value or description to identify the component by
    Unidentified,
    /// Zero or negative quantity
    BadQuantity(i64),
}

impl std::fmt::Display for Exclusion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Exclusion::Accessory(keyword) => write!(f, "accessory item ({})", keyword),
            Exclusion::Unidentified => write!(f, "no part, value or description"),
            Exclusion::BadQuantity(qty) => write!(f, "invalid quantity {}", qty),
        }
    }
}

/// Pure keyword/completeness filter over raw rows
#[derive(Debug, Clone)]
pub struct RowFilter {
    /// Lowercased keywords
    keywords: Vec<String>,
}

impl RowFilter {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    pub fn is_included(&self, row: &RawRow) -> bool {
        self.exclusion(row).is_none()
    }

    /// The reason a row is excluded, `None` if it is kept
    pub fn exclusion(&self, row: &RawRow) -> Option<Exclusion> {
        if row.quantity <= 0 {
            return Some(Exclusion::BadQuantity(row.quantity));
        }
        if row.part.is_none() && row.value.is_none() && row.description.is_none() {
            return Some(Exclusion::Unidentified);
        }

        let part = row.part().to_lowercase();
        let description = row.description().to_lowercase();
        self.keywords
            .iter()
            .find(|k| part.contains(k.as_str()) || description.contains(k.as_str()))
            .map(|k| Exclusion::Accessory(k.clone()))
    }
}
