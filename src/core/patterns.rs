//! Pattern tables driving categorization and row exclusion
//!
//! These are plain data: the built-in tables below are the defaults, and a
//! configuration file may replace them wholesale.

use serde::{Deserialize, Serialize};

use crate::core::category::Category;

/// Which row field a rule's pattern is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleField {
    Part,
    Value,
    Description,
    /// Part, value and description joined by spaces
    Any,
}

/// One categorization rule: a case-insensitive regex on one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: Category,
    pub field: RuleField,
    pub pattern: String,
}

impl CategoryRule {
    pub fn new(category: Category, field: RuleField, pattern: impl Into<String>) -> Self {
        Self {
            category,
            field,
            pattern: pattern.into(),
        }
    }
}

/// Rules in evaluation order, first match wins
const DEFAULT_RULES: &[(Category, RuleField, &str)] = &[
    // LEDs are diodes whatever else the description says
    (Category::Diode, RuleField::Description, r"\bled\b"),
    (Category::Diode, RuleField::Part, r"^LED\d*"),
    (Category::IC, RuleField::Part, r"^IC\d+"),
    // JFETs are listed by part number in the value column (J201, J113)
    (Category::Transistor, RuleField::Value, r"^J\d+$"),
    (Category::Transistor, RuleField::Value, r"^(2N|2SK|2SA|2SC|BC|BS|MPSA|MPSF)\d+"),
    (Category::Resistor, RuleField::Description, r"resistor"),
    (Category::Capacitor, RuleField::Description, r"capacitor"),
    (Category::Diode, RuleField::Description, r"diode"),
    (Category::Transistor, RuleField::Description, r"transistor|\bjfet\b|\bmosfet\b"),
    (Category::IC, RuleField::Description, r"\bic\b|op-?amp|operational amplifier"),
    (Category::Potentiometer, RuleField::Description, r"\bpot\b|potentiometer|trimmer"),
    (Category::Switch, RuleField::Description, r"\bswitch\b"),
    (Category::Connector, RuleField::Description, r"jack|connector|header"),
    (Category::Diode, RuleField::Value, r"^(1N|BAT)\d+"),
    (Category::IC, RuleField::Value, r"^(TL|NE|LM|JRC|OPA|CD4|RC4)\d+|^PT2399"),
    (Category::Resistor, RuleField::Part, r"^R\d+"),
    (Category::Capacitor, RuleField::Part, r"^C\d+"),
    (Category::Diode, RuleField::Part, r"^D\d+"),
    (Category::Transistor, RuleField::Part, r"^Q\d+"),
    (Category::IC, RuleField::Part, r"^U\d+"),
    (Category::Potentiometer, RuleField::Part, r"^(VR|RV|POT)\d*"),
    (Category::Switch, RuleField::Part, r"^SW?\d+"),
    (Category::Connector, RuleField::Part, r"^J\d+"),
];

/// Accessory items that are not BOM parts
const DEFAULT_EXCLUDES: &[&str] = &["ic socket", "enclosure", "dust cover"];

/// Built-in categorization table
pub fn default_category_rules() -> Vec<CategoryRule> {
    DEFAULT_RULES
        .iter()
        .map(|(category, field, pattern)| CategoryRule::new(*category, *field, *pattern))
        .collect()
}

/// Built-in exclusion keywords
pub fn default_exclude_keywords() -> Vec<String> {
    DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect()
}
