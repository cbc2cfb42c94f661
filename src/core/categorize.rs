//! Assigns a component category to each raw row

use regex::{Regex, RegexBuilder};
use thiserror::Error;

use crate::core::category::Category;
use crate::core::patterns::{CategoryRule, RuleField};
use crate::core::row::RawRow;
use crate::core::value::ValueParser;

/// A configured pattern that is not a valid regular expression
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("invalid {category} pattern '{pattern}': {source}")]
    InvalidRule {
        category: Category,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

#[derive(Debug)]
struct CompiledRule {
    rule: CategoryRule,
    regex: Regex,
}

/// How a row's category was decided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision<'a> {
    /// A pattern rule matched
    Rule(&'a CategoryRule),
    /// No rule matched but the value parsed as a resistor or capacitor
    ParsedValue,
    /// Nothing matched
    Fallback,
}

/// Rule-table categorizer
///
/// Rules are tried in order and the first match wins. Rows no rule claims
/// fall back to value parsing (resistor grammar first, then capacitor) and
/// finally to [`Category::Other`], so every row gets exactly one category.
#[derive(Debug)]
pub struct Categorizer {
    rules: Vec<CompiledRule>,
    values: ValueParser,
}

impl Categorizer {
    pub fn new(rules: &[CategoryRule], values: ValueParser) -> Result<Self, PatternError> {
        let rules = rules
            .iter()
            .map(|rule| {
                RegexBuilder::new(&rule.pattern)
                    .case_insensitive(true)
                    .build()
                    .map(|regex| CompiledRule {
                        rule: rule.clone(),
                        regex,
                    })
                    .map_err(|source| PatternError::InvalidRule {
                        category: rule.category,
                        pattern: rule.pattern.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rules, values })
    }

    pub fn classify(&self, row: &RawRow) -> Category {
        self.explain(row).0
    }

    /// Category plus the reason it was chosen
    pub fn explain(&self, row: &RawRow) -> (Category, Decision<'_>) {
        let combined = format!("{} {} {}", row.part(), row.value(), row.description());

        for compiled in &self.rules {
            let haystack = match compiled.rule.field {
                RuleField::Part => row.part(),
                RuleField::Value => row.value(),
                RuleField::Description => row.description(),
                RuleField::Any => combined.as_str(),
            };
            if !haystack.is_empty() && compiled.regex.is_match(haystack) {
                return (compiled.rule.category, Decision::Rule(&compiled.rule));
            }
        }

        if let Some(value) = row.value.as_deref() {
            if self.values.parse_resistor(value).is_some() {
                return (Category::Resistor, Decision::ParsedValue);
            }
            if self.values.parse_capacitor(value).is_some() {
                return (Category::Capacitor, Decision::ParsedValue);
            }
        }

        (Category::Other, Decision::Fallback)
    }
}
