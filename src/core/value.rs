//! Electrical value normalization for resistors and capacitors
//!
//! Raw BOM value text comes in many spellings of the same value: `2k2`,
//! `2.2K`, `2200`, `2200R` and `2.2 kOhm` are all the same resistor, `1n5`,
//! `1.5nF` and `1500p` the same capacitor. [`ValueParser`] reduces all of
//! them to a [`CanonicalValue`] that compares, hashes and sorts exactly.
//!
//! Magnitudes are held as integers in sub-units (milliohms for resistors,
//! femtofarads for capacitors) so that equality never depends on floating
//! point rounding.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use crate::core::category::Category;
use crate::core::natural::natural_cmp;

static POSITIONAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)([a-z])(\d+)$").expect("static regex"));
static LEADING_R: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^r(\d+)$").expect("static regex"));
static DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d*)(?:\.(\d*))?([a-z])?$").expect("static regex"));

/// Milliohms per ohm
const MILLIOHMS: u64 = 1_000;
/// Femtofarads per picofarad
const FEMTO_PER_PICO: u64 = 1_000;

const RESISTOR_UNITS: &[(u64, char)] = &[
    (MILLIOHMS, 'R'),
    (MILLIOHMS * 1_000, 'k'),
    (MILLIOHMS * 1_000_000, 'M'),
];

const CAPACITOR_UNITS: &[(u64, char)] = &[
    (FEMTO_PER_PICO, 'p'),
    (FEMTO_PER_PICO * 1_000, 'n'),
    (FEMTO_PER_PICO * 1_000_000, 'u'),
];

/// Which number space a canonical value lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueFamily {
    ResistorOhms,
    CapacitorFarads,
    /// No numeric ordering, grouped by display text only
    Opaque,
}

impl fmt::Display for ValueFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueFamily::ResistorOhms => write!(f, "ohms"),
            ValueFamily::CapacitorFarads => write!(f, "farads"),
            ValueFamily::Opaque => write!(f, "opaque"),
        }
    }
}

/// Capacitor unit used when a bare number has to be given a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapUnit {
    #[serde(rename = "p")]
    Pico,
    #[serde(rename = "n")]
    Nano,
    #[serde(rename = "u")]
    Micro,
    #[serde(rename = "m")]
    Milli,
    #[serde(rename = "f")]
    Farad,
}

impl CapUnit {
    /// Femtofarads per one of this unit
    fn scale(&self) -> u64 {
        match self {
            CapUnit::Pico => FEMTO_PER_PICO,
            CapUnit::Nano => FEMTO_PER_PICO * 1_000,
            CapUnit::Micro => FEMTO_PER_PICO * 1_000_000,
            CapUnit::Milli => FEMTO_PER_PICO * 1_000_000_000,
            CapUnit::Farad => FEMTO_PER_PICO * 1_000_000_000_000,
        }
    }

    fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "p" => Some(CapUnit::Pico),
            "n" => Some(CapUnit::Nano),
            "u" => Some(CapUnit::Micro),
            "m" => Some(CapUnit::Milli),
            _ => None,
        }
    }
}

impl Default for CapUnit {
    fn default() -> Self {
        CapUnit::Micro
    }
}

/// How bare capacitor numbers (no unit letter) are interpreted
///
/// Numbers at or above `picofarad_threshold` are picofarads ("47" is 47pF),
/// smaller ones are read in `fallback_unit` ("0.1" is 0.1uF by default).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BareCapacitorRule {
    pub picofarad_threshold: f64,
    pub fallback_unit: CapUnit,
}

impl Default for BareCapacitorRule {
    fn default() -> Self {
        Self {
            picofarad_threshold: 1.0,
            fallback_unit: CapUnit::Micro,
        }
    }
}

/// A normalized component value
///
/// Numeric values carry an exact magnitude in sub-units and a display
/// string rendered in positional notation (`2k2`, `4R7`, `1n5`). Opaque
/// values carry only the trimmed raw text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CanonicalValue {
    family: ValueFamily,
    #[serde(skip_serializing_if = "Option::is_none")]
    quanta: Option<u64>,
    display: String,
}

impl CanonicalValue {
    /// A value grouped by its text alone
    pub fn opaque(raw: &str) -> Self {
        Self {
            family: ValueFamily::Opaque,
            quanta: None,
            display: raw.trim().to_string(),
        }
    }

    /// Resistor value from milliohms
    pub fn from_milliohms(milliohms: u64) -> Self {
        Self {
            family: ValueFamily::ResistorOhms,
            quanta: Some(milliohms),
            display: render(milliohms, RESISTOR_UNITS),
        }
    }

    /// Capacitor value from femtofarads
    pub fn from_femtofarads(femtofarads: u64) -> Self {
        Self {
            family: ValueFamily::CapacitorFarads,
            quanta: Some(femtofarads),
            display: render(femtofarads, CAPACITOR_UNITS),
        }
    }

    pub fn family(&self) -> ValueFamily {
        self.family
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn is_numeric(&self) -> bool {
        self.quanta.is_some()
    }

    /// Exact magnitude in sub-units (milliohms or femtofarads)
    pub fn quanta(&self) -> Option<u64> {
        self.quanta
    }

    /// Magnitude in the family's base unit (ohms or farads)
    pub fn base_magnitude(&self) -> Option<f64> {
        let per_base = match self.family {
            ValueFamily::ResistorOhms => MILLIOHMS as f64,
            ValueFamily::CapacitorFarads => CapUnit::Farad.scale() as f64,
            ValueFamily::Opaque => return None,
        };
        self.quanta.map(|q| q as f64 / per_base)
    }
}

impl fmt::Display for CanonicalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display)
    }
}

impl Ord for CanonicalValue {
    /// Numeric values ascending by magnitude, then opaque values in natural order
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.quanta, other.quanta) {
            (Some(a), Some(b)) => self.family.cmp(&other.family).then(a.cmp(&b)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => natural_cmp(&self.display, &other.display),
        }
    }
}

impl PartialOrd for CanonicalValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Parses raw value text into canonical values per component family
#[derive(Debug, Clone, Default)]
pub struct ValueParser {
    bare_capacitor: BareCapacitorRule,
}

impl ValueParser {
    pub fn new(bare_capacitor: BareCapacitorRule) -> Self {
        Self { bare_capacitor }
    }

    pub fn bare_capacitor_rule(&self) -> BareCapacitorRule {
        self.bare_capacitor
    }

    /// Canonicalize `raw` for a row of the given category
    ///
    /// Never fails: text that does not parse for a numeric family comes back
    /// as an opaque value so the row still merges with identical spellings.
    pub fn parse(&self, category: Category, raw: &str) -> CanonicalValue {
        let parsed = match category {
            Category::Resistor => self.parse_resistor(raw),
            Category::Capacitor => self.parse_capacitor(raw),
            _ => None,
        };
        parsed.unwrap_or_else(|| CanonicalValue::opaque(raw))
    }

    /// Parse as a resistance, `None` if the text is not one
    pub fn parse_resistor(&self, raw: &str) -> Option<CanonicalValue> {
        let mut text = normalize(raw);
        for suffix in ["ohms", "ohm", "ω"] {
            if let Some(stripped) = text.strip_suffix(suffix) {
                text = stripped.to_string();
                break;
            }
        }
        let text = text.replace('ω', "r");

        // "R47" is 0.47 ohms
        if let Some(caps) = LEADING_R.captures(&text) {
            return scaled("", &caps[1], MILLIOHMS).map(CanonicalValue::from_milliohms);
        }

        let (int_part, frac_part, letter) = split_number(&text)?;
        let scale = match letter.as_deref() {
            None | Some("r") => MILLIOHMS,
            Some("k") => MILLIOHMS * 1_000,
            Some("m") => MILLIOHMS * 1_000_000,
            Some(_) => return None,
        };
        scaled(&int_part, &frac_part, scale).map(CanonicalValue::from_milliohms)
    }

    /// Parse as a capacitance, `None` if the text is not one
    pub fn parse_capacitor(&self, raw: &str) -> Option<CanonicalValue> {
        let text = normalize(raw);
        // "1F" is farads, the "f" in "100nF" is dropped
        let (text, farads) = match text.strip_suffix('f') {
            Some(stem) => (stem, stem.ends_with(|c: char| c.is_ascii_digit())),
            None => (text.as_str(), false),
        };

        let (int_part, frac_part, letter) = split_number(text)?;
        let scale = match letter.as_deref() {
            Some(l) => CapUnit::from_letter(l)?.scale(),
            None if farads => CapUnit::Farad.scale(),
            None => {
                let magnitude: f64 = format!("0{}.{}0", int_part, frac_part).parse().ok()?;
                if magnitude >= self.bare_capacitor.picofarad_threshold {
                    CapUnit::Pico.scale()
                } else {
                    self.bare_capacitor.fallback_unit.scale()
                }
            }
        };
        scaled(&int_part, &frac_part, scale).map(CanonicalValue::from_femtofarads)
    }
}

/// Lowercase, strip whitespace and fold the micro sign to `u`
fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
        .replace(['µ', 'μ'], "u")
}

/// Split normalized text into integer digits, fraction digits and unit letter
fn split_number(text: &str) -> Option<(String, String, Option<String>)> {
    if let Some(caps) = POSITIONAL.captures(text) {
        return Some((
            caps[1].to_string(),
            caps[3].to_string(),
            Some(caps[2].to_string()),
        ));
    }

    let caps = DECIMAL.captures(text)?;
    let int_part = caps.get(1).map_or("", |m| m.as_str());
    let frac_part = caps.get(2).map_or("", |m| m.as_str());
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    Some((
        int_part.to_string(),
        frac_part.to_string(),
        caps.get(3).map(|m| m.as_str().to_string()),
    ))
}

/// Exact `int.frac * scale`, rounded to the nearest sub-unit
fn scaled(int_part: &str, frac_part: &str, scale: u64) -> Option<u64> {
    let digits = format!("{}{}", int_part, frac_part);
    let mantissa: u128 = digits.parse().ok()?;
    let divisor = 10u128.checked_pow(frac_part.len() as u32)?;
    let product = mantissa.checked_mul(scale as u128)?;
    u64::try_from((product + divisor / 2) / divisor).ok()
}

/// Render sub-units in positional notation with the largest fitting unit
fn render(quanta: u64, units: &[(u64, char)]) -> String {
    let (scale, letter) = units
        .iter()
        .rev()
        .find(|(scale, _)| quanta >= *scale)
        .copied()
        .unwrap_or(units[0]);

    let whole = quanta / scale;
    let rest = quanta % scale;
    let width = scale.ilog10() as usize;
    let fraction = format!("{:0width$}", rest, width = width);
    let fraction = fraction.trim_end_matches('0');

    format!("{}{}{}", whole, letter, fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> ValueParser {
        ValueParser::default()
    }

    fn ohms(raw: &str) -> CanonicalValue {
        parser().parse(Category::Resistor, raw)
    }

    fn farads(raw: &str) -> CanonicalValue {
        parser().parse(Category::Capacitor, raw)
    }

    #[test]
    fn test_resistor_spellings_are_equal() {
        let expected = CanonicalValue::from_milliohms(2_200_000);
        for raw in ["2k2", "2K2", "2.2k", "2.2K", "2200", "2200R", "2200r", "2.2 kOhm", "2k2Ω"] {
            assert_eq!(ohms(raw), expected, "spelling {raw}");
        }
    }

    #[test]
    fn test_resistor_positional_notation() {
        assert_eq!(ohms("4r7").base_magnitude(), Some(4.7));
        assert_eq!(ohms("4R7").display(), "4R7");
        assert_eq!(ohms("1m5").base_magnitude(), Some(1_500_000.0));
        assert_eq!(ohms("1M").display(), "1M");
        assert_eq!(ohms("470").display(), "470R");
        assert_eq!(ohms("100k").display(), "100k");
    }

    #[test]
    fn test_resistor_leading_r_notation() {
        assert_eq!(ohms("R47"), ohms("0.47"));
        assert_eq!(ohms("r1").base_magnitude(), Some(0.1));
        assert_eq!(ohms("R47").display(), "0R47");
        assert_eq!(ohms("R").family(), ValueFamily::Opaque);
    }

    #[test]
    fn test_resistor_m_is_mega() {
        assert_eq!(ohms("1m"), ohms("1000k"));
        assert_eq!(ohms("1m").base_magnitude(), Some(1_000_000.0));
    }

    #[test]
    fn test_capacitor_spellings_are_equal() {
        assert_eq!(farads("1n5"), farads("1500p"));
        assert_eq!(farads("1n5"), farads("1.5nF"));
        assert_eq!(farads("100n"), farads("0.1uF"));
        assert_eq!(farads("4.7µF"), farads("4u7"));
        assert_eq!(farads("47pf"), farads("47p"));
        assert_eq!(farads("1n5").display(), "1n5");
        assert_eq!(farads("0.1u").display(), "100n");
        assert_eq!(farads("1000uF").display(), "1000u");
    }

    #[test]
    fn test_capacitor_milli_unit() {
        assert_eq!(farads("1mF"), farads("1000u"));
    }

    #[test]
    fn test_farad_suffix_alone_means_farads() {
        assert_eq!(farads("1F"), CanonicalValue::from_femtofarads(CapUnit::Farad.scale()));
        assert_ne!(farads("1F"), farads("1p"));
        assert_eq!(farads("0.5F"), farads("500mF"));
        assert_eq!(farads("4u7F"), farads("4u7"));
        assert_eq!(farads("47 F").display(), "47000000u");
        assert_eq!(farads("F").family(), ValueFamily::Opaque);
    }

    #[test]
    fn test_bare_capacitor_threshold_is_one() {
        let rule = parser().bare_capacitor_rule();
        assert_eq!(rule.picofarad_threshold, 1.0);
        assert_eq!(farads("1"), farads("1p"));
        assert_eq!(farads("47"), farads("47p"));
        assert_eq!(farads("0.99"), farads("0.99u"));
        assert_eq!(farads("0.1"), farads("100n"));
    }

    #[test]
    fn test_bare_capacitor_rule_is_configurable() {
        let parser = ValueParser::new(BareCapacitorRule {
            picofarad_threshold: 100.0,
            fallback_unit: CapUnit::Nano,
        });
        assert_eq!(
            parser.parse(Category::Capacitor, "47"),
            parser.parse(Category::Capacitor, "47n")
        );
        assert_eq!(
            parser.parse(Category::Capacitor, "220"),
            parser.parse(Category::Capacitor, "220p")
        );
    }

    #[test]
    fn test_unparseable_falls_back_to_opaque() {
        let value = ohms(" 10k log ");
        assert_eq!(value.family(), ValueFamily::Opaque);
        assert_eq!(value.display(), "10k log");
        assert!(value.base_magnitude().is_none());

        assert_eq!(farads("2n2 X7R").family(), ValueFamily::Opaque);
        assert_eq!(ohms("").family(), ValueFamily::Opaque);
        assert_eq!(ohms("k").family(), ValueFamily::Opaque);
    }

    #[test]
    fn test_other_categories_are_opaque() {
        let value = parser().parse(Category::IC, " TL072 ");
        assert_eq!(value, CanonicalValue::opaque("TL072"));
        assert_eq!(parser().parse(Category::Diode, "1N4148").family(), ValueFamily::Opaque);
    }

    #[test]
    fn test_display_reparses_to_same_value() {
        for raw in ["2k2", "0.5", "4R7", "1M5", "1G", "10", "0"] {
            let first = ohms(raw);
            assert_eq!(ohms(first.display()), first, "resistor {raw}");
        }
        for raw in ["1n5", "0.1", "22p", "4u7", "1000u", "0.5p", "nonsense"] {
            let first = farads(raw);
            assert_eq!(farads(first.display()), first, "capacitor {raw}");
        }
    }

    #[test]
    fn test_ordering_numeric_before_opaque() {
        let mut values = vec![ohms("10k"), ohms("weird"), ohms("1k"), ohms("100R")];
        values.sort();
        let shown: Vec<&str> = values.iter().map(|v| v.display()).collect();
        assert_eq!(shown, vec!["100R", "1k", "10k", "weird"]);
    }

    #[test]
    fn test_render_sub_unit_values() {
        assert_eq!(CanonicalValue::from_milliohms(500).display(), "0R5");
        assert_eq!(CanonicalValue::from_femtofarads(500).display(), "0p5");
        assert_eq!(CanonicalValue::from_milliohms(0).display(), "0R");
    }
}
