//! Component categories and their fixed display order

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Component family a BOM row belongs to
///
/// The declaration order is the display order of the combined BOM, so the
/// derived `Ord` is what the merge sort uses as its primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Resistor,
    Capacitor,
    /// Diodes, LEDs included
    Diode,
    Transistor,
    #[serde(rename = "ic")]
    IC,
    Potentiometer,
    Switch,
    Connector,
    Other,
}

impl Category {
    /// Display name used in output sheets
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Resistor => "Resistor",
            Category::Capacitor => "Capacitor",
            Category::Diode => "Diode",
            Category::Transistor => "Transistor",
            Category::IC => "IC",
            Category::Potentiometer => "Potentiometer",
            Category::Switch => "Switch",
            Category::Connector => "Connector",
            Category::Other => "Other",
        }
    }

    /// All categories in display order
    pub fn all() -> &'static [Category] {
        &[
            Category::Resistor,
            Category::Capacitor,
            Category::Diode,
            Category::Transistor,
            Category::IC,
            Category::Potentiometer,
            Category::Switch,
            Category::Connector,
            Category::Other,
        ]
    }

    /// Position in the display order (0 = resistors)
    pub fn rank(&self) -> usize {
        *self as usize
    }

    /// Whether parts of this category can be checked against the inventory
    pub fn is_stocked(&self) -> bool {
        matches!(self, Category::Resistor | Category::Capacitor)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "resistor" | "resistors" | "r" => Ok(Category::Resistor),
            "capacitor" | "capacitors" | "c" => Ok(Category::Capacitor),
            "diode" | "diodes" | "led" => Ok(Category::Diode),
            "transistor" | "transistors" | "q" => Ok(Category::Transistor),
            "ic" | "ics" => Ok(Category::IC),
            "potentiometer" | "potentiometers" | "pot" => Ok(Category::Potentiometer),
            "switch" | "switches" => Ok(Category::Switch),
            "connector" | "connectors" => Ok(Category::Connector),
            "other" => Ok(Category::Other),
            _ => Err(format!(
                "Invalid category: {}. Use resistor, capacitor, diode, transistor, ic, potentiometer, switch, connector, or other",
                s
            )),
        }
    }
}
