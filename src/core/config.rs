//! Configuration management with layered hierarchy
//!
//! Built-in defaults, then the global user file, then an explicit
//! `--config` file, then environment variables. Each layer only overrides
//! the keys it sets.

use miette::Diagnostic;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::patterns::{default_category_rules, default_exclude_keywords, CategoryRule};
use crate::core::value::{BareCapacitorRule, CapUnit, ValueParser};
use crate::yaml::YamlSyntaxError;

/// Environment override for the bare capacitor threshold
pub const CAP_THRESHOLD_ENV: &str = "BOM_MERGE_CAP_THRESHOLD";

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config file {}", .path.display())]
    #[diagnostic(code(bom_merge::config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] YamlSyntaxError),
}

/// Sheet names the spreadsheet layer looks for
#[derive(Debug, Clone, PartialEq)]
pub struct SheetConfig {
    /// Input sheets whose name contains one of these are not read
    pub skip_keywords: Vec<String>,
    pub resistor_inventory: String,
    pub capacitor_inventory: String,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            skip_keywords: vec!["instruction".to_string(), "combined".to_string()],
            resistor_inventory: "TH Resistors".to_string(),
            capacitor_inventory: "TH Capacitors".to_string(),
        }
    }
}

/// Resolved configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub category_rules: Vec<CategoryRule>,
    pub exclude_keywords: Vec<String>,
    pub capacitor: BareCapacitorRule,
    pub sheets: SheetConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            category_rules: default_category_rules(),
            exclude_keywords: default_exclude_keywords(),
            capacitor: BareCapacitorRule::default(),
            sheets: SheetConfig::default(),
        }
    }
}

/// One configuration file; absent keys leave the lower layer untouched
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    category_rules: Option<Vec<CategoryRule>>,
    exclude_keywords: Option<Vec<String>>,
    capacitor: Option<CapacitorFile>,
    sheets: Option<SheetFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct CapacitorFile {
    bare_picofarad_threshold: Option<f64>,
    bare_fallback_unit: Option<CapUnit>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SheetFile {
    skip_keywords: Option<Vec<String>>,
    resistor_inventory: Option<String>,
    capacitor_inventory: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    ///
    /// A broken global file is logged and ignored; a broken explicit file
    /// is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                if let Err(err) = config.merge_file(&global_path) {
                    tracing::warn!(path = %global_path.display(), error = %err, "ignoring global config");
                }
            }
        }

        if let Some(path) = explicit {
            config.merge_file(path)?;
        }

        config.apply_threshold_override(std::env::var(CAP_THRESHOLD_ENV).ok().as_deref());
        Ok(config)
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "bom-merge")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    fn merge_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.merge_yaml(&contents, &path.display().to_string())
    }

    /// Merge a YAML document over this configuration
    pub fn merge_yaml(&mut self, source: &str, filename: &str) -> Result<(), ConfigError> {
        if source.trim().is_empty() {
            return Ok(());
        }
        let file: ConfigFile = serde_yml::from_str(source)
            .map_err(|err| YamlSyntaxError::from_serde_error(&err, source, filename))?;
        self.merge(file);
        Ok(())
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: ConfigFile) {
        if let Some(rules) = other.category_rules {
            self.category_rules = rules;
        }
        if let Some(keywords) = other.exclude_keywords {
            self.exclude_keywords = keywords;
        }
        if let Some(capacitor) = other.capacitor {
            if let Some(threshold) = capacitor.bare_picofarad_threshold {
                self.capacitor.picofarad_threshold = threshold;
            }
            if let Some(unit) = capacitor.bare_fallback_unit {
                self.capacitor.fallback_unit = unit;
            }
        }
        if let Some(sheets) = other.sheets {
            if let Some(skip) = sheets.skip_keywords {
                self.sheets.skip_keywords = skip;
            }
            if let Some(name) = sheets.resistor_inventory {
                self.sheets.resistor_inventory = name;
            }
            if let Some(name) = sheets.capacitor_inventory {
                self.sheets.capacitor_inventory = name;
            }
        }
    }

    fn apply_threshold_override(&mut self, raw: Option<&str>) {
        let Some(raw) = raw else {
            return;
        };
        match raw.trim().parse::<f64>() {
            Ok(threshold) if threshold.is_finite() && threshold >= 0.0 => {
                self.capacitor.picofarad_threshold = threshold;
            }
            _ => tracing::warn!(value = raw, "ignoring invalid {}", CAP_THRESHOLD_ENV),
        }
    }

    pub fn value_parser(&self) -> ValueParser {
        ValueParser::new(self.capacitor)
    }
}
