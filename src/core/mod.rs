//! Core module - the normalization, categorization and merge engine

pub mod categorize;
pub mod category;
pub mod config;
pub mod filter;
pub mod inventory;
pub mod merge;
pub mod natural;
pub mod patterns;
pub mod pipeline;
pub mod row;
pub mod value;

pub use categorize::{Categorizer, Decision, PatternError};
pub use category::Category;
pub use config::{Config, ConfigError, SheetConfig};
pub use filter::{Exclusion, RowFilter};
pub use inventory::{
    AnnotatedBom, AnnotatedPart, HighlightClass, InventoryEntry, InventoryLedger,
    InventoryMatcher, LedgerFamily, MatchOutcome, StockStatus,
};
pub use merge::{MergeEngine, MergeKey, MergedPart, PreparedRow, ProjectPart};
pub use pipeline::{MergeError, MergeReport, MergeStats, Pipeline, ProjectBom, Source};
pub use row::{RawRow, SourceRef};
pub use value::{BareCapacitorRule, CanonicalValue, CapUnit, ValueFamily, ValueParser};
