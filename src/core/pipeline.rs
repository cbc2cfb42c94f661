//! Filter → categorize → parse → merge → match, over all sources

use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

use crate::core::categorize::{Categorizer, PatternError};
use crate::core::config::Config;
use crate::core::filter::RowFilter;
use crate::core::inventory::{AnnotatedBom, InventoryLedger, InventoryMatcher};
use crate::core::merge::{group_project, MergeEngine, MergedPart, PreparedRow, ProjectPart};
use crate::core::row::RawRow;
use crate::core::value::ValueParser;

/// Structural failures of a merge run
#[derive(Debug, Error, Diagnostic)]
pub enum MergeError {
    #[error("no input rows found in any source")]
    #[diagnostic(
        code(bom_merge::merge::no_input),
        help("check that the input files have a header row with Part/Value/Description columns")
    )]
    NoInputRows,
}

/// All rows read from one input file
#[derive(Debug, Clone)]
pub struct Source {
    /// Project name, used for the per-project output sheet
    pub name: String,
    pub rows: Vec<RawRow>,
}

/// Grouped BOM of a single project
#[derive(Debug, Clone, Serialize)]
pub struct ProjectBom {
    pub name: String,
    pub parts: Vec<ProjectPart>,
}

/// Row accounting for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    pub sources: usize,
    pub rows_read: usize,
    pub rows_excluded: usize,
    pub rows_merged: usize,
}

/// Everything the presentation layer needs
#[derive(Debug, Clone, Serialize)]
pub struct MergeReport {
    pub projects: Vec<ProjectBom>,
    pub combined: AnnotatedBom,
    pub stats: MergeStats,
}

/// The configured engine
#[derive(Debug)]
pub struct Pipeline {
    filter: RowFilter,
    categorizer: Categorizer,
    parser: ValueParser,
}

impl Pipeline {
    pub fn new(filter: RowFilter, categorizer: Categorizer, parser: ValueParser) -> Self {
        Self {
            filter,
            categorizer,
            parser,
        }
    }

    /// Build the engine from configuration, compiling its pattern table
    pub fn from_config(config: &Config) -> Result<Self, PatternError> {
        let parser = config.value_parser();
        let categorizer = Categorizer::new(&config.category_rules, parser.clone())?;
        let filter = RowFilter::new(&config.exclude_keywords);
        Ok(Self::new(filter, categorizer, parser))
    }

    pub fn parser(&self) -> &ValueParser {
        &self.parser
    }

    pub fn categorizer(&self) -> &Categorizer {
        &self.categorizer
    }

    pub fn filter(&self) -> &RowFilter {
        &self.filter
    }

    /// Filter, categorize and parse one row; `None` if it is excluded
    pub fn prepare(&self, row: RawRow) -> Option<PreparedRow> {
        if let Some(reason) = self.filter.exclusion(&row) {
            tracing::debug!(
                source = %row.source,
                part = row.part(),
                description = row.description(),
                %reason,
                "row excluded"
            );
            return None;
        }
        let category = self.categorizer.classify(&row);
        let value = self.parser.parse(category, row.value());
        Some(PreparedRow::new(category, value, row))
    }

    /// Merge rows from any number of sources into the sorted combined list
    pub fn merge(&self, rows: impl IntoIterator<Item = RawRow>) -> Vec<MergedPart> {
        let mut engine = MergeEngine::new();
        for prepared in rows.into_iter().filter_map(|r| self.prepare(r)) {
            engine.add(prepared);
        }
        engine.finish()
    }

    /// Per-project view of a single source, no cross-source merging
    pub fn project_view(&self, rows: impl IntoIterator<Item = RawRow>) -> Vec<ProjectPart> {
        group_project(rows.into_iter().filter_map(|r| self.prepare(r)))
    }

    /// Run the whole pipeline over every source
    pub fn run(
        &self,
        sources: &[Source],
        ledger: Option<&InventoryLedger>,
    ) -> Result<MergeReport, MergeError> {
        let mut stats = MergeStats {
            sources: sources.len(),
            ..MergeStats::default()
        };
        stats.rows_read = sources.iter().map(|s| s.rows.len()).sum();
        if stats.rows_read == 0 {
            return Err(MergeError::NoInputRows);
        }

        let mut engine = MergeEngine::new();
        let mut projects = Vec::with_capacity(sources.len());

        for source in sources {
            let prepared: Vec<PreparedRow> = source
                .rows
                .iter()
                .cloned()
                .filter_map(|r| self.prepare(r))
                .collect();
            let excluded = source.rows.len() - prepared.len();
            stats.rows_excluded += excluded;
            tracing::info!(
                project = %source.name,
                rows = source.rows.len(),
                excluded,
                "source prepared"
            );

            for row in &prepared {
                engine.add(row.clone());
            }
            projects.push(ProjectBom {
                name: source.name.clone(),
                parts: group_project(prepared),
            });
        }

        stats.rows_merged = engine.rows_merged();
        let combined = InventoryMatcher::new(ledger).annotate(engine.finish());
        tracing::info!(
            parts = combined.parts.len(),
            rows = stats.rows_merged,
            inventory = combined.inventory_available,
            "merge complete"
        );

        Ok(MergeReport {
            projects,
            combined,
            stats,
        })
    }
}
