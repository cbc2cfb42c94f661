//! Source-annotated diagnostics for malformed YAML configuration

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// YAML that does not deserialize into the configuration schema
#[derive(Debug, Error, Diagnostic)]
#[error("invalid configuration: {message}")]
#[diagnostic(code(bom_merge::config::syntax))]
pub struct YamlSyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    message: String,
}

impl YamlSyntaxError {
    pub fn from_serde_error(err: &serde_yml::Error, source: &str, filename: &str) -> Self {
        let (line, column) = err
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((1, 1));
        let message = err.to_string();
        let offset = offset_of(source, line, column);

        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset + 1),
            help: hint_for(&message),
            message,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Byte offset of a 1-based line/column, clamped to the source
fn offset_of(source: &str, line: usize, column: usize) -> usize {
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(source.len())
}

fn hint_for(message: &str) -> Option<String> {
    let msg = message.to_lowercase();

    if msg.contains("unknown field") {
        return Some(
            "Top-level keys are category_rules, exclude_keywords, capacitor and sheets".to_string(),
        );
    }
    if msg.contains("unknown variant") {
        return Some("Check the spelling of category, field or unit names".to_string());
    }
    if msg.contains("tab") {
        return Some("Indent with spaces; YAML does not allow tabs".to_string());
    }
    if msg.contains("invalid type") {
        return Some("Lists need '- item' entries; numbers must not be quoted".to_string());
    }
    if msg.contains("regex") || msg.contains("escape") {
        return Some("Quote regex patterns with single quotes: pattern: '\\bled\\b'".to_string());
    }

    None
}
