//! Reporting types for tracking what was written and what was skipped.

use crate::common::ItemKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Reasons why an item was not written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SkipReason {
    /// Named by the policy but absent from the canonical store
    NotFound { item: String },
    /// Target dialect has no representation for the item's kind
    UnsupportedKind {
        item: String,
        dialect: String,
        kind: ItemKind,
    },
    /// Hash unchanged, nothing to write
    Unchanged { item: String },
    /// Source file exists but could not be read
    Unreadable { item: String, error: String },
    /// Source file could not be parsed or converted
    ParseError { item: String, error: String },
    /// Conflict left unresolved by the user
    ConflictSkipped { item: String },
}

impl SkipReason {
    /// Name of the item this reason refers to.
    pub fn item(&self) -> &str {
        match self {
            Self::NotFound { item }
            | Self::UnsupportedKind { item, .. }
            | Self::Unchanged { item }
            | Self::Unreadable { item, .. }
            | Self::ParseError { item, .. }
            | Self::ConflictSkipped { item } => item,
        }
    }

    /// Returns a human-readable description of the skip reason.
    pub fn description(&self) -> String {
        match self {
            Self::NotFound { item } => format!("{} not found in the canonical store", item),
            Self::UnsupportedKind {
                item,
                dialect,
                kind,
            } => format!("{} skipped: {} has no {}s", item, dialect, kind),
            Self::Unchanged { item } => format!("{} unchanged (same hash)", item),
            Self::Unreadable { item, error } => format!("Failed to read {}: {}", item, error),
            Self::ParseError { item, error } => format!("Failed to parse {}: {}", item, error),
            Self::ConflictSkipped { item } => format!("{} differs on both sides, left as is", item),
        }
    }

    /// Returns actionable guidance for the user.
    pub fn guidance(&self) -> Option<&str> {
        match self {
            Self::NotFound { .. } => Some("Check the tag definition or --include list"),
            Self::UnsupportedKind { .. } => None,
            Self::Unchanged { .. } => None,
            Self::Unreadable { .. } => Some("Check the file is UTF-8 text and readable"),
            Self::ParseError { .. } => Some("Fix the source file syntax"),
            Self::ConflictSkipped { .. } => Some("Re-run and pick a side, or use --force"),
        }
    }

    /// True for reasons that are not worth showing by default.
    pub fn is_quiet(&self) -> bool {
        matches!(self, Self::Unchanged { .. })
    }
}

/// Report for writes into one destination.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WriteReport {
    /// Number of files written (or that would be, on a dry run)
    pub written: usize,
    /// Paths that were (or would be) written
    #[serde(default)]
    pub paths: Vec<PathBuf>,
    /// Items that were skipped with reasons
    pub skipped: Vec<SkipReason>,
    /// Non-fatal warnings
    pub warnings: Vec<String>,
}

impl WriteReport {
    pub fn record_write(&mut self, path: PathBuf) {
        self.written += 1;
        self.paths.push(path);
    }

    pub fn skip(&mut self, reason: SkipReason) {
        self.skipped.push(reason);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Number of items skipped because nothing changed.
    pub fn unchanged(&self) -> usize {
        self.skipped.iter().filter(|s| s.is_quiet()).count()
    }

    /// One-line summary for display.
    pub fn format_line(&self) -> String {
        let noisy = self.skipped.len() - self.unchanged();
        let mut out = format!("{} written, {} unchanged", self.written, self.unchanged());
        if noisy > 0 {
            out.push_str(&format!(", {} skipped", noisy));
        }
        if !self.warnings.is_empty() {
            out.push_str(&format!(", {} warnings", self.warnings.len()));
        }
        out
    }
}
