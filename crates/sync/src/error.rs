//! Classified failures surfaced by the sync engine.
//!
//! These travel inside [`anyhow::Error`]; use `downcast_ref::<SyncError>()`
//! to tell a precondition failure from an ordinary I/O error.

use crate::common::ItemKind;
use std::path::PathBuf;
use thiserror::Error;

/// Errors with a meaning callers may need to act on.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum SyncError {
    /// A dialect name did not resolve in the registry.
    #[error("Unknown dialect '{name}'. Available dialects: {}", available.join(", "))]
    UnknownDialect {
        /// The name that was looked up.
        name: String,
        /// Names that would have been accepted.
        available: Vec<String>,
    },

    /// The dialect has no representation for this kind of item.
    #[error("Dialect '{dialect}' does not support {kind}s")]
    Unsupported {
        /// Dialect that was asked to handle the item.
        dialect: String,
        /// The item kind it lacks.
        kind: ItemKind,
    },

    /// The canonical store directory has not been created yet.
    #[error("Canonical store not initialized at {}. Run `conflows init` first", path.display())]
    StoreNotInitialized {
        /// Root that was checked.
        path: PathBuf,
    },

    /// A YAML header block could not be parsed.
    #[error("Invalid frontmatter in {file}: {message}")]
    InvalidFrontmatter {
        /// File name the content came from.
        file: String,
        /// Parser message.
        message: String,
    },
}

impl SyncError {
    /// True when the error must abort an invocation before anything is written.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::UnknownDialect { .. } | Self::StoreNotInitialized { .. }
        )
    }
}

/// Returns the classified error behind an [`anyhow::Error`], if there is one.
pub fn classify(err: &anyhow::Error) -> Option<&SyncError> {
    err.downcast_ref::<SyncError>()
}
