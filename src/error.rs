//! Error taxonomy for building-block generation and persistence.

use crate::category::Category;
use std::path::PathBuf;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, BlockError>;

/// Errors surfaced by the store, the completion backend and the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum BlockError {
    /// The persisted store is missing, unreadable or not a valid snapshot.
    #[error("Failed to load building blocks from {path}: {reason}")]
    Deserialization { path: PathBuf, reason: String },

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize building blocks: {0}")]
    Serialization(String),

    /// The completion backend failed (network, quota, malformed response).
    #[error("Completion backend error: {0}")]
    Backend(String),

    /// A prerequisite could not be produced, so the requested category was not attempted.
    #[error("Cannot generate {category}: prerequisite {prerequisite} failed: {source}")]
    PrerequisiteUnavailable {
        category: Category,
        prerequisite: Category,
        #[source]
        source: Box<BlockError>,
    },

    #[error("Category '{0}' has not been generated yet")]
    NotGenerated(Category),

    #[error("Dependency cycle detected: {}", format_cycle(.0))]
    DependencyCycle(Vec<Category>),

    #[error(
        "Unknown category '{0}' (expected one of: names, occupations, hobbies, descriptions)"
    )]
    UnknownCategory(String),

    #[error("Invalid validity pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// A fanned-out list no longer lines up item for item with its upstream list.
    #[error(
        "{category} has {len} item(s) but {prerequisite} has {prerequisite_len}; regenerate {category}"
    )]
    Misaligned {
        category: Category,
        len: usize,
        prerequisite: Category,
        prerequisite_len: usize,
    },

    #[error("Failed to load template from {path}: {reason}")]
    Template { path: PathBuf, reason: String },

    /// Reading the operator's answer or writing the preview failed.
    #[error("Operator console error: {0}")]
    Operator(#[from] std::io::Error),
}

fn format_cycle(path: &[Category]) -> String {
    path.iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(" -> ")
}

impl BlockError {
    pub(crate) fn deserialization(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        BlockError::Deserialization {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BlockError::Io {
            path: path.into(),
            source,
        }
    }
}
