//! Find-usages error types.
//!
//! Classification itself never fails. These errors come from the adapters
//! around it: reading syntax trees and manifests, and validating input.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for find-usages operations.
#[derive(Error, Debug)]
pub enum UsageError {
    /// I/O error during file operations.
    #[error("I/O error for path {path}: {source}")]
    Io {
        /// The file path that caused the I/O error.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON in a syntax tree or search manifest.
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        /// The file that failed to deserialize.
        path: PathBuf,
        /// The underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// An ancestor path must name at least the occurrence node.
    #[error("Ancestor path is empty")]
    EmptyPath,

    /// The requested occurrence range lies outside the syntax tree.
    #[error("No syntax node in {file} covers {line}:{column}")]
    OccurrenceNotInTree {
        /// The syntax tree file.
        file: PathBuf,
        /// Line number (0-based).
        line: u32,
        /// Column number (0-based).
        column: u32,
    },

    /// A command-line or manifest argument was rejected.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Generic error with context.
    #[error("{0}")]
    Other(String),
}

impl UsageError {
    /// Build an I/O error bound to the path that produced it.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        UsageError::Io {
            path: path.into(),
            source,
        }
    }

    /// Stable identifier used in JSON error payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            UsageError::Io { .. } => "Io",
            UsageError::Json { .. } => "Json",
            UsageError::EmptyPath => "EmptyPath",
            UsageError::OccurrenceNotInTree { .. } => "OccurrenceNotInTree",
            UsageError::InvalidArgument(_) => "InvalidArgument",
            UsageError::Other(_) => "Other",
        }
    }

    /// File the error relates to, if any.
    pub fn file_path(&self) -> Option<&std::path::Path> {
        match self {
            UsageError::Io { path, .. } | UsageError::Json { path, .. } => Some(path),
            UsageError::OccurrenceNotInTree { file, .. } => Some(file),
            _ => None,
        }
    }

    /// Remediation hint for the user.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            UsageError::Json { .. } => {
                Some("Syntax trees must use the clangd AST shape: {role, kind, detail, arcana, range, children}")
            }
            UsageError::OccurrenceNotInTree { .. } => {
                Some("Check that the position is 0-based and the tree was dumped from the same file revision")
            }
            UsageError::EmptyPath => Some("Pass at least the node that names the symbol"),
            UsageError::InvalidArgument(_) => {
                Some("--length is the number of characters the symbol spans and must be at least 1")
            }
            _ => None,
        }
    }
}

/// Result type alias for find-usages operations.
pub type Result<T> = std::result::Result<T, UsageError>;
