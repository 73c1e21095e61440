//! Command-line interface for find-usages.
//!
//! This module handles argument parsing and output payloads only.
//! Classification and reporting live in the library modules.

use crate::usage::UsageFilter;
use clap::Parser;
use serde::Serialize;
use serde_json::Value;

/// find-usages: classify how each occurrence of a C++ symbol is used.
#[derive(Parser, Debug)]
#[command(name = "find-usages")]
#[command(author, version, about, long_about = None)]
#[command(subcommand_required = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print a JSON payload instead of text.
    #[arg(long, global = true)]
    pub json: bool,
}

/// Available commands.
#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Classify every reference listed in a search manifest.
    Search {
        /// Path to the search manifest (JSON).
        #[arg(short, long)]
        manifest: std::path::PathBuf,

        /// Skip classification; all items get empty tags.
        #[arg(long)]
        no_categorize: bool,

        /// Only files under this directory are offered for replacement.
        #[arg(long, value_name = "DIR")]
        project_root: Option<std::path::PathBuf>,

        /// Usage categories to leave out of the results.
        #[arg(long, value_enum, value_delimiter = ',')]
        hide: Vec<UsageCategory>,
    },

    /// Classify a single occurrence in a syntax tree.
    Classify {
        /// Path to the syntax tree (clangd AST JSON).
        #[arg(short, long)]
        ast: std::path::PathBuf,

        /// Line of the occurrence (0-based).
        #[arg(long)]
        line: u32,

        /// Column of the occurrence (0-based).
        #[arg(long)]
        column: u32,

        /// Length of the occurrence in characters.
        #[arg(long, default_value_t = 1)]
        length: u32,

        /// Spelling of the symbol.
        #[arg(short, long)]
        symbol: String,
    },

    /// Check whether a definition is a function-local variable.
    Local {
        /// Path to the syntax tree (clangd AST JSON).
        #[arg(short, long)]
        ast: std::path::PathBuf,

        /// Line of the definition (0-based).
        #[arg(long)]
        line: u32,

        /// Column of the definition (0-based).
        #[arg(long)]
        column: u32,
    },
}

/// Usage categories for result filtering.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageCategory {
    /// Read accesses.
    Read,
    /// Writes and writable references.
    Write,
    /// Declarations.
    Declaration,
    /// Everything else.
    Other,
}

impl UsageCategory {
    /// Build a filter that hides the given categories.
    pub fn filter_hiding(hidden: &[UsageCategory]) -> UsageFilter {
        UsageFilter {
            reads: !hidden.contains(&UsageCategory::Read),
            writes: !hidden.contains(&UsageCategory::Write),
            declarations: !hidden.contains(&UsageCategory::Declaration),
            other: !hidden.contains(&UsageCategory::Other),
        }
    }
}

/// Parse command-line arguments.
///
/// Returns the parsed Cli struct or exits on error.
pub fn parse_args() -> Cli {
    Cli::parse()
}

/// JSON success payload for CLI responses.
#[derive(Serialize)]
pub struct CliSuccessPayload {
    /// Status indicator ("ok").
    pub status: &'static str,
    /// Human-readable message.
    pub message: String,
    /// Structured data.
    pub data: Value,
}

impl CliSuccessPayload {
    /// Construct a payload with structured data.
    pub fn with_data(message: String, data: Value) -> Self {
        Self {
            status: "ok",
            message,
            data,
        }
    }
}

/// JSON error payload for CLI responses.
#[derive(Serialize)]
pub struct CliErrorPayload {
    /// Status indicator ("error").
    pub status: &'static str,
    /// Structured error details.
    pub error: ErrorDetails,
}

/// Details for a CLI error payload.
#[derive(Serialize)]
pub struct ErrorDetails {
    /// Error kind identifier (Io, Json, ...).
    pub kind: &'static str,
    /// Human-readable message.
    pub message: String,
    /// Optional file context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Optional hint for remediation steps.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl CliErrorPayload {
    /// Build payload from a UsageError instance.
    pub fn from_error(error: &crate::UsageError) -> Self {
        CliErrorPayload {
            status: "error",
            error: ErrorDetails {
                kind: error.kind(),
                message: error.to_string(),
                file: error
                    .file_path()
                    .map(|path| path.to_string_lossy().to_string()),
                hint: error.hint().map(|h| h.to_string()),
            },
        }
    }
}
