//! find-usages: usage classification for C++ find-usages results.
//!
//! Given the chain of syntax nodes around one occurrence of a symbol, the
//! classifier decides whether the symbol is declared, read, written or
//! passed by mutable reference there. Adapters around it build those
//! chains from clangd syntax trees and assemble search results.

#![warn(missing_docs)]
// env_logger is used by src/main.rs (binary), not this library
#![expect(unused_crate_dependencies)]

pub mod ast;
pub mod cli;
pub mod error;
pub mod local;
pub mod report;
pub mod usage;

/// Re-export common error types for convenience.
pub use error::{Result, UsageError};

/// Re-export the classifier and its value types.
pub use ast::{AncestorPath, SyntaxNode};
pub use usage::{classify, Tag, TagSet, UsageStyle};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
