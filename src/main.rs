//! find-usages CLI binary
//!
//! This is the main entry point for the find-usages command-line interface.
//! The CLI is a thin adapter over the library APIs.

use find_usages::ast::{ancestor_path, load_tree, Range};
use find_usages::cli::{CliErrorPayload, CliSuccessPayload, Commands, UsageCategory};
use find_usages::report::{find_usages, SearchManifest, SearchOptions, SearchReport};
use find_usages::{classify, UsageError, UsageStyle};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = find_usages::cli::parse_args();

    if cli.verbose {
        env_logger::init();
    }

    let result = match cli.command {
        Commands::Search {
            manifest,
            no_categorize,
            project_root,
            hide,
        } => execute_search(&manifest, no_categorize, project_root, &hide),
        Commands::Classify {
            ast,
            line,
            column,
            length,
            symbol,
        } => execute_classify(&ast, line, column, length, &symbol),
        Commands::Local { ast, line, column } => {
            execute_local(&ast, Range::on_line(line, column, 0))
        }
    };

    match result {
        Ok((message, data)) => {
            if cli.json {
                let payload = CliSuccessPayload::with_data(message, data);
                println!("{}", serde_json::to_string_pretty(&payload).unwrap_or_default());
            } else {
                println!("{}", message);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            if cli.json {
                let payload = CliErrorPayload::from_error(&e);
                println!("{}", serde_json::to_string_pretty(&payload).unwrap_or_default());
            } else {
                eprintln!("Error: {}", e);
                if let Some(hint) = e.hint() {
                    eprintln!("Hint: {}", hint);
                }
            }
            ExitCode::from(1)
        }
    }
}

/// Execute the search command: load the manifest, classify, render.
fn execute_search(
    manifest_path: &Path,
    no_categorize: bool,
    project_root: Option<PathBuf>,
    hide: &[UsageCategory],
) -> Result<(String, Value), UsageError> {
    let manifest = SearchManifest::load(manifest_path)?;
    let options = SearchOptions {
        categorize: !no_categorize,
        project_root,
        filter: UsageCategory::filter_hiding(hide),
    };

    let report = find_usages(&manifest, &options);
    let data = serde_json::to_value(&report).map_err(|e| UsageError::Other(e.to_string()))?;
    Ok((render_report(&report), data))
}

/// One line per item: `file:line:col [Tags] line text`, 1-based positions.
fn render_report(report: &SearchReport) -> String {
    let mut lines: Vec<String> = report
        .items
        .iter()
        .map(|item| {
            format!(
                "{}:{}:{} [{}] {}",
                item.file.display(),
                item.range.start.line + 1,
                item.range.start.character + 1,
                item.tags,
                item.line_text.trim()
            )
        })
        .collect();
    lines.push(format!(
        "{} usages of '{}'",
        report.items.len(),
        report.symbol
    ));
    if let Some(replacement) = &report.replacement {
        for file in &replacement.file_rename_candidates {
            lines.push(format!("rename candidate: {}", file.display()));
        }
    }
    lines.join("\n")
}

/// Execute the classify command for one occurrence.
fn execute_classify(
    ast_path: &Path,
    line: u32,
    column: u32,
    length: u32,
    symbol: &str,
) -> Result<(String, Value), UsageError> {
    if length == 0 {
        return Err(UsageError::InvalidArgument(
            "occurrence length must be at least 1".to_string(),
        ));
    }
    let range = Range::on_line(line, column, length);
    let root = load_tree(ast_path)?;
    let path = ancestor_path(&root, &range);
    if path.depth() == 1 && !root.contains_range(&range) {
        return Err(UsageError::OccurrenceNotInTree {
            file: ast_path.to_path_buf(),
            line: range.start.line,
            column: range.start.character,
        });
    }

    let tags = classify(&path, symbol);
    let names: Vec<&str> = tags.tags().map(|tag| tag.as_str()).collect();
    let data = json!({
        "tags": tags,
        "names": names,
        "style": UsageStyle::for_tags(tags),
        "node": path.occurrence().kind().as_str(),
    });
    Ok((format!("[{}]", tags), data))
}

/// Execute the local command: is the definition a function-local variable?
fn execute_local(ast_path: &Path, range: Range) -> Result<(String, Value), UsageError> {
    let root = load_tree(ast_path)?;
    let path = ancestor_path(&root, &range);
    let is_local = find_usages::local::is_function_local_variable(&path);
    let message = if is_local {
        "function-local variable".to_string()
    } else {
        "not a function-local variable".to_string()
    };
    Ok((message, json!({ "local": is_local })))
}
