//! Search results for a find-usages query.
//!
//! This is the per-occurrence driver around the classifier. For every
//! reference location it builds the ancestor path, classifies the usage
//! and gathers what a results view needs: the line text, the containing
//! function, a display style and whether the item is offered for
//! replacement.

use crate::ast::{ancestor_path, AncestorPath, Range, SyntaxNode};
use crate::error::{Result, UsageError};
use crate::usage::{classify, TagSet, UsageFilter, UsageStyle};
use ropey::Rope;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Input to a search: the symbol, its reference locations and syntax trees.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchManifest {
    /// Spelling of the searched symbol.
    pub symbol: String,

    /// New name when the search prepares a rename.
    #[serde(default)]
    pub replacement: Option<String>,

    /// Reference locations grouped by file.
    #[serde(default)]
    pub files: Vec<FileReferences>,
}

impl SearchManifest {
    /// Read a manifest from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| UsageError::io(path, e))?;
        serde_json::from_str(&text).map_err(|source| UsageError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// References to the symbol within one file.
#[derive(Debug, Clone, Deserialize)]
pub struct FileReferences {
    /// Source file path.
    pub path: PathBuf,

    /// Syntax tree of the file, if the front end produced one.
    #[serde(default)]
    pub ast: Option<SyntaxNode>,

    /// Ranges of the occurrences.
    #[serde(default)]
    pub references: Vec<Range>,
}

/// Knobs for building a report.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Classify usages. Without this every item gets the empty tag set.
    pub categorize: bool,

    /// Files outside this directory are not offered for replacement.
    pub project_root: Option<PathBuf>,

    /// Which usage categories end up in the report.
    pub filter: UsageFilter,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            categorize: true,
            project_root: None,
            filter: UsageFilter::default(),
        }
    }
}

/// One occurrence as shown in a results view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResultItem {
    /// File containing the occurrence.
    pub file: PathBuf,

    /// Range of the occurrence.
    pub range: Range,

    /// Full text of the occurrence's line.
    pub line_text: String,

    /// Name of the function whose body contains the occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub containing_function: Option<String>,

    /// Usage classification.
    pub tags: TagSet,

    /// Display style derived from the tags.
    pub style: UsageStyle,

    /// Whether the item is pre-selected for replacement.
    pub select_for_replacement: bool,
}

/// Rename bookkeeping collected during a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplacementData {
    /// The searched name.
    pub old_symbol_name: String,

    /// The replacement name.
    pub new_symbol_name: String,

    /// Files named after the symbol, offered for renaming alongside it.
    pub file_rename_candidates: BTreeSet<PathBuf>,
}

impl ReplacementData {
    /// Start rename bookkeeping. An empty new name keeps the old one.
    pub fn new(old_symbol_name: &str, new_symbol_name: &str) -> Self {
        let new_symbol_name = if new_symbol_name.is_empty() {
            old_symbol_name
        } else {
            new_symbol_name
        };
        Self {
            old_symbol_name: old_symbol_name.to_string(),
            new_symbol_name: new_symbol_name.to_string(),
            file_rename_candidates: BTreeSet::new(),
        }
    }
}

/// Complete result of a search.
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    /// The searched symbol.
    pub symbol: String,

    /// Items that passed the filter, in input order.
    pub items: Vec<SearchResultItem>,

    /// Rename bookkeeping, when a replacement was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacement: Option<ReplacementData>,
}

/// Builds search result items file by file.
#[derive(Debug)]
pub struct UsageReporter<'a> {
    symbol: &'a str,
    options: &'a SearchOptions,
    replacement: Option<ReplacementData>,
}

impl<'a> UsageReporter<'a> {
    /// Start a report for `symbol`, optionally preparing a rename to `replacement`.
    pub fn new(symbol: &'a str, replacement: Option<&str>, options: &'a SearchOptions) -> Self {
        Self {
            symbol,
            options,
            replacement: replacement.map(|new_name| ReplacementData::new(symbol, new_name)),
        }
    }

    /// Syntax trees are only consulted when categorizing a plain search.
    fn categorizes(&self) -> bool {
        self.options.categorize && self.replacement.is_none()
    }

    /// Build the items for the occurrences in one file.
    ///
    /// `content` is the file's text, used for line extraction. Items are
    /// returned unfiltered and in the order of `ranges`.
    pub fn add_file(
        &mut self,
        file: &Path,
        content: &str,
        ast: Option<&SyntaxNode>,
        ranges: &[Range],
    ) -> Vec<SearchResultItem> {
        let ast = ast.filter(|_| self.categorizes());
        log::debug!("{} has AST: {}", file.display(), ast.is_some());

        let rope = Rope::from_str(content);
        let select_for_replacement = self.replacement.is_some() && self.is_in_project(file);
        if select_for_replacement && !ranges.is_empty() {
            self.note_rename_candidate(file);
        }

        ranges
            .iter()
            .map(|range| {
                let (tags, containing_function) = match ast {
                    Some(root) => {
                        let path = ancestor_path(root, range);
                        (
                            classify(&path, self.symbol),
                            containing_function_name(&path, range),
                        )
                    }
                    None => (TagSet::empty(), None),
                };
                SearchResultItem {
                    file: file.to_path_buf(),
                    range: *range,
                    line_text: line_text(&rope, range.start.line),
                    containing_function,
                    tags,
                    style: UsageStyle::for_tags(tags),
                    select_for_replacement,
                }
            })
            .collect()
    }

    fn is_in_project(&self, file: &Path) -> bool {
        self.options
            .project_root
            .as_deref()
            .is_none_or(|root| file.starts_with(root))
    }

    fn note_rename_candidate(&mut self, file: &Path) {
        let Some(replacement) = self.replacement.as_mut() else {
            return;
        };
        let base_name = file
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.split('.').next())
            .unwrap_or_default();
        if base_name.eq_ignore_ascii_case(&replacement.old_symbol_name) {
            replacement.file_rename_candidates.insert(file.to_path_buf());
        }
    }

    /// Apply the filter and produce the report.
    pub fn finish(self, items: Vec<SearchResultItem>) -> SearchReport {
        let filter = self.options.filter;
        SearchReport {
            symbol: self.symbol.to_string(),
            items: items
                .into_iter()
                .filter(|item| filter.matches(item.tags))
                .collect(),
            replacement: self.replacement,
        }
    }
}

/// Run a whole search described by a manifest, reading sources from disk.
///
/// Files that no longer exist are dropped with a warning.
pub fn find_usages(manifest: &SearchManifest, options: &SearchOptions) -> SearchReport {
    let mut reporter = UsageReporter::new(
        &manifest.symbol,
        manifest.replacement.as_deref(),
        options,
    );
    log::debug!(
        "found {} locations in {} files",
        manifest.files.iter().map(|f| f.references.len()).sum::<usize>(),
        manifest.files.len()
    );

    let mut items = Vec::new();
    for file in &manifest.files {
        let content = match std::fs::read_to_string(&file.path) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("Skipping {}: {}", file.path.display(), e);
                continue;
            }
        };
        items.extend(reporter.add_file(
            &file.path,
            &content,
            file.ast.as_ref(),
            &file.references,
        ));
    }
    reporter.finish(items)
}

/// Name of the function whose body contains `range`.
///
/// Walking outward, the most recent compound statement is remembered; the
/// first function-like declaration whose body contains the occurrence
/// supplies the name. Occurrences in a signature are skipped past.
pub fn containing_function_name(path: &AncestorPath<'_>, range: &Range) -> Option<String> {
    let mut last_compound: Option<&SyntaxNode> = None;
    for node in path.iter() {
        if node.facts().compound_statement {
            last_compound = Some(node);
        }
        if node.is_function_declaration()
            && last_compound.is_some_and(|body| body.contains_range(range))
        {
            return node.detail().map(str::to_string);
        }
    }
    None
}

/// Text of a zero-based line without its terminator; empty if out of range.
fn line_text(rope: &Rope, line: u32) -> String {
    let line = line as usize;
    if line >= rope.len_lines() {
        return String::new();
    }
    let text = rope.line(line).to_string();
    text.trim_end_matches(['\n', '\r']).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_text_strips_terminator() {
        let rope = Rope::from_str("int x;\r\nx = 1;\n");
        assert_eq!(line_text(&rope, 0), "int x;");
        assert_eq!(line_text(&rope, 1), "x = 1;");
        assert_eq!(line_text(&rope, 7), "");
    }

    #[test]
    fn test_empty_replacement_keeps_old_name() {
        let data = ReplacementData::new("Widget", "");
        assert_eq!(data.new_symbol_name, "Widget");
    }

    #[test]
    fn test_without_ast_tags_are_empty() {
        let options = SearchOptions::default();
        let mut reporter = UsageReporter::new("x", None, &options);
        let items = reporter.add_file(
            Path::new("/src/a.cpp"),
            "int x;\n",
            None,
            &[Range::on_line(0, 4, 1)],
        );

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].tags, TagSet::empty());
        assert_eq!(items[0].style, UsageStyle::Default);
        assert_eq!(items[0].line_text, "int x;");
        assert!(!items[0].select_for_replacement);
    }
}
