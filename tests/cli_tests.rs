//! Integration tests for CLI wiring.
//!
//! These tests validate that the CLI is a thin adapter over the library
//! with proper output formats and exit codes.

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};
    use std::path::{Path, PathBuf};
    use std::process::{Command, Output};
    use tempfile::TempDir;

    /// Get the path to the find-usages binary.
    fn binary() -> PathBuf {
        PathBuf::from(env!("CARGO_BIN_EXE_find-usages"))
    }

    fn run(args: &[&str]) -> Output {
        Command::new(binary())
            .args(args)
            .output()
            .expect("Failed to run find-usages")
    }

    fn stdout_json(output: &Output) -> Value {
        serde_json::from_slice(&output.stdout).expect("stdout is JSON")
    }

    fn range(line: u32, start: u32, end: u32) -> Value {
        json!({
            "start": {"line": line, "character": start},
            "end": {"line": line, "character": end}
        })
    }

    /// `x += 1;` on line 0 and `f(x);` on line 1 of a two-line source.
    fn write_fixture(dir: &Path) -> (PathBuf, PathBuf) {
        let source = dir.join("main.cpp");
        std::fs::write(&source, "x += 1;\nf(x);\n").expect("Failed to write source");

        let x_ref = |line: u32, start: u32| {
            json!({
                "role": "expression",
                "kind": "DeclRef",
                "detail": "x",
                "arcana": "DeclRefExpr 0x1 <col:1> 'int' lvalue Var 0x2 'x' 'int'",
                "range": range(line, start, start + 1)
            })
        };
        let tree = json!({
            "kind": "TranslationUnit",
            "range": {"start": {"line": 0, "character": 0}, "end": {"line": 2, "character": 0}},
            "children": [
                {
                    "role": "expression",
                    "kind": "BinaryOperator",
                    "detail": "+=",
                    "range": range(0, 0, 6),
                    "children": [x_ref(0, 0), {"kind": "IntegerLiteral", "range": range(0, 5, 6)}]
                },
                {
                    "role": "expression",
                    "kind": "Call",
                    "range": range(1, 0, 4),
                    "children": [
                        {
                            "role": "expression",
                            "kind": "ImplicitCast",
                            "detail": "LValueToRValue",
                            "arcana": "ImplicitCastExpr 0x3 <col:3> 'int' <LValueToRValue>",
                            "range": range(1, 2, 3),
                            "children": [x_ref(1, 2)]
                        }
                    ]
                }
            ]
        });
        let ast = dir.join("main.ast.json");
        std::fs::write(&ast, tree.to_string()).expect("Failed to write AST");
        (source, ast)
    }

    fn write_manifest(dir: &Path, source: &Path, ast: &Path) -> PathBuf {
        let tree: Value =
            serde_json::from_str(&std::fs::read_to_string(ast).expect("read AST")).expect("AST");
        let manifest = json!({
            "symbol": "x",
            "files": [
                {"path": source, "ast": tree, "references": [range(0, 0, 1), range(1, 2, 3)]}
            ]
        });
        let path = dir.join("manifest.json");
        std::fs::write(&path, manifest.to_string()).expect("Failed to write manifest");
        path
    }

    #[test]
    fn test_cli_classify_write() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let (_, ast) = write_fixture(dir.path());

        let output = run(&[
            "classify",
            "--ast",
            ast.to_str().unwrap(),
            "--line",
            "0",
            "--column",
            "0",
            "--symbol",
            "x",
        ]);

        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "[Write]");
    }

    #[test]
    fn test_cli_classify_json_payload() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let (_, ast) = write_fixture(dir.path());

        let output = run(&[
            "--json",
            "classify",
            "--ast",
            ast.to_str().unwrap(),
            "--line",
            "1",
            "--column",
            "2",
            "--symbol",
            "x",
        ]);

        assert!(output.status.success());
        let payload = stdout_json(&output);
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["data"]["tags"], 8);
        assert_eq!(payload["data"]["names"], json!(["WritableRef"]));
        assert_eq!(payload["data"]["style"], "write");
        assert_eq!(payload["data"]["node"], "DeclRef");
    }

    #[test]
    fn test_cli_classify_outside_tree_fails() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let (_, ast) = write_fixture(dir.path());

        let output = run(&[
            "--json",
            "classify",
            "--ast",
            ast.to_str().unwrap(),
            "--line",
            "9",
            "--column",
            "0",
            "--symbol",
            "x",
        ]);

        assert_eq!(output.status.code(), Some(1));
        let payload = stdout_json(&output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error"]["kind"], "OccurrenceNotInTree");
    }

    #[test]
    fn test_cli_classify_rejects_zero_length() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let (_, ast) = write_fixture(dir.path());

        let output = run(&[
            "--json",
            "classify",
            "--ast",
            ast.to_str().unwrap(),
            "--line",
            "0",
            "--column",
            "0",
            "--length",
            "0",
            "--symbol",
            "x",
        ]);

        assert_eq!(output.status.code(), Some(1));
        let payload = stdout_json(&output);
        assert_eq!(payload["error"]["kind"], "InvalidArgument");
        assert!(payload["error"]["hint"].is_string());
    }

    #[test]
    fn test_cli_classify_huge_column_does_not_panic() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let (_, ast) = write_fixture(dir.path());

        let output = run(&[
            "--json",
            "classify",
            "--ast",
            ast.to_str().unwrap(),
            "--line",
            "0",
            "--column",
            "4294967295",
            "--symbol",
            "x",
        ]);

        // Only the root spans the end of line 0, and it classifies as nothing.
        assert!(output.status.success());
        let payload = stdout_json(&output);
        assert_eq!(payload["data"]["tags"], 0);
        assert_eq!(payload["data"]["node"], "TranslationUnit");
    }

    #[test]
    fn test_cli_search_text_output() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let (source, ast) = write_fixture(dir.path());
        let manifest = write_manifest(dir.path(), &source, &ast);

        let output = run(&["search", "--manifest", manifest.to_str().unwrap()]);

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        let lines: Vec<&str> = stdout.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with(":1:1 [Write] x += 1;"));
        assert!(lines[1].ends_with(":2:3 [WritableRef] f(x);"));
        assert_eq!(lines[2], "2 usages of 'x'");
    }

    #[test]
    fn test_cli_search_hide_and_json() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let (source, ast) = write_fixture(dir.path());
        let manifest = write_manifest(dir.path(), &source, &ast);

        let output = run(&[
            "--json",
            "search",
            "--manifest",
            manifest.to_str().unwrap(),
            "--hide",
            "write",
        ]);

        assert!(output.status.success());
        let payload = stdout_json(&output);
        assert_eq!(payload["data"]["symbol"], "x");
        assert_eq!(payload["data"]["items"], json!([]));
    }

    #[test]
    fn test_cli_search_without_categories() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let (source, ast) = write_fixture(dir.path());
        let manifest = write_manifest(dir.path(), &source, &ast);

        let output = run(&[
            "--json",
            "search",
            "--manifest",
            manifest.to_str().unwrap(),
            "--no-categorize",
        ]);

        assert!(output.status.success());
        let payload = stdout_json(&output);
        let items = payload["data"]["items"].as_array().expect("items array");
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|item| item["tags"] == 0));
    }

    #[test]
    fn test_cli_local_reports_false_for_expression() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let (_, ast) = write_fixture(dir.path());

        let output = run(&[
            "local",
            "--ast",
            ast.to_str().unwrap(),
            "--line",
            "0",
            "--column",
            "0",
        ]);

        assert!(output.status.success());
        assert_eq!(
            String::from_utf8_lossy(&output.stdout).trim(),
            "not a function-local variable"
        );
    }

    #[test]
    fn test_cli_missing_manifest_exit_code() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let missing = dir.path().join("nope.json");

        let output = run(&["search", "--manifest", missing.to_str().unwrap()]);

        assert_eq!(output.status.code(), Some(1));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Error:"));
    }
}
