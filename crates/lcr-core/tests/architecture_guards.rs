//! Architecture guard tests for the lcr-bench workspace.
//!
//! These tests scan source files to enforce design-level consistency:
//! - Error handling style (thiserror vs hand-written Display)
//! - No `Result<_, String>` in lcr-core
//! - No `unwrap()`/`expect()` outside test code in lcr-core
//! - File size limits
//! - No bare generic type names for public types
//!
//! Run: `cargo test --package lcr-core --test architecture_guards -- --nocapture`

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Walk `dir` recursively, collecting .rs files that pass `filter`.
fn collect_rs_files(dir: &Path, filter: &dyn Fn(&Path) -> bool) -> Vec<PathBuf> {
    walkdir(dir)
        .into_iter()
        .filter(|entry| entry.extension().is_some_and(|e| e == "rs") && filter(entry))
        .collect()
}

/// Simple recursive directory walk (no external dep).
fn walkdir(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(walkdir(&path));
            } else {
                files.push(path);
            }
        }
    }
    files
}

/// Return the workspace root (two levels up from lcr-core/tests/).
fn workspace_root() -> PathBuf {
    let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR")); // crates/lcr-core
    manifest
        .parent() // crates/
        .and_then(|p| p.parent()) // workspace root
        .expect("cannot determine workspace root")
        .to_path_buf()
}

fn is_test_file(path: &Path) -> bool {
    let s = path.to_string_lossy();
    s.contains("/tests/") || s.ends_with("/tests.rs") || s.ends_with("_test.rs")
}

/// Strip the workspace root prefix for display.
fn rel(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}

/// The part of a source file before its `#[cfg(test)]` module.
fn non_test_source(content: &str) -> &str {
    content
        .find("#[cfg(test)]")
        .map_or(content, |pos| &content[..pos])
}

fn report(title: &str, hint: &str, violations: &[(String, usize, String)]) {
    if violations.is_empty() {
        return;
    }
    let mut msg = format!("\n{title}\n{hint}\n\n");
    for (file, line, text) in violations {
        msg.push_str(&format!("  {}:{} -> {}\n", file, line, text));
    }
    msg.push_str("\nAdd to allowlist in architecture_guards.rs if intentional.\n");
    panic!("{msg}");
}

// ---------------------------------------------------------------------------
// RS-ERR-01: Error types must use thiserror, no hand-written Display
// ---------------------------------------------------------------------------

#[test]
fn test_error_types_use_thiserror() {
    let root = workspace_root();

    // `ErrorKind` is a plain discriminant with a stable name, not an error.
    let allowlist: HashSet<&str> = ["crates/lcr-core/src/error/types.rs"].into_iter().collect();

    let files = collect_rs_files(&root.join("crates"), &|p| !is_test_file(p));
    let mut violations = Vec::new();

    for file in &files {
        let Ok(content) = fs::read_to_string(file) else {
            continue;
        };
        let relative = rel(file, &root);
        if allowlist.contains(relative.as_str()) {
            continue;
        }
        for (i, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.starts_with("impl")
                && trimmed.contains("Display for")
                && trimmed.contains("Error")
            {
                violations.push((relative.clone(), i + 1, trimmed.to_string()));
            }
        }
    }

    report(
        "[RS-ERR-01] Hand-written Display for Error types detected.",
        "Use #[derive(thiserror::Error)] instead.",
        &violations,
    );
}

// ---------------------------------------------------------------------------
// RS-ERR-02: No Result<_, String> in lcr-core (use EvalError/thiserror)
// ---------------------------------------------------------------------------

#[test]
fn test_no_result_string_in_core() {
    let root = workspace_root();
    let files = collect_rs_files(&root.join("crates/lcr-core/src"), &|p| !is_test_file(p));
    let mut violations = Vec::new();

    for file in &files {
        let Ok(content) = fs::read_to_string(file) else {
            continue;
        };
        let relative = rel(file, &root);
        for (i, line) in non_test_source(&content).lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.starts_with("//") {
                continue;
            }
            if let Some(result_pos) = trimmed.find("Result<") {
                let after_result = &trimmed[result_pos..];
                if after_result.contains(", String>") || after_result.contains(",String>") {
                    violations.push((relative.clone(), i + 1, trimmed.to_string()));
                }
            }
        }
    }

    report(
        "[RS-ERR-02] Result<_, String> found in lcr-core.",
        "Use EvalResult / EvalError instead.",
        &violations,
    );
}

// ---------------------------------------------------------------------------
// RS-ERR-03: No unwrap()/expect() in lcr-core library code
// ---------------------------------------------------------------------------

#[test]
fn test_no_unwrap_in_core() {
    let root = workspace_root();
    let files = collect_rs_files(&root.join("crates/lcr-core/src"), &|p| !is_test_file(p));
    let mut violations = Vec::new();

    for file in &files {
        let Ok(content) = fs::read_to_string(file) else {
            continue;
        };
        let relative = rel(file, &root);
        for (i, line) in non_test_source(&content).lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.starts_with("//") {
                continue;
            }
            if trimmed.contains(".unwrap()") || trimmed.contains(".expect(") {
                violations.push((relative.clone(), i + 1, trimmed.to_string()));
            }
        }
    }

    report(
        "[RS-ERR-03] unwrap()/expect() in lcr-core library code.",
        "Propagate an EvalError with `?` instead.",
        &violations,
    );
}

// ---------------------------------------------------------------------------
// RS-SIZE-01: File size limits (500 lines for non-test files)
// ---------------------------------------------------------------------------

#[test]
fn test_file_size_limits() {
    const MAX_LINES: usize = 500;

    let root = workspace_root();
    let files = collect_rs_files(&root.join("crates"), &|p| !is_test_file(p));
    let mut violations = Vec::new();

    for file in &files {
        let Ok(content) = fs::read_to_string(file) else {
            continue;
        };
        let line_count = content.lines().count();
        if line_count > MAX_LINES {
            violations.push((rel(file, &root), line_count, String::from("split into submodules")));
        }
    }

    report(
        "[RS-SIZE-01] Files exceeding the line limit.",
        &format!("Keep files under {MAX_LINES} lines."),
        &violations,
    );
}

// ---------------------------------------------------------------------------
// RS-NAME-01: No bare generic type names for public types
// ---------------------------------------------------------------------------

#[test]
fn test_no_bare_generic_type_names() {
    let root = workspace_root();
    let bare_names: HashSet<&str> = ["Error", "Config", "Status", "Result", "Context", "Record"]
        .into_iter()
        .collect();

    let files = collect_rs_files(&root.join("crates"), &|p| !is_test_file(p));
    let mut violations = Vec::new();

    for file in &files {
        let Ok(content) = fs::read_to_string(file) else {
            continue;
        };
        let relative = rel(file, &root);
        for (i, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if !trimmed.starts_with("pub struct") && !trimmed.starts_with("pub enum") {
                continue;
            }
            let type_name = trimmed
                .trim_start_matches("pub struct ")
                .trim_start_matches("pub enum ")
                .split(|c: char| !c.is_alphanumeric() && c != '_')
                .next()
                .unwrap_or("");
            if bare_names.contains(type_name) {
                violations.push((relative.clone(), i + 1, trimmed.to_string()));
            }
        }
    }

    report(
        "[RS-NAME-01] Bare generic type names detected for public types.",
        "Use a domain prefix: EvalError, RunConfig, ResultRecord, etc.",
        &violations,
    );
}
