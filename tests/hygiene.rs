//! Hygiene: enforces coding standards at test time.
//!
//! Scans the screen crate's `src/` tree (minus `*_test.rs` files) for
//! antipatterns. Each pattern has a budget, ideally zero. If you must add an
//! occurrence, fix an existing one first; the budget never grows.
#![allow(clippy::absurd_extreme_comparisons)]

use std::fs;
use std::path::PathBuf;

// Panics: these abort the wasm instance.
const MAX_UNWRAP: usize = 0;
const MAX_EXPECT: usize = 0;
const MAX_PANIC: usize = 0;
const MAX_UNREACHABLE: usize = 0;
const MAX_TODO: usize = 0;
const MAX_UNIMPLEMENTED: usize = 0;

// Silent loss: discards errors without inspecting.
const MAX_SILENT_DISCARD: usize = 0;
const MAX_DOT_OK: usize = 0;

// Output goes through `log`, never straight to stdout.
const MAX_PRINTLN: usize = 0;
const MAX_DBG: usize = 0;

// Style / structure.
const MAX_ALLOW_DEAD_CODE: usize = 0;

// Browser listeners are owned and removed on drop, never leaked.
const MAX_CLOSURE_FORGET: usize = 0;

struct SourceFile {
    path: String,
    content: String,
}

/// Every non-test `.rs` file under `src/`, walked without recursion.
fn source_files() -> Vec<SourceFile> {
    let mut pending = vec![PathBuf::from("src")];
    let mut found = Vec::new();
    while let Some(dir) = pending.pop() {
        let Ok(listing) = fs::read_dir(&dir) else {
            continue;
        };
        for path in listing.flatten().map(|e| e.path()) {
            if path.is_dir() {
                pending.push(path);
                continue;
            }
            let is_source = path.extension().is_some_and(|ext| ext == "rs");
            let is_test = path.file_stem().is_some_and(|stem| stem.to_string_lossy().ends_with("_test"));
            if !is_source || is_test {
                continue;
            }
            if let Ok(content) = fs::read_to_string(&path) {
                found.push(SourceFile { path: path.display().to_string(), content });
            }
        }
    }
    found
}

/// Per-file count of lines containing `pattern`, skipping `//` comment lines.
fn hits(files: &[SourceFile], pattern: &str) -> Vec<(String, usize)> {
    files
        .iter()
        .filter_map(|file| {
            let count = file
                .content
                .lines()
                .filter(|line| !line.trim_start().starts_with("//"))
                .filter(|line| line.contains(pattern))
                .count();
            (count > 0).then(|| (file.path.clone(), count))
        })
        .collect()
}

fn check_budget(pattern: &str, max: usize) {
    let sources = source_files();
    assert!(!sources.is_empty(), "no sources found; run from the crate root");
    let found = hits(&sources, pattern);
    let count: usize = found.iter().map(|(_, c)| c).sum();
    let listing = found
        .iter()
        .map(|(path, c)| format!("  {path}: {c}"))
        .collect::<Vec<_>>()
        .join("\n");
    assert!(count <= max, "`{pattern}` budget exceeded: found {count}, max {max}.\n{listing}");
}

#[test]
fn unwrap_budget() {
    check_budget(".unwrap()", MAX_UNWRAP);
}

#[test]
fn expect_budget() {
    check_budget(".expect(", MAX_EXPECT);
}

#[test]
fn panic_budget() {
    check_budget("panic!(", MAX_PANIC);
}

#[test]
fn unreachable_budget() {
    check_budget("unreachable!(", MAX_UNREACHABLE);
}

#[test]
fn todo_budget() {
    check_budget("todo!(", MAX_TODO);
}

#[test]
fn unimplemented_budget() {
    check_budget("unimplemented!(", MAX_UNIMPLEMENTED);
}

#[test]
fn silent_discard_budget() {
    check_budget("let _ =", MAX_SILENT_DISCARD);
}

#[test]
fn dot_ok_budget() {
    check_budget(".ok()", MAX_DOT_OK);
}

#[test]
fn println_budget() {
    check_budget("println!(", MAX_PRINTLN);
}

#[test]
fn dbg_budget() {
    check_budget("dbg!(", MAX_DBG);
}

#[test]
fn allow_dead_code_budget() {
    check_budget("#[allow(dead_code)]", MAX_ALLOW_DEAD_CODE);
}

#[test]
fn closure_forget_budget() {
    check_budget(".forget()", MAX_CLOSURE_FORGET);
}
