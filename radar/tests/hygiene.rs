//! Hygiene: source-level budgets checked at test time.
//!
//! Scans the production sources of the radar and telemetry crates (test files
//! excluded) for patterns that panic, swallow errors, or bypass `tracing`.
//! Every budget is a ceiling; lowering one is fine, raising one is not.

use std::fs;
use std::path::Path;

/// Roots scanned, relative to the radar crate directory.
const ROOTS: &[&str] = &["src", "../telemetry/src"];

/// `(pattern, max occurrences, why it is budgeted)`.
const BUDGETS: &[(&str, usize, &str)] = &[
    (".unwrap()", 0, "panics on the render path"),
    (".expect(", 0, "panics on the render path"),
    ("panic!(", 0, "crashes the overlay"),
    ("unreachable!(", 0, "crashes the overlay"),
    ("todo!(", 0, "unfinished stub"),
    ("unimplemented!(", 0, "unfinished stub"),
    ("let _ =", 0, "discards a result unseen"),
    (".ok()", 0, "discards an error unseen"),
    ("#[allow(dead_code)]", 0, "hides unused code"),
    ("println!(", 0, "bypasses tracing"),
    ("eprintln!(", 0, "bypasses tracing"),
    ("dbg!(", 0, "debug leftover"),
];

struct SourceFile {
    path: String,
    content: String,
}

fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    for root in ROOTS {
        collect_rs_files(Path::new(root), &mut files);
    }
    files
}

fn collect_rs_files(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, out);
            continue;
        }
        let path_str = path.to_string_lossy().to_string();
        if path.extension().is_none_or(|e| e != "rs") || path_str.ends_with("_test.rs") {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            out.push(SourceFile { path: path_str, content });
        }
    }
}

fn hits(files: &[SourceFile], pattern: &str) -> Vec<(String, usize)> {
    files
        .iter()
        .map(|f| (f.path.clone(), f.content.lines().filter(|l| l.contains(pattern)).count()))
        .filter(|(_, n)| *n > 0)
        .collect()
}

#[test]
fn sources_were_found() {
    let files = source_files();
    assert!(files.iter().any(|f| f.path.ends_with("render.rs")), "radar sources not found");
    assert!(files.iter().any(|f| f.path.ends_with("lib.rs") && f.path.contains("telemetry")), "telemetry sources not found");
}

#[test]
fn pattern_budgets() {
    let files = source_files();
    let mut over = Vec::new();
    for &(pattern, max, why) in BUDGETS {
        let found = hits(&files, pattern);
        let total: usize = found.iter().map(|(_, n)| n).sum();
        if total > max {
            let detail: Vec<String> = found.iter().map(|(p, n)| format!("    {p}: {n}")).collect();
            over.push(format!("{pattern} ({why}): found {total}, max {max}\n{}", detail.join("\n")));
        }
    }
    assert!(over.is_empty(), "hygiene budgets exceeded:\n{}", over.join("\n"));
}
