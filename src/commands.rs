//! Core CLI commands for apimerge: merge, fix-refs, check.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use serde_json::Value;

use crate::config;
use crate::correction;
use crate::diagnostics;
use crate::error;
use crate::loader;
use crate::merger;
use crate::repair;
use crate::resolver;
use crate::scanner;
use crate::services::ServiceTable;

/// Run the full merge pipeline and write the unified document.
///
/// Load, namespace, merge, cross-service repair, missing-reference
/// resolution, one write. Unresolved references are a warning, not a
/// failure; only filesystem problems abort.
///
/// # Errors
///
/// Returns errors from config loading, directory listing, or the final
/// write.
pub fn merge(dir: Option<PathBuf>, output: Option<PathBuf>) -> Result<(), error::Error> {
    let root = PathBuf::from(".");
    let config = config::Config::load(&root)?;
    let swagger_dir = dir.unwrap_or_else(|| config.swagger_dir());
    let output_path = output.unwrap_or_else(|| config.output());

    let table = ServiceTable::with_overrides(config.services());
    let docs = loader::load_service_docs(&swagger_dir)?;
    let count = docs.len();
    eprintln!("Found {count} swagger documents in {}", swagger_dir.display());

    let merged = merger::merge(docs, &table);
    for collision in &merged.collisions {
        eprintln!("warning: {collision}");
    }

    let mut unified = merged.doc;
    repair::rewrite_operation_refs(&mut unified);

    let corrections = correction::correction_table(&config);
    let report = resolver::repair_missing_references(&mut unified, &corrections);

    write_unified(&output_path, &unified)?;

    print_merge_summary(&unified, &output_path);
    diagnostics::print_repair_report(&report);
    Ok(())
}

/// Standalone repair pass over an existing unified document, in place.
///
/// # Errors
///
/// Returns `Error::UnifiedNotFound` if the document doesn't exist, or
/// errors from config loading, parsing, or the rewrite.
pub fn fix_refs(file: Option<PathBuf>) -> Result<(), error::Error> {
    let root = PathBuf::from(".");
    let config = config::Config::load(&root)?;
    let path = file.unwrap_or_else(|| config.output());

    let mut unified = read_unified(&path)?;
    let corrections = correction::correction_table(&config);
    let report = resolver::repair_missing_references(&mut unified, &corrections);
    write_unified(&path, &unified)?;

    if report.missing_before.is_empty() {
        eprintln!("All references resolve, nothing to fix.");
    } else {
        diagnostics::print_repair_report(&report);
    }
    Ok(())
}

/// Verify every reference in the unified document resolves to a definition.
/// Reports missing names and exits 1 when any are found.
///
/// # Errors
///
/// Returns `Error::UnifiedNotFound` if the document doesn't exist, or
/// errors from config loading or parsing.
pub fn check(file: Option<PathBuf>) -> Result<ExitCode, error::Error> {
    let root = PathBuf::from(".");
    let config = config::Config::load(&root)?;
    let path = file.unwrap_or_else(|| config.output());

    let unified = read_unified(&path)?;
    let referenced = scanner::collect_references(&unified);
    let defined = resolver::defined_names(&unified);
    let missing: Vec<&String> = referenced.difference(&defined).collect();

    if missing.is_empty() {
        let total = referenced.len();
        println!("All {total} references resolve");
        return Ok(ExitCode::SUCCESS);
    }

    for name in &missing {
        println!("MISSING  {name}");
    }
    let count = missing.len();
    println!();
    println!("{count} unresolved references");
    Ok(ExitCode::from(1))
}

/// Read and parse the unified document.
///
/// # Errors
///
/// Returns `Error::UnifiedNotFound` if the file doesn't exist,
/// `Error::Io` for other read failures, or `Error::Json` on parse failure.
fn read_unified(path: &Path) -> Result<Value, error::Error> {
    let content = match std::fs::read_to_string(path) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(error::Error::UnifiedNotFound { path: path.to_path_buf() });
        },
        Err(e) => return Err(error::Error::Io(e)),
        Ok(c) => c,
    };

    serde_json::from_str(&content).map_err(|e| error::Error::Json {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Serialize the fully built document and persist it in one write.
///
/// # Errors
///
/// Returns `Error::Json` if serialization fails or `Error::Io` if the file
/// cannot be written.
fn write_unified(path: &Path, unified: &Value) -> Result<(), error::Error> {
    let mut content = serde_json::to_string_pretty(unified).map_err(|e| error::Error::Json {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    content.push('\n');

    std::fs::write(path, content)?;
    Ok(())
}

/// Print the endpoint/definition/tag counts for the finished document.
fn print_merge_summary(unified: &Value, output: &Path) {
    let endpoints = section_len(unified, "paths");
    let definitions = section_len(unified, "definitions");
    let tags = unified.get("tags").and_then(Value::as_array).map_or(0, Vec::len);

    println!("Merged {endpoints} endpoints, {definitions} definitions, {tags} tags");
    println!("Unified API written to {}", output.display());
}

/// Key count of a top-level object section, zero when absent.
fn section_len(unified: &Value, section: &str) -> usize {
    unified
        .get(section)
        .and_then(Value::as_object)
        .map_or(0, serde_json::Map::len)
}
