//! The correction table: built-in entries for reference mistakes the
//! vocabulary heuristic is known to make, plus the CLI commands that manage
//! the user-extendable half stored in `.apimerge.toml`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config;
use crate::error;

/// Known-bad reference names and their corrections. Append-only.
const BUILTIN_FIXES: [(&str, &str); 4] = [
    ("authAnalyticsGetUserStatsResponse", "analyticsGetUserStatsResponse"),
    (
        "authNotificationsServiceUpdateUserPreferencesBody",
        "NotificationsServiceUpdateUserPreferencesBody",
    ),
    ("serverMonitorEvent", "serverServerMonitorEvent"),
    ("serverServerServerMonitorEvent", "serverServerMonitorEvent"),
];

/// The full correction table: built-ins overlaid with config entries, so a
/// user can override a shipped fix.
pub fn correction_table(config: &config::Config) -> BTreeMap<String, String> {
    let mut table: BTreeMap<String, String> = BUILTIN_FIXES
        .iter()
        .map(|(from, to)| ((*from).to_string(), (*to).to_string()))
        .collect();

    for (from, to) in config.corrections() {
        table.insert(from.clone(), to.clone());
    }

    table
}

// ── CLI commands ──────────────────────────────────────────────────────

/// List the full correction table, built-in and configured.
///
/// # Errors
///
/// Returns errors from config loading.
pub fn cmd_list() -> Result<(), error::Error> {
    let root = PathBuf::from(".");
    let config = config::Config::load(&root)?;

    for (from, to) in correction_table(&config) {
        println!("{from} -> {to}");
    }

    Ok(())
}

/// Add a correction entry to `.apimerge.toml`.
///
/// # Errors
///
/// Returns errors from config parsing or writing.
pub fn cmd_add(from: &str, to: &str) -> Result<(), error::Error> {
    let root = PathBuf::from(".");
    add_to_config(&root, from, to)?;
    println!("Added correction: {from} -> {to}");
    Ok(())
}

/// Remove a configured correction from `.apimerge.toml`.
/// Built-in entries cannot be removed, only overridden.
///
/// # Errors
///
/// Returns `Error::UnknownCorrection` if the name isn't configured.
pub fn cmd_remove(name: &str) -> Result<(), error::Error> {
    let root = PathBuf::from(".");
    remove_from_config(&root, name)?;
    println!("Removed correction: {name}");
    Ok(())
}

// ── Config file editing ───────────────────────────────────────────────

/// Parse `.apimerge.toml` into a format-preserving document.
/// Returns an empty document if the file doesn't exist.
///
/// # Errors
///
/// Returns `Error::Io` on read failure or `Error::ConfigParseFailed` on
/// parse failure.
fn read_config_doc(root: &Path) -> Result<(PathBuf, toml_edit::DocumentMut), error::Error> {
    let config_path = root.join(".apimerge.toml");
    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(error::Error::Io(e)),
    };

    let doc: toml_edit::DocumentMut = content.parse().map_err(|e: toml_edit::TomlError| {
        error::Error::ConfigParseFailed {
            file: config_path.clone(),
            reason: e.to_string(),
        }
    })?;

    Ok((config_path, doc))
}

/// Add a correction mapping to `.apimerge.toml`.
/// Creates the `[corrections]` table if it doesn't exist.
///
/// # Errors
///
/// Returns `Error::ConfigParseFailed` if the config can't be parsed,
/// or `Error::Io` if writing fails.
fn add_to_config(root: &Path, from: &str, to: &str) -> Result<(), error::Error> {
    let (config_path, mut doc) = read_config_doc(root)?;

    if !doc.contains_key("corrections") {
        doc["corrections"] = toml_edit::Item::Table(toml_edit::Table::new());
    }

    doc["corrections"][from] = toml_edit::value(to);

    std::fs::write(&config_path, doc.to_string())?;
    Ok(())
}

/// Remove a correction key from `.apimerge.toml`.
///
/// # Errors
///
/// Returns `Error::UnknownCorrection` if the name isn't found.
fn remove_from_config(root: &Path, name: &str) -> Result<(), error::Error> {
    let (config_path, mut doc) = read_config_doc(root)?;

    let corrections = doc
        .get_mut("corrections")
        .and_then(toml_edit::Item::as_table_mut)
        .ok_or_else(|| error::Error::UnknownCorrection {
            name: name.to_string(),
        })?;

    if corrections.remove(name).is_none() {
        return Err(error::Error::UnknownCorrection {
            name: name.to_string(),
        });
    }

    std::fs::write(&config_path, doc.to_string())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_entries_overlay_builtins() {
        let tmp = tempfile::tempdir().unwrap();
        let content = "\
[corrections]
serverMonitorEvent = \"somethingElse\"
brandNewEntry = \"target\"
";
        std::fs::write(tmp.path().join(".apimerge.toml"), content).unwrap();

        let config = config::Config::load(tmp.path()).unwrap();
        let table = correction_table(&config);

        assert_eq!(table.get("serverMonitorEvent").map(String::as_str), Some("somethingElse"));
        assert_eq!(table.get("brandNewEntry").map(String::as_str), Some("target"));
        assert_eq!(
            table.get("authAnalyticsGetUserStatsResponse").map(String::as_str),
            Some("analyticsGetUserStatsResponse")
        );
    }

    #[test]
    fn add_then_remove_roundtrips_the_config_file() {
        let tmp = tempfile::tempdir().unwrap();

        add_to_config(tmp.path(), "badName", "goodName").unwrap();
        let config = config::Config::load(tmp.path()).unwrap();
        assert_eq!(config.corrections().get("badName").map(String::as_str), Some("goodName"));

        remove_from_config(tmp.path(), "badName").unwrap();
        let config = config::Config::load(tmp.path()).unwrap();
        assert!(config.corrections().is_empty());
    }

    #[test]
    fn removing_an_unknown_correction_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(remove_from_config(tmp.path(), "neverAdded").is_err());
    }
}
