use std::path::PathBuf;

use serde::Serialize;

use crate::config;
use crate::loader;

/// Output the comprehensive apimerge reference document.
pub fn run(json: bool) {
    let root = PathBuf::from(".");
    let state = gather_state(&root);

    if json {
        print_json(&state);
    } else {
        print_markdown(&state);
    }
}

// ── State gathering ───────────────────────────────────────────────────

struct CurrentState {
    config_found: bool,
    corrections: usize,
    service_docs: Option<usize>,
    swagger_dir: String,
    unified_found: bool,
}

fn gather_state(root: &std::path::Path) -> CurrentState {
    let config_found = root.join(".apimerge.toml").exists();
    let config = config::Config::load(root).ok();

    let swagger_dir = config
        .as_ref()
        .map_or_else(|| config::DEFAULT_SWAGGER_DIR.to_string(), |c| {
            c.swagger_dir().display().to_string()
        });
    let unified_found = config.as_ref().is_some_and(|c| root.join(c.output()).exists());
    let corrections = config.as_ref().map_or(0, |c| c.corrections().len());

    let service_docs = std::fs::read_dir(root.join(&swagger_dir)).ok().map(|entries| {
        entries
            .filter_map(Result::ok)
            .filter(|e| {
                e.file_name()
                    .to_str()
                    .is_some_and(|name| name.ends_with(loader::SWAGGER_SUFFIX))
            })
            .count()
    });

    CurrentState { config_found, corrections, service_docs, swagger_dir, unified_found }
}

// ── Markdown output ───────────────────────────────────────────────────

fn print_markdown(state: &CurrentState) {
    let version = env!("CARGO_PKG_VERSION");
    print_markdown_header(version);
    print_markdown_state(state);
    println!();
    print_markdown_exit_codes();
}

fn print_markdown_header(version: &str) {
    print!(
        "\
# apimerge {version}

Merge per-service Swagger documents into one unified platform API —
rename colliding definitions per service and repair dangling references.

## Workflow

    apimerge merge                    Merge <dir>/*.swagger.json into unified-api.json
    apimerge merge --dir d --output f Override input directory and output path
    apimerge fix-refs                 Repair references in an existing unified document
    apimerge check                    Verify every reference resolves (exit 0/1)
    apimerge correction list          Show the correction table
    apimerge correction add A B       Record that references to A should point at B
    apimerge correction remove A      Drop a configured correction

## Configuration (.apimerge.toml)

    swagger_dir = \"docs/swagger\"       # where *.swagger.json live
    output = \"docs/swagger/unified-api.json\"

    [services.billing]                  # extend the known-service table
    name = \"Billing\"
    description = \"Billing and invoicing\"

    [corrections]
    authStaleName = \"analyticsStaleName\"

## Current State

"
    );
}

fn print_markdown_state(state: &CurrentState) {
    if state.config_found {
        println!("Config:       .apimerge.toml (found, {} corrections)", state.corrections);
    } else {
        println!("Config:       .apimerge.toml (not found)");
    }

    match state.service_docs {
        Some(n) => println!("Swagger dir:  {} ({n} service documents)", state.swagger_dir),
        None => println!("Swagger dir:  {} (not found)", state.swagger_dir),
    }

    if state.unified_found {
        println!("Unified API:  found");
    } else {
        println!("Unified API:  not generated yet");
    }
}

fn print_markdown_exit_codes() {
    print!(
        "\
## Exit Codes

| Code | Meaning |
|------|---------|
| 0    | Success / all references resolve |
| 1    | Unresolved references found (check only) / runtime error |
"
    );
}

// ── JSON output ───────────────────────────────────────────────────────

#[derive(Serialize)]
struct InfoJson {
    version: String,
    current_state: StateJson,
}

#[derive(Serialize)]
struct StateJson {
    config_found: bool,
    corrections: usize,
    service_docs: Option<usize>,
    swagger_dir: String,
    unified_found: bool,
}

fn print_json(state: &CurrentState) {
    let info = InfoJson {
        version: env!("CARGO_PKG_VERSION").to_string(),
        current_state: StateJson {
            config_found: state.config_found,
            corrections: state.corrections,
            service_docs: state.service_docs,
            swagger_dir: state.swagger_dir.clone(),
            unified_found: state.unified_found,
        },
    };

    // serde_json::to_string_pretty won't fail on this structure.
    let json = serde_json::to_string_pretty(&info).unwrap_or_default();
    println!("{json}");
}
