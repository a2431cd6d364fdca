use std::fmt::Write as _;

use crate::error::Error;
use crate::types::RepairReport;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and, where one exists,
/// how to fix it. Designed to be readable by both humans and LLM agents.
pub fn render_error(e: &Error) -> String {
    match e {
        Error::SwaggerDirNotFound { path } => format!("\
# Error: Swagger Directory Not Found

`{}` does not exist or is not a directory.

## Fix

Pass the directory explicitly or configure it:

    apimerge merge --dir path/to/swagger

    # .apimerge.toml
    swagger_dir = \"path/to/swagger\"
", path.display()),

        Error::UnifiedNotFound { path } => format!("\
# Error: Unified Document Not Found

`{}` does not exist.

## Fix

Generate it first:

    apimerge merge
", path.display()),

        Error::UnknownCorrection { name } => format!("\
# Error: Unknown Correction

Correction `{name}` is not configured. Built-in corrections cannot be
removed, only overridden.

## Fix

List the current table:

    apimerge correction list
"),

        Error::Json { file, reason } => format!("\
# Error: Invalid JSON

Could not parse `{}`: {reason}
", file.display()),

        Error::ConfigParseFailed { file, reason } => format!("\
# Error: Config Parse Failed

Could not parse `{}`: {reason}
", file.display()),

        Error::Io(e) => format!("\
# Error: I/O

{e}
"),

        Error::TomlDe(e) => format!("\
# Error: Invalid TOML

{e}
"),
    }
}

/// Print the repair report as markdown on stderr.
/// Silent when there was nothing to repair and nothing is left dangling.
pub fn print_repair_report(report: &RepairReport) {
    let md = render_repair_report(report);
    if md.is_empty() {
        return;
    }
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render the repair report as markdown sections, empty sections omitted.
pub fn render_repair_report(report: &RepairReport) -> String {
    let mut out = String::new();

    if !report.missing_before.is_empty() {
        out.push_str("## Missing definitions\n\n");
        for name in &report.missing_before {
            let _ = writeln!(out, "- {name}");
        }
        out.push('\n');
    }

    if !report.applied.is_empty() {
        out.push_str("## Applied fixes\n\n");
        for fix in &report.applied {
            let _ = writeln!(out, "- {} -> {}", fix.from, fix.to);
        }
        out.push('\n');
    }

    if !report.ambiguous.is_empty() {
        out.push_str("## Ambiguous references\n\n");
        for entry in &report.ambiguous {
            let _ = writeln!(out, "- {}: candidates {}", entry.name, entry.candidates.join(", "));
        }
        out.push('\n');
    }

    if !report.missing_after.is_empty() {
        out.push_str("## Unresolved references\n\n");
        for name in &report.missing_after {
            let _ = writeln!(out, "- {name}");
        }
        out.push_str("\nFix these manually or extend the correction table:\n\n    apimerge correction add <bad> <good>\n");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AmbiguousRef, AppliedFix};

    #[test]
    fn clean_report_renders_empty() {
        let report = RepairReport::default();
        assert!(render_repair_report(&report).is_empty());
    }

    #[test]
    fn all_sections_appear_when_populated() {
        let report = RepairReport {
            ambiguous: vec![AmbiguousRef {
                candidates: vec!["authStatus".to_string(), "vpnStatus".to_string()],
                name: "Status".to_string(),
            }],
            applied: vec![AppliedFix {
                from: "PeerConfig".to_string(),
                to: "vpncorePeerConfig".to_string(),
            }],
            missing_after: vec!["Status".to_string()],
            missing_before: vec!["PeerConfig".to_string(), "Status".to_string()],
        };

        let md = render_repair_report(&report);
        assert!(md.contains("## Missing definitions"));
        assert!(md.contains("- PeerConfig -> vpncorePeerConfig"));
        assert!(md.contains("- Status: candidates authStatus, vpnStatus"));
        assert!(md.contains("## Unresolved references"));
        assert!(md.contains("correction add"));
    }
}
