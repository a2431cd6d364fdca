//! Missing-reference resolution: the final closing-the-loop pass.
//!
//! After merging, the set of referenced names is diffed against the defined
//! names; every dangling name goes through the correction table and then a
//! fuzzy match against the definitions. Fixes apply globally; anything left
//! over is reported, never dropped.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use crate::scanner;
use crate::types::{AmbiguousRef, AppliedFix, RepairReport, Resolution};

/// Prefixes stripped during fuzzy comparison, tried in this order.
pub const SERVICE_PREFIXES: [&str; 6] =
    ["auth", "analytics", "server", "vpn", "dpi", "notifications"];

/// The set of keys in the document's `definitions` mapping.
pub fn defined_names(unified: &Value) -> BTreeSet<String> {
    unified
        .get("definitions")
        .and_then(Value::as_object)
        .map(|defs| defs.keys().cloned().collect())
        .unwrap_or_default()
}

/// Decide how to repair one unresolved reference name.
///
/// Candidates are defined names that contain the unresolved name, are
/// contained by it, or equal it after both sides drop a leading service
/// prefix — all case-insensitive. A unique candidate wins outright; several
/// candidates are narrowed to those whose prefix-stripped form equals the
/// unresolved name's exactly, and only a unique survivor is applied.
pub fn resolve_name(unresolved: &str, defined: &BTreeSet<String>, prefixes: &[&str]) -> Resolution {
    let unresolved_lower = unresolved.to_lowercase();
    let unresolved_base = strip_service_prefix(&unresolved_lower, prefixes).to_string();

    let candidates: Vec<&String> = defined
        .iter()
        .filter(|name| {
            let name_lower = name.to_lowercase();
            name_lower.contains(&unresolved_lower)
                || unresolved_lower.contains(&name_lower)
                || strip_service_prefix(&name_lower, prefixes) == unresolved_base
        })
        .collect();

    match candidates.as_slice() {
        [] => Resolution::Unresolved,
        [only] => Resolution::Resolved((*only).clone()),
        _ => narrow_candidates(&candidates, &unresolved_base, prefixes),
    }
}

/// Break a multi-candidate tie: keep only candidates whose prefix-stripped
/// form equals the unresolved name's. Anything but a unique survivor is
/// ambiguous.
fn narrow_candidates(
    candidates: &[&String],
    unresolved_base: &str,
    prefixes: &[&str],
) -> Resolution {
    let exact: Vec<&String> = candidates
        .iter()
        .copied()
        .filter(|name| strip_service_prefix(&name.to_lowercase(), prefixes) == unresolved_base)
        .collect();

    if let [only] = exact.as_slice() {
        return Resolution::Resolved((*only).clone());
    }

    Resolution::Ambiguous(candidates.iter().copied().cloned().collect())
}

/// Drop the first matching service prefix from an already-lowercased name.
fn strip_service_prefix<'a>(lower: &'a str, prefixes: &[&str]) -> &'a str {
    for prefix in prefixes {
        if let Some(rest) = lower.strip_prefix(prefix) {
            return rest;
        }
    }
    lower
}

/// Run the full repair pass over the merged document in place.
///
/// Consults `corrections` first (applied unconditionally), then the fuzzy
/// match. Every applied fix rewrites all occurrences of the dangling name.
/// Returns the report for the operator, including whatever is still
/// unresolved afterwards.
pub fn repair_missing_references(
    unified: &mut Value,
    corrections: &BTreeMap<String, String>,
) -> RepairReport {
    let defined = defined_names(unified);
    let referenced = scanner::collect_references(unified);
    let missing: Vec<String> = referenced.difference(&defined).cloned().collect();

    let mut applied: Vec<AppliedFix> = Vec::new();
    let mut ambiguous: Vec<AmbiguousRef> = Vec::new();
    let mut renames: BTreeMap<String, String> = BTreeMap::new();

    for name in &missing {
        if let Some(target) = corrections.get(name) {
            renames.insert(name.clone(), target.clone());
            applied.push(AppliedFix { from: name.clone(), to: target.clone() });
            continue;
        }

        match resolve_name(name, &defined, &SERVICE_PREFIXES) {
            Resolution::Resolved(target) => {
                renames.insert(name.clone(), target.clone());
                applied.push(AppliedFix { from: name.clone(), to: target });
            },
            Resolution::Ambiguous(candidates) => {
                ambiguous.push(AmbiguousRef { candidates, name: name.clone() });
            },
            Resolution::Unresolved => {},
        }
    }

    if !renames.is_empty() {
        scanner::rewrite_references(unified, |name| renames.get(name).cloned());
    }

    let missing_after: Vec<String> = scanner::collect_references(unified)
        .difference(&defined_names(unified))
        .cloned()
        .collect();

    RepairReport { ambiguous, applied, missing_after, missing_before: missing }
}
