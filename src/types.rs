/// Core domain types for service documents and repair outcomes.
use serde_json::Value;

/// A reference name that could not be matched to exactly one definition.
/// Kept in the report with every candidate so the operator can decide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbiguousRef {
    /// Defined names that matched the heuristic equally well.
    pub candidates: Vec<String>,
    /// The unresolved reference name.
    pub name: String,
}

/// A rename applied to every occurrence of a reference during repair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedFix {
    /// The dangling reference name that was replaced.
    pub from: String,
    /// The defined name all occurrences now point at.
    pub to: String,
}

/// Everything the repair passes learned, rendered by diagnostics.
#[derive(Debug, Default)]
pub struct RepairReport {
    /// Unresolved names left ambiguous, with their candidates.
    pub ambiguous: Vec<AmbiguousRef>,
    /// Fixes rewritten into the document.
    pub applied: Vec<AppliedFix>,
    /// Reference names with no definition after all repair passes.
    pub missing_after: Vec<String>,
    /// Reference names with no definition before any repair.
    pub missing_before: Vec<String>,
}

/// Outcome of the heuristic match for one unresolved reference name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Multiple defined names matched with no unique prefix-stripped winner.
    Ambiguous(Vec<String>),
    /// Exactly one defined name matched.
    Resolved(String),
    /// No defined name matched.
    Unresolved,
}

/// One service's parsed API description.
/// Consumed once by the namespacing pass; not retained after merging.
#[derive(Debug, Clone)]
pub struct ServiceDoc {
    /// The parsed Swagger document, guaranteed by the loader to carry
    /// `paths` and `definitions`.
    pub doc: Value,
    /// Service key derived from the filename (`auth.swagger.json` -> `auth`).
    pub key: String,
}
