//! Reference scanning and rewriting over parsed Swagger documents.
//!
//! Both passes walk the tree with an explicit worklist: documents are finite
//! and non-cyclic in the ownership sense (references are string pointers, not
//! structural back-edges), so each node is visited exactly once and cost is
//! proportional to node count.

use std::collections::BTreeSet;

use serde_json::Value;

/// Prefix every local definition reference carries.
const REF_PREFIX: &str = "#/definitions/";

/// Extract the definition name from a `$ref` value.
/// Returns `None` for pointer forms other than `#/definitions/<name>`,
/// which never participate in scanning or rewriting.
pub fn ref_target(reference: &str) -> Option<&str> {
    reference.strip_prefix(REF_PREFIX).filter(|name| !name.is_empty())
}

/// Build a `$ref` value pointing at a definition name.
pub fn ref_to(name: &str) -> String {
    format!("{REF_PREFIX}{name}")
}

/// Collect the set of distinct definition names referenced anywhere in the
/// tree. Scalars are ignored; repeats collapse into the set. Read-only.
pub fn collect_references(root: &Value) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        match node {
            Value::Object(map) => {
                if let Some(name) = map.get("$ref").and_then(Value::as_str).and_then(ref_target) {
                    found.insert(name.to_string());
                }
                stack.extend(map.values());
            },
            Value::Array(items) => stack.extend(items.iter()),
            _ => {},
        }
    }

    found
}

/// Rewrite every `#/definitions/` reference in the tree with the supplied
/// rename rule. The rule sees the current target name; returning `None`
/// leaves the pointer untouched.
pub fn rewrite_references<F>(root: &mut Value, rename: F)
where
    F: Fn(&str) -> Option<String>,
{
    let mut stack: Vec<&mut Value> = vec![root];

    while let Some(node) = stack.pop() {
        match node {
            Value::Object(map) => {
                if let Some(Value::String(raw)) = map.get_mut("$ref")
                    && let Some(name) = ref_target(raw)
                    && let Some(new_name) = rename(name)
                {
                    *raw = ref_to(&new_name);
                }
                stack.extend(map.values_mut());
            },
            Value::Array(items) => stack.extend(items.iter_mut()),
            _ => {},
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn collects_references_at_any_depth() {
        let doc = json!({
            "paths": {
                "/login": {
                    "post": {
                        "responses": {
                            "200": { "schema": { "$ref": "#/definitions/LoginResponse" } }
                        },
                        "parameters": [
                            { "schema": { "$ref": "#/definitions/LoginRequest" } }
                        ]
                    }
                }
            },
            "definitions": {
                "LoginResponse": {
                    "properties": {
                        "user": { "$ref": "#/definitions/User" }
                    }
                }
            }
        });

        let refs = collect_references(&doc);
        let names: Vec<&str> = refs.iter().map(String::as_str).collect();
        assert_eq!(names, ["LoginRequest", "LoginResponse", "User"]);
    }

    #[test]
    fn repeated_names_collapse_into_one() {
        let doc = json!([
            { "$ref": "#/definitions/Status" },
            { "$ref": "#/definitions/Status" }
        ]);

        assert_eq!(collect_references(&doc).len(), 1);
    }

    #[test]
    fn ignores_other_pointer_forms() {
        let doc = json!({
            "a": { "$ref": "#/parameters/PageSize" },
            "b": { "$ref": "other.json#/definitions/External" },
            "c": { "$ref": "#/definitions/Kept" }
        });

        let refs = collect_references(&doc);
        assert!(refs.contains("Kept"));
        assert_eq!(refs.len(), 1);
    }

    #[test]
    fn rewrite_applies_rule_globally() {
        let mut doc = json!({
            "one": { "$ref": "#/definitions/Old" },
            "nested": [ { "deep": { "$ref": "#/definitions/Old" } } ],
            "other": { "$ref": "#/definitions/Unrelated" }
        });

        rewrite_references(&mut doc, |name| {
            (name == "Old").then(|| "New".to_string())
        });

        let refs = collect_references(&doc);
        assert!(refs.contains("New"));
        assert!(refs.contains("Unrelated"));
        assert!(!refs.contains("Old"));
    }

    #[test]
    fn rewrite_leaves_non_definition_pointers_alone() {
        let mut doc = json!({ "p": { "$ref": "#/parameters/PageSize" } });

        rewrite_references(&mut doc, |_| Some("Hijacked".to_string()));

        assert_eq!(doc["p"]["$ref"], "#/parameters/PageSize");
    }
}
