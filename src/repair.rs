//! Cross-service reference repair for merged operations.
//!
//! An operation can reference a definition introduced by a different service
//! than the one that declared the operation (a health endpoint exposing
//! another module's status type, say), so per-service prefixing alone cannot
//! fix those pointers. This pass guesses the owning service from the
//! reference name's vocabulary and reapplies the rename rule.

use serde_json::Value;

use crate::namespace;
use crate::scanner;
use crate::services;

/// Rewrite response and parameter schema references across all merged
/// operations. Only direct `schema.$ref` pointers are considered; anything
/// deeper is left for the missing-reference resolver.
pub fn rewrite_operation_refs(unified: &mut Value) {
    let Some(paths) = unified.get_mut("paths").and_then(Value::as_object_mut) else {
        return;
    };

    for methods in paths.values_mut() {
        let Some(methods) = methods.as_object_mut() else {
            continue;
        };
        for operation in methods.values_mut() {
            rewrite_single_operation(operation);
        }
    }
}

/// Rewrite one operation's response and parameter schema references.
fn rewrite_single_operation(operation: &mut Value) {
    if let Some(responses) = operation.get_mut("responses").and_then(Value::as_object_mut) {
        for response in responses.values_mut() {
            if let Some(schema) = response.get_mut("schema") {
                rewrite_schema_ref(schema);
            }
        }
    }

    if let Some(parameters) = operation.get_mut("parameters").and_then(Value::as_array_mut) {
        for parameter in parameters {
            if let Some(schema) = parameter.get_mut("schema") {
                rewrite_schema_ref(schema);
            }
        }
    }
}

/// Rewrite a schema's direct `$ref` if a service can be inferred from the
/// target name. No inference means no rewrite.
fn rewrite_schema_ref(schema: &mut Value) {
    let Some(schema) = schema.as_object_mut() else {
        return;
    };
    let Some(Value::String(raw)) = schema.get_mut("$ref") else {
        return;
    };
    let Some(name) = scanner::ref_target(raw) else {
        return;
    };
    let Some(service_key) = services::detect_service(name) else {
        return;
    };

    let renamed = namespace::rename_definition(service_key, name);
    if renamed != name {
        *raw = scanner::ref_to(&renamed);
    }
}
