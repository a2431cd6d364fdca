//! Merger: combines namespaced per-service documents into one unified
//! document with platform-wide metadata, security, and tags.

use std::collections::HashMap;

use serde_json::{Map, Value, json};

use crate::namespace;
use crate::services::ServiceTable;
use crate::types::ServiceDoc;

/// The merged document plus the collision warnings discovered on the way.
pub struct Merged {
    /// Path+method pairs redefined by a later service (last write won).
    pub collisions: Vec<String>,
    /// The unified document.
    pub doc: Value,
}

/// Merge all service documents into one unified document.
///
/// Each service is namespaced first (definitions renamed, own references
/// rewritten), then folded in: operations receive their security
/// requirement and organizational tag, definitions land under their
/// renamed keys.
pub fn merge(services: Vec<ServiceDoc>, table: &ServiceTable) -> Merged {
    let mut unified = unified_skeleton(table);
    let mut collisions = Vec::new();
    let mut op_owner: HashMap<(String, String), String> = HashMap::new();

    for mut service in services {
        namespace::rewrite_service_refs(&service.key, &mut service.doc);
        merge_service(&mut unified, service, table, &mut op_owner, &mut collisions);
    }

    Merged { collisions, doc: unified }
}

/// Fold one service's paths and definitions into the unified document.
fn merge_service(
    unified: &mut Value,
    service: ServiceDoc,
    table: &ServiceTable,
    op_owner: &mut HashMap<(String, String), String>,
    collisions: &mut Vec<String>,
) {
    let ServiceDoc { doc, key } = service;
    let Value::Object(mut doc) = doc else {
        return;
    };

    if let Some(Value::Object(paths)) = doc.remove("paths")
        && let Some(unified_paths) = unified.get_mut("paths").and_then(Value::as_object_mut)
    {
        merge_paths(unified_paths, paths, &key, table, op_owner, collisions);
    }

    if let Some(Value::Object(defs)) = doc.remove("definitions")
        && let Some(unified_defs) = unified.get_mut("definitions").and_then(Value::as_object_mut)
    {
        merge_definitions(unified_defs, defs, &key);
    }
}

/// Fold one service's paths in, decorating every operation on the way.
/// An identical path+method pair from a later service wins, and the
/// collision is recorded for the operator.
fn merge_paths(
    unified_paths: &mut Map<String, Value>,
    paths: Map<String, Value>,
    service_key: &str,
    table: &ServiceTable,
    op_owner: &mut HashMap<(String, String), String>,
    collisions: &mut Vec<String>,
) {
    for (route, methods) in paths {
        let Value::Object(methods) = methods else {
            continue;
        };

        for (method, mut operation) in methods {
            decorate_operation(&route, &mut operation, service_key, table);

            let slot = (route.clone(), method.clone());
            if let Some(earlier) = op_owner.insert(slot, service_key.to_string()) {
                collisions.push(format!(
                    "{method} {route} defined by both {earlier} and {service_key}, keeping {service_key}"
                ));
            }

            let entry = unified_paths
                .entry(route.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Some(entry) = entry.as_object_mut() {
                entry.insert(method, operation);
            }
        }
    }
}

/// Inject the default bearer requirement and the organizational tag.
///
/// Health endpoints are tagged `Health` and stay unauthenticated.
/// Operations of a service key absent from the table keep their existing
/// tags; the security injection applies regardless.
fn decorate_operation(route: &str, operation: &mut Value, service_key: &str, table: &ServiceTable) {
    let Value::Object(op) = operation else {
        return;
    };
    let is_health = route.contains("/health");

    if !is_health && !op.contains_key("security") {
        op.insert("security".to_string(), json!([{ "Bearer": [] }]));
    }

    if let Some(display) = table.display_name(service_key) {
        let tag = if is_health { "Health" } else { display };
        op.insert("tags".to_string(), json!([tag]));
    }
}

/// Fold one service's definitions in under their renamed keys.
/// Shared protobuf/rpc names merge once, first occurrence wins; any other
/// colliding key is overwritten by the later service.
fn merge_definitions(
    unified_defs: &mut Map<String, Value>,
    defs: Map<String, Value>,
    service_key: &str,
) {
    for (name, schema) in defs {
        if namespace::is_common(&name) {
            unified_defs.entry(name).or_insert(schema);
            continue;
        }

        let renamed = namespace::rename_definition(service_key, &name);
        unified_defs.insert(renamed, schema);
    }
}

/// The unified document before any service is merged in: format marker,
/// platform metadata, the bearer security scheme, and the tag list.
fn unified_skeleton(table: &ServiceTable) -> Value {
    let mut tags: Vec<Value> = table
        .entries()
        .map(|service| json!({ "name": service.name, "description": service.description }))
        .collect();
    tags.push(json!({ "name": "Health", "description": "Health check endpoints" }));

    json!({
        "swagger": "2.0",
        "info": {
            "title": "Silence VPN Platform API",
            "version": "1.0.0",
            "description": "Unified API for Silence VPN Platform - includes all services: Auth, Analytics, Server Manager, VPN Core, DPI Bypass, and Notifications",
            "contact": {
                "name": "Silence Team",
                "email": "team@silence.com"
            },
            "license": {
                "name": "MIT",
                "url": "https://opensource.org/licenses/MIT"
            }
        },
        "host": "localhost:8080",
        "basePath": "/api/v1",
        "schemes": ["http", "https"],
        "consumes": ["application/json"],
        "produces": ["application/json"],
        "securityDefinitions": {
            "Bearer": {
                "type": "apiKey",
                "name": "Authorization",
                "in": "header",
                "description": "JWT Authorization header using the Bearer scheme. Example: \"Authorization: Bearer {token}\""
            }
        },
        "tags": tags,
        "paths": {},
        "definitions": {}
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;

    use super::*;

    fn table() -> ServiceTable {
        ServiceTable::with_overrides(&BTreeMap::new())
    }

    fn service(key: &str, doc: Value) -> ServiceDoc {
        ServiceDoc { doc, key: key.to_string() }
    }

    #[test]
    fn health_operations_get_health_tag_and_no_security() {
        let doc = json!({
            "paths": { "/health": { "get": { "responses": {} } } },
            "definitions": {}
        });

        let merged = merge(vec![service("vpn-core", doc)], &table());
        let op = &merged.doc["paths"]["/health"]["get"];

        assert_eq!(op["tags"], json!(["Health"]));
        assert!(op.get("security").is_none());
    }

    #[test]
    fn unsecured_operations_get_default_bearer() {
        let doc = json!({
            "paths": { "/vpn/connect": { "post": { "responses": {} } } },
            "definitions": {}
        });

        let merged = merge(vec![service("vpn", doc)], &table());
        let op = &merged.doc["paths"]["/vpn/connect"]["post"];

        assert_eq!(op["security"], json!([{ "Bearer": [] }]));
        assert_eq!(op["tags"], json!(["VPN"]));
    }

    #[test]
    fn declared_security_is_left_alone() {
        let doc = json!({
            "paths": {
                "/auth/refresh": {
                    "post": { "security": [{ "ApiKey": [] }], "responses": {} }
                }
            },
            "definitions": {}
        });

        let merged = merge(vec![service("auth", doc)], &table());
        let op = &merged.doc["paths"]["/auth/refresh"]["post"];

        assert_eq!(op["security"], json!([{ "ApiKey": [] }]));
    }

    #[test]
    fn unknown_service_keeps_existing_tags() {
        let doc = json!({
            "paths": {
                "/billing/invoices": { "get": { "tags": ["original"], "responses": {} } }
            },
            "definitions": {}
        });

        let merged = merge(vec![service("billing", doc)], &table());
        let op = &merged.doc["paths"]["/billing/invoices"]["get"];

        assert_eq!(op["tags"], json!(["original"]));
        assert_eq!(op["security"], json!([{ "Bearer": [] }]));
    }

    #[test]
    fn definitions_merge_under_renamed_keys() {
        let doc = json!({
            "paths": {},
            "definitions": {
                "PeerConfig": { "type": "object" },
                "protobufAny": { "type": "object" }
            }
        });

        let merged = merge(vec![service("vpn-core", doc)], &table());
        let defs = merged.doc["definitions"].as_object().unwrap();

        assert!(defs.contains_key("vpncorePeerConfig"));
        assert!(defs.contains_key("protobufAny"));
        assert!(!defs.contains_key("PeerConfig"));
    }

    #[test]
    fn first_common_definition_wins() {
        let auth = json!({
            "paths": {},
            "definitions": { "rpcStatus": { "marker": "from-auth" } }
        });
        let vpn = json!({
            "paths": {},
            "definitions": { "rpcStatus": { "marker": "from-vpn" } }
        });

        let merged = merge(vec![service("auth", auth), service("vpn", vpn)], &table());
        assert_eq!(merged.doc["definitions"]["rpcStatus"]["marker"], "from-auth");
    }

    #[test]
    fn path_collisions_are_recorded_and_last_write_wins() {
        let auth = json!({
            "paths": { "/status": { "get": { "operationId": "authStatus", "responses": {} } } },
            "definitions": {}
        });
        let vpn = json!({
            "paths": { "/status": { "get": { "operationId": "vpnStatus", "responses": {} } } },
            "definitions": {}
        });

        let merged = merge(vec![service("auth", auth), service("vpn", vpn)], &table());

        assert_eq!(merged.doc["paths"]["/status"]["get"]["operationId"], "vpnStatus");
        assert_eq!(merged.collisions.len(), 1);
        assert!(merged.collisions.first().unwrap().contains("/status"));
    }

    #[test]
    fn skeleton_carries_one_tag_per_service_plus_health() {
        let merged = merge(Vec::new(), &table());
        let tags = merged.doc["tags"].as_array().unwrap();

        assert_eq!(tags.len(), 10);
        assert_eq!(tags.last().unwrap()["name"], "Health");
    }
}
