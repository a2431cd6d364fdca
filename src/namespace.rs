//! Per-service definition renaming and same-service reference rewriting.
//!
//! The rename rule is purely lexical: it never checks that a renamed target
//! exists. Dangling names produced upstream are caught by the resolver pass.

use serde_json::Value;

use crate::scanner;

/// Shared/common namespace prefixes exempt from service renaming.
/// These are the grpc-gateway well-known types (`protobufAny`, `rpcStatus`)
/// that every service document carries a copy of.
const COMMON_PREFIXES: [&str; 2] = ["protobuf", "rpc"];

/// `true` when a definition name belongs to the shared protobuf/rpc namespace.
pub fn is_common(name: &str) -> bool {
    COMMON_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
}

/// Collapse a service key into its definition prefix (`vpn-core` -> `vpncore`).
pub fn service_prefix(service_key: &str) -> String {
    service_key.replace('-', "")
}

/// Apply the collision-avoidance rename rule to a single definition name.
///
/// Common names pass through untouched. A name already starting with the
/// service prefix (case-insensitively) also passes through, so applying the
/// rule twice is a fixed point. Everything else gets the collapsed prefix
/// plus the original name with its first character uppercased.
pub fn rename_definition(service_key: &str, name: &str) -> String {
    if is_common(name) {
        return name.to_string();
    }

    let prefix = service_prefix(service_key);
    if name.to_lowercase().starts_with(&prefix.to_lowercase()) {
        return name.to_string();
    }

    format!("{prefix}{}", capitalize_first(name))
}

/// Rewrite every `#/definitions/` reference inside the service's own
/// structures with the rename rule, so a reference and its target always
/// end up addressing the same renamed name.
pub fn rewrite_service_refs(service_key: &str, doc: &mut Value) {
    scanner::rewrite_references(doc, |name| {
        let renamed = rename_definition(service_key, name);
        (renamed != name).then_some(renamed)
    });
}

/// Uppercase the first character, leaving the rest untouched.
fn capitalize_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first.to_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn prefixes_with_collapsed_service_key() {
        assert_eq!(rename_definition("vpn-core", "PeerConfig"), "vpncorePeerConfig");
    }

    #[test]
    fn capitalizes_lowercase_first_character() {
        assert_eq!(rename_definition("auth", "loginResponse"), "authLoginResponse");
    }

    #[test]
    fn already_prefixed_name_is_a_fixed_point() {
        let once = rename_definition("vpn-core", "PeerConfig");
        let twice = rename_definition("vpn-core", &once);
        assert_eq!(once, twice);
    }

    #[test]
    fn prefix_check_is_case_insensitive() {
        assert_eq!(rename_definition("auth", "AuthSession"), "AuthSession");
    }

    #[test]
    fn common_names_are_never_renamed() {
        assert_eq!(rename_definition("auth", "protobufAny"), "protobufAny");
        assert_eq!(rename_definition("auth", "rpcStatus"), "rpcStatus");
    }

    #[test]
    fn rewrites_references_in_own_paths_and_definitions() {
        let mut doc = json!({
            "paths": {
                "/vpn/connect": {
                    "post": {
                        "responses": {
                            "200": { "schema": { "$ref": "#/definitions/PeerConfig" } }
                        }
                    }
                }
            },
            "definitions": {
                "PeerConfig": {
                    "properties": {
                        "status": { "$ref": "#/definitions/rpcStatus" },
                        "tunnel": { "$ref": "#/definitions/TunnelOptions" }
                    }
                }
            }
        });

        rewrite_service_refs("vpn-core", &mut doc);

        let post = &doc["paths"]["/vpn/connect"]["post"];
        assert_eq!(
            post["responses"]["200"]["schema"]["$ref"],
            "#/definitions/vpncorePeerConfig"
        );
        let props = &doc["definitions"]["PeerConfig"]["properties"];
        assert_eq!(props["status"]["$ref"], "#/definitions/rpcStatus");
        assert_eq!(props["tunnel"]["$ref"], "#/definitions/vpncoreTunnelOptions");
    }
}
