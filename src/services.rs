//! Known services: display metadata for tags and the vocabulary heuristic
//! that guesses which service a definition name belongs to.

use std::collections::BTreeMap;

use crate::config::ServiceOverride;

/// Display metadata for one backend service.
#[derive(Debug, Clone)]
pub struct ServiceEntry {
    /// Tag description shown in the unified document.
    pub description: String,
    /// Service key as it appears in filenames (`vpn-core`).
    pub key: String,
    /// Display name used for operation tags (`VPNCore`).
    pub name: String,
}

/// Built-in service metadata, in tag-list order.
const BUILTIN_SERVICES: [(&str, &str, &str); 9] = [
    ("auth", "Auth", "Authentication and authorization services"),
    ("analytics", "Analytics", "Analytics and metrics collection"),
    ("server", "Servers", "VPN server management"),
    ("server-manager", "ServerManager", "VPN server management"),
    ("vpn", "VPN", "VPN connection and configuration"),
    ("vpn-core", "VPNCore", "VPN core functionality"),
    ("dpi", "DPI", "Deep Packet Inspection bypass"),
    ("dpi-bypass", "DPIBypass", "Deep Packet Inspection bypass"),
    ("notifications", "Notifications", "Notification services"),
];

/// The full service table consulted for tags and display names.
pub struct ServiceTable {
    entries: Vec<ServiceEntry>,
}

impl ServiceTable {
    /// Built-ins overlaid with config `[services]` entries. An override for
    /// a known key replaces its metadata in place; unknown keys are appended
    /// in sorted order.
    pub fn with_overrides(overrides: &BTreeMap<String, ServiceOverride>) -> Self {
        let mut entries: Vec<ServiceEntry> = BUILTIN_SERVICES
            .iter()
            .map(|(key, name, description)| {
                let entry = overrides.get(*key);
                ServiceEntry {
                    description: entry
                        .map_or_else(|| (*description).to_string(), |o| o.description.clone()),
                    key: (*key).to_string(),
                    name: entry.map_or_else(|| (*name).to_string(), |o| o.name.clone()),
                }
            })
            .collect();

        for (key, entry) in overrides {
            if BUILTIN_SERVICES.iter().any(|(builtin, _, _)| builtin == key) {
                continue;
            }
            entries.push(ServiceEntry {
                description: entry.description.clone(),
                key: key.clone(),
                name: entry.name.clone(),
            });
        }

        Self { entries }
    }

    /// The display name for a service key, if the key is known.
    pub fn display_name(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.name.as_str())
    }

    /// Iterate entries in tag-list order.
    pub fn entries(&self) -> impl Iterator<Item = &ServiceEntry> {
        self.entries.iter()
    }
}

/// Guess which service a definition name belongs to from its vocabulary.
///
/// The order of checks is load-bearing: it decides which service wins an
/// ambiguous name, so new categories go at the end, never in the middle.
pub fn detect_service(def_name: &str) -> Option<&'static str> {
    let lower = def_name.to_lowercase();

    if lower.contains("auth") || lower.contains("user") {
        return Some("auth");
    }
    if lower.contains("analytics") || lower.contains("metric") {
        return Some("analytics");
    }
    if lower.contains("server") {
        if lower.contains("manager") {
            return Some("server-manager");
        }
        return Some("server");
    }
    if lower.contains("vpn") || lower.contains("tunnel") || lower.contains("peer") {
        return Some("vpn");
    }
    if lower.contains("dpi") || lower.contains("bypass") {
        return Some("dpi");
    }
    if lower.contains("notification") || lower.contains("template") {
        return Some("notifications");
    }

    None
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::config::ServiceOverride;

    #[test]
    fn detects_each_vocabulary_category() {
        assert_eq!(detect_service("LoginUserRequest"), Some("auth"));
        assert_eq!(detect_service("MetricBatch"), Some("analytics"));
        assert_eq!(detect_service("ServerStatus"), Some("server"));
        assert_eq!(detect_service("ServerManagerEvent"), Some("server-manager"));
        assert_eq!(detect_service("TunnelOptions"), Some("vpn"));
        assert_eq!(detect_service("BypassProfile"), Some("dpi"));
        assert_eq!(detect_service("TemplateBody"), Some("notifications"));
        assert_eq!(detect_service("Pagination"), None);
    }

    #[test]
    fn earlier_categories_win_ambiguous_names() {
        // Contains both "user" (auth) and "notification" (notifications);
        // auth is checked first.
        assert_eq!(
            detect_service("NotificationsServiceUpdateUserPreferencesBody"),
            Some("auth")
        );
    }

    #[test]
    fn overrides_replace_and_extend_builtins() {
        let mut overrides = BTreeMap::new();
        overrides.insert(
            "auth".to_string(),
            ServiceOverride { description: "Identity".to_string(), name: "Identity".to_string() },
        );
        overrides.insert(
            "billing".to_string(),
            ServiceOverride { description: String::new(), name: "Billing".to_string() },
        );

        let table = ServiceTable::with_overrides(&overrides);
        assert_eq!(table.display_name("auth"), Some("Identity"));
        assert_eq!(table.display_name("billing"), Some("Billing"));
        assert_eq!(table.display_name("vpn"), Some("VPN"));
        assert_eq!(table.display_name("unknown"), None);
    }
}
