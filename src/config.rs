use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::Error;

/// Default directory holding per-service Swagger documents.
pub const DEFAULT_SWAGGER_DIR: &str = "docs/swagger";

/// Default filename of the unified output document.
pub const UNIFIED_FILE_NAME: &str = "unified-api.json";

/// Extra or overriding metadata for one service key.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ServiceOverride {
    /// Tag description shown in the unified document.
    #[serde(default)]
    pub description: String,
    /// Display name used for operation tags.
    pub name: String,
}

/// Project configuration loaded from `.apimerge.toml`.
/// Every key is optional; defaults reproduce the stock pipeline.
pub struct Config {
    corrections: BTreeMap<String, String>,
    output: Option<PathBuf>,
    services: BTreeMap<String, ServiceOverride>,
    swagger_dir: Option<PathBuf>,
}

/// Raw TOML structure for `.apimerge.toml`.
#[derive(serde::Deserialize)]
struct ApimergeTomlConfig {
    #[serde(default)]
    corrections: BTreeMap<String, String>,
    output: Option<PathBuf>,
    #[serde(default)]
    services: BTreeMap<String, ServiceOverride>,
    swagger_dir: Option<PathBuf>,
}

impl Config {
    /// Load config from `.apimerge.toml` in the given root directory.
    /// Returns defaults if the file doesn't exist. Returns an error if the
    /// file exists but is malformed — never silently falls back to defaults
    /// when the user wrote a config file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(".apimerge.toml");
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::defaults()),
            Err(e) => return Err(Error::Io(e)),
        };

        let raw: ApimergeTomlConfig = toml::from_str(&content)?;
        Ok(Self {
            corrections: raw.corrections,
            output: raw.output,
            services: raw.services,
            swagger_dir: raw.swagger_dir,
        })
    }

    /// Stock configuration used when no `.apimerge.toml` exists.
    fn defaults() -> Self {
        Self {
            corrections: BTreeMap::new(),
            output: None,
            services: BTreeMap::new(),
            swagger_dir: None,
        }
    }

    /// User-supplied correction entries, overlaid on the built-in table.
    pub fn corrections(&self) -> &BTreeMap<String, String> {
        &self.corrections
    }

    /// Where the unified document lives. Defaults to
    /// `<swagger_dir>/unified-api.json` when not configured.
    pub fn output(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.swagger_dir().join(UNIFIED_FILE_NAME))
    }

    /// User-supplied service-table overrides and additions.
    pub fn services(&self) -> &BTreeMap<String, ServiceOverride> {
        &self.services
    }

    /// The directory scanned for `*.swagger.json` files.
    pub fn swagger_dir(&self) -> PathBuf {
        self.swagger_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SWAGGER_DIR))
    }
}
