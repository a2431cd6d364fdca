/// Crate-level error types for apimerge diagnostics.
use std::path::PathBuf;

/// All errors carry enough context to produce a useful diagnostic without a
/// debugger. Each variant names the file or reason for failure.
///
/// Per-document defects (unparseable input, missing sections, unresolved
/// references) are deliberately NOT here: those are recovered locally and
/// surfaced as warnings. Only conditions that make the run meaningless
/// escalate to this type.
#[allow(clippy::error_impl_error, reason = "crate-internal error type in binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The config file exists but cannot be parsed for editing.
    #[error("config parse failed: {}: {reason}", file.display())]
    ConfigParseFailed {
        /// Path to the config file.
        file: PathBuf,
        /// Description of the parse failure.
        reason: String,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// A required JSON document exists but cannot be parsed.
    #[error("invalid json: {}: {reason}", file.display())]
    Json {
        /// Path to the unparseable document.
        file: PathBuf,
        /// Description of the parse failure.
        reason: String,
    },

    /// The directory of per-service documents cannot be listed.
    #[error("swagger directory not found: {}", path.display())]
    SwaggerDirNotFound {
        /// Path to the missing directory.
        path: PathBuf,
    },

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// The unified document does not exist on disk.
    #[error("unified document not found: {}", path.display())]
    UnifiedNotFound {
        /// Path to the missing document.
        path: PathBuf,
    },

    /// No configured correction matches the given name.
    #[error("unknown correction: `{name}`")]
    UnknownCorrection {
        /// Correction key that was not found.
        name: String,
    },
}
