//! Document Loader: reads per-service Swagger documents from a directory.

use std::path::Path;

use serde_json::Value;
use walkdir::WalkDir;

use crate::error::Error;
use crate::types::ServiceDoc;

/// Filename suffix marking a per-service Swagger document.
pub const SWAGGER_SUFFIX: &str = ".swagger.json";

/// Load all usable service documents from `dir`, sorted by filename so a
/// merge run is deterministic. A document that cannot be read or parsed, or
/// that lacks `paths`/`definitions`, is skipped with a warning on stderr;
/// only an unlistable directory is fatal.
///
/// # Errors
///
/// Returns `Error::SwaggerDirNotFound` if `dir` is not a directory.
pub fn load_service_docs(dir: &Path) -> Result<Vec<ServiceDoc>, Error> {
    if !dir.is_dir() {
        return Err(Error::SwaggerDirNotFound { path: dir.to_path_buf() });
    }

    let mut docs = Vec::new();

    for entry in WalkDir::new(dir)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
    {
        let path = entry.path();
        let Some(key) = service_key(path) else {
            continue;
        };

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("warning: skipping {}: {e}", path.display());
                continue;
            },
        };

        let doc: Value = match serde_json::from_str(&content) {
            Ok(d) => d,
            Err(e) => {
                eprintln!("warning: skipping {}: invalid json: {e}", path.display());
                continue;
            },
        };

        if doc.get("paths").is_none() || doc.get("definitions").is_none() {
            eprintln!("warning: skipping {key}: missing paths or definitions");
            continue;
        }

        docs.push(ServiceDoc { doc, key });
    }

    Ok(docs)
}

/// Extract the service key from a `<key>.swagger.json` filename.
fn service_key(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let key = name.strip_suffix(SWAGGER_SUFFIX)?;
    (!key.is_empty()).then(|| key.to_string())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn extracts_service_key_from_filename() {
        assert_eq!(
            service_key(Path::new("docs/vpn-core.swagger.json")),
            Some("vpn-core".to_string())
        );
        assert_eq!(service_key(Path::new("docs/unified-api.json")), None);
        assert_eq!(service_key(Path::new("docs/.swagger.json")), None);
    }

    #[test]
    fn skips_unparseable_and_incomplete_documents() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "auth.swagger.json", r#"{"paths": {}, "definitions": {}}"#);
        write(tmp.path(), "broken.swagger.json", "{ not json");
        write(tmp.path(), "incomplete.swagger.json", r#"{"paths": {}}"#);
        write(tmp.path(), "notes.txt", "ignored entirely");

        let docs = load_service_docs(tmp.path()).unwrap();
        let keys: Vec<&str> = docs.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(keys, ["auth"]);
    }

    #[test]
    fn documents_load_in_filename_order() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "vpn.swagger.json", r#"{"paths": {}, "definitions": {}}"#);
        write(tmp.path(), "auth.swagger.json", r#"{"paths": {}, "definitions": {}}"#);

        let docs = load_service_docs(tmp.path()).unwrap();
        let keys: Vec<&str> = docs.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(keys, ["auth", "vpn"]);
    }

    #[test]
    fn missing_directory_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope");
        assert!(load_service_docs(&missing).is_err());
    }
}
