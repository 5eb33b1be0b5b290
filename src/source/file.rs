//! Catalog document on disk
//!
//! ```yaml
//! resources:
//!   - id: dev/frontend/react-expert
//!     type: agent
//!     source:
//!       location: agents/react-expert.md
//!     dependencies: [linters/eslint]
//! ```
//!
//! Files ending in `.json` are parsed as JSON, anything else as YAML.
//! Relative `file` locations are resolved against the document's directory.

use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use serde::{Deserialize, Serialize};

use super::{CatalogSource, validate_records};
use crate::domain::{Resource, TransportScheme};
use crate::error::{Result, fs, source};
use crate::hash;

/// Top-level shape of a catalog file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub resources: Vec<Resource>,
}

impl CatalogDocument {
    pub fn from_yaml(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    pub fn from_json(content: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }
}

#[derive(Debug, Clone)]
pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_json(&self) -> bool {
        self.path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
    }

    fn parse(&self, content: &str) -> Result<CatalogDocument> {
        let origin = self.origin();
        if self.is_json() {
            CatalogDocument::from_json(content).map_err(|e| source::invalid(origin, e.to_string()))
        } else {
            CatalogDocument::from_yaml(content).map_err(|e| source::invalid(origin, e.to_string()))
        }
    }

    /// Resolve relative file locations against the document's directory
    fn anchor(&self, mut resource: Resource) -> Resource {
        let Some(base) = self.path.parent() else {
            return resource;
        };
        let descriptor = &mut resource.source;
        if descriptor.transport_scheme() == TransportScheme::File {
            let local = Path::new(descriptor.local_path());
            if local.is_relative() {
                descriptor.location = base.join(local).to_string_lossy().into_owned();
            }
        }
        resource
    }
}

impl CatalogSource for FileCatalogSource {
    fn origin(&self) -> String {
        self.path.display().to_string()
    }

    fn fingerprint(&self) -> Result<String> {
        let metadata = std::fs::metadata(&self.path).map_err(|e| fs::read_failed(&self.path, e))?;
        let modified = metadata
            .modified()
            .ok()
            .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
            .map_or(0, |elapsed| elapsed.as_nanos());

        let identity = format!("{}\0{}\0{}", self.path.display(), metadata.len(), modified);
        Ok(hash::hash_bytes(identity.as_bytes()))
    }

    fn load(&self) -> Result<Vec<Resource>> {
        let content =
            std::fs::read_to_string(&self.path).map_err(|e| fs::read_failed(&self.path, e))?;
        let document = self.parse(&content)?;

        validate_records(&self.origin(), &document.resources)?;

        Ok(document
            .resources
            .into_iter()
            .map(|resource| self.anchor(resource))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ResourceType;
    use crate::error::RescatError;
    use tempfile::TempDir;

    const CATALOG: &str = r"
resources:
  - id: auth
    type: hook
    source:
      location: hooks/auth.json
  - id: api-client
    type: command
    source:
      location: commands/api-client.md
    dependencies: [auth]
  - id: web-server
    type: server
    source:
      location: https://example.com/web-server.json
    dependencies:
      client: api-client
";

    fn write(temp: &TempDir, name: &str, content: &str) -> FileCatalogSource {
        let path = temp.path().join(name);
        std::fs::write(&path, content).unwrap();
        FileCatalogSource::new(path)
    }

    #[test]
    fn test_load_yaml() {
        let temp = TempDir::new().unwrap();
        let source = write(&temp, "catalog.yaml", CATALOG);
        let records = source.load().unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].resource_type, ResourceType::Hook);
        assert_eq!(records[2].dependency_ids().collect::<Vec<_>>(), vec!["api-client"]);
    }

    #[test]
    fn test_relative_locations_anchored_to_document() {
        let temp = TempDir::new().unwrap();
        let source = write(&temp, "catalog.yaml", CATALOG);
        let records = source.load().unwrap();

        let expected = temp.path().join("hooks/auth.json");
        assert_eq!(Path::new(&records[0].source.location), expected);
        assert_eq!(records[2].source.location, "https://example.com/web-server.json");
    }

    #[test]
    fn test_load_json() {
        let temp = TempDir::new().unwrap();
        let json = r#"{"resources": [{"id": "a", "type": "agent", "source": {"location": "/abs/a.md"}}]}"#;
        let source = write(&temp, "catalog.json", json);
        let records = source.load().unwrap();
        assert_eq!(records[0].source.location, "/abs/a.md");
    }

    #[test]
    fn test_malformed_document_is_source_invalid() {
        let temp = TempDir::new().unwrap();
        let source = write(&temp, "catalog.yaml", "resources: [{id: a, type: plugin}]");
        assert!(matches!(source.load(), Err(RescatError::SourceInvalid { .. })));
    }

    #[test]
    fn test_missing_file() {
        let source = FileCatalogSource::new("/nonexistent/catalog.yaml");
        assert!(matches!(source.load(), Err(RescatError::FileReadFailed { .. })));
        assert!(source.fingerprint().is_err());
    }

    #[test]
    fn test_fingerprint_changes_with_content() {
        let temp = TempDir::new().unwrap();
        let source = write(&temp, "catalog.yaml", CATALOG);
        let before = source.fingerprint().unwrap();
        assert_eq!(before, source.fingerprint().unwrap());

        std::fs::write(source.path(), format!("{CATALOG}\n# trailing comment\n")).unwrap();
        assert_ne!(before, source.fingerprint().unwrap());
    }
}
