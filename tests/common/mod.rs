//! Common test utilities for rescat integration tests

use std::path::PathBuf;
use tempfile::TempDir;

/// Catalog used across integration tests
///
/// `web-server -> api-client -> auth`, plus a categorised frontend group.
pub const CATALOG_YAML: &str = r"
resources:
  - id: auth
    name: Auth Hook
    type: hook
    description: Checks credentials before tool use
    source: { location: sources/auth.json }
    updated_at: 100
  - id: api-client
    name: API Client
    type: command
    description: Calls the backend API
    source: { location: sources/api-client.md }
    dependencies: [auth]
    updated_at: 300
  - id: web-server
    name: Web Server
    type: agent
    description: Serves the frontend and proxies API calls
    source: { location: sources/web-server.md }
    dependencies: [api-client]
    updated_at: 200
  - id: dev/frontend/react-expert
    name: React Expert
    type: agent
    description: React component and hooks specialist
    source: { location: sources/react-expert.md }
  - id: dev/frontend/vue-expert
    name: Vue Expert
    type: agent
    description: Vue single-file component specialist
    source: { location: sources/vue-expert.md }
  - id: dev/backend/go-expert
    name: Go Expert
    type: agent
    description: Go services and concurrency
    source: { location: sources/go-expert.md }
";

/// Scratch directory holding a catalog, its sources and an install root
pub struct TestCatalog {
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Directory containing `catalog.yaml` and `sources/`
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TestCatalog {
    /// Catalog from [`CATALOG_YAML`] with every source file present
    pub fn new() -> Self {
        Self::with_catalog(CATALOG_YAML)
    }

    /// Catalog from `yaml`; sources for the standard ids are created
    pub fn with_catalog(yaml: &str) -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        let catalog = Self { temp, path };

        catalog.write_file("catalog.yaml", yaml);
        for name in [
            "auth.json",
            "api-client.md",
            "web-server.md",
            "react-expert.md",
            "vue-expert.md",
            "go-expert.md",
        ] {
            catalog.write_file(&format!("sources/{name}"), &format!("content of {name}"));
        }
        catalog
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.path.join("catalog.yaml")
    }

    /// Install root inside the scratch directory
    pub fn project(&self) -> PathBuf {
        self.path.join("project")
    }

    /// Write a file relative to the scratch directory
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    pub fn remove_source(&self, name: &str) {
        std::fs::remove_file(self.path.join("sources").join(name))
            .expect("Failed to remove source");
    }

    /// Read a file relative to the install root
    pub fn read_installed(&self, path: &str) -> String {
        std::fs::read_to_string(self.project().join(path)).expect("Failed to read file")
    }

    pub fn installed(&self, path: &str) -> bool {
        self.project().join(path).exists()
    }
}

impl Default for TestCatalog {
    fn default() -> Self {
        Self::new()
    }
}
