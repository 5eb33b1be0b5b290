//! Command helper utilities

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rescat::catalog::Catalog;
use rescat::config::Config;
use rescat::error::{Result, config as config_error};
use rescat::operations::CatalogService;
use rescat::source::FileCatalogSource;

/// Service plus the catalog loaded for this invocation
pub struct Session {
    pub service: CatalogService,
    pub catalog: Arc<Catalog>,
}

/// Load the explicit configuration file, or discover one
///
/// An explicitly named file must exist; a discovered one may not.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) if !path.exists() => Err(config_error::read_failed(
            path.display().to_string(),
            "file not found",
        )),
        Some(path) => Config::load(path),
        None => Config::discover(),
    }
}

pub fn service(config: Option<&Path>) -> Result<CatalogService> {
    CatalogService::new(load_config(config)?)
}

/// Build the service and load `catalog` into it
pub fn open(catalog: &Path, config: Option<&Path>) -> Result<Session> {
    let service = service(config)?;
    let catalog = service.load(&FileCatalogSource::new(catalog))?;
    Ok(Session { service, catalog })
}

/// Resolve the install root from an optional argument
///
/// If a path is provided, use it. Otherwise, use the current directory.
pub fn resolve_dest(dest: Option<PathBuf>) -> Result<PathBuf> {
    match dest {
        Some(path) => Ok(path),
        None => Ok(std::env::current_dir()?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_missing_config_is_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.yaml");
        assert!(load_config(Some(&missing)).is_err());
    }

    #[test]
    fn test_explicit_dest_wins() {
        let dest = resolve_dest(Some(PathBuf::from("/tmp/project"))).unwrap();
        assert_eq!(dest, PathBuf::from("/tmp/project"));
    }
}
