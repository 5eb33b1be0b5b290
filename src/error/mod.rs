//! Error types and handling for rescat
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`deps`]: Dependency resolution errors
//! - [`plan`]: Install plan contract errors
//! - [`fetch`]: Fetch and checksum errors
//! - [`source`]: Catalog source errors
//! - [`config`]: Configuration errors
//! - [`fs`]: File system errors
//! - [`cache`]: Cache errors
//!
//! "Not found" is deliberately absent: lookups return `Option` or an empty `Vec`.
//! Cache corruption is absorbed inside the cache and never reaches this type.

pub mod cache;
pub mod config;
pub mod deps;
pub mod fetch;
pub mod fs;
pub mod plan;
pub mod source;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for rescat operations
#[derive(Error, Diagnostic, Debug)]
pub enum RescatError {
    // Dependency errors
    #[error("Circular dependency detected: {}", .cycle.join(" -> "))]
    #[diagnostic(
        code(rescat::deps::cycle),
        help("Remove one of the dependency edges in the loop")
    )]
    CycleDetected { cycle: Vec<String> },

    #[error("Dependency '{missing}' (required by '{required_by}') not found in catalog")]
    #[diagnostic(
        code(rescat::deps::unresolved),
        help("Check the dependency identifier or add the missing resource to the catalog")
    )]
    UnresolvedDependency {
        missing: String,
        required_by: String,
    },

    // Plan errors
    #[error("Install plan rejected: {message}")]
    #[diagnostic(code(rescat::plan::contract_violation))]
    PlanContractViolation { message: String },

    // Fetch errors
    #[error("Fetching '{id}' failed after {attempts} attempt(s): {reason}")]
    #[diagnostic(
        code(rescat::fetch::transient),
        help("The transport reported a temporary problem; retrying later may succeed")
    )]
    TransientFetchFailure {
        id: String,
        attempts: u32,
        reason: String,
    },

    #[error("Fetching '{id}' failed: {reason}")]
    #[diagnostic(code(rescat::fetch::permanent))]
    PermanentFetchFailure { id: String, reason: String },

    #[error("Checksum mismatch for '{id}': expected {expected}, got {actual}")]
    #[diagnostic(
        code(rescat::fetch::checksum_mismatch),
        help("The artifact changed upstream; refresh the catalog")
    )]
    ChecksumMismatch {
        id: String,
        expected: String,
        actual: String,
    },

    #[error("Destination rejected for '{id}': {reason}")]
    #[diagnostic(code(rescat::install::destination_rejected))]
    DestinationRejected { id: String, reason: String },

    // Catalog source errors
    #[error("Invalid catalog source {origin}: {message}")]
    #[diagnostic(code(rescat::source::invalid))]
    SourceInvalid { origin: String, message: String },

    #[error("Unknown {kind} field '{tag}'")]
    #[diagnostic(code(rescat::browse::unknown_field), help("Valid fields: {valid}"))]
    UnknownField {
        kind: String,
        tag: String,
        valid: String,
    },

    // Configuration errors
    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(rescat::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(rescat::config::invalid))]
    ConfigInvalid { message: String },

    #[error("Failed to read configuration file: {path}")]
    #[diagnostic(code(rescat::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    // File system errors
    #[error("Failed to read file: {path}: {reason}")]
    #[diagnostic(code(rescat::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(rescat::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(rescat::fs::io_error))]
    IoError { message: String },

    // Cache errors
    #[error("Cache operation failed: {message}")]
    #[diagnostic(code(rescat::cache::operation_failed))]
    CacheOperationFailed { message: String },
}

impl RescatError {
    /// Whether retrying the same operation could succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, RescatError::TransientFetchFailure { .. })
    }
}

impl From<std::io::Error> for RescatError {
    fn from(err: std::io::Error) -> Self {
        RescatError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for RescatError {
    fn from(err: serde_yaml::Error) -> Self {
        RescatError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for RescatError {
    fn from(err: serde_json::Error) -> Self {
        RescatError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, RescatError>;

#[cfg(test)]
mod tests;
