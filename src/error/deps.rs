//! Dependency errors

use super::RescatError;

/// Creates a cycle error from the identifiers forming the loop
///
/// The path is expected to close on itself (`a -> b -> a`).
pub fn cycle(path: Vec<String>) -> RescatError {
    RescatError::CycleDetected { cycle: path }
}

/// Creates an unresolved dependency error
pub fn unresolved(missing: impl Into<String>, required_by: impl Into<String>) -> RescatError {
    RescatError::UnresolvedDependency {
        missing: missing.into(),
        required_by: required_by.into(),
    }
}
