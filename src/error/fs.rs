//! File system errors

use std::path::Path;

use super::RescatError;

/// Creates a file read error
pub fn read_failed(path: &Path, reason: impl ToString) -> RescatError {
    RescatError::FileReadFailed {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Creates a file write error
pub fn write_failed(path: &Path, reason: impl ToString) -> RescatError {
    RescatError::FileWriteFailed {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Creates an IO error
pub fn io_error(message: impl Into<String>) -> RescatError {
    RescatError::IoError {
        message: message.into(),
    }
}
