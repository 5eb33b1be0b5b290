//! Configuration errors

use super::RescatError;

/// Creates a configuration parse error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> RescatError {
    RescatError::ConfigParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an invalid configuration error
pub fn invalid(message: impl Into<String>) -> RescatError {
    RescatError::ConfigInvalid {
        message: message.into(),
    }
}

/// Creates a configuration read error
pub fn read_failed(path: impl Into<String>, reason: impl Into<String>) -> RescatError {
    RescatError::ConfigReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}
