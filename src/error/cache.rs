//! Cache errors

use super::RescatError;

/// Creates a cache operation failed error
pub fn operation_failed(message: impl Into<String>) -> RescatError {
    RescatError::CacheOperationFailed {
        message: message.into(),
    }
}
