//! Fetch errors

use super::RescatError;

/// Creates an error for a fetch that kept failing transiently until the retry budget ran out
pub fn transient(id: impl Into<String>, attempts: u32, reason: impl Into<String>) -> RescatError {
    RescatError::TransientFetchFailure {
        id: id.into(),
        attempts,
        reason: reason.into(),
    }
}

/// Creates a non-retryable fetch error
pub fn permanent(id: impl Into<String>, reason: impl Into<String>) -> RescatError {
    RescatError::PermanentFetchFailure {
        id: id.into(),
        reason: reason.into(),
    }
}

/// Creates a checksum mismatch error
pub fn checksum_mismatch(
    id: impl Into<String>,
    expected: impl Into<String>,
    actual: impl Into<String>,
) -> RescatError {
    RescatError::ChecksumMismatch {
        id: id.into(),
        expected: expected.into(),
        actual: actual.into(),
    }
}

/// Creates a destination rejection error
pub fn destination_rejected(id: impl Into<String>, reason: impl Into<String>) -> RescatError {
    RescatError::DestinationRejected {
        id: id.into(),
        reason: reason.into(),
    }
}
