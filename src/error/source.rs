//! Catalog source errors

use super::RescatError;

/// Creates an invalid source error
pub fn invalid(origin: impl Into<String>, message: impl Into<String>) -> RescatError {
    RescatError::SourceInvalid {
        origin: origin.into(),
        message: message.into(),
    }
}

/// Creates an unknown sort/filter field error
pub fn unknown_field(kind: &str, tag: impl Into<String>, valid: &[&str]) -> RescatError {
    RescatError::UnknownField {
        kind: kind.to_string(),
        tag: tag.into(),
        valid: valid.join(", "),
    }
}
