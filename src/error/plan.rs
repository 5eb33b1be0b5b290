//! Install plan contract errors

use super::RescatError;

/// Creates a plan contract violation error
pub fn contract_violation(message: impl Into<String>) -> RescatError {
    RescatError::PlanContractViolation {
        message: message.into(),
    }
}
