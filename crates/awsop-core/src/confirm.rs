//! Confirmation gate for operations that change remote state.

use crate::error::ConfirmError;

/// What is about to happen, for the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmRequest {
    pub operation: &'static str,
    pub target: String,
}

impl std::fmt::Display for ConfirmRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.target.is_empty() {
            write!(f, "{}", self.operation)
        } else {
            write!(f, "{} on '{}'", self.operation, self.target)
        }
    }
}

/// Returns `Ok(true)` to proceed, `Ok(false)` when the user declines.
pub trait ConfirmGate: Send + Sync {
    fn confirm(&self, request: &ConfirmRequest) -> Result<bool, ConfirmError>;
}

/// Always proceeds. Used when the caller forced the operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

impl ConfirmGate for AutoConfirm {
    fn confirm(&self, _request: &ConfirmRequest) -> Result<bool, ConfirmError> {
        Ok(true)
    }
}
