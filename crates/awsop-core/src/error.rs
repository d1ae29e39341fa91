//! Error taxonomy for a single operation invocation.
//!
//! Validation failures are raised before any service call. Service failures
//! carry the invoker's own error type untouched. Cancellation and a declined
//! confirmation are *not* errors; they are reported through
//! [`crate::runner::InvocationStatus`].

use thiserror::Error;

/// Input or selector problems detected before the operation starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required parameter '{0}'")]
    MissingParameter(&'static str),

    #[error("one of the parameters {} is required", .0.join(", "))]
    MissingOneOf(Vec<&'static str>),

    #[error("'{field}' is not a field of the {operation} response (available: {})", .available.join(", "))]
    UnknownField {
        operation: &'static str,
        field: String,
        available: Vec<&'static str>,
    },

    #[error("'{parameter}' is not a parameter of {operation}")]
    UnknownParameter {
        operation: &'static str,
        parameter: String,
    },

    #[error("selector must not be empty")]
    EmptySelector,

    #[error("{0} and {1} cannot be used together")]
    Conflict(&'static str, &'static str),

    #[error("invalid value for '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
}

impl ValidationError {
    pub fn invalid(parameter: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            parameter,
            reason: reason.into(),
        }
    }
}

/// A response or input could not be turned into an output value.
#[derive(Debug, Error)]
#[error("failed to project {operation} output: {source}")]
pub struct ProjectionError {
    pub operation: &'static str,
    #[source]
    pub source: serde_json::Error,
}

/// Writing to the output sink failed.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("output write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("output encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// The confirmation gate could not obtain an answer.
#[derive(Debug, Error)]
#[error("confirmation failed: {0}")]
pub struct ConfirmError(pub String);

/// Everything that can abort an invocation, generic over the invoker's
/// error type.
#[derive(Debug, Error)]
pub enum InvocationError<E>
where
    E: std::error::Error + 'static,
{
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Service(E),

    #[error(transparent)]
    Projection(#[from] ProjectionError),

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error(transparent)]
    Confirm(#[from] ConfirmError),
}

impl<E> InvocationError<E>
where
    E: std::error::Error + 'static,
{
    /// True for failures detected before anything was sent.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
