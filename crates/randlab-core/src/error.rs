//! Engine error taxonomy.
//!
//! Degenerate sequences are not errors: they surface as a
//! [`StoppedReason`](crate::generator::StoppedReason). Validating a method
//! without an applicable theorem is not an error either; it yields an
//! inapplicable [`ValidationResult`](crate::validator::ValidationResult).

use thiserror::Error;

/// Errors surfaced verbatim to the caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Missing, non-numeric or out-of-domain input.
    #[error("{0}")]
    InvalidParameter(String),

    /// Sample or test configuration that cannot be evaluated.
    #[error("{0}")]
    InvalidTestInput(String),

    /// The sampler exhausted its trial cap before collecting enough variates.
    #[error(
        "acceptance-rejection stopped after {trials} trials with {accepted} of {requested} values accepted; retry with a smaller count"
    )]
    IterationLimitExceeded {
        requested: usize,
        accepted: usize,
        trials: usize,
    },
}

impl EngineError {
    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidParameter(_) => "invalid_parameter",
            Self::InvalidTestInput(_) => "invalid_test_input",
            Self::IterationLimitExceeded { .. } => "iteration_limit_exceeded",
        }
    }

    pub(crate) fn parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
