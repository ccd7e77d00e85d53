//! Error taxonomy for session evaluation.
//!
//! Three tiers, by how much of the session survives:
//! - [`DiagnosticWarning`]: advisory only, the statement still lowers.
//! - [`SemanticError`]: the statement is rejected, the module is unchanged
//!   and the session continues.
//! - [`FatalConstructionError`]: the module can no longer be edited.

use thiserror::Error;

use basic_shell_parser::ParseError;

/// Non-fatal advisory collected on the session and drained by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticWarning {
    pub message: String,
}

impl DiagnosticWarning {
    pub fn new(message: impl Into<String>) -> Self {
        DiagnosticWarning {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for DiagnosticWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// A statement that parsed but cannot be lowered.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SemanticError {
    /// The left side of `=` did not resolve to a variable. A line like
    /// `12 = 5.8` reads as an equality check on two constants, which has
    /// no effect, so it is rejected rather than lowered.
    #[error("invalid assignment target: {0}")]
    InvalidAssignmentTarget(String),

    #[error("incompatible types: {0}")]
    IncompatibleTypes(String),

    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("call to `{name}` expects {expected} argument(s), got {got}")]
    CallArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    /// A closing statement with no matching open construct, or the wrong
    /// construct on top of the stack.
    #[error("{0}")]
    UnmatchedCloser(String),

    #[error("`Next {found}` does not close the loop over `{expected}`")]
    MismatchedLoopVariable { expected: String, found: String },

    #[error("division by zero")]
    DivisionByZero,
}

impl SemanticError {
    pub fn invalid_target(detail: impl Into<String>) -> Self {
        SemanticError::InvalidAssignmentTarget(detail.into())
    }

    pub fn incompatible(detail: impl Into<String>) -> Self {
        SemanticError::IncompatibleTypes(detail.into())
    }

    pub fn unsupported(detail: impl Into<String>) -> Self {
        SemanticError::UnsupportedOperation(detail.into())
    }

    pub fn unmatched(detail: impl Into<String>) -> Self {
        SemanticError::UnmatchedCloser(detail.into())
    }
}

/// The module itself is broken or closed; no further statement can be
/// accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FatalConstructionError {
    #[error("no pending block: the session has already been finished")]
    NoPendingBlock,
}

/// Anything `eval` can report.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShellError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("{0}")]
    Semantic(#[from] SemanticError),

    #[error("fatal: {0}")]
    Fatal(#[from] FatalConstructionError),
}

pub type ShellResult<T> = Result<T, ShellError>;
