//! Error types for the solver core.

use thiserror::Error;

/// Errors raised when a rig is constructed or configured incorrectly.
///
/// All of these signal programmer error and are raised before any state is
/// mutated. Failing to converge on a target is not an error: the solver
/// reports the achieved distance through its return value and leaves the
/// caller to decide whether the result is close enough.
#[derive(Error, Debug)]
pub enum IkError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid constraint: {0}")]
    InvalidConstraint(String),

    #[error("illegal state: {0}")]
    IllegalState(String),

    #[error("{what} index {index} is out of range ({count} available)")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        count: usize,
    },
}

/// Result type alias for solver operations
pub type Result<T> = std::result::Result<T, IkError>;
