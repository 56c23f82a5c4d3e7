//! Query error types

/// Query failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// Malformed selector text; carries the offending offset
    #[error("invalid selector {selector:?}: {message} (at offset {position})")]
    InvalidSelector {
        selector: String,
        position: usize,
        message: String,
    },

    /// `first`/`last` called on an empty result set
    #[error("query matched no nodes")]
    NoMatches,

    /// A type expectation on `first`/`last` failed
    #[error("expected a node of type {expected}, found {actual}")]
    WrongType { expected: String, actual: String },
}
