//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent malformed domain data.
/// They abort the build or expansion that hit them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("invalid children specification under '{key}': expected a list or a producer, found {found}")]
    InvalidChildrenSpecification { key: String, found: &'static str },
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;
