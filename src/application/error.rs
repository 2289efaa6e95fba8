//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::TreeError;

/// Errors raised while turning external input into domain nodes.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("unsupported value for '{key}': {found}")]
    Unsupported { key: String, found: String },

    #[error("operation failed: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Tree(#[from] TreeError),

    #[error("{0}")]
    Source(#[from] SourceError),

    #[error("config error: {message}")]
    Config { message: String },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
