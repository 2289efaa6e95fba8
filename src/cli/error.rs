//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::{ApplicationError, SourceError};

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl From<SourceError> for CliError {
    fn from(e: SourceError) -> Self {
        CliError::Application(e.into())
    }
}

impl From<crate::domain::TreeError> for CliError {
    fn from(e: crate::domain::TreeError) -> Self {
        CliError::Application(e.into())
    }
}

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Application(e) => match e {
                ApplicationError::Tree(_) => crate::exitcode::DATAERR,
                ApplicationError::Source(SourceError::Io { .. }) => crate::exitcode::NOINPUT,
                ApplicationError::Source(_) => crate::exitcode::DATAERR,
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
            },
        }
    }
}
