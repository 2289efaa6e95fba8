//! Error conversion helpers for common I/O operations
//!
//! Provides extension traits for cleaner error handling with path context.

use std::io;
use std::path::Path;

use crate::application::SourceError;

/// Extension trait for converting `io::Result` into a [`SourceError`] with context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// std::fs::read_to_string(&path).with_path_context("read document", &path)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> Result<T, SourceError>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> Result<T, SourceError> {
        self.map_err(|source| SourceError::Io {
            context: format!("{}: {}", action, path.display()),
            source,
        })
    }
}
