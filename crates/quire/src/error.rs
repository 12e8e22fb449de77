//! Error types for the quire crate.

use std::path::PathBuf;

use quire_template::ExpandError;
use thiserror::Error;

/// Errors raised while loading site files or expanding strictly.
///
/// Missing template data is never an error; see [`quire_template`].
#[derive(Debug, Error)]
pub enum QuireError {
    /// A file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration could not be parsed.
    #[error("invalid configuration ({origin}): {message}")]
    Config { origin: String, message: String },

    /// Strict expansion went past the nesting limit.
    #[error(transparent)]
    Expand(#[from] ExpandError),
}

impl QuireError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        QuireError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for quire operations.
pub type Result<T> = std::result::Result<T, QuireError>;
