//! Error types and handling for Naoshi migrations

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Naoshi operations
#[derive(Debug, Error)]
pub enum NaoshiError {
    /// The external parser failed or produced unusable output
    #[error("Parse error in '{file}': {message}")]
    Parse { file: PathBuf, message: String },

    /// The parse-tree description could not be turned into a tree
    #[error("Malformed parse tree: {message}")]
    Deserialize { message: String },

    /// A typed accessor was invoked on a child slot of the wrong shape
    #[error("Shape mismatch: expected {expected}, found {found}")]
    ShapeMismatch {
        expected: &'static str,
        found: String,
    },

    /// Migration lookup or execution errors
    #[error("Migration error in '{migration}': {message}")]
    Migration { migration: String, message: String },

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Deserialize,
    ShapeMismatch,
    Migration,
    Config,
    Io,
    Internal,
}

impl NaoshiError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            NaoshiError::Parse { .. } => ErrorKind::Parse,
            NaoshiError::Deserialize { .. } => ErrorKind::Deserialize,
            NaoshiError::ShapeMismatch { .. } => ErrorKind::ShapeMismatch,
            NaoshiError::Migration { .. } => ErrorKind::Migration,
            NaoshiError::Config { .. } => ErrorKind::Config,
            NaoshiError::Io { .. } => ErrorKind::Io,
            NaoshiError::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Check if this error is recoverable (can continue processing other files)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Parse | ErrorKind::ShapeMismatch | ErrorKind::Migration
        )
    }

    /// Create a parse error carrying the offending file
    pub fn parse(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a deserialization error
    pub fn deserialize(message: impl Into<String>) -> Self {
        Self::Deserialize {
            message: message.into(),
        }
    }

    /// Create a shape mismatch error
    pub fn shape_mismatch(expected: &'static str, found: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            expected,
            found: found.into(),
        }
    }

    /// Create a migration error
    pub fn migration(migration: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Migration {
            migration: migration.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for NaoshiError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: PathBuf::new(),
            source: err,
        }
    }
}
