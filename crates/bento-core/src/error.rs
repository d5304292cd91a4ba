//! Error types and handling for bento orchestration

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for bento operations
#[derive(Debug, Error)]
pub enum BentoError {
    /// Wrong type or missing required field in the configuration document
    #[error("Invalid configuration at '{path}': {message}")]
    ConfigShape { path: String, message: String },

    /// A recognized-but-invalid value (unknown severity, adapter or formatter name)
    #[error("Invalid value at '{path}': {message}")]
    ConfigValue { path: String, message: String },

    /// No recognized configuration file between the start directory and the
    /// filesystem root
    #[error("No configuration file found from '{start}' upward")]
    ConfigNotFound { start: PathBuf },

    /// Malformed path-pattern syntax
    #[error("Invalid pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    /// Adapter invocation failure, recovered per task
    #[error("Adapter '{linter}' failed: {message}")]
    Adapter { linter: String, message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Formatter output errors
    #[error("Formatter error: {message}")]
    Formatter { message: String },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ConfigShape,
    ConfigValue,
    ConfigNotFound,
    Pattern,
    Adapter,
    Io,
    Formatter,
    Internal,
}

impl BentoError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            BentoError::ConfigShape { .. } => ErrorKind::ConfigShape,
            BentoError::ConfigValue { .. } => ErrorKind::ConfigValue,
            BentoError::ConfigNotFound { .. } => ErrorKind::ConfigNotFound,
            BentoError::Pattern { .. } => ErrorKind::Pattern,
            BentoError::Adapter { .. } => ErrorKind::Adapter,
            BentoError::Io { .. } => ErrorKind::Io,
            BentoError::Formatter { .. } => ErrorKind::Formatter,
            BentoError::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Check if this error is recoverable (the run can continue for other files).
    ///
    /// Adapter failures are converted into synthetic FATAL notices per task;
    /// everything else aborts before or during the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Adapter)
    }

    /// Create a configuration shape error
    pub fn config_shape(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigShape {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a configuration value error
    pub fn config_value(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValue {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a pattern compilation error
    pub fn pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Pattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Create an adapter invocation error
    pub fn adapter(linter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Adapter {
            linter: linter.into(),
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

    /// Create a formatter error
    pub fn formatter(message: impl Into<String>) -> Self {
        Self::Formatter {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for BentoError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: PathBuf::new(),
            source: err,
        }
    }
}
