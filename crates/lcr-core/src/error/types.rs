//! Core error types

use std::fmt;
use thiserror::Error;

/// Result type alias for evaluation operations
pub type EvalResult<T> = Result<T, EvalError>;

/// Discriminant of an [`EvalError`], used when a failure is turned into a
/// result record or a progress message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Config,
    TransientCall,
    TerminalCall,
    CorruptLine,
    Io,
    Json,
    Storage,
    Internal,
    Cancelled,
}

impl ErrorKind {
    /// Stable name written into `error` fields and progress output
    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::Config => "ConfigError",
            ErrorKind::TransientCall => "TransientCallFailure",
            ErrorKind::TerminalCall => "TerminalCallFailure",
            ErrorKind::CorruptLine => "CorruptLine",
            ErrorKind::Io => "IoError",
            ErrorKind::Json => "JsonError",
            ErrorKind::Storage => "StorageError",
            ErrorKind::Internal => "InternalError",
            ErrorKind::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Main error type
#[derive(Error, Debug, Clone)]
pub enum EvalError {
    /// Fatal configuration problem (missing model, credential, base URL,
    /// unusable header width, ...)
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// A single attempt of a model call failed; may be retried
    #[error("{message}")]
    TransientCall {
        message: String,
        status_code: Option<u16>,
    },

    /// All attempts of a model call failed
    #[error("Chat completion failed after {attempts} attempts: {message}")]
    TerminalCall { attempts: u32, message: String },

    /// Malformed line found while scanning an existing result file
    #[error("Corrupt line {line_number}: {message}")]
    CorruptLine { line_number: usize, message: String },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json { message: String },

    /// Result store invariant violations
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// A task died without producing a result (panic inside a worker)
    #[error("Internal error: {message}")]
    Internal { message: String },

    /// Work was cancelled before it could run
    #[error("Operation was cancelled")]
    Cancelled,
}

impl EvalError {
    /// The taxonomy bucket of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            EvalError::Config { .. } => ErrorKind::Config,
            EvalError::TransientCall { .. } => ErrorKind::TransientCall,
            EvalError::TerminalCall { .. } => ErrorKind::TerminalCall,
            EvalError::CorruptLine { .. } => ErrorKind::CorruptLine,
            EvalError::Io { .. } => ErrorKind::Io,
            EvalError::Json { .. } => ErrorKind::Json,
            EvalError::Storage { .. } => ErrorKind::Storage,
            EvalError::Internal { .. } => ErrorKind::Internal,
            EvalError::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Whether another attempt of the same call may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, EvalError::TransientCall { .. })
    }

    /// `"<KindName>: <message>"`, the form stored in `error` fields
    pub fn to_record_string(&self) -> String {
        format!("{}: {}", self.kind(), self)
    }
}

impl From<std::io::Error> for EvalError {
    fn from(err: std::io::Error) -> Self {
        EvalError::Io {
            message: err.to_string(),
            path: None,
        }
    }
}

impl From<serde_json::Error> for EvalError {
    fn from(err: serde_json::Error) -> Self {
        EvalError::Json {
            message: err.to_string(),
        }
    }
}
