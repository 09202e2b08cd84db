//! Constructor methods for EvalError

use super::types::EvalError;

impl EvalError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: None,
        }
    }

    /// Create a configuration error with context
    pub fn config_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create a failure for one attempt of a model call
    pub fn transient(message: impl Into<String>) -> Self {
        Self::TransientCall {
            message: message.into(),
            status_code: None,
        }
    }

    /// Create a failure for one attempt that received an HTTP error status
    pub fn transient_with_status(message: impl Into<String>, status_code: u16) -> Self {
        Self::TransientCall {
            message: message.into(),
            status_code: Some(status_code),
        }
    }

    /// Wrap the last attempt's description once retries are exhausted
    pub fn terminal_call(attempts: u32, message: impl Into<String>) -> Self {
        Self::TerminalCall {
            attempts,
            message: message.into(),
        }
    }

    /// Create a corrupt line error
    pub fn corrupt_line(line_number: usize, message: impl Into<String>) -> Self {
        Self::CorruptLine {
            line_number,
            message: message.into(),
        }
    }

    /// Create an IO error with the offending path
    pub fn io_with_path(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Create a new storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a new internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
