use crate::domain::model::{Format, Violation};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("IO error on {target}: {source}")]
    IoError {
        target: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {format} input: {message}")]
    ParseError { format: Format, message: String },

    #[error("Validation error: {} violation(s) found", .violations.len())]
    ValidationError { violations: Vec<Violation> },

    #[error("Transform error in step '{step}' (record {record}): {message}")]
    TransformError {
        step: String,
        record: usize,
        message: String,
    },

    #[error("Serialization error for {format} output: {message}")]
    SerializationError { format: Format, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

pub type Result<T> = std::result::Result<T, RunnerError>;

/// Top-level failure class. Each maps to its own process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Parse,
    Validation,
    Transform,
    Io,
    Serialization,
    Config,
}

impl ErrorCategory {
    pub fn exit_code(&self) -> u8 {
        match self {
            ErrorCategory::Parse => 1,
            ErrorCategory::Validation => 2,
            ErrorCategory::Transform => 3,
            ErrorCategory::Io => 4,
            ErrorCategory::Serialization => 5,
            ErrorCategory::Config => 6,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Parse => "parse",
            ErrorCategory::Validation => "validation",
            ErrorCategory::Transform => "transform",
            ErrorCategory::Io => "io",
            ErrorCategory::Serialization => "serialization",
            ErrorCategory::Config => "config",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl RunnerError {
    pub fn io(target: impl Into<String>, source: std::io::Error) -> Self {
        RunnerError::IoError {
            target: target.into(),
            source,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        RunnerError::ConfigError {
            message: message.into(),
        }
    }

    pub fn invalid_config(field: &str, reason: impl fmt::Display) -> Self {
        RunnerError::ConfigError {
            message: format!("{}: {}", field, reason),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            RunnerError::IoError { .. } => ErrorCategory::Io,
            RunnerError::ParseError { .. } => ErrorCategory::Parse,
            RunnerError::ValidationError { .. } => ErrorCategory::Validation,
            RunnerError::TransformError { .. } => ErrorCategory::Transform,
            RunnerError::SerializationError { .. } => ErrorCategory::Serialization,
            RunnerError::ConfigError { .. } => ErrorCategory::Config,
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.category().exit_code()
    }

    pub fn violations(&self) -> &[Violation] {
        match self {
            RunnerError::ValidationError { violations } => violations,
            _ => &[],
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            RunnerError::IoError { .. } => {
                "Check that the input exists and is readable, and that the output directory is writable"
            }
            RunnerError::ParseError { .. } => {
                "Check the input syntax, or pass --format if the extension does not match the content"
            }
            RunnerError::ValidationError { .. } => {
                "Fix every listed field so the input matches the declared schema"
            }
            RunnerError::TransformError { .. } => {
                "The input is valid but holds a value combination the transform does not support"
            }
            RunnerError::SerializationError { .. } => {
                "Try the other output format, or remove values it cannot represent"
            }
            RunnerError::ConfigError { .. } => {
                "Check the command line and the --config file against the documented options"
            }
        }
    }

    /// One-line summary that includes every violation for validation failures.
    pub fn user_friendly_message(&self) -> String {
        match self {
            RunnerError::ValidationError { violations } => {
                let details: Vec<String> = violations.iter().map(|v| v.to_string()).collect();
                format!("Input failed validation: {}", details.join("; "))
            }
            other => other.to_string(),
        }
    }
}
