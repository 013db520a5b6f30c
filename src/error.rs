//! Error types for sqlforge.

use thiserror::Error;

use crate::transpiler::DialectKind;

/// The main error type for sqlforge operations.
#[derive(Debug, Error)]
pub enum SqlError {
    /// A caller broke a contract of the builder, the context or a template.
    #[error("Invalid operation: {message} ('{identifier}')")]
    InvalidOperation { message: String, identifier: String },

    /// A function or construct has no rendering for the active dialect.
    #[error("Unsupported: {function} has no mapping for the {dialect} dialect")]
    Unsupported {
        function: String,
        dialect: DialectKind,
    },

    /// Failed to tokenize a placeholder template.
    #[error("Template error at position {position}: {message}")]
    Template { position: usize, message: String },

    /// A `{{name}}` token names no registered handler.
    #[error("Unknown placeholder: '{0}'")]
    UnknownPlaceholder(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed configuration file.
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SqlError {
    /// Create an invalid-operation error naming the offending identifier.
    pub fn invalid(message: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
            identifier: identifier.into(),
        }
    }

    /// Create an unsupported-construct error for a dialect.
    pub fn unsupported(function: impl Into<String>, dialect: DialectKind) -> Self {
        Self::Unsupported {
            function: function.into(),
            dialect,
        }
    }

    /// Create a template error at the given position.
    pub fn template(position: usize, message: impl Into<String>) -> Self {
        Self::Template {
            position,
            message: message.into(),
        }
    }

    /// Whether this error is a contract violation by the caller.
    pub fn is_invalid_operation(&self) -> bool {
        matches!(self, Self::InvalidOperation { .. })
    }
}

/// Result type alias for sqlforge operations.
pub type SqlResult<T> = Result<T, SqlError>;
