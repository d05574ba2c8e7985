//! Error types for hostlist.
//!
//! This module defines all error types that can occur while expanding host
//! lists, reading host files and loading configuration.

/// The main error type for hostlist operations.
#[derive(Debug, thiserror::Error)]
pub enum HostlistError {
    /// A second `[` was opened before the previous one was closed
    #[error("Illegal host list '{input}': duplicate brackets")]
    DuplicateBracket { input: String },

    /// A `]` without a matching `[`, or an input ending inside a bracket
    #[error("Illegal host list '{input}': isolated bracket")]
    IsolatedBracket { input: String },

    /// A range boundary inside brackets could not be used
    #[error("Invalid range boundary in '{token}': {reason}")]
    InvalidRangeBoundary { token: String, reason: String },

    /// A bracket unit that is neither a number nor a `start-end` range
    #[error("Invalid bracket unit '{token}': expected a number or a start-end range")]
    InvalidUnitToken { token: String },

    /// Expanding the input would produce more hosts than allowed
    #[error("Expanding '{token}' exceeds the limit of {limit} hosts")]
    ExpansionLimitExceeded { token: String, limit: usize },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid configuration value
    #[error("Invalid configuration for '{field}': {message}")]
    InvalidConfig { field: String, message: String },

    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    ConfigNotFound(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HostlistError {
    /// Create a duplicate bracket error
    pub fn duplicate_bracket<S: Into<String>>(input: S) -> Self {
        Self::DuplicateBracket {
            input: input.into(),
        }
    }

    /// Create an isolated bracket error
    pub fn isolated_bracket<S: Into<String>>(input: S) -> Self {
        Self::IsolatedBracket {
            input: input.into(),
        }
    }

    /// Create an invalid range boundary error
    pub fn invalid_range_boundary<S: Into<String>, R: Into<String>>(token: S, reason: R) -> Self {
        Self::InvalidRangeBoundary {
            token: token.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid unit token error
    pub fn invalid_unit_token<S: Into<String>>(token: S) -> Self {
        Self::InvalidUnitToken {
            token: token.into(),
        }
    }

    /// Create a config error with a message
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create an invalid config error
    pub fn invalid_config<S: Into<String>, M: Into<String>>(field: S, message: M) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Check if this error was caused by malformed host list input
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::DuplicateBracket { .. }
                | Self::IsolatedBracket { .. }
                | Self::InvalidRangeBoundary { .. }
                | Self::InvalidUnitToken { .. }
        )
    }
}

/// Result type alias for hostlist operations
pub type Result<T> = std::result::Result<T, HostlistError>;
