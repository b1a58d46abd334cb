//! Error types for field validation
//!
//! A failed constraint is not an error: it is an [`Outcome`](crate::Outcome)
//! with `valid == false`. Errors here are configuration problems with a
//! field declaration and are raised to the caller of `validate`.

use thiserror::Error;

/// Configuration errors raised while validating a field
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A `pattern` attribute or `regexp` option does not compile
    #[error("invalid pattern in `{source_name}`: {error}")]
    InvalidPattern {
        source_name: String,
        #[source]
        error: regex::Error,
    },

    /// The `type` option names no entry in the type catalog
    #[error("unknown declared type `{0}`")]
    UnknownType(String),

    /// An option is present but cannot be decoded into the expected shape
    #[error("invalid value for option `{name}`: {reason}")]
    InvalidOption { name: String, reason: String },

    /// No message template under the given dotted key
    #[error("no message for key `{0}`")]
    MissingMessage(String),

    /// Engine configuration could not be parsed
    #[error("configuration error: {0}")]
    Config(String),
}

impl ValidationError {
    pub(crate) fn invalid_option(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for validation operations
pub type Result<T> = std::result::Result<T, ValidationError>;
