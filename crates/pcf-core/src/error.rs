//! Error types for the PCF canonicalizer
//!
//! All fallible operations return `Result<T, Error>`.
//! The first error met at any depth is returned as-is; no partial
//! canonical string is ever produced.

use thiserror::Error;

/// Canonicalization error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A schema node is not an object, array, string or number
    #[error("Invalid schema type: {0}")]
    InvalidSchemaType(String),

    /// A `"size"` string is not a base-10 unsigned integer
    #[error("Invalid size value: fixed size ought to be a number greater than zero: {0:?}")]
    InvalidSizeValue(String),

    /// Schema nesting is deeper than the configured limit
    #[error("Depth limit exceeded: schema nests deeper than {limit} levels")]
    DepthLimitExceeded { limit: usize },

    /// Schema text is not valid JSON
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ParseError(err.to_string())
    }
}

/// Result type alias for PCF operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_offending_text() {
        let err = Error::InvalidSizeValue("abc".into());
        assert!(err.to_string().contains("\"abc\""));
    }

    #[test]
    fn test_depth_limit_display() {
        let err = Error::DepthLimitExceeded { limit: 8 };
        assert_eq!(
            err.to_string(),
            "Depth limit exceeded: schema nests deeper than 8 levels"
        );
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::ParseError(_)));
    }
}
