//! Error handling module for drip-grid
//!
//! Engine rejections (occupied cell, out of bounds, ...) are not errors and
//! live in [`crate::engine::Rejection`]. This type covers the real failures:
//! unreadable documents and I/O. Configuration loading reports through
//! `anyhow` instead.

use thiserror::Error;

/// Main error type for drip-grid
#[derive(Error, Debug)]
pub enum DripGridError {
    /// IO errors (reading or writing document files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Document could not be interpreted at all (syntax error, wrong root type)
    #[error("Import failed: {0}")]
    Import(String),
}

/// Result type alias for drip-grid operations
pub type Result<T> = std::result::Result<T, DripGridError>;

impl DripGridError {
    /// Create an import error
    pub fn import(msg: impl Into<String>) -> Self {
        Self::Import(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DripGridError::import("unexpected end of input");
        assert_eq!(err.to_string(), "Import failed: unexpected end of input");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: DripGridError = io_err.into();
        assert!(matches!(err, DripGridError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").expect_err("truncated"); // test: expected error
        let err: DripGridError = json_err.into();
        assert!(matches!(err, DripGridError::Json(_)));
    }
}
