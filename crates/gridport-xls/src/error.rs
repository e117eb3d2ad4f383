//! Error types for the legacy-format encoder

use thiserror::Error;

/// Result type for legacy-format operations
pub type XlsResult<T> = std::result::Result<T, XlsError>;

/// Errors that can occur while encoding or decoding the legacy format
#[derive(Debug, Error)]
pub enum XlsError {
    /// IO error (also covers CFB errors which use std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid file format
    #[error("Invalid workbook format: {0}")]
    InvalidFormat(String),

    /// Unsupported BIFF version
    #[error("Unsupported BIFF version: {0}")]
    UnsupportedVersion(String),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Core error
    #[error("Core error: {0}")]
    Core(#[from] gridport_core::Error),
}
