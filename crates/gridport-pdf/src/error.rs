//! Error types for table report building and rendering

use thiserror::Error;

/// Result type for table report operations
pub type PdfResult<T> = std::result::Result<T, PdfError>;

/// Errors that can occur while building, rendering, or saving a table report
#[derive(Debug, Error)]
pub enum PdfError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// PDF object graph error
    #[error("PDF error: {0}")]
    Render(#[from] lopdf::Error),

    /// Header row created twice
    #[error("header row already set; the column schema is fixed")]
    HeaderAlreadySet,

    /// Data row appended before the header exists
    #[error("no header row; create the header before appending rows")]
    HeaderNotSet,

    /// Row value count differs from the fixed column schema
    #[error("row has {actual} values, table has {expected} columns")]
    ColumnCountMismatch { expected: usize, actual: usize },

    /// Save target is not a .pdf path
    #[error("report files require a .pdf extension: {0}")]
    InvalidExtension(String),
}
