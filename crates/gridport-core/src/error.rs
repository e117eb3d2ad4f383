//! Error types for gridport-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in gridport-core
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid sheet name
    #[error("Invalid sheet name: {0}")]
    InvalidSheetName(String),

    /// Duplicate sheet name
    #[error("Sheet name already exists: {0}")]
    DuplicateSheet(String),

    /// Sheet not found by name
    #[error("Unknown sheet: {0}")]
    UnknownSheet(String),

    /// Sheet index out of bounds
    #[error("Sheet index {0} out of bounds (count: {1})")]
    SheetOutOfBounds(usize, usize),

    /// Row index that no append ever produced
    #[error("Row {0} has not been created")]
    UnknownRow(u32),

    /// Row index beyond the variant's limit
    #[error("Row index {0} exceeds the format limit ({1})")]
    RowLimitExceeded(u32, u32),

    /// Column index beyond the variant's limit
    #[error("Column index {0} exceeds the format limit ({1})")]
    ColumnLimitExceeded(u16, u16),
}
