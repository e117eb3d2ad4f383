//! Error types for workbook sessions

use thiserror::Error;

/// Result type for session operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in a workbook session
///
/// Validation errors from the model (duplicate sheets, unknown sheets,
/// limits) surface as [`Error::Core`] with their message unchanged.
/// Encoder and I/O failures are fatal and wrapped, never retried.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Workbook model error
    #[error("{0}")]
    Core(#[from] gridport_core::Error),

    /// Modern (xlsx) encoder error
    #[error("xlsx encoder: {0}")]
    Xlsx(#[from] gridport_xlsx::XlsxError),

    /// Legacy (xls) encoder error
    #[error("xls encoder: {0}")]
    Xls(#[from] gridport_xls::XlsError),

    /// Table report error
    #[error("pdf report: {0}")]
    Pdf(#[from] gridport_pdf::PdfError),

    /// The file is neither a ZIP package nor a CFB container
    #[error("unrecognized workbook format: {0}")]
    UnknownFormat(String),
}
