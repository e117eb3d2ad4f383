//! Prelude module - common imports for gridport users
//!
//! ```rust
//! use gridport::prelude::*;
//! ```

pub use crate::{
    // Style types
    Alignment,
    BorderEdge,
    BorderLineStyle,
    BorderStyle,
    // Cell types
    CellValue,
    Color,
    // Error types
    Error,
    FillStyle,
    FontStyle,
    // Format variant
    FormatVariant,
    HorizontalAlignment,
    NumberFormat,
    // Table report types
    PageOrientation,
    PdfError,
    Result,
    // Session types
    RowRef,
    Style,
    StyleRegistry,
    TableDocumentBuilder,
    Underline,
    VerticalAlignment,
    // Main types
    Workbook,
    WorkbookSession,
    Worksheet,

    // I/O types
    XlsReader,
    XlsWriter,
    XlsxReader,
    XlsxWriter,
};
