//! # gridport
//!
//! Exports structured tabular data to spreadsheet workbooks and
//! paginated PDF reports behind one mutation protocol.
//!
//! ## Features
//!
//! - One add-sheet / add-row / add-cell API over two spreadsheet formats
//!   (modern OOXML `.xlsx` and legacy BIFF8 `.xls`), chosen once per
//!   session
//! - Named styles materialized per format variant at definition time
//! - Column autosizing before every save
//! - Reopening existing files with format sniffing
//! - Paginated PDF table reports with repeating header rows and
//!   continuous border boxes
//!
//! ## Example
//!
//! ```rust
//! use gridport::prelude::*;
//!
//! let mut session = WorkbookSession::new(FormatVariant::Modern);
//! session.define_style("header", &Style::new().bold(true));
//! session.add_sheet("Report")?;
//!
//! let row = session.add_row("Report")?;
//! session.add_cell_styled(row, 0, "Name", "header")?;
//! session.add_cell_styled(row, 1, "Score", "header")?;
//!
//! let row = session.add_row("Report")?;
//! session.add_cell(row, 0, "Alice")?;
//! session.add_cell(row, 1, 95)?;
//!
//! // session.save("scores.xlsx")?;
//! # Ok::<(), gridport::Error>(())
//! ```

pub mod error;
pub mod prelude;
pub mod registry;
pub mod session;

// Re-export session types
pub use error::{Error, Result};
pub use registry::StyleRegistry;
pub use session::{RowRef, WorkbookSession};

// Re-export core types
pub use gridport_core::{
    // Style types
    Alignment,
    BorderEdge,
    BorderLineStyle,
    BorderStyle,
    // Cell types
    CellValue,
    Color,
    FillStyle,
    FontStyle,
    // Format variant
    FormatVariant,
    HorizontalAlignment,
    NumberFormat,
    Style,
    StyleId,
    Underline,
    VerticalAlignment,
    // Model types
    Workbook,
    Worksheet,
    // Constants
    MAX_SHEET_NAME_LEN,
};

// Re-export table report types
pub use gridport_pdf::{
    BorderBox, PageOrientation, PageSetup, PdfError, TableColumn, TableDocument,
    TableDocumentBuilder, TableRow,
};

// Re-export I/O types for callers that drive the encoders directly
pub use gridport_xls::{XlsError, XlsReader, XlsWriter};
pub use gridport_xlsx::{XlsxError, XlsxReader, XlsxWriter};
