//! # gridport-core
//!
//! Core data structures for the gridport tabular-export library.
//!
//! This crate provides the types shared by the format backends and the
//! session facade:
//! - [`CellValue`] - Typed cell values (blank, boolean, number, text, datetime)
//! - [`Style`] - Logical cell formatting (font, fill, borders, alignment)
//! - [`Workbook`], [`Worksheet`], [`Row`] - The append-oriented document model
//! - [`FormatVariant`] - The legacy/modern output-format tag fixed at creation
//!
//! ## Example
//!
//! ```rust
//! use gridport_core::{CellValue, FormatVariant, Workbook};
//!
//! let mut workbook = Workbook::new(FormatVariant::Modern);
//! let sheet = workbook.add_sheet("Report").unwrap();
//!
//! let row = workbook.append_row(sheet).unwrap();
//! workbook.set_cell(sheet, row, 0, CellValue::from("Hello"), 0).unwrap();
//! workbook.set_cell(sheet, row, 1, CellValue::from(42.0), 0).unwrap();
//! ```

pub mod error;
pub mod row;
pub mod style;
pub mod value;
pub mod variant;
pub mod workbook;
pub mod worksheet;

// Re-exports for convenience
pub use error::{Error, Result};
pub use row::{Cell, Row};
pub use value::CellValue;
pub use variant::FormatVariant;
pub use workbook::Workbook;
pub use worksheet::Worksheet;

// Re-export all style types for convenience
pub use style::{
    Alignment, BorderEdge, BorderLineStyle, BorderStyle, Color, FillStyle, FontStyle,
    HorizontalAlignment, NumberFormat, Style, StyleId, Underline, VerticalAlignment,
};

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
