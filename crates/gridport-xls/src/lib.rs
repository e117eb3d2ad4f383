//! # gridport-xls
//!
//! Legacy (BIFF8) workbook encoder and decoder for gridport.
//!
//! The legacy format stores the workbook as a single `Workbook` stream
//! inside an OLE compound file. Styles are compiled into their binary XF
//! images when a named style is defined; the encoder serializes the
//! finished [`XlsStyles`] table into FONT/FORMAT/XF records.

pub mod biff;
pub mod error;
pub mod reader;
pub mod styles;
pub mod writer;

pub use error::{XlsError, XlsResult};
pub use reader::XlsReader;
pub use styles::XlsStyles;
pub use writer::XlsWriter;
