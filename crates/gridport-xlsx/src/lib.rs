//! # gridport-xlsx
//!
//! Modern (Office Open XML) workbook encoder and decoder for gridport.
//!
//! Styles are interned into an [`XlsxStyles`] table when they are defined;
//! the encoder consumes the finished table and never revisits style
//! definitions at save time.

pub mod error;
pub mod reader;
pub mod styles;
pub mod writer;

pub use error::{XlsxError, XlsxResult};
pub use reader::XlsxReader;
pub use styles::XlsxStyles;
pub use writer::XlsxWriter;
