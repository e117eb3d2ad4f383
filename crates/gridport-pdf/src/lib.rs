//! # gridport-pdf
//!
//! Paginated PDF table reports for gridport.
//!
//! A [`TableDocumentBuilder`] accumulates a titled table with a fixed
//! column schema and renders it as an A4 report: repeated bold heading
//! row over shading, grid borders, a border box around every page's
//! slice of the table, and page-number footers. Rendering produces a
//! `lopdf::Document`; saving validates the `.pdf` extension before any
//! work happens.

pub mod builder;
pub mod error;
pub mod page;
pub mod table;

mod layout;
mod render;

pub use builder::TableDocumentBuilder;
pub use error::{PdfError, PdfResult};
pub use page::{PageOrientation, PageSetup};
pub use table::{BorderBox, TableColumn, TableDocument, TableRow};
