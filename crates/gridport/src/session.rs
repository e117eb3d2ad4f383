//! Workbook session: one document, one format variant, one style registry.
//!
//! A [`WorkbookSession`] owns the in-memory workbook, the registry whose
//! styles are materialized for the session's variant, and the disposal
//! state. The variant is picked exactly once, at construction or when an
//! existing file is sniffed open; afterwards every save dispatches to the
//! matching encoder without any further format decisions.

use std::fs::{self, File};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use gridport_core::{CellValue, FormatVariant, Style, StyleId, Workbook};
use gridport_xls::{XlsReader, XlsWriter};
use gridport_xlsx::{XlsxReader, XlsxWriter};

use crate::error::{Error, Result};
use crate::registry::{StyleRegistry, VariantStyles};

/// A handle to one appended row.
///
/// Returned by [`WorkbookSession::add_row`]; copyable, so a caller can
/// hold several row handles and fill their cells in any order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRef {
    sheet: usize,
    row: u32,
}

impl RowRef {
    /// Index of the sheet this row belongs to.
    pub fn sheet_index(&self) -> usize {
        self.sheet
    }

    /// Zero-based row index within the sheet.
    pub fn row_index(&self) -> u32 {
        self.row
    }
}

/// An export session for one spreadsheet document.
///
/// ```
/// use gridport::{FormatVariant, WorkbookSession};
///
/// let mut session = WorkbookSession::new(FormatVariant::Modern);
/// session.add_sheet("Report")?;
///
/// let header = session.add_row("Report")?;
/// session.add_cell(header, 0, "Name")?;
/// session.add_cell(header, 1, "Score")?;
///
/// let row = session.add_row("Report")?;
/// session.add_cell(row, 0, "Alice")?;
/// session.add_cell(row, 1, 95)?;
///
/// assert_eq!(header.row_index(), 0);
/// assert_eq!(row.row_index(), 1);
/// # Ok::<(), gridport::Error>(())
/// ```
#[derive(Debug)]
pub struct WorkbookSession {
    workbook: Workbook,
    registry: StyleRegistry,
    path: Option<PathBuf>,
    delete_on_close: bool,
    closed: bool,
}

impl WorkbookSession {
    /// Create an empty session for the given variant.
    pub fn new(variant: FormatVariant) -> Self {
        Self::from_workbook(Workbook::new(variant), None)
    }

    /// Reopen an existing workbook file.
    ///
    /// The variant is sniffed from the file signature (ZIP package means
    /// modern, CFB container means legacy), falling back to the path
    /// extension. Sheet names, row structure, and cell values are
    /// restored; style definitions are not recoverable from disk and must
    /// be defined again.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path)?;

        let mut header = [0u8; 8];
        let got = file.read(&mut header)?;
        let variant = FormatVariant::from_signature(&header[..got])
            .or_else(|| FormatVariant::from_path(path))
            .ok_or_else(|| Error::UnknownFormat(path.display().to_string()))?;
        file.seek(SeekFrom::Start(0))?;

        let workbook = match variant {
            FormatVariant::Modern => XlsxReader::read(file)?,
            FormatVariant::Legacy => XlsReader::read(file)?,
        };
        Ok(Self::from_workbook(workbook, Some(path.to_path_buf())))
    }

    /// Reopen a workbook from a seekable stream with an explicit variant.
    pub fn open_stream<R: Read + Seek>(reader: R, variant: FormatVariant) -> Result<Self> {
        let workbook = match variant {
            FormatVariant::Modern => XlsxReader::read(reader)?,
            FormatVariant::Legacy => XlsReader::read(reader)?,
        };
        Ok(Self::from_workbook(workbook, None))
    }

    fn from_workbook(workbook: Workbook, path: Option<PathBuf>) -> Self {
        let registry = StyleRegistry::new(workbook.variant());
        WorkbookSession {
            workbook,
            registry,
            path,
            delete_on_close: false,
            closed: false,
        }
    }

    /// The variant this session was created for.
    pub fn variant(&self) -> FormatVariant {
        self.workbook.variant()
    }

    /// The in-memory workbook.
    pub fn workbook(&self) -> &Workbook {
        &self.workbook
    }

    /// The session's style registry.
    pub fn styles(&self) -> &StyleRegistry {
        &self.registry
    }

    /// Add an empty sheet, returning its index.
    ///
    /// Sheet names are unique ignoring case; a clash is
    /// [`DuplicateSheet`](gridport_core::Error::DuplicateSheet).
    pub fn add_sheet<S: Into<String>>(&mut self, name: S) -> Result<usize> {
        Ok(self.workbook.add_sheet(name)?)
    }

    /// Append a row to a named sheet.
    ///
    /// The row cursor starts at 0 on first use and advances by exactly
    /// one per call, per sheet. Fails with
    /// [`UnknownSheet`](gridport_core::Error::UnknownSheet) when no sheet
    /// has that name.
    pub fn add_row(&mut self, sheet_name: &str) -> Result<RowRef> {
        let sheet = self.workbook.sheet_index(sheet_name)?;
        let row = self.workbook.append_row(sheet)?;
        Ok(RowRef { sheet, row })
    }

    /// Write an unstyled value at a column of a previously appended row.
    ///
    /// Intermediate blank cells are created as needed, so a sparse write
    /// still yields a contiguous physical row.
    pub fn add_cell<V: Into<CellValue>>(&mut self, row: RowRef, col: u16, value: V) -> Result<()> {
        self.workbook
            .set_cell(row.sheet, row.row, col, value.into(), 0)?;
        Ok(())
    }

    /// Write a value with a named style.
    ///
    /// An unknown style name is not an error: the value is written and
    /// the cell stays unstyled. Styling is cosmetic; a typo in a style
    /// name must never cost the data.
    pub fn add_cell_styled<V: Into<CellValue>>(
        &mut self,
        row: RowRef,
        col: u16,
        value: V,
        style_name: &str,
    ) -> Result<()> {
        let style = match self.registry.resolve(style_name) {
            Some(id) => id,
            None => {
                log::debug!("style {style_name:?} not defined; writing the cell unstyled");
                StyleId::default()
            }
        };
        self.workbook
            .set_cell(row.sheet, row.row, col, value.into(), style)?;
        Ok(())
    }

    /// Define or redefine a named style.
    ///
    /// The style is materialized for this session's variant immediately;
    /// see [`StyleRegistry::define`].
    pub fn define_style<S: Into<String>>(&mut self, name: S, style: &Style) {
        self.registry.define(name, style);
    }

    /// Finalize and write the workbook to a file.
    ///
    /// Runs the column autosize pass over every sheet, then encodes for
    /// the session's variant. Any path is accepted; the on-disk format
    /// follows the variant, not the file name.
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.workbook.autosize_all();
        match self.registry.variant_styles() {
            VariantStyles::Modern(styles) => XlsxWriter::write_file(&self.workbook, styles, path)?,
            VariantStyles::Legacy(styles) => XlsWriter::write_file(&self.workbook, styles, path)?,
        }
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    /// Finalize and write the workbook into a seekable stream, then
    /// rewind the stream to the start so it is immediately readable.
    pub fn save_to_stream<W: Write + Seek>(&mut self, writer: &mut W) -> Result<()> {
        self.workbook.autosize_all();
        match self.registry.variant_styles() {
            VariantStyles::Modern(styles) => {
                XlsxWriter::write(&self.workbook, styles, &mut *writer)?
            }
            VariantStyles::Legacy(styles) => XlsWriter::write(&self.workbook, styles, &mut *writer)?,
        }
        writer.seek(SeekFrom::Start(0))?;
        Ok(())
    }

    /// Delete the backing file when the session is closed.
    pub fn set_delete_on_close(&mut self, delete: bool) {
        self.delete_on_close = delete;
    }

    /// Release the session.
    ///
    /// With delete-on-close set, removes the last opened or saved file; a
    /// missing file is fine. A failed deletion is logged and returned.
    /// Calling `close` again is a no-op.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        if self.delete_on_close {
            if let Some(path) = self.path.take() {
                if let Err(err) = remove_if_present(&path) {
                    log::warn!(
                        "failed to delete workbook {} on close: {err}",
                        path.display()
                    );
                    return Err(err.into());
                }
            }
        }
        Ok(())
    }
}

impl Drop for WorkbookSession {
    fn drop(&mut self) {
        // close() already logs the failure.
        let _ = self.close();
    }
}

/// Delete a file, treating a missing file as success.
fn remove_if_present(path: &Path) -> std::io::Result<()> {
    match fs::remove_file(path) {
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridport_core::Error as CoreError;

    #[test]
    fn test_row_cursor_starts_at_zero() {
        let mut session = WorkbookSession::new(FormatVariant::Modern);
        session.add_sheet("Data").unwrap();

        let r0 = session.add_row("Data").unwrap();
        let r1 = session.add_row("Data").unwrap();
        assert_eq!(r0.row_index(), 0);
        assert_eq!(r1.row_index(), 1);
        assert_eq!(r0.sheet_index(), 0);
    }

    #[test]
    fn test_duplicate_sheet() {
        let mut session = WorkbookSession::new(FormatVariant::Modern);
        session.add_sheet("Data").unwrap();
        let err = session.add_sheet("data").unwrap_err();
        assert!(matches!(err, Error::Core(CoreError::DuplicateSheet(_))));
    }

    #[test]
    fn test_unknown_sheet() {
        let mut session = WorkbookSession::new(FormatVariant::Modern);
        let err = session.add_row("Missing").unwrap_err();
        assert!(matches!(err, Error::Core(CoreError::UnknownSheet(_))));
    }

    #[test]
    fn test_unknown_style_writes_unstyled() {
        let mut session = WorkbookSession::new(FormatVariant::Modern);
        session.add_sheet("Data").unwrap();
        let row = session.add_row("Data").unwrap();
        session
            .add_cell_styled(row, 0, "value", "no such style")
            .unwrap();

        let sheet = session.workbook().sheet(0).unwrap();
        assert_eq!(sheet.value(0, 0).as_text(), Some("value"));
        let cell = sheet.row(0).unwrap().cell(0).unwrap();
        assert_eq!(cell.style, StyleId::default());
    }

    #[test]
    fn test_styled_cell_gets_interned_id() {
        let mut session = WorkbookSession::new(FormatVariant::Modern);
        session.define_style("header", &Style::new().bold(true));
        session.add_sheet("Data").unwrap();
        let row = session.add_row("Data").unwrap();
        session.add_cell_styled(row, 0, "Name", "header").unwrap();

        let cell = session
            .workbook()
            .sheet(0)
            .unwrap()
            .row(0)
            .unwrap()
            .cell(0)
            .unwrap();
        assert_eq!(cell.style, 1);
    }

    #[test]
    fn test_close_is_idempotent_without_file() {
        let mut session = WorkbookSession::new(FormatVariant::Legacy);
        session.set_delete_on_close(true);
        session.close().unwrap();
        session.close().unwrap();
    }
}
