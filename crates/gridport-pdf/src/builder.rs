//! Table report builder.
//!
//! [`TableDocumentBuilder`] moves strictly forward: create it with a
//! title, fix the column schema once with [`create_header`], append data
//! rows, then render or save. No operation reopens an earlier stage; the
//! schema in particular cannot change after the header row exists.
//!
//! [`create_header`]: TableDocumentBuilder::create_header

use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{ErrorKind, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use gridport_core::CellValue;
use lopdf::Document;

use crate::error::{PdfError, PdfResult};
use crate::page::PageOrientation;
use crate::render::render_document;
use crate::table::{BorderBox, TableDocument};

/// Incrementally builds a paginated PDF table report.
///
/// ```
/// use gridport_pdf::TableDocumentBuilder;
///
/// let mut report = TableDocumentBuilder::new("Scores");
/// report.create_header(["Name", "Score"])?;
/// report.append_row(vec!["Alice".into(), 95.into()])?;
/// report.append_row(vec!["Bob".into(), 87.into()])?;
/// let pdf = report.render()?;
/// assert_eq!(pdf.get_pages().len(), 1);
/// # Ok::<(), gridport_pdf::PdfError>(())
/// ```
#[derive(Debug)]
pub struct TableDocumentBuilder {
    document: TableDocument,
    saved_path: Option<PathBuf>,
    delete_on_close: bool,
    closed: bool,
}

impl TableDocumentBuilder {
    /// Create a builder for a report with the given title.
    ///
    /// Pages default to landscape; see [`set_orientation`].
    ///
    /// [`set_orientation`]: TableDocumentBuilder::set_orientation
    pub fn new<S: Into<String>>(title: S) -> Self {
        TableDocumentBuilder {
            document: TableDocument::new(title.into()),
            saved_path: None,
            delete_on_close: false,
            closed: false,
        }
    }

    /// Change the page orientation. Takes effect on the next render.
    pub fn set_orientation(&mut self, orientation: PageOrientation) {
        self.document.page_mut().orientation = orientation;
    }

    /// The accumulated table model.
    pub fn document(&self) -> &TableDocument {
        &self.document
    }

    /// Number of columns in the fixed schema; 0 before the header exists.
    pub fn column_count(&self) -> usize {
        self.document.column_count()
    }

    /// Total number of rows, heading included.
    pub fn row_count(&self) -> usize {
        self.document.row_count()
    }

    /// The current outer border extent.
    pub fn border_box(&self) -> BorderBox {
        self.document.border_box()
    }

    /// Fix the column schema and create the heading row.
    ///
    /// The heading row repeats after every page break and renders bold
    /// over a shaded background. Fails with [`PdfError::HeaderAlreadySet`]
    /// on a second call; the schema never changes once fixed.
    pub fn create_header<I, S>(&mut self, titles: I) -> PdfResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.document.row_count() > 0 || self.document.column_count() > 0 {
            return Err(PdfError::HeaderAlreadySet);
        }
        self.document
            .set_header(titles.into_iter().map(Into::into).collect());
        Ok(())
    }

    /// Append one data row.
    ///
    /// Values are formatted to display text as they arrive. Fails with
    /// [`PdfError::HeaderNotSet`] before the header exists and with
    /// [`PdfError::ColumnCountMismatch`] when the value count differs
    /// from the column count; a mismatch leaves the row count unchanged.
    pub fn append_row<I>(&mut self, values: I) -> PdfResult<()>
    where
        I: IntoIterator<Item = CellValue>,
    {
        if self.document.row_count() == 0 {
            return Err(PdfError::HeaderNotSet);
        }
        let values: Vec<CellValue> = values.into_iter().collect();
        let expected = self.document.column_count();
        if values.len() != expected {
            return Err(PdfError::ColumnCountMismatch {
                expected,
                actual: values.len(),
            });
        }
        self.document
            .push_row(values.iter().map(CellValue::display_text).collect());
        Ok(())
    }

    /// Build the PDF object graph for the current table.
    ///
    /// Pure: no I/O, no builder state change. Calling it again re-renders
    /// whatever the table holds then.
    pub fn render(&self) -> PdfResult<Document> {
        render_document(&self.document)
    }

    /// Render and write the report to a file.
    ///
    /// The path must end in `.pdf` (case-insensitive); anything else
    /// fails with [`PdfError::InvalidExtension`] before any rendering
    /// work, so a refused save leaves no partial output behind.
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> PdfResult<()> {
        let path = path.as_ref();
        if !has_pdf_extension(path) {
            return Err(PdfError::InvalidExtension(path.display().to_string()));
        }
        let mut pdf = self.render()?;
        let mut file = File::create(path)?;
        pdf.save_to(&mut file)?;
        self.saved_path = Some(path.to_path_buf());
        Ok(())
    }

    /// Render and write the report into a seekable stream, then rewind
    /// the stream to the start so it is immediately readable.
    pub fn save_to_stream<W: Write + Seek>(&self, writer: &mut W) -> PdfResult<()> {
        let mut pdf = self.render()?;
        pdf.save_to(writer)?;
        writer.seek(SeekFrom::Start(0))?;
        Ok(())
    }

    /// Delete the last saved file when the builder is closed.
    pub fn set_delete_on_close(&mut self, delete: bool) {
        self.delete_on_close = delete;
    }

    /// Release the builder.
    ///
    /// With delete-on-close set, removes the last file [`save`](Self::save)
    /// wrote; a missing file is fine. A failed deletion is logged and
    /// returned. Calling `close` again is a no-op.
    pub fn close(&mut self) -> PdfResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        if self.delete_on_close {
            if let Some(path) = self.saved_path.take() {
                if let Err(err) = remove_if_present(&path) {
                    log::warn!("failed to delete report {} on close: {err}", path.display());
                    return Err(err.into());
                }
            }
        }
        Ok(())
    }
}

impl Drop for TableDocumentBuilder {
    fn drop(&mut self) {
        // close() already logs the failure.
        let _ = self.close();
    }
}

/// Case-insensitive check for a `.pdf` extension.
fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
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

    #[test]
    fn test_header_fixes_schema() {
        let mut builder = TableDocumentBuilder::new("t");
        builder.create_header(["ID", "Name"]).unwrap();
        assert_eq!(builder.column_count(), 2);
        assert_eq!(builder.row_count(), 1);

        let err = builder.create_header(["Other"]).unwrap_err();
        assert!(matches!(err, PdfError::HeaderAlreadySet));
        assert_eq!(builder.column_count(), 2);
    }

    #[test]
    fn test_append_requires_header() {
        let mut builder = TableDocumentBuilder::new("t");
        let err = builder.append_row(vec!["x".into()]).unwrap_err();
        assert!(matches!(err, PdfError::HeaderNotSet));
    }

    #[test]
    fn test_arity_mismatch_leaves_rows_unchanged() {
        let mut builder = TableDocumentBuilder::new("t");
        builder.create_header(["ID", "Name"]).unwrap();
        builder.append_row(vec![1.into(), "A".into()]).unwrap();

        let err = builder.append_row(vec![2.into()]).unwrap_err();
        assert!(matches!(
            err,
            PdfError::ColumnCountMismatch {
                expected: 2,
                actual: 1
            }
        ));
        assert_eq!(builder.row_count(), 2);
    }

    #[test]
    fn test_border_box_grows_with_rows() {
        let mut builder = TableDocumentBuilder::new("t");
        builder.create_header(["ID", "Name"]).unwrap();
        builder.append_row(vec![1.into(), "A".into()]).unwrap();
        builder.append_row(vec![2.into(), "B".into()]).unwrap();

        assert_eq!(builder.row_count(), 3);
        assert_eq!(builder.border_box(), BorderBox { columns: 2, rows: 3 });
        assert!(builder.document().heading_repeats());
    }

    #[test]
    fn test_values_formatted_on_append() {
        let mut builder = TableDocumentBuilder::new("t");
        builder.create_header(["A", "B", "C"]).unwrap();
        builder
            .append_row(vec![95.into(), true.into(), CellValue::Blank])
            .unwrap();

        let row = &builder.document().rows()[1];
        assert_eq!(row.cells, vec!["95", "TRUE", ""]);
    }

    #[test]
    fn test_save_rejects_wrong_extension() {
        let mut builder = TableDocumentBuilder::new("t");
        builder.create_header(["A"]).unwrap();

        for path in ["report.txt", "report", "report.pd"] {
            let err = builder.save(path).unwrap_err();
            assert!(matches!(err, PdfError::InvalidExtension(_)), "{path}");
        }
    }

    #[test]
    fn test_extension_check_is_case_insensitive() {
        assert!(has_pdf_extension(Path::new("Report.PDF")));
        assert!(has_pdf_extension(Path::new("report.pdf")));
        assert!(!has_pdf_extension(Path::new("report.pdfx")));
        assert!(!has_pdf_extension(Path::new("report")));
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut builder = TableDocumentBuilder::new("t");
        builder.set_delete_on_close(true);
        builder.close().unwrap();
        builder.close().unwrap();
    }
}
