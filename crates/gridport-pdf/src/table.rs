//! Table report model.
//!
//! A [`TableDocument`] holds everything the renderer needs: the title, the
//! page setup, a column schema fixed once by the header row, the appended
//! rows, and the border box covering them. Mutation goes through
//! [`TableDocumentBuilder`](crate::builder::TableDocumentBuilder), which
//! enforces the build order; this module only stores the result.

use crate::page::PageSetup;

/// One column of the fixed schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableColumn {
    /// Column title, shown in the heading row.
    pub title: String,
}

/// One rendered row: display text per column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// Display text, one entry per column.
    pub cells: Vec<String>,
    /// Heading rows render bold over a shaded background and repeat at
    /// the top of every page after a page break.
    pub heading: bool,
}

/// The outer border extent of the table.
///
/// Spans columns `[0, columns)` and rows `[0, rows)` with the top-left
/// corner fixed at the first row and column. Recomputed from the current
/// counts every time a row is appended, never patched incrementally, so
/// the box can't drift out of sync with the table it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderBox {
    /// Number of columns covered.
    pub columns: usize,
    /// Number of rows covered, heading included.
    pub rows: usize,
}

impl BorderBox {
    fn covering(columns: usize, rows: usize) -> Self {
        BorderBox { columns, rows }
    }
}

/// A complete table report, ready to render.
#[derive(Debug, Clone)]
pub struct TableDocument {
    title: String,
    page: PageSetup,
    columns: Vec<TableColumn>,
    rows: Vec<TableRow>,
    border_box: BorderBox,
}

impl TableDocument {
    /// Create an empty document with the given title.
    pub(crate) fn new(title: String) -> Self {
        TableDocument {
            title,
            page: PageSetup::default(),
            columns: Vec::new(),
            rows: Vec::new(),
            border_box: BorderBox::covering(0, 0),
        }
    }

    /// The report title, rendered above the table on the first page.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The page setup.
    pub fn page(&self) -> &PageSetup {
        &self.page
    }

    pub(crate) fn page_mut(&mut self) -> &mut PageSetup {
        &mut self.page
    }

    /// The fixed column schema. Empty until the header row is created.
    pub fn columns(&self) -> &[TableColumn] {
        &self.columns
    }

    /// Number of columns in the fixed schema.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// All rows in order, the heading row first.
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    /// Total number of rows, heading included.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// The current outer border extent.
    pub fn border_box(&self) -> BorderBox {
        self.border_box
    }

    /// Does the heading row repeat after page breaks?
    pub fn heading_repeats(&self) -> bool {
        self.rows.first().map(|r| r.heading).unwrap_or(false)
    }

    /// Fix the column schema and append the heading row.
    pub(crate) fn set_header(&mut self, titles: Vec<String>) {
        self.columns = titles
            .iter()
            .map(|t| TableColumn { title: t.clone() })
            .collect();
        self.rows.push(TableRow {
            cells: titles,
            heading: true,
        });
        self.border_box = BorderBox::covering(self.columns.len(), self.rows.len());
    }

    /// Append a data row. The caller has already checked the arity.
    pub(crate) fn push_row(&mut self, cells: Vec<String>) {
        debug_assert_eq!(cells.len(), self.columns.len());
        self.rows.push(TableRow {
            cells,
            heading: false,
        });
        self.border_box = BorderBox::covering(self.columns.len(), self.rows.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_border_box_tracks_counts() {
        let mut doc = TableDocument::new("t".to_string());
        assert_eq!(doc.border_box(), BorderBox { columns: 0, rows: 0 });

        doc.set_header(vec!["ID".to_string(), "Name".to_string()]);
        assert_eq!(doc.border_box(), BorderBox { columns: 2, rows: 1 });

        doc.push_row(vec!["1".to_string(), "A".to_string()]);
        doc.push_row(vec!["2".to_string(), "B".to_string()]);
        assert_eq!(doc.border_box(), BorderBox { columns: 2, rows: 3 });
    }

    #[test]
    fn test_heading_flag() {
        let mut doc = TableDocument::new("t".to_string());
        assert!(!doc.heading_repeats());

        doc.set_header(vec!["A".to_string()]);
        assert!(doc.heading_repeats());
        assert!(doc.rows()[0].heading);

        doc.push_row(vec!["x".to_string()]);
        assert!(!doc.rows()[1].heading);
    }
}
