//! Worksheet: a named, append-oriented grid of rows.

use std::collections::BTreeMap;

use crate::row::Row;
use crate::style::StyleId;
use crate::value::CellValue;

/// Default column width in character units.
pub const DEFAULT_COLUMN_WIDTH: f64 = 8.43;

/// Narrowest width the autosize pass will produce.
pub const MIN_AUTOSIZE_WIDTH: f64 = 4.0;

/// Widest width the autosize pass will produce.
pub const MAX_AUTOSIZE_WIDTH: f64 = 120.0;

/// A single worksheet.
///
/// Rows are only ever appended; the row index returned by [`append_row`]
/// grows by exactly one per call, starting at zero.
///
/// [`append_row`]: Worksheet::append_row
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Worksheet {
    name: String,
    rows: Vec<Row>,
    /// Explicit column widths in character units, sparse.
    column_widths: BTreeMap<u16, f64>,
}

impl Worksheet {
    /// Create an empty worksheet with the given name.
    ///
    /// Name validation happens in [`Workbook::add_sheet`]; a worksheet
    /// constructed directly trusts its caller.
    ///
    /// [`Workbook::add_sheet`]: crate::workbook::Workbook::add_sheet
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
            column_widths: BTreeMap::new(),
        }
    }

    /// The worksheet name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of rows created so far.
    pub fn row_count(&self) -> u32 {
        self.rows.len() as u32
    }

    /// Append an empty row, returning its index.
    ///
    /// The first call returns 0; every later call returns the previous
    /// index plus one. Indices are never reused or skipped.
    pub fn append_row(&mut self) -> u32 {
        self.rows.push(Row::new());
        (self.rows.len() - 1) as u32
    }

    /// The row at an index, if created.
    pub fn row(&self, index: u32) -> Option<&Row> {
        self.rows.get(index as usize)
    }

    /// Mutable access to a row.
    pub fn row_mut(&mut self, index: u32) -> Option<&mut Row> {
        self.rows.get_mut(index as usize)
    }

    /// Iterate over rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    /// The value at (row, col); blank for positions never created.
    pub fn value(&self, row: u32, col: u16) -> &CellValue {
        static BLANK: CellValue = CellValue::Blank;
        self.rows
            .get(row as usize)
            .map(|r| r.value(col))
            .unwrap_or(&BLANK)
    }

    /// Write a cell into an existing row.
    ///
    /// Returns false when the row was never created.
    pub fn set_cell(&mut self, row: u32, col: u16, value: CellValue, style: StyleId) -> bool {
        match self.rows.get_mut(row as usize) {
            Some(r) => {
                r.set_cell(col, value, style);
                true
            }
            None => false,
        }
    }

    /// The maximum physical cell count over all rows.
    ///
    /// This is the exclusive upper bound of columns the autosize pass
    /// visits, counting padded blanks in sparse rows.
    pub fn max_physical_cell_count(&self) -> u16 {
        self.rows
            .iter()
            .map(|r| r.physical_cell_count())
            .max()
            .unwrap_or(0)
    }

    /// Explicit width of a column, if one was set.
    pub fn column_width(&self, col: u16) -> Option<f64> {
        self.column_widths.get(&col).copied()
    }

    /// Set an explicit column width in character units.
    pub fn set_column_width(&mut self, col: u16, width: f64) {
        self.column_widths.insert(col, width);
    }

    /// All explicit column widths, sparse and ordered.
    pub fn column_widths(&self) -> &BTreeMap<u16, f64> {
        &self.column_widths
    }

    /// Compute a width for one column from its contents.
    ///
    /// The heuristic measures the longest display text in the column plus
    /// one character of padding, clamped to a sane range. No font metrics
    /// are involved; a character unit approximates one digit of the
    /// default font.
    pub fn fit_column_width(&self, col: u16) -> f64 {
        let longest = self
            .rows
            .iter()
            .filter_map(|r| r.cell(col))
            .map(|c| c.value.display_text().chars().count())
            .max()
            .unwrap_or(0);
        ((longest as f64) + 1.0).clamp(MIN_AUTOSIZE_WIDTH, MAX_AUTOSIZE_WIDTH)
    }

    /// Run the column autosize pass.
    ///
    /// Visits every column index in `[0, max_physical_cell_count)` exactly
    /// once and records the fitted width. Runs before serialization so the
    /// encoders only ever see the final widths.
    pub fn autosize_columns(&mut self) {
        let max = self.max_physical_cell_count();
        for col in 0..max {
            let width = self.fit_column_width(col);
            self.column_widths.insert(col, width);
        }
    }
}
