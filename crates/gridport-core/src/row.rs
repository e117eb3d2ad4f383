//! Row and cell storage.

use crate::style::StyleId;
use crate::value::CellValue;

/// A single cell: value plus a reference to a compiled style.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    /// The cell value
    pub value: CellValue,
    /// Index into the active backend's style table (0 = default)
    pub style: StyleId,
}

impl Cell {
    /// Create a cell with the default style.
    pub fn new(value: CellValue) -> Self {
        Self { value, style: 0 }
    }

    /// Create a styled cell.
    pub fn with_style(value: CellValue, style: StyleId) -> Self {
        Self { value, style }
    }

    /// Is this an unstyled blank?
    pub fn is_empty(&self) -> bool {
        self.value.is_blank() && self.style == 0
    }
}

/// One row of cells.
///
/// Rows grow left to right: writing at a column beyond the current end
/// creates the intermediate cells as blanks, so every created position is
/// physically present. The physical cell count (not the count of non-blank
/// values) is what the column autosize pass measures.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Row {
    cells: Vec<Cell>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a value at a column position, creating intermediate blank
    /// cells as needed.
    pub fn set_cell(&mut self, col: u16, value: CellValue, style: StyleId) {
        let idx = col as usize;
        if idx >= self.cells.len() {
            self.cells.resize(idx + 1, Cell::default());
        }
        self.cells[idx] = Cell::with_style(value, style);
    }

    /// The cell at a column, if created.
    pub fn cell(&self, col: u16) -> Option<&Cell> {
        self.cells.get(col as usize)
    }

    /// The value at a column; blank when the cell was never created.
    pub fn value(&self, col: u16) -> &CellValue {
        static BLANK: CellValue = CellValue::Blank;
        self.cells
            .get(col as usize)
            .map(|c| &c.value)
            .unwrap_or(&BLANK)
    }

    /// Number of physically created cells, including blanks written to pad
    /// sparse positions.
    pub fn physical_cell_count(&self) -> u16 {
        self.cells.len() as u16
    }

    /// Iterate over the created cells with their column indices.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &Cell)> {
        self.cells.iter().enumerate().map(|(i, c)| (i as u16, c))
    }

    /// Is this row entirely empty?
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_write_pads_blanks() {
        let mut row = Row::new();
        row.set_cell(3, CellValue::from("D"), 0);

        assert_eq!(row.physical_cell_count(), 4);
        assert!(row.value(0).is_blank());
        assert!(row.value(2).is_blank());
        assert_eq!(row.value(3).as_text(), Some("D"));
        // Positions never created read as blank too
        assert!(row.value(9).is_blank());
    }

    #[test]
    fn test_overwrite_keeps_count() {
        let mut row = Row::new();
        row.set_cell(0, CellValue::from(1.0), 0);
        row.set_cell(0, CellValue::from(2.0), 5);

        assert_eq!(row.physical_cell_count(), 1);
        assert_eq!(row.value(0).as_number(), Some(2.0));
        assert_eq!(row.cell(0).map(|c| c.style), Some(5));
    }

    #[test]
    fn test_iter_positions() {
        let mut row = Row::new();
        row.set_cell(1, CellValue::from(true), 0);
        let cols: Vec<u16> = row.iter().map(|(c, _)| c).collect();
        assert_eq!(cols, vec![0, 1]);
    }
}
