//! Workbook: the in-memory model shared by every encoder.

use crate::error::{Error, Result};
use crate::style::StyleId;
use crate::value::CellValue;
use crate::variant::FormatVariant;
use crate::worksheet::Worksheet;
use crate::MAX_SHEET_NAME_LEN;

/// Characters a sheet name may not contain.
const FORBIDDEN_NAME_CHARS: [char; 7] = [':', '\\', '/', '?', '*', '[', ']'];

/// An in-memory workbook tied to one on-disk variant.
///
/// The variant is fixed at construction and never changes; it decides the
/// row and column limits enforced here and the encoder used later.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Workbook {
    variant: FormatVariant,
    sheets: Vec<Worksheet>,
}

impl Workbook {
    /// Create an empty workbook for the given variant.
    pub fn new(variant: FormatVariant) -> Self {
        Self {
            variant,
            sheets: Vec::new(),
        }
    }

    /// The variant this workbook was created for.
    pub fn variant(&self) -> FormatVariant {
        self.variant
    }

    /// Number of sheets.
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// True when no sheet has been added.
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Add a sheet, returning its index.
    ///
    /// Names must be non-empty, at most [`MAX_SHEET_NAME_LEN`] characters,
    /// free of `: \ / ? * [ ]`, and unique ignoring case.
    pub fn add_sheet<S: Into<String>>(&mut self, name: S) -> Result<usize> {
        let name = name.into();
        validate_sheet_name(&name)?;
        if self
            .sheets
            .iter()
            .any(|s| s.name().eq_ignore_ascii_case(&name))
        {
            return Err(Error::DuplicateSheet(name));
        }
        self.sheets.push(Worksheet::new(name));
        Ok(self.sheets.len() - 1)
    }

    /// The sheet at an index.
    pub fn sheet(&self, index: usize) -> Result<&Worksheet> {
        self.sheets
            .get(index)
            .ok_or(Error::SheetOutOfBounds(index, self.sheets.len()))
    }

    /// Mutable access to the sheet at an index.
    pub fn sheet_mut(&mut self, index: usize) -> Result<&mut Worksheet> {
        let count = self.sheets.len();
        self.sheets
            .get_mut(index)
            .ok_or(Error::SheetOutOfBounds(index, count))
    }

    /// Look up a sheet by name, ignoring case.
    pub fn sheet_by_name(&self, name: &str) -> Option<&Worksheet> {
        self.sheets
            .iter()
            .find(|s| s.name().eq_ignore_ascii_case(name))
    }

    /// The index of a named sheet.
    pub fn sheet_index(&self, name: &str) -> Result<usize> {
        self.sheets
            .iter()
            .position(|s| s.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::UnknownSheet(name.to_string()))
    }

    /// Iterate over sheets in insertion order.
    pub fn sheets(&self) -> impl Iterator<Item = &Worksheet> {
        self.sheets.iter()
    }

    /// Append a row to a sheet, returning the new row index.
    ///
    /// Fails when the sheet already holds the variant's row limit.
    pub fn append_row(&mut self, sheet: usize) -> Result<u32> {
        let max_rows = self.variant.max_rows();
        let ws = self.sheet_mut(sheet)?;
        if ws.row_count() >= max_rows {
            return Err(Error::RowLimitExceeded(ws.row_count(), max_rows));
        }
        Ok(ws.append_row())
    }

    /// Write a cell into a previously appended row.
    pub fn set_cell(
        &mut self,
        sheet: usize,
        row: u32,
        col: u16,
        value: CellValue,
        style: StyleId,
    ) -> Result<()> {
        let max_cols = self.variant.max_cols();
        if col >= max_cols {
            return Err(Error::ColumnLimitExceeded(col, max_cols));
        }
        let ws = self.sheet_mut(sheet)?;
        if !ws.set_cell(row, col, value, style) {
            return Err(Error::UnknownRow(row));
        }
        Ok(())
    }

    /// Run the autosize pass on every sheet.
    ///
    /// Encoders call this once before serializing so widths reflect the
    /// final contents.
    pub fn autosize_all(&mut self) {
        for ws in &mut self.sheets {
            ws.autosize_columns();
        }
    }
}

fn validate_sheet_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidSheetName("name is empty".to_string()));
    }
    if name.chars().count() > MAX_SHEET_NAME_LEN {
        return Err(Error::InvalidSheetName(format!(
            "name exceeds {} characters: {}",
            MAX_SHEET_NAME_LEN, name
        )));
    }
    if let Some(c) = name.chars().find(|c| FORBIDDEN_NAME_CHARS.contains(c)) {
        return Err(Error::InvalidSheetName(format!(
            "name contains '{}': {}",
            c, name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_add_sheet_returns_indices() {
        let mut wb = Workbook::new(FormatVariant::Modern);
        assert_eq!(wb.add_sheet("First").unwrap(), 0);
        assert_eq!(wb.add_sheet("Second").unwrap(), 1);
        assert_eq!(wb.sheet_count(), 2);
    }

    #[test]
    fn test_duplicate_sheet_name_case_insensitive() {
        let mut wb = Workbook::new(FormatVariant::Modern);
        wb.add_sheet("Data").unwrap();
        let err = wb.add_sheet("DATA").unwrap_err();
        assert!(matches!(err, Error::DuplicateSheet(_)));
    }

    #[test]
    fn test_invalid_sheet_names() {
        let mut wb = Workbook::new(FormatVariant::Modern);
        assert!(matches!(
            wb.add_sheet(""),
            Err(Error::InvalidSheetName(_))
        ));
        assert!(matches!(
            wb.add_sheet("a/b"),
            Err(Error::InvalidSheetName(_))
        ));
        assert!(matches!(
            wb.add_sheet("x".repeat(32)),
            Err(Error::InvalidSheetName(_))
        ));
        // 31 characters is still valid
        assert!(wb.add_sheet("x".repeat(31)).is_ok());
    }

    #[test]
    fn test_append_row_cursor_per_sheet() {
        let mut wb = Workbook::new(FormatVariant::Modern);
        let a = wb.add_sheet("A").unwrap();
        let b = wb.add_sheet("B").unwrap();
        assert_eq!(wb.append_row(a).unwrap(), 0);
        assert_eq!(wb.append_row(a).unwrap(), 1);
        assert_eq!(wb.append_row(b).unwrap(), 0);
        assert_eq!(wb.append_row(a).unwrap(), 2);
    }

    #[test]
    fn test_set_cell_checks_column_limit() {
        let mut wb = Workbook::new(FormatVariant::Legacy);
        let s = wb.add_sheet("Data").unwrap();
        let r = wb.append_row(s).unwrap();
        let err = wb
            .set_cell(s, r, 256, CellValue::from(1.0), 0)
            .unwrap_err();
        assert!(matches!(err, Error::ColumnLimitExceeded(256, 256)));
        assert!(wb.set_cell(s, r, 255, CellValue::from(1.0), 0).is_ok());
    }

    #[test]
    fn test_set_cell_unknown_row() {
        let mut wb = Workbook::new(FormatVariant::Modern);
        let s = wb.add_sheet("Data").unwrap();
        let err = wb
            .set_cell(s, 0, 0, CellValue::from("x"), 0)
            .unwrap_err();
        assert!(matches!(err, Error::UnknownRow(0)));
    }

    #[test]
    fn test_sheet_lookup() {
        let mut wb = Workbook::new(FormatVariant::Modern);
        wb.add_sheet("Report").unwrap();
        assert!(wb.sheet_by_name("report").is_some());
        assert_eq!(wb.sheet_index("Report").unwrap(), 0);
        assert!(matches!(
            wb.sheet_index("Missing"),
            Err(Error::UnknownSheet(_))
        ));
        assert!(matches!(
            wb.sheet(5),
            Err(Error::SheetOutOfBounds(5, 1))
        ));
    }
}
