//! Fixed-geometry pagination.
//!
//! Rows per page fall out of the page height, the margins, the title
//! block on the first page, and the fixed row height. Everything here is
//! pure arithmetic over the model; nothing touches the PDF object graph.

use std::ops::Range;

use crate::page::{
    PageSetup, BODY_FONT_SIZE_PT, BOTTOM_MARGIN_PT, CELL_TOP_PADDING_PT, SIDE_MARGIN_PT,
    TITLE_FONT_SIZE_PT, TITLE_SPACE_AFTER_PT, TITLE_SPACE_BEFORE_PT, TOP_MARGIN_PT,
};
use crate::table::TableDocument;

/// Height of every table row. One text line plus the cell top padding.
pub(crate) fn row_height() -> f64 {
    BODY_FONT_SIZE_PT * 1.4 + CELL_TOP_PADDING_PT
}

/// Height reserved for the title block on the first page.
pub(crate) fn title_block_height() -> f64 {
    TITLE_SPACE_BEFORE_PT + TITLE_FONT_SIZE_PT * 1.2 + TITLE_SPACE_AFTER_PT
}

/// How many table rows fit on one page.
///
/// Always at least 1 so pagination makes progress even on degenerate
/// geometry.
pub(crate) fn page_capacity(page_height: f64, with_title: bool) -> usize {
    let mut body = page_height - TOP_MARGIN_PT - BOTTOM_MARGIN_PT;
    if with_title {
        body -= title_block_height();
    }
    ((body / row_height()).floor() as usize).max(1)
}

/// One page's slice of the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PageSlice {
    /// Indices into the document's row list drawn on this page.
    pub rows: Range<usize>,
    /// Redraw the heading row above this slice.
    pub repeat_heading: bool,
}

/// Split the table into page slices.
///
/// The first page holds the title block (when a title is set) followed by
/// as many rows as fit. When the heading row repeats, every later page
/// reserves its first row slot for the redrawn heading.
pub(crate) fn paginate(doc: &TableDocument) -> Vec<PageSlice> {
    let (_, page_height) = doc.page().page_size();
    let total = doc.row_count();
    let with_title = !doc.title().is_empty();
    let repeat = doc.heading_repeats();

    let first_cap = page_capacity(page_height, with_title);
    let rest_cap = page_capacity(page_height, false);

    let mut next = first_cap.min(total);
    let mut slices = vec![PageSlice {
        rows: 0..next,
        repeat_heading: false,
    }];
    while next < total {
        let cap = if repeat {
            rest_cap.saturating_sub(1).max(1)
        } else {
            rest_cap
        };
        let end = (next + cap).min(total);
        slices.push(PageSlice {
            rows: next..end,
            repeat_heading: repeat,
        });
        next = end;
    }
    slices
}

/// Resolved page geometry for one document.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Layout {
    pub page_width: f64,
    pub page_height: f64,
    column_count: usize,
    has_title: bool,
}

impl Layout {
    pub fn new(setup: &PageSetup, column_count: usize, has_title: bool) -> Self {
        let (page_width, page_height) = setup.page_size();
        Layout {
            page_width,
            page_height,
            column_count,
            has_title,
        }
    }

    /// Left edge of the table.
    pub fn table_left(&self) -> f64 {
        SIDE_MARGIN_PT
    }

    /// Full printable width, which the table always spans.
    pub fn table_width(&self) -> f64 {
        self.page_width - 2.0 * SIDE_MARGIN_PT
    }

    /// Width of one column. Columns share the printable width equally.
    pub fn column_width(&self) -> f64 {
        if self.column_count == 0 {
            0.0
        } else {
            self.table_width() / self.column_count as f64
        }
    }

    /// Top edge of the table on the given page.
    pub fn table_top(&self, page_index: usize) -> f64 {
        let mut top = self.page_height - TOP_MARGIN_PT;
        if page_index == 0 && self.has_title {
            top -= title_block_height();
        }
        top
    }

    /// Baseline of the title text.
    pub fn title_baseline(&self) -> f64 {
        self.page_height - TOP_MARGIN_PT - TITLE_SPACE_BEFORE_PT - TITLE_FONT_SIZE_PT
    }

    /// Baseline of the centered footer line, inside the bottom margin.
    pub fn footer_baseline(&self) -> f64 {
        BOTTOM_MARGIN_PT / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::A4_SHORT_PT;

    fn doc_with_rows(rows: usize, title: &str) -> TableDocument {
        let mut doc = TableDocument::new(title.to_string());
        doc.set_header(vec!["A".to_string(), "B".to_string()]);
        for i in 0..rows {
            doc.push_row(vec![i.to_string(), "x".to_string()]);
        }
        doc
    }

    #[test]
    fn test_capacity_is_plausible() {
        // Landscape A4 body height is about 453 pt at 14.1 pt per row.
        let cap = page_capacity(A4_SHORT_PT, false);
        assert!((25..40).contains(&cap), "capacity {cap} out of range");
        assert!(page_capacity(A4_SHORT_PT, true) < cap);
    }

    #[test]
    fn test_single_page_when_rows_fit() {
        let doc = doc_with_rows(5, "Report");
        let slices = paginate(&doc);
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].rows, 0..6);
        assert!(!slices[0].repeat_heading);
    }

    #[test]
    fn test_empty_table_still_gets_a_page() {
        let doc = TableDocument::new("Report".to_string());
        let slices = paginate(&doc);
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].rows, 0..0);
    }

    #[test]
    fn test_pagination_covers_all_rows_once() {
        let doc = doc_with_rows(100, "Report");
        let slices = paginate(&doc);
        assert!(slices.len() > 1);

        let mut expected_next = 0;
        for slice in &slices {
            assert_eq!(slice.rows.start, expected_next);
            assert!(slice.rows.end > slice.rows.start);
            expected_next = slice.rows.end;
        }
        assert_eq!(expected_next, doc.row_count());
    }

    #[test]
    fn test_later_pages_repeat_heading() {
        let doc = doc_with_rows(100, "Report");
        let slices = paginate(&doc);
        assert!(!slices[0].repeat_heading);
        for slice in &slices[1..] {
            assert!(slice.repeat_heading);
        }

        // The redrawn heading costs one row slot on every later page.
        let (_, page_height) = doc.page().page_size();
        let rest_cap = page_capacity(page_height, false);
        assert_eq!(slices[1].rows.len(), rest_cap - 1);
    }

    #[test]
    fn test_first_page_accounts_for_title() {
        let with_title = paginate(&doc_with_rows(100, "Report"));
        let without = paginate(&doc_with_rows(100, ""));
        assert!(with_title[0].rows.len() < without[0].rows.len());
    }

    #[test]
    fn test_columns_share_width_equally() {
        let layout = Layout::new(&PageSetup::default(), 4, true);
        let total = layout.column_width() * 4.0;
        assert!((total - layout.table_width()).abs() < 1e-9);

        let empty = Layout::new(&PageSetup::default(), 0, false);
        assert_eq!(empty.column_width(), 0.0);
    }
}
