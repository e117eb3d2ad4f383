//! Page geometry and report appearance constants.
//!
//! All lengths are in PDF points (1/72 inch). The report uses a fixed
//! geometry: A4 pages, equal column widths across the printable area, and
//! a row height derived from the body font size. No font metrics are
//! computed anywhere.

use std::fmt;

/// A4 short edge in points.
pub const A4_SHORT_PT: f64 = 595.28;

/// A4 long edge in points.
pub const A4_LONG_PT: f64 = 841.89;

/// Left and right page margin (0.3 in).
pub(crate) const SIDE_MARGIN_PT: f64 = 21.6;

/// Top page margin (2.5 cm).
pub(crate) const TOP_MARGIN_PT: f64 = 70.87;

/// Bottom page margin (2.5 cm). The footer line sits inside it.
pub(crate) const BOTTOM_MARGIN_PT: f64 = 70.87;

/// Body and footer font size.
pub(crate) const BODY_FONT_SIZE_PT: f64 = 9.0;

/// Title font size.
pub(crate) const TITLE_FONT_SIZE_PT: f64 = 10.0;

/// Space above the title block (1 cm).
pub(crate) const TITLE_SPACE_BEFORE_PT: f64 = 28.35;

/// Space between the title block and the table (5 mm).
pub(crate) const TITLE_SPACE_AFTER_PT: f64 = 14.17;

/// Inner grid line width.
pub(crate) const GRID_LINE_PT: f64 = 0.25;

/// Outer left/right table edge line width.
pub(crate) const EDGE_LINE_PT: f64 = 0.5;

/// Border box line width.
pub(crate) const BOX_LINE_PT: f64 = 0.75;

/// Extra space above cell text.
pub(crate) const CELL_TOP_PADDING_PT: f64 = 1.5;

/// Horizontal inset between a cell edge and its text.
pub(crate) const CELL_SIDE_PADDING_PT: f64 = 2.0;

/// Additional first-line indent applied to data cells.
pub(crate) const FIRST_LINE_INDENT_PT: f64 = 1.0;

/// Grid and border stroke color.
pub(crate) const BORDER_COLOR: (u8, u8, u8) = (81, 125, 192);

/// Heading row background fill.
pub(crate) const HEADING_SHADING: (u8, u8, u8) = (235, 240, 249);

/// Approximate advance width of one character, as a fraction of the font
/// size. Used for centering the footer and clipping overlong cell text.
pub(crate) const CHAR_WIDTH_FACTOR: f64 = 0.5;

/// Page orientation for a table report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PageOrientation {
    /// Short edge horizontal.
    Portrait,
    /// Long edge horizontal. Reports default to landscape so wide tables
    /// get the full printable width.
    #[default]
    Landscape,
}

/// Page setup for a table report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageSetup {
    /// Page orientation; fixed A4 paper either way.
    pub orientation: PageOrientation,
}

impl PageSetup {
    /// Page width and height in points, after orientation.
    pub fn page_size(&self) -> (f64, f64) {
        match self.orientation {
            PageOrientation::Portrait => (A4_SHORT_PT, A4_LONG_PT),
            PageOrientation::Landscape => (A4_LONG_PT, A4_SHORT_PT),
        }
    }
}

impl fmt::Display for PageOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageOrientation::Portrait => write!(f, "portrait"),
            PageOrientation::Landscape => write!(f, "landscape"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_landscape() {
        assert_eq!(PageSetup::default().orientation, PageOrientation::Landscape);
    }

    #[test]
    fn test_page_size_follows_orientation() {
        let landscape = PageSetup {
            orientation: PageOrientation::Landscape,
        };
        assert_eq!(landscape.page_size(), (A4_LONG_PT, A4_SHORT_PT));

        let portrait = PageSetup {
            orientation: PageOrientation::Portrait,
        };
        assert_eq!(portrait.page_size(), (A4_SHORT_PT, A4_LONG_PT));
    }
}
