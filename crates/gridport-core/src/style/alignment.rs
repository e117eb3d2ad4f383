//! Text alignment types

/// Cell text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Alignment {
    /// Horizontal alignment
    pub horizontal: HorizontalAlignment,
    /// Vertical alignment
    pub vertical: VerticalAlignment,
    /// Wrap long text onto multiple lines
    pub wrap_text: bool,
}

impl Alignment {
    /// Create a new default alignment
    pub fn new() -> Self {
        Self::default()
    }

    /// Does this alignment differ from the default?
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HorizontalAlignment {
    /// Type-dependent default (text left, numbers right)
    #[default]
    General,
    /// Left-aligned
    Left,
    /// Centered
    Center,
    /// Right-aligned
    Right,
    /// Repeated to fill the cell
    Fill,
    /// Justified
    Justify,
}

/// Vertical text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VerticalAlignment {
    /// Aligned to the top edge
    Top,
    /// Centered
    Center,
    /// Aligned to the bottom edge (spreadsheet default)
    #[default]
    Bottom,
    /// Justified
    Justify,
}
