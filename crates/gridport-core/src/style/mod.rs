//! Cell styling types
//!
//! This module contains the logical (format-independent) styling model:
//! - [`Style`] - Complete cell style
//! - [`FontStyle`] - Font settings
//! - [`FillStyle`] - Background fill
//! - [`BorderStyle`] - Cell borders
//! - [`Alignment`] - Text alignment
//! - [`Color`] - Color representation
//!
//! A `Style` describes formatting in output-format-neutral terms. Each
//! format backend compiles it into its own physical representation when a
//! named style is defined; cells then reference the compiled entry through
//! a [`StyleId`].

mod alignment;
mod border;
mod color;
mod fill;
mod font;

pub use alignment::{Alignment, HorizontalAlignment, VerticalAlignment};
pub use border::{BorderEdge, BorderLineStyle, BorderStyle};
pub use color::Color;
pub use fill::FillStyle;
pub use font::{FontStyle, Underline};

/// Index of a compiled style inside a format backend's style table.
///
/// Id 0 is always the backend's default style; cells created without an
/// explicit style carry it.
pub type StyleId = u32;

/// Complete cell style
///
/// Format backends deduplicate compiled styles, so defining the same
/// logical style twice costs one table entry.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Style {
    /// Font settings
    pub font: FontStyle,
    /// Fill/background settings
    pub fill: FillStyle,
    /// Border settings
    pub border: BorderStyle,
    /// Text alignment
    pub alignment: Alignment,
    /// Number format
    pub number_format: NumberFormat,
}

impl Style {
    /// Create a new default style
    pub fn new() -> Self {
        Self::default()
    }

    /// Set font to bold
    pub fn bold(mut self, bold: bool) -> Self {
        self.font.bold = bold;
        self
    }

    /// Set font to italic
    pub fn italic(mut self, italic: bool) -> Self {
        self.font.italic = italic;
        self
    }

    /// Set font size in points
    pub fn font_size(mut self, size: f64) -> Self {
        self.font.size = size;
        self
    }

    /// Set font name
    pub fn font_name<S: Into<String>>(mut self, name: S) -> Self {
        self.font.name = name.into();
        self
    }

    /// Set font underline
    pub fn underline(mut self, underline: Underline) -> Self {
        self.font.underline = underline;
        self
    }

    /// Set font color
    pub fn font_color(mut self, color: Color) -> Self {
        self.font.color = color;
        self
    }

    /// Set fill color (solid fill)
    pub fn fill_color(mut self, color: Color) -> Self {
        self.fill = FillStyle::Solid { color };
        self
    }

    /// Set number format string
    pub fn number_format<S: Into<String>>(mut self, format: S) -> Self {
        self.number_format = NumberFormat::Custom(format.into());
        self
    }

    /// Set horizontal alignment
    pub fn horizontal_alignment(mut self, align: HorizontalAlignment) -> Self {
        self.alignment.horizontal = align;
        self
    }

    /// Set vertical alignment
    pub fn vertical_alignment(mut self, align: VerticalAlignment) -> Self {
        self.alignment.vertical = align;
        self
    }

    /// Set the same border line style on all four edges
    pub fn border_all(mut self, line: BorderLineStyle) -> Self {
        self.border = BorderStyle::all(line);
        self
    }

    /// Set one border edge
    pub fn border_edge(
        mut self,
        side: border::BorderSide,
        edge: Option<BorderEdge>,
    ) -> Self {
        self.border.set(side, edge);
        self
    }

    /// Get a mutable reference to font settings
    pub fn font_mut(&mut self) -> &mut FontStyle {
        &mut self.font
    }

    /// Get a mutable reference to border settings
    pub fn border_mut(&mut self) -> &mut BorderStyle {
        &mut self.border
    }

    /// Get a mutable reference to alignment settings
    pub fn alignment_mut(&mut self) -> &mut Alignment {
        &mut self.alignment
    }
}

impl std::hash::Hash for Style {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.font.hash(state);
        self.fill.hash(state);
        self.border.hash(state);
        self.alignment.hash(state);
        self.number_format.hash(state);
    }
}

impl Eq for Style {}

/// Number format for a cell
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NumberFormat {
    /// The general format (no explicit formatting)
    #[default]
    General,
    /// A built-in format referenced by its well-known id (e.g. 22 for
    /// `m/d/yy h:mm`)
    BuiltIn(u16),
    /// A custom format string
    Custom(String),
}

pub use border::BorderSide;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chain() {
        let style = Style::new()
            .font_name("Arial")
            .font_size(8.0)
            .bold(true)
            .horizontal_alignment(HorizontalAlignment::Center)
            .fill_color(Color::rgb(235, 240, 249));

        assert_eq!(style.font.name, "Arial");
        assert_eq!(style.font.size, 8.0);
        assert!(style.font.bold);
        assert_eq!(style.alignment.horizontal, HorizontalAlignment::Center);
        assert!(matches!(style.fill, FillStyle::Solid { .. }));
    }

    #[test]
    fn test_hash_eq_consistency() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let a = Style::new().font_size(8.0).bold(true);
        let b = Style::new().font_size(8.0).bold(true);
        assert_eq!(a, b);

        let mut ha = DefaultHasher::new();
        let mut hb = DefaultHasher::new();
        a.hash(&mut ha);
        b.hash(&mut hb);
        assert_eq!(ha.finish(), hb.finish());
    }

    #[test]
    fn test_default_is_general() {
        let style = Style::default();
        assert_eq!(style.number_format, NumberFormat::General);
        assert_eq!(style.fill, FillStyle::None);
    }
}
