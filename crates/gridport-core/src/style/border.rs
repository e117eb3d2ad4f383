//! Cell border types

use super::Color;

/// Borders for all four cell edges
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BorderStyle {
    /// Left edge
    pub left: Option<BorderEdge>,
    /// Right edge
    pub right: Option<BorderEdge>,
    /// Top edge
    pub top: Option<BorderEdge>,
    /// Bottom edge
    pub bottom: Option<BorderEdge>,
}

impl BorderStyle {
    /// Create a border with no edges
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a border with the same line style on all four edges
    pub fn all(line: BorderLineStyle) -> Self {
        let edge = Some(BorderEdge::new(line));
        Self {
            left: edge.clone(),
            right: edge.clone(),
            top: edge.clone(),
            bottom: edge,
        }
    }

    /// Set one edge
    pub fn set(&mut self, side: BorderSide, edge: Option<BorderEdge>) {
        match side {
            BorderSide::Left => self.left = edge,
            BorderSide::Right => self.right = edge,
            BorderSide::Top => self.top = edge,
            BorderSide::Bottom => self.bottom = edge,
        }
    }

    /// Get one edge
    pub fn get(&self, side: BorderSide) -> Option<&BorderEdge> {
        match side {
            BorderSide::Left => self.left.as_ref(),
            BorderSide::Right => self.right.as_ref(),
            BorderSide::Top => self.top.as_ref(),
            BorderSide::Bottom => self.bottom.as_ref(),
        }
    }

    /// Does any edge carry a visible line?
    pub fn is_any(&self) -> bool {
        [&self.left, &self.right, &self.top, &self.bottom]
            .iter()
            .any(|e| e.is_some())
    }
}

/// Identifies one of the four border edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BorderSide {
    Left,
    Right,
    Top,
    Bottom,
}

/// A single border edge: line style plus color
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BorderEdge {
    /// Line style
    pub style: BorderLineStyle,
    /// Line color
    pub color: Color,
}

impl BorderEdge {
    /// Create an edge with the automatic color
    pub fn new(style: BorderLineStyle) -> Self {
        Self {
            style,
            color: Color::Auto,
        }
    }

    /// Create an edge with an explicit color
    pub fn with_color(style: BorderLineStyle, color: Color) -> Self {
        Self { style, color }
    }
}

/// Border line styles shared by both output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BorderLineStyle {
    /// No line (edge present but invisible)
    None,
    /// Thin line
    #[default]
    Thin,
    /// Medium line
    Medium,
    /// Dashed line
    Dashed,
    /// Dotted line
    Dotted,
    /// Thick line
    Thick,
    /// Double line
    Double,
    /// Hairline
    Hair,
    /// Medium dashed line
    MediumDashed,
    /// Dash-dot line
    DashDot,
    /// Medium dash-dot line
    MediumDashDot,
    /// Dash-dot-dot line
    DashDotDot,
    /// Medium dash-dot-dot line
    MediumDashDotDot,
    /// Slanted dash-dot line
    SlantDashDot,
}
