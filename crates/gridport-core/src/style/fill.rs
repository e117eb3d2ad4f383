//! Background fill types

use super::Color;

/// Cell background fill
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FillStyle {
    /// No fill
    #[default]
    None,
    /// Solid fill with a single color
    Solid {
        /// Fill color
        color: Color,
    },
}

impl FillStyle {
    /// Create a solid fill
    pub fn solid(color: Color) -> Self {
        FillStyle::Solid { color }
    }

    /// The fill color, if any
    pub fn color(&self) -> Option<Color> {
        match self {
            FillStyle::None => None,
            FillStyle::Solid { color } => Some(*color),
        }
    }

    /// Is this a visible fill?
    pub fn is_some(&self) -> bool {
        !matches!(self, FillStyle::None)
    }
}
