//! Color representation

/// A cell or border color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Color {
    /// The automatic (theme/system) color
    #[default]
    Auto,
    /// An explicit RGB color
    Rgb { r: u8, g: u8, b: u8 },
}

impl Color {
    /// Create an RGB color.
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb { r, g, b }
    }

    /// Parse a hex color string like `"FF0000"` or `"#FF0000"`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Color::Rgb { r, g, b })
    }

    /// Is this the automatic color?
    pub fn is_auto(&self) -> bool {
        matches!(self, Color::Auto)
    }

    /// The 8-digit ARGB hex form the modern format uses, if explicit.
    pub fn to_argb_hex(&self) -> Option<String> {
        match self {
            Color::Auto => None,
            Color::Rgb { r, g, b } => Some(format!("FF{r:02X}{g:02X}{b:02X}")),
        }
    }

    /// The RGB components, with the automatic color resolving to black.
    pub fn to_rgb(&self) -> (u8, u8, u8) {
        match self {
            Color::Auto => (0, 0, 0),
            Color::Rgb { r, g, b } => (*r, *g, *b),
        }
    }

    /// Black.
    pub const BLACK: Color = Color::Rgb { r: 0, g: 0, b: 0 };

    /// White.
    pub const WHITE: Color = Color::Rgb {
        r: 255,
        g: 255,
        b: 255,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Color::from_hex("FF0000"), Some(Color::rgb(255, 0, 0)));
        assert_eq!(Color::from_hex("#00ff00"), Some(Color::rgb(0, 255, 0)));
        assert_eq!(Color::from_hex("xyz"), None);
        assert_eq!(Color::from_hex("12345"), None);
    }

    #[test]
    fn test_to_argb_hex() {
        assert_eq!(
            Color::rgb(81, 125, 192).to_argb_hex(),
            Some("FF517DC0".to_string())
        );
        assert_eq!(Color::Auto.to_argb_hex(), None);
    }
}
