//! styles.xml generation and the definition-time style table

use std::collections::HashMap;

use gridport_core::style::{
    Alignment, BorderEdge, BorderLineStyle, BorderStyle, Color, FillStyle, FontStyle,
    HorizontalAlignment, NumberFormat, Style, StyleId, Underline, VerticalAlignment,
};

/// Built-in number format id for date-times (`m/d/yy h:mm`).
pub const DATETIME_NUM_FMT: u16 = 22;

/// First id available for custom number formats.
const FIRST_CUSTOM_NUM_FMT: u32 = 164;

/// The workbook style table for the modern format.
///
/// Styles are interned when a named style is defined, not at save time.
/// The returned [`StyleId`] is the final cellXfs index; index 0 is the
/// default style. One extra xf for date-time cells is appended after all
/// interned entries when the table is serialized.
#[derive(Debug)]
pub struct XlsxStyles {
    /// Deduplicated styles. Index corresponds to the cellXfs index.
    table: Vec<Style>,
    ids: HashMap<Style, StyleId>,
}

#[derive(Debug, Clone, Copy)]
struct ResolvedXfIds {
    font_id: u32,
    fill_id: u32,
    border_id: u32,
    num_fmt_id: u32,
}

impl Default for XlsxStyles {
    fn default() -> Self {
        Self::new()
    }
}

impl XlsxStyles {
    pub fn new() -> Self {
        let mut table = Vec::new();
        let mut ids = HashMap::new();

        // Index 0 is always the default style
        let default = Style::default();
        table.push(default.clone());
        ids.insert(default, 0);

        Self { table, ids }
    }

    /// Intern a style, returning its cellXfs index.
    ///
    /// Interning the same logical style twice returns the first id.
    pub fn intern(&mut self, style: &Style) -> StyleId {
        match self.ids.get(style) {
            Some(&id) => id,
            None => {
                let id = self.table.len() as StyleId;
                self.table.push(style.clone());
                self.ids.insert(style.clone(), id);
                id
            }
        }
    }

    /// The style stored under an id.
    pub fn style(&self, id: StyleId) -> Option<&Style> {
        self.table.get(id as usize)
    }

    /// Number of interned styles, including the default.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// The xf index used for date-time cells without an explicit style.
    ///
    /// The date xf sits after every interned entry, so its index equals
    /// the current table length.
    pub fn date_xf_id(&self) -> u32 {
        self.table.len() as u32
    }

    /// Serialize the style table as a complete styles.xml part.
    pub fn to_styles_xml(&self) -> String {
        // Build component tables
        let mut font_ids: HashMap<FontStyle, u32> = HashMap::new();
        let mut fonts: Vec<FontStyle> = Vec::new();

        let default_font = FontStyle::default();
        fonts.push(default_font.clone());
        font_ids.insert(default_font, 0);

        // Excel requires the first two fills to be none and gray125; custom
        // fills start at id 2.
        let mut fill_ids: HashMap<FillStyle, u32> = HashMap::new();
        let mut fills: Vec<FillStyle> = Vec::new();
        fill_ids.insert(FillStyle::None, 0);

        let mut border_ids: HashMap<BorderStyle, u32> = HashMap::new();
        let mut borders: Vec<BorderStyle> = Vec::new();
        let default_border = BorderStyle::default();
        borders.push(default_border.clone());
        border_ids.insert(default_border, 0);

        // Custom number formats
        let mut numfmt_ids: HashMap<String, u32> = HashMap::new();
        let mut numfmts: Vec<(u32, String)> = Vec::new();
        let mut next_numfmt_id: u32 = FIRST_CUSTOM_NUM_FMT;

        // Resolve component ids for each style
        let mut resolved: Vec<ResolvedXfIds> = Vec::with_capacity(self.table.len());

        for style in &self.table {
            let font_id = match font_ids.get(&style.font) {
                Some(&id) => id,
                None => {
                    let id = fonts.len() as u32;
                    fonts.push(style.font.clone());
                    font_ids.insert(style.font.clone(), id);
                    id
                }
            };

            let fill_id = match &style.fill {
                FillStyle::None => 0,
                other => {
                    if let Some(&id) = fill_ids.get(other) {
                        id
                    } else {
                        // + 2 accounts for the mandatory none and gray125 entries
                        let id = fills.len() as u32 + 2;
                        fills.push(other.clone());
                        fill_ids.insert(other.clone(), id);
                        id
                    }
                }
            };

            let border_id = match border_ids.get(&style.border) {
                Some(&id) => id,
                None => {
                    let id = borders.len() as u32;
                    borders.push(style.border.clone());
                    border_ids.insert(style.border.clone(), id);
                    id
                }
            };

            let num_fmt_id = match &style.number_format {
                NumberFormat::General => 0,
                NumberFormat::BuiltIn(id) => *id as u32,
                NumberFormat::Custom(code) => {
                    if let Some(&id) = numfmt_ids.get(code) {
                        id
                    } else {
                        let id = next_numfmt_id;
                        next_numfmt_id += 1;
                        numfmt_ids.insert(code.clone(), id);
                        numfmts.push((id, code.clone()));
                        id
                    }
                }
            };

            resolved.push(ResolvedXfIds {
                font_id,
                fill_id,
                border_id,
                num_fmt_id,
            });
        }

        // Write XML
        let mut xml = String::new();
        xml.push_str(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );

        if !numfmts.is_empty() {
            xml.push_str(&format!("\n  <numFmts count=\"{}\">", numfmts.len()));
            for (id, code) in &numfmts {
                xml.push_str(&format!(
                    "\n    <numFmt numFmtId=\"{}\" formatCode=\"{}\"/>",
                    id,
                    escape_xml_attr(code)
                ));
            }
            xml.push_str("\n  </numFmts>");
        }

        // Fonts
        xml.push_str(&format!("\n  <fonts count=\"{}\">", fonts.len()));
        for font in &fonts {
            xml.push_str("\n    ");
            xml.push_str(&write_font(font));
        }
        xml.push_str("\n  </fonts>");

        // Fills
        xml.push_str(&format!("\n  <fills count=\"{}\">", fills.len() + 2));
        xml.push_str("\n    <fill><patternFill patternType=\"none\"/></fill>");
        xml.push_str("\n    <fill><patternFill patternType=\"gray125\"/></fill>");
        for fill in &fills {
            xml.push_str("\n    ");
            xml.push_str(&write_fill(fill));
        }
        xml.push_str("\n  </fills>");

        // Borders
        xml.push_str(&format!("\n  <borders count=\"{}\">", borders.len()));
        for border in &borders {
            xml.push_str("\n    ");
            xml.push_str(&write_border(border));
        }
        xml.push_str("\n  </borders>");

        // cellStyleXfs (required)
        xml.push_str(
            r#"
  <cellStyleXfs count="1">
    <xf numFmtId="0" fontId="0" fillId="0" borderId="0"/>
  </cellStyleXfs>"#,
        );

        // cellXfs, with the date xf appended after every interned entry
        xml.push_str(&format!("\n  <cellXfs count=\"{}\">", self.table.len() + 1));
        for (i, ids) in resolved.iter().enumerate() {
            let style = &self.table[i];
            xml.push_str("\n    ");
            xml.push_str(&write_xf(style, *ids));
        }
        xml.push_str(&format!(
            "\n    <xf numFmtId=\"{}\" fontId=\"0\" fillId=\"0\" borderId=\"0\" xfId=\"0\" applyNumberFormat=\"1\"/>",
            DATETIME_NUM_FMT
        ));
        xml.push_str("\n  </cellXfs>");

        // cellStyles (required)
        xml.push_str(
            r#"
  <cellStyles count="1">
    <cellStyle name="Normal" xfId="0" builtinId="0"/>
  </cellStyles>
  <dxfs count="0"/>
  <tableStyles count="0" defaultTableStyle="TableStyleMedium9" defaultPivotStyle="PivotStyleLight16"/>"#,
        );

        xml.push_str("\n</styleSheet>");
        xml
    }
}

fn escape_xml_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn write_color(tag: &str, color: &Color) -> String {
    match color {
        Color::Auto => format!("<{tag} indexed=\"64\"/>"),
        Color::Rgb { r, g, b } => format!("<{tag} rgb=\"FF{:02X}{:02X}{:02X}\"/>", r, g, b),
    }
}

fn write_font(font: &FontStyle) -> String {
    let mut s = String::from("<font>");
    if font.bold {
        s.push_str("<b/>");
    }
    if font.italic {
        s.push_str("<i/>");
    }
    match font.underline {
        Underline::None => {}
        Underline::Single => s.push_str("<u/>"),
        Underline::Double => s.push_str("<u val=\"double\"/>"),
    }
    s.push_str(&format!("<sz val=\"{}\"/>", font.size));
    if let Color::Rgb { r, g, b } = font.color {
        s.push_str(&format!("<color rgb=\"FF{:02X}{:02X}{:02X}\"/>", r, g, b));
    }
    s.push_str(&format!("<name val=\"{}\"/>", escape_xml_attr(&font.name)));
    s.push_str("</font>");
    s
}

fn write_fill(fill: &FillStyle) -> String {
    match fill {
        FillStyle::None => "<fill><patternFill patternType=\"none\"/></fill>".to_string(),
        FillStyle::Solid { color } => {
            format!(
                "<fill><patternFill patternType=\"solid\">{}<bgColor indexed=\"64\"/></patternFill></fill>",
                write_color("fgColor", color)
            )
        }
    }
}

fn border_style_to_str(s: BorderLineStyle) -> Option<&'static str> {
    match s {
        BorderLineStyle::None => None,
        BorderLineStyle::Thin => Some("thin"),
        BorderLineStyle::Medium => Some("medium"),
        BorderLineStyle::Thick => Some("thick"),
        BorderLineStyle::Dashed => Some("dashed"),
        BorderLineStyle::Dotted => Some("dotted"),
        BorderLineStyle::Double => Some("double"),
        BorderLineStyle::Hair => Some("hair"),
        BorderLineStyle::MediumDashed => Some("mediumDashed"),
        BorderLineStyle::DashDot => Some("dashDot"),
        BorderLineStyle::MediumDashDot => Some("mediumDashDot"),
        BorderLineStyle::DashDotDot => Some("dashDotDot"),
        BorderLineStyle::MediumDashDotDot => Some("mediumDashDotDot"),
        BorderLineStyle::SlantDashDot => Some("slantDashDot"),
    }
}

fn write_border_edge(tag: &str, edge: &Option<BorderEdge>) -> String {
    match edge {
        None => format!("<{tag}/>"),
        Some(e) => match border_style_to_str(e.style) {
            None => format!("<{tag}/>"),
            Some(style) => format!(
                "<{tag} style=\"{}\">{}</{tag}>",
                style,
                write_color("color", &e.color)
            ),
        },
    }
}

fn write_border(border: &BorderStyle) -> String {
    let mut s = String::from("<border>");
    s.push_str(&write_border_edge("left", &border.left));
    s.push_str(&write_border_edge("right", &border.right));
    s.push_str(&write_border_edge("top", &border.top));
    s.push_str(&write_border_edge("bottom", &border.bottom));
    s.push_str("<diagonal/>");
    s.push_str("</border>");
    s
}

fn horiz_to_str(h: HorizontalAlignment) -> &'static str {
    match h {
        HorizontalAlignment::General => "general",
        HorizontalAlignment::Left => "left",
        HorizontalAlignment::Center => "center",
        HorizontalAlignment::Right => "right",
        HorizontalAlignment::Fill => "fill",
        HorizontalAlignment::Justify => "justify",
    }
}

fn vert_to_str(v: VerticalAlignment) -> &'static str {
    match v {
        VerticalAlignment::Top => "top",
        VerticalAlignment::Center => "center",
        VerticalAlignment::Bottom => "bottom",
        VerticalAlignment::Justify => "justify",
    }
}

fn write_alignment(al: &Alignment) -> String {
    let default = Alignment::default();
    if al == &default {
        return String::new();
    }

    let mut s = String::from("<alignment");
    if al.horizontal != default.horizontal {
        s.push_str(&format!(" horizontal=\"{}\"", horiz_to_str(al.horizontal)));
    }
    if al.vertical != default.vertical {
        s.push_str(&format!(" vertical=\"{}\"", vert_to_str(al.vertical)));
    }
    if al.wrap_text {
        s.push_str(" wrapText=\"1\"");
    }
    s.push_str("/>");
    s
}

fn write_xf(style: &Style, ids: ResolvedXfIds) -> String {
    let mut attrs = String::new();
    if ids.num_fmt_id != 0 {
        attrs.push_str(" applyNumberFormat=\"1\"");
    }
    if style.font != FontStyle::default() {
        attrs.push_str(" applyFont=\"1\"");
    }
    if style.fill != FillStyle::None {
        attrs.push_str(" applyFill=\"1\"");
    }
    if style.border != BorderStyle::default() {
        attrs.push_str(" applyBorder=\"1\"");
    }
    if style.alignment != Alignment::default() {
        attrs.push_str(" applyAlignment=\"1\"");
    }

    let mut s = format!(
        "<xf numFmtId=\"{}\" fontId=\"{}\" fillId=\"{}\" borderId=\"{}\" xfId=\"0\"{}",
        ids.num_fmt_id, ids.font_id, ids.fill_id, ids.border_id, attrs
    );

    let alignment_xml = write_alignment(&style.alignment);
    if alignment_xml.is_empty() {
        s.push_str("/>");
        return s;
    }

    s.push('>');
    s.push_str(&alignment_xml);
    s.push_str("</xf>");
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_intern_deduplicates() {
        let mut styles = XlsxStyles::new();
        let bold = Style::new().bold(true);
        let a = styles.intern(&bold);
        let b = styles.intern(&bold.clone());
        assert_eq!(a, b);
        assert_eq!(a, 1);
        assert_eq!(styles.len(), 2);
    }

    #[test]
    fn test_default_is_id_zero() {
        let mut styles = XlsxStyles::new();
        assert_eq!(styles.intern(&Style::default()), 0);
        assert_eq!(styles.len(), 1);
    }

    #[test]
    fn test_date_xf_follows_interned_entries() {
        let mut styles = XlsxStyles::new();
        assert_eq!(styles.date_xf_id(), 1);
        styles.intern(&Style::new().bold(true));
        assert_eq!(styles.date_xf_id(), 2);
    }

    #[test]
    fn test_styles_xml_contains_date_xf() {
        let styles = XlsxStyles::new();
        let xml = styles.to_styles_xml();
        assert!(xml.contains("<cellXfs count=\"2\">"));
        assert!(xml.contains("numFmtId=\"22\""));
    }

    #[test]
    fn test_styles_xml_components() {
        let mut styles = XlsxStyles::new();
        styles.intern(
            &Style::new()
                .bold(true)
                .fill_color(Color::rgb(235, 240, 249))
                .border_all(BorderLineStyle::Thin),
        );
        let xml = styles.to_styles_xml();
        assert!(xml.contains("<b/>"));
        assert!(xml.contains("fgColor rgb=\"FFEBF0F9\""));
        assert!(xml.contains("<left style=\"thin\">"));
        // Mandatory leading fills stay in place
        assert!(xml.contains("patternType=\"gray125\""));
        assert!(xml.contains("<fills count=\"3\">"));
    }
}
