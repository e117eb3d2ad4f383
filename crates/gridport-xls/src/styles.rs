//! BIFF8 style table construction.
//!
//! Compiles core [`Style`] values into the FONT / FORMAT / XF records of
//! the workbook globals stream. Compilation happens when a style is
//! interned, so the table is complete before any sheet data is written.
//!
//! The XF table follows the layout Excel expects: 15 style XFs first,
//! then the default cell XF at index 15, interned cell XFs from 16, and
//! one trailing date XF for unstyled date-time cells.

use std::collections::HashMap;

use gridport_core::style::{
    BorderEdge, BorderLineStyle, Color, FillStyle, FontStyle, HorizontalAlignment, NumberFormat,
    Style, StyleId, Underline, VerticalAlignment,
};

use crate::biff::strings::{write_short_string, write_unicode_string};
use crate::biff::{records, write_record};

/// Built-in BIFF number format id for date-times (`m/d/yy h:mm`).
pub const DATETIME_IFMT: u16 = 22;

/// First ifmt available for custom format codes.
const FIRST_CUSTOM_IFMT: u16 = 164;

/// Number of style XFs at the front of the XF table.
const STYLE_XFS: u16 = 15;

/// ixfe of the default cell XF (follows the style XFs).
const DEFAULT_CELL_IXFE: u16 = STYLE_XFS;

/// Automatic foreground color index.
const ICV_AUTO_FORE: u16 = 0x0040;

/// Automatic background color index.
const ICV_AUTO_BACK: u16 = 0x0041;

/// Automatic font color index.
const ICV_FONT_AUTO: u16 = 0x7FFF;

/// The standard BIFF8 color palette. Indices 8–63 in the workbook map to
/// entries 0–55 here. Explicit RGB colors are written as the nearest
/// palette entry.
pub(crate) const DEFAULT_PALETTE: [(u8, u8, u8); 56] = [
    (0, 0, 0),       //  8: Black
    (255, 255, 255), //  9: White
    (255, 0, 0),     // 10: Red
    (0, 255, 0),     // 11: Bright Green
    (0, 0, 255),     // 12: Blue
    (255, 255, 0),   // 13: Yellow
    (255, 0, 255),   // 14: Pink
    (0, 255, 255),   // 15: Turquoise
    (128, 0, 0),     // 16: Dark Red
    (0, 128, 0),     // 17: Green
    (0, 0, 128),     // 18: Dark Blue
    (128, 128, 0),   // 19: Dark Yellow
    (128, 0, 128),   // 20: Violet
    (0, 128, 128),   // 21: Teal
    (192, 192, 192), // 22: Silver (25% Gray)
    (128, 128, 128), // 23: Gray (50% Gray)
    (153, 153, 255), // 24: Periwinkle
    (153, 51, 102),  // 25: Plum
    (255, 255, 204), // 26: Ivory
    (204, 255, 255), // 27: Light Turquoise
    (102, 0, 102),   // 28: Dark Purple
    (255, 128, 128), // 29: Coral
    (0, 102, 204),   // 30: Ocean Blue
    (204, 204, 255), // 31: Ice Blue
    (0, 0, 128),     // 32: Dark Blue (dup)
    (255, 0, 255),   // 33: Pink (dup)
    (255, 255, 0),   // 34: Yellow (dup)
    (0, 255, 255),   // 35: Turquoise (dup)
    (128, 0, 128),   // 36: Violet (dup)
    (128, 0, 0),     // 37: Dark Red (dup)
    (0, 128, 128),   // 38: Teal (dup)
    (0, 0, 255),     // 39: Blue (dup)
    (0, 204, 255),   // 40: Sky Blue
    (204, 255, 255), // 41: Light Turquoise (dup)
    (204, 255, 204), // 42: Light Green
    (255, 255, 153), // 43: Light Yellow
    (153, 204, 255), // 44: Pale Blue
    (255, 153, 204), // 45: Rose
    (204, 153, 255), // 46: Lavender
    (255, 204, 153), // 47: Tan
    (51, 102, 255),  // 48: Light Blue
    (51, 204, 204),  // 49: Aqua
    (153, 204, 0),   // 50: Lime
    (255, 204, 0),   // 51: Gold
    (255, 153, 0),   // 52: Light Orange
    (255, 102, 0),   // 53: Orange
    (102, 102, 153), // 54: Blue-Gray
    (150, 150, 150), // 55: 40% Gray
    (0, 51, 102),    // 56: Dark Teal
    (51, 153, 102),  // 57: Sea Green
    (0, 51, 0),      // 58: Dark Green
    (51, 51, 0),     // 59: Olive Green
    (153, 51, 0),    // 60: Brown
    (153, 51, 51),   // 61: Dark Rose
    (51, 51, 153),   // 62: Indigo
    (51, 51, 51),    // 63: 80% Gray
];

/// Index (icv) of the palette entry closest to `color` by squared RGB
/// distance.
pub(crate) fn nearest_palette_icv(color: Color) -> u16 {
    let (r, g, b) = color.to_rgb();
    let mut best = 0usize;
    let mut best_dist = u32::MAX;
    for (i, &(pr, pg, pb)) in DEFAULT_PALETTE.iter().enumerate() {
        let dr = (r as i32 - pr as i32).pow(2) as u32;
        let dg = (g as i32 - pg as i32).pow(2) as u32;
        let db = (b as i32 - pb as i32).pow(2) as u32;
        let dist = dr + dg + db;
        if dist < best_dist {
            best_dist = dist;
            best = i;
        }
    }
    (best + 8) as u16
}

// ============================================================================
// Compiled record images
// ============================================================================

/// Compiled FONT record fields.
#[derive(Debug, Clone, PartialEq)]
struct BiffFont {
    /// Font height in twips (1/20 of a point).
    height_twips: u16,
    bold: bool,
    italic: bool,
    /// BIFF underline code (0x00 / 0x01 / 0x02).
    underline: u8,
    /// Palette color index, 0x7FFF for automatic.
    color_icv: u16,
    name: String,
}

impl BiffFont {
    fn from_style(font: &FontStyle) -> Self {
        let color_icv = match font.color {
            Color::Auto => ICV_FONT_AUTO,
            c => nearest_palette_icv(c),
        };
        Self {
            height_twips: font.height_twips(),
            bold: font.bold,
            italic: font.italic,
            underline: match font.underline {
                Underline::None => 0x00,
                Underline::Single => 0x01,
                Underline::Double => 0x02,
            },
            color_icv,
            name: font.name.clone(),
        }
    }

    /// Encode as a FONT record body.
    ///
    /// Layout:
    ///   0  u16  dyHeight   — font height in twips
    ///   2  u16  grbit      — flags (bit 1 = italic)
    ///   4  u16  icv        — color index
    ///   6  u16  bls        — bold weight (400 = normal, 700 = bold)
    ///   8  u16  sss        — super/subscript
    ///  10  u8   uls        — underline type
    ///  11  u8   bFamily
    ///  12  u8   bCharSet
    ///  13  u8   reserved
    ///  14  ...  font name  — short string (1-byte length prefix)
    fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(16 + self.name.len());
        buf.extend_from_slice(&self.height_twips.to_le_bytes());
        let grbit: u16 = if self.italic { 0x0002 } else { 0 };
        buf.extend_from_slice(&grbit.to_le_bytes());
        buf.extend_from_slice(&self.color_icv.to_le_bytes());
        let bls: u16 = if self.bold { 700 } else { 400 };
        buf.extend_from_slice(&bls.to_le_bytes());
        buf.extend_from_slice(&0u16.to_le_bytes()); // sss
        buf.push(self.underline);
        buf.push(0); // family
        buf.push(0); // charset
        buf.push(0); // reserved
        write_short_string(&mut buf, &self.name);
        buf
    }
}

/// Compiled XF record fields for a cell XF.
#[derive(Debug, Clone)]
struct BiffXf {
    ifnt: u16,
    ifmt: u16,
    halign: u8,
    valign: u8,
    wrap: bool,
    // Border line codes (0–13) and color indices per edge
    border_left: u8,
    border_right: u8,
    border_top: u8,
    border_bottom: u8,
    icv_left: u16,
    icv_right: u16,
    icv_top: u16,
    icv_bottom: u16,
    // Fill
    fill_solid: bool,
    icv_fore: u16,
    icv_back: u16,
}

impl BiffXf {
    fn default_cell() -> Self {
        Self {
            ifnt: 0,
            ifmt: 0,
            halign: 0, // general
            valign: 2, // bottom
            wrap: false,
            border_left: 0,
            border_right: 0,
            border_top: 0,
            border_bottom: 0,
            icv_left: 0,
            icv_right: 0,
            icv_top: 0,
            icv_bottom: 0,
            fill_solid: false,
            icv_fore: ICV_AUTO_FORE,
            icv_back: ICV_AUTO_BACK,
        }
    }
}

/// Encode an XF record body (20 bytes, see [MS-XLS] §2.4.353).
///
/// `flags` is the protection/type word at bytes 4–5: style XFs carry
/// 0xFFF5 (fStyle set, no parent), cell XFs 0x0001 (locked, parent 0).
/// `used_attribs` marks the attribute groups that differ from the Normal
/// style.
fn encode_xf(xf: &BiffXf, flags: u16, used_attribs: u8) -> [u8; 20] {
    let mut buf = [0u8; 20];
    buf[0..2].copy_from_slice(&xf.ifnt.to_le_bytes());
    buf[2..4].copy_from_slice(&xf.ifmt.to_le_bytes());
    buf[4..6].copy_from_slice(&flags.to_le_bytes());
    buf[6] = (xf.halign & 0x07) | if xf.wrap { 0x08 } else { 0 } | ((xf.valign & 0x07) << 4);
    buf[7] = 0; // trot
    buf[8] = 0; // indent / shrink / reading order
    buf[9] = used_attribs;

    let border1: u32 = (xf.border_left as u32 & 0x0F)
        | ((xf.border_right as u32 & 0x0F) << 4)
        | ((xf.border_top as u32 & 0x0F) << 8)
        | ((xf.border_bottom as u32 & 0x0F) << 12)
        | ((xf.icv_left as u32 & 0x7F) << 16)
        | ((xf.icv_right as u32 & 0x7F) << 23);
    buf[10..14].copy_from_slice(&border1.to_le_bytes());

    let fls: u32 = if xf.fill_solid { 1 } else { 0 };
    let border2: u32 =
        (xf.icv_top as u32 & 0x7F) | ((xf.icv_bottom as u32 & 0x7F) << 7) | (fls << 26);
    buf[14..18].copy_from_slice(&border2.to_le_bytes());

    let fill: u16 = (xf.icv_fore & 0x7F) | ((xf.icv_back & 0x7F) << 7);
    buf[18..20].copy_from_slice(&fill.to_le_bytes());
    buf
}

// ============================================================================
// Style table
// ============================================================================

/// The workbook style table for the legacy format.
///
/// Styles are interned when a named style is defined, not at save time.
/// The returned [`StyleId`] is logical; [`XlsStyles::ixfe_for`] maps it to
/// the physical XF index cells reference.
#[derive(Debug)]
pub struct XlsStyles {
    /// Deduplicated fonts. Position 0 is the default font; the file skips
    /// ifnt 4, so positions 1.. map to ifnt 5...
    fonts: Vec<BiffFont>,
    /// Custom number format codes, ifmt 164+.
    formats: Vec<String>,
    /// Compiled cell XFs for interned styles, ixfe 16+.
    xfs: Vec<BiffXf>,
    ids: HashMap<Style, StyleId>,
}

impl Default for XlsStyles {
    fn default() -> Self {
        Self::new()
    }
}

impl XlsStyles {
    pub fn new() -> Self {
        let mut ids = HashMap::new();
        ids.insert(Style::default(), 0);
        Self {
            fonts: vec![BiffFont::from_style(&FontStyle::default())],
            formats: Vec::new(),
            xfs: Vec::new(),
            ids,
        }
    }

    /// Intern a style, compiling it into FONT/FORMAT/XF entries.
    ///
    /// Equal styles share one id. Id 0 is the default style.
    pub fn intern(&mut self, style: &Style) -> StyleId {
        if let Some(&id) = self.ids.get(style) {
            return id;
        }
        let xf = self.compile(style);
        self.xfs.push(xf);
        let id = self.xfs.len() as StyleId;
        self.ids.insert(style.clone(), id);
        id
    }

    /// Number of interned styles, including the default.
    pub fn len(&self) -> usize {
        self.xfs.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Physical XF index for a style id.
    pub fn ixfe_for(&self, id: StyleId) -> u16 {
        DEFAULT_CELL_IXFE + id as u16
    }

    /// XF index of the trailing date XF, used by unstyled date-time cells.
    pub fn date_ixfe(&self) -> u16 {
        DEFAULT_CELL_IXFE + 1 + self.xfs.len() as u16
    }

    fn compile(&mut self, style: &Style) -> BiffXf {
        let ifnt = self.intern_font(BiffFont::from_style(&style.font));
        let ifmt = match &style.number_format {
            NumberFormat::General => 0,
            NumberFormat::BuiltIn(id) => *id,
            NumberFormat::Custom(code) => self.intern_format(code),
        };

        let (fill_solid, icv_fore) = match &style.fill {
            FillStyle::None => (false, ICV_AUTO_FORE),
            FillStyle::Solid { color } => {
                let icv = match color {
                    Color::Auto => ICV_AUTO_FORE,
                    c => nearest_palette_icv(*c),
                };
                (true, icv)
            }
        };

        let (border_left, icv_left) = compile_edge(style.border.left.as_ref());
        let (border_right, icv_right) = compile_edge(style.border.right.as_ref());
        let (border_top, icv_top) = compile_edge(style.border.top.as_ref());
        let (border_bottom, icv_bottom) = compile_edge(style.border.bottom.as_ref());

        BiffXf {
            ifnt,
            ifmt,
            halign: halign_code(style.alignment.horizontal),
            valign: valign_code(style.alignment.vertical),
            wrap: style.alignment.wrap_text,
            border_left,
            border_right,
            border_top,
            border_bottom,
            icv_left,
            icv_right,
            icv_top,
            icv_bottom,
            fill_solid,
            icv_fore,
            icv_back: ICV_AUTO_BACK,
        }
    }

    fn intern_font(&mut self, font: BiffFont) -> u16 {
        let pos = match self.fonts.iter().position(|f| *f == font) {
            Some(p) => p,
            None => {
                self.fonts.push(font);
                self.fonts.len() - 1
            }
        };
        // ifnt 4 does not exist in the file
        if pos == 0 {
            0
        } else {
            (pos + 4) as u16
        }
    }

    fn intern_format(&mut self, code: &str) -> u16 {
        let pos = match self.formats.iter().position(|f| f == code) {
            Some(p) => p,
            None => {
                self.formats.push(code.to_string());
                self.formats.len() - 1
            }
        };
        FIRST_CUSTOM_IFMT + pos as u16
    }

    /// Append the FONT, FORMAT, XF, and STYLE records to the workbook
    /// globals stream.
    pub fn encode_globals(&self, out: &mut Vec<u8>) {
        // Excel expects at least 5 fonts; the default font is written four
        // times for ifnt 0–3 and custom fonts start at ifnt 5.
        let default_font = self.fonts[0].encode();
        for _ in 0..4 {
            write_record(out, records::FONT, &default_font);
        }
        for font in &self.fonts[1..] {
            write_record(out, records::FONT, &font.encode());
        }

        for (i, code) in self.formats.iter().enumerate() {
            let mut body = Vec::new();
            body.extend_from_slice(&(FIRST_CUSTOM_IFMT + i as u16).to_le_bytes());
            write_unicode_string(&mut body, code);
            write_record(out, records::FORMAT, &body);
        }

        // 15 style XFs. Indices 1–4 reference the default font copies the
        // built-in styles use.
        for i in 0..STYLE_XFS {
            let mut xf = BiffXf::default_cell();
            xf.ifnt = match i {
                1 | 2 => 1,
                3 | 4 => 2,
                _ => 0,
            };
            write_record(out, records::XF, &encode_xf(&xf, 0xFFF5, 0x00));
        }

        // Default cell XF at ixfe 15, interned cell XFs from 16.
        write_record(
            out,
            records::XF,
            &encode_xf(&BiffXf::default_cell(), 0x0001, 0x00),
        );
        for xf in &self.xfs {
            write_record(out, records::XF, &encode_xf(xf, 0x0001, 0xFC));
        }

        // Trailing date XF: default cell XF with the built-in date-time
        // format. Only the number format differs from Normal.
        let mut date_xf = BiffXf::default_cell();
        date_xf.ifmt = DATETIME_IFMT;
        write_record(out, records::XF, &encode_xf(&date_xf, 0x0001, 0x04));

        // STYLE record declaring the built-in Normal style on XF 0.
        write_record(out, records::STYLE, &[0x00, 0x80, 0x00, 0xFF]);
    }
}

fn compile_edge(edge: Option<&BorderEdge>) -> (u8, u16) {
    match edge {
        None => (0, 0),
        Some(e) => {
            let icv = match e.color {
                Color::Auto => ICV_AUTO_FORE,
                c => nearest_palette_icv(c),
            };
            (border_line_code(e.style), icv)
        }
    }
}

fn border_line_code(style: BorderLineStyle) -> u8 {
    match style {
        BorderLineStyle::None => 0,
        BorderLineStyle::Thin => 1,
        BorderLineStyle::Medium => 2,
        BorderLineStyle::Dashed => 3,
        BorderLineStyle::Dotted => 4,
        BorderLineStyle::Thick => 5,
        BorderLineStyle::Double => 6,
        BorderLineStyle::Hair => 7,
        BorderLineStyle::MediumDashed => 8,
        BorderLineStyle::DashDot => 9,
        BorderLineStyle::MediumDashDot => 10,
        BorderLineStyle::DashDotDot => 11,
        BorderLineStyle::MediumDashDotDot => 12,
        BorderLineStyle::SlantDashDot => 13,
    }
}

fn halign_code(align: HorizontalAlignment) -> u8 {
    match align {
        HorizontalAlignment::General => 0,
        HorizontalAlignment::Left => 1,
        HorizontalAlignment::Center => 2,
        HorizontalAlignment::Right => 3,
        HorizontalAlignment::Fill => 4,
        HorizontalAlignment::Justify => 5,
    }
}

fn valign_code(align: VerticalAlignment) -> u8 {
    match align {
        VerticalAlignment::Top => 0,
        VerticalAlignment::Center => 1,
        VerticalAlignment::Bottom => 2,
        VerticalAlignment::Justify => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biff::read_all_records;
    use std::io::Cursor;

    #[test]
    fn test_intern_dedup() {
        let mut styles = XlsStyles::new();
        let a = Style::new().bold(true);
        let b = Style::new().bold(true);
        let id_a = styles.intern(&a);
        let id_b = styles.intern(&b);
        assert_eq!(id_a, 1);
        assert_eq!(id_a, id_b);
        assert_eq!(styles.len(), 2);
    }

    #[test]
    fn test_default_style_is_zero() {
        let mut styles = XlsStyles::new();
        assert_eq!(styles.intern(&Style::default()), 0);
        assert_eq!(styles.len(), 1);
    }

    #[test]
    fn test_ixfe_mapping() {
        let mut styles = XlsStyles::new();
        assert_eq!(styles.ixfe_for(0), 15);
        assert_eq!(styles.date_ixfe(), 16);

        let id = styles.intern(&Style::new().italic(true));
        assert_eq!(styles.ixfe_for(id), 16);
        assert_eq!(styles.date_ixfe(), 17);
    }

    #[test]
    fn test_nearest_palette_icv() {
        assert_eq!(nearest_palette_icv(Color::rgb(0, 0, 0)), 8);
        assert_eq!(nearest_palette_icv(Color::rgb(255, 255, 255)), 9);
        assert_eq!(nearest_palette_icv(Color::rgb(255, 0, 0)), 10);
        // Near-red snaps to the red entry
        assert_eq!(nearest_palette_icv(Color::rgb(250, 10, 5)), 10);
    }

    #[test]
    fn test_font_encoding() {
        let font = BiffFont::from_style(
            &FontStyle::new()
                .with_name("Arial")
                .with_size(8.0)
                .with_bold(true),
        );
        let body = font.encode();
        // dyHeight = 160 twips (8pt)
        assert_eq!(u16::from_le_bytes([body[0], body[1]]), 160);
        // bls = 700 (bold)
        assert_eq!(u16::from_le_bytes([body[6], body[7]]), 700);
        // name as a short string at offset 14
        assert_eq!(body[14], 5);
        assert_eq!(&body[16..21], b"Arial");
    }

    #[test]
    fn test_default_cell_xf_encoding() {
        let body = encode_xf(&BiffXf::default_cell(), 0x0001, 0x00);
        // Alignment byte: halign general, valign bottom
        assert_eq!(body[6], 0x20);
        // Fill colors: icvFore 0x40, icvBack 0x41
        assert_eq!(u16::from_le_bytes([body[18], body[19]]), 0x40 | (0x41 << 7));
    }

    #[test]
    fn test_globals_record_counts() {
        let mut styles = XlsStyles::new();
        styles.intern(
            &Style::new()
                .bold(true)
                .number_format("0.00%")
                .border_all(BorderLineStyle::Thin),
        );

        let mut buf = Vec::new();
        styles.encode_globals(&mut buf);
        let recs = read_all_records(&mut Cursor::new(buf)).unwrap();

        let count = |ty: u16| recs.iter().filter(|r| r.record_type == ty).count();
        // 4 default fonts + 1 custom (bold)
        assert_eq!(count(records::FONT), 5);
        assert_eq!(count(records::FORMAT), 1);
        // 15 style XFs + default cell + 1 interned + date XF
        assert_eq!(count(records::XF), 18);
        assert_eq!(count(records::STYLE), 1);
    }

    #[test]
    fn test_custom_format_numbering() {
        let mut styles = XlsStyles::new();
        styles.intern(&Style::new().number_format("yyyy-mm-dd"));
        styles.intern(&Style::new().number_format("0.00%"));
        styles.intern(&Style::new().bold(true).number_format("yyyy-mm-dd"));
        // Two distinct codes only
        assert_eq!(styles.formats.len(), 2);
        assert_eq!(styles.formats[0], "yyyy-mm-dd");
        assert_eq!(styles.formats[1], "0.00%");
    }
}
