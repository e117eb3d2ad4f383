//! Output-format variant tag.
//!
//! A workbook targets exactly one on-disk format, chosen when the workbook
//! is created and immutable afterwards. The two variants carry different
//! row/column capacities and different file signatures.

use std::fmt;
use std::path::Path;

/// ZIP local-file header magic (modern OOXML packages).
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// OLE2 / Compound File Binary header magic (legacy BIFF8 files).
const CFB_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// The on-disk format a workbook is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FormatVariant {
    /// Legacy binary format (BIFF8 records in a CFB container, `.xls`).
    Legacy,
    /// Modern XML format (OOXML parts in a ZIP container, `.xlsx`).
    Modern,
}

impl FormatVariant {
    /// Maximum number of rows a sheet may hold in this variant.
    pub fn max_rows(self) -> u32 {
        match self {
            FormatVariant::Legacy => 65_536,
            FormatVariant::Modern => 1_048_576,
        }
    }

    /// Maximum number of columns a sheet may hold in this variant.
    pub fn max_cols(self) -> u16 {
        match self {
            FormatVariant::Legacy => 256,
            FormatVariant::Modern => 16_384,
        }
    }

    /// Conventional file extension for this variant.
    pub fn extension(self) -> &'static str {
        match self {
            FormatVariant::Legacy => "xls",
            FormatVariant::Modern => "xlsx",
        }
    }

    /// Infer the variant from a path's extension (case-insensitive).
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "xls" => Some(FormatVariant::Legacy),
            "xlsx" | "xlsm" => Some(FormatVariant::Modern),
            _ => None,
        }
    }

    /// Infer the variant from the first bytes of a file.
    ///
    /// Checks the ZIP local-file magic for modern packages and the CFB
    /// header magic for legacy files. Needs at least 8 bytes to identify
    /// a legacy file.
    pub fn from_signature(header: &[u8]) -> Option<Self> {
        if header.len() >= ZIP_MAGIC.len() && header[..ZIP_MAGIC.len()] == ZIP_MAGIC {
            return Some(FormatVariant::Modern);
        }
        if header.len() >= CFB_MAGIC.len() && header[..CFB_MAGIC.len()] == CFB_MAGIC {
            return Some(FormatVariant::Legacy);
        }
        None
    }
}

impl fmt::Display for FormatVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatVariant::Legacy => write!(f, "legacy (xls)"),
            FormatVariant::Modern => write!(f, "modern (xlsx)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits() {
        assert_eq!(FormatVariant::Legacy.max_rows(), 65_536);
        assert_eq!(FormatVariant::Legacy.max_cols(), 256);
        assert_eq!(FormatVariant::Modern.max_rows(), 1_048_576);
        assert_eq!(FormatVariant::Modern.max_cols(), 16_384);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(
            FormatVariant::from_path("report.xls"),
            Some(FormatVariant::Legacy)
        );
        assert_eq!(
            FormatVariant::from_path("report.XLSX"),
            Some(FormatVariant::Modern)
        );
        assert_eq!(FormatVariant::from_path("report.csv"), None);
        assert_eq!(FormatVariant::from_path("report"), None);
    }

    #[test]
    fn test_from_signature() {
        let zip = [0x50, 0x4B, 0x03, 0x04, 0x14, 0x00, 0x00, 0x00];
        assert_eq!(
            FormatVariant::from_signature(&zip),
            Some(FormatVariant::Modern)
        );

        let cfb = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
        assert_eq!(
            FormatVariant::from_signature(&cfb),
            Some(FormatVariant::Legacy)
        );

        assert_eq!(FormatVariant::from_signature(b"not a workbook"), None);
        assert_eq!(FormatVariant::from_signature(&[0xD0, 0xCF]), None);
    }
}
