//! Named style registry.
//!
//! One registry per session. Defining a name translates the logical
//! [`Style`] into the session variant's physical representation right
//! away: modern styles go into the `cellXfs` table that becomes
//! `styles.xml`, legacy styles are compiled to BIFF XF images. Resolution
//! is a plain map lookup with no side effects, so styling a cell never
//! mutates the tables.

use ahash::AHashMap;
use gridport_core::{FormatVariant, Style, StyleId};
use gridport_xls::XlsStyles;
use gridport_xlsx::XlsxStyles;

/// The materialized style table for one format variant.
#[derive(Debug)]
pub(crate) enum VariantStyles {
    Legacy(XlsStyles),
    Modern(XlsxStyles),
}

/// Named style definitions for one session.
///
/// Keyed by style name. A name, once defined, can be redefined (the name
/// rebinds to the new definition) but never removed; cells styled under
/// an earlier definition keep the entry they were given.
#[derive(Debug)]
pub struct StyleRegistry {
    names: AHashMap<String, StyleId>,
    styles: VariantStyles,
}

impl StyleRegistry {
    /// Create an empty registry materializing for the given variant.
    pub fn new(variant: FormatVariant) -> Self {
        let styles = match variant {
            FormatVariant::Legacy => VariantStyles::Legacy(XlsStyles::new()),
            FormatVariant::Modern => VariantStyles::Modern(XlsxStyles::new()),
        };
        StyleRegistry {
            names: AHashMap::new(),
            styles,
        }
    }

    /// Define or redefine a named style.
    ///
    /// Never fails. The style is interned into the variant's table here,
    /// at definition time; equal definitions share one entry.
    pub fn define<S: Into<String>>(&mut self, name: S, style: &Style) {
        let id = match &mut self.styles {
            VariantStyles::Legacy(table) => table.intern(style),
            VariantStyles::Modern(table) => table.intern(style),
        };
        self.names.insert(name.into(), id);
    }

    /// Resolve a name to its interned style id.
    ///
    /// `None` for names never defined; callers treat that as "no style
    /// applied", not as an error.
    pub fn resolve(&self, name: &str) -> Option<StyleId> {
        self.names.get(name).copied()
    }

    /// Number of defined names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when no style has been defined.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub(crate) fn variant_styles(&self) -> &VariantStyles {
        &self.styles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_and_resolve() {
        let mut registry = StyleRegistry::new(FormatVariant::Modern);
        assert!(registry.is_empty());
        assert_eq!(registry.resolve("header"), None);

        registry.define("header", &Style::new().bold(true));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.resolve("header"), Some(1));
    }

    #[test]
    fn test_equal_definitions_share_an_entry() {
        let mut registry = StyleRegistry::new(FormatVariant::Modern);
        registry.define("a", &Style::new().bold(true));
        registry.define("b", &Style::new().bold(true));
        assert_eq!(registry.resolve("a"), registry.resolve("b"));
    }

    #[test]
    fn test_redefine_rebinds_the_name() {
        let mut registry = StyleRegistry::new(FormatVariant::Legacy);
        registry.define("emphasis", &Style::new().bold(true));
        let first = registry.resolve("emphasis").unwrap();

        registry.define("emphasis", &Style::new().italic(true));
        let second = registry.resolve("emphasis").unwrap();

        assert_ne!(first, second);
        assert_eq!(registry.len(), 1);
    }
}
