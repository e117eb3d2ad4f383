//! Session-level behavior: cursors, styling, autosizing, disposal.

use std::io::Cursor;

use gridport::prelude::*;
use proptest::prelude::*;

/// Row indices count prior add_row calls per sheet, starting at zero.
#[test]
fn test_row_cursor_per_sheet() {
    let mut session = WorkbookSession::new(FormatVariant::Modern);
    session.add_sheet("A").unwrap();
    session.add_sheet("B").unwrap();

    assert_eq!(session.add_row("A").unwrap().row_index(), 0);
    assert_eq!(session.add_row("A").unwrap().row_index(), 1);
    assert_eq!(session.add_row("B").unwrap().row_index(), 0);
    assert_eq!(session.add_row("A").unwrap().row_index(), 2);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// For any interleaving of add_row calls across sheets, the returned
    /// index equals the number of prior successful calls for that sheet.
    #[test]
    fn prop_row_index_counts_prior_calls(picks in prop::collection::vec(0usize..3, 1..200)) {
        let names = ["Alpha", "Beta", "Gamma"];
        let mut session = WorkbookSession::new(FormatVariant::Modern);
        for name in names {
            session.add_sheet(name).unwrap();
        }

        let mut counts = [0u32; 3];
        for pick in picks {
            let row = session.add_row(names[pick]).unwrap();
            prop_assert_eq!(row.sheet_index(), pick);
            prop_assert_eq!(row.row_index(), counts[pick]);
            counts[pick] += 1;
        }
    }
}

#[test]
fn test_unknown_style_never_fails() {
    let mut session = WorkbookSession::new(FormatVariant::Modern);
    session.add_sheet("Data").unwrap();
    let row = session.add_row("Data").unwrap();

    session
        .add_cell_styled(row, 0, "kept", "never defined")
        .unwrap();

    let sheet = session.workbook().sheet(0).unwrap();
    assert_eq!(sheet.value(0, 0).as_text(), Some("kept"));
    assert_eq!(sheet.row(0).unwrap().cell(0).unwrap().style, 0);
}

#[test]
fn test_sparse_cell_pads_intermediate_blanks() {
    let mut session = WorkbookSession::new(FormatVariant::Modern);
    session.add_sheet("Data").unwrap();
    let row = session.add_row("Data").unwrap();
    session.add_cell(row, 3, "far right").unwrap();

    let sheet = session.workbook().sheet(0).unwrap();
    assert_eq!(sheet.max_physical_cell_count(), 4);
    assert!(sheet.value(0, 1).is_blank());
}

/// After a save, every column in [0, max physical cell count) has been
/// given a width by the autosize pass.
#[test]
fn test_autosize_covers_every_column() {
    for variant in [FormatVariant::Modern, FormatVariant::Legacy] {
        let mut session = WorkbookSession::new(variant);
        session.add_sheet("Data").unwrap();
        let r0 = session.add_row("Data").unwrap();
        session.add_cell(r0, 0, "Name").unwrap();
        let r1 = session.add_row("Data").unwrap();
        session.add_cell(r1, 4, "sparse column").unwrap();

        let mut cursor = Cursor::new(Vec::new());
        session.save_to_stream(&mut cursor).unwrap();

        let sheet = session.workbook().sheet(0).unwrap();
        assert_eq!(sheet.max_physical_cell_count(), 5);
        assert_eq!(sheet.column_widths().len(), 5, "{variant}");
        for col in 0..5 {
            assert!(
                sheet.column_width(col).is_some(),
                "column {col} missed by the autosize pass ({variant})"
            );
        }
    }
}

#[test]
fn test_open_rejects_unknown_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mystery.dat");
    std::fs::write(&path, b"plain text, not a workbook").unwrap();

    let err = WorkbookSession::open(&path).unwrap_err();
    assert!(matches!(err, Error::UnknownFormat(_)));
}

/// The on-disk format follows the variant, not the file name; reopening
/// trusts the signature over a misleading extension.
#[test]
fn test_save_ignores_extension_and_open_sniffs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mislabeled.xlsx");

    let mut session = WorkbookSession::new(FormatVariant::Legacy);
    session.add_sheet("Data").unwrap();
    let row = session.add_row("Data").unwrap();
    session.add_cell(row, 0, 1.5).unwrap();
    session.save(&path).unwrap();

    let reopened = WorkbookSession::open(&path).unwrap();
    assert_eq!(reopened.variant(), FormatVariant::Legacy);
    assert_eq!(
        reopened.workbook().sheet(0).unwrap().value(0, 0).as_number(),
        Some(1.5)
    );
}

#[test]
fn test_delete_on_close_removes_saved_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("transient.xlsx");

    let mut session = WorkbookSession::new(FormatVariant::Modern);
    session.add_sheet("Data").unwrap();
    session.save(&path).unwrap();
    assert!(path.exists());

    session.set_delete_on_close(true);
    session.close().unwrap();
    assert!(!path.exists());

    // Second close is a no-op.
    session.close().unwrap();
}

#[test]
fn test_close_tolerates_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gone.xls");

    let mut session = WorkbookSession::new(FormatVariant::Legacy);
    session.add_sheet("Data").unwrap();
    session.save(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    session.set_delete_on_close(true);
    session.close().unwrap();
}

#[test]
fn test_close_without_delete_keeps_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kept.xlsx");

    let mut session = WorkbookSession::new(FormatVariant::Modern);
    session.add_sheet("Data").unwrap();
    session.save(&path).unwrap();
    session.close().unwrap();
    assert!(path.exists());
}

#[test]
fn test_dropping_session_deletes_when_flagged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dropped.xlsx");

    {
        let mut session = WorkbookSession::new(FormatVariant::Modern);
        session.add_sheet("Data").unwrap();
        session.save(&path).unwrap();
        session.set_delete_on_close(true);
    }
    assert!(!path.exists());
}
