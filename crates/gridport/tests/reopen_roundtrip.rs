//! Save-and-reopen coverage for both workbook variants.

use std::io::Cursor;

use chrono::NaiveDate;
use gridport::prelude::*;
use gridport_core::value::datetime_to_serial;

/// Build the two-row report used across these tests.
fn sample_session(variant: FormatVariant) -> WorkbookSession {
    let mut session = WorkbookSession::new(variant);
    session.add_sheet("Report").unwrap();

    let row = session.add_row("Report").unwrap();
    assert_eq!(row.row_index(), 0);
    session.add_cell(row, 0, "Name").unwrap();
    session.add_cell(row, 1, "Score").unwrap();

    let row = session.add_row("Report").unwrap();
    assert_eq!(row.row_index(), 1);
    session.add_cell(row, 0, "Alice").unwrap();
    session.add_cell(row, 1, 95).unwrap();
    session
}

/// A modern workbook written to a file without any extension reopens via
/// its signature alone.
#[test]
fn test_modern_report_roundtrips_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out");

    let mut session = sample_session(FormatVariant::Modern);
    session.save(&path).unwrap();

    let reopened = WorkbookSession::open(&path).unwrap();
    assert_eq!(reopened.variant(), FormatVariant::Modern);

    let sheet = reopened.workbook().sheet_by_name("Report").unwrap();
    assert_eq!(sheet.row_count(), 2);
    assert_eq!(sheet.value(0, 0).as_text(), Some("Name"));
    assert_eq!(sheet.value(0, 1).as_text(), Some("Score"));
    assert_eq!(sheet.value(1, 0).as_text(), Some("Alice"));
    assert_eq!(sheet.value(1, 1).as_number(), Some(95.0));
}

/// Both variants roundtrip through in-memory streams, and the row cursor
/// picks up where the saved workbook left off.
#[test]
fn test_both_variants_roundtrip_through_streams() {
    for variant in [FormatVariant::Modern, FormatVariant::Legacy] {
        let mut session = sample_session(variant);

        let mut cursor = Cursor::new(Vec::new());
        session.save_to_stream(&mut cursor).unwrap();
        assert_eq!(cursor.position(), 0, "{variant}: stream not rewound");

        let mut reopened = WorkbookSession::open_stream(cursor, variant).unwrap();
        let sheet = reopened.workbook().sheet_by_name("Report").unwrap();
        assert_eq!(sheet.row_count(), 2, "{variant}");
        assert_eq!(sheet.value(1, 0).as_text(), Some("Alice"), "{variant}");
        assert_eq!(sheet.value(1, 1).as_number(), Some(95.0), "{variant}");

        let row = reopened.add_row("Report").unwrap();
        assert_eq!(row.row_index(), 2, "{variant}: cursor must resume after reopen");
    }
}

#[test]
fn test_booleans_and_blanks_survive_reopen() {
    for variant in [FormatVariant::Modern, FormatVariant::Legacy] {
        let mut session = WorkbookSession::new(variant);
        session.add_sheet("Flags").unwrap();
        let row = session.add_row("Flags").unwrap();
        session.add_cell(row, 0, true).unwrap();
        session.add_cell(row, 2, false).unwrap();

        let mut cursor = Cursor::new(Vec::new());
        session.save_to_stream(&mut cursor).unwrap();

        let reopened = WorkbookSession::open_stream(cursor, variant).unwrap();
        let sheet = reopened.workbook().sheet_by_name("Flags").unwrap();
        assert_eq!(sheet.value(0, 0).as_bool(), Some(true), "{variant}");
        assert!(sheet.value(0, 1).is_blank(), "{variant}");
        assert_eq!(sheet.value(0, 2).as_bool(), Some(false), "{variant}");
    }
}

/// Date cells are stored as serial numbers; reopening yields the serial,
/// not a reconstructed datetime.
#[test]
fn test_dates_reopen_as_serial_numbers() {
    let noon = NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();

    for variant in [FormatVariant::Modern, FormatVariant::Legacy] {
        let mut session = WorkbookSession::new(variant);
        session.add_sheet("Dates").unwrap();
        let row = session.add_row("Dates").unwrap();
        session.add_cell(row, 0, noon).unwrap();

        let mut cursor = Cursor::new(Vec::new());
        session.save_to_stream(&mut cursor).unwrap();

        let reopened = WorkbookSession::open_stream(cursor, variant).unwrap();
        let sheet = reopened.workbook().sheet(0).unwrap();
        let serial = sheet.value(0, 0).as_number();
        assert_eq!(serial, Some(datetime_to_serial(&noon)), "{variant}");
    }
}

/// Style names live in the session, not the file; a reopened workbook
/// starts with an empty registry and unstyled cells.
#[test]
fn test_styles_do_not_survive_reopen() {
    let mut session = WorkbookSession::new(FormatVariant::Modern);
    session.define_style("emphasis", &Style::new().bold(true));
    session.add_sheet("Data").unwrap();
    let row = session.add_row("Data").unwrap();
    session
        .add_cell_styled(row, 0, "loud", "emphasis")
        .unwrap();
    assert_ne!(
        session.workbook().sheet(0).unwrap().row(0).unwrap().cell(0).unwrap().style,
        0
    );

    let mut cursor = Cursor::new(Vec::new());
    session.save_to_stream(&mut cursor).unwrap();

    let reopened = WorkbookSession::open_stream(cursor, FormatVariant::Modern).unwrap();
    assert!(reopened.styles().is_empty());
    let sheet = reopened.workbook().sheet(0).unwrap();
    assert_eq!(sheet.value(0, 0).as_text(), Some("loud"));
    assert_eq!(sheet.row(0).unwrap().cell(0).unwrap().style, 0);
}

#[test]
fn test_sheet_order_survives_reopen() {
    for variant in [FormatVariant::Modern, FormatVariant::Legacy] {
        let mut session = WorkbookSession::new(variant);
        for name in ["Summary", "Detail", "Notes"] {
            session.add_sheet(name).unwrap();
            let row = session.add_row(name).unwrap();
            session.add_cell(row, 0, name).unwrap();
        }

        let mut cursor = Cursor::new(Vec::new());
        session.save_to_stream(&mut cursor).unwrap();

        let reopened = WorkbookSession::open_stream(cursor, variant).unwrap();
        let names: Vec<&str> = reopened
            .workbook()
            .sheets()
            .map(|s| s.name())
            .collect();
        assert_eq!(names, vec!["Summary", "Detail", "Notes"], "{variant}");
    }
}
