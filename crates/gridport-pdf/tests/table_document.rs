//! End-to-end tests for building, saving, and reloading table reports.

use std::io::Cursor;

use gridport_pdf::{BorderBox, PdfError, TableDocumentBuilder};
use lopdf::Document;
use pretty_assertions::assert_eq;

fn sample_report(data_rows: usize) -> TableDocumentBuilder {
    let mut report = TableDocumentBuilder::new("Score Report");
    report.create_header(["ID", "Name"]).unwrap();
    for i in 0..data_rows {
        report
            .append_row(vec![(i as i64 + 1).into(), format!("person {i}").into()])
            .unwrap();
    }
    report
}

#[test]
fn report_roundtrips_through_stream() {
    let report = sample_report(2);
    let mut cursor = Cursor::new(Vec::new());
    report.save_to_stream(&mut cursor).unwrap();

    // The stream is rewound and immediately readable.
    assert_eq!(cursor.position(), 0);
    assert!(cursor.get_ref().starts_with(b"%PDF-1.5"));

    let doc = Document::load_from(&mut cursor).unwrap();
    assert_eq!(doc.get_pages().len(), 1);

    let text = doc.extract_text(&[1]).unwrap();
    assert!(text.contains("Score Report"), "missing title: {text}");
    assert!(text.contains("Name"), "missing heading: {text}");
    assert!(text.contains("person 1"), "missing data row: {text}");
    assert!(text.contains("Page 1 of 1"), "missing footer: {text}");
}

#[test]
fn spec_example_border_box() {
    let mut report = TableDocumentBuilder::new("t");
    report.create_header(["ID", "Name"]).unwrap();
    report.append_row(vec![1.into(), "A".into()]).unwrap();
    report.append_row(vec![2.into(), "B".into()]).unwrap();

    assert_eq!(report.row_count(), 3);
    assert!(report.document().heading_repeats());
    assert_eq!(report.border_box(), BorderBox { columns: 2, rows: 3 });
}

#[test]
fn long_report_repeats_heading_on_every_page() {
    let report = sample_report(200);
    let mut cursor = Cursor::new(Vec::new());
    report.save_to_stream(&mut cursor).unwrap();

    let doc = Document::load_from(&mut cursor).unwrap();
    let pages = doc.get_pages().len();
    assert!(pages > 1, "200 rows should not fit one page");

    for page in 1..=pages as u32 {
        let text = doc.extract_text(&[page]).unwrap();
        assert!(text.contains("Name"), "page {page} lost the heading");
        assert!(
            text.contains(&format!("Page {page} of {pages}")),
            "page {page} footer wrong: {text}"
        );
    }
}

#[test]
fn save_writes_a_loadable_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.pdf");

    let mut report = sample_report(3);
    report.save(&path).unwrap();

    let doc = Document::load(&path).unwrap();
    assert_eq!(doc.get_pages().len(), 1);
}

#[test]
fn wrong_extension_fails_before_any_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.txt");

    let mut report = sample_report(1);
    let err = report.save(&path).unwrap_err();
    assert!(matches!(err, PdfError::InvalidExtension(_)));
    assert!(!path.exists(), "refused save must not create a file");
}

#[test]
fn delete_on_close_removes_saved_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("transient.pdf");

    let mut report = sample_report(1);
    report.save(&path).unwrap();
    assert!(path.exists());

    report.set_delete_on_close(true);
    report.close().unwrap();
    assert!(!path.exists());

    // Second close is a no-op.
    report.close().unwrap();
}

#[test]
fn close_tolerates_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gone.pdf");

    let mut report = sample_report(1);
    report.save(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    report.set_delete_on_close(true);
    report.close().unwrap();
}

#[test]
fn unsaved_report_closes_cleanly() {
    let mut report = sample_report(1);
    report.set_delete_on_close(true);
    report.close().unwrap();
}
