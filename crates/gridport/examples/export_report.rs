//! Example: Export a score table as an xlsx workbook and a PDF report

use gridport::prelude::*;

fn main() -> Result<()> {
    let rows = [("Alice", 95.0), ("Bob", 87.5), ("Carol", 91.0)];

    // Spreadsheet export
    let mut session = WorkbookSession::new(FormatVariant::Modern);
    session.define_style("header", &Style::new().bold(true));
    session.add_sheet("Report")?;

    let header = session.add_row("Report")?;
    session.add_cell_styled(header, 0, "Name", "header")?;
    session.add_cell_styled(header, 1, "Score", "header")?;

    for (name, score) in rows {
        let row = session.add_row("Report")?;
        session.add_cell(row, 0, name)?;
        session.add_cell(row, 1, score)?;
    }

    session.save("/tmp/report.xlsx")?;
    println!("Created /tmp/report.xlsx");

    // The same table as a paginated PDF report
    let mut report = TableDocumentBuilder::new("Score Report");
    report.create_header(["Name", "Score"])?;
    for (name, score) in rows {
        report.append_row([name.into(), score.into()])?;
    }
    report.save("/tmp/report.pdf")?;
    println!(
        "Created /tmp/report.pdf ({} data rows)",
        report.row_count().saturating_sub(1)
    );

    Ok(())
}
