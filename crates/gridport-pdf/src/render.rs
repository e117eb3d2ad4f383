//! PDF object graph assembly.
//!
//! Builds a complete `lopdf::Document` from a [`TableDocument`]: a pages
//! tree with inherited resources (Type1 Helvetica and Helvetica-Bold,
//! WinAnsi encoded), one content stream per page carrying the heading
//! shading, the grid strokes, the border box for that page's slice, the
//! cell text, and a centered page-number footer. Byte-level serialization
//! stays inside `lopdf`.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};

use crate::error::PdfResult;
use crate::layout::{paginate, row_height, Layout, PageSlice};
use crate::page::{
    BODY_FONT_SIZE_PT, BORDER_COLOR, BOX_LINE_PT, CELL_SIDE_PADDING_PT, CHAR_WIDTH_FACTOR,
    EDGE_LINE_PT, FIRST_LINE_INDENT_PT, GRID_LINE_PT, HEADING_SHADING, TITLE_FONT_SIZE_PT,
};
use crate::table::{TableDocument, TableRow};

/// Resource name of the body font.
const BODY_FONT: &str = "F1";

/// Resource name of the bold font (title and heading rows).
const BOLD_FONT: &str = "F2";

/// Render the document into a fresh PDF object graph. Pure; no I/O.
pub(crate) fn render_document(doc: &TableDocument) -> PdfResult<Document> {
    let layout = Layout::new(doc.page(), doc.column_count(), !doc.title().is_empty());
    let slices = paginate(doc);

    let mut pdf = Document::with_version("1.5");
    let pages_id = pdf.new_object_id();
    let body_font_id = pdf.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_font_id = pdf.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = pdf.add_object(dictionary! {
        "Font" => dictionary! {
            BODY_FONT => body_font_id,
            BOLD_FONT => bold_font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(slices.len());
    for (index, slice) in slices.iter().enumerate() {
        let content = page_content(doc, &layout, slice, index, slices.len());
        let stream_id = pdf.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = pdf.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => stream_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    pdf.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                real(layout.page_width),
                real(layout.page_height),
            ],
        }),
    );

    let catalog_id = pdf.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    pdf.trailer.set("Root", catalog_id);
    pdf.compress();
    Ok(pdf)
}

/// Build the content stream for one page.
fn page_content(
    doc: &TableDocument,
    layout: &Layout,
    slice: &PageSlice,
    page_index: usize,
    page_total: usize,
) -> Content {
    let mut rows: Vec<&TableRow> = Vec::new();
    if slice.repeat_heading {
        if let Some(heading) = doc.rows().first() {
            rows.push(heading);
        }
    }
    rows.extend(&doc.rows()[slice.rows.clone()]);

    let mut ops: Vec<Operation> = Vec::new();

    if page_index == 0 && !doc.title().is_empty() {
        push_text(
            &mut ops,
            BOLD_FONT,
            TITLE_FONT_SIZE_PT,
            layout.table_left(),
            layout.title_baseline(),
            doc.title(),
        );
    }

    if !rows.is_empty() && doc.column_count() > 0 {
        let top = layout.table_top(page_index);
        let left = layout.table_left();
        let width = layout.table_width();
        let col_w = layout.column_width();
        let row_h = row_height();
        let bottom = top - rows.len() as f64 * row_h;

        // Shading first so strokes and text paint over it.
        let shaded: Vec<usize> = rows
            .iter()
            .enumerate()
            .filter(|(_, r)| r.heading)
            .map(|(i, _)| i)
            .collect();
        if !shaded.is_empty() {
            ops.push(Operation::new("rg", color_operands(HEADING_SHADING)));
            for i in shaded {
                let y = top - (i + 1) as f64 * row_h;
                ops.push(Operation::new(
                    "re",
                    vec![real(left), real(y), real(width), real(row_h)],
                ));
            }
            ops.push(Operation::new("f", vec![]));
            // Text is painted with the fill color.
            ops.push(Operation::new("rg", color_operands((0, 0, 0))));
        }

        ops.push(Operation::new("RG", color_operands(BORDER_COLOR)));

        // Inner separators.
        ops.push(Operation::new("w", vec![real(GRID_LINE_PT)]));
        for i in 1..rows.len() {
            let y = top - i as f64 * row_h;
            ops.push(Operation::new("m", vec![real(left), real(y)]));
            ops.push(Operation::new("l", vec![real(left + width), real(y)]));
        }
        for c in 1..doc.column_count() {
            let x = left + c as f64 * col_w;
            ops.push(Operation::new("m", vec![real(x), real(top)]));
            ops.push(Operation::new("l", vec![real(x), real(bottom)]));
        }
        ops.push(Operation::new("S", vec![]));

        // Heavier outer verticals.
        ops.push(Operation::new("w", vec![real(EDGE_LINE_PT)]));
        ops.push(Operation::new("m", vec![real(left), real(top)]));
        ops.push(Operation::new("l", vec![real(left), real(bottom)]));
        ops.push(Operation::new("m", vec![real(left + width), real(top)]));
        ops.push(Operation::new("l", vec![real(left + width), real(bottom)]));
        ops.push(Operation::new("S", vec![]));

        // Border box around this page's slice of the table.
        ops.push(Operation::new("w", vec![real(BOX_LINE_PT)]));
        ops.push(Operation::new(
            "re",
            vec![real(left), real(bottom), real(width), real(top - bottom)],
        ));
        ops.push(Operation::new("S", vec![]));

        for (i, row) in rows.iter().enumerate() {
            let y_bottom = top - (i + 1) as f64 * row_h;
            let baseline = y_bottom + (row_h - BODY_FONT_SIZE_PT) / 2.0;
            let font = if row.heading { BOLD_FONT } else { BODY_FONT };
            for (c, text) in row.cells.iter().enumerate() {
                let mut x = left + c as f64 * col_w + CELL_SIDE_PADDING_PT;
                if !row.heading {
                    x += FIRST_LINE_INDENT_PT;
                }
                let clipped = clip_text(
                    text,
                    col_w - 2.0 * CELL_SIDE_PADDING_PT,
                    BODY_FONT_SIZE_PT,
                );
                if clipped.is_empty() {
                    continue;
                }
                push_text(&mut ops, font, BODY_FONT_SIZE_PT, x, baseline, &clipped);
            }
        }
    }

    let footer = format!("Page {} of {}", page_index + 1, page_total);
    let footer_x = (layout.page_width - text_width(&footer, BODY_FONT_SIZE_PT)) / 2.0;
    push_text(
        &mut ops,
        BODY_FONT,
        BODY_FONT_SIZE_PT,
        footer_x,
        layout.footer_baseline(),
        &footer,
    );

    Content { operations: ops }
}

fn push_text(ops: &mut Vec<Operation>, font: &str, size: f64, x: f64, y: f64, text: &str) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new("Tf", vec![font.into(), real(size)]));
    ops.push(Operation::new("Td", vec![real(x), real(y)]));
    ops.push(Operation::new(
        "Tj",
        vec![Object::String(win_ansi(text), StringFormat::Literal)],
    ));
    ops.push(Operation::new("ET", vec![]));
}

fn real(v: f64) -> Object {
    Object::Real(v as _)
}

fn color_operands((r, g, b): (u8, u8, u8)) -> Vec<Object> {
    vec![
        real(f64::from(r) / 255.0),
        real(f64::from(g) / 255.0),
        real(f64::from(b) / 255.0),
    ]
}

/// Map text to WinAnsi bytes. Latin-1 covers the code points both share;
/// anything outside becomes `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if (c as u32) < 256 { c as u32 as u8 } else { b'?' })
        .collect()
}

/// Approximate rendered width of one line, character-count based.
fn text_width(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * font_size * CHAR_WIDTH_FACTOR
}

/// Truncate text that cannot fit the given width.
fn clip_text(text: &str, width: f64, font_size: f64) -> String {
    let budget = (width / (font_size * CHAR_WIDTH_FACTOR)).floor() as usize;
    if text.chars().count() <= budget {
        text.to_string()
    } else {
        text.chars().take(budget).collect()
    }
}
