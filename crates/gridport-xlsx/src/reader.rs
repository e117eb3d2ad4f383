//! Modern-format workbook reader
//!
//! Reads values and sheet structure back into the in-memory model. Style
//! definitions in the source file are not reconstructed; reopened cells
//! carry the default style id, and date cells come back as their serial
//! numbers.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use gridport_core::{CellValue, FormatVariant, Workbook};

/// Modern-format file reader
pub struct XlsxReader;

impl XlsxReader {
    /// Read a workbook from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<Workbook> {
        let file = File::open(path)?;
        Self::read(file)
    }

    /// Read a workbook from a reader
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Workbook> {
        let mut archive = zip::ZipArchive::new(reader)?;

        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::InvalidFormat(
                "missing [Content_Types].xml".to_string(),
            ));
        }

        let shared_strings = match archive.by_name("xl/sharedStrings.xml") {
            Ok(part) => read_shared_strings(part)?,
            Err(_) => Vec::new(),
        };

        let sheet_entries = {
            let part = archive
                .by_name("xl/workbook.xml")
                .map_err(|_| XlsxError::MissingPart("xl/workbook.xml".to_string()))?;
            read_workbook_xml(part)?
        };

        let rels = match archive.by_name("xl/_rels/workbook.xml.rels") {
            Ok(part) => read_workbook_rels(part)?,
            Err(_) => HashMap::new(),
        };

        let mut workbook = Workbook::new(FormatVariant::Modern);

        for (pos, (name, rid)) in sheet_entries.iter().enumerate() {
            let sheet = workbook.add_sheet(name.clone())?;

            let target = rels
                .get(rid)
                .cloned()
                .unwrap_or_else(|| format!("worksheets/sheet{}.xml", pos + 1));
            let part_name = match target.strip_prefix('/') {
                Some(absolute) => absolute.to_string(),
                None => format!("xl/{}", target),
            };

            let part = archive
                .by_name(&part_name)
                .map_err(|_| XlsxError::MissingPart(part_name.clone()))?;
            read_worksheet(part, &mut workbook, sheet, &shared_strings)?;
        }

        Ok(workbook)
    }
}

fn read_shared_strings<R: Read>(reader: R) -> XlsxResult<Vec<String>> {
    let mut xml_reader = Reader::from_reader(BufReader::new(reader));
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_si = false;
    let mut in_t = false;

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"si" => {
                    in_si = true;
                    current.clear();
                }
                b"t" if in_si => in_t = true,
                _ => {}
            },
            Ok(Event::Text(e)) if in_t => {
                current.push_str(&e.unescape()?);
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"t" => in_t = false,
                b"si" => {
                    strings.push(std::mem::take(&mut current));
                    in_si = false;
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(strings)
}

/// Sheet entries from xl/workbook.xml: (name, relationship id) in file order.
fn read_workbook_xml<R: Read>(reader: R) -> XlsxResult<Vec<(String, String)>> {
    let mut xml_reader = Reader::from_reader(BufReader::new(reader));
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut sheets = Vec::new();

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.name().as_ref() == b"sheet" => {
                let mut name = None;
                let mut rid = None;
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"name" => name = attr.unescape_value().ok().map(|v| v.to_string()),
                        b"r:id" => rid = attr.unescape_value().ok().map(|v| v.to_string()),
                        _ => {}
                    }
                }
                if let Some(name) = name {
                    sheets.push((name, rid.unwrap_or_default()));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(sheets)
}

/// Worksheet relationships: id -> target, filtered to worksheet parts.
fn read_workbook_rels<R: Read>(reader: R) -> XlsxResult<HashMap<String, String>> {
    let mut xml_reader = Reader::from_reader(BufReader::new(reader));
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut rels = HashMap::new();

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e))
                if e.name().as_ref() == b"Relationship" =>
            {
                let mut id = None;
                let mut target = None;
                let mut is_worksheet = false;
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"Id" => id = attr.unescape_value().ok().map(|v| v.to_string()),
                        b"Target" => target = attr.unescape_value().ok().map(|v| v.to_string()),
                        b"Type" => {
                            is_worksheet = attr
                                .unescape_value()
                                .map(|v| v.ends_with("/worksheet"))
                                .unwrap_or(false);
                        }
                        _ => {}
                    }
                }
                if is_worksheet {
                    if let (Some(id), Some(target)) = (id, target) {
                        rels.insert(id, target);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(rels)
}

fn read_worksheet<R: Read>(
    reader: R,
    workbook: &mut Workbook,
    sheet: usize,
    shared_strings: &[String],
) -> XlsxResult<()> {
    let mut xml_reader = Reader::from_reader(BufReader::new(reader));
    xml_reader.trim_text(true);

    let mut buf = Vec::new();

    let mut in_cell = false;
    let mut in_value = false;
    let mut in_inline_str = false;
    let mut cell_ref: Option<String> = None;
    let mut cell_type: Option<String> = None;
    let mut cell_text = String::new();

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e))
                if e.name().as_ref() == b"row" =>
            {
                for attr in e.attributes().flatten() {
                    if attr.key.as_ref() == b"r" {
                        if let Some(r) = attr.unescape_value().ok().and_then(|v| v.parse::<u32>().ok())
                        {
                            ensure_rows(workbook, sheet, r)?;
                        }
                    }
                }
            }
            Ok(Event::Start(e)) if e.name().as_ref() == b"c" => {
                in_cell = true;
                cell_ref = None;
                cell_type = None;
                cell_text.clear();
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"r" => cell_ref = attr.unescape_value().ok().map(|v| v.to_string()),
                        b"t" => cell_type = attr.unescape_value().ok().map(|v| v.to_string()),
                        _ => {}
                    }
                }
            }
            Ok(Event::Empty(e)) if e.name().as_ref() == b"c" => {
                // Style-only cell; keep it as blank padding
                let mut reference = None;
                for attr in e.attributes().flatten() {
                    if attr.key.as_ref() == b"r" {
                        reference = attr.unescape_value().ok().map(|v| v.to_string());
                    }
                }
                if let Some(r) = reference {
                    if let Some((row, col)) = parse_cell_reference(&r) {
                        ensure_rows(workbook, sheet, row + 1)?;
                        workbook.set_cell(sheet, row, col, CellValue::Blank, 0)?;
                    }
                }
            }
            Ok(Event::Start(e)) if in_cell => match e.name().as_ref() {
                b"v" => in_value = true,
                b"t" => in_inline_str = true,
                _ => {}
            },
            Ok(Event::Text(e)) if in_value || in_inline_str => {
                cell_text.push_str(&e.unescape()?);
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"v" => in_value = false,
                b"t" => in_inline_str = false,
                b"c" if in_cell => {
                    if let Some(r) = cell_ref.take() {
                        process_cell(
                            workbook,
                            sheet,
                            &r,
                            cell_type.as_deref(),
                            &cell_text,
                            shared_strings,
                        )?;
                    }
                    in_cell = false;
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

/// Make sure rows 0..count exist so later cursor math stays correct.
fn ensure_rows(workbook: &mut Workbook, sheet: usize, count: u32) -> XlsxResult<()> {
    while workbook.sheet(sheet)?.row_count() < count {
        workbook.append_row(sheet)?;
    }
    Ok(())
}

fn process_cell(
    workbook: &mut Workbook,
    sheet: usize,
    cell_ref: &str,
    cell_type: Option<&str>,
    text: &str,
    shared_strings: &[String],
) -> XlsxResult<()> {
    let (row, col) = match parse_cell_reference(cell_ref) {
        Some(rc) => rc,
        None => {
            log::warn!("skipping cell with unparsable reference {cell_ref:?}");
            return Ok(());
        }
    };

    let value = match cell_type {
        Some("s") => {
            let idx: usize = match text.trim().parse() {
                Ok(i) => i,
                Err(_) => {
                    log::warn!("skipping cell {cell_ref}: bad shared string index {text:?}");
                    return Ok(());
                }
            };
            match shared_strings.get(idx) {
                Some(s) => CellValue::Text(s.clone()),
                None => {
                    log::warn!("skipping cell {cell_ref}: shared string {idx} out of range");
                    return Ok(());
                }
            }
        }
        Some("b") => CellValue::Boolean(text.trim() == "1"),
        Some("str") | Some("inlineStr") => CellValue::Text(text.to_string()),
        Some("e") => {
            log::warn!("skipping error cell {cell_ref}: {text}");
            return Ok(());
        }
        Some("n") | None => match text.trim().parse::<f64>() {
            Ok(n) => CellValue::Number(n),
            Err(_) => {
                log::warn!("skipping cell {cell_ref}: unparsable number {text:?}");
                return Ok(());
            }
        },
        Some(other) => {
            log::warn!("skipping cell {cell_ref}: unsupported type {other:?}");
            return Ok(());
        }
    };

    ensure_rows(workbook, sheet, row + 1)?;
    workbook.set_cell(sheet, row, col, value, 0)?;
    Ok(())
}

/// Parse an A1-style reference into (row, col), both zero-based.
fn parse_cell_reference(s: &str) -> Option<(u32, u16)> {
    let letters_end = s.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = s.split_at(letters_end);
    if letters.is_empty() {
        return None;
    }

    let mut col: u32 = 0;
    for ch in letters.chars() {
        let v = (ch.to_ascii_uppercase() as u8).checked_sub(b'A')? as u32;
        if v > 25 {
            return None;
        }
        col = col * 26 + v + 1;
    }

    let row: u32 = digits.parse().ok()?;
    if row == 0 || col == 0 || col > u16::MAX as u32 + 1 {
        return None;
    }
    Some((row - 1, (col - 1) as u16))
}
