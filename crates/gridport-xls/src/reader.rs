//! Legacy-format (BIFF8) reader.
//!
//! Opens the compound-file container, reads the `Workbook` stream, parses
//! BIFF8 records, and populates a [`Workbook`].
//!
//! Values and row structure are restored; cell styles are not mapped back
//! to logical styles, so reopened cells carry the default style id. Date
//! cells come back as their serial numbers.

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use gridport_core::{CellValue, FormatVariant, Workbook, Worksheet};

use crate::biff::parser::{read_f64, read_rk, read_u16, read_u32};
use crate::biff::records;
use crate::biff::strings::{parse_sst, read_short_string, read_unicode_string};
use crate::biff::{self, BiffRecord};
use crate::error::{XlsError, XlsResult};

/// Legacy-format file reader.
pub struct XlsReader;

/// Sheet directory entry parsed from a BOUNDSHEET record.
#[derive(Debug)]
struct SheetInfo {
    /// Sheet type: 0 = worksheet, 2 = chart, 6 = macro.
    sheet_type: u8,
    name: String,
}

impl XlsReader {
    /// Read a workbook from a filesystem path.
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsResult<Workbook> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::read(file)
    }

    /// Read a workbook from any `Read + Seek` source.
    pub fn read<R: Read + Seek>(reader: R) -> XlsResult<Workbook> {
        let mut cfb = cfb::CompoundFile::open(reader)?;

        // Older writers name the stream "Book"
        let stream_path = if cfb.exists("/Workbook") {
            "/Workbook"
        } else if cfb.exists("/Book") {
            "/Book"
        } else {
            return Err(XlsError::InvalidFormat(
                "no Workbook or Book stream found in container".into(),
            ));
        };

        let mut stream_data = Vec::new();
        {
            let mut stream = cfb.open_stream(stream_path)?;
            stream.read_to_end(&mut stream_data)?;
        }

        let mut cursor = Cursor::new(&stream_data);
        let all_records = biff::read_all_records(&mut cursor)?;

        // Phase 1: workbook globals
        let mut sst: Vec<String> = Vec::new();
        let mut sheets: Vec<SheetInfo> = Vec::new();
        let mut in_globals = false;
        let mut globals_end_idx = 0;

        for (idx, rec) in all_records.iter().enumerate() {
            match rec.record_type {
                records::BOF => {
                    let (version, dt) = biff::parse_bof(&rec.data)?;
                    if dt == records::BOF_WORKBOOK_GLOBALS {
                        if version != records::BIFF8_VERSION {
                            return Err(XlsError::UnsupportedVersion(format!(
                                "expected BIFF8 (0x0600), got 0x{version:04X}"
                            )));
                        }
                        in_globals = true;
                    }
                }
                records::EOF if in_globals => {
                    globals_end_idx = idx;
                    break;
                }
                records::SST if in_globals => {
                    sst = parse_sst(&rec.data)?;
                }
                records::BOUNDSHEET if in_globals => {
                    sheets.push(Self::parse_boundsheet(&rec.data)?);
                }
                records::DATEMODE if in_globals => {
                    if rec.data.len() >= 2 {
                        let mode = u16::from_le_bytes([rec.data[0], rec.data[1]]);
                        if mode == 1 {
                            // Serial conversion assumes the 1900 system
                            log::warn!("1904 date system in file; date serials will be offset");
                        }
                    }
                }
                _ => {}
            }
        }

        if !in_globals {
            return Err(XlsError::InvalidFormat(
                "no workbook globals BOF found".into(),
            ));
        }

        // Phase 2: per-sheet substreams, matched to the sheet directory in
        // order
        let remaining = &all_records[globals_end_idx + 1..];
        let sheet_groups = Self::split_sheet_records(remaining);

        let mut workbook = Workbook::new(FormatVariant::Legacy);
        for (biff_idx, info) in sheets.iter().enumerate() {
            // Charts and macro sheets have no cell grid
            if info.sheet_type != 0 {
                continue;
            }

            let idx = workbook.add_sheet(&info.name)?;
            let ws = workbook.sheet_mut(idx)?;
            if let Some(group) = sheet_groups.get(biff_idx) {
                Self::parse_sheet_records(group, ws, &sst)?;
            }
        }

        Ok(workbook)
    }

    /// Parse a BOUNDSHEET record body.
    fn parse_boundsheet(data: &[u8]) -> XlsResult<SheetInfo> {
        let mut offset = 0;
        let _stream_offset = read_u32(data, &mut offset)?;
        let _visibility = data.get(offset).copied().unwrap_or(0);
        offset += 1;
        let sheet_type = data.get(offset).copied().unwrap_or(0);
        offset += 1;
        let name = read_short_string(data, &mut offset)?;

        Ok(SheetInfo { sheet_type, name })
    }

    /// Group the records after the globals into one group per BOF..EOF
    /// substream.
    fn split_sheet_records(all: &[BiffRecord]) -> Vec<Vec<&BiffRecord>> {
        let mut groups: Vec<Vec<&BiffRecord>> = Vec::new();
        let mut current: Option<Vec<&BiffRecord>> = None;
        let mut depth = 0i32;

        for rec in all {
            match rec.record_type {
                records::BOF => {
                    if depth == 0 {
                        current = Some(Vec::new());
                    }
                    depth += 1;
                }
                records::EOF => {
                    depth -= 1;
                    if depth == 0 {
                        if let Some(group) = current.take() {
                            groups.push(group);
                        }
                    }
                }
                _ => {
                    if let Some(ref mut group) = current {
                        group.push(rec);
                    }
                }
            }
        }

        groups
    }

    fn parse_sheet_records(
        group: &[&BiffRecord],
        ws: &mut Worksheet,
        sst: &[String],
    ) -> XlsResult<()> {
        for rec in group {
            match rec.record_type {
                records::ROW => Self::parse_row(&rec.data, ws)?,
                records::COLINFO => Self::parse_colinfo(&rec.data, ws)?,
                records::LABELSST => Self::parse_labelsst(&rec.data, ws, sst)?,
                records::LABEL => Self::parse_label(&rec.data, ws)?,
                records::NUMBER => Self::parse_number(&rec.data, ws)?,
                records::RK => Self::parse_rk(&rec.data, ws)?,
                records::MULRK => Self::parse_mulrk(&rec.data, ws)?,
                records::BLANK => Self::parse_blank(&rec.data, ws)?,
                records::MULBLANK => Self::parse_mulblank(&rec.data, ws)?,
                records::BOOLERR => Self::parse_boolerr(&rec.data, ws)?,
                _ => {}
            }
        }
        Ok(())
    }

    // ── Cell record parsers ──────────────────────────────────────────────

    /// LABELSST: row(2) + col(2) + ixfe(2) + isst(4)
    fn parse_labelsst(data: &[u8], ws: &mut Worksheet, sst: &[String]) -> XlsResult<()> {
        let mut off = 0;
        let row = read_u16(data, &mut off)? as u32;
        let col = read_u16(data, &mut off)?;
        let _ixfe = read_u16(data, &mut off)?;
        let isst = read_u32(data, &mut off)? as usize;

        match sst.get(isst) {
            Some(s) => set_value(ws, row, col, CellValue::Text(s.clone())),
            None => log::warn!("LABELSST references missing shared string {isst}"),
        }
        Ok(())
    }

    /// LABEL: row(2) + col(2) + ixfe(2) + inline unicode string
    fn parse_label(data: &[u8], ws: &mut Worksheet) -> XlsResult<()> {
        let mut off = 0;
        let row = read_u16(data, &mut off)? as u32;
        let col = read_u16(data, &mut off)?;
        let _ixfe = read_u16(data, &mut off)?;
        let text = read_unicode_string(data, &mut off)?;

        set_value(ws, row, col, CellValue::Text(text));
        Ok(())
    }

    /// NUMBER: row(2) + col(2) + ixfe(2) + f64(8)
    fn parse_number(data: &[u8], ws: &mut Worksheet) -> XlsResult<()> {
        let mut off = 0;
        let row = read_u16(data, &mut off)? as u32;
        let col = read_u16(data, &mut off)?;
        let _ixfe = read_u16(data, &mut off)?;
        let value = read_f64(data, &mut off)?;

        set_value(ws, row, col, CellValue::Number(value));
        Ok(())
    }

    /// RK: row(2) + col(2) + ixfe(2) + rk(4)
    fn parse_rk(data: &[u8], ws: &mut Worksheet) -> XlsResult<()> {
        let mut off = 0;
        let row = read_u16(data, &mut off)? as u32;
        let col = read_u16(data, &mut off)?;
        let _ixfe = read_u16(data, &mut off)?;
        let value = read_rk(data, &mut off)?;

        set_value(ws, row, col, CellValue::Number(value));
        Ok(())
    }

    /// MULRK: row(2) + first_col(2) + [ixfe(2) + rk(4)]* + last_col(2)
    fn parse_mulrk(data: &[u8], ws: &mut Worksheet) -> XlsResult<()> {
        if data.len() < 6 {
            return Err(XlsError::Parse("MULRK record too short".into()));
        }
        let mut off = 0;
        let row = read_u16(data, &mut off)? as u32;
        let first_col = read_u16(data, &mut off)?;
        let last_col = u16::from_le_bytes([data[data.len() - 2], data[data.len() - 1]]);
        let rk_data_end = data.len() - 2;

        let mut col = first_col;
        while off + 6 <= rk_data_end && col <= last_col {
            let _ixfe = read_u16(data, &mut off)?;
            let value = read_rk(data, &mut off)?;
            set_value(ws, row, col, CellValue::Number(value));
            col += 1;
        }
        Ok(())
    }

    /// BLANK: row(2) + col(2) + ixfe(2)
    ///
    /// Materialized as a blank cell so the physical cell count survives
    /// reopen.
    fn parse_blank(data: &[u8], ws: &mut Worksheet) -> XlsResult<()> {
        if data.len() < 6 {
            return Ok(());
        }
        let mut off = 0;
        let row = read_u16(data, &mut off)? as u32;
        let col = read_u16(data, &mut off)?;
        let _ixfe = read_u16(data, &mut off)?;

        set_value(ws, row, col, CellValue::Blank);
        Ok(())
    }

    /// MULBLANK: row(2) + first_col(2) + [ixfe(2)]* + last_col(2)
    fn parse_mulblank(data: &[u8], ws: &mut Worksheet) -> XlsResult<()> {
        if data.len() < 6 {
            return Ok(());
        }
        let mut off = 0;
        let row = read_u16(data, &mut off)? as u32;
        let first_col = read_u16(data, &mut off)?;
        let last_col = u16::from_le_bytes([data[data.len() - 2], data[data.len() - 1]]);
        let xf_data_end = data.len() - 2;

        let mut col = first_col;
        while off + 2 <= xf_data_end && col <= last_col {
            let _ixfe = read_u16(data, &mut off)?;
            set_value(ws, row, col, CellValue::Blank);
            col += 1;
        }
        Ok(())
    }

    /// BOOLERR: row(2) + col(2) + ixfe(2) + value(1) + is_error(1)
    fn parse_boolerr(data: &[u8], ws: &mut Worksheet) -> XlsResult<()> {
        let mut off = 0;
        let row = read_u16(data, &mut off)? as u32;
        let col = read_u16(data, &mut off)?;
        let _ixfe = read_u16(data, &mut off)?;
        let val = data.get(off).copied().unwrap_or(0);
        off += 1;
        let is_error = data.get(off).copied().unwrap_or(0);

        if is_error != 0 {
            // Error values have no counterpart in the cell model
            log::warn!("skipping error cell at ({row}, {col})");
            return Ok(());
        }

        set_value(ws, row, col, CellValue::Boolean(val != 0));
        Ok(())
    }

    // ── Structural record parsers ────────────────────────────────────────

    /// ROW: materializes the row so appended-but-empty rows keep their
    /// indices.
    fn parse_row(data: &[u8], ws: &mut Worksheet) -> XlsResult<()> {
        if data.len() < 8 {
            return Ok(());
        }
        let mut off = 0;
        let row_index = read_u16(data, &mut off)? as u32;
        ensure_rows(ws, row_index + 1);
        Ok(())
    }

    /// COLINFO: first_col(2) + last_col(2) + width(2) + ixfe(2) + ...
    fn parse_colinfo(data: &[u8], ws: &mut Worksheet) -> XlsResult<()> {
        if data.len() < 8 {
            return Ok(());
        }
        let mut off = 0;
        let first_col = read_u16(data, &mut off)?;
        let last_col = read_u16(data, &mut off)?;
        let raw_width = read_u16(data, &mut off)?;

        let width_chars = raw_width as f64 / 256.0;
        if width_chars > 0.0 {
            for col in first_col..=last_col {
                ws.set_column_width(col, width_chars);
            }
        }
        Ok(())
    }
}

fn ensure_rows(ws: &mut Worksheet, count: u32) {
    while ws.row_count() < count {
        ws.append_row();
    }
}

fn set_value(ws: &mut Worksheet, row: u32, col: u16, value: CellValue) {
    ensure_rows(ws, row + 1);
    ws.set_cell(row, col, value, 0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biff::strings::write_short_string;

    #[test]
    fn test_parse_boundsheet() {
        let mut body = Vec::new();
        body.extend_from_slice(&4242u32.to_le_bytes());
        body.push(0); // visible
        body.push(0); // worksheet
        write_short_string(&mut body, "Summary");

        let info = XlsReader::parse_boundsheet(&body).unwrap();
        assert_eq!(info.sheet_type, 0);
        assert_eq!(info.name, "Summary");
    }

    #[test]
    fn test_split_sheet_records_groups_by_bof() {
        let rec = |ty: u16| BiffRecord {
            record_type: ty,
            data: Vec::new(),
            stream_offset: 0,
        };
        let all = vec![
            rec(records::BOF),
            rec(records::NUMBER),
            rec(records::EOF),
            rec(records::BOF),
            rec(records::LABELSST),
            rec(records::BLANK),
            rec(records::EOF),
        ];

        let groups = XlsReader::split_sheet_records(&all);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 1);
        assert_eq!(groups[1].len(), 2);
    }
}
