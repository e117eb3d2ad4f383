//! Legacy-format workbook writer

use std::collections::HashMap;
use std::fs::File;
use std::io::{Cursor, Seek, Write};
use std::path::Path;

use gridport_core::{Cell, CellValue, Workbook, Worksheet};

use crate::biff::strings::{build_sst, write_short_string};
use crate::biff::{encode_bof, records, write_record};
use crate::error::XlsResult;
use crate::styles::XlsStyles;

/// Legacy-format file writer.
///
/// The writer consumes a finished [`Workbook`] and its compiled
/// [`XlsStyles`] table; it never mutates either. Column autosizing is the
/// caller's job and runs before this point.
///
/// The produced container holds a single `Workbook` stream: one globals
/// substream (styles, sheet directory, shared strings) followed by one
/// substream per sheet.
pub struct XlsWriter;

impl XlsWriter {
    /// Write a workbook to a file path
    pub fn write_file<P: AsRef<Path>>(
        workbook: &Workbook,
        styles: &XlsStyles,
        path: P,
    ) -> XlsResult<()> {
        let file = File::create(path)?;
        Self::write(workbook, styles, file)
    }

    /// Write a workbook to a writer
    pub fn write<W: Write + Seek>(
        workbook: &Workbook,
        styles: &XlsStyles,
        mut writer: W,
    ) -> XlsResult<()> {
        let stream = Self::build_workbook_stream(workbook, styles);

        // The container library needs Read + Write + Seek on its backing
        // store, which the output writer may not have. Assemble the
        // container in memory and copy the result out.
        let mut comp = cfb::CompoundFile::create(Cursor::new(Vec::new()))?;
        {
            let mut workbook_stream = comp.create_stream("/Workbook")?;
            workbook_stream.write_all(&stream)?;
        }
        comp.flush()?;
        let bytes = comp.into_inner().into_inner();

        writer.write_all(&bytes)?;
        Ok(())
    }

    /// Serialize the `Workbook` stream: globals substream followed by one
    /// substream per sheet.
    fn build_workbook_stream(workbook: &Workbook, styles: &XlsStyles) -> Vec<u8> {
        // Sheet substreams come first so the shared string table is
        // complete before the globals are sized.
        let mut sst = SstBuilder::new();
        let sheet_streams: Vec<Vec<u8>> = workbook
            .sheets()
            .enumerate()
            .map(|(i, ws)| Self::encode_sheet(ws, styles, &mut sst, i == 0))
            .collect();

        let mut globals = Vec::new();
        write_record(
            &mut globals,
            records::BOF,
            &encode_bof(records::BOF_WORKBOOK_GLOBALS),
        );
        // Code page 1200: BIFF8 strings are Unicode
        write_record(&mut globals, records::CODEPAGE, &0x04B0u16.to_le_bytes());
        write_record(&mut globals, records::WINDOW1, &encode_window1());
        // 1900 date system, matching the serial numbers the core produces
        write_record(&mut globals, records::DATEMODE, &0u16.to_le_bytes());
        styles.encode_globals(&mut globals);

        // BOUNDSHEET lbPlyPos fields hold absolute stream offsets, so the
        // globals substream is sized before the records are written.
        let boundsheet_total: usize = workbook
            .sheets()
            .map(|ws| 4 + boundsheet_body_len(ws.name()))
            .sum();
        let sst_bytes = if sst.strings.is_empty() {
            Vec::new()
        } else {
            build_sst(sst.total_refs, &sst.strings)
        };
        let globals_total = globals.len() + boundsheet_total + sst_bytes.len() + 4;

        let mut offset = globals_total;
        for (i, ws) in workbook.sheets().enumerate() {
            let mut body = Vec::new();
            body.extend_from_slice(&(offset as u32).to_le_bytes());
            body.extend_from_slice(&0u16.to_le_bytes()); // visible worksheet
            write_short_string(&mut body, ws.name());
            write_record(&mut globals, records::BOUNDSHEET, &body);
            offset += sheet_streams[i].len();
        }

        globals.extend_from_slice(&sst_bytes);
        write_record(&mut globals, records::EOF, &[]);
        debug_assert_eq!(globals.len(), globals_total);

        for stream in &sheet_streams {
            globals.extend_from_slice(stream);
        }
        globals
    }

    fn encode_sheet(
        ws: &Worksheet,
        styles: &XlsStyles,
        sst: &mut SstBuilder,
        active: bool,
    ) -> Vec<u8> {
        let mut out = Vec::new();
        write_record(&mut out, records::BOF, &encode_bof(records::BOF_WORKSHEET));

        // Column widths settled by the autosize pass
        for (&col, &width) in ws.column_widths() {
            write_record(&mut out, records::COLINFO, &encode_colinfo(col, width));
        }

        write_record(&mut out, records::DIMENSION, &encode_dimension(ws));

        // ROW records keep appended-but-empty rows alive so the cursor
        // survives reopen
        for (row_idx, row) in ws.rows().enumerate() {
            write_record(
                &mut out,
                records::ROW,
                &encode_row(row_idx as u32, row.physical_cell_count()),
            );
        }

        for (row_idx, row) in ws.rows().enumerate() {
            for (col, cell) in row.iter() {
                Self::encode_cell(&mut out, row_idx as u32, col, cell, styles, sst);
            }
        }

        write_record(&mut out, records::WINDOW2, &encode_window2(active));
        write_record(&mut out, records::EOF, &[]);
        out
    }

    /// Encode one cell record.
    ///
    /// Unstyled date-time cells borrow the trailing date XF so they render
    /// as dates instead of raw serial numbers.
    fn encode_cell(
        out: &mut Vec<u8>,
        row: u32,
        col: u16,
        cell: &Cell,
        styles: &XlsStyles,
        sst: &mut SstBuilder,
    ) {
        let ixfe = match (&cell.value, cell.style) {
            (CellValue::DateTime(_), 0) => styles.date_ixfe(),
            (_, style) => styles.ixfe_for(style),
        };

        match &cell.value {
            CellValue::Blank => {
                // Padding blanks keep the physical cell count stable on
                // reopen
                let mut body = Vec::with_capacity(6);
                push_cell_header(&mut body, row, col, ixfe);
                write_record(out, records::BLANK, &body);
            }
            CellValue::Number(n) => {
                let mut body = Vec::with_capacity(14);
                push_cell_header(&mut body, row, col, ixfe);
                body.extend_from_slice(&n.to_le_bytes());
                write_record(out, records::NUMBER, &body);
            }
            CellValue::Text(s) => {
                let isst = sst.intern(s);
                let mut body = Vec::with_capacity(10);
                push_cell_header(&mut body, row, col, ixfe);
                body.extend_from_slice(&isst.to_le_bytes());
                write_record(out, records::LABELSST, &body);
            }
            CellValue::Boolean(b) => {
                let mut body = Vec::with_capacity(8);
                push_cell_header(&mut body, row, col, ixfe);
                body.push(u8::from(*b));
                body.push(0); // fError = 0: boolean cell
                write_record(out, records::BOOLERR, &body);
            }
            CellValue::DateTime(_) => {
                let serial = cell.value.serial_number().unwrap_or(0.0);
                let mut body = Vec::with_capacity(14);
                push_cell_header(&mut body, row, col, ixfe);
                body.extend_from_slice(&serial.to_le_bytes());
                write_record(out, records::NUMBER, &body);
            }
        }
    }
}

/// Collects shared strings while sheet substreams are encoded; the SST
/// record itself lands in the globals substream.
struct SstBuilder {
    strings: Vec<String>,
    index: HashMap<String, u32>,
    total_refs: u32,
}

impl SstBuilder {
    fn new() -> Self {
        Self {
            strings: Vec::new(),
            index: HashMap::new(),
            total_refs: 0,
        }
    }

    fn intern(&mut self, s: &str) -> u32 {
        self.total_refs += 1;
        if let Some(&i) = self.index.get(s) {
            return i;
        }
        let i = self.strings.len() as u32;
        self.strings.push(s.to_string());
        self.index.insert(s.to_string(), i);
        i
    }
}

fn push_cell_header(body: &mut Vec<u8>, row: u32, col: u16, ixfe: u16) {
    debug_assert!(row <= u16::MAX as u32);
    body.extend_from_slice(&(row as u16).to_le_bytes());
    body.extend_from_slice(&col.to_le_bytes());
    body.extend_from_slice(&ixfe.to_le_bytes());
}

fn boundsheet_body_len(name: &str) -> usize {
    let mut tmp = Vec::new();
    write_short_string(&mut tmp, name);
    6 + tmp.len() // lbPlyPos + grbit + name
}

/// WINDOW1 record body: workbook window geometry and tab state.
fn encode_window1() -> [u8; 18] {
    let mut b = [0u8; 18];
    b[0..2].copy_from_slice(&0x0168u16.to_le_bytes()); // xWn
    b[2..4].copy_from_slice(&0x010Eu16.to_le_bytes()); // yWn
    b[4..6].copy_from_slice(&0x3A5Cu16.to_le_bytes()); // dxWn
    b[6..8].copy_from_slice(&0x1FFEu16.to_le_bytes()); // dyWn
    b[8..10].copy_from_slice(&0x0038u16.to_le_bytes()); // grbit: scrollbars + tabs
    // itabCur = 0, itabFirst = 0
    b[14..16].copy_from_slice(&1u16.to_le_bytes()); // ctabSel
    b[16..18].copy_from_slice(&0x0258u16.to_le_bytes()); // wTabRatio
    b
}

/// WINDOW2 record body. The first sheet is the selected one.
fn encode_window2(active: bool) -> [u8; 18] {
    let grbit: u16 = if active { 0x06B6 } else { 0x00B6 };
    let mut b = [0u8; 18];
    b[0..2].copy_from_slice(&grbit.to_le_bytes());
    // rwTop = 0, colLeft = 0
    b[6..10].copy_from_slice(&0x00000040u32.to_le_bytes()); // icvHdr: auto
    b
}

/// COLINFO record body: one column run with an explicit width.
fn encode_colinfo(col: u16, width: f64) -> [u8; 12] {
    // Width unit is 1/256 of a character
    let coldx = (width * 256.0).round().clamp(0.0, u16::MAX as f64) as u16;
    let mut b = [0u8; 12];
    b[0..2].copy_from_slice(&col.to_le_bytes());
    b[2..4].copy_from_slice(&col.to_le_bytes());
    b[4..6].copy_from_slice(&coldx.to_le_bytes());
    b[6..8].copy_from_slice(&15u16.to_le_bytes()); // ixfe: Normal
    b
}

/// DIMENSION record body: exclusive row/column bounds of the used range.
fn encode_dimension(ws: &Worksheet) -> [u8; 14] {
    let mut b = [0u8; 14];
    b[4..8].copy_from_slice(&ws.row_count().to_le_bytes()); // rwMac
    b[10..12].copy_from_slice(&ws.max_physical_cell_count().to_le_bytes()); // colMac
    b
}

/// ROW record body with the default height.
fn encode_row(row: u32, col_mac: u16) -> [u8; 16] {
    debug_assert!(row <= u16::MAX as u32);
    let mut b = [0u8; 16];
    b[0..2].copy_from_slice(&(row as u16).to_le_bytes());
    b[4..6].copy_from_slice(&col_mac.to_le_bytes());
    b[6..8].copy_from_slice(&0x00FFu16.to_le_bytes()); // miyRw: default height
    b[12..14].copy_from_slice(&0x0100u16.to_le_bytes()); // grbit: reserved bit
    b[14..16].copy_from_slice(&0x000Fu16.to_le_bytes()); // ixfe: Normal
    b
}
