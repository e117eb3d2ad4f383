//! BIFF8 Unicode string encoding and decoding.
//!
//! BIFF8 strings carry a header then character data:
//! - Header: char_count (1 or 2 bytes) + flags (1 byte)
//! - Flags bit 0 (`fHighByte`): 0 = compressed Latin-1, 1 = UTF-16LE
//! - Flags bit 2 (`fExtSt`): extended string data follows
//! - Flags bit 3 (`fRichSt`): rich text run array follows
//!
//! In SST records, strings can span CONTINUE records. A continuation that
//! starts mid-string re-emits a flags byte, and may switch the encoding.
//! The writer splits between strings whenever one fits in the remaining
//! space, so in practice only oversized strings hit the mid-string case.

use super::parser::{read_u16, read_u32, read_u8};
use super::{records, write_record, MAX_RECORD_BODY};
use crate::error::{XlsError, XlsResult};

/// Longest string we store, in UTF-16 units (the Excel cell text limit).
const MAX_STRING_UNITS: usize = 32767;

// ── Reading ─────────────────────────────────────────────────────────────

/// Read a BIFF8 "short" string (1-byte length prefix, used in BOUNDSHEET
/// and FONT records).
pub fn read_short_string(data: &[u8], offset: &mut usize) -> XlsResult<String> {
    let char_count = read_u8(data, offset)? as u16;
    let flags = read_u8(data, offset)?;
    read_character_data(data, offset, char_count, flags)
}

/// Read a BIFF8 Unicode string with a 2-byte length prefix (used in SST,
/// FORMAT, LABEL).
///
/// This does not handle CONTINUE boundaries; SST callers concatenate the
/// record bodies first.
pub fn read_unicode_string(data: &[u8], offset: &mut usize) -> XlsResult<String> {
    let char_count = read_u16(data, offset)?;
    let flags = read_u8(data, offset)?;

    let is_rich = (flags & 0x08) != 0;
    let has_ext = (flags & 0x04) != 0;

    let run_count = if is_rich { read_u16(data, offset)? } else { 0 };
    let ext_size = if has_ext { read_u32(data, offset)? } else { 0 };

    let text = read_character_data(data, offset, char_count, flags)?;

    // Skip rich text runs (4 bytes each) and extended string data
    if is_rich {
        *offset += run_count as usize * 4;
    }
    if has_ext {
        *offset += ext_size as usize;
    }

    Ok(text)
}

/// Read character data (no header) given char_count and flags byte.
fn read_character_data(
    data: &[u8],
    offset: &mut usize,
    char_count: u16,
    flags: u8,
) -> XlsResult<String> {
    let is_wide = (flags & 0x01) != 0;
    let count = char_count as usize;

    if is_wide {
        let byte_len = count * 2;
        if *offset + byte_len > data.len() {
            return Err(XlsError::Parse(format!(
                "string data too short: need {} bytes at offset {}, have {}",
                byte_len,
                *offset,
                data.len() - *offset
            )));
        }
        let mut chars = Vec::with_capacity(count);
        for i in 0..count {
            let lo = data[*offset + i * 2];
            let hi = data[*offset + i * 2 + 1];
            chars.push(u16::from_le_bytes([lo, hi]));
        }
        *offset += byte_len;
        String::from_utf16(&chars)
            .map_err(|e| XlsError::Parse(format!("invalid UTF-16 string: {e}")))
    } else {
        if *offset + count > data.len() {
            return Err(XlsError::Parse(format!(
                "string data too short: need {} bytes at offset {}, have {}",
                count,
                *offset,
                data.len() - *offset
            )));
        }
        let s: String = data[*offset..*offset + count]
            .iter()
            .map(|&b| b as char)
            .collect();
        *offset += count;
        Ok(s)
    }
}

/// Parse the entire SST (Shared String Table) from a concatenated buffer
/// (SST body + all CONTINUE bodies already joined).
pub fn parse_sst(data: &[u8]) -> XlsResult<Vec<String>> {
    let mut offset = 0;

    let _total_strings = read_u32(data, &mut offset)?;
    let unique_count = read_u32(data, &mut offset)? as usize;

    let mut strings = Vec::with_capacity(unique_count);

    for i in 0..unique_count {
        match read_unicode_string(data, &mut offset) {
            Ok(s) => strings.push(s),
            Err(e) => {
                // Some files have SST padding or truncation issues; stop at
                // the first unreadable entry.
                log::warn!("SST parse error at string {i}/{unique_count}: {e}");
                break;
            }
        }
    }

    Ok(strings)
}

// ── Writing ─────────────────────────────────────────────────────────────

struct EncodedString {
    units: Vec<u16>,
    wide: bool,
}

fn encode_units(s: &str) -> EncodedString {
    let mut units: Vec<u16> = s.encode_utf16().collect();
    if units.len() > MAX_STRING_UNITS {
        log::warn!(
            "truncating string from {} to {} UTF-16 units",
            units.len(),
            MAX_STRING_UNITS
        );
        units.truncate(MAX_STRING_UNITS);
        // Drop a dangling high surrogate at the cut
        if let Some(&last) = units.last() {
            if (0xD800..0xDC00).contains(&last) {
                units.pop();
            }
        }
    }
    let wide = units.iter().any(|&u| u > 0xFF);
    EncodedString { units, wide }
}

fn push_units(out: &mut Vec<u8>, units: &[u16], wide: bool) {
    if wide {
        for &u in units {
            out.extend_from_slice(&u.to_le_bytes());
        }
    } else {
        for &u in units {
            out.push(u as u8);
        }
    }
}

/// Write a BIFF8 "short" string (1-byte length prefix).
pub fn write_short_string(out: &mut Vec<u8>, s: &str) {
    let enc = encode_units(s);
    let count = enc.units.len().min(255);
    out.push(count as u8);
    out.push(if enc.wide { 0x01 } else { 0x00 });
    push_units(out, &enc.units[..count], enc.wide);
}

/// Write a BIFF8 Unicode string (2-byte length prefix, no rich/ext data).
pub fn write_unicode_string(out: &mut Vec<u8>, s: &str) {
    let enc = encode_units(s);
    out.extend_from_slice(&(enc.units.len() as u16).to_le_bytes());
    out.push(if enc.wide { 0x01 } else { 0x00 });
    push_units(out, &enc.units, enc.wide);
}

/// Encode the shared string table as an SST record plus CONTINUE records.
///
/// Splits land between strings whenever the next string fits in a fresh
/// record; a single string longer than one record is split mid-data with
/// the flags byte re-emitted at the start of the continuation.
pub fn build_sst(total_refs: u32, strings: &[String]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut body: Vec<u8> = Vec::with_capacity(MAX_RECORD_BODY);
    let mut emitted_sst = false;

    body.extend_from_slice(&total_refs.to_le_bytes());
    body.extend_from_slice(&(strings.len() as u32).to_le_bytes());

    for s in strings {
        let enc = encode_units(s);
        let unit_size = if enc.wide { 2 } else { 1 };
        let data_len = enc.units.len() * unit_size;

        if body.len() + 3 + data_len > MAX_RECORD_BODY && !body.is_empty() {
            flush_sst_body(&mut out, &mut body, &mut emitted_sst);
        }

        body.extend_from_slice(&(enc.units.len() as u16).to_le_bytes());
        body.push(if enc.wide { 0x01 } else { 0x00 });

        let mut pos = 0;
        while pos < enc.units.len() {
            let space = MAX_RECORD_BODY - body.len();
            let fit = space / unit_size;
            let take = fit.min(enc.units.len() - pos);
            if take == 0 {
                flush_sst_body(&mut out, &mut body, &mut emitted_sst);
                body.push(if enc.wide { 0x01 } else { 0x00 });
                continue;
            }
            push_units(&mut body, &enc.units[pos..pos + take], enc.wide);
            pos += take;
        }
    }

    flush_sst_body(&mut out, &mut body, &mut emitted_sst);
    out
}

fn flush_sst_body(out: &mut Vec<u8>, body: &mut Vec<u8>, emitted_sst: &mut bool) {
    if body.is_empty() && *emitted_sst {
        return;
    }
    let record_type = if *emitted_sst {
        records::CONTINUE
    } else {
        records::SST
    };
    write_record(out, record_type, body);
    *emitted_sst = true;
    body.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biff::read_all_records;
    use std::io::Cursor;

    #[test]
    fn test_read_compressed_string() {
        // 3-char compressed string "ABC"
        let data = [0x03, 0x00, 0x00, b'A', b'B', b'C'];
        let mut offset = 0;
        let s = read_unicode_string(&data, &mut offset).unwrap();
        assert_eq!(s, "ABC");
        assert_eq!(offset, 6);
    }

    #[test]
    fn test_read_wide_string() {
        // 2-char UTF-16 string "Hi"
        let data = [0x02, 0x00, 0x01, b'H', 0x00, b'i', 0x00];
        let mut offset = 0;
        let s = read_unicode_string(&data, &mut offset).unwrap();
        assert_eq!(s, "Hi");
        assert_eq!(offset, 7);
    }

    #[test]
    fn test_short_string_roundtrip() {
        let mut buf = Vec::new();
        write_short_string(&mut buf, "Sheet1");
        let mut offset = 0;
        assert_eq!(read_short_string(&buf, &mut offset).unwrap(), "Sheet1");
        assert_eq!(offset, buf.len());
    }

    #[test]
    fn test_short_string_wide_roundtrip() {
        let mut buf = Vec::new();
        write_short_string(&mut buf, "Übersicht");
        assert_eq!(buf[1], 0x01);
        let mut offset = 0;
        assert_eq!(read_short_string(&buf, &mut offset).unwrap(), "Übersicht");
    }

    #[test]
    fn test_unicode_string_roundtrip() {
        let mut buf = Vec::new();
        write_unicode_string(&mut buf, "héllo wörld");
        let mut offset = 0;
        assert_eq!(
            read_unicode_string(&buf, &mut offset).unwrap(),
            "héllo wörld"
        );
    }

    #[test]
    fn test_build_sst_single_record() {
        let strings = vec!["A".to_string(), "BC".to_string()];
        let bytes = build_sst(2, &strings);

        let recs = read_all_records(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].record_type, records::SST);
        assert_eq!(parse_sst(&recs[0].data).unwrap(), strings);
    }

    #[test]
    fn test_build_sst_splits_between_strings() {
        // Enough 100-byte strings to overflow one record body
        let strings: Vec<String> = (0..100)
            .map(|i| format!("{:0>100}", i))
            .collect();
        let bytes = build_sst(100, &strings);

        let recs = read_all_records(&mut Cursor::new(bytes)).unwrap();
        // CONTINUE bodies merge back into the SST record
        assert_eq!(recs.len(), 1);
        assert_eq!(parse_sst(&recs[0].data).unwrap(), strings);
    }

    #[test]
    fn test_parse_sst() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&2u32.to_le_bytes()); // total
        buf.extend_from_slice(&2u32.to_le_bytes()); // unique
        buf.extend_from_slice(&[0x01, 0x00, 0x00, b'A']);
        buf.extend_from_slice(&[0x02, 0x00, 0x00, b'B', b'C']);

        let strings = parse_sst(&buf).unwrap();
        assert_eq!(strings, vec!["A", "BC"]);
    }
}
