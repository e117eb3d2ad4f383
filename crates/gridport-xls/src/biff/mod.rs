//! BIFF8 (Binary Interchange File Format) handling.
//!
//! A BIFF8 stream is a sequence of records, each with a 4-byte header
//! (2 bytes record type + 2 bytes body length) followed by the body.
//! CONTINUE records (type 0x003C) extend the body of the preceding record
//! beyond the 8224-byte per-record limit.
//!
//! Reading merges CONTINUE bodies back into their parent record; writing
//! keeps each body under the limit (the SST encoder in [`strings`] emits
//! its own CONTINUE records).

pub mod parser;
pub mod records;
pub mod strings;

use crate::error::{XlsError, XlsResult};
use std::io::{Read, Seek};

/// Largest record body BIFF8 allows before a CONTINUE is needed.
pub const MAX_RECORD_BODY: usize = 8224;

/// A single BIFF8 record (with CONTINUE bodies already merged).
#[derive(Debug)]
pub struct BiffRecord {
    /// Record type id (e.g. `records::SST`, `records::NUMBER`).
    pub record_type: u16,
    /// Record body bytes (CONTINUE records have been concatenated).
    pub data: Vec<u8>,
    /// Byte offset of this record's header in the stream.
    pub stream_offset: u64,
}

/// Reads all BIFF8 records from a byte stream, merging CONTINUE records
/// into their parent.
pub fn read_all_records<R: Read + Seek>(stream: &mut R) -> XlsResult<Vec<BiffRecord>> {
    let mut records: Vec<BiffRecord> = Vec::new();
    let mut header_buf = [0u8; 4];

    loop {
        let stream_offset = stream.stream_position().map_err(XlsError::Io)?;

        match stream.read_exact(&mut header_buf) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(XlsError::Io(e)),
        }

        let record_type = u16::from_le_bytes([header_buf[0], header_buf[1]]);
        let body_len = u16::from_le_bytes([header_buf[2], header_buf[3]]) as usize;

        let mut body = vec![0u8; body_len];
        if body_len > 0 {
            stream.read_exact(&mut body).map_err(XlsError::Io)?;
        }

        if record_type == records::CONTINUE {
            // Append to the previous record's data; an orphaned CONTINUE
            // is dropped
            if let Some(prev) = records.last_mut() {
                prev.data.extend_from_slice(&body);
            }
        } else {
            records.push(BiffRecord {
                record_type,
                data: body,
                stream_offset,
            });
        }
    }

    Ok(records)
}

/// Append one record (header + body) to an output buffer.
///
/// The body must already fit in a single record; multi-record payloads
/// build their own CONTINUE chain.
pub fn write_record(out: &mut Vec<u8>, record_type: u16, body: &[u8]) {
    debug_assert!(body.len() <= MAX_RECORD_BODY);
    out.extend_from_slice(&record_type.to_le_bytes());
    out.extend_from_slice(&(body.len() as u16).to_le_bytes());
    out.extend_from_slice(body);
}

/// Extract the BOF record fields from a record body.
///
/// Returns `(version, substream_type)`.
/// - `version` should be `0x0600` for BIFF8
/// - `substream_type`: 0x0005 = workbook globals, 0x0010 = worksheet
pub fn parse_bof(data: &[u8]) -> XlsResult<(u16, u16)> {
    if data.len() < 4 {
        return Err(XlsError::InvalidFormat("BOF record too short".into()));
    }
    let version = u16::from_le_bytes([data[0], data[1]]);
    let dt = u16::from_le_bytes([data[2], data[3]]);
    Ok((version, dt))
}

/// Build a BOF record body for the given substream type.
pub fn encode_bof(substream_type: u16) -> [u8; 16] {
    let mut body = [0u8; 16];
    body[0..2].copy_from_slice(&records::BIFF8_VERSION.to_le_bytes());
    body[2..4].copy_from_slice(&substream_type.to_le_bytes());
    // rupBuild / rupYear / file history / lowest version
    body[4..6].copy_from_slice(&0x0DBBu16.to_le_bytes());
    body[6..8].copy_from_slice(&0x07CCu16.to_le_bytes());
    body[8..12].copy_from_slice(&0x00000041u32.to_le_bytes());
    body[12..16].copy_from_slice(&0x00000006u32.to_le_bytes());
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_write_then_read_records() {
        let mut buf = Vec::new();
        write_record(&mut buf, records::BOF, &encode_bof(records::BOF_WORKBOOK_GLOBALS));
        write_record(&mut buf, records::DATEMODE, &0u16.to_le_bytes());
        write_record(&mut buf, records::EOF, &[]);

        let recs = read_all_records(&mut Cursor::new(buf)).unwrap();
        assert_eq!(recs.len(), 3);
        assert_eq!(recs[0].record_type, records::BOF);
        assert_eq!(recs[1].record_type, records::DATEMODE);
        assert_eq!(recs[2].record_type, records::EOF);
        assert!(recs[2].data.is_empty());
    }

    #[test]
    fn test_continue_merges_into_parent() {
        let mut buf = Vec::new();
        write_record(&mut buf, records::SST, &[1, 2, 3]);
        write_record(&mut buf, records::CONTINUE, &[4, 5]);
        write_record(&mut buf, records::EOF, &[]);

        let recs = read_all_records(&mut Cursor::new(buf)).unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].data, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_parse_bof() {
        let body = encode_bof(records::BOF_WORKSHEET);
        let (version, dt) = parse_bof(&body).unwrap();
        assert_eq!(version, records::BIFF8_VERSION);
        assert_eq!(dt, records::BOF_WORKSHEET);
    }
}
