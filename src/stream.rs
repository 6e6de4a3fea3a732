//! Physical record framing: `(opcode u16 LE, length u16 LE, payload)`.

use crate::err::{ChartError, DecodeError, Result};
use crate::utils::bytes;

pub const RECORD_HEADER_SIZE: usize = 4;

/// One physical record, borrowed from the input stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawRecord<'a> {
    /// Offset of the record header in the input stream.
    pub offset: u64,
    pub opcode: u16,
    pub payload: &'a [u8],
}

impl RawRecord<'_> {
    /// Offset of the first payload byte in the input stream.
    pub fn payload_offset(&self) -> u64 {
        self.offset + RECORD_HEADER_SIZE as u64
    }
}

/// Iterator over the physical records of a chart sub-stream.
///
/// A truncated header or payload yields an `Err` and terminates iteration.
#[derive(Debug, Clone)]
pub struct RecordIter<'a> {
    data: &'a [u8],
    offset: usize,
    exhausted: bool,
}

impl<'a> RecordIter<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        RecordIter {
            data,
            offset: 0,
            exhausted: false,
        }
    }

    pub fn offset(&self) -> u64 {
        self.offset as u64
    }

    fn fail(&mut self, source: DecodeError) -> Option<Result<RawRecord<'a>>> {
        self.exhausted = true;
        Some(Err(ChartError::Stream {
            offset: self.offset as u64,
            source,
        }))
    }
}

impl<'a> Iterator for RecordIter<'a> {
    type Item = Result<RawRecord<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted || self.offset >= self.data.len() {
            return None;
        }

        let header = match bytes::read_array_r::<RECORD_HEADER_SIZE>(
            self.data,
            self.offset,
            "record header",
        ) {
            Ok(header) => header,
            Err(e) => return self.fail(e),
        };
        let opcode = u16::from_le_bytes([header[0], header[1]]);
        let len = usize::from(u16::from_le_bytes([header[2], header[3]]));

        let payload = match bytes::slice_r(
            self.data,
            self.offset + RECORD_HEADER_SIZE,
            len,
            "record payload",
        ) {
            Ok(payload) => payload,
            Err(e) => return self.fail(e),
        };

        let record = RawRecord {
            offset: self.offset as u64,
            opcode,
            payload,
        };
        self.offset += RECORD_HEADER_SIZE + len;
        Some(Ok(record))
    }
}

/// Collects every record of `data`, failing on the first framing error.
pub fn read_records(data: &[u8]) -> Result<Vec<RawRecord<'_>>> {
    RecordIter::new(data).collect()
}

/// Appends one framed record to `out`.
pub fn write_record(out: &mut Vec<u8>, opcode: u16, payload: &[u8]) -> Result<()> {
    let len = u16::try_from(payload.len()).map_err(|_| ChartError::PayloadTooLarge {
        opcode,
        len: payload.len(),
    })?;
    bytes::put_u16(out, opcode);
    bytes::put_u16(out, len);
    out.extend_from_slice(payload);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iterates_records_with_offsets() {
        let data = [
            0x33, 0x10, 0x00, 0x00, // BEGIN
            0x17, 0x10, 0x02, 0x00, 0xAA, 0xBB, // 2-byte payload
        ];
        let records = read_records(&data).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].opcode, 0x1033);
        assert!(records[0].payload.is_empty());
        assert_eq!(records[1].offset, 4);
        assert_eq!(records[1].payload_offset(), 8);
        assert_eq!(records[1].payload, &[0xAA, 0xBB]);
    }

    #[test]
    fn test_truncated_payload_is_a_stream_error() {
        let data = [0x17, 0x10, 0x06, 0x00, 0x00];
        let mut iter = RecordIter::new(&data);
        match iter.next() {
            Some(Err(ChartError::Stream { offset: 0, .. })) => {}
            other => panic!("expected stream error, got {:?}", other),
        }
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_truncated_header_is_a_stream_error() {
        let data = [0x33, 0x10, 0x00, 0x00, 0x34];
        let result = read_records(&data);
        assert!(matches!(result, Err(ChartError::Stream { offset: 4, .. })));
    }

    #[test]
    fn test_write_record_rejects_oversized_payloads() {
        let mut out = Vec::new();
        write_record(&mut out, 0x1017, &[1, 2]).unwrap();
        assert_eq!(out, vec![0x17, 0x10, 0x02, 0x00, 1, 2]);

        let big = vec![0u8; usize::from(u16::MAX) + 1];
        assert!(matches!(
            write_record(&mut out, 0x1017, &big),
            Err(ChartError::PayloadTooLarge { opcode: 0x1017, .. })
        ));
    }
}
