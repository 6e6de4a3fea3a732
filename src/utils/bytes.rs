//! Field codec for chart record payloads.
//!
//! Provides a consistent way to read and write little-endian primitives at fixed offsets of a
//! record payload, plus the bit-flag helpers used by every `grbit` accessor.
//!
//! There are three layers:
//! - **Option layer** (`read_*`): zero-cost helpers that return `Option<T>`.
//! - **Result layer** (`*_r`): wrappers that map `None` to `DecodeError::Truncated`.
//!   Record decoders use these (usually through [`ByteCursor`](super::ByteCursor)).
//! - **Write layer** (`put_*`): append the little-endian encoding of a value to an output buffer.
//!
//! Design notes:
//! - All numeric fields are **little-endian** (BIFF8 is LE).
//! - Offsets are `usize` and are interpreted relative to the slice you pass in.
//! - Payloads are sliced to their declared record length before any field is read, so reading
//!   past the end is always reported as a truncation of that record and never spills into a
//!   neighbour.
//!
//! Example:
//!
//! ```ignore
//! use crate::utils::bytes;
//!
//! let gap = bytes::read_u16_le_r(payload, 2, "Bar.pcGap")?;
//! let mut out = Vec::with_capacity(6);
//! bytes::put_i16(&mut out, -100);
//! ```

use crate::err::DecodeError;
use byteorder::{ByteOrder, LittleEndian};

/// Read `N` raw bytes at `offset`.
///
/// Returns `None` if the range is out of bounds.
pub(crate) fn read_array<const N: usize>(buf: &[u8], offset: usize) -> Option<[u8; N]> {
    let end = offset.checked_add(N)?;
    let bytes: [u8; N] = buf.get(offset..end)?.try_into().ok()?;
    Some(bytes)
}

/// Read a single byte at `offset`.
pub(crate) fn read_u8(buf: &[u8], offset: usize) -> Option<u8> {
    buf.get(offset).copied()
}

/// Read a `u16` (little-endian) at `offset`.
pub fn read_u16_le(buf: &[u8], offset: usize) -> Option<u16> {
    Some(LittleEndian::read_u16(&read_array::<2>(buf, offset)?))
}

/// Read an `i16` (little-endian) at `offset`.
pub fn read_i16_le(buf: &[u8], offset: usize) -> Option<i16> {
    Some(LittleEndian::read_i16(&read_array::<2>(buf, offset)?))
}

/// Read a `u32` (little-endian) at `offset`.
pub fn read_u32_le(buf: &[u8], offset: usize) -> Option<u32> {
    Some(LittleEndian::read_u32(&read_array::<4>(buf, offset)?))
}

/// Read an `i32` (little-endian) at `offset`.
pub fn read_i32_le(buf: &[u8], offset: usize) -> Option<i32> {
    Some(LittleEndian::read_i32(&read_array::<4>(buf, offset)?))
}

/// Read an IEEE-754 `f64` (little-endian) at `offset`.
pub fn read_f64_le(buf: &[u8], offset: usize) -> Option<f64> {
    Some(LittleEndian::read_f64(&read_array::<8>(buf, offset)?))
}

#[inline]
fn truncated(what: &'static str, offset: usize, need: usize, len: usize) -> DecodeError {
    DecodeError::Truncated {
        what,
        offset: offset as u64,
        need,
        have: len.saturating_sub(offset),
    }
}

pub(crate) fn slice_r<'a>(
    buf: &'a [u8],
    offset: usize,
    len: usize,
    what: &'static str,
) -> Result<&'a [u8], DecodeError> {
    let end = offset
        .checked_add(len)
        .ok_or_else(|| truncated(what, offset, len, buf.len()))?;
    buf.get(offset..end)
        .ok_or_else(|| truncated(what, offset, len, buf.len()))
}

/// Read `N` raw bytes at `offset`, or return `DecodeError::Truncated`.
pub(crate) fn read_array_r<const N: usize>(
    buf: &[u8],
    offset: usize,
    what: &'static str,
) -> Result<[u8; N], DecodeError> {
    read_array::<N>(buf, offset).ok_or_else(|| truncated(what, offset, N, buf.len()))
}

pub(crate) fn read_u8_r(buf: &[u8], offset: usize, what: &'static str) -> Result<u8, DecodeError> {
    read_u8(buf, offset).ok_or_else(|| truncated(what, offset, 1, buf.len()))
}

/// Read a `u16` (little-endian) at `offset`, or return `DecodeError::Truncated`.
pub(crate) fn read_u16_le_r(
    buf: &[u8],
    offset: usize,
    what: &'static str,
) -> Result<u16, DecodeError> {
    read_u16_le(buf, offset).ok_or_else(|| truncated(what, offset, 2, buf.len()))
}

pub(crate) fn read_i16_le_r(
    buf: &[u8],
    offset: usize,
    what: &'static str,
) -> Result<i16, DecodeError> {
    read_i16_le(buf, offset).ok_or_else(|| truncated(what, offset, 2, buf.len()))
}

/// Read a `u32` (little-endian) at `offset`, or return `DecodeError::Truncated`.
pub(crate) fn read_u32_le_r(
    buf: &[u8],
    offset: usize,
    what: &'static str,
) -> Result<u32, DecodeError> {
    read_u32_le(buf, offset).ok_or_else(|| truncated(what, offset, 4, buf.len()))
}

pub(crate) fn read_i32_le_r(
    buf: &[u8],
    offset: usize,
    what: &'static str,
) -> Result<i32, DecodeError> {
    read_i32_le(buf, offset).ok_or_else(|| truncated(what, offset, 4, buf.len()))
}

/// Read an `f64` (little-endian) at `offset`, or return `DecodeError::Truncated`.
pub(crate) fn read_f64_le_r(
    buf: &[u8],
    offset: usize,
    what: &'static str,
) -> Result<f64, DecodeError> {
    read_f64_le(buf, offset).ok_or_else(|| truncated(what, offset, 8, buf.len()))
}

pub fn put_u8(out: &mut Vec<u8>, value: u8) {
    out.push(value);
}

pub fn put_u16(out: &mut Vec<u8>, value: u16) {
    let mut b = [0u8; 2];
    LittleEndian::write_u16(&mut b, value);
    out.extend_from_slice(&b);
}

pub fn put_i16(out: &mut Vec<u8>, value: i16) {
    let mut b = [0u8; 2];
    LittleEndian::write_i16(&mut b, value);
    out.extend_from_slice(&b);
}

pub fn put_u32(out: &mut Vec<u8>, value: u32) {
    let mut b = [0u8; 4];
    LittleEndian::write_u32(&mut b, value);
    out.extend_from_slice(&b);
}

pub fn put_i32(out: &mut Vec<u8>, value: i32) {
    let mut b = [0u8; 4];
    LittleEndian::write_i32(&mut b, value);
    out.extend_from_slice(&b);
}

pub fn put_f64(out: &mut Vec<u8>, value: f64) {
    let mut b = [0u8; 8];
    LittleEndian::write_f64(&mut b, value);
    out.extend_from_slice(&b);
}

/// Overwrite two bytes at `offset` with `value`. Returns `false` when `offset` is out of bounds.
pub fn splice_u16(buf: &mut [u8], offset: usize, value: u16) -> bool {
    match offset.checked_add(2).and_then(|end| buf.get_mut(offset..end)) {
        Some(dst) => {
            LittleEndian::write_u16(dst, value);
            true
        }
        None => false,
    }
}

/// Returns whether bit `index` of `word` is set.
#[inline]
pub fn read_bit(word: u16, index: u32) -> bool {
    index < u16::BITS && (word >> index) & 1 == 1
}

/// Returns `word` with bit `index` set to `bit`; every other bit is untouched.
#[inline]
pub fn update_bit(word: u16, bit: bool, index: u32) -> u16 {
    if index >= u16::BITS {
        return word;
    }
    let mask = 1u16 << index;
    if bit { word | mask } else { word & !mask }
}

/// Color components are stored as raw bytes; readers that surface them as signed 8-bit values
/// must reinterpret them in two's complement to get the 0..=255 channel value.
#[inline]
pub fn normalize_color_byte(raw: i8) -> u8 {
    raw as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_little_endian_fields() {
        let buf = [0x9C, 0xFF, 0x96, 0x00, 0x02, 0x00];
        assert_eq!(read_i16_le(&buf, 0), Some(-100));
        assert_eq!(read_u16_le(&buf, 2), Some(150));
        assert_eq!(read_u16_le(&buf, 4), Some(2));
        assert_eq!(read_u16_le(&buf, 5), None);
    }

    #[test]
    fn test_truncated_reports_remaining_bytes() {
        let buf = [1, 2, 3];
        let err = read_u32_le_r(&buf, 1, "field").unwrap_err();
        assert_eq!(
            err,
            DecodeError::Truncated {
                what: "field",
                offset: 1,
                need: 4,
                have: 2
            }
        );
    }

    #[test]
    fn test_put_is_inverse_of_read() {
        let mut out = Vec::new();
        put_i16(&mut out, -100);
        put_u32(&mut out, 0xDEAD_BEEF);
        put_f64(&mut out, 2.5);
        assert_eq!(read_i16_le(&out, 0), Some(-100));
        assert_eq!(read_u32_le(&out, 2), Some(0xDEAD_BEEF));
        assert_eq!(read_f64_le(&out, 6), Some(2.5));
    }

    #[test]
    fn test_update_bit_leaves_other_bits() {
        let word = 0b1010_0000_0000_0101;
        let set = update_bit(word, true, 1);
        assert_eq!(set, 0b1010_0000_0000_0111);
        assert_eq!(update_bit(set, false, 1), word);
        assert!(read_bit(word, 15));
        assert!(!read_bit(word, 16));
        assert_eq!(update_bit(word, true, 16), word);
    }

    #[test]
    fn test_normalize_color_byte() {
        assert_eq!(normalize_color_byte(-1), 255);
        assert_eq!(normalize_color_byte(-64), 192);
        assert_eq!(normalize_color_byte(77), 77);
    }

    #[test]
    fn test_splice_u16() {
        let mut buf = [0u8; 4];
        assert!(splice_u16(&mut buf, 2, 0x0102));
        assert_eq!(buf, [0, 0, 2, 1]);
        assert!(!splice_u16(&mut buf, 3, 1));
    }
}
