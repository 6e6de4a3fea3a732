use crate::err::{DecodeError, DecodeResult};
use crate::utils::bytes;

/// A lightweight cursor over a record payload.
///
/// This is the slice/offset equivalent of `Cursor<&[u8]>`, used by every record decoder:
/// - the payload is already in memory and sliced to its declared length, and
/// - every field read names the field it is reading, so truncation errors point at it.
///
/// All reads are little-endian and advance the cursor on success.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    #[inline]
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    #[inline]
    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub(crate) fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Everything from the current position to the end of the payload, without advancing.
    #[inline]
    pub(crate) fn rest(&self) -> &'a [u8] {
        self.buf.get(self.pos..).unwrap_or_default()
    }

    #[inline]
    pub(crate) fn take_bytes(&mut self, len: usize, what: &'static str) -> DecodeResult<&'a [u8]> {
        let out = bytes::slice_r(self.buf, self.pos, len, what)?;
        self.pos += len;
        Ok(out)
    }

    #[inline]
    pub(crate) fn array<const N: usize>(&mut self, what: &'static str) -> DecodeResult<[u8; N]> {
        let v = bytes::read_array_r::<N>(self.buf, self.pos, what)?;
        self.pos += N;
        Ok(v)
    }

    #[inline]
    pub(crate) fn u8_named(&mut self, what: &'static str) -> DecodeResult<u8> {
        let b = bytes::read_u8_r(self.buf, self.pos, what)?;
        self.pos += 1;
        Ok(b)
    }

    #[inline]
    pub(crate) fn u16_named(&mut self, what: &'static str) -> DecodeResult<u16> {
        let v = bytes::read_u16_le_r(self.buf, self.pos, what)?;
        self.pos += 2;
        Ok(v)
    }

    #[inline]
    pub(crate) fn i16_named(&mut self, what: &'static str) -> DecodeResult<i16> {
        let v = bytes::read_i16_le_r(self.buf, self.pos, what)?;
        self.pos += 2;
        Ok(v)
    }

    #[inline]
    pub(crate) fn u32_named(&mut self, what: &'static str) -> DecodeResult<u32> {
        let v = bytes::read_u32_le_r(self.buf, self.pos, what)?;
        self.pos += 4;
        Ok(v)
    }

    #[inline]
    pub(crate) fn i32_named(&mut self, what: &'static str) -> DecodeResult<i32> {
        let v = bytes::read_i32_le_r(self.buf, self.pos, what)?;
        self.pos += 4;
        Ok(v)
    }

    #[inline]
    pub(crate) fn f64_named(&mut self, what: &'static str) -> DecodeResult<f64> {
        let v = bytes::read_f64_le_r(self.buf, self.pos, what)?;
        self.pos += 8;
        Ok(v)
    }

    /// Reads an "if present" trailing `u16`: `None` when fewer than two bytes are left.
    ///
    /// A partial field is left unread so the caller can carry it as trailing data.
    pub(crate) fn opt_u16_named(&mut self, what: &'static str) -> DecodeResult<Option<u16>> {
        if self.remaining() < 2 {
            return Ok(None);
        }
        self.u16_named(what).map(Some)
    }

    pub(crate) fn opt_u8_named(&mut self, what: &'static str) -> DecodeResult<Option<u8>> {
        if self.is_empty() {
            return Ok(None);
        }
        self.u8_named(what).map(Some)
    }

    pub(crate) fn opt_u32_named(&mut self, what: &'static str) -> DecodeResult<Option<u32>> {
        if self.remaining() < 4 {
            return Ok(None);
        }
        self.u32_named(what).map(Some)
    }

    /// Reads `count` consecutive `u16` values after a single bounds check.
    pub(crate) fn u16_vec_named(
        &mut self,
        count: usize,
        what: &'static str,
    ) -> DecodeResult<Vec<u16>> {
        let len = count
            .checked_mul(2)
            .ok_or(DecodeError::InvalidLength { what, len: count })?;
        let raw = self.take_bytes(len, what)?;
        Ok(raw
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .collect())
    }
}
