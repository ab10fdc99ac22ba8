//! Little-endian byte primitives used by the DBPL reader and writer

use crate::error::{Error, Result};

/// Position-tracking reader over a playlist buffer.
///
/// Every read checks the remaining length first and reports `Truncated`
/// with the offset it stopped at; nothing panics on short input.
#[derive(Clone)]
pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Offset of the next unread byte
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Borrow the next `n` bytes of the buffer.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(Error::Truncated {
                offset: self.pos,
                need: n,
                have: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Consume the rest of the buffer (the playlist trailer).
    pub fn read_rest(&mut self) -> &'a [u8] {
        let start = self.pos.min(self.data.len());
        self.pos = self.data.len();
        &self.data[start..]
    }

    pub fn read_magic(&mut self) -> Result<[u8; 4]> {
        self.take()
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.take().map(u8::from_le_bytes)
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        self.take().map(i16::from_le_bytes)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.take().map(u16::from_le_bytes)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.take().map(i32::from_le_bytes)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.take().map(u32::from_le_bytes)
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        self.take().map(u64::from_le_bytes)
    }

    /// Bit-exact: NaN payloads survive a decode/encode cycle.
    pub fn read_f32(&mut self) -> Result<f32> {
        self.take().map(f32::from_le_bytes)
    }

    /// `len` bytes of UTF-8; `field` names the string in the error.
    pub fn read_str(&mut self, len: usize, field: &'static str) -> Result<String> {
        let offset = self.pos;
        let bytes = self.read_bytes(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|e| Error::MalformedString {
            offset,
            field,
            reason: e.to_string(),
        })
    }

    /// String behind a u8 length (decoder, file type).
    pub fn read_string_u8(&mut self, field: &'static str) -> Result<String> {
        let len = self.read_u8()?;
        self.read_str(len.into(), field)
    }

    /// String behind a u16 length (uri, property keys).
    pub fn read_string_u16(&mut self, field: &'static str) -> Result<String> {
        let len = self.read_u16()?;
        self.read_str(len.into(), field)
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }
}

/// Growable little-endian output buffer, the inverse of [`Cursor`].
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            buf: Vec::with_capacity(cap),
        }
    }

    pub fn position(&self) -> usize {
        self.buf.len()
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_magic(&mut self, magic: &[u8; 4]) {
        self.buf.extend_from_slice(magic);
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_i16(&mut self, v: i16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_f32(&mut self, v: f32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    /// `bytes` behind a u8 length; longer payloads are `FieldTooLong`.
    pub fn write_prefixed_u8(&mut self, bytes: &[u8], field: &'static str) -> Result<()> {
        let len = u8::try_from(bytes.len()).map_err(|_| Error::FieldTooLong {
            field,
            len: bytes.len(),
            limit: u8::MAX as usize,
        })?;
        self.write_u8(len);
        self.write_bytes(bytes);
        Ok(())
    }

    /// `bytes` behind a u16 length.
    pub fn write_prefixed_u16(&mut self, bytes: &[u8], field: &'static str) -> Result<()> {
        let len = u16::try_from(bytes.len()).map_err(|_| Error::FieldTooLong {
            field,
            len: bytes.len(),
            limit: u16::MAX as usize,
        })?;
        self.write_u16(len);
        self.write_bytes(bytes);
        Ok(())
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

/// Checked narrowing of a count or length into its on-disk integer width.
pub fn narrow<T: TryFrom<usize>>(value: usize, field: &'static str) -> Result<T> {
    T::try_from(value).map_err(|_| Error::IntegerOverflow {
        field,
        value: value as i128,
    })
}
