#![doc = r#"
A positioned cursor over the raw bytes of an SMF stream.

The [`Reader`] never copies: multi-byte reads hand back subslices of the
input. Every failure it produces carries the byte offset it happened at, so
a caller can report *where* a file went bad, not just *how*.
"#]

mod error;
pub use error::*;

use crate::error::ParseError;

/// A forward-only cursor over a byte slice.
///
/// The underlying source is read strictly sequentially; the only backward
/// motion the format ever needs (re-reading a running-status data byte) is
/// served by [`peek_byte`](Reader::peek_byte) instead of seeking.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> Reader<'a> {
    /// Create a reader over a byte slice, positioned at the start.
    pub const fn from_byte_slice(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    /// Current byte offset into the stream.
    pub const fn buffer_position(&self) -> usize {
        self.position
    }

    /// True once every byte has been consumed.
    pub const fn is_at_end(&self) -> bool {
        self.position >= self.bytes.len()
    }

    /// Consume and return one byte.
    pub fn read_byte(&mut self) -> ReadResult<u8> {
        let byte = *self.bytes.get(self.position).ok_or_else(|| self.eof())?;
        self.position += 1;
        Ok(byte)
    }

    /// Return the next byte without consuming it.
    pub fn peek_byte(&self) -> ReadResult<u8> {
        self.bytes.get(self.position).copied().ok_or_else(|| self.eof())
    }

    /// Consume exactly `count` bytes, returning them as a subslice of the
    /// input.
    pub fn read_exact(&mut self, count: usize) -> ReadResult<&'a [u8]> {
        let end = self.position.checked_add(count).ok_or_else(|| self.eof())?;
        let slice = self.bytes.get(self.position..end).ok_or_else(|| self.eof())?;
        self.position = end;
        Ok(slice)
    }

    /// Consume exactly `N` bytes into an array.
    pub fn read_array<const N: usize>(&mut self) -> ReadResult<[u8; N]> {
        let slice = self.read_exact(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }

    /// Consume a big-endian `u16`.
    pub fn read_u16_be(&mut self) -> ReadResult<u16> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    /// Consume a big-endian `u32`.
    pub fn read_u32_be(&mut self) -> ReadResult<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    /// A format error positioned at the current offset.
    pub(crate) fn parse_err(&self, error: ParseError) -> ReaderError {
        ReaderError::new(self.position, ReaderErrorKind::Parse(error))
    }

    fn eof(&self) -> ReaderError {
        ReaderError::new(self.position, ReaderErrorKind::TruncatedStream)
    }
}
