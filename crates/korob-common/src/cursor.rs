//! Bounded cursor for parsing byte slices.
//!
//! This module provides [`BinaryCursor`], a cursor over a read-only byte
//! slice that adds a *window stack* on top of plain positional reading.
//! A window confines `remaining()` to a sub-range of the buffer, so a chunk
//! parser can be handed exactly the bytes its length field declared and the
//! enclosing parser can resynchronize afterwards no matter how many bytes
//! were actually consumed.
//!
//! # Example
//!
//! ```
//! use korob_common::BinaryCursor;
//!
//! let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
//! let mut cursor = BinaryCursor::new(&data);
//!
//! assert_eq!(cursor.read_u32().unwrap(), 0x04030201);
//! cursor.isolate_size(2);
//! assert_eq!(cursor.remaining(), 2);
//! cursor.isolate_end();
//! assert_eq!(cursor.position(), 6);
//! ```

use zerocopy::FromBytes;

use crate::{flags, varint, Endian, Error, Result};

/// The addressable sub-range of the buffer, plus its default byte order.
///
/// Exactly one window is active at a time; `remaining()` and isolation are
/// computed against it. Invariant: `start <= end <= buffer length`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// First addressable byte (absolute offset).
    pub start: usize,
    /// One past the last addressable byte (absolute offset).
    pub end: usize,
    /// Byte order inherited by endian-unqualified reads.
    pub endian: Endian,
}

/// A bounded cursor over a byte slice.
///
/// Maintains an absolute position, the active [`Window`], and a stack of
/// enclosing windows. Primitive reads are bounds-checked against the buffer,
/// not the window - callers that must not cross a window boundary check
/// [`remaining`](Self::remaining) first, which is exactly what the chunk
/// scanners do.
#[derive(Debug, Clone)]
pub struct BinaryCursor<'a> {
    data: &'a [u8],
    position: usize,
    window: Window,
    stack: Vec<Window>,
}

impl<'a> BinaryCursor<'a> {
    /// Create a cursor over `data` with a full-buffer little-endian window.
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_endian(data, Endian::Little)
    }

    /// Create a cursor with an explicit default byte order.
    pub fn with_endian(data: &'a [u8], endian: Endian) -> Self {
        Self {
            data,
            position: 0,
            window: Window {
                start: 0,
                end: data.len(),
                endian,
            },
            stack: Vec::new(),
        }
    }

    /// Current absolute position in the buffer.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Total length of the underlying buffer.
    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if no bytes remain in the active window.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Bytes between the current position and the active window's end.
    ///
    /// Never negative: a position past the window end reports zero.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.window.end.saturating_sub(self.position)
    }

    /// The active window.
    #[inline]
    pub const fn window(&self) -> Window {
        self.window
    }

    /// Default byte order of the active window.
    #[inline]
    pub const fn endian(&self) -> Endian {
        self.window.endian
    }

    /// Change the active window's default byte order.
    #[inline]
    pub fn set_endian(&mut self, endian: Endian) {
        self.window.endian = endian;
    }

    /// Seek to an absolute position.
    #[inline]
    pub fn seek(&mut self, position: usize) {
        self.position = position;
    }

    /// Advance the position by a number of bytes.
    #[inline]
    pub fn advance(&mut self, count: usize) {
        self.position = self.position.saturating_add(count);
    }

    /// Alias for [`advance`](Self::advance), matching read-side skip calls.
    #[inline]
    pub fn skip(&mut self, count: usize) {
        self.advance(count);
    }

    /// Push the active window and confine reads to the next `size` bytes.
    ///
    /// The new window spans `[position, position + size)`, clamped to the
    /// buffer length, and inherits the enclosing window's byte order.
    pub fn isolate_size(&mut self, size: usize) {
        let start = self.position;
        let end = start.saturating_add(size).min(self.data.len());
        self.isolate_range(start, end);
    }

    /// Push the active window and install caller-supplied absolute bounds.
    ///
    /// Used when a region's extent is known from elsewhere (a custom end
    /// marker rather than an immediately preceding length field).
    pub fn isolate_range(&mut self, start: usize, end: usize) {
        let end = end.min(self.data.len());
        let start = start.min(end);
        let endian = self.window.endian;
        self.stack.push(self.window);
        self.window = Window { start, end, endian };
    }

    /// Seek to the active window's end, then reinstate the enclosing window.
    ///
    /// The seek is unconditional: even if an inner parser stopped short or
    /// overran and was clipped by `remaining()`, control returns with the
    /// cursor exactly at the boundary the outer parser expects. Calling this
    /// without a matching `isolate_size`/`isolate_range` is a logic error;
    /// the seek still happens and the pop is a no-op.
    pub fn isolate_end(&mut self) {
        self.position = self.window.end;
        if let Some(prev) = self.stack.pop() {
            self.window = prev;
        }
    }

    /// Reinstate the enclosing window without touching the position.
    ///
    /// For callers that manage their own position across the boundary.
    pub fn isolate_end_noseek(&mut self) {
        if let Some(prev) = self.stack.pop() {
            self.window = prev;
        }
    }

    /// Peek at bytes without advancing the position.
    #[inline]
    pub fn peek_bytes(&self, count: usize) -> Result<&'a [u8]> {
        // The position may sit past the buffer end after an unchecked skip.
        let at = self.position.min(self.data.len());
        let available = self.data.len() - at;
        if available < count {
            return Err(Error::UnexpectedEof {
                needed: count,
                available,
            });
        }
        Ok(&self.data[at..at + count])
    }

    /// Read bytes and advance the position.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_bytes(count)?;
        self.position += count;
        Ok(bytes)
    }

    /// Read a fixed-size byte array, e.g. a FOURCC tag.
    #[inline]
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Read every byte left in the active window.
    pub fn rest(&mut self) -> Result<&'a [u8]> {
        self.read_bytes(self.remaining())
    }

    /// Read a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_bytes(1).map(|b| b[0])
    }

    /// Read a signed byte.
    #[inline]
    pub fn read_i8(&mut self) -> Result<i8> {
        self.read_u8().map(|b| b as i8)
    }

    /// Read a boolean (non-zero = true).
    #[inline]
    pub fn read_bool(&mut self) -> Result<bool> {
        self.read_u8().map(|b| b != 0)
    }

    /// Read a u16 in the window's byte order.
    #[inline]
    pub fn read_u16(&mut self) -> Result<u16> {
        let endian = self.window.endian;
        self.read_bytes(2).map(|b| endian.read_u16(b))
    }

    /// Read an i16 in the window's byte order.
    #[inline]
    pub fn read_i16(&mut self) -> Result<i16> {
        let endian = self.window.endian;
        self.read_bytes(2).map(|b| endian.read_i16(b))
    }

    /// Read a 3-byte unsigned integer in the window's byte order.
    #[inline]
    pub fn read_u24(&mut self) -> Result<u32> {
        let endian = self.window.endian;
        self.read_bytes(3).map(|b| endian.read_uint(b) as u32)
    }

    /// Read a u32 in the window's byte order.
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        let endian = self.window.endian;
        self.read_bytes(4).map(|b| endian.read_u32(b))
    }

    /// Read an i32 in the window's byte order.
    #[inline]
    pub fn read_i32(&mut self) -> Result<i32> {
        let endian = self.window.endian;
        self.read_bytes(4).map(|b| endian.read_i32(b))
    }

    /// Read a u64 in the window's byte order.
    #[inline]
    pub fn read_u64(&mut self) -> Result<u64> {
        let endian = self.window.endian;
        self.read_bytes(8).map(|b| endian.read_u64(b))
    }

    /// Read an i64 in the window's byte order.
    #[inline]
    pub fn read_i64(&mut self) -> Result<i64> {
        let endian = self.window.endian;
        self.read_bytes(8).map(|b| endian.read_i64(b))
    }

    /// Read an f32 in the window's byte order.
    #[inline]
    pub fn read_f32(&mut self) -> Result<f32> {
        let endian = self.window.endian;
        self.read_bytes(4).map(|b| endian.read_f32(b))
    }

    /// Read an f64 in the window's byte order.
    #[inline]
    pub fn read_f64(&mut self) -> Result<f64> {
        let endian = self.window.endian;
        self.read_bytes(8).map(|b| endian.read_f64(b))
    }

    /// Read a little-endian u16 regardless of the window's byte order.
    #[inline]
    pub fn read_u16_le(&mut self) -> Result<u16> {
        self.read_bytes(2).map(|b| Endian::Little.read_u16(b))
    }

    /// Read a big-endian u16.
    #[inline]
    pub fn read_u16_be(&mut self) -> Result<u16> {
        self.read_bytes(2).map(|b| Endian::Big.read_u16(b))
    }

    /// Read a little-endian u32.
    #[inline]
    pub fn read_u32_le(&mut self) -> Result<u32> {
        self.read_bytes(4).map(|b| Endian::Little.read_u32(b))
    }

    /// Read a big-endian u32.
    #[inline]
    pub fn read_u32_be(&mut self) -> Result<u32> {
        self.read_bytes(4).map(|b| Endian::Big.read_u32(b))
    }

    /// Read a little-endian u64.
    #[inline]
    pub fn read_u64_le(&mut self) -> Result<u64> {
        self.read_bytes(8).map(|b| Endian::Little.read_u64(b))
    }

    /// Read a big-endian u64.
    #[inline]
    pub fn read_u64_be(&mut self) -> Result<u64> {
        self.read_bytes(8).map(|b| Endian::Big.read_u64(b))
    }

    /// Read an unsigned integer of `width` bytes in the given byte order.
    ///
    /// This is the variable-width read behind configurable tag and length
    /// fields.
    ///
    /// # Panics
    ///
    /// Panics if `width` is 0 or greater than 8.
    pub fn read_uint(&mut self, width: usize, endian: Endian) -> Result<u64> {
        assert!((1..=8).contains(&width), "uint width must be 1..=8");
        self.read_bytes(width).map(|b| endian.read_uint(b))
    }

    /// Decode an unsigned LEB128 varint and advance past it.
    pub fn read_varint(&mut self) -> Result<u64> {
        let tail = &self.data[self.position.min(self.data.len())..];
        let (value, consumed) = varint::decode(tail)?;
        self.position += consumed;
        Ok(value)
    }

    /// Read a `width`-byte unsigned integer and expand it to set bit indices.
    pub fn read_flags(&mut self, width: usize) -> Result<Vec<u32>> {
        let endian = self.window.endian;
        self.read_uint(width, endian).map(flags::bits_set)
    }

    /// Read a null-terminated string.
    pub fn read_cstring(&mut self) -> Result<&'a str> {
        let tail = &self.data[self.position.min(self.data.len())..];
        let null_pos = memchr::memchr(0, tail).ok_or(Error::MissingNullTerminator)?;
        let bytes = &tail[..null_pos];
        self.position += null_pos + 1; // Skip the null terminator
        std::str::from_utf8(bytes).map_err(Error::Utf8)
    }

    /// Read a string of a specific length.
    pub fn read_string(&mut self, length: usize) -> Result<&'a str> {
        let bytes = self.read_bytes(length)?;
        std::str::from_utf8(bytes).map_err(Error::Utf8)
    }

    /// Read a string from a fixed-size field, stopping at the first null.
    pub fn read_string_buffer(&mut self, buffer_size: usize) -> Result<&'a str> {
        let bytes = self.read_bytes(buffer_size)?;
        let null_pos = memchr::memchr(0, bytes).unwrap_or(buffer_size);
        std::str::from_utf8(&bytes[..null_pos]).map_err(Error::Utf8)
    }

    /// Read a struct using zerocopy.
    ///
    /// The struct must implement `FromBytes` from the zerocopy crate.
    #[inline]
    pub fn read_struct<T: FromBytes>(&mut self) -> Result<T> {
        let size = std::mem::size_of::<T>();
        let bytes = self.read_bytes(size)?;
        T::read_from_bytes(bytes).map_err(|_| Error::UnexpectedEof {
            needed: size,
            available: bytes.len(),
        })
    }

    /// Expect specific magic bytes; a mismatch is a hard error.
    ///
    /// Used for format sniffing before a full parse - unlike truncation
    /// during chunk scanning, a wrong magic never degrades softly.
    pub fn expect_magic(&mut self, expected: &[u8]) -> Result<()> {
        let actual = self.read_bytes(expected.len())?;
        if actual != expected {
            return Err(Error::InvalidMagic {
                expected: expected.to_vec(),
                actual: actual.to_vec(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_primitives() {
        let data = [
            0x01u8, 0x02, 0x03, 0x04, // u32: 0x04030201
            0xFF, 0xFF, 0xFF, 0xFF, // u32: 0xFFFFFFFF
        ];
        let mut cursor = BinaryCursor::new(&data);

        assert_eq!(cursor.read_u32().unwrap(), 0x04030201);
        assert_eq!(cursor.read_u32().unwrap(), 0xFFFFFFFF);
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_window_endian() {
        let data = [0x01u8, 0x02, 0x01, 0x02];
        let mut cursor = BinaryCursor::with_endian(&data, Endian::Big);
        assert_eq!(cursor.read_u16().unwrap(), 0x0102);
        assert_eq!(cursor.read_u16_le().unwrap(), 0x0201);
    }

    #[test]
    fn test_isolate_lifo() {
        let data = [0u8; 32];
        let mut cursor = BinaryCursor::new(&data);
        cursor.seek(4);

        let outer = cursor.window();
        cursor.isolate_size(16);
        assert_eq!(cursor.window().start, 4);
        assert_eq!(cursor.window().end, 20);
        assert_eq!(cursor.remaining(), 16);

        let middle = cursor.window();
        cursor.seek(8);
        cursor.isolate_range(8, 12);
        assert_eq!(cursor.remaining(), 4);

        cursor.isolate_end();
        assert_eq!(cursor.window(), middle);
        assert_eq!(cursor.position(), 12);

        cursor.isolate_end();
        assert_eq!(cursor.window(), outer);
        assert_eq!(cursor.position(), 20);
    }

    #[test]
    fn test_isolate_end_forces_progress() {
        let data = [0u8; 16];
        let mut cursor = BinaryCursor::new(&data);

        // Inner parser consumes less than the declared size.
        cursor.isolate_size(8);
        cursor.advance(3);
        cursor.isolate_end();
        assert_eq!(cursor.position(), 8);

        // Inner parser overran; resynchronization snaps back.
        cursor.isolate_size(4);
        cursor.advance(100);
        assert_eq!(cursor.remaining(), 0);
        cursor.isolate_end();
        assert_eq!(cursor.position(), 12);
    }

    #[test]
    fn test_isolate_end_noseek() {
        let data = [0u8; 16];
        let mut cursor = BinaryCursor::new(&data);
        cursor.isolate_size(8);
        cursor.advance(3);
        cursor.isolate_end_noseek();
        assert_eq!(cursor.position(), 3);
        assert_eq!(cursor.window().end, 16);
    }

    #[test]
    fn test_window_clamps_to_buffer() {
        let data = [0u8; 8];
        let mut cursor = BinaryCursor::new(&data);
        cursor.seek(6);
        cursor.isolate_size(100);
        assert_eq!(cursor.window().end, 8);
        assert_eq!(cursor.remaining(), 2);
    }

    #[test]
    fn test_remaining_never_negative() {
        let data = [0u8; 4];
        let mut cursor = BinaryCursor::new(&data);
        cursor.advance(100);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_reads_after_overrun() {
        let data = [0u8; 4];
        let mut cursor = BinaryCursor::new(&data);
        cursor.advance(100);
        assert_eq!(cursor.rest().unwrap(), &[]);
        assert!(matches!(
            cursor.read_u8(),
            Err(Error::UnexpectedEof {
                needed: 1,
                available: 0
            })
        ));
    }

    #[test]
    fn test_read_uint_widths() {
        let data = [0x01u8, 0x02, 0x03, 0x04, 0x05];
        let mut cursor = BinaryCursor::new(&data);
        assert_eq!(cursor.read_uint(3, Endian::Little).unwrap(), 0x030201);
        assert_eq!(cursor.read_uint(2, Endian::Big).unwrap(), 0x0405);
    }

    #[test]
    fn test_read_varint() {
        let data = [0xAC, 0x02, 0x07];
        let mut cursor = BinaryCursor::new(&data);
        assert_eq!(cursor.read_varint().unwrap(), 300);
        assert_eq!(cursor.read_varint().unwrap(), 7);
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_read_cstring() {
        let data = b"hello\0world\0";
        let mut cursor = BinaryCursor::new(data);

        assert_eq!(cursor.read_cstring().unwrap(), "hello");
        assert_eq!(cursor.read_cstring().unwrap(), "world");
    }

    #[test]
    fn test_string_buffer_trims_null() {
        let data = b"fmt\0____";
        let mut cursor = BinaryCursor::new(data);
        assert_eq!(cursor.read_string_buffer(8).unwrap(), "fmt");
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_expect_magic() {
        let data = b"RIFF\x04\x00\x00\x00";
        let mut cursor = BinaryCursor::new(data);
        assert!(cursor.expect_magic(b"RIFF").is_ok());

        let mut cursor = BinaryCursor::new(data);
        assert!(matches!(
            cursor.expect_magic(b"FORM"),
            Err(Error::InvalidMagic { .. })
        ));
    }

    #[test]
    fn test_eof_error() {
        let data = [0x01, 0x02];
        let mut cursor = BinaryCursor::new(&data);

        assert!(matches!(
            cursor.read_u32(),
            Err(Error::UnexpectedEof {
                needed: 4,
                available: 2
            })
        ));
    }
}
