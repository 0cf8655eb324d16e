//! Append-only typed writer for building binary output.
//!
//! [`BinaryWriter`] is the output mirror of
//! [`BinaryCursor`](crate::BinaryCursor). It never re-reads or backpatches:
//! composite values with length prefixes are built in a *separate* writer
//! and spliced into the parent once their size is known, so emitted length
//! fields are always consistent with the bytes they describe. No window
//! stack exists here - only a default byte order.
//!
//! # Example
//!
//! ```
//! use korob_common::BinaryWriter;
//!
//! let mut w = BinaryWriter::new();
//! w.write_bytes(b"fmt ");
//! w.write_u32(16);
//! assert_eq!(w.tell(), 8);
//! ```

use std::fs;
use std::path::Path;

use crate::{flags, varint, Endian, Result};

/// An append-only binary writer over a growable byte buffer.
#[derive(Debug, Clone, Default)]
pub struct BinaryWriter {
    buf: Vec<u8>,
    endian: Endian,
}

impl BinaryWriter {
    /// Create an empty little-endian writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty writer with an explicit default byte order.
    pub fn with_endian(endian: Endian) -> Self {
        Self {
            buf: Vec::new(),
            endian,
        }
    }

    /// Current length of the emitted bytes.
    #[inline]
    pub fn tell(&self) -> usize {
        self.buf.len()
    }

    /// Current length of the emitted bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check whether nothing has been written yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Default byte order for endian-unqualified writes.
    #[inline]
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Change the default byte order.
    #[inline]
    pub fn set_endian(&mut self, endian: Endian) {
        self.endian = endian;
    }

    /// View the emitted bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the writer and return the emitted bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Write the emitted bytes to a file.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, &self.buf)?;
        Ok(())
    }

    /// Append raw bytes.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Append a single byte.
    #[inline]
    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    /// Append a signed byte.
    #[inline]
    pub fn write_i8(&mut self, value: i8) {
        self.buf.push(value as u8);
    }

    /// Append a u16 in the default byte order.
    #[inline]
    pub fn write_u16(&mut self, value: u16) {
        let mut tmp = [0u8; 2];
        self.endian.write_u16(&mut tmp, value);
        self.buf.extend_from_slice(&tmp);
    }

    /// Append an i16 in the default byte order.
    #[inline]
    pub fn write_i16(&mut self, value: i16) {
        let mut tmp = [0u8; 2];
        self.endian.write_i16(&mut tmp, value);
        self.buf.extend_from_slice(&tmp);
    }

    /// Append a u32 in the default byte order.
    #[inline]
    pub fn write_u32(&mut self, value: u32) {
        let mut tmp = [0u8; 4];
        self.endian.write_u32(&mut tmp, value);
        self.buf.extend_from_slice(&tmp);
    }

    /// Append an i32 in the default byte order.
    #[inline]
    pub fn write_i32(&mut self, value: i32) {
        let mut tmp = [0u8; 4];
        self.endian.write_i32(&mut tmp, value);
        self.buf.extend_from_slice(&tmp);
    }

    /// Append a u64 in the default byte order.
    #[inline]
    pub fn write_u64(&mut self, value: u64) {
        let mut tmp = [0u8; 8];
        self.endian.write_u64(&mut tmp, value);
        self.buf.extend_from_slice(&tmp);
    }

    /// Append an i64 in the default byte order.
    #[inline]
    pub fn write_i64(&mut self, value: i64) {
        let mut tmp = [0u8; 8];
        self.endian.write_i64(&mut tmp, value);
        self.buf.extend_from_slice(&tmp);
    }

    /// Append an f32 in the default byte order.
    #[inline]
    pub fn write_f32(&mut self, value: f32) {
        let mut tmp = [0u8; 4];
        self.endian.write_f32(&mut tmp, value);
        self.buf.extend_from_slice(&tmp);
    }

    /// Append an f64 in the default byte order.
    #[inline]
    pub fn write_f64(&mut self, value: f64) {
        let mut tmp = [0u8; 8];
        self.endian.write_f64(&mut tmp, value);
        self.buf.extend_from_slice(&tmp);
    }

    /// Append a little-endian u16 regardless of the default byte order.
    #[inline]
    pub fn write_u16_le(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Append a big-endian u16.
    #[inline]
    pub fn write_u16_be(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    /// Append a little-endian u32.
    #[inline]
    pub fn write_u32_le(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Append a big-endian u32.
    #[inline]
    pub fn write_u32_be(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    /// Append a little-endian u64.
    #[inline]
    pub fn write_u64_le(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Append a big-endian u64.
    #[inline]
    pub fn write_u64_be(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    /// Append the low `width` bytes of `value` in the given byte order.
    ///
    /// # Panics
    ///
    /// Panics if `width` is 0 or greater than 8.
    pub fn write_uint(&mut self, width: usize, endian: Endian, value: u64) {
        assert!((1..=8).contains(&width), "uint width must be 1..=8");
        // Mask to the field width; byteorder refuses values that do not fit.
        let masked = if width == 8 {
            value
        } else {
            value & ((1u64 << (8 * width)) - 1)
        };
        let mut tmp = [0u8; 8];
        endian.write_uint(&mut tmp[..width], masked);
        self.buf.extend_from_slice(&tmp[..width]);
    }

    /// Append the unsigned LEB128 encoding of `value`.
    pub fn write_varint(&mut self, value: u64) {
        varint::encode_into(value, &mut self.buf);
    }

    /// Collapse bit indices into a `width`-byte unsigned integer and append.
    /// Indices past the field width are dropped.
    pub fn write_flags(&mut self, width: usize, bits: &[u32]) {
        let endian = self.endian;
        self.write_uint(width, endian, flags::bits_value(bits));
    }

    /// Append a string followed by a null terminator.
    pub fn write_cstring(&mut self, value: &str) {
        self.buf.extend_from_slice(value.as_bytes());
        self.buf.push(0);
    }

    /// Append a string into a fixed-size field, zero-filled and truncated
    /// to `size` bytes.
    pub fn write_string_padded(&mut self, value: &str, size: usize) {
        let bytes = value.as_bytes();
        let used = bytes.len().min(size);
        self.buf.extend_from_slice(&bytes[..used]);
        self.buf.extend(std::iter::repeat(0u8).take(size - used));
    }

    /// Append a u8 length followed by the bytes (truncated at 255).
    pub fn write_raw_u8(&mut self, bytes: &[u8]) {
        let len = bytes.len().min(u8::MAX as usize);
        self.write_u8(len as u8);
        self.buf.extend_from_slice(&bytes[..len]);
    }

    /// Append a u16 length (default byte order) followed by the bytes.
    pub fn write_raw_u16(&mut self, bytes: &[u8]) {
        let len = bytes.len().min(u16::MAX as usize);
        self.write_u16(len as u16);
        self.buf.extend_from_slice(&bytes[..len]);
    }

    /// Append a u32 length (default byte order) followed by the bytes.
    pub fn write_raw_u32(&mut self, bytes: &[u8]) {
        let len = bytes.len().min(u32::MAX as usize);
        self.write_u32(len as u32);
        self.buf.extend_from_slice(&bytes[..len]);
    }

    /// Append a varint length followed by the bytes.
    pub fn write_raw_varint(&mut self, bytes: &[u8]) {
        self.write_varint(bytes.len() as u64);
        self.buf.extend_from_slice(bytes);
    }
}
