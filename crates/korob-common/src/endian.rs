//! Runtime byte-order selection.
//!
//! Container formats pick their byte order at configuration time, not at the
//! type level, so every multi-byte read and write in this workspace dispatches
//! through [`Endian`] to the matching `byteorder` implementation.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// Byte order of multi-byte fields.
///
/// The default is little-endian, which is what RIFF and most game container
/// formats use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endian {
    /// Least significant byte first.
    #[default]
    Little,
    /// Most significant byte first.
    Big,
}

macro_rules! dispatch_read {
    ($name:ident, $ty:ty) => {
        #[inline]
        pub(crate) fn $name(self, buf: &[u8]) -> $ty {
            match self {
                Endian::Little => LittleEndian::$name(buf),
                Endian::Big => BigEndian::$name(buf),
            }
        }
    };
}

macro_rules! dispatch_write {
    ($name:ident, $ty:ty) => {
        #[inline]
        pub(crate) fn $name(self, buf: &mut [u8], value: $ty) {
            match self {
                Endian::Little => LittleEndian::$name(buf, value),
                Endian::Big => BigEndian::$name(buf, value),
            }
        }
    };
}

impl Endian {
    dispatch_read!(read_u16, u16);
    dispatch_read!(read_i16, i16);
    dispatch_read!(read_u32, u32);
    dispatch_read!(read_i32, i32);
    dispatch_read!(read_u64, u64);
    dispatch_read!(read_i64, i64);
    dispatch_read!(read_f32, f32);
    dispatch_read!(read_f64, f64);

    dispatch_write!(write_u16, u16);
    dispatch_write!(write_i16, i16);
    dispatch_write!(write_u32, u32);
    dispatch_write!(write_i32, i32);
    dispatch_write!(write_u64, u64);
    dispatch_write!(write_i64, i64);
    dispatch_write!(write_f32, f32);
    dispatch_write!(write_f64, f64);

    /// Decode an unsigned integer of `buf.len()` bytes (1..=8).
    #[inline]
    pub(crate) fn read_uint(self, buf: &[u8]) -> u64 {
        match self {
            Endian::Little => LittleEndian::read_uint(buf, buf.len()),
            Endian::Big => BigEndian::read_uint(buf, buf.len()),
        }
    }

    /// Encode the low `buf.len()` bytes (1..=8) of `value`.
    #[inline]
    pub(crate) fn write_uint(self, buf: &mut [u8], value: u64) {
        let nbytes = buf.len();
        match self {
            Endian::Little => LittleEndian::write_uint(buf, value, nbytes),
            Endian::Big => BigEndian::write_uint(buf, value, nbytes),
        }
    }
}
