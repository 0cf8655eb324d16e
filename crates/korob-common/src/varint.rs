//! Unsigned LEB128 varint codec.
//!
//! Chunk formats occasionally use a continuation-bit variable-length integer
//! instead of a fixed-width length field. Each byte carries 7 payload bits,
//! low group first; the high bit marks continuation. A `u64` never needs more
//! than [`MAX_BYTES`] bytes.

use crate::{Error, Result};

/// Longest valid encoding of a `u64`.
pub const MAX_BYTES: usize = 10;

/// Decode a varint from the start of `data`.
///
/// Returns the value and the number of bytes consumed. Fails with
/// [`Error::UnexpectedEof`] on a dangling continuation bit and
/// [`Error::VarintOverflow`] past [`MAX_BYTES`].
pub fn decode(data: &[u8]) -> Result<(u64, usize)> {
    let mut value = 0u64;
    let mut shift = 0u32;

    for (i, &byte) in data.iter().enumerate() {
        if i >= MAX_BYTES {
            return Err(Error::VarintOverflow { max_bytes: MAX_BYTES });
        }
        // The tenth byte may only contribute the final bit of a u64.
        if shift == 63 && byte & 0x7E != 0 {
            return Err(Error::VarintOverflow { max_bytes: MAX_BYTES });
        }
        value |= u64::from(byte & 0x7F) << shift;
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
        shift += 7;
    }

    if data.len() >= MAX_BYTES {
        return Err(Error::VarintOverflow { max_bytes: MAX_BYTES });
    }
    Err(Error::UnexpectedEof {
        needed: data.len() + 1,
        available: data.len(),
    })
}

/// Append the encoding of `value` to `out`, returning the byte count.
pub fn encode_into(mut value: u64, out: &mut Vec<u8>) -> usize {
    let mut written = 0;
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        written += 1;
        if value == 0 {
            out.push(byte);
            return written;
        }
        out.push(byte | 0x80);
    }
}
