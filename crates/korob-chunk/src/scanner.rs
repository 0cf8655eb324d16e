//! Chunk scanning over a bounded cursor.
//!
//! All scanning builds on one step: read a tag and a length per the
//! [`TagFormat`], bounds-check the declared size against the cursor's active
//! window, and produce a [`ChunkDescriptor`]. Truncation - too few bytes for
//! a header, or a declared size that overruns the window - is a *soft* stop:
//! the step yields nothing and iteration ends. Malformed trailing data never
//! aborts a scan; callers must not take a short chunk list as proof the
//! input was well formed.
//!
//! Three policies sit on top of the step:
//!
//! - [`read_chunks`]: eager iteration, each descriptor fully materialized
//!   with its payload.
//! - [`IsolatedChunks::new`]: per-chunk window isolation; the caller reads
//!   inside the chunk's window (possibly recursively scanning) and the next
//!   step resynchronizes to the chunk boundary unconditionally.
//! - [`IsolatedChunks::until`]: the same, bounded by a caller-supplied end
//!   offset instead of the enclosing window.

use korob_common::BinaryCursor;

use crate::{TagEncoding, TagFormat, TagValue};

/// A scanned chunk: tag, absolute payload bounds, and optionally the
/// payload bytes themselves.
///
/// `start` and `end` are absolute buffer offsets of the payload, with the
/// header excluded; `end - start == size` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkDescriptor {
    /// Decoded tag.
    pub tag: TagValue,
    /// Absolute offset of the first payload byte.
    pub start: usize,
    /// Absolute offset one past the last payload byte.
    pub end: usize,
    /// Declared payload size in bytes.
    pub size: usize,
    /// Payload bytes, present only under eager scanning.
    pub payload: Option<Vec<u8>>,
}

/// One scan step. `None` means end of sequence, never an error.
fn read_descriptor(
    cursor: &mut BinaryCursor<'_>,
    fmt: &TagFormat,
    load_payload: bool,
) -> Option<ChunkDescriptor> {
    if cursor.remaining() < fmt.header_len() {
        return None;
    }

    let tag = match fmt.tag {
        TagEncoding::Raw { width } => TagValue::Raw(cursor.read_bytes(width).ok()?.to_vec()),
        TagEncoding::Numeric { width, endian } => {
            TagValue::Numeric(cursor.read_uint(width, endian).ok()?)
        }
    };
    let size = cursor.read_uint(fmt.length_width, fmt.length_endian).ok()? as usize;
    if size > cursor.remaining() {
        return None;
    }
    let start = cursor.position();
    let end = start + size;
    let payload = if load_payload {
        Some(cursor.read_bytes(size).ok()?.to_vec())
    } else {
        None
    };

    Some(ChunkDescriptor {
        tag,
        start,
        end,
        size,
        payload,
    })
}

/// Eagerly scan every chunk in the cursor's active window.
///
/// Each yielded descriptor carries its payload and the cursor has advanced
/// past it. The sequence is finite and not restartable.
pub fn read_chunks<'c, 'a>(
    cursor: &'c mut BinaryCursor<'a>,
    fmt: TagFormat,
) -> ChunkIter<'c, 'a> {
    ChunkIter { cursor, fmt }
}

/// Iterator returned by [`read_chunks`].
pub struct ChunkIter<'c, 'a> {
    cursor: &'c mut BinaryCursor<'a>,
    fmt: TagFormat,
}

impl Iterator for ChunkIter<'_, '_> {
    type Item = ChunkDescriptor;

    fn next(&mut self) -> Option<ChunkDescriptor> {
        if self.cursor.remaining() == 0 {
            return None;
        }
        read_descriptor(self.cursor, &self.fmt, true)
    }
}

/// Window-isolating chunk scanner.
///
/// This is a step function rather than an `Iterator`: the cursor is passed
/// into each [`next`](Self::next) call, so between steps the caller keeps
/// full use of it inside the yielded chunk's window - reading part of the
/// payload, recursively scanning a nested format, or ignoring it entirely.
/// Each `next` call first snaps the cursor to the previous chunk's boundary
/// via `isolate_end`, so an inner parser that stops short or overruns can
/// never desynchronize the outer iteration.
///
/// Stopping early leaves the last chunk's window pushed; call
/// [`finish`](Self::finish) to close it.
#[derive(Debug, Clone)]
pub struct IsolatedChunks {
    fmt: TagFormat,
    end: Option<usize>,
    open: bool,
}

impl IsolatedChunks {
    /// Scan until the enclosing window is exhausted.
    pub fn new(fmt: TagFormat) -> Self {
        Self {
            fmt,
            end: None,
            open: false,
        }
    }

    /// Scan until the cursor reaches the absolute offset `end`.
    ///
    /// For regions that hold a known number of bytes but mix a chunk run
    /// with other structured content before the cutoff.
    pub fn until(fmt: TagFormat, end: usize) -> Self {
        Self {
            fmt,
            end: Some(end),
            open: false,
        }
    }

    /// Step to the next chunk.
    ///
    /// Pushes an isolated window spanning exactly the chunk's declared
    /// payload before returning its descriptor (payload not loaded).
    pub fn next(&mut self, cursor: &mut BinaryCursor<'_>) -> Option<ChunkDescriptor> {
        self.close(cursor);

        let more = match self.end {
            Some(end) => cursor.position() < end,
            None => cursor.remaining() > 0,
        };
        if !more {
            return None;
        }

        let descriptor = read_descriptor(cursor, &self.fmt, false)?;
        cursor.isolate_size(descriptor.size);
        self.open = true;
        Some(descriptor)
    }

    /// Close the window of a chunk yielded by the last [`next`](Self::next)
    /// call, if one is still open. Needed only when abandoning a scan.
    pub fn finish(&mut self, cursor: &mut BinaryCursor<'_>) {
        self.close(cursor);
    }

    fn close(&mut self, cursor: &mut BinaryCursor<'_>) {
        if self.open {
            cursor.isolate_end();
            self.open = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use korob_common::{BinaryWriter, Endian};

    fn two_chunks() -> Vec<u8> {
        let mut w = BinaryWriter::new();
        w.write_bytes(b"TAG1");
        w.write_raw_u32(b"xyz");
        w.write_bytes(b"TAG2");
        w.write_raw_u32(b"hello");
        w.into_bytes()
    }

    #[test]
    fn test_eager_scan() {
        let data = two_chunks();
        let mut cursor = BinaryCursor::new(&data);
        let chunks: Vec<_> = read_chunks(&mut cursor, TagFormat::default()).collect();

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].tag, TagValue::Raw(b"TAG1".to_vec()));
        assert_eq!(chunks[0].size, 3);
        assert_eq!(chunks[0].start, 8);
        assert_eq!(chunks[0].end, 11);
        assert_eq!(chunks[0].payload.as_deref(), Some(&b"xyz"[..]));
        assert_eq!(chunks[1].tag, TagValue::Raw(b"TAG2".to_vec()));
        assert_eq!(chunks[1].payload.as_deref(), Some(&b"hello"[..]));
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_truncated_chunk_stops_scan() {
        // TAG1 is fine; TAG2 declares 100 bytes with none following.
        let mut w = BinaryWriter::new();
        w.write_bytes(b"TAG1");
        w.write_raw_u32(b"xyz");
        w.write_bytes(b"TAG2");
        w.write_u32(100);
        let data = w.into_bytes();

        let mut cursor = BinaryCursor::new(&data);
        let chunks: Vec<_> = read_chunks(&mut cursor, TagFormat::default()).collect();

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].tag, TagValue::Raw(b"TAG1".to_vec()));
    }

    #[test]
    fn test_huge_declared_length_stops_scan() {
        // A length field of u64::MAX must end the scan, not wrap around.
        let mut w = BinaryWriter::new();
        w.write_bytes(b"TAG1");
        w.write_u64(u64::MAX);
        let data = w.into_bytes();

        let fmt = TagFormat {
            length_width: 8,
            ..TagFormat::default()
        };
        let mut cursor = BinaryCursor::new(&data);
        assert_eq!(read_chunks(&mut cursor, fmt).count(), 0);
    }

    #[test]
    fn test_partial_header_stops_scan() {
        let data = b"TAG1\x03\x00\x00\x00xyzTA";
        let mut cursor = BinaryCursor::new(data);
        let chunks: Vec<_> = read_chunks(&mut cursor, TagFormat::default()).collect();
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn test_empty_buffer() {
        let mut cursor = BinaryCursor::new(&[]);
        assert_eq!(read_chunks(&mut cursor, TagFormat::default()).count(), 0);
    }

    #[test]
    fn test_isolated_resynchronizes() {
        let data = two_chunks();
        let mut cursor = BinaryCursor::new(&data);
        let mut scan = IsolatedChunks::new(TagFormat::default());

        let first = scan.next(&mut cursor).unwrap();
        assert_eq!(first.tag, TagValue::Raw(b"TAG1".to_vec()));
        // Consume only one of the three payload bytes.
        assert_eq!(cursor.read_u8().unwrap(), b'x');
        assert_eq!(cursor.remaining(), 2);

        let second = scan.next(&mut cursor).unwrap();
        assert_eq!(second.tag, TagValue::Raw(b"TAG2".to_vec()));
        assert_eq!(cursor.remaining(), 5);
        // Consume nothing at all this time.

        assert!(scan.next(&mut cursor).is_none());
        assert_eq!(cursor.position(), data.len());
    }

    #[test]
    fn test_isolated_window_confines_reads() {
        let data = two_chunks();
        let mut cursor = BinaryCursor::new(&data);
        let mut scan = IsolatedChunks::new(TagFormat::default());

        let first = scan.next(&mut cursor).unwrap();
        assert_eq!(cursor.remaining(), first.size);
        assert_eq!(cursor.rest().unwrap(), b"xyz");
        assert_eq!(cursor.remaining(), 0);
        scan.finish(&mut cursor);
        assert_eq!(cursor.position(), first.end);
    }

    #[test]
    fn test_bounded_scan_stops_at_cutoff() {
        // Two chunks, but the caller only owns the region up to the first
        // chunk's end; the second belongs to someone else.
        let data = two_chunks();
        let mut cursor = BinaryCursor::new(&data);
        let mut scan = IsolatedChunks::until(TagFormat::default(), 11);

        assert!(scan.next(&mut cursor).is_some());
        assert!(scan.next(&mut cursor).is_none());
        assert_eq!(cursor.position(), 11);
    }

    #[test]
    fn test_numeric_tag_mixed_widths() {
        // 2-byte big-endian numeric tag with a 1-byte length field.
        let mut w = BinaryWriter::new();
        w.write_u16_be(0xBEEF);
        w.write_u8(2);
        w.write_bytes(b"ok");
        let data = w.into_bytes();

        let fmt = TagFormat {
            tag: TagEncoding::Numeric {
                width: 2,
                endian: Endian::Big,
            },
            length_width: 1,
            length_endian: Endian::Little,
        };
        let mut cursor = BinaryCursor::new(&data);
        let chunks: Vec<_> = read_chunks(&mut cursor, fmt).collect();

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].tag, TagValue::Numeric(0xBEEF));
        assert_eq!(chunks[0].payload.as_deref(), Some(&b"ok"[..]));
    }

    #[test]
    fn test_nested_scan_inside_isolated_window() {
        // Outer chunk whose payload is itself a chunk run.
        let mut inner = BinaryWriter::new();
        inner.write_bytes(b"IN01");
        inner.write_raw_u32(b"a");
        inner.write_bytes(b"IN02");
        inner.write_raw_u32(b"bc");

        let mut w = BinaryWriter::new();
        w.write_bytes(b"OUTR");
        w.write_raw_u32(inner.as_bytes());
        let data = w.into_bytes();

        let mut cursor = BinaryCursor::new(&data);
        let mut outer = IsolatedChunks::new(TagFormat::default());

        let chunk = outer.next(&mut cursor).unwrap();
        assert_eq!(chunk.tag, TagValue::Raw(b"OUTR".to_vec()));

        let inner_tags: Vec<_> = read_chunks(&mut cursor, TagFormat::default())
            .map(|c| c.tag)
            .collect();
        assert_eq!(
            inner_tags,
            vec![
                TagValue::Raw(b"IN01".to_vec()),
                TagValue::Raw(b"IN02".to_vec())
            ]
        );

        assert!(outer.next(&mut cursor).is_none());
        assert_eq!(cursor.position(), data.len());
    }
}
