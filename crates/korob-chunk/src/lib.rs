//! Generic size-prefixed chunk scanning for Korob.
//!
//! Many container formats are a flat or nested run of `tag + length + bytes`
//! blocks. This crate scans such runs over a
//! [`BinaryCursor`](korob_common::BinaryCursor) with a configurable header
//! layout ([`TagFormat`]) and a lenient truncation policy: malformed or
//! truncated trailing data ends iteration instead of failing the scan.
//!
//! # Example
//!
//! ```
//! use korob_common::BinaryCursor;
//! use korob_chunk::{read_chunks, TagFormat};
//!
//! let data = b"fmt \x02\x00\x00\x00hidata\x01\x00\x00\x00!";
//! let mut cursor = BinaryCursor::new(data);
//!
//! for chunk in read_chunks(&mut cursor, TagFormat::default()) {
//!     println!("{}: {} bytes", chunk.tag, chunk.size);
//! }
//! ```

mod format;
mod scanner;

pub use format::{TagEncoding, TagFormat, TagValue};
pub use scanner::{read_chunks, ChunkDescriptor, ChunkIter, IsolatedChunks};
