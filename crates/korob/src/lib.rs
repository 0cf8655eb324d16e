//! Korob - binary container-format toolkit.
//!
//! This crate provides a unified interface to the Korob library ecosystem
//! for parsing and re-emitting nested, length-prefixed binary formats.
//!
//! # Crates
//!
//! - [`korob_common`] - Bounded cursor, binary writer, varint codec
//! - [`korob_chunk`] - Generic size-prefixed chunk scanning
//! - [`korob_riff`] - Recursive RIFF/LIST chunk trees
//!
//! # Example
//!
//! ```no_run
//! use korob::prelude::*;
//!
//! // Map a file and parse its chunk tree
//! let buffer = SourceBuffer::from_path("drums.wav")?;
//! let root = RiffChunk::parse(&buffer)?;
//!
//! for child in root.children() {
//!     println!("{:?}", child.tag());
//! }
//!
//! // Re-serialization reproduces the file byte-for-byte
//! assert_eq!(&root.to_bytes()[..], &buffer[..]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use korob_chunk as chunk;
pub use korob_common as common;
pub use korob_riff as riff;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use korob_chunk::{read_chunks, ChunkDescriptor, IsolatedChunks, TagEncoding, TagFormat, TagValue};
    pub use korob_common::{BinaryCursor, BinaryWriter, Endian, SourceBuffer};
    pub use korob_riff::RiffChunk;
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
