//! RIFF/LIST chunk tree codec for Korob.
//!
//! Reads a RIFF-style container file into a [`RiffChunk`] tree and writes it
//! back byte-exactly, including the even-alignment pad bytes the length
//! fields never count. Payloads are carried as opaque bytes - this crate
//! understands `tag + length + bytes`, never what a tag's payload means.
//!
//! # Example
//!
//! ```
//! use korob_riff::RiffChunk;
//!
//! let mut root = RiffChunk::container(*b"WAVE");
//! root.add_part(*b"fmt ").set_payload(vec![0; 16]);
//! root.add_part(*b"data").set_payload(vec![0; 64]);
//!
//! let bytes = root.to_bytes();
//! assert_eq!(RiffChunk::parse(&bytes)?, root);
//! # Ok::<(), korob_riff::Error>(())
//! ```

mod chunk;
mod error;

pub use chunk::{RiffChunk, TAG_LIST, TAG_RIFF};
pub use error::{Error, Result};
