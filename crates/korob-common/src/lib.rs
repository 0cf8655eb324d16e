//! Common utilities for Korob.
//!
//! This crate provides the foundational types used across all Korob crates:
//!
//! - [`BinaryCursor`] - Bounded cursor over a byte slice with a window stack
//! - [`BinaryWriter`] - Append-only typed writer for building output
//! - [`SourceBuffer`] - Owned backing bytes (heap or memory-mapped file)
//! - [`Endian`] - Runtime byte-order selection
//! - [`varint`] - Unsigned LEB128 codec
//! - [`flags`] - Flag bitset helpers

mod buffer;
mod cursor;
mod endian;
mod error;
mod writer;

pub mod flags;
pub mod varint;

pub use buffer::SourceBuffer;
pub use cursor::{BinaryCursor, Window};
pub use endian::Endian;
pub use error::{Error, Result};
pub use writer::BinaryWriter;

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
