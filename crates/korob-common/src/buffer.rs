//! Backing-buffer ownership.
//!
//! [`SourceBuffer`] owns the bytes a [`BinaryCursor`](crate::BinaryCursor)
//! parses: either an in-memory vector or a read-only memory-mapped file. The
//! cursor itself only ever sees a `&[u8]`, so loading stays out of the
//! parsing layers entirely.

use std::fs::File;
use std::ops::Deref;
use std::path::Path;

use memmap2::Mmap;

use crate::Result;

/// An owned, read-only byte buffer backing a parse.
#[derive(Debug)]
pub enum SourceBuffer {
    /// Heap-allocated bytes.
    Owned(Vec<u8>),
    /// A read-only memory mapping of a file.
    Mapped(Mmap),
}

impl SourceBuffer {
    /// Memory-map a file read-only.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Self::Mapped(mmap))
    }

    /// Wrap an in-memory byte vector.
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self::Owned(data)
    }

    /// Length of the buffer in bytes.
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Check whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// View the full buffer contents.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Owned(v) => v,
            Self::Mapped(m) => m,
        }
    }
}

impl Deref for SourceBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<Vec<u8>> for SourceBuffer {
    fn from(data: Vec<u8>) -> Self {
        Self::Owned(data)
    }
}
