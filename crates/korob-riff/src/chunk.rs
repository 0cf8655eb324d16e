//! The RIFF chunk tree.
//!
//! A RIFF file is a tree of FOURCC-tagged chunks. Two reserved outer tags
//! mark containers: `RIFF` (root only) and `LIST` (interior). Both are
//! immediately followed by a 4-byte sub-tag that becomes the node's
//! effective tag, then a homogeneous run of child chunks. Every other tag is
//! a leaf holding raw payload bytes. Chunk contents are padded to an even
//! length with one zero byte that the length field does not count.
//!
//! [`RiffChunk`] makes the leaf/container split a type-level invariant: a
//! node is one variant or the other, never a hybrid.

use std::path::Path;

use korob_common::{BinaryCursor, BinaryWriter, SourceBuffer};

use crate::{Error, Result};

/// Reserved outer tag of the tree root.
pub const TAG_RIFF: [u8; 4] = *b"RIFF";
/// Reserved outer tag of interior containers.
pub const TAG_LIST: [u8; 4] = *b"LIST";

/// A node in a RIFF chunk tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RiffChunk {
    /// A container: sub-tag plus ordered children, no payload of its own.
    Container {
        /// The 4-byte sub-tag, e.g. `WAVE` or `INFO`.
        tag: [u8; 4],
        /// Child chunks in encounter order.
        children: Vec<RiffChunk>,
    },
    /// A leaf: tag plus raw payload bytes.
    Leaf {
        /// The 4-byte chunk tag, e.g. `fmt ` or `data`.
        tag: [u8; 4],
        /// Raw payload (never interpreted by this crate).
        payload: Vec<u8>,
    },
}

impl RiffChunk {
    /// Create an empty container.
    pub fn container(tag: [u8; 4]) -> Self {
        Self::Container {
            tag,
            children: Vec::new(),
        }
    }

    /// Create a leaf with the given payload.
    pub fn leaf(tag: [u8; 4], payload: Vec<u8>) -> Self {
        Self::Leaf { tag, payload }
    }

    /// The node's effective tag (the sub-tag for containers).
    pub fn tag(&self) -> [u8; 4] {
        match self {
            Self::Container { tag, .. } | Self::Leaf { tag, .. } => *tag,
        }
    }

    /// Check whether this node is a container.
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Container { .. })
    }

    /// Child chunks; empty for leaves.
    pub fn children(&self) -> &[RiffChunk] {
        match self {
            Self::Container { children, .. } => children,
            Self::Leaf { .. } => &[],
        }
    }

    /// Mutable child list, if this is a container.
    pub fn children_mut(&mut self) -> Option<&mut Vec<RiffChunk>> {
        match self {
            Self::Container { children, .. } => Some(children),
            Self::Leaf { .. } => None,
        }
    }

    /// Payload bytes, if this is a leaf.
    pub fn payload(&self) -> Option<&[u8]> {
        match self {
            Self::Container { .. } => None,
            Self::Leaf { payload, .. } => Some(payload),
        }
    }

    /// Mutable payload, if this is a leaf.
    pub fn payload_mut(&mut self) -> Option<&mut Vec<u8>> {
        match self {
            Self::Container { .. } => None,
            Self::Leaf { payload, .. } => Some(payload),
        }
    }

    /// Replace a leaf's payload.
    ///
    /// # Panics
    ///
    /// Panics if called on a container.
    pub fn set_payload(&mut self, payload: Vec<u8>) {
        match self {
            Self::Leaf { payload: p, .. } => *p = payload,
            Self::Container { .. } => panic!("cannot set a payload on a container chunk"),
        }
    }

    /// Find the first child with the given tag.
    pub fn find(&self, tag: [u8; 4]) -> Option<&RiffChunk> {
        self.children().iter().find(|c| c.tag() == tag)
    }

    /// Find the first child with the given tag, mutably.
    pub fn find_mut(&mut self, tag: [u8; 4]) -> Option<&mut RiffChunk> {
        self.children_mut()?.iter_mut().find(|c| c.tag() == tag)
    }

    /// Append an empty leaf child and return it for payload filling.
    ///
    /// # Panics
    ///
    /// Panics if called on a leaf.
    pub fn add_part(&mut self, tag: [u8; 4]) -> &mut RiffChunk {
        self.push_child(Self::leaf(tag, Vec::new()))
    }

    /// Append an empty container child and return it for nesting.
    ///
    /// # Panics
    ///
    /// Panics if called on a leaf.
    pub fn add_group(&mut self, tag: [u8; 4]) -> &mut RiffChunk {
        self.push_child(Self::container(tag))
    }

    fn push_child(&mut self, child: RiffChunk) -> &mut RiffChunk {
        let children = self
            .children_mut()
            .expect("cannot add children to a leaf chunk");
        children.push(child);
        children.last_mut().unwrap()
    }

    /// Check whether `data` starts with the `RIFF` magic.
    pub fn detect(data: &[u8]) -> bool {
        data.len() >= 4 && data[..4] == TAG_RIFF
    }

    /// Parse a chunk tree from a byte buffer, loading leaf payloads.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut cursor = BinaryCursor::new(data);
        Self::read(&mut cursor, true)
    }

    /// Parse only the tree structure, skipping leaf payloads.
    ///
    /// Leaves come back with empty payloads; useful for inspecting layout
    /// without materializing the data.
    pub fn parse_meta(data: &[u8]) -> Result<Self> {
        let mut cursor = BinaryCursor::new(data);
        Self::read(&mut cursor, false)
    }

    /// Parse a chunk tree from a file via a read-only memory mapping.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let buffer = SourceBuffer::from_path(path)?;
        Self::parse(&buffer)
    }

    /// Read one chunk (recursively, for containers) from a cursor.
    ///
    /// A truncated header or short payload is a hard error here - unlike
    /// generic chunk scanning, the tree reader propagates `UnexpectedEof`
    /// rather than silently stopping.
    pub fn read(cursor: &mut BinaryCursor<'_>, load_payload: bool) -> Result<Self> {
        let outer_tag: [u8; 4] = cursor.read_array()?;
        let size = cursor.read_u32_le()? as usize;

        if outer_tag == TAG_RIFF || outer_tag == TAG_LIST {
            // The 4-byte sub-tag consumes part of the declared content.
            if size < 4 {
                return Err(Error::ContainerTooShort { size });
            }
            let tag: [u8; 4] = cursor.read_array()?;
            let content = size - 4;

            cursor.isolate_size(content);
            let mut children = Vec::new();
            while cursor.remaining() > 0 {
                children.push(Self::read(cursor, load_payload)?);
            }
            cursor.isolate_end();

            Ok(Self::Container { tag, children })
        } else {
            let payload = if load_payload {
                let bytes = cursor.read_bytes(size)?.to_vec();
                // Consume the pad byte so the next sibling read stays
                // aligned; the length field never counts it.
                cursor.skip(size & 1);
                bytes
            } else {
                cursor.skip(size + (size & 1));
                Vec::new()
            };
            Ok(Self::Leaf {
                tag: outer_tag,
                payload,
            })
        }
    }

    /// Serialize the tree to bytes, this node as the root.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = BinaryWriter::new();
        self.write_to(&mut writer);
        writer.into_bytes()
    }

    /// Serialize the tree into an existing writer, this node as the root.
    pub fn write_to(&self, writer: &mut BinaryWriter) {
        self.write_chunk(writer, true);
    }

    /// Serialize the tree to a file.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BinaryWriter::new();
        self.write_to(&mut writer);
        writer.to_file(path)?;
        Ok(())
    }

    /// Depth-first serialization.
    ///
    /// Container payloads are accumulated in a separate inner writer so the
    /// emitted length field always matches the serialized children - no
    /// backpatching pass. The root container emits `RIFF`; every nested
    /// container emits `LIST`.
    fn write_chunk(&self, writer: &mut BinaryWriter, root: bool) {
        match self {
            Self::Leaf { tag, payload } => {
                writer.write_bytes(tag);
                writer.write_u32_le(payload.len() as u32);
                writer.write_bytes(payload);
                if payload.len() % 2 == 1 {
                    writer.write_u8(0);
                }
            }
            Self::Container { tag, children } => {
                writer.write_bytes(if root { &TAG_RIFF } else { &TAG_LIST });

                let mut inner = BinaryWriter::new();
                inner.write_bytes(tag);
                for child in children {
                    child.write_chunk(&mut inner, false);
                }
                let body = inner.into_bytes();

                writer.write_u32_le(body.len() as u32);
                writer.write_bytes(&body);
                if body.len() % 2 == 1 {
                    writer.write_u8(0);
                }
            }
        }
    }
}
