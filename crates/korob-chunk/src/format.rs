//! Header layout configuration for generic chunk scanning.

use korob_common::Endian;

/// How a chunk's tag field is encoded.
///
/// The raw-vs-numeric decision is made once here, and the decoded value
/// carries it as a [`TagValue`] variant - scanning logic never re-branches
/// on a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagEncoding {
    /// A fixed-width run of raw bytes, e.g. a FOURCC.
    Raw {
        /// Tag width in bytes.
        width: usize,
    },
    /// An unsigned integer of the given width and byte order.
    Numeric {
        /// Tag width in bytes (1..=8).
        width: usize,
        /// Byte order of the integer tag.
        endian: Endian,
    },
}

impl TagEncoding {
    /// Width of the encoded tag in bytes.
    pub fn width(&self) -> usize {
        match *self {
            Self::Raw { width } | Self::Numeric { width, .. } => width,
        }
    }
}

impl Default for TagEncoding {
    fn default() -> Self {
        Self::Raw { width: 4 }
    }
}

/// On-wire layout of a chunk header: tag encoding plus length-field width
/// and byte order. Tag and length are configured independently - real
/// formats do mix widths and byte orders between the two.
///
/// Numeric tag and length widths must be between 1 and 8 bytes; scanning
/// with a wider field panics in the underlying integer read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagFormat {
    /// Tag field encoding.
    pub tag: TagEncoding,
    /// Length field width in bytes (1..=8).
    pub length_width: usize,
    /// Length field byte order.
    pub length_endian: Endian,
}

impl TagFormat {
    /// Total header size: tag width plus length width.
    pub fn header_len(&self) -> usize {
        self.tag.width() + self.length_width
    }
}

impl Default for TagFormat {
    /// Raw 4-byte tag, 4-byte little-endian length - the RIFF convention.
    fn default() -> Self {
        Self {
            tag: TagEncoding::default(),
            length_width: 4,
            length_endian: Endian::Little,
        }
    }
}

/// A decoded chunk tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagValue {
    /// Raw tag bytes.
    Raw(Vec<u8>),
    /// Decoded integer tag.
    Numeric(u64),
}

impl TagValue {
    /// The raw bytes, if this is a raw tag.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Raw(bytes) => Some(bytes),
            Self::Numeric(_) => None,
        }
    }

    /// The integer value, if this is a numeric tag.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Raw(_) => None,
            Self::Numeric(value) => Some(*value),
        }
    }
}

impl std::fmt::Display for TagValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Raw(bytes) => {
                if bytes.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
                    write!(f, "{}", String::from_utf8_lossy(bytes))
                } else {
                    for b in bytes {
                        write!(f, "{b:02x}")?;
                    }
                    Ok(())
                }
            }
            Self::Numeric(value) => write!(f, "{value:#x}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_riff_layout() {
        let fmt = TagFormat::default();
        assert_eq!(fmt.tag, TagEncoding::Raw { width: 4 });
        assert_eq!(fmt.length_width, 4);
        assert_eq!(fmt.length_endian, Endian::Little);
        assert_eq!(fmt.header_len(), 8);
    }

    #[test]
    fn test_display() {
        assert_eq!(TagValue::Raw(b"fmt ".to_vec()).to_string(), "fmt ");
        assert_eq!(TagValue::Raw(vec![0x00, 0xFF]).to_string(), "00ff");
        assert_eq!(TagValue::Numeric(0x1234).to_string(), "0x1234");
    }
}
