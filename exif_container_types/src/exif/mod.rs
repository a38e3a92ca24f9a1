//! Exif's wire format is TIFF: a byte order marker, the magic number `42`,
//! and a chain of IFDs (Image File Directories) made of 12-byte entries.
//!
//! This module holds the pieces of that format that aren't tied to any one
//! container.

pub mod ifd;
pub mod primitives;
pub mod tags;

/// Each blob of Exif will start with a byte order marker - its endianness.
///
/// It's either `II` (Intel, for little-endian) or `MM` (Motorola, for
/// big-endian).
///
/// Every multi-byte number in the blob, including offsets, follows this
/// order. Rewriting a blob in the other order would break any opaque
/// vendor data inside it, so the order is always preserved.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum Endianness {
    /// `II` for Intel, little-endian.
    Little,

    /// `MM` for Motorola. Big-endian.
    Big,
}

impl Endianness {
    /// The four bytes that begin a TIFF header in this byte order.
    ///
    /// ```
    /// use exif_container_types::exif::Endianness;
    ///
    /// assert_eq!(Endianness::Little.tiff_header(), *b"II*\0");
    /// assert_eq!(Endianness::Big.tiff_header(), *b"MM\0*");
    /// ```
    pub const fn tiff_header(self) -> [u8; 4] {
        match self {
            Endianness::Little => [b'I', b'I', 0x2A, 0x00],
            Endianness::Big => [b'M', b'M', 0x00, 0x2A],
        }
    }

    /// Reads the byte order from a two-byte marker.
    pub const fn from_marker(marker: [u8; 2]) -> Option<Self> {
        match marker {
            [b'I', b'I'] => Some(Endianness::Little),
            [b'M', b'M'] => Some(Endianness::Big),
            _ => None,
        }
    }

    pub const fn u16_from(self, bytes: [u8; 2]) -> u16 {
        match self {
            Endianness::Little => u16::from_le_bytes(bytes),
            Endianness::Big => u16::from_be_bytes(bytes),
        }
    }

    pub const fn u32_from(self, bytes: [u8; 4]) -> u32 {
        match self {
            Endianness::Little => u32::from_le_bytes(bytes),
            Endianness::Big => u32::from_be_bytes(bytes),
        }
    }

    pub const fn u16_to(self, value: u16) -> [u8; 2] {
        match self {
            Endianness::Little => value.to_le_bytes(),
            Endianness::Big => value.to_be_bytes(),
        }
    }

    pub const fn u32_to(self, value: u32) -> [u8; 4] {
        match self {
            Endianness::Little => value.to_le_bytes(),
            Endianness::Big => value.to_be_bytes(),
        }
    }
}
