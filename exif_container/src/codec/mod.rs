//! Turns TIFF-structured Exif bytes into a [`TagTree`] and back.
//!
//! The container engines only talk to the [`ExifCodec`] trait. [`TiffCodec`]
//! is the implementation this crate ships with.

use exif_container_types::exif::Endianness;

use self::error::CodecError;

mod decode;
mod encode;
pub mod error;
mod tree;

pub use tree::{Entry, TagTree};

/// How far every internal offset moves when an encoded blob is placed
/// somewhere other than byte 0 of its TIFF structure.
///
/// In a DNG, the encoded IFDs land at some position `p` in the file, but the
/// encoder lays them out as if the TIFF header were right before them. Every
/// offset the encoder writes is shifted by `p - 8` so it points at the right
/// place in the real file.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub struct RelocationDelta(u32);

impl RelocationDelta {
    /// No relocation. Used for blobs that carry their own TIFF header, like
    /// those in JPEG and PNG.
    pub const ZERO: RelocationDelta = RelocationDelta(0);

    /// The delta for writing IFDs at `write_pos` in a stream of `stream_len`
    /// bytes.
    ///
    /// Returns `None` if the position is inside the TIFF header, past the end
    /// of the stream, or too far for a 32-bit offset.
    ///
    /// ```
    /// use exif_container::codec::RelocationDelta;
    ///
    /// assert_eq!(RelocationDelta::for_write_position(100, 200).map(|d| d.get()), Some(92));
    /// assert_eq!(RelocationDelta::for_write_position(4, 200), None);
    /// assert_eq!(RelocationDelta::for_write_position(201, 200), None);
    /// ```
    pub fn for_write_position(write_pos: u64, stream_len: u64) -> Option<Self> {
        if write_pos > stream_len {
            return None;
        }
        let delta: u64 = write_pos.checked_sub(8)?;
        u32::try_from(delta).ok().map(RelocationDelta)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    /// Shifts a blob-relative offset. `None` if it overflows.
    pub const fn apply(self, offset: u32) -> Option<u32> {
        offset.checked_add(self.0)
    }
}

/// Options for [`ExifCodec::decode`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// The byte order the container expects. The TIFF header still wins if
    /// they disagree.
    pub byte_order_hint: Option<Endianness>,

    /// No offset at or past this address (relative to the TIFF header) may be
    /// read.
    pub max_addr: Option<u32>,

    /// Whether to follow IFD 0's "next IFD" link into IFD 1 (the thumbnail).
    ///
    /// DNG files use that link for other images, so the TIFF engine turns
    /// this off and keeps the original link instead.
    pub follow_ifd1: bool,
}

/// The result of a decode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decoded {
    pub tree: TagTree,

    /// One past the highest byte the decoder read, relative to the TIFF
    /// header.
    pub max_addr_read: u32,
}

/// Decodes and encodes TIFF-structured Exif.
pub trait ExifCodec {
    /// Decodes the TIFF structure starting at `tiff[0]`.
    fn decode(&self, tiff: &[u8], options: DecodeOptions) -> Result<Decoded, CodecError>;

    /// Encodes `tree` into a complete TIFF structure, header included.
    ///
    /// Every offset inside is shifted by `delta`. If `next_ifd` is given, it's
    /// written (as-is) as IFD 0's "next IFD" link.
    fn encode(
        &self,
        tree: &TagTree,
        delta: RelocationDelta,
        next_ifd: Option<u32>,
    ) -> Result<Vec<u8>, CodecError>;
}

/// The default codec.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TiffCodec;

impl ExifCodec for TiffCodec {
    fn decode(&self, tiff: &[u8], options: DecodeOptions) -> Result<Decoded, CodecError> {
        decode::decode(tiff, options).inspect_err(|e| log::error!("Failed to decode TIFF! err: {e}"))
    }

    fn encode(
        &self,
        tree: &TagTree,
        delta: RelocationDelta,
        next_ifd: Option<u32>,
    ) -> Result<Vec<u8>, CodecError> {
        encode::encode(tree, delta, next_ifd)
    }
}

#[cfg(test)]
mod tests {
    use exif_container_types::exif::{Endianness, ifd::IfdGroup, primitives::PrimitiveTy};

    use super::{DecodeOptions, Entry, ExifCodec as _, RelocationDelta, TagTree, TiffCodec};
    use crate::{codec::error::CodecError, util::logger};

    fn sample_tree(endianness: Endianness) -> TagTree {
        let mut tree = TagTree::new(endianness);
        tree.set("Make", "Raves Camera Co.").unwrap();
        tree.set("Orientation", "1").unwrap();
        tree.set("XResolution", "72/1").unwrap();
        tree.set("ApertureValue", "4/1").unwrap();
        tree.set("DateTimeOriginal", "2024:06:01 12:30:00").unwrap();
        tree.set("InteroperabilityIndex", "R98").unwrap();
        tree.set("GPSLatitudeRef", "N").unwrap();
        tree.set("GPSLatitude", "39/1 54/1 20/1").unwrap();
        tree
    }

    fn full() -> DecodeOptions {
        DecodeOptions {
            follow_ifd1: true,
            ..Default::default()
        }
    }

    #[test]
    fn encode_then_decode_keeps_every_group() {
        logger();

        for endianness in [Endianness::Little, Endianness::Big] {
            let tree = sample_tree(endianness);
            let bytes = TiffCodec.encode(&tree, RelocationDelta::ZERO, None).unwrap();
            assert_eq!(&bytes[..4], endianness.tiff_header());

            let decoded = TiffCodec.decode(&bytes, full()).unwrap();
            assert_eq!(decoded.tree, tree);
            assert_eq!(decoded.max_addr_read as usize, bytes.len());
        }
    }

    #[test]
    fn thumbnail_survives_a_round_trip() {
        logger();

        let mut tree = sample_tree(Endianness::Big);
        tree.insert(
            IfdGroup::_1,
            Entry {
                tag: 0x0103,
                ty: PrimitiveTy::Short,
                count: 1,
                data: vec![0, 6],
            },
        );
        tree.set_thumbnail(Some(vec![0xFF, 0xD8, 0xFF, 0xD9, 0x00]));

        let bytes = TiffCodec.encode(&tree, RelocationDelta::ZERO, None).unwrap();
        let decoded = TiffCodec.decode(&bytes, full()).unwrap();
        assert_eq!(decoded.tree.thumbnail(), Some([0xFF, 0xD8, 0xFF, 0xD9, 0x00].as_slice()));
        assert_eq!(decoded.tree, tree);

        // without following IFD 1, neither the IFD nor the thumbnail show up
        let decoded = TiffCodec.decode(&bytes, DecodeOptions::default()).unwrap();
        assert!(decoded.tree.entries(IfdGroup::_1).is_empty());
        assert_eq!(decoded.tree.thumbnail(), None);
    }

    #[test]
    fn delta_shifts_every_offset() {
        logger();

        let tree = sample_tree(Endianness::Little);
        let plain = TiffCodec.encode(&tree, RelocationDelta::ZERO, None).unwrap();

        let delta = RelocationDelta::for_write_position(100, 1000).unwrap();
        assert_eq!(delta.get(), 92);
        let moved = TiffCodec.encode(&tree, delta, Some(0)).unwrap();
        assert_eq!(plain.len(), moved.len());

        // pretend the IFDs were written at byte 100 of a bigger file
        let mut file = vec![0_u8; 100];
        file[..8].copy_from_slice(&moved[..8]);
        file.extend_from_slice(&moved[8..]);

        let decoded = TiffCodec.decode(&file, full()).unwrap();
        assert_eq!(decoded.tree, tree);
        assert_eq!(decoded.max_addr_read as usize, file.len());
    }

    #[test]
    fn next_ifd_override_is_written_as_is() {
        logger();

        let tree = sample_tree(Endianness::Big);
        let bytes = TiffCodec
            .encode(&tree, RelocationDelta::ZERO, Some(0xABCD))
            .unwrap();

        // IFD 0 is at 8. skip its count + entries to find the link
        let count = u16::from_be_bytes([bytes[8], bytes[9]]) as usize;
        let link_at = 8 + 2 + 12 * count;
        assert_eq!(&bytes[link_at..link_at + 4], &0xABCD_u32.to_be_bytes());
    }

    #[test]
    fn bad_inputs_fail() {
        logger();

        assert_eq!(
            TiffCodec.decode(b"I", full()),
            Err(CodecError::NoByteOrderMarker)
        );
        assert_eq!(
            TiffCodec.decode(b"XX*\0\x08\0\0\0", full()),
            Err(CodecError::WeirdByteOrderMarker { found: *b"XX" })
        );
        assert_eq!(
            TiffCodec.decode(b"II+\0\x08\0\0\0", full()),
            Err(CodecError::MagicNumberWasntTiff { found: 0x2B })
        );
        assert!(matches!(
            TiffCodec.decode(b"II*\0\x40\0\0\0", full()),
            Err(CodecError::IfdOutOfBounds { .. })
        ));
    }

    #[test]
    fn loops_and_ceiling_are_enforced() {
        logger();

        // IFD 0 at 8 with one entry: an Exif pointer back to 8
        let mut looped: Vec<u8> = b"II*\0\x08\0\0\0".to_vec();
        looped.extend_from_slice(&1_u16.to_le_bytes());
        looped.extend_from_slice(&0x8769_u16.to_le_bytes());
        looped.extend_from_slice(&4_u16.to_le_bytes());
        looped.extend_from_slice(&1_u32.to_le_bytes());
        looped.extend_from_slice(&8_u32.to_le_bytes());
        looped.extend_from_slice(&0_u32.to_le_bytes());
        assert!(matches!(
            TiffCodec.decode(&looped, full()),
            Err(CodecError::IfdLoop { .. })
        ));

        // a valid blob can't be read past the ceiling
        let bytes = TiffCodec
            .encode(&sample_tree(Endianness::Big), RelocationDelta::ZERO, None)
            .unwrap();
        let capped = DecodeOptions {
            max_addr: Some(bytes.len() as u32 - 1),
            ..full()
        };
        assert!(TiffCodec.decode(&bytes, capped).is_err());
    }

    /// IFD 0 at 8 with `entries` UNDEFINED tags, all pointing at the same
    /// 64-byte region after the IFD.
    fn shared_region(entries: u16) -> Vec<u8> {
        let region_at: u32 = 8 + 2 + 12 * entries as u32 + 4;
        let mut v: Vec<u8> = b"II*\0\x08\0\0\0".to_vec();
        v.extend_from_slice(&entries.to_le_bytes());
        for i in 0..entries {
            v.extend_from_slice(&(0xC000 + i).to_le_bytes());
            v.extend_from_slice(&7_u16.to_le_bytes());
            v.extend_from_slice(&64_u32.to_le_bytes());
            v.extend_from_slice(&region_at.to_le_bytes());
        }
        v.extend_from_slice(&0_u32.to_le_bytes());
        v.extend((0..64_u8).collect::<Vec<_>>());
        v
    }

    #[test]
    fn overlapping_values_cant_outgrow_the_blob() {
        logger();

        let one = TiffCodec.decode(&shared_region(1), full()).unwrap();
        assert_eq!(one.tree.entries(IfdGroup::_0).len(), 1);

        let many = shared_region(200);
        let e = TiffCodec.decode(&many, full()).unwrap_err();
        assert!(matches!(
            e,
            CodecError::ValueBudgetExceeded { budget, .. } if budget == many.len()
        ));
        assert_eq!(e.code(), crate::error::ErrorCode::ExifDecodeFailed);
    }
}
