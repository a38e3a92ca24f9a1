use exif_container_types::exif::ifd::IfdGroup;

use crate::error::ErrorCode;

/// Something went wrong while decoding or encoding a TIFF structure.
#[derive(Clone, Debug, PartialEq, PartialOrd, Hash)]
pub enum CodecError {
    /// The input was too short to provide a byte order marker.
    NoByteOrderMarker,

    /// The byte order marker wasn't `II` or `MM`.
    WeirdByteOrderMarker { found: [u8; 2] },

    /// Didn't find the TIFF magic number.
    NoTiffMagicNumber,

    /// The magic number wasn't `42`.
    MagicNumberWasntTiff { found: u16 },

    /// No IFD 0 offset followed the magic number.
    NoTiffHeaderOffset,

    /// An IFD offset pointed outside the data we're allowed to read.
    IfdOutOfBounds { group: IfdGroup, offset: u32 },

    /// An IFD was reached twice. The file's IFD links form a loop.
    IfdLoop { group: IfdGroup, offset: u32 },

    /// An IFD ended before all of its entries could be read.
    IfdTruncated { group: IfdGroup, offset: u32 },

    /// An entry's value lives outside the data we're allowed to read.
    ValueOutOfBounds {
        group: IfdGroup,
        tag: u16,
        offset: u32,
        len: u32,
    },

    /// Entries asked for more out-of-line bytes than the whole blob holds.
    ValueBudgetExceeded {
        group: IfdGroup,
        tag: u16,
        budget: usize,
    },

    /// The caller named a tag that isn't in the tag table.
    UnknownTagName(String),

    /// A value couldn't be turned into the bytes its tag needs.
    ValueNotEncodable {
        tag: &'static str,
        value: String,
    },

    /// The encoded structure doesn't fit in 32-bit offsets.
    TooLarge,
}

impl CodecError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CodecError::UnknownTagName(_) | CodecError::ValueNotEncodable { .. } => {
                ErrorCode::ValueFormatUnsupported
            }
            _ => ErrorCode::ExifDecodeFailed,
        }
    }
}

impl core::fmt::Display for CodecError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CodecError::NoByteOrderMarker => {
                f.write_str("The TIFF data is too short to hold a byte order marker.")
            }
            CodecError::WeirdByteOrderMarker { found } => write!(
                f,
                "The byte order marker should be `II` or `MM`, but was `{found:x?}`."
            ),
            CodecError::NoTiffMagicNumber => f.write_str("Couldn't find the TIFF magic number."),
            CodecError::MagicNumberWasntTiff { found } => {
                write!(f, "Magic number wasn't TIFF's (`42`). got: `{found}`")
            }
            CodecError::NoTiffHeaderOffset => f.write_str("No IFD 0 offset after the TIFF header."),
            CodecError::IfdOutOfBounds { group, offset } => write!(
                f,
                "IFD {group:?} at offset `{offset}` is outside the readable data."
            ),
            CodecError::IfdLoop { group, offset } => write!(
                f,
                "IFD {group:?} at offset `{offset}` was already visited. \
                The IFD links form a loop."
            ),
            CodecError::IfdTruncated { group, offset } => write!(
                f,
                "IFD {group:?} at offset `{offset}` ended before all of its entries."
            ),
            CodecError::ValueOutOfBounds {
                group,
                tag,
                offset,
                len,
            } => write!(
                f,
                "Value of tag `0x{tag:04X}` in IFD {group:?} is outside the readable data. \
                offset: `{offset}`, len: `{len}` bytes"
            ),
            CodecError::ValueBudgetExceeded { group, tag, budget } => write!(
                f,
                "Tag `0x{tag:04X}` in IFD {group:?} pushed the decoded values past \
                the blob's own size (`{budget}` bytes)."
            ),
            CodecError::UnknownTagName(name) => write!(f, "No known Exif tag is named `{name}`."),
            CodecError::ValueNotEncodable { tag, value } => {
                write!(f, "Can't encode `{value}` as a value for `{tag}`.")
            }
            CodecError::TooLarge => f.write_str("The encoded Exif doesn't fit in 32-bit offsets."),
        }
    }
}

impl core::error::Error for CodecError {}
