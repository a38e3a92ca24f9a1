use exif_container_types::exif::Endianness;

use crate::{codec::error::CodecError, error::ErrorCode};

/// An error while reading or rewriting a TIFF (or DNG) file.
#[derive(Clone, Debug, PartialEq, PartialOrd, Hash)]
pub enum TiffError {
    /// No `II*\0` or `MM\0*` header was found.
    NoTiffHeader,

    /// A structural read went past the end of the file.
    OffsetOutOfBounds {
        /// What was being read.
        what: &'static str,

        /// Where, relative to the TIFF header.
        offset: u64,
    },

    /// The tag tree uses a different byte order than the file.
    ByteOrderMismatch { file: Endianness, tree: Endianness },

    /// The chosen write position can't be expressed as a relocation.
    DeltaInvalid { write_pos: u64, stream_len: u64 },

    /// The codec produced something that isn't a TIFF structure.
    EncodedTooShort { len: usize },

    Codec(CodecError),
}

impl TiffError {
    pub fn code(&self) -> ErrorCode {
        match self {
            TiffError::NoTiffHeader | TiffError::OffsetOutOfBounds { .. } => {
                ErrorCode::SourceDataInvalid
            }
            TiffError::ByteOrderMismatch { .. }
            | TiffError::DeltaInvalid { .. }
            | TiffError::EncodedTooShort { .. } => ErrorCode::WriteFailed,
            TiffError::Codec(e) => e.code(),
        }
    }
}

impl core::fmt::Display for TiffError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TiffError::NoTiffHeader => f.write_str("The file has no TIFF header."),
            TiffError::OffsetOutOfBounds { what, offset } => {
                write!(f, "Reading the {what} at `{offset}` went past the end of the file.")
            }
            TiffError::ByteOrderMismatch { file, tree } => write!(
                f,
                "The file is `{file:?}`, but the tag tree is `{tree:?}`."
            ),
            TiffError::DeltaInvalid {
                write_pos,
                stream_len,
            } => write!(
                f,
                "Can't relocate IFDs to `{write_pos}` in a `{stream_len}` byte file."
            ),
            TiffError::EncodedTooShort { len } => {
                write!(f, "The encoded TIFF structure was only `{len}` bytes.")
            }
            TiffError::Codec(e) => e.fmt(f),
        }
    }
}

impl core::error::Error for TiffError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            TiffError::Codec(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CodecError> for TiffError {
    fn from(value: CodecError) -> Self {
        TiffError::Codec(value)
    }
}
