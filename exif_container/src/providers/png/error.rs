use crate::error::ErrorCode;

/// An error while scanning a PNG file.
#[derive(Clone, Debug, PartialEq, PartialOrd, Hash)]
pub enum PngError {
    /// The file doesn't start with the PNG signature.
    NoSignature,

    /// The file ended partway through a chunk's length and type.
    TruncatedChunkHead {
        /// Where the chunk started.
        offset: usize,
    },

    /// A chunk claims more data than the file has left.
    ChunkTooLong {
        kind: [u8; 4],
        len: u32,
        remaining: usize,
    },

    /// PNG containers are read-only.
    WriteUnsupported,
}

impl PngError {
    pub fn code(&self) -> ErrorCode {
        match self {
            PngError::NoSignature | PngError::ChunkTooLong { .. } => ErrorCode::SourceDataInvalid,
            PngError::TruncatedChunkHead { .. } => ErrorCode::SourceDataIncomplete,
            PngError::WriteUnsupported => ErrorCode::ExifUnsupportedFormat,
        }
    }
}

impl core::fmt::Display for PngError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PngError::NoSignature => f.write_str("The file doesn't start with the PNG signature."),
            PngError::TruncatedChunkHead { offset } => write!(
                f,
                "The file ended inside the chunk head at offset `{offset}`."
            ),
            PngError::ChunkTooLong {
                kind,
                len,
                remaining,
            } => write!(
                f,
                "Chunk `{}` claims `{len}` bytes (plus CRC), but only `{remaining}` remain.",
                String::from_utf8_lossy(kind)
            ),
            PngError::WriteUnsupported => {
                f.write_str("Writing Exif into PNG files isn't supported.")
            }
        }
    }
}

impl core::error::Error for PngError {}

/// Why a text chunk couldn't give up its Exif.
///
/// These never stop a scan. The chunk is skipped and the next one is tried.
#[derive(Clone, Debug, PartialEq, PartialOrd, Hash)]
pub enum TextError {
    /// The keyword wasn't NUL-terminated.
    NoKeyword,

    /// The compression flag or method byte is missing or unknown.
    BadCompression,

    /// An `iTXt` chunk is missing its language tag or translated keyword.
    NoLanguageTag,

    /// The zlib stream was corrupt.
    Inflate(String),

    /// The text inflated to more than the configured cap.
    InflateTooLarge { cap: usize },

    /// The raw profile text is too short to hold a header.
    ProfileTooShort,

    /// The raw profile's byte count was missing, zero, or larger than the
    /// text.
    ProfileBadLength,

    /// The hex digits ran out (or hit a NUL) before the byte count was met.
    ProfileTruncated { expected: usize, got: usize },

    /// The decoded profile had no `Exif\0\0` identifier.
    NoExifIdentifier,
}

impl core::fmt::Display for TextError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TextError::NoKeyword => f.write_str("Text chunk keyword isn't NUL-terminated."),
            TextError::BadCompression => f.write_str("Text chunk compression flags are invalid."),
            TextError::NoLanguageTag => {
                f.write_str("`iTXt` chunk is missing its language tag or translated keyword.")
            }
            TextError::Inflate(e) => write!(f, "Failed to inflate text. err: {e}"),
            TextError::InflateTooLarge { cap } => {
                write!(f, "Text inflated to more than `{cap}` bytes.")
            }
            TextError::ProfileTooShort => f.write_str("Raw profile text is too short."),
            TextError::ProfileBadLength => f.write_str("Raw profile byte count is invalid."),
            TextError::ProfileTruncated { expected, got } => write!(
                f,
                "Raw profile ended early. expected: `{expected}` bytes, got: `{got}` bytes"
            ),
            TextError::NoExifIdentifier => {
                f.write_str("Decoded raw profile has no `Exif\\0\\0` identifier.")
            }
        }
    }
}

impl core::error::Error for TextError {}
