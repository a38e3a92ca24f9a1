use crate::error::ErrorCode;

#[derive(Clone, Debug, PartialEq, PartialOrd, Hash)]
pub enum JpegError {
    /// A JPEG file must start with `SOI` (`FF D8`).
    FirstMarkerWasNotSoi,

    /// A marker segment's length was below `2`, which can't even cover the
    /// length bytes themselves.
    BadLength {
        /// The afflicted marker's marker code.
        marker_code: u8,

        /// The length as written, including the two length bytes.
        original_len: u16,
    },

    /// The file ended before a marker's length field.
    NoLength {
        /// The marker code for which the length was not found.
        marker_code: u8,
    },

    /// Not enough data for a marker segment's payload.
    NoDataForPayload {
        /// The afflicted marker's marker code.
        marker_code: u8,

        /// Its original length, including the marker length bytes.
        original_len: u16,

        /// The remaining length in the input, as of parsing.
        remaining_input_len: u64,
    },

    /// The Exif blob is too big for one APP1 segment.
    PayloadTooLarge {
        /// The blob's length.
        len: usize,

        /// The largest length allowed.
        max: usize,
    },
}

impl JpegError {
    pub fn code(&self) -> ErrorCode {
        match self {
            JpegError::FirstMarkerWasNotSoi | JpegError::BadLength { .. } => {
                ErrorCode::SourceDataInvalid
            }
            JpegError::NoLength { .. } | JpegError::NoDataForPayload { .. } => {
                ErrorCode::SourceDataIncomplete
            }
            JpegError::PayloadTooLarge { .. } => ErrorCode::WriteFailed,
        }
    }
}

impl core::fmt::Display for JpegError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::FirstMarkerWasNotSoi => {
                f.write_str("A JPEG file's first marker should be SOI (`0xD8`), but it wasn't.")
            }

            Self::BadLength {
                marker_code,
                original_len,
            } => write!(
                f,
                "JPEG marker segment with code `{marker_code:#04x}` had \
                a length below `2`: `{original_len}`"
            ),

            Self::NoLength { marker_code } => write!(
                f,
                "JPEG marker segment with code `{marker_code:#04x}` had no length. \
                (out of data!)",
            ),

            Self::NoDataForPayload {
                marker_code,
                original_len,
                remaining_input_len,
            } => write!(
                f,
                "Not enough data left in input for payload. \
                marker code: `{marker_code:#04x}`, \
                len: `{original_len}` bytes, \
                remaining input len: `{remaining_input_len}` bytes"
            ),

            Self::PayloadTooLarge { len, max } => write!(
                f,
                "Exif blob is too large for an APP1 segment. \
                len: `{len}` bytes, max: `{max}` bytes"
            ),
        }
    }
}

impl core::error::Error for JpegError {}
