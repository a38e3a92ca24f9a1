//! Errors shared across the whole crate.
//!
//! Each component has its own error enum (see the `error` module next to
//! it). They all map onto one symbolic [`ErrorCode`] so callers can react to
//! a failure without matching on every component's variants.

use std::sync::Arc;

use crate::{
    codec::error::CodecError,
    converter::error::ConvertError,
    factory::ContainerKind,
    providers::{jpeg::JpegError, png::PngError, tiff::TiffError},
};

/// A symbolic error code.
///
/// The numeric values are stable and distinct, so they're safe to hand
/// across an FFI boundary or to log.
#[repr(u32)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum ErrorCode {
    /// The container's bytes don't have the expected shape.
    SourceDataInvalid = 1,

    /// The container ended before a structure it announced.
    SourceDataIncomplete = 2,

    /// The Exif codec couldn't make sense of the TIFF structure.
    ExifDecodeFailed = 3,

    /// The container or operation isn't supported.
    ExifUnsupportedFormat = 4,

    /// A value parsed fine, but isn't one the tag allows.
    ValueOutOfRange = 5,

    /// A value didn't match any format the tag accepts, or the tag can't be
    /// written at all.
    ValueFormatUnsupported = 6,

    /// Writing the rewritten container failed.
    WriteFailed = 7,
}

impl ErrorCode {
    /// The numeric value of this code.
    ///
    /// ```
    /// use exif_container::error::ErrorCode;
    ///
    /// assert_eq!(ErrorCode::SourceDataInvalid.value(), 1);
    /// assert_eq!(ErrorCode::WriteFailed.value(), 7);
    /// ```
    pub const fn value(self) -> u32 {
        self as u32
    }
}

impl core::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            ErrorCode::SourceDataInvalid => "SourceDataInvalid",
            ErrorCode::SourceDataIncomplete => "SourceDataIncomplete",
            ErrorCode::ExifDecodeFailed => "ExifDecodeFailed",
            ErrorCode::ExifUnsupportedFormat => "ExifUnsupportedFormat",
            ErrorCode::ValueOutOfRange => "ValueOutOfRange",
            ErrorCode::ValueFormatUnsupported => "ValueFormatUnsupported",
            ErrorCode::WriteFailed => "WriteFailed",
        };
        f.write_str(name)
    }
}

/// An error from a [`ContainerHandle`](crate::handle::ContainerHandle) or the
/// [`AccessorFactory`](crate::factory::AccessorFactory).
#[derive(Clone, Debug)]
pub enum AccessorError {
    /// The stream didn't start with the magic number of any supported
    /// container.
    UnknownContainer,

    /// The container was found, but it holds no Exif.
    ///
    /// This isn't corruption. Callers may want to create Exif from scratch
    /// with [`create_exif_data`](crate::handle::ContainerHandle::create_exif_data).
    ExifNotFound,

    /// The handle has no tag tree yet, so there's nothing to write or edit.
    ///
    /// Call `read` or `create_exif_data` first.
    NoTagTree,

    /// The key passes the converter, but the tag tree can't hold it.
    ///
    /// This is the case for writable maker note keys.
    NotStorable { key: String },

    /// This container doesn't support the requested operation.
    Unsupported {
        kind: ContainerKind,
        operation: &'static str,
    },

    /// Reading from the stream failed.
    Read(Arc<std::io::Error>),

    /// Writing to the stream failed.
    Write(Arc<std::io::Error>),

    Jpeg(JpegError),
    Png(PngError),
    Tiff(TiffError),
    Codec(CodecError),
    Convert(ConvertError),
}

impl AccessorError {
    /// The symbolic code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            AccessorError::UnknownContainer | AccessorError::Unsupported { .. } => {
                ErrorCode::ExifUnsupportedFormat
            }
            AccessorError::ExifNotFound => ErrorCode::SourceDataInvalid,
            AccessorError::NoTagTree => ErrorCode::ExifDecodeFailed,
            AccessorError::NotStorable { .. } => ErrorCode::ValueFormatUnsupported,
            AccessorError::Read(_) => ErrorCode::SourceDataIncomplete,
            AccessorError::Write(_) => ErrorCode::WriteFailed,
            AccessorError::Jpeg(e) => e.code(),
            AccessorError::Png(e) => e.code(),
            AccessorError::Tiff(e) => e.code(),
            AccessorError::Codec(e) => e.code(),
            AccessorError::Convert(e) => e.code(),
        }
    }
}

impl core::fmt::Display for AccessorError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AccessorError::UnknownContainer => f.write_str(
                "The stream doesn't start with a JPEG, PNG, or TIFF magic number.",
            ),
            AccessorError::ExifNotFound => f.write_str("The container holds no Exif metadata."),
            AccessorError::NoTagTree => f.write_str(
                "No Exif tag tree is loaded. \
                Read the container or create empty Exif data first.",
            ),
            AccessorError::NotStorable { key } => write!(
                f,
                "`{key}` can be validated, but the Exif tag tree has nowhere to store it."
            ),
            AccessorError::Unsupported { kind, operation } => {
                write!(f, "`{operation}` isn't supported for {kind:?} containers.")
            }
            AccessorError::Read(e) => write!(f, "Failed to read from the stream. err: {e}"),
            AccessorError::Write(e) => write!(f, "Failed to write to the stream. err: {e}"),
            AccessorError::Jpeg(e) => write!(f, "JPEG error: {e}"),
            AccessorError::Png(e) => write!(f, "PNG error: {e}"),
            AccessorError::Tiff(e) => write!(f, "TIFF error: {e}"),
            AccessorError::Codec(e) => write!(f, "Exif codec error: {e}"),
            AccessorError::Convert(e) => write!(f, "Value conversion error: {e}"),
        }
    }
}

impl core::error::Error for AccessorError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            AccessorError::Read(e) | AccessorError::Write(e) => Some(e.as_ref()),
            AccessorError::Jpeg(e) => Some(e),
            AccessorError::Png(e) => Some(e),
            AccessorError::Tiff(e) => Some(e),
            AccessorError::Codec(e) => Some(e),
            AccessorError::Convert(e) => Some(e),
            AccessorError::UnknownContainer
            | AccessorError::ExifNotFound
            | AccessorError::NoTagTree
            | AccessorError::NotStorable { .. }
            | AccessorError::Unsupported { .. } => None,
        }
    }
}

impl From<JpegError> for AccessorError {
    fn from(value: JpegError) -> Self {
        AccessorError::Jpeg(value)
    }
}

impl From<PngError> for AccessorError {
    fn from(value: PngError) -> Self {
        AccessorError::Png(value)
    }
}

impl From<TiffError> for AccessorError {
    fn from(value: TiffError) -> Self {
        AccessorError::Tiff(value)
    }
}

impl From<CodecError> for AccessorError {
    fn from(value: CodecError) -> Self {
        AccessorError::Codec(value)
    }
}

impl From<ConvertError> for AccessorError {
    fn from(value: ConvertError) -> Self {
        AccessorError::Convert(value)
    }
}
