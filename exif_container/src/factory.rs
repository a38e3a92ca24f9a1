//! Opens streams without knowing their container type beforehand.
//!
//! The factory reads a stream's first few bytes, compares them against each
//! container's magic number, and hands back a
//! [`ContainerHandle`] wired to the matching engine.
//!
//! # Usage
//!
//! ```
//! use std::io::Cursor;
//!
//! use exif_container::factory::{AccessorFactory, ContainerKind};
//!
//! let jpeg: Vec<u8> = vec![0xFF, 0xD8, 0xFF, 0xD9];
//! let handle = AccessorFactory::new().open(Cursor::new(jpeg)).unwrap();
//! assert_eq!(handle.kind(), ContainerKind::Jpeg);
//!
//! let junk: Vec<u8> = b"GIF89a".to_vec();
//! assert!(AccessorFactory::new().open(Cursor::new(junk)).is_err());
//! ```

use std::{
    io::{Read, SeekFrom},
    sync::Arc,
};

use exif_container_types::exif::Endianness;

use crate::{
    codec::{ExifCodec, TiffCodec},
    config::Limits,
    error::AccessorError,
    handle::ContainerHandle,
    providers::png::SIGNATURE as PNG_SIGNATURE,
    stream::MetadataStream,
};

/// The longest magic number we compare against.
const SNIFF_LEN: u64 = 8;

fn is_jpeg(input: &[u8]) -> bool {
    input.starts_with(&[0xFF, 0xD8, 0xFF])
}

fn is_png(input: &[u8]) -> bool {
    input.starts_with(&PNG_SIGNATURE)
}

fn is_tiff(input: &[u8]) -> bool {
    [Endianness::Little, Endianness::Big]
        .iter()
        .any(|e| input.starts_with(&e.tiff_header()))
}

/// Generates [`ContainerKind`] and its sniffer.
///
/// Each variant is checked in the order it's listed.
macro_rules! generate {
    ( $(
        // name of the container kind
        $variant:ident => {
            // returns `true` if the input starts with this kind's magic number
            magic: $check:path
        },
    )+) => {
        /// A container kind with an engine in this crate.
        #[repr(u16)]
        #[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Eq, Ord, Hash)]
        pub enum ContainerKind {
            $($variant,)+
        }

        impl ContainerKind {
            /// Every kind, in sniffing order.
            pub const ALL: &'static [ContainerKind] = &[$(ContainerKind::$variant,)+];

            /// Finds the container kind from a stream's leading bytes.
            ///
            /// Only the first eight bytes matter.
            pub fn sniff(input: &[u8]) -> Option<Self> {
                $(
                    ::log::trace!("Checking for `{}` magic number...", stringify!($variant));
                    if $check(input) {
                        return Some(ContainerKind::$variant);
                    }
                )+

                ::log::trace!("No magic number matched.");
                None
            }
        }
    };
}

generate!(
    Jpeg => { magic: is_jpeg },
    Png => { magic: is_png },
    Tiff => { magic: is_tiff },
);

/// Sniffs streams and opens a [`ContainerHandle`] for them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AccessorFactory {
    limits: Limits,
}

impl AccessorFactory {
    /// A factory with the default [`Limits`].
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory whose handles use `limits`.
    pub fn with_limits(limits: Limits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Opens `stream` with the default codec.
    pub fn open<S: MetadataStream>(
        &self,
        stream: S,
    ) -> Result<ContainerHandle<S, TiffCodec>, AccessorError> {
        self.open_with_codec(stream, TiffCodec)
    }

    /// Opens `stream`, decoding and encoding its Exif with `codec`.
    ///
    /// The stream is rewound to its start afterwards.
    pub fn open_with_codec<S: MetadataStream, C: ExifCodec>(
        &self,
        mut stream: S,
        codec: C,
    ) -> Result<ContainerHandle<S, C>, AccessorError> {
        let head: Vec<u8> = read_head(&mut stream).inspect_err(|e| {
            log::error!("Failed to read the stream's magic number! err: {e}");
        })?;

        let Some(kind) = ContainerKind::sniff(&head) else {
            log::error!("Unknown container. Leading bytes: `{head:02x?}`");
            return Err(AccessorError::UnknownContainer);
        };

        log::debug!("Opened a `{kind:?}` container.");
        Ok(ContainerHandle::new(stream, kind, codec, self.limits))
    }
}

/// Reads up to [`SNIFF_LEN`] bytes from the start, then rewinds.
fn read_head<S: MetadataStream>(stream: &mut S) -> Result<Vec<u8>, AccessorError> {
    let read_err = |e: std::io::Error| AccessorError::Read(Arc::new(e));

    let mut head: Vec<u8> = Vec::with_capacity(SNIFF_LEN as usize);
    stream.seek(SeekFrom::Start(0)).map_err(read_err)?;
    Read::take(&mut *stream, SNIFF_LEN)
        .read_to_end(&mut head)
        .map_err(read_err)?;
    stream.seek(SeekFrom::Start(0)).map_err(read_err)?;
    Ok(head)
}
