//! Finds where the TIFF structure starts inside an Exif payload.
//!
//! Containers wrap Exif differently. JPEG and PNG text chunks put an
//! `Exif\0\0` identifier before it, PNG's `eXIf` chunk doesn't, and DNG files
//! simply *are* TIFF. These helpers find the TIFF header no matter what comes
//! before it.

use winnow::{Parser as _, error::EmptyError, token::take_until};

use exif_container_types::exif::Endianness;

/// The identifier that comes before TIFF data in JPEG APP1 segments.
pub const EXIF_IDENTIFIER: &[u8; 6] = b"Exif\0\0";

/// A TIFF header found in a payload.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct TiffHeader {
    /// Where the byte order marker starts.
    pub offset: usize,

    /// The byte order the marker announced.
    pub endianness: Endianness,
}

/// Scans `data` for the first TIFF header (`II*\0` or `MM\0*`).
///
/// ```
/// use exif_container::locator::find_tiff_header;
/// use exif_container_types::exif::Endianness;
///
/// let header = find_tiff_header(b"Exif\0\0MM\0*\0\0\0\x08").unwrap();
/// assert_eq!(header.offset, 6);
/// assert_eq!(header.endianness, Endianness::Big);
///
/// assert!(find_tiff_header(b"no tiff here").is_none());
/// ```
pub fn find_tiff_header(data: &[u8]) -> Option<TiffHeader> {
    let found = data.windows(4).enumerate().find_map(|(offset, w)| {
        [Endianness::Little, Endianness::Big]
            .into_iter()
            .find(|e| w == e.tiff_header())
            .map(|endianness| TiffHeader { offset, endianness })
    });

    match found {
        Some(h) => log::trace!("Found TIFF header at `{}` ({:?}).", h.offset, h.endianness),
        None => log::debug!("No TIFF header in `{}` bytes.", data.len()),
    }
    found
}

/// Finds the offset of the `Exif\0\0` identifier in `data`.
pub fn find_exif_identifier(data: &[u8]) -> Option<usize> {
    let input = &mut &*data;
    take_until::<_, _, EmptyError>(0.., EXIF_IDENTIFIER.as_slice())
        .parse_next(input)
        .ok()
        .map(|skipped: &[u8]| skipped.len())
}

/// Returns the TIFF portion of an Exif payload.
///
/// The payload may start with the `Exif\0\0` identifier (or any other junk);
/// everything before the TIFF header is dropped.
pub fn tiff_slice(payload: &[u8]) -> Option<(&[u8], Endianness)> {
    let header = find_tiff_header(payload)?;
    Some((&payload[header.offset..], header.endianness))
}
