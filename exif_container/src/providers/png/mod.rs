//! PNG is a lossless image format made of length-prefixed chunks.
//!
//! Exif lives in one of two places:
//!
//! - an `eXIf` chunk, which holds the TIFF structure directly, or
//! - a `tEXt`, `zTXt`, or `iTXt` chunk carrying a hex "raw profile" (see
//!   [`text`]).
//!
//! Only reading is supported.

use std::borrow::Cow;

use crate::{config::Limits, locator::find_exif_identifier};

pub mod chunk;
mod error;
pub mod text;

pub use error::{PngError, TextError};

use chunk::Chunk;
use text::TextKind;

/// Every PNG file starts with these eight bytes.
pub const SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Finds the Exif blob in a PNG file.
///
/// A blob from `eXIf` is borrowed straight from `data` and starts with the
/// TIFF header. A blob decoded from a raw profile starts at its `Exif\0\0`
/// identifier.
///
/// Chunks that fail to decode are skipped. Running out of data between
/// chunks ends the scan without an error.
pub fn read_exif_blob<'a>(
    data: &'a [u8],
    limits: &Limits,
) -> Result<Option<Cow<'a, [u8]>>, PngError> {
    let Some(rest) = data.strip_prefix(SIGNATURE.as_slice()) else {
        log::error!("PNG signature not found.");
        return Err(PngError::NoSignature);
    };

    let input: &mut &'a [u8] = &mut &*rest;
    loop {
        if input.is_empty() {
            log::warn!("PNG ended without an `IEND` chunk.");
            return Ok(None);
        }

        let offset: usize = data.len() - input.len();
        let c: Chunk<'a> = chunk::chunk(input, offset)?;
        log::trace!(
            "Chunk `{}` at `{offset}` with `{}` bytes.",
            String::from_utf8_lossy(&c.kind),
            c.len
        );

        if !c.crc_matches() {
            log::warn!(
                "Chunk `{}` at `{offset}` has a bad CRC. Reading it anyway.",
                String::from_utf8_lossy(&c.kind)
            );
        }

        if &c.kind == b"IEND" {
            log::debug!("Reached `IEND` without finding Exif.");
            return Ok(None);
        }

        if &c.kind == b"eXIf" {
            log::trace!("Found Exif in `eXIf` chunk.");
            return Ok(Some(Cow::Borrowed(c.data)));
        }

        let Some(kind) = TextKind::from_chunk_kind(&c.kind) else {
            continue;
        };

        match blob_from_text(kind, c.data, limits) {
            Ok(Some(blob)) => {
                log::trace!("Found Exif in a raw profile. `{}` bytes", blob.len());
                return Ok(Some(Cow::Owned(blob)));
            }
            Ok(None) => (),
            Err(e) => log::warn!("Skipping unreadable text chunk at `{offset}`. err: {e}"),
        }
    }
}

/// Decodes a text chunk's raw profile and cuts it down to the Exif blob.
fn blob_from_text(
    kind: TextKind,
    data: &[u8],
    limits: &Limits,
) -> Result<Option<Vec<u8>>, TextError> {
    let Some(mut profile) = text::parse_text_chunk(kind, data, limits)? else {
        return Ok(None);
    };

    let start: usize = find_exif_identifier(&profile).ok_or(TextError::NoExifIdentifier)?;
    profile.drain(..start);
    Ok(Some(profile))
}

/// PNG containers are read-only, so this always fails.
pub fn write_exif_blob(_data: &[u8], _blob: &[u8]) -> Result<Vec<u8>, PngError> {
    log::error!("Refusing to write Exif into a PNG.");
    Err(PngError::WriteUnsupported)
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use super::{PngError, SIGNATURE, chunk::build, read_exif_blob, write_exif_blob};
    use crate::{config::Limits, util::logger};

    fn png(chunks: &[Vec<u8>]) -> Vec<u8> {
        let mut v = SIGNATURE.to_vec();
        v.extend_from_slice(&build(b"IHDR", &[0; 13]));
        for c in chunks {
            v.extend_from_slice(c);
        }
        v.extend_from_slice(&build(b"IEND", &[]));
        v
    }

    fn raw_profile(bytes: &[u8]) -> Vec<u8> {
        let mut text = b"Raw profile type exif\0".to_vec();
        text.extend_from_slice(format!("\nexif\n{:>8}\n", bytes.len()).as_bytes());
        for b in bytes {
            text.extend_from_slice(format!("{b:02x}").as_bytes());
        }
        text.push(b'\n');
        text
    }

    #[test]
    fn exif_chunk_is_borrowed() {
        logger();

        let file = png(&[build(b"eXIf", b"MM\0*\0\0\0\x08")]);
        assert_eq!(
            read_exif_blob(&file, &Limits::default()),
            Ok(Some(Cow::Borrowed(b"MM\0*\0\0\0\x08".as_slice())))
        );
    }

    #[test]
    fn raw_profile_is_cut_to_the_identifier() {
        logger();

        // some writers put junk before the identifier
        let file = png(&[
            build(b"tEXt", b"Title\0A cat"),
            build(b"tEXt", &raw_profile(b"\x01\x02Exif\0\0II*\0")),
        ]);
        let blob = read_exif_blob(&file, &Limits::default()).unwrap().unwrap();
        assert_eq!(&*blob, b"Exif\0\0II*\0");
    }

    #[test]
    fn broken_text_chunks_are_skipped() {
        logger();

        let file = png(&[
            build(b"tEXt", &raw_profile(b"no identifier here")),
            build(b"tEXt", b"Raw profile type exif\0\nexif\n 0\n"),
            build(b"eXIf", b"II*\0\x08\0\0\0"),
        ]);
        let blob = read_exif_blob(&file, &Limits::default()).unwrap().unwrap();
        assert_eq!(&*blob, b"II*\0\x08\0\0\0");
    }

    #[test]
    fn bad_crc_is_only_a_warning() {
        logger();

        let mut exif = build(b"eXIf", b"II*\0");
        let last = exif.len() - 1;
        exif[last] ^= 0xFF;

        let file = png(&[exif]);
        assert!(matches!(
            read_exif_blob(&file, &Limits::default()),
            Ok(Some(_))
        ));
    }

    #[test]
    fn missing_exif_and_missing_iend() {
        logger();

        let file = png(&[]);
        assert_eq!(read_exif_blob(&file, &Limits::default()), Ok(None));

        // cut right after IHDR
        let cut = &file[..8 + 25];
        assert_eq!(read_exif_blob(cut, &Limits::default()), Ok(None));
    }

    #[test]
    fn structural_errors() {
        logger();

        assert_eq!(
            read_exif_blob(b"GIF89a", &Limits::default()),
            Err(PngError::NoSignature)
        );

        let mut file = SIGNATURE.to_vec();
        file.extend_from_slice(&[0, 0, 0x10, 0, b't', b'E', b'X', b't', 1, 2]);
        assert!(matches!(
            read_exif_blob(&file, &Limits::default()),
            Err(PngError::ChunkTooLong { .. })
        ));
    }

    #[test]
    fn writing_is_unsupported() {
        logger();

        assert_eq!(
            write_exif_blob(&png(&[]), b"Exif\0\0II*\0"),
            Err(PngError::WriteUnsupported)
        );
    }
}
