//! Decodes Exif hidden in PNG text chunks.
//!
//! Before PNG had an `eXIf` chunk, ImageMagick (and tools that copied it)
//! stored Exif as a "raw profile": a text chunk with the keyword
//! `Raw profile type exif` (or `... APP1`) whose text looks like this:
//!
//! ```text
//! \nexif\n      58\n457869660000...\n
//! ```
//!
//! That's a newline, the profile name, a newline, a padded decimal byte
//! count, a newline, then that many bytes as hex (wrapped every so often).

use std::io::Read as _;

use flate2::read::ZlibDecoder;
use winnow::{
    Parser as _,
    ascii::digit1,
    binary::u8,
    error::EmptyError,
    token::{take, take_till, take_while},
};

use super::TextError;
use crate::config::Limits;

/// Keywords whose text is a raw Exif profile.
pub const RAW_PROFILE_KEYWORDS: &[&[u8]] = &[b"Raw profile type exif", b"Raw profile type APP1"];

/// Which kind of text chunk is being decoded.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum TextKind {
    /// `tEXt`: plain Latin-1 text.
    Plain,

    /// `zTXt`: zlib-compressed text.
    Compressed,

    /// `iTXt`: UTF-8 text, optionally compressed, with a language tag.
    International,
}

impl TextKind {
    pub fn from_chunk_kind(kind: &[u8; 4]) -> Option<Self> {
        match kind {
            b"tEXt" => Some(TextKind::Plain),
            b"zTXt" => Some(TextKind::Compressed),
            b"iTXt" => Some(TextKind::International),
            _ => None,
        }
    }
}

/// Decodes a text chunk's raw profile.
///
/// Returns `Ok(None)` if the chunk's keyword isn't a raw Exif profile;
/// those chunks aren't ours to read.
pub fn parse_text_chunk(
    kind: TextKind,
    data: &[u8],
    limits: &Limits,
) -> Result<Option<Vec<u8>>, TextError> {
    let input = &mut &*data;

    let keyword: &[u8] = nul_terminated(input).ok_or_else(|| {
        log::warn!("Text chunk has no NUL after its keyword.");
        TextError::NoKeyword
    })?;
    if !RAW_PROFILE_KEYWORDS.contains(&keyword) {
        log::debug!(
            "Ignoring text chunk with keyword `{}`.",
            String::from_utf8_lossy(keyword)
        );
        return Ok(None);
    }

    let inflated: Vec<u8>;
    let text: &[u8] = match kind {
        TextKind::Plain => *input,

        TextKind::Compressed => {
            let method: u8 = u8::<_, EmptyError>
                .parse_next(input)
                .map_err(|_| TextError::BadCompression)?;
            if method != 0 {
                log::warn!("`zTXt` uses unknown compression method `{method}`.");
                return Err(TextError::BadCompression);
            }
            inflated = inflate(*input, limits.inflate_cap)?;
            &inflated
        }

        TextKind::International => {
            let flag: u8 = u8::<_, EmptyError>
                .parse_next(input)
                .map_err(|_| TextError::BadCompression)?;
            let method: u8 = u8::<_, EmptyError>
                .parse_next(input)
                .map_err(|_| TextError::BadCompression)?;
            if flag > 1 || (flag == 1 && method != 0) {
                log::warn!("`iTXt` has bad compression flag `{flag}` / method `{method}`.");
                return Err(TextError::BadCompression);
            }

            // language tag, then translated keyword
            nul_terminated(input).ok_or(TextError::NoLanguageTag)?;
            nul_terminated(input).ok_or(TextError::NoLanguageTag)?;

            if flag == 1 {
                inflated = inflate(*input, limits.inflate_cap)?;
                &inflated
            } else {
                *input
            }
        }
    };

    decode_raw_profile(text).map(Some)
}

/// Takes bytes up to a NUL, and the NUL itself.
fn nul_terminated<'a>(input: &mut &'a [u8]) -> Option<&'a [u8]> {
    let s: &'a [u8] = take_till::<_, _, EmptyError>(0.., 0_u8)
        .parse_next(input)
        .ok()?;
    take::<_, _, EmptyError>(1_usize).void().parse_next(input).ok()?;
    Some(s)
}

/// Inflates a zlib stream, refusing to produce more than `cap` bytes.
fn inflate(data: &[u8], cap: usize) -> Result<Vec<u8>, TextError> {
    let mut out: Vec<u8> = Vec::new();
    ZlibDecoder::new(data)
        .take(cap as u64 + 1)
        .read_to_end(&mut out)
        .map_err(|e| {
            log::warn!("Failed to inflate text chunk. err: {e}");
            TextError::Inflate(e.to_string())
        })?;

    if out.len() > cap {
        log::warn!("Text chunk inflates past the `{cap}` byte cap.");
        return Err(TextError::InflateTooLarge { cap });
    }
    Ok(out)
}

/// Turns raw profile text into the bytes it encodes.
///
/// ```
/// use exif_container::providers::png::text::decode_raw_profile;
///
/// let text = b"\nexif\n       4\n45786966\n";
/// assert_eq!(decode_raw_profile(text).unwrap(), b"Exif");
/// ```
pub fn decode_raw_profile(text: &[u8]) -> Result<Vec<u8>, TextError> {
    if text.len() <= 1 {
        return Err(TextError::ProfileTooShort);
    }
    let input = &mut &text[1..];

    // the profile name, then its newline
    take_till::<_, _, EmptyError>(0.., b'\n')
        .void()
        .parse_next(input)
        .map_err(|_| TextError::ProfileTooShort)?;
    take::<_, _, EmptyError>(1_usize)
        .void()
        .parse_next(input)
        .map_err(|_| TextError::ProfileTooShort)?;

    // padding before the byte count
    take_while::<_, _, EmptyError>(0.., (b'\0', b' ', b'\n'))
        .void()
        .parse_next(input)
        .map_err(|_| TextError::ProfileTooShort)?;

    let expected: usize = digit1::<_, EmptyError>
        .parse_next(input)
        .ok()
        .and_then(|d: &[u8]| core::str::from_utf8(d).ok()?.parse().ok())
        .ok_or_else(|| {
            log::warn!("Raw profile has no byte count.");
            TextError::ProfileBadLength
        })?;

    // the character after the count (normally a newline)
    _ = take::<_, _, EmptyError>(1_usize).void().parse_next(input);

    if expected == 0 || expected > text.len() {
        log::warn!("Raw profile byte count `{expected}` is invalid.");
        return Err(TextError::ProfileBadLength);
    }

    let mut out: Vec<u8> = Vec::with_capacity(expected);
    let mut high: Option<u8> = None;
    for &c in input.iter() {
        if out.len() == expected {
            break;
        }
        if c == 0 {
            break;
        }

        // line breaks (and anything else) between digits are skipped
        let Some(nibble) = (c as char).to_digit(16) else {
            continue;
        };
        match high.take() {
            None => high = Some(nibble as u8),
            Some(h) => out.push((h << 4) | nibble as u8),
        }
    }

    if out.len() != expected {
        log::warn!(
            "Raw profile ended early. expected: `{expected}`, got: `{}`",
            out.len()
        );
        return Err(TextError::ProfileTruncated {
            expected,
            got: out.len(),
        });
    }
    Ok(out)
}
