//! Marker segment scanning.

use winnow::{
    Parser as _,
    binary::{be_u16, u8},
    error::EmptyError,
    token::{take, take_till, take_while},
};

use super::JpegError;

/// The first marker code, `SOI` (start of image).
pub const SOI_MARKER_CODE: u8 = 0xD8;

/// The last marker code, `EOI` (end of image).
pub const EOI_MARKER_CODE: u8 = 0xD9;

/// The start of scan code, `SOS`.
pub const SOS_MARKER_CODE: u8 = 0xDA;

/// `APP0`, which holds JFIF (or JFXX) headers.
pub const APP0_MARKER_CODE: u8 = 0xE0;

/// A marker code indicating that an APP1 marker is present.
pub const APP1_MARKER_CODE: u8 = 0xE1;

/// One marker segment, borrowed from the file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment<'a> {
    /// An identifier for a marker.
    pub marker_code: u8,

    /// The payload, without the two length bytes.
    ///
    /// Empty for markers without a length.
    pub payload: &'a [u8],

    /// Where this segment ends in the file.
    pub end: usize,
}

/// Whether a marker is followed by a length field.
///
/// `RST0` through `RST7`, `SOI`, and `EOI` stand alone.
pub const fn has_length(marker_code: u8) -> bool {
    !matches!(marker_code, 0xD0..=0xD9)
}

/// Skips to the next `0xFF`, then past any `0xFF` fill bytes, and returns the
/// marker code after them.
///
/// Returns `None` when the data runs out first.
pub fn find_next_marker(input: &mut &[u8]) -> Option<u8> {
    take_till::<_, _, EmptyError>(0.., 0xFF_u8)
        .void()
        .parse_next(input)
        .ok()?;
    take_while::<_, _, EmptyError>(1.., 0xFF_u8)
        .void()
        .parse_next(input)
        .ok()?;
    u8::<_, EmptyError>.parse_next(input).ok()
}

/// Walks the marker segments of a JPEG file.
pub struct Scanner<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    /// Starts a scan. The data must begin with `SOI`.
    pub fn new(data: &'a [u8]) -> Result<Self, JpegError> {
        if !data.starts_with(&[0xFF, SOI_MARKER_CODE]) {
            log::error!("The first marker of a JPEG file should be `SOI`, but it wasn't!");
            return Err(JpegError::FirstMarkerWasNotSoi);
        }
        Ok(Self { data, pos: 0 })
    }

    /// Everything after the current position.
    pub fn rest(&self) -> &'a [u8] {
        self.data.get(self.pos..).unwrap_or_default()
    }

    /// Reads the next segment, or `None` if no marker is left.
    pub fn next_segment(&mut self) -> Result<Option<Segment<'a>>, JpegError> {
        let input: &mut &'a [u8] = &mut self.rest();

        let Some(marker_code) = find_next_marker(input) else {
            log::trace!("No more markers.");
            self.pos = self.data.len();
            return Ok(None);
        };

        if !has_length(marker_code) {
            self.pos = self.data.len() - input.len();
            log::trace!("Got standalone marker `{marker_code:#04x}`.");
            return Ok(Some(Segment {
                marker_code,
                payload: &[],
                end: self.pos,
            }));
        }

        let original_len: u16 = be_u16.parse_next(input).map_err(|_: EmptyError| {
            log::error!("Failed to find `u16` length byte pair when parsing marker.");
            JpegError::NoLength { marker_code }
        })?;

        let len: u16 = original_len.checked_sub(2).ok_or_else(|| {
            log::error!("Marker `{marker_code:#04x}` has a length below two: `{original_len}`");
            JpegError::BadLength {
                marker_code,
                original_len,
            }
        })?;

        let remaining_input_len: u64 = input.len() as u64;
        let payload: &'a [u8] =
            take(len as usize)
                .parse_next(input)
                .map_err(|_: EmptyError| {
                    log::error!(
                        "Attempted to parse payload from JPEG marker, \
                        but ran out of data. \
                        marker code: `{marker_code:#04x}`, len: `{original_len}` bytes, \
                        remaining input len: `{remaining_input_len}` bytes"
                    );
                    JpegError::NoDataForPayload {
                        marker_code,
                        original_len,
                        remaining_input_len,
                    }
                })?;

        self.pos = self.data.len() - input.len();
        log::trace!("Got marker `{marker_code:#04x}` with `{len}` byte payload.");
        Ok(Some(Segment {
            marker_code,
            payload,
            end: self.pos,
        }))
    }
}
