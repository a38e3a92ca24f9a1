//! JPEG is an older image format designed with old-school compression in mind.
//!
//! Exif lives in an `APP1` marker segment whose payload starts with
//! `Exif\0\0`. Reading finds that segment. Writing rebuilds the file around a
//! new one, copying every other segment and the compressed scan data as-is.

use crate::{config::Limits, locator::EXIF_IDENTIFIER};

mod error;
mod parse;

pub use error::JpegError;
pub use parse::{Segment, find_next_marker, has_length};

use parse::{
    APP0_MARKER_CODE, APP1_MARKER_CODE, EOI_MARKER_CODE, SOI_MARKER_CODE, SOS_MARKER_CODE,
    Scanner,
};

/// The smallest `APP1` length (as written, length bytes included) that can
/// hold the Exif identifier.
const MIN_EXIF_APP1_LEN: usize = 8;

fn is_exif_app1(segment: &Segment<'_>) -> bool {
    segment.marker_code == APP1_MARKER_CODE
        && segment.payload.len() + 2 >= MIN_EXIF_APP1_LEN
        && segment.payload.starts_with(EXIF_IDENTIFIER)
}

/// Finds the Exif blob in a JPEG file.
///
/// The returned slice starts at the `Exif\0\0` identifier. `Ok(None)` means
/// the scan reached image data (or the end) without finding any Exif.
pub fn read_exif_blob(data: &[u8]) -> Result<Option<&[u8]>, JpegError> {
    let mut scanner = Scanner::new(data)?;

    while let Some(segment) = scanner.next_segment()? {
        match segment.marker_code {
            SOS_MARKER_CODE | EOI_MARKER_CODE => {
                log::debug!("Reached `{:#04x}` without finding Exif.", segment.marker_code);
                return Ok(None);
            }
            _ if is_exif_app1(&segment) => {
                log::trace!("Found Exif in JPEG! `{}` bytes", segment.payload.len());
                return Ok(Some(segment.payload));
            }
            _ => (),
        }
    }

    log::debug!("Ran out of markers without finding Exif.");
    Ok(None)
}

/// Where the rewrite puts the new segment, and which old one it drops.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct InsertPlan {
    /// The new `APP1` goes right before the segment with this index.
    insert_pos: usize,

    /// The first Exif `APP1`, if any. It's the one `read_exif_blob` returns,
    /// so it's the one a write replaces. Later Exif `APP1`s are copied.
    skip_index: Option<usize>,
}

/// First pass: decide where the new Exif goes.
///
/// `SOI` is segment 0. The new `APP1` goes right after the last `APP0` (so
/// JFIF stays first), or right after `SOI` if there's no `APP0`.
fn plan_rewrite(data: &[u8]) -> Result<InsertPlan, JpegError> {
    let mut scanner = Scanner::new(data)?;
    let mut plan = InsertPlan {
        insert_pos: 0,
        skip_index: None,
    };

    let mut index: usize = 0;
    while let Some(segment) = scanner.next_segment()? {
        match segment.marker_code {
            SOS_MARKER_CODE | EOI_MARKER_CODE => break,
            APP0_MARKER_CODE => plan.insert_pos = index + 1,
            _ if is_exif_app1(&segment) && plan.skip_index.is_none() => {
                plan.skip_index = Some(index)
            }
            _ => (),
        }
        index += 1;
    }

    log::debug!("JPEG rewrite plan: {plan:?}");
    Ok(plan)
}

/// Builds the complete `APP1` segment for `blob`.
///
/// The payload limit covers the TIFF bytes only, whether or not `blob`
/// brought its own identifier.
fn app1_segment(blob: &[u8], limits: &Limits) -> Result<Vec<u8>, JpegError> {
    let tiff: &[u8] = blob.strip_prefix(EXIF_IDENTIFIER.as_slice()).unwrap_or(blob);
    let too_large = || {
        log::error!(
            "Exif blob is `{}` bytes, but APP1 fits at most `{}`.",
            tiff.len(),
            limits.jpeg_max_payload
        );
        JpegError::PayloadTooLarge {
            len: tiff.len(),
            max: limits.jpeg_max_payload,
        }
    };

    if tiff.len() > limits.jpeg_max_payload {
        return Err(too_large());
    }
    let len: u16 = u16::try_from(tiff.len() + 2 + EXIF_IDENTIFIER.len()).map_err(|_| too_large())?;

    let mut segment = Vec::with_capacity(len as usize + 2);
    segment.extend_from_slice(&[0xFF, APP1_MARKER_CODE]);
    segment.extend_from_slice(&len.to_be_bytes());
    segment.extend_from_slice(EXIF_IDENTIFIER);
    segment.extend_from_slice(tiff);
    Ok(segment)
}

/// Rebuilds a JPEG file with `blob` as its Exif.
///
/// `blob` may or may not start with `Exif\0\0`. Any existing Exif `APP1` is
/// replaced. Every other segment, plus everything from `SOS` on, is copied
/// unchanged. Fill bytes between segments are dropped.
pub fn write_exif_blob(data: &[u8], blob: &[u8], limits: &Limits) -> Result<Vec<u8>, JpegError> {
    let app1: Vec<u8> = app1_segment(blob, limits)?;
    let plan: InsertPlan = plan_rewrite(data)?;

    let mut out: Vec<u8> = Vec::with_capacity(data.len() + app1.len());
    out.extend_from_slice(&[0xFF, SOI_MARKER_CODE]);

    let mut scanner = Scanner::new(data)?;
    let mut inserted = false;
    let mut index: usize = 0;
    while let Some(segment) = scanner.next_segment()? {
        if index == plan.insert_pos && !inserted {
            out.extend_from_slice(&app1);
            inserted = true;
        }

        let code = segment.marker_code;
        if index == 0 && code == SOI_MARKER_CODE {
            // already written
        } else if Some(index) == plan.skip_index {
            log::trace!("Dropping the old Exif APP1 (segment `{index}`).");
        } else if code == SOS_MARKER_CODE || code == EOI_MARKER_CODE {
            // everything from here on is copied as-is
            let header_len: usize = if has_length(code) { 4 } else { 2 };
            let start: usize = segment.end - segment.payload.len() - header_len;
            log::trace!(
                "Copying `{}` trailing bytes from `{code:#04x}`.",
                data.len() - start
            );
            out.extend_from_slice(&data[start..]);
            break;
        } else {
            out.extend_from_slice(&[0xFF, code]);
            if has_length(code) {
                out.extend_from_slice(&((segment.payload.len() + 2) as u16).to_be_bytes());
                out.extend_from_slice(segment.payload);
            }
        }
        index += 1;
    }

    // files with nothing after their headers still get the segment
    if !inserted {
        out.extend_from_slice(&app1);
    }

    log::debug!(
        "Rewrote JPEG: `{}` bytes -> `{}` bytes.",
        data.len(),
        out.len()
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{InsertPlan, JpegError, plan_rewrite, read_exif_blob, write_exif_blob};
    use crate::{config::Limits, util::logger};

    const SCAN: &[u8] = &[
        0xFF, 0xDA, 0x00, 0x04, 0x01, 0x02, // SOS header
        0x12, 0xFF, 0x00, 0x34, 0xFF, 0xD0, 0x56, // entropy-coded data
        0xFF, 0xD9, // EOI
    ];

    fn segment(code: u8, payload: &[u8]) -> Vec<u8> {
        let mut v = vec![0xFF, code];
        v.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
        v.extend_from_slice(payload);
        v
    }

    fn jpeg(segments: &[Vec<u8>]) -> Vec<u8> {
        let mut v = vec![0xFF, 0xD8];
        for s in segments {
            v.extend_from_slice(s);
        }
        v.extend_from_slice(SCAN);
        v
    }

    fn exif_payload(tiff: &[u8]) -> Vec<u8> {
        let mut v = b"Exif\0\0".to_vec();
        v.extend_from_slice(tiff);
        v
    }

    #[test]
    fn reads_the_first_exif_app1() {
        logger();

        let xmp = segment(0xE1, b"http://ns.adobe.com/xap/1.0/\0<x/>");
        let exif = segment(0xE1, &exif_payload(b"MM\0*\0\0\0\x08"));
        let file = jpeg(&[segment(0xE0, b"JFIF\0"), xmp, exif]);

        assert_eq!(
            read_exif_blob(&file),
            Ok(Some(exif_payload(b"MM\0*\0\0\0\x08").as_slice()))
        );
    }

    #[test]
    fn no_exif_is_not_an_error() {
        logger();

        let file = jpeg(&[segment(0xE0, b"JFIF\0")]);
        assert_eq!(read_exif_blob(&file), Ok(None));

        // an Exif-looking segment after SOS is image data, not metadata
        let mut file = jpeg(&[]);
        file.truncate(file.len() - 2);
        file.extend_from_slice(&segment(0xE1, &exif_payload(b"II*\0")));
        assert_eq!(read_exif_blob(&file), Ok(None));
    }

    #[test]
    fn corruption_is_reported() {
        logger();

        assert_eq!(
            read_exif_blob(b"not a jpeg"),
            Err(JpegError::FirstMarkerWasNotSoi)
        );

        let mut file = vec![0xFF, 0xD8];
        file.extend_from_slice(&[0xFF, 0xE1, 0x10, 0x00, b'E']);
        assert!(matches!(
            read_exif_blob(&file),
            Err(JpegError::NoDataForPayload { .. })
        ));
    }

    #[test]
    fn plan_goes_after_app0() {
        logger();

        let exif = segment(0xE1, &exif_payload(b"II*\0"));
        let file = jpeg(&[segment(0xE0, b"JFIF\0"), segment(0xDB, &[0; 4]), exif]);
        assert_eq!(
            plan_rewrite(&file),
            Ok(InsertPlan {
                insert_pos: 2,
                skip_index: Some(3)
            })
        );

        let file = jpeg(&[segment(0xDB, &[0; 4])]);
        assert_eq!(
            plan_rewrite(&file),
            Ok(InsertPlan {
                insert_pos: 0,
                skip_index: None
            })
        );
    }

    #[test]
    fn insert_without_app0_goes_right_after_soi() {
        logger();

        let dqt = segment(0xDB, &[1, 2, 3]);
        let file = jpeg(&[dqt.clone()]);
        let blob = exif_payload(b"II*\0\x08\0\0\0");

        let out = write_exif_blob(&file, &blob, &Limits::default()).unwrap();

        let mut expected = vec![0xFF, 0xD8];
        expected.extend_from_slice(&segment(0xE1, &blob));
        expected.extend_from_slice(&dqt);
        expected.extend_from_slice(SCAN);
        assert_eq!(out, expected);
    }

    #[test]
    fn replacing_keeps_everything_else() {
        logger();

        let app0 = segment(0xE0, b"JFIF\0\x01\x02");
        let old = segment(0xE1, &exif_payload(b"II*\0old"));
        let com = segment(0xFE, b"hello");
        let file = jpeg(&[app0.clone(), old, com.clone()]);

        // the caller's blob doesn't have the identifier, so it's added
        let out = write_exif_blob(&file, b"MM\0*new!", &Limits::default()).unwrap();

        let mut expected = vec![0xFF, 0xD8];
        expected.extend_from_slice(&app0);
        expected.extend_from_slice(&segment(0xE1, &exif_payload(b"MM\0*new!")));
        expected.extend_from_slice(&com);
        expected.extend_from_slice(SCAN);
        assert_eq!(out, expected);

        assert_eq!(
            read_exif_blob(&out),
            Ok(Some(exif_payload(b"MM\0*new!").as_slice()))
        );
    }

    #[test]
    fn only_the_first_of_several_exif_segments_is_replaced() {
        logger();

        let app0 = segment(0xE0, b"JFIF\0");
        let first = segment(0xE1, &exif_payload(b"II*\0first"));
        let second = segment(0xE1, &exif_payload(b"II*\0second"));
        let file = jpeg(&[app0.clone(), first, second.clone()]);
        assert_eq!(
            plan_rewrite(&file),
            Ok(InsertPlan {
                insert_pos: 2,
                skip_index: Some(2)
            })
        );

        let out = write_exif_blob(&file, b"II*\0new", &Limits::default()).unwrap();

        let mut expected = vec![0xFF, 0xD8];
        expected.extend_from_slice(&app0);
        expected.extend_from_slice(&segment(0xE1, &exif_payload(b"II*\0new")));
        expected.extend_from_slice(&second);
        expected.extend_from_slice(SCAN);
        assert_eq!(out, expected);

        // the new blob is what gets read back
        assert_eq!(
            read_exif_blob(&out),
            Ok(Some(exif_payload(b"II*\0new").as_slice()))
        );
    }

    #[test]
    fn insert_position_may_be_sos() {
        logger();

        // APP0 is last before SOS, so the insert position *is* SOS
        let app0 = segment(0xE0, b"JFIF\0");
        let file = jpeg(&[app0.clone()]);
        let blob = exif_payload(b"II*\0");

        let out = write_exif_blob(&file, &blob, &Limits::default()).unwrap();
        let mut expected = vec![0xFF, 0xD8];
        expected.extend_from_slice(&app0);
        expected.extend_from_slice(&segment(0xE1, &blob));
        expected.extend_from_slice(SCAN);
        assert_eq!(out, expected);
    }

    #[test]
    fn payload_limit_is_inclusive() {
        logger();

        let file = jpeg(&[]);
        let limits = Limits::default();

        let at_limit = vec![0x42_u8; 0xFFFF - 8];
        let out = write_exif_blob(&file, &at_limit, &limits).unwrap();
        assert_eq!(&out[2..6], &[0xFF, 0xE1, 0xFF, 0xFF]);

        let too_big = vec![0x42_u8; 0xFFFF - 7];
        assert_eq!(
            write_exif_blob(&file, &too_big, &limits),
            Err(JpegError::PayloadTooLarge {
                len: 0xFFFF - 7,
                max: 0xFFFF - 8
            })
        );
    }
}
