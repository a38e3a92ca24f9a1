//! TIFF, and the raw formats built on it (like DNG).
//!
//! Here, Exif isn't a blob inside the file. The file's own IFD 0 chain *is*
//! the metadata, with the image data hanging off of it. So there's no
//! `read_exif_blob` for these files: we decode the IFDs in place, and on
//! write, we put new IFDs somewhere safe and point the header at them.
//!
//! IFD 0's link to the next IFD is kept as-is. In DNG, that link leads to
//! other images, not a thumbnail we could re-encode.

use exif_container_types::exif::Endianness;

use crate::{
    codec::{DecodeOptions, Decoded, ExifCodec, RelocationDelta, TagTree},
    config::Limits,
    data_buf::DataBuf,
    locator::find_tiff_header,
};

mod error;

pub use error::TiffError;

/// Where the IFD 0 offset lives in a TIFF header.
const IFD0_POINTER_POS: usize = 4;

/// Length of a TIFF header. Encoded structures put IFD 0 right after it.
const HEADER_LEN: u64 = 8;

/// Decodes the IFDs of a TIFF file.
///
/// Nothing past the end of `data` is ever read. IFD 1 isn't followed.
pub fn read<C: ExifCodec + ?Sized>(data: &[u8], codec: &C) -> Result<Decoded, TiffError> {
    let header = find_tiff_header(data).ok_or_else(|| {
        log::error!("No TIFF header in `{}` bytes.", data.len());
        TiffError::NoTiffHeader
    })?;
    let tiff: &[u8] = &data[header.offset..];

    let options = DecodeOptions {
        byte_order_hint: Some(header.endianness),
        max_addr: Some(u32::try_from(tiff.len()).unwrap_or(u32::MAX)),
        follow_ifd1: false,
    };
    Ok(codec.decode(tiff, options)?)
}

/// Where the new IFDs will go.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct WritePlan {
    /// Relative to the TIFF header.
    write_pos: u64,

    /// Zeroes added after the old data so the IFDs start on a word boundary.
    padding: u64,

    /// The original IFD 0 "next IFD" link, written back unchanged.
    ifd1_offset: u32,
}

/// Tags whose values point at image data (or more image IFDs) that IFD 0
/// doesn't own.
const DATA_POINTER_TAGS: [u16; 3] = [
    0x0111, // StripOffsets
    0x0144, // TileOffsets
    0x014A, // SubIFDs
];

/// Bounds-checked reads relative to a TIFF header inside a staged file.
struct TiffView<'a> {
    buf: &'a DataBuf,
    base: usize,
    e: Endianness,
}

impl TiffView<'_> {
    fn pos(&self, offset: u64) -> Option<usize> {
        usize::try_from(offset).ok()?.checked_add(self.base)
    }

    fn oob(what: &'static str, offset: u64) -> TiffError {
        log::error!("The {what} at `{offset}` is out of bounds.");
        TiffError::OffsetOutOfBounds { what, offset }
    }

    fn u16(&self, offset: u64, what: &'static str) -> Result<u16, TiffError> {
        self.pos(offset)
            .and_then(|p| self.buf.read_u16(p, self.e))
            .ok_or_else(|| Self::oob(what, offset))
    }

    fn u32(&self, offset: u64, what: &'static str) -> Result<u32, TiffError> {
        self.pos(offset)
            .and_then(|p| self.buf.read_u32(p, self.e))
            .ok_or_else(|| Self::oob(what, offset))
    }
}

/// Whether any strip, tile, or SubIFD pointer in IFD 0 reaches `limit` or
/// further.
fn data_reaches(
    c: &TiffView<'_>,
    ifd0_offset: u32,
    count: u16,
    limit: u64,
) -> Result<bool, TiffError> {
    for i in 0..count as u64 {
        let entry_at: u64 = ifd0_offset as u64 + 2 + 12 * i;
        let tag: u16 = c.u16(entry_at, "IFD 0 entry tag")?;
        if !DATA_POINTER_TAGS.contains(&tag) {
            continue;
        }

        let ty: u16 = c.u16(entry_at + 2, "IFD 0 entry type")?;
        let n: u64 = c.u32(entry_at + 4, "IFD 0 entry count")? as u64;
        let size: u64 = match ty {
            3 => 2,
            4 | 13 => 4,
            _ => {
                log::warn!("Tag `0x{tag:04X}` has unexpected type `{ty}`. Ignoring it.");
                continue;
            }
        };
        let values_at: u64 = if n * size <= 4 {
            entry_at + 8
        } else {
            c.u32(entry_at + 8, "IFD 0 pointer array")? as u64
        };

        for j in 0..n {
            let at: u64 = values_at + j * size;
            let ptr: u64 = match size {
                2 => c.u16(at, "IFD 0 data pointer")? as u64,
                _ => c.u32(at, "IFD 0 data pointer")? as u64,
            };
            if ptr >= limit {
                log::debug!("Tag `0x{tag:04X}` points at `{ptr}`, past IFD 0 at `{limit}`.");
                return Ok(true);
            }
        }
    }
    Ok(false)
}

/// Picks between rewriting IFD 0 where it is and appending after the file.
///
/// In-place only happens when the IFDs we decoded run (nearly) to the end of
/// the file, and no image data lives after them.
fn plan(
    c: &TiffView<'_>,
    tiff_len: u64,
    max_addr_read: Option<u32>,
    limits: &Limits,
) -> Result<WritePlan, TiffError> {
    let ifd0_offset: u32 = c.u32(IFD0_POINTER_POS as u64, "IFD 0 offset")?;
    let count: u16 = c.u16(ifd0_offset as u64, "IFD 0 entry count")?;
    let link_at: u64 = ifd0_offset as u64 + 2 + 12 * count as u64;
    let ifd1_offset: u32 = c.u32(link_at, "IFD 0 next link")?;
    log::debug!("IFD 0 at `{ifd0_offset}` (`{count}` entries), next IFD at `{ifd1_offset}`.");

    let end: u64 = tiff_len;
    let at_end: bool = max_addr_read.is_some_and(|m| (m as u64).abs_diff(end) < limits.tiff_end_slack);

    // overwriting would clobber the rest of the chain, or the image itself
    let chain_follows: bool = ifd1_offset != 0 && ifd1_offset >= ifd0_offset;
    let in_place_ok: bool = at_end
        && ifd0_offset as u64 >= HEADER_LEN
        && !chain_follows
        && !data_reaches(c, ifd0_offset, count, ifd0_offset as u64)?;

    if in_place_ok {
        log::debug!("Exif IFDs end the file. Rewriting in place at `{ifd0_offset}`.");
        return Ok(WritePlan {
            write_pos: ifd0_offset as u64,
            padding: 0,
            ifd1_offset,
        });
    }

    let padding: u64 = end % 2;
    log::debug!("Appending new IFDs at `{}`.", end + padding);
    Ok(WritePlan {
        write_pos: end + padding,
        padding,
        ifd1_offset,
    })
}

/// Builds a new TIFF file with `tree` as its IFD 0 chain.
///
/// `max_addr_read` is what [`read`] reported for this same file, or `None`
/// if the tree didn't come from it. Every byte of the image data is kept.
pub fn write<C: ExifCodec + ?Sized>(
    data: &[u8],
    tree: &TagTree,
    max_addr_read: Option<u32>,
    codec: &C,
    limits: &Limits,
) -> Result<Vec<u8>, TiffError> {
    let header = find_tiff_header(data).ok_or_else(|| {
        log::error!("No TIFF header to write into.");
        TiffError::NoTiffHeader
    })?;
    let base: usize = header.offset;
    let e: Endianness = header.endianness;
    let tiff_len: u64 = (data.len() - base) as u64;

    if tree.endianness() != e {
        log::error!(
            "Tag tree is `{:?}`, but the file is `{e:?}`.",
            tree.endianness()
        );
        return Err(TiffError::ByteOrderMismatch {
            file: e,
            tree: tree.endianness(),
        });
    }

    let mut staged = DataBuf::from(data);
    let p: WritePlan = plan(
        &TiffView {
            buf: &staged,
            base,
            e,
        },
        tiff_len,
        max_addr_read,
        limits,
    )?;
    let staged_len: u64 = tiff_len + p.padding;
    let invalid = || {
        log::error!("Write position `{}` can't be relocated to.", p.write_pos);
        TiffError::DeltaInvalid {
            write_pos: p.write_pos,
            stream_len: staged_len,
        }
    };
    let delta = RelocationDelta::for_write_position(p.write_pos, staged_len).ok_or_else(invalid)?;
    let new_ifd0: u32 = u32::try_from(p.write_pos).map_err(|_| invalid())?;

    let encoded: Vec<u8> = codec.encode(tree, delta, Some(p.ifd1_offset))?;
    let Some(ifds) = encoded.get(HEADER_LEN as usize..) else {
        log::error!("Codec returned only `{}` bytes.", encoded.len());
        return Err(TiffError::EncodedTooShort { len: encoded.len() });
    };

    // everything before the write position stays, including any padding
    let keep: usize = base + p.write_pos as usize;
    staged.resize(keep);
    if !staged.write_u32(base + IFD0_POINTER_POS, new_ifd0, e) {
        return Err(TiffError::OffsetOutOfBounds {
            what: "IFD 0 offset",
            offset: IFD0_POINTER_POS as u64,
        });
    }

    let mut out: Vec<u8> = staged.into_vec();
    out.extend_from_slice(ifds);
    log::debug!(
        "Rewrote TIFF: `{}` bytes -> `{}` bytes (delta `{}`).",
        data.len(),
        out.len(),
        delta.get()
    );
    Ok(out)
}
