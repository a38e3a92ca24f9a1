//! Reads a TIFF structure into a [`TagTree`].

use rustc_hash::FxHashSet;
use winnow::{
    Parser as _,
    binary::{Endianness as WinnowEndianness, u16, u32},
    error::EmptyError,
    token::take,
};

use exif_container_types::exif::{
    Endianness,
    ifd::{IfdGroup, THUMBNAIL_LENGTH, THUMBNAIL_OFFSET},
    primitives::PrimitiveTy,
};

use super::{
    DecodeOptions, Decoded,
    error::CodecError,
    tree::{Entry, TagTree},
};

/// Bytes in one IFD entry.
const ENTRY_LEN: u32 = 12;

/// Decodes a TIFF structure that starts at `tiff[0]`.
pub(super) fn decode(tiff: &[u8], options: DecodeOptions) -> Result<Decoded, CodecError> {
    let input = &mut &*tiff;

    let endianness: Endianness = byte_order(input)?;
    if let Some(hint) = options.byte_order_hint {
        if hint != endianness {
            log::warn!(
                "Byte order hint was `{hint:?}`, but the TIFF header says `{endianness:?}`. \
                Trusting the header."
            );
        }
    }

    let winnow_endianness = winnow_endianness(endianness);
    let magic: u16 = u16(winnow_endianness)
        .parse_next(input)
        .map_err(|_: EmptyError| {
            log::error!("Couldn't find TIFF magic number!");
            CodecError::NoTiffMagicNumber
        })?;
    if magic != 42 {
        log::error!("Magic number wasn't for TIFF. got: `{magic}`");
        return Err(CodecError::MagicNumberWasntTiff { found: magic });
    }

    let ifd0_offset: u32 = u32(winnow_endianness)
        .parse_next(input)
        .map_err(|_: EmptyError| {
            log::error!("Didn't find an IFD 0 offset!");
            CodecError::NoTiffHeaderOffset
        })?;

    // we may not read past the ceiling, even if the slice is longer
    let ceiling: usize = options
        .max_addr
        .map(|m| (m as usize).min(tiff.len()))
        .unwrap_or(tiff.len());

    let mut walker = Walker {
        blob: &tiff[..ceiling],
        endianness,
        visited: FxHashSet::default(),
        max_addr_read: 8,
        copied: 0,
        tree: TagTree::new(endianness),
    };

    // IFD 0 leads to everything else
    let next = walker.walk(IfdGroup::_0, ifd0_offset)?;

    if options.follow_ifd1 && next != 0 {
        walker.walk(IfdGroup::_1, next)?;
        walker.thumbnail()?;
    } else if next != 0 {
        log::trace!("Not following IFD 1 at `{next}`.");
    }

    log::debug!(
        "Decoded TIFF ({endianness:?}). Highest address read: `{}`",
        walker.max_addr_read
    );
    Ok(Decoded {
        tree: walker.tree,
        max_addr_read: walker.max_addr_read,
    })
}

/// Parses the byte order marker.
fn byte_order(input: &mut &[u8]) -> Result<Endianness, CodecError> {
    let bom: &[u8] = take(2_usize)
        .parse_next(input)
        .map_err(|_: EmptyError| {
            log::error!("Couldn't find endianness marker!");
            CodecError::NoByteOrderMarker
        })?;
    let found: [u8; 2] = [bom[0], bom[1]];

    Endianness::from_marker(found).ok_or_else(|| {
        let e = CodecError::WeirdByteOrderMarker { found };
        log::error!("Couldn't parse out TIFF! err: {e}");
        e
    })
}

fn winnow_endianness(endianness: Endianness) -> WinnowEndianness {
    match endianness {
        Endianness::Little => WinnowEndianness::Little,
        Endianness::Big => WinnowEndianness::Big,
    }
}

/// State while following IFD links through a blob.
struct Walker<'a> {
    blob: &'a [u8],
    endianness: Endianness,
    visited: FxHashSet<u32>,
    max_addr_read: u32,

    /// Out-of-line bytes copied into the tree so far. Never more than the
    /// blob's length, since honest values don't overlap.
    copied: usize,
    tree: TagTree,
}

impl Walker<'_> {
    /// Counts `len` more copied bytes against the blob's length.
    fn charge(&mut self, group: IfdGroup, tag: u16, len: u32) -> Result<(), CodecError> {
        let budget: usize = self.blob.len();
        match self.copied.checked_add(len as usize) {
            Some(total) if total <= budget => {
                self.copied = total;
                Ok(())
            }
            _ => {
                log::error!(
                    "Tag `0x{tag:04X}` in IFD {group:?} would copy more than the \
                    `{budget}` byte blob holds. Values must be overlapping."
                );
                Err(CodecError::ValueBudgetExceeded { group, tag, budget })
            }
        }
    }

    /// Reads the IFD at `offset` into `group`, along with any sub-IFDs it
    /// points to.
    ///
    /// Returns the IFD's "next IFD" pointer.
    fn walk(&mut self, group: IfdGroup, offset: u32) -> Result<u32, CodecError> {
        if !self.visited.insert(offset) {
            log::error!("IFD {group:?} at `{offset}` was already visited!");
            return Err(CodecError::IfdLoop { group, offset });
        }

        let e = winnow_endianness(self.endianness);
        let input: &mut &[u8] = &mut self
            .blob
            .get(offset as usize..)
            .filter(|rest| !rest.is_empty())
            .ok_or_else(|| {
                log::error!("IFD {group:?} offset `{offset}` is out of bounds!");
                CodecError::IfdOutOfBounds { group, offset }
            })?;

        let truncated = |_: EmptyError| {
            log::error!("IFD {group:?} at `{offset}` ran out of data.");
            CodecError::IfdTruncated { group, offset }
        };

        let entry_count: u16 = u16(e).parse_next(input).map_err(truncated)?;
        if entry_count == 0 {
            log::warn!("IFD {group:?} has no entries.");
        }
        log::trace!("Parsing `{entry_count}` entries in IFD {group:?}...");

        let mut children: Vec<(IfdGroup, u32)> = Vec::new();
        for _ in 0..entry_count {
            let tag: u16 = u16(e).parse_next(input).map_err(truncated)?;
            let raw_ty: u16 = u16(e).parse_next(input).map_err(truncated)?;
            let count: u32 = u32(e).parse_next(input).map_err(truncated)?;
            let raw_value: &[u8] = take(4_usize).parse_next(input).map_err(truncated)?;

            // pointer tags become the tree's shape, not entries
            if let Some(child) = group.child_for(tag) {
                let child_offset = self.endianness.u32_from([
                    raw_value[0],
                    raw_value[1],
                    raw_value[2],
                    raw_value[3],
                ]);
                log::trace!("IFD {group:?} points to IFD {child:?} at `{child_offset}`.");
                children.push((child, child_offset));
                continue;
            }

            let Ok(ty) = PrimitiveTy::try_from(raw_ty) else {
                log::warn!(
                    "Skipping tag `0x{tag:04X}` in IFD {group:?}: unknown type `{raw_ty}`."
                );
                continue;
            };

            let data: Vec<u8> = self.value(group, tag, ty, count, raw_value)?;
            self.tree.insert(
                group,
                Entry {
                    tag,
                    ty,
                    count,
                    data,
                },
            );
        }

        let next: u32 = u32(e).parse_next(input).map_err(truncated)?;
        let end = offset
            .saturating_add(2)
            .saturating_add(ENTRY_LEN * entry_count as u32)
            .saturating_add(4);
        self.max_addr_read = self.max_addr_read.max(end);

        for (child, child_offset) in children {
            let child_next = self.walk(child, child_offset)?;
            if child_next != 0 {
                log::trace!("Ignoring next-IFD link `{child_next}` from IFD {child:?}.");
            }
        }

        Ok(next)
    }

    /// Grabs an entry's value bytes, following its offset if needed.
    fn value(
        &mut self,
        group: IfdGroup,
        tag: u16,
        ty: PrimitiveTy,
        count: u32,
        raw_value: &[u8],
    ) -> Result<Vec<u8>, CodecError> {
        let len: Option<u32> = count.checked_mul(ty.size_bytes() as u32);
        let offset: u32 =
            self.endianness
                .u32_from([raw_value[0], raw_value[1], raw_value[2], raw_value[3]]);

        let out_of_bounds = || {
            log::error!(
                "Value of tag `0x{tag:04X}` in IFD {group:?} is out of bounds. \
                offset: `{offset}`, count: `{count}`"
            );
            CodecError::ValueOutOfBounds {
                group,
                tag,
                offset,
                len: len.unwrap_or(u32::MAX),
            }
        };
        let len: u32 = len.ok_or_else(out_of_bounds)?;

        // small values live right in the entry
        if len <= 4 {
            return Ok(raw_value[..len as usize].to_vec());
        }

        let end: u32 = offset.checked_add(len).ok_or_else(out_of_bounds)?;
        let bytes = self
            .blob
            .get(offset as usize..end as usize)
            .ok_or_else(out_of_bounds)?;
        self.charge(group, tag, len)?;
        self.max_addr_read = self.max_addr_read.max(end);
        Ok(bytes.to_vec())
    }

    /// Pulls the JPEG thumbnail out of IFD 1, if it describes one.
    ///
    /// The location tags are dropped from the tree; the encoder rewrites them
    /// around wherever it puts the thumbnail.
    fn thumbnail(&mut self) -> Result<(), CodecError> {
        let read = |tree: &TagTree, tag: u16| -> Option<u32> {
            let entry = tree.entry(IfdGroup::_1, tag)?;
            match (entry.ty, entry.data.as_slice()) {
                (PrimitiveTy::Long, [a, b, c, d]) => {
                    Some(tree.endianness().u32_from([*a, *b, *c, *d]))
                }
                (PrimitiveTy::Short, [a, b]) => {
                    Some(tree.endianness().u16_from([*a, *b]) as u32)
                }
                _ => None,
            }
        };

        let (Some(offset), Some(len)) = (
            read(&self.tree, THUMBNAIL_OFFSET),
            read(&self.tree, THUMBNAIL_LENGTH),
        ) else {
            return Ok(());
        };

        let Some(bytes) = offset
            .checked_add(len)
            .and_then(|end| self.blob.get(offset as usize..end as usize))
        else {
            log::error!("Thumbnail at `{offset}` (`{len}` bytes) is out of bounds!");
            return Err(CodecError::ValueOutOfBounds {
                group: IfdGroup::_1,
                tag: THUMBNAIL_OFFSET,
                offset,
                len,
            });
        };

        self.charge(IfdGroup::_1, THUMBNAIL_OFFSET, len)?;
        log::trace!("Found a `{len}` byte thumbnail.");
        self.max_addr_read = self.max_addr_read.max(offset.saturating_add(len));
        let thumbnail = bytes.to_vec();

        self.tree.remove_entry(IfdGroup::_1, THUMBNAIL_OFFSET);
        self.tree.remove_entry(IfdGroup::_1, THUMBNAIL_LENGTH);
        self.tree.set_thumbnail(Some(thumbnail));
        Ok(())
    }
}
