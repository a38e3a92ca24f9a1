//! Writes a [`TagTree`] back into TIFF bytes.
//!
//! Layout is always: the 8-byte header, then each present IFD in
//! [`IfdGroup::ALL`] order, each one directly followed by its out-of-line
//! values. The thumbnail (if any) goes last.

use exif_container_types::exif::{
    Endianness,
    ifd::{IfdGroup, THUMBNAIL_LENGTH, THUMBNAIL_OFFSET},
    primitives::PrimitiveTy,
};

use super::{
    RelocationDelta,
    error::CodecError,
    tree::{Entry, TagTree},
};

/// A planned IFD: its entries (pointer tags included) and where it goes.
struct Planned {
    group: IfdGroup,
    entries: Vec<Entry>,
    offset: usize,
}

impl Planned {
    fn ifd_len(&self) -> usize {
        2 + 12 * self.entries.len() + 4
    }

    fn data_len(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.data.len() > 4)
            .map(|e| padded(e.data.len()))
            .sum()
    }
}

/// Values start on word boundaries.
const fn padded(len: usize) -> usize {
    len + (len % 2)
}

pub(super) fn encode(
    tree: &TagTree,
    delta: RelocationDelta,
    next_ifd: Option<u32>,
) -> Result<Vec<u8>, CodecError> {
    let endianness: Endianness = tree.endianness();

    // where a blob-relative position lands after relocation
    let relocate = |pos: usize| -> Result<u32, CodecError> {
        u32::try_from(pos)
            .ok()
            .and_then(|p| delta.apply(p))
            .ok_or_else(|| {
                log::error!("Position `{pos}` doesn't fit in a TIFF offset after relocation.");
                CodecError::TooLarge
            })
    };

    // plan every present IFD, with placeholders for the pointers
    let mut plan: Vec<Planned> = Vec::new();
    for group in IfdGroup::ALL {
        if !tree.is_present(group) {
            continue;
        }

        let mut entries: Vec<Entry> = tree.entries(group).to_vec();
        for child in IfdGroup::ALL {
            if let Some((parent, tag)) = child.pointer() {
                if parent == group && tree.is_present(child) {
                    entries.push(long_entry(endianness, tag, 0));
                }
            }
        }
        if group == IfdGroup::_1 {
            if let Some(thumbnail) = tree.thumbnail() {
                let len: u32 = u32::try_from(thumbnail.len()).map_err(|_| CodecError::TooLarge)?;
                entries.push(long_entry(endianness, THUMBNAIL_OFFSET, 0));
                entries.push(long_entry(endianness, THUMBNAIL_LENGTH, len));
            }
        }
        entries.sort_by_key(|e| e.tag);

        plan.push(Planned {
            group,
            entries,
            offset: 0,
        });
    }

    // lay them out
    let mut pos: usize = 8;
    for p in plan.iter_mut() {
        p.offset = pos;
        pos += p.ifd_len() + p.data_len();
    }
    let thumbnail_pos: usize = pos;
    let total: usize = pos + tree.thumbnail().map(<[u8]>::len).unwrap_or(0);
    relocate(total)?;

    // now that offsets are known, fill in the pointers
    let offsets: Vec<(IfdGroup, usize)> = plan.iter().map(|p| (p.group, p.offset)).collect();
    for (child, child_offset) in &offsets {
        let Some((parent, tag)) = child.pointer() else {
            continue;
        };
        let value = relocate(*child_offset)?;
        if let Some(p) = plan.iter_mut().find(|p| p.group == parent) {
            if let Some(e) = p.entries.iter_mut().find(|e| e.tag == tag) {
                e.data = endianness.u32_to(value).to_vec();
            }
        }
    }
    if tree.thumbnail().is_some() {
        let value = relocate(thumbnail_pos)?;
        if let Some(p) = plan.iter_mut().find(|p| p.group == IfdGroup::_1) {
            if let Some(e) = p.entries.iter_mut().find(|e| e.tag == THUMBNAIL_OFFSET) {
                e.data = endianness.u32_to(value).to_vec();
            }
        }
    }

    // write everything
    let mut out: Vec<u8> = Vec::with_capacity(total);
    out.extend_from_slice(&endianness.tiff_header());
    out.extend_from_slice(&endianness.u32_to(relocate(8)?));

    for p in &plan {
        debug_assert_eq!(out.len(), p.offset, "IFD should start where it was planned");

        let count: u16 = u16::try_from(p.entries.len()).map_err(|_| {
            log::error!("IFD {:?} has too many entries to encode.", p.group);
            CodecError::TooLarge
        })?;
        out.extend_from_slice(&endianness.u16_to(count));

        let mut data_pos: usize = p.offset + p.ifd_len();
        for e in &p.entries {
            out.extend_from_slice(&endianness.u16_to(e.tag));
            out.extend_from_slice(&endianness.u16_to(e.ty.code()));
            out.extend_from_slice(&endianness.u32_to(e.count));
            if e.data.len() <= 4 {
                let mut inline = [0_u8; 4];
                inline[..e.data.len()].copy_from_slice(&e.data);
                out.extend_from_slice(&inline);
            } else {
                out.extend_from_slice(&endianness.u32_to(relocate(data_pos)?));
                data_pos += padded(e.data.len());
            }
        }

        let next: u32 = match p.group {
            IfdGroup::_0 => match next_ifd {
                Some(n) => n,
                None if tree.is_present(IfdGroup::_1) => {
                    relocate(offsets.iter().find(|(g, _)| *g == IfdGroup::_1).map_or(0, |o| o.1))?
                }
                None => 0,
            },
            _ => 0,
        };
        out.extend_from_slice(&endianness.u32_to(next));

        for e in p.entries.iter().filter(|e| e.data.len() > 4) {
            out.extend_from_slice(&e.data);
            if e.data.len() % 2 == 1 {
                out.push(0);
            }
        }
    }

    if let Some(thumbnail) = tree.thumbnail() {
        out.extend_from_slice(thumbnail);
    }

    log::debug!(
        "Encoded `{}` IFDs into `{}` bytes (delta `{}`).",
        plan.len(),
        out.len(),
        delta.get()
    );
    Ok(out)
}

fn long_entry(endianness: Endianness, tag: u16, value: u32) -> Entry {
    Entry {
        tag,
        ty: PrimitiveTy::Long,
        count: 1,
        data: endianness.u32_to(value).to_vec(),
    }
}
