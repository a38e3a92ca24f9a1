//! The in-memory form of a decoded Exif blob.

use std::collections::BTreeMap;

use exif_container_types::exif::{
    Endianness,
    ifd::IfdGroup,
    primitives::{PrimitiveCount, PrimitiveTy, Rational, SRational},
    tags::KnownTag,
};

use super::error::CodecError;

/// One IFD entry, with its value kept as raw bytes in the tree's byte order.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Entry {
    pub tag: u16,
    pub ty: PrimitiveTy,
    pub count: u32,
    pub data: Vec<u8>,
}

/// A decoded tag tree.
///
/// Pointer tags (to the Exif, GPS, and Interop IFDs) and the thumbnail
/// location tags aren't stored as entries. The encoder writes them from the
/// tree's shape instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagTree {
    endianness: Endianness,
    ifds: BTreeMap<IfdGroup, Vec<Entry>>,
    thumbnail: Option<Vec<u8>>,
}

impl TagTree {
    /// A tree with no entries.
    pub fn new(endianness: Endianness) -> Self {
        Self {
            endianness,
            ifds: BTreeMap::new(),
            thumbnail: None,
        }
    }

    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// The entries of one IFD, sorted by tag ID.
    pub fn entries(&self, group: IfdGroup) -> &[Entry] {
        self.ifds.get(&group).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn entry(&self, group: IfdGroup, tag: u16) -> Option<&Entry> {
        self.entries(group).iter().find(|e| e.tag == tag)
    }

    /// Inserts (or replaces) an entry, keeping the IFD sorted.
    pub fn insert(&mut self, group: IfdGroup, entry: Entry) {
        let list = self.ifds.entry(group).or_default();
        match list.binary_search_by_key(&entry.tag, |e| e.tag) {
            Ok(i) => list[i] = entry,
            Err(i) => list.insert(i, entry),
        }
    }

    /// Removes an entry by tag ID.
    pub fn remove_entry(&mut self, group: IfdGroup, tag: u16) -> Option<Entry> {
        let list = self.ifds.get_mut(&group)?;
        let i = list.iter().position(|e| e.tag == tag)?;
        Some(list.remove(i))
    }

    pub fn thumbnail(&self) -> Option<&[u8]> {
        self.thumbnail.as_deref()
    }

    pub fn set_thumbnail(&mut self, thumbnail: Option<Vec<u8>>) {
        self.thumbnail = thumbnail;
    }

    /// Whether the encoder needs to write this IFD.
    ///
    /// A group is written if it has entries, or if it has to hold the
    /// pointer to a child group that's written.
    pub(crate) fn is_present(&self, group: IfdGroup) -> bool {
        match group {
            IfdGroup::_0 => true,
            IfdGroup::Exif => {
                !self.entries(IfdGroup::Exif).is_empty() || self.is_present(IfdGroup::Interop)
            }
            IfdGroup::_1 => !self.entries(IfdGroup::_1).is_empty() || self.thumbnail.is_some(),
            IfdGroup::Interop | IfdGroup::Gps => !self.entries(group).is_empty(),
        }
    }

    /// Grabs a tag's value as a string.
    ///
    /// Text comes back as-is. Numbers come back space-separated, and
    /// fractions as `n/d`.
    pub fn get(&self, name: &str) -> Option<String> {
        let tag = KnownTag::from_name(name)?;
        let entry = self.entry(tag.ifd_group(), tag.tag_id())?;
        Some(format_value(self.endianness, entry, tag.count()))
    }

    /// Whether [`TagTree::set`] has somewhere to put a tag with this name.
    ///
    /// Maker note keys don't: their values live inside the vendor's
    /// `MakerNote` blob, which is kept as opaque bytes.
    ///
    /// ```
    /// use exif_container::codec::TagTree;
    ///
    /// assert!(TagTree::can_store("Orientation"));
    /// assert!(!TagTree::can_store("HwMnoteCaptureMode"));
    /// ```
    pub fn can_store(name: &str) -> bool {
        KnownTag::from_name(name).is_some()
    }

    /// Sets a tag from its string form.
    ///
    /// The string should already be normalized (see
    /// [`ValueConverter`](crate::converter::ValueConverter)): text for ASCII
    /// tags, space-separated integers, or space-separated `n/d` fractions.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), CodecError> {
        let tag: KnownTag = KnownTag::from_name(name).ok_or_else(|| {
            log::error!("Can't set unknown tag `{name}`.");
            CodecError::UnknownTagName(name.to_string())
        })?;

        // keep the type the file already used, if the tag allows it
        let ty: PrimitiveTy = self
            .entry(tag.ifd_group(), tag.tag_id())
            .map(|e| e.ty)
            .filter(|ty| tag.types().contains(ty))
            .or_else(|| tag.types().first().copied())
            .unwrap_or(PrimitiveTy::Undefined);

        let not_encodable = || {
            log::error!("Value `{value}` can't be encoded as `{ty:?}` for `{name}`.");
            CodecError::ValueNotEncodable {
                tag: tag.tag_name(),
                value: value.to_string(),
            }
        };

        let (count, data) =
            encode_value(self.endianness, ty, tag.count(), value).ok_or_else(not_encodable)?;

        if let PrimitiveCount::Known(expected) = tag.count() {
            if !matches!(ty, PrimitiveTy::Ascii | PrimitiveTy::Utf8) && count != expected {
                log::error!("`{name}` needs `{expected}` values, but got `{count}`.");
                return Err(not_encodable());
            }
        }

        log::debug!("Setting `{name}` to `{value}` (`{count}` x `{ty:?}`).");
        self.insert(
            tag.ifd_group(),
            Entry {
                tag: tag.tag_id(),
                ty,
                count,
                data,
            },
        );
        Ok(())
    }

    /// Removes a tag. Returns whether it was there.
    pub fn remove(&mut self, name: &str) -> bool {
        let Some(tag) = KnownTag::from_name(name) else {
            return false;
        };
        let Some(list) = self.ifds.get_mut(&tag.ifd_group()) else {
            return false;
        };
        let before = list.len();
        list.retain(|e| e.tag != tag.tag_id());
        before != list.len()
    }
}

/// Renders an entry's value as a string.
fn format_value(endianness: Endianness, entry: &Entry, count: PrimitiveCount) -> String {
    let d = entry.data.as_slice();
    let u16s = || {
        d.chunks_exact(2)
            .map(|c| endianness.u16_from([c[0], c[1]]))
    };
    let u32s = || {
        d.chunks_exact(4)
            .map(|c| endianness.u32_from([c[0], c[1], c[2], c[3]]))
    };
    let join = |parts: Vec<String>| parts.join(" ");

    match entry.ty {
        PrimitiveTy::Ascii | PrimitiveTy::Utf8 => {
            let text = d.split(|b| *b == 0).next().unwrap_or_default();
            String::from_utf8_lossy(text).into_owned()
        }
        PrimitiveTy::Byte => join(d.iter().map(u8::to_string).collect()),
        PrimitiveTy::SByte => join(d.iter().map(|b| (*b as i8).to_string()).collect()),
        // version tags like `ExifVersion` are four ASCII digits
        PrimitiveTy::Undefined => match count {
            PrimitiveCount::Known(_) if !d.iter().all(u8::is_ascii_graphic) => {
                join(d.iter().map(u8::to_string).collect())
            }
            _ => String::from_utf8_lossy(d).into_owned(),
        },
        PrimitiveTy::Short => join(u16s().map(|v| v.to_string()).collect()),
        PrimitiveTy::SShort => join(u16s().map(|v| (v as i16).to_string()).collect()),
        PrimitiveTy::Long => join(u32s().map(|v| v.to_string()).collect()),
        PrimitiveTy::SLong => join(u32s().map(|v| (v as i32).to_string()).collect()),
        PrimitiveTy::Float => join(u32s().map(|v| f32::from_bits(v).to_string()).collect()),
        PrimitiveTy::Rational => {
            let v: Vec<u32> = u32s().collect();
            join(
                v.chunks_exact(2)
                    .map(|p| {
                        Rational {
                            numerator: p[0],
                            denominator: p[1],
                        }
                        .to_string()
                    })
                    .collect(),
            )
        }
        PrimitiveTy::SRational => {
            let v: Vec<u32> = u32s().collect();
            join(
                v.chunks_exact(2)
                    .map(|p| {
                        SRational {
                            numerator: p[0] as i32,
                            denominator: p[1] as i32,
                        }
                        .to_string()
                    })
                    .collect(),
            )
        }
        PrimitiveTy::Double => join(
            d.chunks_exact(8)
                .map(|c| {
                    let mut b = [0_u8; 8];
                    b.copy_from_slice(c);
                    let bits = match endianness {
                        Endianness::Little => u64::from_le_bytes(b),
                        Endianness::Big => u64::from_be_bytes(b),
                    };
                    f64::from_bits(bits).to_string()
                })
                .collect(),
        ),
    }
}

/// Turns a normalized string into `(count, bytes)` for the given type.
///
/// Returns `None` if any part doesn't parse or doesn't fit the type.
fn encode_value(
    endianness: Endianness,
    ty: PrimitiveTy,
    count: PrimitiveCount,
    value: &str,
) -> Option<(u32, Vec<u8>)> {
    let parts: Vec<&str> = value.split_whitespace().collect();
    let n = |len: usize| u32::try_from(len).ok();

    match ty {
        PrimitiveTy::Ascii | PrimitiveTy::Utf8 => {
            let mut data = value.as_bytes().to_vec();
            data.push(0);
            Some((n(data.len())?, data))
        }

        PrimitiveTy::Undefined => {
            // fixed-size opaque values (like `SceneType`) are given as bytes.
            // anything else is stored as the text itself
            let as_bytes: Option<Vec<u8>> = match count {
                PrimitiveCount::Known(k) if n(parts.len())? == k => {
                    parts.iter().map(|p| p.parse::<u8>().ok()).collect()
                }
                _ => None,
            };
            let data = as_bytes.unwrap_or_else(|| value.as_bytes().to_vec());
            Some((n(data.len())?, data))
        }

        PrimitiveTy::Byte => {
            let data: Vec<u8> = parts.iter().map(|p| p.parse().ok()).collect::<Option<_>>()?;
            Some((n(data.len())?, data))
        }
        PrimitiveTy::SByte => {
            let data: Vec<u8> = parts
                .iter()
                .map(|p| p.parse::<i8>().ok().map(|v| v as u8))
                .collect::<Option<_>>()?;
            Some((n(data.len())?, data))
        }
        PrimitiveTy::Short | PrimitiveTy::SShort => {
            let mut data = Vec::with_capacity(parts.len() * 2);
            for p in &parts {
                let v: u16 = match ty {
                    PrimitiveTy::Short => p.parse().ok()?,
                    _ => p.parse::<i16>().ok()? as u16,
                };
                data.extend_from_slice(&endianness.u16_to(v));
            }
            Some((n(parts.len())?, data))
        }
        PrimitiveTy::Long | PrimitiveTy::SLong => {
            let mut data = Vec::with_capacity(parts.len() * 4);
            for p in &parts {
                let v: u32 = match ty {
                    PrimitiveTy::Long => p.parse().ok()?,
                    _ => p.parse::<i32>().ok()? as u32,
                };
                data.extend_from_slice(&endianness.u32_to(v));
            }
            Some((n(parts.len())?, data))
        }
        PrimitiveTy::Rational => {
            let mut data = Vec::with_capacity(parts.len() * 8);
            for p in &parts {
                let r: Rational = p.parse().ok()?;
                data.extend_from_slice(&endianness.u32_to(r.numerator));
                data.extend_from_slice(&endianness.u32_to(r.denominator));
            }
            Some((n(parts.len())?, data))
        }
        PrimitiveTy::SRational => {
            let mut data = Vec::with_capacity(parts.len() * 8);
            for p in &parts {
                let r: SRational = p.parse().ok()?;
                data.extend_from_slice(&endianness.u32_to(r.numerator as u32));
                data.extend_from_slice(&endianness.u32_to(r.denominator as u32));
            }
            Some((n(parts.len())?, data))
        }
        PrimitiveTy::Float => {
            let mut data = Vec::with_capacity(parts.len() * 4);
            for p in &parts {
                let v: f32 = p.parse().ok()?;
                data.extend_from_slice(&endianness.u32_to(v.to_bits()));
            }
            Some((n(parts.len())?, data))
        }
        PrimitiveTy::Double => {
            let mut data = Vec::with_capacity(parts.len() * 8);
            for p in &parts {
                let bits = p.parse::<f64>().ok()?.to_bits();
                data.extend_from_slice(&match endianness {
                    Endianness::Little => bits.to_le_bytes(),
                    Endianness::Big => bits.to_be_bytes(),
                });
            }
            Some((n(parts.len())?, data))
        }
    }
}

#[cfg(test)]
mod tests {
    use exif_container_types::exif::{Endianness, ifd::IfdGroup, primitives::PrimitiveTy};

    use super::{Entry, TagTree};
    use crate::{codec::error::CodecError, util::logger};

    #[test]
    fn set_then_get_each_kind_of_value() {
        logger();

        let mut tree = TagTree::new(Endianness::Big);

        tree.set("Make", "Raves").unwrap();
        tree.set("Orientation", "6").unwrap();
        tree.set("BitsPerSample", "8 8 8").unwrap();
        tree.set("ApertureValue", "4/1").unwrap();
        tree.set("ExposureBiasValue", "-1/3").unwrap();
        tree.set("GPSLatitude", "39/1 54/1 20/1").unwrap();
        tree.set("GPSVersionID", "2 2 0 0").unwrap();
        tree.set("SceneType", "1").unwrap();
        tree.set("ExifVersion", "0230").unwrap();

        assert_eq!(tree.get("Make").as_deref(), Some("Raves"));
        assert_eq!(tree.get("Orientation").as_deref(), Some("6"));
        assert_eq!(tree.get("BitsPerSample").as_deref(), Some("8 8 8"));
        assert_eq!(tree.get("ApertureValue").as_deref(), Some("4/1"));
        assert_eq!(tree.get("ExposureBiasValue").as_deref(), Some("-1/3"));
        assert_eq!(tree.get("GPSLatitude").as_deref(), Some("39/1 54/1 20/1"));
        assert_eq!(tree.get("GPSVersionID").as_deref(), Some("2 2 0 0"));
        assert_eq!(tree.get("SceneType").as_deref(), Some("1"));

        // `ExifVersion` is four opaque bytes of text
        let entry = tree.entry(IfdGroup::Exif, 0x9000).unwrap();
        assert_eq!(entry.data, b"0230");
        assert_eq!(tree.get("ExifVersion").as_deref(), Some("0230"));

        // tags land in their own groups
        assert!(tree.entry(IfdGroup::Gps, 0x0002).is_some());
        assert!(tree.entry(IfdGroup::_0, 0x0002).is_none());
    }

    #[test]
    fn set_uses_the_trees_byte_order() {
        logger();

        let mut tree = TagTree::new(Endianness::Little);
        tree.set("Orientation", "3").unwrap();
        assert_eq!(tree.entry(IfdGroup::_0, 0x0112).unwrap().data, [3, 0]);

        let mut tree = TagTree::new(Endianness::Big);
        tree.set("Orientation", "3").unwrap();
        assert_eq!(tree.entry(IfdGroup::_0, 0x0112).unwrap().data, [0, 3]);
    }

    #[test]
    fn set_keeps_an_existing_allowed_type() {
        logger();

        let mut tree = TagTree::new(Endianness::Big);
        tree.insert(
            IfdGroup::_0,
            Entry {
                tag: 0x0100,
                ty: PrimitiveTy::Short,
                count: 1,
                data: vec![0, 10],
            },
        );

        tree.set("ImageWidth", "640").unwrap();
        let entry = tree.entry(IfdGroup::_0, 0x0100).unwrap();
        assert_eq!(entry.ty, PrimitiveTy::Short);
        assert_eq!(entry.data, [0x02, 0x80]);
    }

    #[test]
    fn set_rejects_bad_values() {
        logger();

        let mut tree = TagTree::new(Endianness::Big);
        assert!(matches!(
            tree.set("NotATag", "1"),
            Err(CodecError::UnknownTagName(_))
        ));
        assert!(matches!(
            tree.set("Orientation", "70000"),
            Err(CodecError::ValueNotEncodable { .. })
        ));
        assert!(matches!(
            tree.set("BitsPerSample", "8 8"),
            Err(CodecError::ValueNotEncodable { .. })
        ));
        assert!(matches!(
            tree.set("ApertureValue", "f/4"),
            Err(CodecError::ValueNotEncodable { .. })
        ));

        // failures never leave a half-written entry behind
        assert!(tree.entries(IfdGroup::_0).is_empty());
    }

    #[test]
    fn remove_and_presence() {
        logger();

        let mut tree = TagTree::new(Endianness::Big);
        assert!(!tree.is_present(IfdGroup::Exif));

        tree.set("InteroperabilityIndex", "R98").unwrap();
        assert!(tree.is_present(IfdGroup::Interop));
        assert!(
            tree.is_present(IfdGroup::Exif),
            "the Exif IFD has to carry the Interop pointer"
        );

        assert!(tree.remove("InteroperabilityIndex"));
        assert!(!tree.remove("InteroperabilityIndex"));
        assert!(!tree.is_present(IfdGroup::Exif));
    }
}
