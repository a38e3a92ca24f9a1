//! Contains stuff related to IFDs.
//!
//! For more info, see the [`IfdGroup`] enumeration.

/// An IFD is a set of entries found within a media file's Exif metadata.
///
/// IFD 0 is always present. It points at the Exif and GPS sub-IFDs through
/// "pointer tags", and the Exif IFD points at the Interoperability IFD the
/// same way. IFD 1 is reached through IFD 0's "next IFD" link instead, and
/// usually describes the embedded thumbnail.
///
/// The declaration order is also the order the encoder lays IFDs out in.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub enum IfdGroup {
    /// Refers to "IFD 0", the primary image's TIFF tags.
    #[doc(alias = "IFD0")]
    #[doc(alias = "TIFF")]
    _0,

    /// The "Exif" IFD provides camera-based metadata, like exposure.
    #[doc(alias = "ExifIFD")]
    Exif,

    /// The interoperability IFD.
    #[doc(alias = "InteropIFD")]
    Interop,

    /// The GPS IFD contains location metadata.
    #[doc(alias = "GPSIFD")]
    Gps,

    /// "IFD 1", which describes the thumbnail image.
    #[doc(alias = "IFD1")]
    _1,
}

impl IfdGroup {
    /// Every group, in layout order.
    pub const ALL: [IfdGroup; 5] = [
        IfdGroup::_0,
        IfdGroup::Exif,
        IfdGroup::Interop,
        IfdGroup::Gps,
        IfdGroup::_1,
    ];

    /// The pointer tag that leads to this group, along with the group that
    /// holds that pointer.
    ///
    /// IFD 0 and IFD 1 aren't reached through pointer tags, so they return
    /// `None`.
    ///
    /// ```
    /// use exif_container_types::exif::ifd::IfdGroup;
    ///
    /// assert_eq!(IfdGroup::Gps.pointer(), Some((IfdGroup::_0, 0x8825)));
    /// assert_eq!(IfdGroup::Interop.pointer(), Some((IfdGroup::Exif, 0xA005)));
    /// assert_eq!(IfdGroup::_1.pointer(), None);
    /// ```
    pub const fn pointer(&self) -> Option<(IfdGroup, u16)> {
        match self {
            IfdGroup::Exif => Some((IfdGroup::_0, EXIF_IFD_POINTER)),
            IfdGroup::Gps => Some((IfdGroup::_0, GPS_IFD_POINTER)),
            IfdGroup::Interop => Some((IfdGroup::Exif, INTEROP_IFD_POINTER)),
            IfdGroup::_0 | IfdGroup::_1 => None,
        }
    }

    /// Finds the group a pointer tag leads to, if `tag` is a pointer tag
    /// that's allowed inside `self`.
    pub const fn child_for(&self, tag: u16) -> Option<IfdGroup> {
        match (self, tag) {
            (IfdGroup::_0, EXIF_IFD_POINTER) => Some(IfdGroup::Exif),
            (IfdGroup::_0, GPS_IFD_POINTER) => Some(IfdGroup::Gps),
            (IfdGroup::Exif, INTEROP_IFD_POINTER) => Some(IfdGroup::Interop),
            _ => None,
        }
    }
}

/// Tag in IFD 0 pointing to the Exif IFD.
pub const EXIF_IFD_POINTER: u16 = 0x8769;

/// Tag in IFD 0 pointing to the GPS IFD.
pub const GPS_IFD_POINTER: u16 = 0x8825;

/// Tag in the Exif IFD pointing to the Interoperability IFD.
pub const INTEROP_IFD_POINTER: u16 = 0xA005;

/// Tag in IFD 1 holding the offset of the JPEG thumbnail.
pub const THUMBNAIL_OFFSET: u16 = 0x0201;

/// Tag in IFD 1 holding the length of the JPEG thumbnail.
pub const THUMBNAIL_LENGTH: u16 = 0x0202;
