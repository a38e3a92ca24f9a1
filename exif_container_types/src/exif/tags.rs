//! Definitions for tags in an IFD group.
//!
//! # `tags`
//!
//! Contains the tags the engine can address by name, grouped by the
//! [`IfdGroup`] they live in.
//!
//! Names follow the Exif key names used by callers (`"GPSLatitudeRef"`,
//! `"ApertureValue"`, ...), so a caller's key can be turned into an IFD group
//! and tag ID with [`KnownTag::from_name`].
//!
//! ## For contributors
//!
//! To add a tag, find the `make_key_list_for_group!` call for its group and
//! add a listing:
//!
//! ```no_compile
//! YourNewKey = 0x1234 => {
//!     name: "YourNewKey",
//!     types: &[Pt::Ascii],
//!     count: Pc::Any,
//! },
//! ```
//!
//! The first entry of `types` is the type the encoder writes when the tag is
//! set from a string.
//!
//! Pointer tags (to the Exif, GPS and Interop IFDs) and the IFD 1 thumbnail
//! tags are not listed here. The codec owns those and regenerates them on
//! every encode.

use std::sync::LazyLock;

use rustc_hash::FxHashMap;

use crate::exif::{
    ifd::IfdGroup,
    primitives::{PrimitiveCount, PrimitiveTy},
};

/// Creates a "key list" for an IFD group.
///
/// These may include duplicate tag IDs from other groups.
macro_rules! make_key_list_for_group {
    (enum $enum_name:ident => $ifd_group:expr,
        $( $key_ident:ident = $key_tag:expr => {
            name: $tag_name:expr,
            types: $types:expr,
            count: $count:expr,
        },
    )+) => {
        #[doc = "A list of all keys present in the matching `IfdGroup` variant."]
        #[repr(u16)]
        #[non_exhaustive]
        #[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
        pub enum $enum_name {
            $(
              $key_ident = $key_tag,
            )+
        }

        impl $enum_name {
            /// Every key in this group.
            pub const ALL: &'static [$enum_name] = &[ $( $enum_name::$key_ident, )+ ];

            /// Returns the number of primitives this key's value may store.
            pub const fn count(&self) -> PrimitiveCount {
                match self {
                    $( Self::$key_ident => $count, )+
                }
            }

            /// Returns the `IfdGroup` that this enum represents.
            pub const fn ifd_group() -> IfdGroup {
                $ifd_group
            }

            /// Returns this key's tag ID.
            pub const fn tag_id(&self) -> u16 {
                *self as u16
            }

            /// Grabs a key's Exif name.
            pub const fn tag_name(&self) -> &'static str {
                match self {
                    $( Self::$key_ident => $tag_name, )+
                }
            }

            /// Returns the type(s) this key's value may have.
            pub const fn types(&self) -> &'static [PrimitiveTy] {
                match self {
                    $( Self::$key_ident => $types, )+
                }
            }
        }

        impl core::convert::TryFrom<u16> for $enum_name {
            type Error = ();

            fn try_from(value: u16) -> Result<Self, Self::Error> {
                match value {
                    $( $key_tag => Ok($enum_name::$key_ident), )+
                    _ => Err(()),
                }
            }
        }
    }
}

use {PrimitiveCount as Pc, PrimitiveTy as Pt};

/// A set of all known tags and their IFD groups.
#[derive(Copy, Clone, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum KnownTag {
    Ifd0Tag(Ifd0Tag),
    ExifIfdTag(ExifIfdTag),
    GpsIfdTag(GpsIfdTag),
    InteropIfdTag(InteropIfdTag),
}

/// Name lookup for every [`KnownTag`], built on first use.
static BY_NAME: LazyLock<FxHashMap<&'static str, KnownTag>> = LazyLock::new(|| {
    let mut map = FxHashMap::default();
    let all = Ifd0Tag::ALL
        .iter()
        .map(|t| KnownTag::Ifd0Tag(*t))
        .chain(ExifIfdTag::ALL.iter().map(|t| KnownTag::ExifIfdTag(*t)))
        .chain(GpsIfdTag::ALL.iter().map(|t| KnownTag::GpsIfdTag(*t)))
        .chain(InteropIfdTag::ALL.iter().map(|t| KnownTag::InteropIfdTag(*t)));
    for tag in all {
        map.insert(tag.tag_name(), tag);
    }
    map
});

impl KnownTag {
    /// Finds a tag by its Exif name.
    ///
    /// ```
    /// use exif_container_types::exif::{ifd::IfdGroup, tags::KnownTag};
    ///
    /// let tag = KnownTag::from_name("GPSLatitudeRef").unwrap();
    /// assert_eq!(tag.ifd_group(), IfdGroup::Gps);
    /// assert_eq!(tag.tag_id(), 0x0001);
    ///
    /// assert!(KnownTag::from_name("NotARealTag").is_none());
    /// ```
    pub fn from_name(name: &str) -> Option<KnownTag> {
        BY_NAME.get(name).copied()
    }

    /// Returns the number of primitives this tag's value may store.
    ///
    /// ```
    /// use exif_container_types::exif::{
    ///     tags::{KnownTag, Ifd0Tag},
    ///     primitives::PrimitiveCount
    /// };
    ///
    /// let image_width: KnownTag = KnownTag::Ifd0Tag(Ifd0Tag::ImageWidth);
    /// assert_eq!(image_width.count(), PrimitiveCount::Known(1));
    /// ```
    pub const fn count(&self) -> PrimitiveCount {
        match self {
            KnownTag::Ifd0Tag(k) => k.count(),
            KnownTag::ExifIfdTag(k) => k.count(),
            KnownTag::GpsIfdTag(k) => k.count(),
            KnownTag::InteropIfdTag(k) => k.count(),
        }
    }

    /// Returns the `IfdGroup` this tag lives in.
    pub const fn ifd_group(self) -> IfdGroup {
        match self {
            KnownTag::Ifd0Tag(_) => Ifd0Tag::ifd_group(),
            KnownTag::ExifIfdTag(_) => ExifIfdTag::ifd_group(),
            KnownTag::GpsIfdTag(_) => GpsIfdTag::ifd_group(),
            KnownTag::InteropIfdTag(_) => InteropIfdTag::ifd_group(),
        }
    }

    /// Returns this tag's tag ID.
    pub const fn tag_id(&self) -> u16 {
        match self {
            KnownTag::Ifd0Tag(k) => *k as u16,
            KnownTag::ExifIfdTag(k) => *k as u16,
            KnownTag::GpsIfdTag(k) => *k as u16,
            KnownTag::InteropIfdTag(k) => *k as u16,
        }
    }

    /// Grabs a tag's Exif name.
    pub const fn tag_name(&self) -> &'static str {
        match self {
            KnownTag::Ifd0Tag(k) => k.tag_name(),
            KnownTag::ExifIfdTag(k) => k.tag_name(),
            KnownTag::GpsIfdTag(k) => k.tag_name(),
            KnownTag::InteropIfdTag(k) => k.tag_name(),
        }
    }

    /// Returns the type(s) this tag's value may have.
    ///
    /// The first one is what gets written when the tag is set from a string.
    pub const fn types(&self) -> &'static [PrimitiveTy] {
        match self {
            KnownTag::Ifd0Tag(k) => k.types(),
            KnownTag::ExifIfdTag(k) => k.types(),
            KnownTag::GpsIfdTag(k) => k.types(),
            KnownTag::InteropIfdTag(k) => k.types(),
        }
    }
}

impl TryFrom<(IfdGroup, u16)> for KnownTag {
    type Error = ();

    fn try_from(value: (IfdGroup, u16)) -> Result<Self, Self::Error> {
        let (ifd_group, tag_id): (IfdGroup, u16) = value;

        match ifd_group {
            // IFD 1 uses the same TIFF tags as IFD 0
            IfdGroup::_0 | IfdGroup::_1 => Ifd0Tag::try_from(tag_id).map(KnownTag::Ifd0Tag),
            IfdGroup::Exif => ExifIfdTag::try_from(tag_id).map(KnownTag::ExifIfdTag),
            IfdGroup::Gps => GpsIfdTag::try_from(tag_id).map(KnownTag::GpsIfdTag),
            IfdGroup::Interop => InteropIfdTag::try_from(tag_id).map(KnownTag::InteropIfdTag),
        }
    }
}

/*
 *
 *
 *  TIFF Rev. 6.0 attributes (plus the DNG ones callers may edit)
 *
 *
 */
make_key_list_for_group!(enum Ifd0Tag => IfdGroup::_0,
    NewSubfileType = 0x00FE => {
        name: "NewSubfileType",
        types: &[Pt::Long],
        count: Pc::Known(1),
    },
    SubfileType = 0x00FF => {
        name: "SubfileType",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    ImageWidth = 0x0100 => {
        name: "ImageWidth",
        types: &[Pt::Long, Pt::Short],
        count: Pc::Known(1),
    },
    ImageLength = 0x0101 => {
        name: "ImageLength",
        types: &[Pt::Long, Pt::Short],
        count: Pc::Known(1),
    },
    BitsPerSample = 0x0102 => {
        name: "BitsPerSample",
        types: &[Pt::Short],
        count: Pc::Known(3),
    },
    Compression = 0x0103 => {
        name: "Compression",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    PhotometricInterpretation = 0x0106 => {
        name: "PhotometricInterpretation",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    ImageDescription = 0x010E => {
        name: "ImageDescription",
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    Make = 0x010F => {
        name: "Make",
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    Model = 0x0110 => {
        name: "Model",
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    StripOffsets = 0x0111 => {
        name: "StripOffsets",
        types: &[Pt::Long, Pt::Short],
        count: Pc::Any,
    },
    Orientation = 0x0112 => {
        name: "Orientation",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    SamplesPerPixel = 0x0115 => {
        name: "SamplesPerPixel",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    RowsPerStrip = 0x0116 => {
        name: "RowsPerStrip",
        types: &[Pt::Long, Pt::Short],
        count: Pc::Known(1),
    },
    StripByteCounts = 0x0117 => {
        name: "StripByteCounts",
        types: &[Pt::Long, Pt::Short],
        count: Pc::Any,
    },
    XResolution = 0x011A => {
        name: "XResolution",
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    YResolution = 0x011B => {
        name: "YResolution",
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    PlanarConfiguration = 0x011C => {
        name: "PlanarConfiguration",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    ResolutionUnit = 0x0128 => {
        name: "ResolutionUnit",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    TransferFunction = 0x012D => {
        name: "TransferFunction",
        types: &[Pt::Short],
        count: Pc::Known(768),
    },
    Software = 0x0131 => {
        name: "Software",
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    DateTime = 0x0132 => {
        name: "DateTime",
        types: &[Pt::Ascii],
        count: Pc::Known(20),
    },
    Artist = 0x013B => {
        name: "Artist",
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    WhitePoint = 0x013E => {
        name: "WhitePoint",
        types: &[Pt::Rational],
        count: Pc::Known(2),
    },
    PrimaryChromaticities = 0x013F => {
        name: "PrimaryChromaticities",
        types: &[Pt::Rational],
        count: Pc::Known(6),
    },
    JPEGProc = 0x0200 => {
        name: "JPEGProc",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    JPEGInterchangeFormat = 0x0201 => {
        name: "JPEGInterchangeFormat",
        types: &[Pt::Long],
        count: Pc::Known(1),
    },
    JPEGInterchangeFormatLength = 0x0202 => {
        name: "JPEGInterchangeFormatLength",
        types: &[Pt::Long],
        count: Pc::Known(1),
    },
    YCbCrCoefficients = 0x0211 => {
        name: "YCbCrCoefficients",
        types: &[Pt::Rational],
        count: Pc::Known(3),
    },
    YCbCrSubSampling = 0x0212 => {
        name: "YCbCrSubSampling",
        types: &[Pt::Short],
        count: Pc::Known(2),
    },
    YCbCrPositioning = 0x0213 => {
        name: "YCbCrPositioning",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    ReferenceBlackWhite = 0x0214 => {
        name: "ReferenceBlackWhite",
        types: &[Pt::Rational],
        count: Pc::Known(6),
    },
    Copyright = 0x8298 => {
        name: "Copyright",
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    DNGVersion = 0xC612 => {
        name: "DNGVersion",
        types: &[Pt::Byte],
        count: Pc::Known(4),
    },
    DefaultCropSize = 0xC620 => {
        name: "DefaultCropSize",
        types: &[Pt::Long, Pt::Short, Pt::Rational],
        count: Pc::Known(2),
    },
);

/*
 *
 *
 *  Exif IFD attributes
 *
 *
 */
make_key_list_for_group!(enum ExifIfdTag => IfdGroup::Exif,
    ExposureTime = 0x829A => {
        name: "ExposureTime",
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    FNumber = 0x829D => {
        name: "FNumber",
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    ExposureProgram = 0x8822 => {
        name: "ExposureProgram",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    SpectralSensitivity = 0x8824 => {
        name: "SpectralSensitivity",
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    ISOSpeedRatings = 0x8827 => {
        name: "ISOSpeedRatings",
        types: &[Pt::Short],
        count: Pc::Any,
    },
    OECF = 0x8828 => {
        name: "OECF",
        types: &[Pt::Undefined],
        count: Pc::Any,
    },
    SensitivityType = 0x8830 => {
        name: "SensitivityType",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    StandardOutputSensitivity = 0x8831 => {
        name: "StandardOutputSensitivity",
        types: &[Pt::Long],
        count: Pc::Known(1),
    },
    RecommendedExposureIndex = 0x8832 => {
        name: "RecommendedExposureIndex",
        types: &[Pt::Long],
        count: Pc::Known(1),
    },
    ISOSpeed = 0x8833 => {
        name: "ISOSpeed",
        types: &[Pt::Long],
        count: Pc::Known(1),
    },
    ISOSpeedLatitudeyyy = 0x8834 => {
        name: "ISOSpeedLatitudeyyy",
        types: &[Pt::Long],
        count: Pc::Known(1),
    },
    ISOSpeedLatitudezzz = 0x8835 => {
        name: "ISOSpeedLatitudezzz",
        types: &[Pt::Long],
        count: Pc::Known(1),
    },
    ExifVersion = 0x9000 => {
        name: "ExifVersion",
        types: &[Pt::Undefined],
        count: Pc::Known(4),
    },
    DateTimeOriginal = 0x9003 => {
        name: "DateTimeOriginal",
        types: &[Pt::Ascii],
        count: Pc::Known(20),
    },
    DateTimeDigitized = 0x9004 => {
        name: "DateTimeDigitized",
        types: &[Pt::Ascii],
        count: Pc::Known(20),
    },
    OffsetTime = 0x9010 => {
        name: "OffsetTime",
        types: &[Pt::Ascii],
        count: Pc::Known(7),
    },
    OffsetTimeOriginal = 0x9011 => {
        name: "OffsetTimeOriginal",
        types: &[Pt::Ascii],
        count: Pc::Known(7),
    },
    OffsetTimeDigitized = 0x9012 => {
        name: "OffsetTimeDigitized",
        types: &[Pt::Ascii],
        count: Pc::Known(7),
    },
    ComponentsConfiguration = 0x9101 => {
        name: "ComponentsConfiguration",
        types: &[Pt::Undefined],
        count: Pc::Known(4),
    },
    CompressedBitsPerPixel = 0x9102 => {
        name: "CompressedBitsPerPixel",
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    ShutterSpeedValue = 0x9201 => {
        name: "ShutterSpeedValue",
        types: &[Pt::SRational],
        count: Pc::Known(1),
    },
    ApertureValue = 0x9202 => {
        name: "ApertureValue",
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    BrightnessValue = 0x9203 => {
        name: "BrightnessValue",
        types: &[Pt::SRational],
        count: Pc::Known(1),
    },
    ExposureBiasValue = 0x9204 => {
        name: "ExposureBiasValue",
        types: &[Pt::SRational],
        count: Pc::Known(1),
    },
    MaxApertureValue = 0x9205 => {
        name: "MaxApertureValue",
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    SubjectDistance = 0x9206 => {
        name: "SubjectDistance",
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    MeteringMode = 0x9207 => {
        name: "MeteringMode",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    LightSource = 0x9208 => {
        name: "LightSource",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    Flash = 0x9209 => {
        name: "Flash",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    FocalLength = 0x920A => {
        name: "FocalLength",
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    SubjectArea = 0x9214 => {
        name: "SubjectArea",
        types: &[Pt::Short],
        count: Pc::Any,
    },
    MakerNote = 0x927C => {
        name: "MakerNote",
        types: &[Pt::Undefined],
        count: Pc::Any,
    },
    UserComment = 0x9286 => {
        name: "UserComment",
        types: &[Pt::Undefined],
        count: Pc::Any,
    },
    SubsecTime = 0x9290 => {
        name: "SubsecTime",
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    SubSecTimeOriginal = 0x9291 => {
        name: "SubSecTimeOriginal",
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    SubSecTimeDigitized = 0x9292 => {
        name: "SubSecTimeDigitized",
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    FlashpixVersion = 0xA000 => {
        name: "FlashpixVersion",
        types: &[Pt::Undefined],
        count: Pc::Known(4),
    },
    ColorSpace = 0xA001 => {
        name: "ColorSpace",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    PixelXDimension = 0xA002 => {
        name: "PixelXDimension",
        types: &[Pt::Long, Pt::Short],
        count: Pc::Known(1),
    },
    PixelYDimension = 0xA003 => {
        name: "PixelYDimension",
        types: &[Pt::Long, Pt::Short],
        count: Pc::Known(1),
    },
    RelatedSoundFile = 0xA004 => {
        name: "RelatedSoundFile",
        types: &[Pt::Ascii],
        count: Pc::Known(13),
    },
    FlashEnergy = 0xA20B => {
        name: "FlashEnergy",
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    SpatialFrequencyResponse = 0xA20C => {
        name: "SpatialFrequencyResponse",
        types: &[Pt::Undefined],
        count: Pc::Any,
    },
    FocalPlaneXResolution = 0xA20E => {
        name: "FocalPlaneXResolution",
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    FocalPlaneYResolution = 0xA20F => {
        name: "FocalPlaneYResolution",
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    FocalPlaneResolutionUnit = 0xA210 => {
        name: "FocalPlaneResolutionUnit",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    SubjectLocation = 0xA214 => {
        name: "SubjectLocation",
        types: &[Pt::Short],
        count: Pc::Known(2),
    },
    ExposureIndex = 0xA215 => {
        name: "ExposureIndex",
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    SensingMethod = 0xA217 => {
        name: "SensingMethod",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    FileSource = 0xA300 => {
        name: "FileSource",
        types: &[Pt::Undefined],
        count: Pc::Known(1),
    },
    SceneType = 0xA301 => {
        name: "SceneType",
        types: &[Pt::Undefined],
        count: Pc::Known(1),
    },
    CFAPattern = 0xA302 => {
        name: "CFAPattern",
        types: &[Pt::Undefined],
        count: Pc::Any,
    },
    CustomRendered = 0xA401 => {
        name: "CustomRendered",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    ExposureMode = 0xA402 => {
        name: "ExposureMode",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    WhiteBalance = 0xA403 => {
        name: "WhiteBalance",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    DigitalZoomRatio = 0xA404 => {
        name: "DigitalZoomRatio",
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    FocalLengthIn35mmFilm = 0xA405 => {
        name: "FocalLengthIn35mmFilm",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    SceneCaptureType = 0xA406 => {
        name: "SceneCaptureType",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    GainControl = 0xA407 => {
        name: "GainControl",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    Contrast = 0xA408 => {
        name: "Contrast",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    Saturation = 0xA409 => {
        name: "Saturation",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    Sharpness = 0xA40A => {
        name: "Sharpness",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    DeviceSettingDescription = 0xA40B => {
        name: "DeviceSettingDescription",
        types: &[Pt::Undefined],
        count: Pc::Any,
    },
    SubjectDistanceRange = 0xA40C => {
        name: "SubjectDistanceRange",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    ImageUniqueID = 0xA420 => {
        name: "ImageUniqueID",
        types: &[Pt::Ascii],
        count: Pc::Known(33),
    },
    CameraOwnerName = 0xA430 => {
        name: "CameraOwnerName",
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    BodySerialNumber = 0xA431 => {
        name: "BodySerialNumber",
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    LensSpecification = 0xA432 => {
        name: "LensSpecification",
        types: &[Pt::Rational],
        count: Pc::Known(4),
    },
    LensMake = 0xA433 => {
        name: "LensMake",
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    LensModel = 0xA434 => {
        name: "LensModel",
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    LensSerialNumber = 0xA435 => {
        name: "LensSerialNumber",
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    CompositeImage = 0xA460 => {
        name: "CompositeImage",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    SourceImageNumberOfCompositeImage = 0xA461 => {
        name: "SourceImageNumberOfCompositeImage",
        types: &[Pt::Short],
        count: Pc::Known(2),
    },
    SourceExposureTimesOfCompositeImage = 0xA462 => {
        name: "SourceExposureTimesOfCompositeImage",
        types: &[Pt::Undefined],
        count: Pc::Any,
    },
    Gamma = 0xA500 => {
        name: "Gamma",
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
);

/*
 *
 *
 *  GPS attributes
 *
 *
 */
make_key_list_for_group!(enum GpsIfdTag => IfdGroup::Gps,
    GPSVersionID = 0x0000 => {
        name: "GPSVersionID",
        types: &[Pt::Byte],
        count: Pc::Known(4),
    },
    GPSLatitudeRef = 0x0001 => {
        name: "GPSLatitudeRef",
        types: &[Pt::Ascii],
        count: Pc::Known(2),
    },
    GPSLatitude = 0x0002 => {
        name: "GPSLatitude",
        types: &[Pt::Rational],
        count: Pc::Known(3),
    },
    GPSLongitudeRef = 0x0003 => {
        name: "GPSLongitudeRef",
        types: &[Pt::Ascii],
        count: Pc::Known(2),
    },
    GPSLongitude = 0x0004 => {
        name: "GPSLongitude",
        types: &[Pt::Rational],
        count: Pc::Known(3),
    },
    GPSAltitudeRef = 0x0005 => {
        name: "GPSAltitudeRef",
        types: &[Pt::Byte],
        count: Pc::Known(1),
    },
    GPSAltitude = 0x0006 => {
        name: "GPSAltitude",
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    GPSTimeStamp = 0x0007 => {
        name: "GPSTimeStamp",
        types: &[Pt::Rational],
        count: Pc::Known(3),
    },
    GPSSatellites = 0x0008 => {
        name: "GPSSatellites",
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    GPSStatus = 0x0009 => {
        name: "GPSStatus",
        types: &[Pt::Ascii],
        count: Pc::Known(2),
    },
    GPSMeasureMode = 0x000A => {
        name: "GPSMeasureMode",
        types: &[Pt::Ascii],
        count: Pc::Known(2),
    },
    GPSDOP = 0x000B => {
        name: "GPSDOP",
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    GPSSpeedRef = 0x000C => {
        name: "GPSSpeedRef",
        types: &[Pt::Ascii],
        count: Pc::Known(2),
    },
    GPSSpeed = 0x000D => {
        name: "GPSSpeed",
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    GPSTrackRef = 0x000E => {
        name: "GPSTrackRef",
        types: &[Pt::Ascii],
        count: Pc::Known(2),
    },
    GPSTrack = 0x000F => {
        name: "GPSTrack",
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    GPSImgDirectionRef = 0x0010 => {
        name: "GPSImgDirectionRef",
        types: &[Pt::Ascii],
        count: Pc::Known(2),
    },
    GPSImgDirection = 0x0011 => {
        name: "GPSImgDirection",
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    GPSMapDatum = 0x0012 => {
        name: "GPSMapDatum",
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    GPSDestLatitudeRef = 0x0013 => {
        name: "GPSDestLatitudeRef",
        types: &[Pt::Ascii],
        count: Pc::Known(2),
    },
    GPSDestLatitude = 0x0014 => {
        name: "GPSDestLatitude",
        types: &[Pt::Rational],
        count: Pc::Known(3),
    },
    GPSDestLongitudeRef = 0x0015 => {
        name: "GPSDestLongitudeRef",
        types: &[Pt::Ascii],
        count: Pc::Known(2),
    },
    GPSDestLongitude = 0x0016 => {
        name: "GPSDestLongitude",
        types: &[Pt::Rational],
        count: Pc::Known(3),
    },
    GPSDestBearingRef = 0x0017 => {
        name: "GPSDestBearingRef",
        types: &[Pt::Ascii],
        count: Pc::Known(2),
    },
    GPSDestBearing = 0x0018 => {
        name: "GPSDestBearing",
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    GPSDestDistanceRef = 0x0019 => {
        name: "GPSDestDistanceRef",
        types: &[Pt::Ascii],
        count: Pc::Known(2),
    },
    GPSDestDistance = 0x001A => {
        name: "GPSDestDistance",
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    GPSProcessingMethod = 0x001B => {
        name: "GPSProcessingMethod",
        types: &[Pt::Undefined],
        count: Pc::Any,
    },
    GPSAreaInformation = 0x001C => {
        name: "GPSAreaInformation",
        types: &[Pt::Undefined],
        count: Pc::Any,
    },
    GPSDateStamp = 0x001D => {
        name: "GPSDateStamp",
        types: &[Pt::Ascii],
        count: Pc::Known(11),
    },
    GPSDifferential = 0x001E => {
        name: "GPSDifferential",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    GPSHPositioningError = 0x001F => {
        name: "GPSHPositioningError",
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
);

/*
 *
 *
 *  Interoperability attributes
 *
 *
 */
make_key_list_for_group!(enum InteropIfdTag => IfdGroup::Interop,
    InteroperabilityIndex = 0x0001 => {
        name: "InteroperabilityIndex",
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    InteroperabilityVersion = 0x0002 => {
        name: "InteroperabilityVersion",
        types: &[Pt::Undefined],
        count: Pc::Known(4),
    },
);

#[cfg(test)]
mod tests {
    use super::{ExifIfdTag, GpsIfdTag, Ifd0Tag, InteropIfdTag, KnownTag};
    use crate::exif::ifd::IfdGroup;

    /// Every name must map back to the tag it came from. A duplicated name
    /// would make one of the tags unreachable.
    #[test]
    fn names_are_unique_and_round_trip() {
        let all = Ifd0Tag::ALL
            .iter()
            .map(|t| KnownTag::Ifd0Tag(*t))
            .chain(ExifIfdTag::ALL.iter().map(|t| KnownTag::ExifIfdTag(*t)))
            .chain(GpsIfdTag::ALL.iter().map(|t| KnownTag::GpsIfdTag(*t)))
            .chain(InteropIfdTag::ALL.iter().map(|t| KnownTag::InteropIfdTag(*t)));

        for tag in all {
            assert_eq!(
                KnownTag::from_name(tag.tag_name()),
                Some(tag),
                "name `{}` should find its own tag",
                tag.tag_name()
            );
            assert_eq!(
                KnownTag::try_from((tag.ifd_group(), tag.tag_id())),
                Ok(tag),
                "id lookup for `{}`",
                tag.tag_name()
            );
            assert!(!tag.types().is_empty(), "`{}` needs a type", tag.tag_name());
        }
    }

    /// The same ID means different things in different groups.
    #[test]
    fn ids_are_scoped_by_group() {
        assert_eq!(
            KnownTag::try_from((IfdGroup::Gps, 0x0001)),
            Ok(KnownTag::GpsIfdTag(GpsIfdTag::GPSLatitudeRef))
        );
        assert_eq!(
            KnownTag::try_from((IfdGroup::Interop, 0x0001)),
            Ok(KnownTag::InteropIfdTag(InteropIfdTag::InteroperabilityIndex))
        );
        assert_eq!(KnownTag::try_from((IfdGroup::_0, 0x0001)), Err(()));
    }
}
