//! Which keys callers may touch.

use std::sync::LazyLock;

use rustc_hash::FxHashMap;

/// What a caller may do with a key.
#[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum Permission {
    ReadOnly,
    ReadWrite,
}

/// Keys that may be written. Everything here is a standard TIFF, Exif, or
/// GPS tag, plus the one writable maker note key.
const READ_WRITE: &[&str] = &[
    // IFD 0
    "NewSubfileType",
    "SubfileType",
    "ImageWidth",
    "ImageLength",
    "BitsPerSample",
    "Compression",
    "PhotometricInterpretation",
    "ImageDescription",
    "Make",
    "Model",
    "StripOffsets",
    "Orientation",
    "SamplesPerPixel",
    "RowsPerStrip",
    "StripByteCounts",
    "XResolution",
    "YResolution",
    "PlanarConfiguration",
    "ResolutionUnit",
    "TransferFunction",
    "Software",
    "DateTime",
    "Artist",
    "WhitePoint",
    "PrimaryChromaticities",
    "JPEGProc",
    "JPEGInterchangeFormat",
    "JPEGInterchangeFormatLength",
    "YCbCrCoefficients",
    "YCbCrSubSampling",
    "YCbCrPositioning",
    "ReferenceBlackWhite",
    "Copyright",
    "DNGVersion",
    "DefaultCropSize",
    //
    // Exif IFD
    "ExposureTime",
    "FNumber",
    "ExposureProgram",
    "SpectralSensitivity",
    "ISOSpeedRatings",
    "OECF",
    "SensitivityType",
    "StandardOutputSensitivity",
    "RecommendedExposureIndex",
    "ISOSpeed",
    "ISOSpeedLatitudeyyy",
    "ISOSpeedLatitudezzz",
    "ExifVersion",
    "DateTimeOriginal",
    "DateTimeDigitized",
    "OffsetTime",
    "OffsetTimeOriginal",
    "OffsetTimeDigitized",
    "ComponentsConfiguration",
    "CompressedBitsPerPixel",
    "ShutterSpeedValue",
    "ApertureValue",
    "BrightnessValue",
    "ExposureBiasValue",
    "MaxApertureValue",
    "SubjectDistance",
    "MeteringMode",
    "LightSource",
    "Flash",
    "FocalLength",
    "SubjectArea",
    "MakerNote",
    "UserComment",
    "SubsecTime",
    "SubSecTimeOriginal",
    "SubSecTimeDigitized",
    "FlashpixVersion",
    "ColorSpace",
    "PixelXDimension",
    "PixelYDimension",
    "RelatedSoundFile",
    "FlashEnergy",
    "SpatialFrequencyResponse",
    "FocalPlaneXResolution",
    "FocalPlaneYResolution",
    "FocalPlaneResolutionUnit",
    "SubjectLocation",
    "ExposureIndex",
    "SensingMethod",
    "FileSource",
    "SceneType",
    "CFAPattern",
    "CustomRendered",
    "ExposureMode",
    "WhiteBalance",
    "DigitalZoomRatio",
    "FocalLengthIn35mmFilm",
    "SceneCaptureType",
    "GainControl",
    "Contrast",
    "Saturation",
    "Sharpness",
    "DeviceSettingDescription",
    "SubjectDistanceRange",
    "ImageUniqueID",
    "CameraOwnerName",
    "BodySerialNumber",
    "LensSpecification",
    "LensMake",
    "LensModel",
    "LensSerialNumber",
    "CompositeImage",
    "SourceImageNumberOfCompositeImage",
    "SourceExposureTimesOfCompositeImage",
    "Gamma",
    //
    // GPS IFD
    "GPSVersionID",
    "GPSLatitudeRef",
    "GPSLatitude",
    "GPSLongitudeRef",
    "GPSLongitude",
    "GPSAltitudeRef",
    "GPSAltitude",
    "GPSTimeStamp",
    "GPSSatellites",
    "GPSStatus",
    "GPSMeasureMode",
    "GPSDOP",
    "GPSSpeedRef",
    "GPSSpeed",
    "GPSTrackRef",
    "GPSTrack",
    "GPSImgDirectionRef",
    "GPSImgDirection",
    "GPSMapDatum",
    "GPSDestLatitudeRef",
    "GPSDestLatitude",
    "GPSDestLongitudeRef",
    "GPSDestLongitude",
    "GPSDestBearingRef",
    "GPSDestBearing",
    "GPSDestDistanceRef",
    "GPSDestDistance",
    "GPSProcessingMethod",
    "GPSAreaInformation",
    "GPSDateStamp",
    "GPSDifferential",
    "GPSHPositioningError",
    //
    // maker note
    "HwMnoteCaptureMode",
];

/// Maker note keys that are only ever read.
const READ_ONLY: &[&str] = &[
    "HwMnotePhysicalAperture",
    "HwMnoteRollAngle",
    "HwMnotePitchAngle",
    "HwMnoteSceneFoodConf",
    "HwMnoteSceneStageConf",
    "HwMnoteSceneBlueSkyConf",
    "HwMnoteSceneGreenPlantConf",
    "HwMnoteSceneBeachConf",
    "HwMnoteSceneSnowConf",
    "HwMnoteSceneSunsetConf",
    "HwMnoteSceneFlowersConf",
    "HwMnoteSceneNightConf",
    "HwMnoteSceneTextConf",
    "HwMnoteFaceCount",
    "HwMnoteFocusMode",
    "HwMnoteFrontCamera",
    "HwMnoteSceneVersion",
    "HwMnoteScenePointer",
    "HwMnoteFacePointer",
    "HwMnoteBurstNumber",
    "HwMnoteFaceVersion",
    "HwMnoteFaceConf",
    "HwMnoteFaceSmileScore",
    "HwMnoteFaceRect",
    "HwMnoteFaceLeyeCenter",
    "HwMnoteFaceReyeCenter",
    "HwMnoteFaceMouthCenter",
];

/// Every supported key and what callers may do with it.
pub static PERMISSIONS: LazyLock<FxHashMap<&'static str, Permission>> = LazyLock::new(|| {
    let mut m: FxHashMap<&'static str, Permission> = FxHashMap::default();
    m.extend(READ_WRITE.iter().map(|&k| (k, Permission::ReadWrite)));
    m.extend(READ_ONLY.iter().map(|&k| (k, Permission::ReadOnly)));
    m
});
