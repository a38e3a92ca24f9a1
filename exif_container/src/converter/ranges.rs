//! Enumerated value tables.
//!
//! Each entry is a value and what it means. A key listed here only accepts
//! values from its table. Letter values (like `GPSLatitudeRef`) are stored as
//! their ASCII codes.

use std::sync::LazyLock;

use rustc_hash::FxHashMap;

/// One allowed value.
pub type RangeEntry = (i64, &'static str);

const ORIENTATION: &[RangeEntry] = &[
    (1, "top, left"),
    (2, "top, right"),
    (3, "bottom, right"),
    (4, "bottom, left"),
    (5, "left, top"),
    (6, "right, top"),
    (7, "right, bottom"),
    (8, "left, bottom"),
];

const GPS_LATITUDE_REF: &[RangeEntry] = &[(b'N' as i64, "North"), (b'S' as i64, "South")];

const GPS_LONGITUDE_REF: &[RangeEntry] = &[(b'E' as i64, "East"), (b'W' as i64, "West")];

const WHITE_BALANCE: &[RangeEntry] = &[(0, "Auto"), (1, "Manual")];

const FLASH: &[RangeEntry] = &[
    (0x00, "No flash"),
    (0x01, "Fired"),
    (0x05, "Fired, return light not detected"),
    (0x07, "Fired, return light detected"),
    (0x08, "Yes, did not fire"),
    (0x09, "Yes, compulsory"),
    (0x0D, "Yes, compulsory, return light not detected"),
    (0x0F, "Yes, compulsory, return light detected"),
    (0x10, "No, compulsory"),
    (0x14, "No, did not fire, return light not detected"),
    (0x18, "No, auto"),
    (0x19, "Yes, auto"),
    (0x1D, "Yes, auto, return light not detected"),
    (0x1F, "Yes, auto, return light detected"),
    (0x20, "No flash function"),
    (0x41, "Yes, red-eye reduction"),
    (0x45, "Yes, red-eye reduction, return light not detected"),
    (0x47, "Yes, red-eye reduction, return light detected"),
    (0x49, "Yes, compulsory, red-eye reduction"),
    (0x4D, "Yes, compulsory, red-eye reduction, return light not detected"),
    (0x4F, "Yes, compulsory, red-eye reduction, return light detected"),
    (0x50, "No, red-eye reduction"),
    (0x58, "No, auto, red-eye reduction"),
    (0x59, "Yes, auto, red-eye reduction"),
    (0x5D, "Yes, auto, red-eye reduction, return light not detected"),
    (0x5F, "Yes, auto, red-eye reduction, return light detected"),
];

const COLOR_SPACE: &[RangeEntry] = &[(1, "sRGB"), (2, "Adobe RGB"), (0xFFFF, "Uncalibrated")];

const LIGHT_SOURCE: &[RangeEntry] = &[
    (0, "Unknown"),
    (1, "Daylight"),
    (2, "Fluorescent"),
    (3, "Tungsten (incandescent light)"),
    (4, "Flash"),
    (9, "Fine weather"),
    (10, "Cloudy weather"),
    (11, "Shade"),
    (12, "Daylight fluorescent (D 5700 - 7100K)"),
    (13, "Day white fluorescent (N 4600 - 5400K)"),
    (14, "Cool white fluorescent (W 3900 - 4500K)"),
    (15, "White fluorescent (WW 3200 - 3700K)"),
    (17, "Standard light A"),
    (18, "Standard light B"),
    (19, "Standard light C"),
    (20, "D55"),
    (21, "D65"),
    (22, "D75"),
    (23, "D50"),
    (24, "ISO studio tungsten"),
    (255, "Other light source"),
];

const METERING_MODE: &[RangeEntry] = &[
    (0, "Unknown"),
    (1, "Average"),
    (2, "Center weighted average"),
    (3, "Spot"),
    (4, "Multi-spot"),
    (5, "Multi-segment"),
    (6, "Partial"),
    (255, "Other"),
];

const SCENE_TYPE: &[RangeEntry] = &[(1, "Directly photographed")];

const COMPRESSION: &[RangeEntry] = &[
    (1, "Uncompressed"),
    (2, "CCITT RLE"),
    (3, "T4/Group 3 Fax"),
    (4, "T6/Group 4 Fax"),
    (5, "LZW"),
    (6, "JPEG (old-style)"),
    (7, "JPEG"),
    (8, "Adobe Deflate"),
    (9, "JBIG B&W"),
    (10, "JBIG Color"),
    (32766, "Next 2-bits RLE"),
    (32767, "Sony ARW Compressed"),
    (32769, "Epson ERF Compressed"),
    (32770, "Samsung SRW Compressed"),
    (32771, "CCITT RLE 1-word"),
    (32773, "PackBits (Macintosh RLE)"),
    (32809, "Thunderscan RLE"),
    (32895, "IT8 CT Padding"),
    (32896, "IT8 Linework RLE"),
    (32897, "IT8 Monochrome Picture"),
    (32898, "IT8 Binary Lineart"),
    (32908, "Pixar Film (10-bits LZW)"),
    (32909, "Pixar Log (11-bits ZIP)"),
    (32946, "Pixar Deflate"),
    (32947, "Kodak DCS Encoding"),
    (34661, "ISO JBIG"),
    (34676, "SGI Log Luminance RLE"),
    (34677, "SGI Log 24-bits packed"),
    (34712, "Leadtools JPEG 2000"),
    (34713, "Nikon NEF Compressed"),
    (34892, "JPEG (lossy)"),
    (52546, "JPEG XL"),
    (65000, "Kodak DCR Compressed"),
    (65535, "Pentax PEF Compressed"),
];

const PHOTOMETRIC_INTERPRETATION: &[RangeEntry] = &[
    (0, "White Is Zero"),
    (1, "Black Is Zero"),
    (2, "RGB"),
    (3, "RGB Palette"),
    (4, "Transparency Mask"),
    (5, "CMYK"),
    (6, "YCbCr"),
    (8, "CIELab"),
    (9, "ICCLab"),
    (10, "ITULab"),
    (32803, "Color Filter Array"),
    (32844, "Pixar LogL"),
    (32845, "Pixar LogLuv"),
    (34892, "Linear Raw"),
    (51177, "Depth Map"),
    (52527, "Photometric Mask"),
];

const PLANAR_CONFIGURATION: &[RangeEntry] = &[(1, "Chunky"), (2, "Planar")];

/// `ResolutionUnit` and `FocalPlaneResolutionUnit`.
const UNIT: &[RangeEntry] = &[(1, "none"), (2, "inch"), (3, "cm")];

const YCBCR_POSITIONING: &[RangeEntry] = &[(1, "Centered"), (2, "Co-sited")];

const EXPOSURE_PROGRAM: &[RangeEntry] = &[
    (0, "Not defined"),
    (1, "Manual"),
    (2, "Auto"),
    (3, "Aperture priority"),
    (4, "Shutter priority"),
    (5, "Creative program"),
    (6, "Action program"),
    (7, "Portrait mode"),
    (8, "Landscape mode"),
];

const SENSING_METHOD: &[RangeEntry] = &[
    (0, "Undefined"),
    (1, "Monochrome area"),
    (2, "One-chip color area"),
    (3, "Two-chip color area"),
    (4, "Three-chip color area"),
    (5, "Color sequential area"),
    (6, "Monochrome linear"),
    (7, "Trilinear sensor"),
    (8, "Color sequential linear"),
];

const CUSTOM_RENDERED: &[RangeEntry] = &[(0, "Normal process"), (1, "Custom process")];

const EXPOSURE_MODE: &[RangeEntry] = &[(0, "Auto"), (1, "Manual"), (2, "Auto bracket")];

const SCENE_CAPTURE_TYPE: &[RangeEntry] = &[
    (0, "Standard"),
    (1, "Landscape"),
    (2, "Portrait"),
    (3, "Night scene"),
];

const GAIN_CONTROL: &[RangeEntry] = &[
    (0, "None"),
    (1, "Low gain up"),
    (2, "High gain up"),
    (3, "Low gain down"),
    (4, "High gain down"),
];

/// `Contrast` and `Sharpness`.
const NORMAL_SOFT_HARD: &[RangeEntry] = &[(0, "Normal"), (1, "Soft"), (2, "Hard")];

const SATURATION: &[RangeEntry] = &[(0, "Normal"), (1, "Low"), (2, "High")];

const SUBJECT_DISTANCE_RANGE: &[RangeEntry] = &[
    (0, "Unknown"),
    (1, "Macro"),
    (2, "Close view"),
    (3, "Distant view"),
];

const GPS_ALTITUDE_REF: &[RangeEntry] = &[(0, "Above sea level"), (1, "Below sea level")];

// really a bitmask, but only these combinations are meaningful
const NEW_SUBFILE_TYPE: &[RangeEntry] = &[
    (0, "Primary image"),
    (1, "Thumbnail/Preview image"),
    (2, "Primary image, Multi page file"),
    (3, "Thumbnail/Preview image, Multi page file"),
    (4, "Primary image, Transparency mask"),
    (5, "Thumbnail/Preview image, Transparency mask"),
    (6, "Primary image, Multi page file, Transparency mask"),
    (7, "Thumbnail/Preview image, Multi page file, Transparency mask"),
    (8, "Primary image, Depth map"),
    (9, "Thumbnail/Preview image, Depth map"),
    (16, "Enhanced image"),
    (65537, "Thumbnail/Preview image, Alternative"),
    (65540, "Primary image, Semantic mask"),
];

const SUBFILE_TYPE: &[RangeEntry] = &[
    (1, "Full-resolution image data"),
    (2, "Reduced-resolution image data"),
    (3, "A single page of a multi-page image"),
];

const GPS_STATUS: &[RangeEntry] = &[
    (b'A' as i64, "Measurement in progress"),
    (b'V' as i64, "Measurement interrupted"),
];

const GPS_MEASURE_MODE: &[RangeEntry] = &[
    (2, "2-dimensional measurement"),
    (3, "3-dimensional measurement"),
];

const GPS_SPEED_REF: &[RangeEntry] = &[
    (b'K' as i64, "km/h"),
    (b'M' as i64, "mph"),
    (b'N' as i64, "knots"),
];

const GPS_DIRECTION_REF: &[RangeEntry] = &[
    (b'T' as i64, "True direction"),
    (b'M' as i64, "Magnetic direction"),
];

const GPS_DEST_DISTANCE_REF: &[RangeEntry] = &[
    (b'K' as i64, "km"),
    (b'M' as i64, "miles"),
    (b'N' as i64, "nautical miles"),
];

const GPS_DIFFERENTIAL: &[RangeEntry] = &[(0, "Without correction"), (1, "Correction applied")];

const COMPOSITE_IMAGE: &[RangeEntry] = &[
    (0, "Unknown"),
    (1, "NonComposite"),
    (2, "GeneralComposite"),
    (3, "CompositeCapturedWhenShooting"),
];

/// Keys with a range table.
pub static RANGES: LazyLock<FxHashMap<&'static str, &'static [RangeEntry]>> =
    LazyLock::new(|| {
        let mut m: FxHashMap<&'static str, &'static [RangeEntry]> = FxHashMap::default();
        let mut i = |key: &'static str, table: &'static [RangeEntry]| m.insert(key, table);

        i("Orientation", ORIENTATION);
        i("GPSLatitudeRef", GPS_LATITUDE_REF);
        i("GPSLongitudeRef", GPS_LONGITUDE_REF);
        i("WhiteBalance", WHITE_BALANCE);
        i("Flash", FLASH);
        i("LightSource", LIGHT_SOURCE);
        i("MeteringMode", METERING_MODE);
        i("SceneType", SCENE_TYPE);
        i("Compression", COMPRESSION);
        i("PhotometricInterpretation", PHOTOMETRIC_INTERPRETATION);
        i("PlanarConfiguration", PLANAR_CONFIGURATION);
        i("ResolutionUnit", UNIT);
        i("YCbCrPositioning", YCBCR_POSITIONING);
        i("ExposureProgram", EXPOSURE_PROGRAM);
        i("ColorSpace", COLOR_SPACE);
        i("FocalPlaneResolutionUnit", UNIT);
        i("SensingMethod", SENSING_METHOD);
        i("CustomRendered", CUSTOM_RENDERED);
        i("ExposureMode", EXPOSURE_MODE);
        i("SceneCaptureType", SCENE_CAPTURE_TYPE);
        i("GainControl", GAIN_CONTROL);
        i("Contrast", NORMAL_SOFT_HARD);
        i("Saturation", SATURATION);
        i("Sharpness", NORMAL_SOFT_HARD);
        i("SubjectDistanceRange", SUBJECT_DISTANCE_RANGE);
        i("GPSAltitudeRef", GPS_ALTITUDE_REF);
        i("NewSubfileType", NEW_SUBFILE_TYPE);
        i("SubfileType", SUBFILE_TYPE);
        i("GPSStatus", GPS_STATUS);
        i("GPSMeasureMode", GPS_MEASURE_MODE);
        i("GPSSpeedRef", GPS_SPEED_REF);
        i("GPSImgDirectionRef", GPS_DIRECTION_REF);
        i("GPSDestDistanceRef", GPS_DEST_DISTANCE_REF);
        i("GPSDifferential", GPS_DIFFERENTIAL);
        i("CompositeImage", COMPOSITE_IMAGE);

        m
    });

/// Turns a value into the number its range table is keyed by.
///
/// Digits are read as a decimal number. A single ASCII letter becomes its
/// character code. Anything else can't be checked against a range.
///
/// ```
/// use exif_container::converter::ranges::range_value;
///
/// assert_eq!(range_value("15"), Some(15));
/// assert_eq!(range_value("N"), Some(78));
/// assert_eq!(range_value("NS"), None);
/// assert_eq!(range_value("-1"), None);
/// ```
pub fn range_value(value: &str) -> Option<i64> {
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        return value.parse().ok();
    }

    match value.as_bytes() {
        [c] if c.is_ascii_alphabetic() => Some(*c as i64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{RANGES, range_value};
    use crate::util::logger;

    /// What a value means for a key, if the key has a range table.
    fn describe(key: &str, value: i64) -> Option<&'static str> {
        RANGES
            .get(key)?
            .iter()
            .find(|(v, _)| *v == value)
            .map(|(_, meaning)| *meaning)
    }

    #[test]
    fn letters_and_numbers() {
        logger();

        assert_eq!(range_value("0"), Some(0));
        assert_eq!(range_value("65535"), Some(65535));
        assert_eq!(range_value("z"), Some(b'z' as i64));
        assert_eq!(range_value(""), None);
        assert_eq!(range_value("1.5"), None);
        assert_eq!(range_value("é"), None);

        // too big for i64
        assert_eq!(range_value("99999999999999999999"), None);
    }

    #[test]
    fn meanings() {
        logger();

        assert_eq!(describe("Orientation", 6), Some("right, top"));
        assert_eq!(describe("GPSLatitudeRef", b'S' as i64), Some("South"));
        assert_eq!(describe("Flash", 0x02), None);
        assert_eq!(describe("Make", 1), None);
    }

    #[test]
    fn shared_tables() {
        logger();

        assert_eq!(RANGES.get("Contrast"), RANGES.get("Sharpness"));
        assert_eq!(
            RANGES.get("ResolutionUnit"),
            RANGES.get("FocalPlaneResolutionUnit")
        );
    }
}
