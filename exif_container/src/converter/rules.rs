//! Format rules: what a value must look like, and how it's rewritten.
//!
//! Each rule is a [`Shape`] (checked with small `winnow` parsers) plus a
//! [`Normalizer`]. A key's rules are tried in order, and the first shape that
//! matches the whole value wins.

use std::sync::LazyLock;

use rustc_hash::FxHashMap;
use winnow::{
    Parser as _,
    ascii::digit1,
    combinator::opt,
    error::EmptyError,
    token::{one_of, take_while},
};

use super::decimal_to_rational;

/// What goes between the numbers of a list.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Sep {
    /// One whitespace character.
    Blank,
    Comma,
    Colon,
    Dot,
}

impl Sep {
    fn matches(self, c: char) -> bool {
        match self {
            Sep::Blank => c.is_whitespace(),
            Sep::Comma => c == ',',
            Sep::Colon => c == ':',
            Sep::Dot => c == '.',
        }
    }
}

/// The shape a value must have.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Shape {
    /// `n` unsigned integers. When `positive`, none may be zero or start
    /// with a zero.
    Ints { n: usize, sep: Sep, positive: bool },

    /// `n` blank-separated rationals, like `39/1 54/1 20/1`. Denominators
    /// are positive.
    Rationals { n: usize },

    /// `n` decimals, like `2.5` or `7`.
    Decimals { n: usize, sep: Sep },

    /// `YYYY:MM:DD HH:MM:SS`
    DateTime,

    /// `YYYY:MM:DD`
    Date,
}

impl Shape {
    /// Whether the entire value has this shape.
    pub fn matches(self, value: &str) -> bool {
        let input: &mut &str = &mut &*value;
        let parsed: Option<()> = match self {
            Shape::Ints { n, sep, positive } => list(input, n, sep, |i| int(i, positive)),
            Shape::Rationals { n } => list(input, n, Sep::Blank, rational),
            Shape::Decimals { n, sep } => list(input, n, sep, decimal),
            Shape::DateTime => date(input)
                .and_then(|_| separator(input, Sep::Blank))
                .and_then(|_| time(input)),
            Shape::Date => date(input),
        };
        parsed.is_some() && input.is_empty()
    }

    fn sep(self) -> Sep {
        match self {
            Shape::Ints { sep, .. } | Shape::Decimals { sep, .. } => sep,
            Shape::Rationals { .. } | Shape::DateTime | Shape::Date => Sep::Blank,
        }
    }
}

fn list(
    input: &mut &str,
    n: usize,
    sep: Sep,
    mut item: impl FnMut(&mut &str) -> Option<()>,
) -> Option<()> {
    for i in 0..n {
        if i > 0 {
            separator(input, sep)?;
        }
        item(input)?;
    }
    Some(())
}

fn separator(input: &mut &str, sep: Sep) -> Option<()> {
    one_of::<_, _, EmptyError>(move |c: char| sep.matches(c))
        .void()
        .parse_next(input)
        .ok()
}

fn int(input: &mut &str, positive: bool) -> Option<()> {
    let digits: &str = digit1::<_, EmptyError>.parse_next(input).ok()?;
    (!positive || !digits.starts_with('0')).then_some(())
}

fn rational(input: &mut &str) -> Option<()> {
    int(input, false)?;
    '/'.void().parse_next(input).map_err(|_: EmptyError| ()).ok()?;
    int(input, true)
}

fn decimal(input: &mut &str) -> Option<()> {
    (digit1, opt(('.', digit1)))
        .void()
        .parse_next(input)
        .map_err(|_: EmptyError| ())
        .ok()
}

fn fixed_digits(input: &mut &str, n: usize) -> Option<()> {
    take_while::<_, _, EmptyError>(n..=n, |c: char| c.is_ascii_digit())
        .void()
        .parse_next(input)
        .ok()
}

fn date(input: &mut &str) -> Option<()> {
    fixed_digits(input, 4)?;
    separator(input, Sep::Colon)?;
    fixed_digits(input, 2)?;
    separator(input, Sep::Colon)?;
    fixed_digits(input, 2)
}

fn time(input: &mut &str) -> Option<()> {
    fixed_digits(input, 2)?;
    separator(input, Sep::Colon)?;
    fixed_digits(input, 2)?;
    separator(input, Sep::Colon)?;
    fixed_digits(input, 2)
}

/// How a matching value is rewritten.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Normalizer {
    /// Left alone.
    Keep,

    /// Separators become spaces. `9,9,8` becomes `9 9 8`.
    SpaceSeparated,

    /// Every number becomes a reduced rational. `2.5,3` becomes `5/2 3/1`.
    Rationals,
}

impl Normalizer {
    fn apply(self, value: &str, sep: Sep) -> Option<String> {
        match self {
            Normalizer::Keep => Some(value.to_owned()),
            Normalizer::SpaceSeparated => Some(
                value
                    .chars()
                    .map(|c| if sep.matches(c) { ' ' } else { c })
                    .collect(),
            ),
            Normalizer::Rationals => {
                let parts: Vec<String> = value
                    .split(|c: char| !(c.is_ascii_digit() || c == '.'))
                    .filter(|s| !s.is_empty())
                    .map(decimal_to_rational)
                    .collect::<Option<_>>()?;
                Some(parts.join(" "))
            }
        }
    }
}

/// A shape and its normalizer.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct Rule {
    pub shape: Shape,
    pub normalizer: Normalizer,
}

impl Rule {
    const fn new(shape: Shape, normalizer: Normalizer) -> Self {
        Self { shape, normalizer }
    }

    /// The normalized value, if it has this rule's shape.
    pub fn apply(&self, value: &str) -> Option<String> {
        if !self.shape.matches(value) {
            return None;
        }
        self.normalizer.apply(value, self.shape.sep())
    }
}

use Normalizer as N;
use Sep as S;
use Shape as Sh;

const fn ints(n: usize, sep: Sep) -> Shape {
    Sh::Ints {
        n,
        sep,
        positive: false,
    }
}

const fn positive_ints(n: usize, sep: Sep) -> Shape {
    Sh::Ints {
        n,
        sep,
        positive: true,
    }
}

/// A single rational, integer, or decimal. Used by most rational tags.
const ONE_NUMBER: &[Rule] = &[
    Rule::new(Sh::Rationals { n: 1 }, N::Keep),
    Rule::new(ints(1, S::Blank), N::Rationals),
    Rule::new(Sh::Decimals { n: 1, sep: S::Blank }, N::Rationals),
];

/// Degrees, minutes, and seconds.
const THREE_RATIONALS: &[Rule] = &[
    Rule::new(Sh::Rationals { n: 3 }, N::Keep),
    Rule::new(positive_ints(3, S::Blank), N::Rationals),
    Rule::new(positive_ints(3, S::Comma), N::Rationals),
];

const YCBCR_COEFFICIENTS: &[Rule] = &[
    Rule::new(Sh::Rationals { n: 3 }, N::Keep),
    Rule::new(positive_ints(3, S::Blank), N::Rationals),
    Rule::new(positive_ints(3, S::Comma), N::Rationals),
    Rule::new(Sh::Decimals { n: 3, sep: S::Blank }, N::Rationals),
    Rule::new(Sh::Decimals { n: 3, sep: S::Comma }, N::Rationals),
];

const GPS_TIME_STAMP: &[Rule] = &[
    Rule::new(Sh::Rationals { n: 3 }, N::Keep),
    Rule::new(positive_ints(3, S::Blank), N::Rationals),
    Rule::new(positive_ints(3, S::Colon), N::Rationals),
];

const LENS_SPECIFICATION: &[Rule] = &[
    Rule::new(Sh::Rationals { n: 4 }, N::Keep),
    Rule::new(ints(4, S::Blank), N::Rationals),
    Rule::new(positive_ints(4, S::Comma), N::Rationals),
    Rule::new(Sh::Decimals { n: 4, sep: S::Blank }, N::Rationals),
    Rule::new(Sh::Decimals { n: 4, sep: S::Comma }, N::Rationals),
];

const DATE_TIME: &[Rule] = &[
    Rule::new(Sh::DateTime, N::Keep),
    Rule::new(Sh::Date, N::Keep),
];

const fn int_list(n: usize, alt: Sep) -> [Rule; 2] {
    [
        Rule::new(ints(n, S::Blank), N::Keep),
        Rule::new(ints(n, alt), N::SpaceSeparated),
    ]
}

const BITS_PER_SAMPLE: &[Rule] = &int_list(3, S::Comma);
const FOUR_INTS: &[Rule] = &int_list(4, S::Comma);
const GPS_VERSION_ID: &[Rule] = &int_list(4, S::Dot);
const DEFAULT_CROP_SIZE: &[Rule] = &int_list(2, S::Comma);

/// Rules used when converting a value before it's written.
pub static FORMAT_RULES: LazyLock<FxHashMap<&'static str, &'static [Rule]>> =
    LazyLock::new(|| {
        let mut m: FxHashMap<&'static str, &'static [Rule]> = FxHashMap::default();
        let mut i = |key: &'static str, rules: &'static [Rule]| m.insert(key, rules);

        i("BitsPerSample", BITS_PER_SAMPLE);
        i("DateTimeOriginal", DATE_TIME);
        i("DateTime", DATE_TIME);
        i("GPSDateStamp", &DATE_TIME[1..]);
        i("GPSTimeStamp", GPS_TIME_STAMP);
        i("GPSVersionID", GPS_VERSION_ID);
        i("DNGVersion", FOUR_INTS);
        i("DefaultCropSize", DEFAULT_CROP_SIZE);
        i("YCbCrCoefficients", YCBCR_COEFFICIENTS);
        i("LensSpecification", LENS_SPECIFICATION);

        for key in [
            "GPSLatitude",
            "GPSLongitude",
            "GPSDestLatitude",
            "GPSDestLongitude",
        ] {
            i(key, THREE_RATIONALS);
        }

        for key in [
            "CompressedBitsPerPixel",
            "ApertureValue",
            "ExposureBiasValue",
            "ExposureTime",
            "FNumber",
            "FocalLength",
            "XResolution",
            "YResolution",
            "WhitePoint",
            "PrimaryChromaticities",
            "ReferenceBlackWhite",
            "ShutterSpeedValue",
            "BrightnessValue",
            "MaxApertureValue",
            "SubjectDistance",
            "FlashEnergy",
            "FocalPlaneXResolution",
            "FocalPlaneYResolution",
            "ExposureIndex",
            "DigitalZoomRatio",
            "GPSAltitude",
            "GPSDOP",
            "GPSSpeed",
            "GPSTrack",
            "GPSImgDirection",
            "GPSDestBearing",
            "GPSDestDistance",
            "Gamma",
            "GPSHPositioningError",
        ] {
            i(key, ONE_NUMBER);
        }

        m
    });

const COMMA_INTS_3: &[Rule] = &[Rule::new(ints(3, S::Comma), N::Keep)];
const ONE_INT: &[Rule] = &[Rule::new(ints(1, S::Blank), N::Keep)];
const COMMA_COORDINATE: &[Rule] = &[
    Rule::new(ints(2, S::Comma), N::Keep),
    Rule::new(ints(3, S::Comma), N::Keep),
    Rule::new(Sh::Decimals { n: 3, sep: S::Comma }, N::Keep),
];

/// Rules used when only validating. Nothing is rewritten.
pub static VALIDATION_RULES: LazyLock<FxHashMap<&'static str, &'static [Rule]>> =
    LazyLock::new(|| {
        let mut m: FxHashMap<&'static str, &'static [Rule]> = FxHashMap::default();
        let mut i = |key: &'static str, rules: &'static [Rule]| m.insert(key, rules);

        i("BitsPerSample", COMMA_INTS_3);
        i("ImageLength", ONE_INT);
        i("ImageWidth", ONE_INT);
        i("GPSLatitude", COMMA_COORDINATE);
        i("GPSLongitude", COMMA_COORDINATE);

        m
    });

#[cfg(test)]
mod tests {
    use super::{FORMAT_RULES, Normalizer, Rule, Sep, Shape};
    use crate::util::logger;

    fn first_match(key: &str, value: &str) -> Option<String> {
        FORMAT_RULES.get(key)?.iter().find_map(|r| r.apply(value))
    }

    #[test]
    fn shapes() {
        logger();

        let three = Shape::Ints {
            n: 3,
            sep: Sep::Comma,
            positive: false,
        };
        assert!(three.matches("9,9,8"));
        assert!(three.matches("0,10,255"));
        assert!(!three.matches("9,9"));
        assert!(!three.matches("9,9,8,"));
        assert!(!three.matches("9 9 8"));

        let positive = Shape::Ints {
            n: 3,
            sep: Sep::Colon,
            positive: true,
        };
        assert!(positive.matches("12:30:45"));
        assert!(!positive.matches("12:30:05"));

        assert!(Shape::Rationals { n: 1 }.matches("4/1"));
        assert!(!Shape::Rationals { n: 1 }.matches("4/0"));
        assert!(!Shape::Rationals { n: 1 }.matches("4"));

        let decimals = Shape::Decimals {
            n: 2,
            sep: Sep::Blank,
        };
        assert!(decimals.matches("2.5 7"));
        assert!(!decimals.matches("2. 7"));
        assert!(!decimals.matches(".5 7"));

        assert!(Shape::DateTime.matches("2022:06:02 15:51:34"));
        assert!(!Shape::DateTime.matches("2022:06:02"));
        assert!(Shape::Date.matches("2022:06:02"));
        assert!(!Shape::Date.matches("2022-06-02"));
    }

    #[test]
    fn normalizers() {
        logger();

        let comma = Rule {
            shape: Shape::Ints {
                n: 3,
                sep: Sep::Comma,
                positive: false,
            },
            normalizer: Normalizer::SpaceSeparated,
        };
        assert_eq!(comma.apply("9,9,8").as_deref(), Some("9 9 8"));
        assert_eq!(comma.apply("9 9 8"), None);

        let rationals = Rule {
            shape: Shape::Decimals {
                n: 3,
                sep: Sep::Comma,
            },
            normalizer: Normalizer::Rationals,
        };
        assert_eq!(
            rationals.apply("2.5,23,3.4").as_deref(),
            Some("5/2 23/1 17/5")
        );
    }

    #[test]
    fn first_matching_rule_wins() {
        logger();

        assert_eq!(first_match("ApertureValue", "4").as_deref(), Some("4/1"));
        assert_eq!(first_match("ApertureValue", "4/1").as_deref(), Some("4/1"));
        assert_eq!(first_match("ApertureValue", "2.8").as_deref(), Some("14/5"));
        assert_eq!(first_match("ApertureValue", "f/2.8"), None);

        assert_eq!(
            first_match("GPSLatitude", "39,54,20").as_deref(),
            Some("39/1 54/1 20/1")
        );
        assert_eq!(
            first_match("GPSTimeStamp", "12:30:45").as_deref(),
            Some("12/1 30/1 45/1")
        );
        assert_eq!(
            first_match("GPSVersionID", "2.2.0.0").as_deref(),
            Some("2 2 0 0")
        );
        assert_eq!(
            first_match("LensSpecification", "1.5,3,1,2").as_deref(),
            Some("3/2 3/1 1/1 2/1")
        );
        assert_eq!(first_match("GPSDateStamp", "2022:06:02 15:51:34"), None);
    }
}
