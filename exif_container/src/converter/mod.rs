//! Checks values before they're written, and rewrites them into the form the
//! codec expects.
//!
//! Every write passes through the same gates, in order:
//!
//! 1. the key must be supported,
//! 1. the key must be writable,
//! 1. the value must match one of the key's format rules (if it has any),
//!    and
//! 1. the value must be in the key's range table (if it has one).
//!
//! Format and range failures have different error codes, so a UI can tell
//! users *what* was wrong.

pub mod error;
pub mod permissions;
pub mod ranges;
pub mod rules;

use self::{
    error::ConvertError,
    permissions::{PERMISSIONS, Permission},
    ranges::{RANGES, range_value},
    rules::{FORMAT_RULES, Rule, VALIDATION_RULES},
};

/// Validates and normalizes values by key name.
///
/// All of its tables are built once and never change, so this holds no
/// state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ValueConverter;

impl ValueConverter {
    /// Whether the key is known at all.
    pub fn is_key_supported(key: &str) -> bool {
        PERMISSIONS.contains_key(key)
    }

    /// Whether the key may be written.
    pub fn is_modify_allowed(key: &str) -> bool {
        PERMISSIONS.get(key) == Some(&Permission::ReadWrite)
    }

    /// Checks a value and returns it in the form the codec wants.
    ///
    /// ```
    /// use exif_container::converter::ValueConverter;
    ///
    /// assert_eq!(ValueConverter::convert("ApertureValue", "4").unwrap(), "4/1");
    /// assert_eq!(ValueConverter::convert("BitsPerSample", "9,9,8").unwrap(), "9 9 8");
    /// assert!(ValueConverter::convert("GPSLatitudeRef", "C").is_err());
    /// ```
    pub fn convert(key: &str, value: &str) -> Result<String, ConvertError> {
        Self::check_key(key)?;
        let normalized = Self::check_format(key, value, FORMAT_RULES.get(key).copied())?;
        Self::check_range(key, value)?;

        log::trace!("Converted `{key}`: `{value}` -> `{normalized}`");
        Ok(normalized)
    }

    /// Checks a value without rewriting it.
    ///
    /// This uses a smaller, stricter rule table than [`Self::convert`].
    pub fn validate(key: &str, value: &str) -> Result<(), ConvertError> {
        Self::check_key(key)?;
        Self::check_format(key, value, VALIDATION_RULES.get(key).copied())?;
        Self::check_range(key, value)
    }

    fn check_key(key: &str) -> Result<(), ConvertError> {
        match PERMISSIONS.get(key) {
            None => {
                log::debug!("Key `{key}` isn't supported.");
                Err(ConvertError::UnsupportedKey {
                    key: key.to_owned(),
                })
            }
            Some(Permission::ReadOnly) => {
                log::debug!("Key `{key}` can't be modified.");
                Err(ConvertError::ReadOnly {
                    key: key.to_owned(),
                })
            }
            Some(Permission::ReadWrite) => Ok(()),
        }
    }

    /// Keys without rules take any value as-is.
    fn check_format(
        key: &str,
        value: &str,
        rules: Option<&'static [Rule]>,
    ) -> Result<String, ConvertError> {
        let Some(rules) = rules else {
            return Ok(value.to_owned());
        };

        rules.iter().find_map(|r| r.apply(value)).ok_or_else(|| {
            log::debug!("Value `{value}` matches no format rule for `{key}`.");
            ConvertError::BadFormat {
                key: key.to_owned(),
                value: value.to_owned(),
            }
        })
    }

    /// Keys without a range table take any value.
    fn check_range(key: &str, value: &str) -> Result<(), ConvertError> {
        let Some(table) = RANGES.get(key) else {
            return Ok(());
        };

        let in_range: bool =
            range_value(value).is_some_and(|v| table.iter().any(|(allowed, _)| *allowed == v));
        if !in_range {
            log::debug!("Value `{value}` is out of range for `{key}`.");
            return Err(ConvertError::OutOfRange {
                key: key.to_owned(),
                value: value.to_owned(),
            });
        }
        Ok(())
    }
}

/// Greatest common divisor.
const fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Turns a decimal string into a reduced fraction.
///
/// Returns `None` for anything that isn't plain digits with an optional
/// fractional part, or that's too precise to fit.
///
/// ```
/// use exif_container::converter::decimal_to_rational;
///
/// assert_eq!(decimal_to_rational("2.5").as_deref(), Some("5/2"));
/// assert_eq!(decimal_to_rational("0.004").as_deref(), Some("1/250"));
/// assert_eq!(decimal_to_rational("7").as_deref(), Some("7/1"));
/// assert_eq!(decimal_to_rational("-2.5"), None);
/// ```
pub fn decimal_to_rational(decimal: &str) -> Option<String> {
    let (int_part, frac_part) = decimal.split_once('.').unwrap_or((decimal, ""));
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if int_part.is_empty() || !all_digits(int_part) || !all_digits(frac_part) {
        return None;
    }
    if decimal.contains('.') && frac_part.is_empty() {
        return None;
    }

    let int: u64 = int_part.parse().ok()?;
    let frac: u64 = if frac_part.is_empty() {
        0
    } else {
        frac_part.parse().ok()?
    };
    let denominator: u64 = 10_u64.checked_pow(u32::try_from(frac_part.len()).ok()?)?;
    let numerator: u64 = int.checked_mul(denominator)?.checked_add(frac)?;

    let g = gcd(numerator, denominator);
    if g == 0 {
        return Some(format!("{numerator}/{denominator}"));
    }
    Some(format!("{}/{}", numerator / g, denominator / g))
}
