use crate::error::ErrorCode;

/// Why a value was refused.
#[derive(Clone, Debug, PartialEq, PartialOrd, Hash)]
pub enum ConvertError {
    /// The key isn't in the permission table.
    UnsupportedKey { key: String },

    /// The key can be read, but not modified.
    ReadOnly { key: String },

    /// The key has format rules, and the value matched none of them.
    BadFormat { key: String, value: String },

    /// The key has a range table, and the value isn't in it (or isn't a
    /// number or letter at all).
    OutOfRange { key: String, value: String },
}

impl ConvertError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ConvertError::UnsupportedKey { .. }
            | ConvertError::ReadOnly { .. }
            | ConvertError::BadFormat { .. } => ErrorCode::ValueFormatUnsupported,
            ConvertError::OutOfRange { .. } => ErrorCode::ValueOutOfRange,
        }
    }
}

impl core::fmt::Display for ConvertError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConvertError::UnsupportedKey { key } => write!(f, "Key `{key}` isn't supported."),
            ConvertError::ReadOnly { key } => write!(f, "Key `{key}` is read-only."),
            ConvertError::BadFormat { key, value } => {
                write!(f, "Value `{value}` has the wrong format for key `{key}`.")
            }
            ConvertError::OutOfRange { key, value } => {
                write!(f, "Value `{value}` is out of range for key `{key}`.")
            }
        }
    }
}

impl core::error::Error for ConvertError {}
