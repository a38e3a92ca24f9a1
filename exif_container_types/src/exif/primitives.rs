/// An enumeration of the TIFF field types.
///
/// Used in each IFD entry to say how its value bytes are laid out.
#[repr(u16)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum PrimitiveTy {
    Byte = 1,
    Ascii = 2,
    Short = 3,
    Long = 4,
    Rational = 5,
    SByte = 6,
    Undefined = 7,
    SShort = 8,
    SLong = 9,
    SRational = 10,
    Float = 11,
    Double = 12,
    Utf8 = 129,
}

impl PrimitiveTy {
    /// Grabs the primitive type's size in bytes.
    ///
    /// ```
    /// use exif_container_types::exif::primitives::PrimitiveTy;
    ///
    /// let slong: PrimitiveTy = PrimitiveTy::SLong;
    /// assert_eq!(slong.size_bytes(), 4_u8);
    /// ```
    pub const fn size_bytes(&self) -> u8 {
        match self {
            PrimitiveTy::Byte
            | PrimitiveTy::Ascii
            | PrimitiveTy::SByte
            | PrimitiveTy::Undefined
            | PrimitiveTy::Utf8 => 1_u8,
            PrimitiveTy::Short | PrimitiveTy::SShort => 2_u8,
            PrimitiveTy::Long | PrimitiveTy::SLong | PrimitiveTy::Float => 4_u8,
            PrimitiveTy::Rational | PrimitiveTy::SRational | PrimitiveTy::Double => 8_u8,
        }
    }

    /// The raw type code written in an IFD entry.
    pub const fn code(&self) -> u16 {
        *self as u16
    }
}

impl TryFrom<u16> for PrimitiveTy {
    type Error = ();

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Byte),
            2 => Ok(Self::Ascii),
            3 => Ok(Self::Short),
            4 => Ok(Self::Long),
            5 => Ok(Self::Rational),
            6 => Ok(Self::SByte),
            7 => Ok(Self::Undefined),
            8 => Ok(Self::SShort),
            9 => Ok(Self::SLong),
            10 => Ok(Self::SRational),
            11 => Ok(Self::Float),
            12 => Ok(Self::Double),
            129 => Ok(Self::Utf8),

            _ => Err(()),
        }
    }
}

/// How many primitives a tag's value holds.
#[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum PrimitiveCount {
    /// Exactly this many.
    Known(u32),

    /// Any number, decided by the writer (text, opaque blobs, lists).
    Any,
}

/// A fraction that can't be negative.
///
/// Written as `numerator/denominator` in converter strings, like `"5/2"`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub struct Rational {
    pub numerator: u32,
    pub denominator: u32,
}

/// A signed fraction.
///
/// Both the numerator (top number) and denominator (bottom number) can be
/// negative.
#[repr(C)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub struct SRational {
    pub numerator: i32,
    pub denominator: i32,
}

impl core::fmt::Display for Rational {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl core::fmt::Display for SRational {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl core::str::FromStr for Rational {
    type Err = ();

    /// Parses `"n/d"`, or a bare integer `"n"` as `n/1`.
    ///
    /// ```
    /// use exif_container_types::exif::primitives::Rational;
    ///
    /// assert_eq!("5/2".parse(), Ok(Rational { numerator: 5, denominator: 2 }));
    /// assert_eq!("7".parse(), Ok(Rational { numerator: 7, denominator: 1 }));
    /// assert!("1/x".parse::<Rational>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (n, d) = s.split_once('/').unwrap_or((s, "1"));
        Ok(Rational {
            numerator: n.trim().parse().map_err(|_| ())?,
            denominator: d.trim().parse().map_err(|_| ())?,
        })
    }
}

impl core::str::FromStr for SRational {
    type Err = ();

    /// Parses `"n/d"` (either side may be negative), or a bare integer.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (n, d) = s.split_once('/').unwrap_or((s, "1"));
        Ok(SRational {
            numerator: n.trim().parse().map_err(|_| ())?,
            denominator: d.trim().parse().map_err(|_| ())?,
        })
    }
}
