/// Byte order of multi-byte values on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Endian {
    Little,
    Big,
}

impl Endian {
    /// Byte order of the host.
    #[cfg(target_endian = "little")]
    pub const NATIVE: Self = Self::Little;
    /// Byte order of the host.
    #[cfg(target_endian = "big")]
    pub const NATIVE: Self = Self::Big;

    /// Whether this is the byte order of the host.
    pub const fn is_native(self) -> bool {
        matches!(
            (self, Self::NATIVE),
            (Self::Little, Self::Little) | (Self::Big, Self::Big)
        )
    }
}

/// Representation of floating-point values on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FloatFormat {
    /// ISO/IEC 60559 binary32/binary64, byte order governed by [`Endian`].
    Iec559,
    /// Host representation copied as-is; byte order is ignored.
    Native,
}

/// Binary layout used when encoding and decoding typed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Format {
    endianness: Endian,
    float_format: FloatFormat,
}

impl Format {
    /// Little-endian integers and IEEE floats.
    pub const LITTLE_ENDIAN: Self = Self::new(Endian::Little, FloatFormat::Iec559);
    /// Big-endian ("network order") integers and IEEE floats.
    pub const BIG_ENDIAN: Self = Self::new(Endian::Big, FloatFormat::Iec559);

    /// Combine a byte order with a float representation.
    pub const fn new(endianness: Endian, float_format: FloatFormat) -> Self {
        Self {
            endianness,
            float_format,
        }
    }

    /// Byte order for integers and IEC 559 floats.
    pub const fn endianness(&self) -> Endian {
        self.endianness
    }

    /// How `f32`/`f64` values are laid out.
    pub const fn float_format(&self) -> FloatFormat {
        self.float_format
    }

    pub fn set_endianness(&mut self, endianness: Endian) {
        self.endianness = endianness;
    }

    pub fn set_float_format(&mut self, float_format: FloatFormat) {
        self.float_format = float_format;
    }
}

impl Default for Format {
    fn default() -> Self {
        Self::new(Endian::NATIVE, FloatFormat::Native)
    }
}
