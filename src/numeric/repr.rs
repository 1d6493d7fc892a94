// ============================================================================
// Representations
// Integer, binary and hex views of stored values, and the reverse mapping
// ============================================================================

use super::errors::{FixedError, FixedResult};
use super::format::{FixedFormat, FormatTuple};
use super::overflow::reinterpret;
use super::shape::ShapedVec;
use super::value::FixedValue;
use crate::domain::FixedMath;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Textual base for rendering lattice integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Radix {
    /// `0b` prefix, exactly `bit_length` digits
    Bin,
    /// `0x` prefix, `ceil(bit_length / 4)` lowercase digits
    Hex,
    /// Decimal bit pattern
    Int,
    /// Real value
    Float,
}

impl Radix {
    pub const fn as_str(self) -> &'static str {
        match self {
            Radix::Bin => "bin",
            Radix::Hex => "hex",
            Radix::Int => "int",
            Radix::Float => "float",
        }
    }
}

impl fmt::Display for Radix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Radix {
    type Err = FixedError;

    fn from_str(s: &str) -> FixedResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bin" => Ok(Radix::Bin),
            "hex" => Ok(Radix::Hex),
            "int" => Ok(Radix::Int),
            "float" => Ok(Radix::Float),
            _ => Err(FixedError::InvalidRadix(s.to_string())),
        }
    }
}

/// Render one lattice integer of `format`.
///
/// Bin, Hex and Int show the two's-complement bit pattern; Float shows the
/// real value.
pub(crate) fn render_raw(raw: i128, format: &FixedFormat, radix: Radix) -> String {
    let bits = raw as u128 & format.mask();
    let bit_length = format.bit_length() as usize;
    match radix {
        Radix::Bin => format!("0b{:0width$b}", bits, width = bit_length),
        Radix::Hex => format!("0x{:0width$x}", bits, width = bit_length.div_ceil(4)),
        Radix::Int => bits.to_string(),
        Radix::Float => (raw as f64 / format.scale()).to_string(),
    }
}

// ============================================================================
// Integer Input
// ============================================================================

/// Integers accepted by [`FixedValue::from_int_repr`].
///
/// Signed inputs contribute their two's-complement bits, so `-3` and the
/// pattern of `-3` in the target width land on the same lattice point.
pub trait LatticeBits: Copy {
    fn to_bits(self) -> u128;
}

macro_rules! lattice_bits_signed {
    ($($t:ty),*) => {
        $(impl LatticeBits for $t {
            #[inline]
            fn to_bits(self) -> u128 {
                self as i128 as u128
            }
        })*
    };
}

macro_rules! lattice_bits_unsigned {
    ($($t:ty),*) => {
        $(impl LatticeBits for $t {
            #[inline]
            fn to_bits(self) -> u128 {
                self as u128
            }
        })*
    };
}

lattice_bits_signed!(i8, i16, i32, i64, i128);
lattice_bits_unsigned!(u8, u16, u32, u64, u128);

/// Containers of integers accepted by [`FixedValue::from_int_repr`].
pub trait IntoLatticeBits {
    fn into_bits(self) -> ShapedVec<u128>;
}

impl<T: LatticeBits> IntoLatticeBits for ShapedVec<T> {
    fn into_bits(self) -> ShapedVec<u128> {
        self.map(|i| i.to_bits())
    }
}

impl<T: LatticeBits> IntoLatticeBits for &ShapedVec<T> {
    fn into_bits(self) -> ShapedVec<u128> {
        self.map(|i| i.to_bits())
    }
}

impl<T: LatticeBits> IntoLatticeBits for Vec<T> {
    fn into_bits(self) -> ShapedVec<u128> {
        ShapedVec::from(self.into_iter().map(T::to_bits).collect::<Vec<_>>())
    }
}

impl<T: LatticeBits> IntoLatticeBits for &[T] {
    fn into_bits(self) -> ShapedVec<u128> {
        ShapedVec::from(self.iter().map(|i| i.to_bits()).collect::<Vec<_>>())
    }
}

// ============================================================================
// Views
// ============================================================================

impl FixedValue {
    /// Signed lattice integers (`value * 2^frac_bits`).
    pub fn raw_ints(&self) -> ShapedVec<i128> {
        let scale = self.format().scale();
        ShapedVec::from_parts(
            self.shape().clone(),
            self.data().iter().map(|&x| (x * scale) as i128).collect(),
        )
    }

    /// Unsigned `bit_length`-bit patterns, as written to stimulus files.
    pub fn intfmt(&self) -> ShapedVec<u128> {
        let mask = self.format().mask();
        self.raw_ints().map(|&raw| raw as u128 & mask)
    }

    /// `0b`-prefixed patterns of exactly `bit_length` digits.
    pub fn binfmt(&self) -> ShapedVec<String> {
        self.to_strings(Radix::Bin)
    }

    /// `0x`-prefixed zero-padded lowercase patterns.
    pub fn hexfmt(&self) -> ShapedVec<String> {
        self.to_strings(Radix::Hex)
    }

    /// Every element rendered in `radix`.
    pub fn to_strings(&self, radix: Radix) -> ShapedVec<String> {
        let format = self.format();
        self.raw_ints().map(|&raw| render_raw(raw, &format, radix))
    }

    /// Rebuild a value from lattice integers or bit patterns.
    ///
    /// Each integer is cut to `bit_length` bits and read in two's complement
    /// for signed formats. No rounding takes place; the result carries the
    /// default modes.
    ///
    /// # Errors
    /// `InvalidFormat` if the tuple does not describe a valid format.
    ///
    /// # Example
    /// ```
    /// use hdl_fixed::numeric::FixedValue;
    ///
    /// let x = FixedValue::from_int_repr(vec![1u32, 1152, 1024], (true, 3, 7)).unwrap();
    /// assert_eq!(x.data(), &[0.0078125, -7.0, -8.0]);
    /// ```
    pub fn from_int_repr(ints: impl IntoLatticeBits, format: FormatTuple) -> FixedResult<Self> {
        let format = FixedFormat::try_from(format)?;
        let (shape, bits) = ints.into_bits().into_parts();
        let scale = format.scale();
        let mask = format.mask();
        let data = bits
            .into_iter()
            .map(|b| reinterpret(b & mask, &format) as f64 / scale)
            .collect();
        Ok(Self::from_lattice(shape, data, format, FixedMath::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::{OverflowMode, RoundingMode};

    fn s3_7_sample() -> FixedValue {
        let format = FixedFormat::new(true, 3, 7).unwrap();
        FixedValue::new(
            vec![0.0078125, 7.724, -3.72455, -7.0, 0.0, -8.0],
            format,
            RoundingMode::SymZero,
            OverflowMode::Wrap,
        )
        .unwrap()
    }

    #[test]
    fn test_binfmt() {
        assert_eq!(
            s3_7_sample().binfmt().into_vec(),
            vec![
                "0b00000000001",
                "0b01111011101",
                "0b11000100011",
                "0b10010000000",
                "0b00000000000",
                "0b10000000000",
            ]
        );
    }

    #[test]
    fn test_hexfmt() {
        assert_eq!(
            s3_7_sample().hexfmt().into_vec(),
            vec!["0x001", "0x3dd", "0x623", "0x480", "0x000", "0x400"]
        );
    }

    #[test]
    fn test_intfmt() {
        assert_eq!(
            s3_7_sample().intfmt().into_vec(),
            vec![1, 989, 1571, 1152, 0, 1024]
        );
        assert_eq!(
            s3_7_sample().raw_ints().into_vec(),
            vec![1, 989, -477, -896, 0, -1024]
        );
    }

    #[test]
    fn test_int_repr_roundtrip() {
        let value = s3_7_sample();
        let back = FixedValue::from_int_repr(value.intfmt(), value.format().tuple()).unwrap();
        assert_eq!(back.data(), value.data());
        assert_eq!(back.fimath(), FixedMath::default());
    }

    #[test]
    fn test_int_repr_accepts_signed_integers() {
        let value = FixedValue::from_int_repr(vec![-477i64, -1024, 1023], (true, 3, 7)).unwrap();
        assert_eq!(value.data(), &[-477.0 / 128.0, -8.0, 1023.0 / 128.0]);
    }

    #[test]
    fn test_int_repr_keeps_shape() {
        let ints = ShapedVec::from_shape_vec(&[2, 2], vec![0u8, 1, 2, 3]).unwrap();
        let value = FixedValue::from_int_repr(ints, (false, 0, 2)).unwrap();
        assert_eq!(value.shape().dims(), &[2, 2]);
        assert_eq!(value.data(), &[0.0, 0.25, 0.5, 0.75]);
    }

    #[test]
    fn test_int_repr_invalid_format() {
        assert!(matches!(
            FixedValue::from_int_repr(vec![1u32], (false, 0, 0)),
            Err(FixedError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_radix_tags() {
        assert_eq!("HEX".parse::<Radix>().unwrap(), Radix::Hex);
        assert_eq!(Radix::Float.to_string(), "float");
        assert_eq!(
            "oct".parse::<Radix>(),
            Err(FixedError::InvalidRadix("oct".to_string()))
        );
    }

    #[test]
    fn test_float_strings() {
        let value = FixedValue::with_defaults(vec![0.5, -1.25], FixedFormat::new(true, 2, 2).unwrap())
            .unwrap();
        assert_eq!(value.to_strings(Radix::Float).into_vec(), vec!["0.5", "-1.25"]);
    }
}
