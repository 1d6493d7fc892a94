// ============================================================================
// Overflow Modes
// Brings rounded lattice integers back into the format's range
// ============================================================================

use super::errors::{FixedError, FixedResult};
use super::format::FixedFormat;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Policy for lattice integers outside the representable range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OverflowMode {
    /// Clamp to the nearest bound
    Sat,
    /// Keep the low `bit_length` bits, two's complement for signed formats
    #[default]
    Wrap,
}

impl OverflowMode {
    /// Apply the policy to a rounded lattice integer.
    #[inline]
    pub fn apply(self, raw: i128, format: &FixedFormat) -> i128 {
        match self {
            OverflowMode::Sat => raw.clamp(format.min_raw(), format.max_raw()),
            OverflowMode::Wrap => reinterpret(raw as u128 & format.mask(), format),
        }
    }

    /// Apply the policy to a rounded real.
    ///
    /// `Wrap` reduces the exact integer, so reals beyond the `i128` range
    /// still keep their low `bit_length` bits.
    #[inline]
    pub fn apply_rounded(self, rounded: f64, format: &FixedFormat) -> i128 {
        match self {
            OverflowMode::Sat => self.apply(rounded as i128, format),
            OverflowMode::Wrap => reinterpret(low_bits(rounded) & format.mask(), format),
        }
    }

    /// Tag used in configuration files and stimulus headers.
    pub const fn as_str(self) -> &'static str {
        match self {
            OverflowMode::Sat => "Sat",
            OverflowMode::Wrap => "Wrap",
        }
    }
}

/// Low 128 bits of the two's complement of an integer-valued finite `f64`.
fn low_bits(x: f64) -> u128 {
    if x.abs() < 2f64.powi(127) {
        return x as i128 as u128;
    }
    // |x| >= 2^127: an exact mantissa times 2^exponent with exponent >= 75
    let bits = x.to_bits();
    let exponent = ((bits >> 52) & 0x7ff) as u32 - 1075;
    let mantissa = u128::from((bits & ((1u64 << 52) - 1)) | (1u64 << 52));
    let magnitude = mantissa.checked_shl(exponent).unwrap_or(0);
    if x.is_sign_negative() {
        magnitude.wrapping_neg()
    } else {
        magnitude
    }
}

/// Read a `bit_length`-bit pattern as a lattice integer of `format`.
///
/// For signed formats a set top bit carries weight `-2^(bit_length-1)`.
#[inline]
pub(crate) fn reinterpret(bits: u128, format: &FixedFormat) -> i128 {
    let bit_length = format.bit_length();
    let top_bit = 1u128 << (bit_length - 1);
    if format.signed() && bits & top_bit != 0 {
        bits.wrapping_sub(1u128 << bit_length) as i128
    } else {
        bits as i128
    }
}

impl fmt::Display for OverflowMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OverflowMode {
    type Err = FixedError;

    fn from_str(s: &str) -> FixedResult<Self> {
        match s.trim() {
            "Sat" => Ok(OverflowMode::Sat),
            "Wrap" => Ok(OverflowMode::Wrap),
            _ => Err(FixedError::InvalidOverflowMode(s.to_string())),
        }
    }
}
