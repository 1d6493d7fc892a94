// ============================================================================
// Fixed-Point Format
// Immutable descriptor of a fixed-point representation
// ============================================================================

use super::errors::{FixedError, FixedResult};
use super::repr::{render_raw, Radix};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Widest supported representation, sign bit included.
///
/// Lattice integers live in `i128`; keeping one bit of headroom lets the
/// unsigned maximum and the two's-complement reinterpretation both fit.
pub const MAX_BIT_LENGTH: u32 = 127;

/// `(signed, int_bits, frac_bits)` as exchanged with the file collaborator.
pub type FormatTuple = (bool, u32, u32);

/// Fixed-point format: signedness, integer bits and fractional bits.
///
/// A value in this format is an integer `k` of `bit_length` bits interpreted
/// as `k / 2^frac_bits`. Signed formats use two's complement.
///
/// # Example
/// ```
/// use hdl_fixed::numeric::FixedFormat;
///
/// let q = FixedFormat::new(true, 0, 4).unwrap();
/// assert_eq!(q.bit_length(), 5);
/// assert_eq!(q.range(), (-1.0, 0.9375));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "FormatTuple", into = "FormatTuple")
)]
pub struct FixedFormat {
    signed: bool,
    int_bits: u32,
    frac_bits: u32,
}

impl FixedFormat {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Create a format.
    ///
    /// # Errors
    /// Returns `InvalidFormat` when `int_bits + frac_bits == 0` or when the
    /// total width exceeds [`MAX_BIT_LENGTH`].
    pub fn new(signed: bool, int_bits: u32, frac_bits: u32) -> FixedResult<Self> {
        let invalid = FixedError::InvalidFormat {
            signed,
            int_bits,
            frac_bits,
        };

        let magnitude = int_bits.checked_add(frac_bits).ok_or(invalid.clone())?;
        if magnitude == 0 {
            return Err(invalid);
        }
        let bit_length = magnitude.checked_add(signed as u32).ok_or(invalid.clone())?;
        if bit_length > MAX_BIT_LENGTH {
            return Err(invalid);
        }

        Ok(Self {
            signed,
            int_bits,
            frac_bits,
        })
    }

    /// Format of a sum or difference: one extra integer bit for the carry.
    pub fn sum_of(a: &FixedFormat, b: &FixedFormat) -> FixedResult<Self> {
        Self::new(
            a.signed || b.signed,
            a.int_bits.max(b.int_bits).saturating_add(1),
            a.frac_bits.max(b.frac_bits),
        )
    }

    /// Format of a product.
    ///
    /// Integer and fractional widths add up; one guard bit is added when the
    /// product introduces a sign that only one operand had.
    pub fn product_of(a: &FixedFormat, b: &FixedFormat) -> FixedResult<Self> {
        let guard = u32::from(a.signed != b.signed);
        Self::new(
            a.signed || b.signed,
            a.int_bits.saturating_add(b.int_bits).saturating_add(guard),
            a.frac_bits.saturating_add(b.frac_bits),
        )
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub const fn signed(&self) -> bool {
        self.signed
    }

    #[inline]
    pub const fn int_bits(&self) -> u32 {
        self.int_bits
    }

    #[inline]
    pub const fn frac_bits(&self) -> u32 {
        self.frac_bits
    }

    /// Number of bits, sign bit included.
    #[inline]
    pub const fn bit_length(&self) -> u32 {
        self.signed as u32 + self.int_bits + self.frac_bits
    }

    /// `bit_length` ones, used for wrap-around truncation.
    #[inline]
    pub const fn mask(&self) -> u128 {
        (1u128 << self.bit_length()) - 1
    }

    /// `2^frac_bits`: converts real values to lattice integers.
    #[inline]
    pub fn scale(&self) -> f64 {
        2f64.powi(self.frac_bits as i32)
    }

    /// Distance between adjacent lattice points (`2^-frac_bits`).
    #[inline]
    pub fn resolution(&self) -> f64 {
        2f64.powi(-(self.frac_bits as i32))
    }

    /// Largest lattice integer.
    #[inline]
    pub const fn max_raw(&self) -> i128 {
        if self.signed {
            (1i128 << (self.bit_length() - 1)) - 1
        } else {
            self.mask() as i128
        }
    }

    /// Smallest lattice integer.
    #[inline]
    pub const fn min_raw(&self) -> i128 {
        if self.signed {
            -(1i128 << (self.bit_length() - 1))
        } else {
            0
        }
    }

    /// Largest representable value.
    pub fn max_value(&self) -> f64 {
        self.max_raw() as f64 / self.scale()
    }

    /// Smallest representable value.
    pub fn min_value(&self) -> f64 {
        self.min_raw() as f64 / self.scale()
    }

    /// `(min_value, max_value)`
    pub fn range(&self) -> (f64, f64) {
        (self.min_value(), self.max_value())
    }

    /// Whether `value` lies inside the representable range (ends included).
    pub fn contains(&self, value: f64) -> bool {
        self.min_value() <= value && value <= self.max_value()
    }

    /// Largest representable value rendered in `radix`.
    pub fn max_as(&self, radix: Radix) -> String {
        render_raw(self.max_raw(), self, radix)
    }

    /// Smallest representable value rendered in `radix`.
    pub fn min_as(&self, radix: Radix) -> String {
        render_raw(self.min_raw(), self, radix)
    }

    pub const fn tuple(&self) -> FormatTuple {
        (self.signed, self.int_bits, self.frac_bits)
    }
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl fmt::Display for FixedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.signed, self.int_bits, self.frac_bits)
    }
}

impl TryFrom<FormatTuple> for FixedFormat {
    type Error = FixedError;

    fn try_from((signed, int_bits, frac_bits): FormatTuple) -> FixedResult<Self> {
        Self::new(signed, int_bits, frac_bits)
    }
}

impl From<FixedFormat> for FormatTuple {
    fn from(format: FixedFormat) -> Self {
        format.tuple()
    }
}

impl FromStr for FixedFormat {
    type Err = FixedError;

    /// Parse the tuple text used in stimulus file headers.
    ///
    /// # Examples
    /// - "(True,2,7)"
    /// - "(false, 5, 2)"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FixedError::InvalidFormatText(s.to_string());

        let inner = s
            .trim()
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(invalid)?;

        let fields: Vec<&str> = inner.split(',').map(str::trim).collect();
        let [signed, int_bits, frac_bits] = fields.as_slice() else {
            return Err(invalid());
        };

        let signed = match signed.to_ascii_lowercase().as_str() {
            "true" | "1" => true,
            "false" | "0" => false,
            _ => return Err(invalid()),
        };
        let int_bits = int_bits.parse().map_err(|_| invalid())?;
        let frac_bits = frac_bits.parse().map_err(|_| invalid())?;

        Self::new(signed, int_bits, frac_bits)
    }
}

// ============================================================================
// Tests
// ============================================================================
