// ============================================================================
// Fixed-Point Value
// N-dimensional fixed-point data sharing one format and one pair of modes
// ============================================================================

use super::errors::{FixedError, FixedResult};
use super::format::FixedFormat;
use super::overflow::OverflowMode;
use super::rounding::RoundingMode;
use super::shape::{IntoReal, Shape, ShapedVec};
use crate::domain::FixedMath;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use std::fmt;

/// One or more fixed-point numbers sharing a format, a rounding mode and an
/// overflow mode.
///
/// Every way of producing data (construction, arithmetic, element writes,
/// format changes) runs the same pipeline:
///
/// 1. scale by `2^frac_bits`
/// 2. round onto the integer lattice ([`RoundingMode`])
/// 3. bring the integer into range ([`OverflowMode`])
/// 4. descale
///
/// so `data` only ever holds representable values. `data` is the canonical
/// form; integer, binary and hex forms are derived from it on demand.
///
/// # Example
/// ```
/// use hdl_fixed::numeric::{FixedFormat, FixedValue, OverflowMode, RoundingMode};
///
/// let q = FixedFormat::new(true, 0, 4).unwrap();
/// let x = FixedValue::new(2.6 / 16.0, q, RoundingMode::SymInf, OverflowMode::Wrap).unwrap();
/// assert_eq!(x.data(), &[3.0 / 16.0]);
///
/// let y = FixedValue::new(2.0, q, RoundingMode::SymZero, OverflowMode::Sat).unwrap();
/// assert_eq!(y.data(), &[0.9375]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FixedValue {
    format: FixedFormat,
    math: FixedMath,
    shape: Shape,
    data: Vec<f64>,
}

// ============================================================================
// Pipeline
// ============================================================================

/// Scale and round `x`, then apply overflow: the stored lattice integer.
#[inline]
fn lattice_int(x: f64, format: &FixedFormat, math: FixedMath) -> i128 {
    let rounded = math.rounding.round(x * format.scale());
    math.overflow.apply_rounded(rounded, format)
}

/// Full pipeline for one element.
#[inline]
pub(crate) fn quantize(x: f64, format: &FixedFormat, math: FixedMath) -> f64 {
    lattice_int(x, format, math) as f64 / format.scale()
}

fn check_finite(data: &[f64]) -> FixedResult<()> {
    if data.iter().all(|x| x.is_finite()) {
        Ok(())
    } else {
        Err(FixedError::InvalidValue("non-finite sample"))
    }
}

impl FixedValue {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Quantize `values` into `format`.
    ///
    /// # Errors
    /// `InvalidValue` for NaN or infinite samples, ragged rows, or a shape
    /// that the data does not fill.
    pub fn new(
        values: impl IntoReal,
        format: FixedFormat,
        rounding: RoundingMode,
        overflow: OverflowMode,
    ) -> FixedResult<Self> {
        Self::with_math(values, format, FixedMath::new(rounding, overflow))
    }

    /// Quantize `values` with a preconfigured mode pair.
    pub fn with_math(values: impl IntoReal, format: FixedFormat, math: FixedMath) -> FixedResult<Self> {
        let (shape, data) = values.into_real()?.into_parts();
        check_finite(&data)?;
        Ok(Self::quantized(shape, data, format, math))
    }

    /// Quantize with `SymZero` rounding and `Wrap` overflow.
    pub fn with_defaults(values: impl IntoReal, format: FixedFormat) -> FixedResult<Self> {
        Self::with_math(values, format, FixedMath::default())
    }

    /// Quantize decimal input (1-D).
    ///
    /// # Errors
    /// `InvalidValue` if a decimal has no `f64` counterpart.
    pub fn from_decimals(
        values: &[Decimal],
        format: FixedFormat,
        math: FixedMath,
    ) -> FixedResult<Self> {
        let data = values
            .iter()
            .map(|d| d.to_f64().ok_or(FixedError::InvalidValue("decimal out of range")))
            .collect::<FixedResult<Vec<f64>>>()?;
        Self::with_math(data, format, math)
    }

    /// Run the pipeline over finite real data.
    pub(crate) fn quantized(
        shape: Shape,
        mut data: Vec<f64>,
        format: FixedFormat,
        math: FixedMath,
    ) -> Self {
        for x in data.iter_mut() {
            *x = quantize(*x, &format, math);
        }
        Self {
            format,
            math,
            shape,
            data,
        }
    }

    /// Wrap data that is already on the lattice of `format`.
    pub(crate) fn from_lattice(
        shape: Shape,
        data: Vec<f64>,
        format: FixedFormat,
        math: FixedMath,
    ) -> Self {
        debug_assert_eq!(shape.len(), data.len());
        Self {
            format,
            math,
            shape,
            data,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn format(&self) -> FixedFormat {
        self.format
    }

    /// Rounding and overflow modes as a pair.
    #[inline]
    pub fn fimath(&self) -> FixedMath {
        self.math
    }

    #[inline]
    pub fn rounding_mode(&self) -> RoundingMode {
        self.math.rounding
    }

    #[inline]
    pub fn overflow_mode(&self) -> OverflowMode {
        self.math.overflow
    }

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Stored values in row-major order.
    #[inline]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Stored values with their shape.
    pub fn to_shaped(&self) -> ShapedVec<f64> {
        ShapedVec::from_parts(self.shape.clone(), self.data.clone())
    }

    /// Stored values as decimals.
    ///
    /// # Errors
    /// `InvalidValue` if a value exceeds the decimal range.
    pub fn to_decimals(&self) -> FixedResult<ShapedVec<Decimal>> {
        let data = self
            .data
            .iter()
            .map(|&x| {
                Decimal::from_f64_retain(x)
                    .or_else(|| Decimal::from_f64(x))
                    .ok_or(FixedError::InvalidValue("value exceeds decimal range"))
            })
            .collect::<FixedResult<Vec<Decimal>>>()?;
        Ok(ShapedVec::from_parts(self.shape.clone(), data))
    }

    // ========================================================================
    // Format Changes
    // ========================================================================

    /// Re-quantize into another format.
    ///
    /// Modes left as `None` keep their current setting. Narrowing may lose
    /// precision or saturate/wrap according to the resulting modes.
    pub fn change_format(
        &self,
        format: FixedFormat,
        rounding: Option<RoundingMode>,
        overflow: Option<OverflowMode>,
    ) -> Self {
        let math = FixedMath::new(
            rounding.unwrap_or(self.math.rounding),
            overflow.unwrap_or(self.math.overflow),
        );
        tracing::trace!(from = %self.format, to = %format, %math, "changing fixed-point format");
        Self::quantized(self.shape.clone(), self.data.clone(), format, math)
    }

    /// Re-quantize into another format with a mode pair.
    pub fn cast(&self, format: FixedFormat, math: FixedMath) -> Self {
        self.change_format(format, Some(math.rounding), Some(math.overflow))
    }
}

impl IntoReal for &FixedValue {
    fn into_real(self) -> FixedResult<ShapedVec<f64>> {
        Ok(self.to_shaped())
    }
}

impl fmt::Display for FixedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:?}", self.data)?;
        writeln!(f, "  shape: {}", self.shape)?;
        writeln!(f, "  fmt: {}", self.format)?;
        writeln!(f, "  rnd: {}", self.math.rounding)?;
        write!(f, "  over: {}", self.math.overflow)
    }
}

// ============================================================================
// Tests
// ============================================================================
