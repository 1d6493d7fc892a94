// ============================================================================
// Arithmetic and Comparison
// Element-wise operations with full-precision result formats
// ============================================================================

use super::errors::FixedResult;
use super::format::FixedFormat;
use super::shape::{broadcast_at, Shape, ShapedVec};
use super::value::FixedValue;
use crate::domain::{FixedMath, OutputCast};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Binary arithmetic operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Operation {
    Add,
    Sub,
    Mul,
}

impl Operation {
    #[inline]
    fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            Operation::Add => a + b,
            Operation::Sub => a - b,
            Operation::Mul => a * b,
        }
    }

    /// Full-precision format of the result.
    ///
    /// # Errors
    /// `InvalidFormat` if the derived width exceeds the supported maximum.
    pub fn result_format(self, a: &FixedFormat, b: &FixedFormat) -> FixedResult<FixedFormat> {
        match self {
            Operation::Add | Operation::Sub => FixedFormat::sum_of(a, b),
            Operation::Mul => FixedFormat::product_of(a, b),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Sub => "sub",
            Operation::Mul => "mul",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operands of a binary operation carried different modes.
///
/// The result always uses the left operand's modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeMismatch {
    pub operation: Operation,
    pub left: FixedMath,
    pub right: FixedMath,
}

/// Element-wise comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CmpOp {
    Lt,
    Le,
    Eq,
    Ne,
    Gt,
    Ge,
}

impl CmpOp {
    #[inline]
    fn test(self, a: f64, b: f64) -> bool {
        match self {
            CmpOp::Lt => a < b,
            CmpOp::Le => a <= b,
            CmpOp::Eq => a == b,
            CmpOp::Ne => a != b,
            CmpOp::Gt => a > b,
            CmpOp::Ge => a >= b,
        }
    }
}

// ============================================================================
// Comparison Operands
// ============================================================================

/// Right-hand side of an element-wise comparison.
///
/// Fixed-point operands compare by stored value; plain numbers compare as
/// given, without quantization.
pub trait Comparand {
    fn comparand(&self) -> (Shape, &[f64]);
}

impl Comparand for FixedValue {
    fn comparand(&self) -> (Shape, &[f64]) {
        (self.shape().clone(), self.data())
    }
}

impl Comparand for f64 {
    fn comparand(&self) -> (Shape, &[f64]) {
        (Shape::scalar(), std::slice::from_ref(self))
    }
}

impl Comparand for [f64] {
    fn comparand(&self) -> (Shape, &[f64]) {
        (Shape::new(&[self.len()]), self)
    }
}

impl Comparand for Vec<f64> {
    fn comparand(&self) -> (Shape, &[f64]) {
        (Shape::new(&[self.len()]), self)
    }
}

impl Comparand for ShapedVec<f64> {
    fn comparand(&self) -> (Shape, &[f64]) {
        (self.shape().clone(), self.as_slice())
    }
}

// ============================================================================
// Element-wise Operations
// ============================================================================

impl FixedValue {
    /// Apply `op` element-wise in full precision.
    ///
    /// The result format follows the sum/product rules and the result takes
    /// the left operand's modes. A [`ModeMismatch`] is returned alongside when
    /// the operands' modes differ, for the caller to report.
    ///
    /// # Errors
    /// `ShapeMismatch` for incompatible shapes; `InvalidFormat` if the derived
    /// format is too wide.
    pub fn combine(
        &self,
        rhs: &FixedValue,
        op: Operation,
    ) -> FixedResult<(FixedValue, Option<ModeMismatch>)> {
        let (shape, data) = self.zip_data(rhs, op)?;
        let format = op.result_format(&self.format(), &rhs.format())?;
        let mismatch = (self.fimath() != rhs.fimath()).then(|| ModeMismatch {
            operation: op,
            left: self.fimath(),
            right: rhs.fimath(),
        });
        Ok((
            FixedValue::quantized(shape, data, format, self.fimath()),
            mismatch,
        ))
    }

    /// Apply `op` element-wise and cast the exact result per `cast`.
    ///
    /// No mode check takes place: `cast` decides the result's modes.
    ///
    /// # Errors
    /// `ShapeMismatch` for incompatible shapes; `InvalidFormat` if `cast` has
    /// no format and the derived one is too wide.
    pub fn combine_with(
        &self,
        rhs: &FixedValue,
        op: Operation,
        cast: &OutputCast,
    ) -> FixedResult<FixedValue> {
        let (shape, data) = self.zip_data(rhs, op)?;
        let format = match cast.format {
            Some(format) => format,
            None => op.result_format(&self.format(), &rhs.format())?,
        };
        Ok(FixedValue::quantized(shape, data, format, cast.math))
    }

    fn zip_data(&self, rhs: &FixedValue, op: Operation) -> FixedResult<(Shape, Vec<f64>)> {
        let shape = self.shape().broadcast(rhs.shape())?;
        let (a, b) = (self.data(), rhs.data());
        let data = (0..shape.len())
            .map(|i| op.apply(broadcast_at(a, i), broadcast_at(b, i)))
            .collect();
        Ok((shape, data))
    }

    fn combine_logged(&self, rhs: &FixedValue, op: Operation) -> FixedResult<FixedValue> {
        let (value, mismatch) = self.combine(rhs, op)?;
        if let Some(m) = mismatch {
            tracing::warn!(
                operation = %m.operation,
                left = %m.left,
                right = %m.right,
                "operands have different modes, using the left operand's"
            );
        }
        Ok(value)
    }

    /// Element-wise sum in the derived sum format.
    pub fn checked_add(&self, rhs: &FixedValue) -> FixedResult<FixedValue> {
        self.combine_logged(rhs, Operation::Add)
    }

    /// Element-wise difference in the derived sum format.
    pub fn checked_sub(&self, rhs: &FixedValue) -> FixedResult<FixedValue> {
        self.combine_logged(rhs, Operation::Sub)
    }

    /// Element-wise product in the derived product format.
    pub fn checked_mul(&self, rhs: &FixedValue) -> FixedResult<FixedValue> {
        self.combine_logged(rhs, Operation::Mul)
    }

    pub fn add_with(&self, rhs: &FixedValue, cast: &OutputCast) -> FixedResult<FixedValue> {
        self.combine_with(rhs, Operation::Add, cast)
    }

    pub fn sub_with(&self, rhs: &FixedValue, cast: &OutputCast) -> FixedResult<FixedValue> {
        self.combine_with(rhs, Operation::Sub, cast)
    }

    pub fn mul_with(&self, rhs: &FixedValue, cast: &OutputCast) -> FixedResult<FixedValue> {
        self.combine_with(rhs, Operation::Mul, cast)
    }

    /// Negate every element, re-quantized in the same format and modes.
    ///
    /// The signed minimum has no positive counterpart: it saturates to the
    /// maximum under `Sat` and maps onto itself under `Wrap`.
    pub fn negated(&self) -> FixedValue {
        let data = self.data().iter().map(|x| -x).collect();
        FixedValue::quantized(self.shape().clone(), data, self.format(), self.fimath())
    }

    // ========================================================================
    // Comparison
    // ========================================================================

    /// Compare element-wise against `rhs` (broadcasting single elements).
    ///
    /// # Errors
    /// `ShapeMismatch` for incompatible shapes.
    pub fn compare<R: Comparand + ?Sized>(&self, rhs: &R, op: CmpOp) -> FixedResult<ShapedVec<bool>> {
        let (rhs_shape, b) = rhs.comparand();
        let shape = self.shape().broadcast(&rhs_shape)?;
        let a = self.data();
        let data = (0..shape.len())
            .map(|i| op.test(broadcast_at(a, i), broadcast_at(b, i)))
            .collect();
        Ok(ShapedVec::from_parts(shape, data))
    }

    pub fn cmp_lt<R: Comparand + ?Sized>(&self, rhs: &R) -> FixedResult<ShapedVec<bool>> {
        self.compare(rhs, CmpOp::Lt)
    }

    pub fn cmp_le<R: Comparand + ?Sized>(&self, rhs: &R) -> FixedResult<ShapedVec<bool>> {
        self.compare(rhs, CmpOp::Le)
    }

    pub fn cmp_eq<R: Comparand + ?Sized>(&self, rhs: &R) -> FixedResult<ShapedVec<bool>> {
        self.compare(rhs, CmpOp::Eq)
    }

    pub fn cmp_ne<R: Comparand + ?Sized>(&self, rhs: &R) -> FixedResult<ShapedVec<bool>> {
        self.compare(rhs, CmpOp::Ne)
    }

    pub fn cmp_gt<R: Comparand + ?Sized>(&self, rhs: &R) -> FixedResult<ShapedVec<bool>> {
        self.compare(rhs, CmpOp::Gt)
    }

    pub fn cmp_ge<R: Comparand + ?Sized>(&self, rhs: &R) -> FixedResult<ShapedVec<bool>> {
        self.compare(rhs, CmpOp::Ge)
    }

    /// Whether `x` equals some stored element.
    pub fn contains(&self, x: f64) -> bool {
        self.data().iter().any(|&d| d == x)
    }

    /// Whether every element of `other` equals some stored element.
    pub fn contains_all(&self, other: &FixedValue) -> bool {
        other.data().iter().all(|&x| self.contains(x))
    }
}

// ============================================================================
// Operator Traits
// ============================================================================

macro_rules! binary_operator {
    ($trait:ident, $method:ident, $checked:ident) => {
        impl $trait<&FixedValue> for &FixedValue {
            type Output = FixedValue;

            /// # Panics
            /// On incompatible shapes or a result format that is too wide; use
            /// the `checked_*` method to handle those as errors.
            fn $method(self, rhs: &FixedValue) -> FixedValue {
                self.$checked(rhs)
                    .expect(concat!("fixed-point ", stringify!($method), " failed"))
            }
        }

        impl $trait<FixedValue> for FixedValue {
            type Output = FixedValue;

            fn $method(self, rhs: FixedValue) -> FixedValue {
                (&self).$method(&rhs)
            }
        }

        impl $trait<&FixedValue> for FixedValue {
            type Output = FixedValue;

            fn $method(self, rhs: &FixedValue) -> FixedValue {
                (&self).$method(rhs)
            }
        }
    };
}

binary_operator!(Add, add, checked_add);
binary_operator!(Sub, sub, checked_sub);
binary_operator!(Mul, mul, checked_mul);

impl Neg for &FixedValue {
    type Output = FixedValue;

    fn neg(self) -> FixedValue {
        self.negated()
    }
}

impl Neg for FixedValue {
    type Output = FixedValue;

    fn neg(self) -> FixedValue {
        self.negated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::{FixedError, OverflowMode, RoundingMode};

    fn fmt(signed: bool, int_bits: u32, frac_bits: u32) -> FixedFormat {
        FixedFormat::new(signed, int_bits, frac_bits).unwrap()
    }

    fn value(data: Vec<f64>, format: FixedFormat) -> FixedValue {
        FixedValue::with_defaults(data, format).unwrap()
    }

    #[test]
    fn test_sum_is_exact() {
        let a = value(vec![3.75, -4.0], fmt(true, 2, 2));
        let b = value(vec![3.875, 0.125], fmt(false, 2, 3));

        let sum = a.checked_add(&b).unwrap();
        assert_eq!(sum.format(), fmt(true, 3, 3));
        assert_eq!(sum.data(), &[7.625, -3.875]);

        let diff = &a - &b;
        assert_eq!(diff.format(), fmt(true, 3, 3));
        assert_eq!(diff.data(), &[-0.125, -4.125]);
    }

    #[test]
    fn test_product_is_exact() {
        let a = value(vec![-1.5, 1.75], fmt(true, 1, 2));
        let b = value(vec![2.5, 3.5], fmt(false, 2, 1));

        let product = a * b;
        assert_eq!(product.format(), fmt(true, 4, 3));
        assert_eq!(product.data(), &[-3.75, 6.125]);
    }

    #[test]
    fn test_scalar_broadcast() {
        let row = value(vec![0.5, 1.0, 1.5], fmt(true, 2, 1));
        let two = value(vec![2.0], fmt(false, 2, 0));

        let scaled = row.checked_mul(&two).unwrap();
        assert_eq!(scaled.shape().dims(), &[3]);
        assert_eq!(scaled.data(), &[1.0, 2.0, 3.0]);

        let flipped = two.checked_mul(&row).unwrap();
        assert_eq!(flipped.data(), scaled.data());
    }

    #[test]
    fn test_shape_mismatch() {
        let a = value(vec![1.0, 2.0], fmt(true, 3, 0));
        let b = value(vec![1.0, 2.0, 3.0], fmt(true, 3, 0));
        assert_eq!(
            a.checked_add(&b),
            Err(FixedError::ShapeMismatch {
                left: vec![2],
                right: vec![3]
            })
        );
    }

    #[test]
    fn test_mode_mismatch_uses_left_modes() {
        let f = fmt(true, 3, 2);
        let a = FixedValue::new(1.0, f, RoundingMode::Floor, OverflowMode::Sat).unwrap();
        let b = FixedValue::new(1.0, f, RoundingMode::Ceil, OverflowMode::Wrap).unwrap();

        let (sum, mismatch) = a.combine(&b, Operation::Add).unwrap();
        assert_eq!(sum.fimath(), a.fimath());
        assert_eq!(
            mismatch,
            Some(ModeMismatch {
                operation: Operation::Add,
                left: a.fimath(),
                right: b.fimath(),
            })
        );

        let (_, none) = a.combine(&a, Operation::Mul).unwrap();
        assert_eq!(none, None);
    }

    #[test]
    fn test_cast_overloads() {
        let a = value(vec![0.75], fmt(true, 1, 2));
        let b = value(vec![0.625], fmt(true, 1, 3));
        // 0.75 * 0.625 = 0.46875 = 15/32

        let cast = OutputCast::new(fmt(true, 0, 3)).with_rounding(RoundingMode::SymInf);
        assert_eq!(a.mul_with(&b, &cast).unwrap().data(), &[0.5]);

        let cast = OutputCast::new(fmt(true, 0, 3)).with_rounding(RoundingMode::Floor);
        let floored = a.mul_with(&b, &cast).unwrap();
        assert_eq!(floored.data(), &[0.375]);
        assert_eq!(floored.rounding_mode(), RoundingMode::Floor);

        let full = a.add_with(&b, &OutputCast::full_precision(FixedMath::saturating())).unwrap();
        assert_eq!(full.format(), fmt(true, 2, 3));
        assert_eq!(full.fimath(), FixedMath::saturating());

        let narrow = OutputCast::new(fmt(false, 0, 2)).with_overflow(OverflowMode::Sat);
        assert_eq!(a.sub_with(&b, &narrow).unwrap().data(), &[0.0]);
    }

    #[test]
    fn test_cast_takes_exact_difference() {
        let a = value(vec![1.0], fmt(false, 2, 2));
        let b = value(vec![2.0], fmt(false, 2, 2));

        // derived (false,3,2) wraps -4 to 28
        assert_eq!(a.checked_sub(&b).unwrap().data(), &[7.0]);

        let signed = OutputCast::new(fmt(true, 3, 2));
        assert_eq!(a.sub_with(&b, &signed).unwrap().data(), &[-1.0]);
    }

    #[test]
    fn test_cast_skips_unbuildable_derived_format() {
        let wide = fmt(true, 60, 60);
        let a = value(vec![1.0], wide);
        assert!(matches!(a.checked_mul(&a), Err(FixedError::InvalidFormat { .. })));

        let cast = OutputCast::new(fmt(true, 3, 0));
        assert_eq!(a.mul_with(&a, &cast).unwrap().data(), &[1.0]);
    }

    #[test]
    fn test_negation() {
        let f = fmt(true, 0, 3);
        let sat = FixedValue::new(vec![-1.0, 0.5, 0.0], f, RoundingMode::SymZero, OverflowMode::Sat).unwrap();
        assert_eq!((-&sat).data(), &[0.875, -0.5, 0.0]);

        let wrap = FixedValue::new(vec![-1.0, 0.5, 0.0], f, RoundingMode::SymZero, OverflowMode::Wrap).unwrap();
        assert_eq!((-&wrap).data(), &[-1.0, -0.5, 0.0]);
        assert_eq!(-(-wrap.clone()), wrap);
    }

    #[test]
    fn test_comparisons() {
        let v = value(vec![-1.0, 0.0, 1.0], fmt(true, 2, 0));

        assert_eq!(v.cmp_lt(&0.0).unwrap().into_vec(), vec![true, false, false]);
        assert_eq!(v.cmp_ge(&0.0).unwrap().into_vec(), vec![false, true, true]);
        assert_eq!(
            v.cmp_eq(&vec![-1.0, 1.0, 1.0]).unwrap().into_vec(),
            vec![true, false, true]
        );
        assert_eq!(
            v.cmp_ne([1.0, 0.0, 1.0].as_slice()).unwrap().into_vec(),
            vec![true, false, false]
        );

        let other = value(vec![0.0], fmt(false, 1, 4));
        assert_eq!(v.cmp_gt(&other).unwrap().into_vec(), vec![false, false, true]);
        assert_eq!(v.cmp_le(&other).unwrap().into_vec(), vec![true, true, false]);

        assert!(v.compare(&vec![1.0, 2.0], CmpOp::Eq).is_err());
    }

    #[test]
    fn test_membership() {
        let v = value(vec![0.25, 0.5, 0.75], fmt(false, 0, 2));
        assert!(v.contains(0.5));
        assert!(!v.contains(0.3));

        assert!(v.contains_all(&value(vec![0.75, 0.25], fmt(true, 1, 4))));
        assert!(!v.contains_all(&value(vec![0.75, 0.125], fmt(true, 1, 4))));
    }
}
