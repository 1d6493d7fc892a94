// ============================================================================
// Shapes
// Row-major N-dimensional containers for samples and element-wise results
// ============================================================================

use super::errors::{FixedError, FixedResult};
use smallvec::SmallVec;
use std::fmt;

/// Dimension sizes of an N-dimensional value, outermost axis first.
///
/// A shape always has rank >= 1: scalars are normalized to `[1]`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Shape(SmallVec<[usize; 4]>);

impl Shape {
    /// Create a shape from dimension sizes. An empty slice yields `[1]`.
    pub fn new(dims: &[usize]) -> Self {
        if dims.is_empty() {
            Self::scalar()
        } else {
            Self(SmallVec::from_slice(dims))
        }
    }

    /// Shape of a single element.
    pub fn scalar() -> Self {
        Self(SmallVec::from_slice(&[1]))
    }

    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.0
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.0.len()
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.iter().product()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve a prefix index to the contiguous block it selects.
    ///
    /// Returns `(offset, count, sub_shape)`: the block starts at flat position
    /// `offset`, spans `count` elements and has the trailing axes as shape.
    pub(crate) fn block(&self, index: &[usize]) -> FixedResult<(usize, usize, Shape)> {
        if index.len() > self.rank() {
            return Err(FixedError::RankMismatch {
                rank: self.rank(),
                given: index.len(),
            });
        }

        let mut offset = 0;
        for (axis, &i) in index.iter().enumerate() {
            let len = self.0[axis];
            if i >= len {
                return Err(FixedError::IndexOutOfBounds {
                    axis,
                    index: i,
                    len,
                });
            }
            let stride: usize = self.0[axis + 1..].iter().product();
            offset += i * stride;
        }

        let rest = &self.0[index.len()..];
        let count = rest.iter().product();
        Ok((offset, count, Shape::new(rest)))
    }

    /// Shape of an element-wise combination of two operands.
    ///
    /// Equal shapes combine directly; a single-element operand broadcasts.
    pub(crate) fn broadcast(&self, other: &Shape) -> FixedResult<Shape> {
        if self == other || other.len() == 1 {
            Ok(self.clone())
        } else if self.len() == 1 {
            Ok(other.clone())
        } else {
            Err(FixedError::ShapeMismatch {
                left: self.0.to_vec(),
                right: other.0.to_vec(),
            })
        }
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.dims())
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dims: Vec<String> = self.0.iter().map(|d| d.to_string()).collect();
        write!(f, "({})", dims.join(", "))
    }
}

/// Element `i` of an operand that is either full-size or broadcast.
#[inline]
pub(crate) fn broadcast_at<T: Copy>(data: &[T], i: usize) -> T {
    if data.len() == 1 {
        data[0]
    } else {
        data[i]
    }
}

// ============================================================================
// Shaped Vector
// ============================================================================

/// Flat row-major data paired with its shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapedVec<T> {
    shape: Shape,
    data: Vec<T>,
}

impl<T> ShapedVec<T> {
    /// Pair data with explicit dimensions.
    ///
    /// # Errors
    /// Returns `InvalidValue` if `data` does not fill the shape exactly.
    pub fn from_shape_vec(dims: &[usize], data: Vec<T>) -> FixedResult<Self> {
        let shape = Shape::new(dims);
        if shape.len() != data.len() {
            return Err(FixedError::InvalidValue(
                "data length does not match the declared shape",
            ));
        }
        Ok(Self { shape, data })
    }

    /// Build a 2-D array from rows.
    ///
    /// # Errors
    /// Returns `InvalidValue` if the rows have different lengths.
    pub fn from_rows(rows: Vec<Vec<T>>) -> FixedResult<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != cols) {
            return Err(FixedError::InvalidValue("ragged nested input"));
        }
        let shape = Shape::new(&[rows.len(), cols]);
        let data = rows.into_iter().flatten().collect();
        Ok(Self { shape, data })
    }

    /// A single element with shape `[1]`.
    pub fn scalar(value: T) -> Self {
        Self {
            shape: Shape::scalar(),
            data: vec![value],
        }
    }

    pub(crate) fn from_parts(shape: Shape, data: Vec<T>) -> Self {
        debug_assert_eq!(shape.len(), data.len());
        Self { shape, data }
    }

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub(crate) fn into_parts(self) -> (Shape, Vec<T>) {
        (self.shape, self.data)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Element at a full index (one entry per axis).
    pub fn get(&self, index: &[usize]) -> Option<&T> {
        if index.len() != self.shape.rank() {
            return None;
        }
        let (offset, _, _) = self.shape.block(index).ok()?;
        self.data.get(offset)
    }

    /// Apply `f` element-wise, keeping the shape.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> ShapedVec<U> {
        ShapedVec {
            shape: self.shape.clone(),
            data: self.data.iter().map(f).collect(),
        }
    }
}

impl ShapedVec<bool> {
    /// True when every element is true.
    pub fn all(&self) -> bool {
        self.data.iter().all(|&b| b)
    }

    /// True when at least one element is true.
    pub fn any(&self) -> bool {
        self.data.iter().any(|&b| b)
    }
}

impl<T> From<Vec<T>> for ShapedVec<T> {
    fn from(data: Vec<T>) -> Self {
        Self {
            shape: Shape::new(&[data.len()]),
            data,
        }
    }
}

impl<T> std::ops::Index<usize> for ShapedVec<T> {
    type Output = T;

    /// Flat (row-major) element access.
    fn index(&self, i: usize) -> &T {
        &self.data[i]
    }
}

// ============================================================================
// Real-Valued Input
// ============================================================================

/// Conversion of caller input into a real-valued array.
///
/// Implemented for plain numbers, slices, vectors, nested rows and
/// [`ShapedVec<f64>`]. Finiteness is checked by the value constructor.
pub trait IntoReal {
    fn into_real(self) -> FixedResult<ShapedVec<f64>>;
}

impl IntoReal for f64 {
    fn into_real(self) -> FixedResult<ShapedVec<f64>> {
        Ok(ShapedVec::scalar(self))
    }
}

impl IntoReal for f32 {
    fn into_real(self) -> FixedResult<ShapedVec<f64>> {
        Ok(ShapedVec::scalar(self as f64))
    }
}

impl IntoReal for i32 {
    fn into_real(self) -> FixedResult<ShapedVec<f64>> {
        Ok(ShapedVec::scalar(self as f64))
    }
}

impl IntoReal for i64 {
    fn into_real(self) -> FixedResult<ShapedVec<f64>> {
        Ok(ShapedVec::scalar(self as f64))
    }
}

impl IntoReal for u32 {
    fn into_real(self) -> FixedResult<ShapedVec<f64>> {
        Ok(ShapedVec::scalar(self as f64))
    }
}

impl IntoReal for Vec<f64> {
    fn into_real(self) -> FixedResult<ShapedVec<f64>> {
        Ok(ShapedVec::from(self))
    }
}

impl IntoReal for &[f64] {
    fn into_real(self) -> FixedResult<ShapedVec<f64>> {
        Ok(ShapedVec::from(self.to_vec()))
    }
}

impl IntoReal for &Vec<f64> {
    fn into_real(self) -> FixedResult<ShapedVec<f64>> {
        Ok(ShapedVec::from(self.clone()))
    }
}

impl<const N: usize> IntoReal for [f64; N] {
    fn into_real(self) -> FixedResult<ShapedVec<f64>> {
        Ok(ShapedVec::from(self.to_vec()))
    }
}

impl IntoReal for Vec<Vec<f64>> {
    fn into_real(self) -> FixedResult<ShapedVec<f64>> {
        ShapedVec::from_rows(self)
    }
}

impl IntoReal for ShapedVec<f64> {
    fn into_real(self) -> FixedResult<ShapedVec<f64>> {
        Ok(self)
    }
}

impl IntoReal for &ShapedVec<f64> {
    fn into_real(self) -> FixedResult<ShapedVec<f64>> {
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_shape() {
        let shape = Shape::new(&[]);
        assert_eq!(shape.dims(), &[1]);
        assert_eq!(shape.rank(), 1);
        assert_eq!(shape.len(), 1);
    }

    #[test]
    fn test_block_selection() {
        let shape = Shape::new(&[2, 3, 4]);

        let (offset, count, sub) = shape.block(&[1]).unwrap();
        assert_eq!((offset, count), (12, 12));
        assert_eq!(sub.dims(), &[3, 4]);

        let (offset, count, sub) = shape.block(&[1, 2, 3]).unwrap();
        assert_eq!((offset, count), (23, 1));
        assert_eq!(sub.dims(), &[1]);

        let (offset, count, _) = shape.block(&[]).unwrap();
        assert_eq!((offset, count), (0, 24));
    }

    #[test]
    fn test_block_errors() {
        let shape = Shape::new(&[2, 3]);
        assert_eq!(
            shape.block(&[0, 3]),
            Err(FixedError::IndexOutOfBounds {
                axis: 1,
                index: 3,
                len: 3
            })
        );
        assert_eq!(
            shape.block(&[0, 0, 0]),
            Err(FixedError::RankMismatch { rank: 2, given: 3 })
        );
    }

    #[test]
    fn test_broadcast() {
        let a = Shape::new(&[2, 2]);
        let one = Shape::scalar();
        assert_eq!(a.broadcast(&one).unwrap(), a);
        assert_eq!(one.broadcast(&a).unwrap(), a);
        assert!(a.broadcast(&Shape::new(&[4])).is_err());
    }

    #[test]
    fn test_from_rows() {
        let v = ShapedVec::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(v.shape().dims(), &[2, 2]);
        assert_eq!(v.get(&[1, 0]), Some(&3.0));
        assert_eq!(v[3], 4.0);

        let ragged = ShapedVec::from_rows(vec![vec![1.0], vec![2.0, 3.0]]);
        assert_eq!(ragged, Err(FixedError::InvalidValue("ragged nested input")));
    }

    #[test]
    fn test_from_shape_vec_length_check() {
        assert!(ShapedVec::from_shape_vec(&[2, 2], vec![0.0; 4]).is_ok());
        assert!(ShapedVec::from_shape_vec(&[2, 2], vec![0.0; 3]).is_err());
    }

    #[test]
    fn test_bool_reductions() {
        let v = ShapedVec::from(vec![true, false]);
        assert!(v.any());
        assert!(!v.all());
    }
}
