// ============================================================================
// Element Access
// Indexed reads and writes, element handles and iteration
// ============================================================================

use super::errors::{FixedError, FixedResult};
use super::shape::{broadcast_at, IntoReal, Shape};
use super::value::{quantize, FixedValue};
use std::iter::FusedIterator;

impl FixedValue {
    /// Sub-block selected by a prefix index, same format and modes.
    ///
    /// A full index yields a single element; a shorter one yields the block
    /// spanned by the remaining axes.
    ///
    /// # Errors
    /// `IndexOutOfBounds` or `RankMismatch` for a bad index.
    pub fn get(&self, index: &[usize]) -> FixedResult<FixedValue> {
        let (offset, count, shape) = self.shape().block(index)?;
        Ok(FixedValue::from_lattice(
            shape,
            self.data()[offset..offset + count].to_vec(),
            self.format(),
            self.fimath(),
        ))
    }

    /// Write `value` into the block selected by `index`.
    ///
    /// `value` may be a plain number, an array matching the block, or another
    /// [`FixedValue`] (by reference). Written values are re-quantized with
    /// this value's format and modes. Nothing is written on error.
    ///
    /// # Errors
    /// `IndexOutOfBounds` or `RankMismatch` for a bad index, `ShapeMismatch`
    /// when `value` neither fills the block nor is a single element, and
    /// `InvalidValue` for non-finite input.
    pub fn set(&mut self, index: &[usize], value: impl IntoReal) -> FixedResult<()> {
        let (offset, count, block) = self.shape().block(index)?;
        let (source_shape, source) = value.into_real()?.into_parts();

        if source.len() != 1 && source.len() != count {
            return Err(FixedError::ShapeMismatch {
                left: block.dims().to_vec(),
                right: source_shape.dims().to_vec(),
            });
        }
        if source.iter().any(|x| !x.is_finite()) {
            return Err(FixedError::InvalidValue("non-finite sample"));
        }

        let format = self.format();
        let math = self.fimath();
        let target = &mut self.data_mut()[offset..offset + count];
        for (i, slot) in target.iter_mut().enumerate() {
            *slot = quantize(broadcast_at(&source, i), &format, math);
        }
        Ok(())
    }

    /// Writable handle to the single element at `index`.
    ///
    /// # Errors
    /// `IndexOutOfBounds` for a bad index; `RankMismatch` if `index` selects
    /// more than one element.
    pub fn at_mut(&mut self, index: &[usize]) -> FixedResult<ElementMut<'_>> {
        let (offset, count, _) = self.shape().block(index)?;
        if count != 1 {
            return Err(FixedError::RankMismatch {
                rank: self.shape().rank(),
                given: index.len(),
            });
        }
        Ok(ElementMut {
            owner: self,
            offset,
        })
    }

    /// Elements in row-major order, each as a single-element value.
    pub fn iter(&self) -> Elements<'_> {
        Elements {
            value: self,
            cursor: 0,
        }
    }
}

// ============================================================================
// Element Handle
// ============================================================================

/// Handle to one element of a [`FixedValue`].
///
/// Writes run the owner's pipeline.
pub struct ElementMut<'a> {
    owner: &'a mut FixedValue,
    offset: usize,
}

impl ElementMut<'_> {
    /// Stored value.
    pub fn get(&self) -> f64 {
        self.owner.data()[self.offset]
    }

    /// Quantize and store `value`, returning what was stored.
    ///
    /// # Errors
    /// `InvalidValue` for non-finite input.
    pub fn set(&mut self, value: f64) -> FixedResult<f64> {
        if !value.is_finite() {
            return Err(FixedError::InvalidValue("non-finite sample"));
        }
        let stored = quantize(value, &self.owner.format(), self.owner.fimath());
        self.owner.data_mut()[self.offset] = stored;
        Ok(stored)
    }

    /// Flat row-major position of the element.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

// ============================================================================
// Iteration
// ============================================================================

/// Row-major iterator over the elements of a [`FixedValue`].
pub struct Elements<'a> {
    value: &'a FixedValue,
    cursor: usize,
}

impl Elements<'_> {
    /// Restart from the first element.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }
}

impl Iterator for Elements<'_> {
    type Item = FixedValue;

    fn next(&mut self) -> Option<FixedValue> {
        let x = *self.value.data().get(self.cursor)?;
        self.cursor += 1;
        Some(FixedValue::from_lattice(
            Shape::scalar(),
            vec![x],
            self.value.format(),
            self.value.fimath(),
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.value.len() - self.cursor;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Elements<'_> {}

impl FusedIterator for Elements<'_> {}

impl<'a> IntoIterator for &'a FixedValue {
    type Item = FixedValue;
    type IntoIter = Elements<'a>;

    fn into_iter(self) -> Elements<'a> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::{FixedFormat, OverflowMode, RoundingMode};

    fn s3_7() -> FixedFormat {
        FixedFormat::new(true, 3, 7).unwrap()
    }

    fn matrix() -> FixedValue {
        FixedValue::new(
            vec![vec![0.5, 1.0, 1.5, 2.0], vec![-0.5, -1.0, -1.5, -2.0]],
            s3_7(),
            RoundingMode::SymZero,
            OverflowMode::Wrap,
        )
        .unwrap()
    }

    #[test]
    fn test_get_element_and_row() {
        let m = matrix();
        let element = m.get(&[1, 2]).unwrap();
        assert_eq!(element.data(), &[-1.5]);
        assert_eq!(element.format(), s3_7());

        let row = m.get(&[0]).unwrap();
        assert_eq!(row.shape().dims(), &[4]);
        assert_eq!(row.data(), &[0.5, 1.0, 1.5, 2.0]);
    }

    #[test]
    fn test_get_out_of_bounds() {
        let m = matrix();
        assert_eq!(
            m.get(&[2, 0]),
            Err(FixedError::IndexOutOfBounds {
                axis: 0,
                index: 2,
                len: 2
            })
        );
        assert!(matches!(m.get(&[0, 0, 0]), Err(FixedError::RankMismatch { .. })));
    }

    #[test]
    fn test_set_requantizes() {
        let mut m = matrix();
        m.set(&[0, 1], 2.0).unwrap();
        assert_eq!(m.get(&[0, 1]).unwrap().data(), &[2.0]);

        // 1000 * 128 wraps in 11 bits
        m.set(&[0, 1], 1000.0).unwrap();
        assert_eq!(m.get(&[0, 1]).unwrap().data(), &[-8.0]);

        m.set(&[1, 0], 0.123).unwrap();
        assert_eq!(m.get(&[1, 0]).unwrap().data(), &[16.0 / 128.0]);
    }

    #[test]
    fn test_set_row_and_broadcast() {
        let mut m = matrix();
        m.set(&[1], vec![0.25, 0.5, 0.75, 1.0]).unwrap();
        assert_eq!(m.get(&[1]).unwrap().data(), &[0.25, 0.5, 0.75, 1.0]);

        m.set(&[0], 3.0).unwrap();
        assert_eq!(m.get(&[0]).unwrap().data(), &[3.0; 4]);

        let err = m.set(&[0], vec![1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            FixedError::ShapeMismatch {
                left: vec![4],
                right: vec![2]
            }
        );
    }

    #[test]
    fn test_set_from_other_value() {
        let mut m = matrix();
        let narrow = FixedValue::with_defaults(0.75, FixedFormat::new(false, 0, 2).unwrap()).unwrap();
        m.set(&[1, 3], &narrow).unwrap();
        assert_eq!(m.get(&[1, 3]).unwrap().data(), &[0.75]);
        assert_eq!(m.format(), s3_7());
    }

    #[test]
    fn test_failed_set_leaves_data() {
        let mut m = matrix();
        let before = m.clone();
        assert!(m.set(&[0], vec![1.0, f64::NAN, 1.0, 1.0]).is_err());
        assert_eq!(m, before);
    }

    #[test]
    fn test_element_handle() {
        let mut m = matrix();
        {
            let mut cell = m.at_mut(&[1, 1]).unwrap();
            assert_eq!(cell.get(), -1.0);
            assert_eq!(cell.offset(), 5);
            assert_eq!(cell.set(7.724).unwrap(), 989.0 / 128.0);
        }
        assert_eq!(m.data()[5], 989.0 / 128.0);
        assert!(matches!(m.at_mut(&[1]), Err(FixedError::RankMismatch { .. })));
    }

    #[test]
    fn test_iteration_and_rewind() {
        let m = matrix();
        let mut it = m.iter();
        assert_eq!(it.len(), 8);

        let first: Vec<f64> = it.by_ref().take(3).map(|e| e.data()[0]).collect();
        assert_eq!(first, vec![0.5, 1.0, 1.5]);
        assert_eq!(it.len(), 5);

        it.rewind();
        assert_eq!(it.next().unwrap().data(), &[0.5]);

        let all: Vec<f64> = (&m).into_iter().map(|e| e.data()[0]).collect();
        assert_eq!(all, m.data());
        for element in &m {
            assert_eq!(element.shape().dims(), &[1]);
            assert_eq!(element.fimath(), m.fimath());
        }
    }
}
