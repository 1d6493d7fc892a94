// ============================================================================
// Fixed-Point Errors
// Error types for format construction, value construction and container access
// ============================================================================

use std::fmt;

/// Errors that can occur while building or manipulating fixed-point values.
///
/// Numeric edge cases (overflow, precision loss) are never errors: they are
/// resolved by the configured rounding and overflow modes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FixedError {
    /// `int_bits + frac_bits` is zero or the total width exceeds 127 bits
    InvalidFormat {
        signed: bool,
        int_bits: u32,
        frac_bits: u32,
    },
    /// Input is non-finite, ragged, or does not fill its declared shape
    InvalidValue(&'static str),
    /// Unrecognized rounding mode tag
    InvalidRoundMode(String),
    /// Unrecognized overflow mode tag
    InvalidOverflowMode(String),
    /// Unrecognized radix tag (bin, hex, int, float)
    InvalidRadix(String),
    /// Format tuple text could not be parsed
    InvalidFormatText(String),
    /// Operand shapes cannot be combined element-wise
    ShapeMismatch { left: Vec<usize>, right: Vec<usize> },
    /// Index past the end of an axis
    IndexOutOfBounds {
        axis: usize,
        index: usize,
        len: usize,
    },
    /// More indices than the value has axes
    RankMismatch { rank: usize, given: usize },
}

impl fmt::Display for FixedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixedError::InvalidFormat {
                signed,
                int_bits,
                frac_bits,
            } => write!(
                f,
                "invalid format ({}, {}, {}): needs at least one magnitude bit and at most 127 bits",
                signed, int_bits, frac_bits
            ),
            FixedError::InvalidValue(reason) => write!(f, "invalid value: {}", reason),
            FixedError::InvalidRoundMode(tag) => {
                write!(f, "{:?} is not a valid rounding mode", tag)
            }
            FixedError::InvalidOverflowMode(tag) => {
                write!(f, "{:?} is not a valid overflow mode", tag)
            }
            FixedError::InvalidRadix(tag) => write!(f, "{:?} is not a valid radix", tag),
            FixedError::InvalidFormatText(text) => {
                write!(f, "could not parse format tuple from {:?}", text)
            }
            FixedError::ShapeMismatch { left, right } => {
                write!(f, "shape mismatch: {:?} vs {:?}", left, right)
            }
            FixedError::IndexOutOfBounds { axis, index, len } => write!(
                f,
                "index {} out of bounds for axis {} of length {}",
                index, axis, len
            ),
            FixedError::RankMismatch { rank, given } => {
                write!(f, "{} indices given for a value of rank {}", given, rank)
            }
        }
    }
}

impl std::error::Error for FixedError {}

/// Result type alias for fixed-point operations
pub type FixedResult<T> = Result<T, FixedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            FixedError::InvalidRoundMode("Nearest".to_string()).to_string(),
            "\"Nearest\" is not a valid rounding mode"
        );
        assert_eq!(
            FixedError::InvalidValue("non-finite sample").to_string(),
            "invalid value: non-finite sample"
        );
        assert_eq!(
            FixedError::IndexOutOfBounds {
                axis: 1,
                index: 4,
                len: 4
            }
            .to_string(),
            "index 4 out of bounds for axis 1 of length 4"
        );
    }

    #[test]
    fn test_error_equality() {
        let a = FixedError::InvalidFormat {
            signed: true,
            int_bits: 0,
            frac_bits: 0,
        };
        assert_eq!(a.clone(), a);
        assert_ne!(a, FixedError::InvalidValue("ragged input"));
    }
}
