// ============================================================================
// Numeric Module
// Fixed-point formats, quantization pipeline and values
// ============================================================================
//
// This module provides:
// - FixedFormat: signedness and bit widths, with sum/product inference
// - RoundingMode / OverflowMode: the two pipeline stages
// - FixedValue: N-dimensional fixed-point data and its operations
// - FixedError: error type shared by the whole crate
//
// Design principles:
// - Every stored value is representable in its format
// - Lattice integers are computed in i128, so widths stop at 127 bits
// - Fallible operations return Result; std operators panic on misuse

mod access;
mod errors;
mod format;
mod ops;
mod overflow;
mod repr;
mod rounding;
mod shape;
mod value;

pub use access::{ElementMut, Elements};
pub use errors::{FixedError, FixedResult};
pub use format::{FixedFormat, FormatTuple, MAX_BIT_LENGTH};
pub use ops::{CmpOp, Comparand, ModeMismatch, Operation};
pub use overflow::OverflowMode;
pub use repr::{IntoLatticeBits, LatticeBits, Radix};
pub use rounding::RoundingMode;
pub use shape::{IntoReal, Shape, ShapedVec};
pub use value::FixedValue;
