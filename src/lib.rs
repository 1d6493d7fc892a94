// ============================================================================
// HDL Fixed-Point Library
// Bit-exact fixed-point values for hardware and DSP reference models
// ============================================================================

//! # HDL Fixed
//!
//! Fixed-point numbers with configurable width, signedness, rounding and
//! overflow, for producing bit-exact stimuli and expected results for HDL
//! test benches.
//!
//! ## Features
//!
//! - **One pipeline** (scale, round, overflow, descale) behind every value
//! - **Eight rounding modes** matching common HDL fixed-point packages
//! - **Saturate or wrap** overflow in the integer domain
//! - **Full-precision arithmetic** with inferred sum and product formats
//! - **Bit patterns** as integers, `0b`/`0x` strings, and back
//!
//! ## Example
//!
//! ```rust
//! use hdl_fixed::prelude::*;
//!
//! let q = FixedFormat::new(true, 0, 4).unwrap();
//! let x = FixedValue::new(vec![0.3, -0.7], q, RoundingMode::SymInf, OverflowMode::Sat).unwrap();
//! assert_eq!(x.data(), &[0.3125, -0.6875]);
//! assert_eq!(x.hexfmt().into_vec(), vec!["0x05", "0x15"]);
//!
//! let y = FixedValue::with_defaults(0.5, q).unwrap();
//! let sum = x.checked_add(&y).unwrap();
//! assert_eq!(sum.format(), FixedFormat::new(true, 1, 4).unwrap());
//! assert_eq!(sum.data(), &[0.8125, -0.1875]);
//! ```

pub mod domain;
pub mod engine;
pub mod interfaces;
pub mod numeric;

// Re-exports for convenience
pub mod prelude {
    pub use crate::domain::{FixedMath, OutputCast, UnitConfig};
    pub use crate::engine::{create_from_config, ArithmeticUnit, ArithmeticUnitBuilder};
    pub use crate::interfaces::{
        CollectingDiagnostics, Diagnostic, DiagnosticHandler, LoggingDiagnostics, NoOpDiagnostics,
    };
    pub use crate::numeric::{
        CmpOp, FixedError, FixedFormat, FixedResult, FixedValue, Operation, OverflowMode, Radix,
        RoundingMode, ShapedVec,
    };
}
