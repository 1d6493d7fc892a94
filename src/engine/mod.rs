// ============================================================================
// Engine Module
// Arithmetic front-end that routes fixed-point advisories
// ============================================================================

mod arithmetic_unit;

pub mod factory;

pub use arithmetic_unit::ArithmeticUnit;
pub use factory::{create_from_config, ArithmeticUnitBuilder};
