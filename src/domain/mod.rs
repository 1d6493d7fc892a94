// ============================================================================
// Domain Module
// Configuration value objects shared by values and the arithmetic unit
// ============================================================================

pub mod config;

pub use config::{FixedMath, OutputCast, UnitConfig};
