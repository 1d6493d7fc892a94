// ============================================================================
// Arithmetic Unit Factory
// Creates arithmetic units with proper configuration
// ============================================================================

use crate::domain::{FixedMath, OutputCast, UnitConfig};
use crate::engine::ArithmeticUnit;
use crate::interfaces::DiagnosticHandler;
use crate::numeric::{FixedFormat, FixedResult};
use std::sync::Arc;

// ============================================================================
// Factory Functions
// ============================================================================

/// Creates an arithmetic unit from configuration
///
/// # Arguments
/// * `config` - Unit configuration
/// * `diagnostics` - Sink for mode-mismatch advisories
///
/// # Example
/// ```
/// use hdl_fixed::prelude::*;
/// use std::sync::Arc;
///
/// let unit = create_from_config(UnitConfig::new("acc"), Arc::new(NoOpDiagnostics)).unwrap();
/// assert_eq!(unit.name(), "acc");
/// ```
pub fn create_from_config(
    config: UnitConfig,
    diagnostics: Arc<dyn DiagnosticHandler>,
) -> FixedResult<ArithmeticUnit> {
    // Validate configuration first
    config.validate()?;

    Ok(ArithmeticUnit::with_default_cast(
        config.name,
        diagnostics,
        config.default_cast,
    ))
}

// ============================================================================
// Builder Pattern
// ============================================================================

/// Builder for creating arithmetic units with fluent API
///
/// # Example
/// ```
/// use hdl_fixed::prelude::*;
/// use std::sync::Arc;
///
/// let unit = ArithmeticUnitBuilder::new("fir")
///     .cast_to(FixedFormat::new(true, 1, 14).unwrap())
///     .convergent()
///     .build(Arc::new(LoggingDiagnostics))
///     .unwrap();
/// assert!(unit.default_cast().is_some());
/// ```
pub struct ArithmeticUnitBuilder {
    config: UnitConfig,
}

impl ArithmeticUnitBuilder {
    /// Create a new builder; results keep full precision until a cast is set
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            config: UnitConfig::new(name),
        }
    }

    fn cast_mut(&mut self) -> &mut OutputCast {
        self.config.default_cast.get_or_insert_with(OutputCast::default)
    }

    // ========================================================================
    // Result Cast Configuration
    // ========================================================================

    /// Cast every result into `format`
    pub fn cast_to(mut self, format: FixedFormat) -> Self {
        self.cast_mut().format = Some(format);
        self
    }

    /// Keep the derived full-precision format
    pub fn full_precision(mut self) -> Self {
        self.cast_mut().format = None;
        self
    }

    /// Use `math` for every result
    pub fn with_math(mut self, math: FixedMath) -> Self {
        self.cast_mut().math = math;
        self
    }

    /// Drop any configured cast: results take the left operand's modes
    pub fn inherit_modes(mut self) -> Self {
        self.config.default_cast = None;
        self
    }

    // ========================================================================
    // Preset Configurations
    // ========================================================================

    /// Apply `SymInf` / `Sat` to every result
    pub fn saturating(self) -> Self {
        self.with_math(FixedMath::saturating())
    }

    /// Apply `Floor` / `Wrap` to every result
    pub fn truncating(self) -> Self {
        self.with_math(FixedMath::truncating())
    }

    /// Apply `ConvEven` / `Sat` to every result
    pub fn convergent(self) -> Self {
        self.with_math(FixedMath::convergent())
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Build the arithmetic unit
    pub fn build(self, diagnostics: Arc<dyn DiagnosticHandler>) -> FixedResult<ArithmeticUnit> {
        create_from_config(self.config, diagnostics)
    }

    /// Get the configuration without building (for inspection)
    pub fn get_config(&self) -> &UnitConfig {
        &self.config
    }
}
