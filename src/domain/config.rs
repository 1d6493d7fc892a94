// ============================================================================
// Arithmetic Configuration
// Rounding/overflow pairs and explicit result casts
// ============================================================================

use crate::numeric::{FixedError, FixedFormat, FixedResult, OverflowMode, RoundingMode};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Fixed Math
// ============================================================================

/// The (rounding, overflow) pair a value is quantized with.
///
/// Defaults to `SymZero` / `Wrap`, the behavior of the reference HDL models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FixedMath {
    /// Policy for mapping scaled values onto the lattice
    pub rounding: RoundingMode,

    /// Policy for lattice integers outside the format's range
    pub overflow: OverflowMode,
}

impl FixedMath {
    pub const fn new(rounding: RoundingMode, overflow: OverflowMode) -> Self {
        Self { rounding, overflow }
    }

    /// Parse both modes from their tags (e.g. `"ConvEven"`, `"Sat"`).
    ///
    /// # Errors
    /// `InvalidRoundMode` or `InvalidOverflowMode` for unknown tags.
    pub fn from_tags(rounding: &str, overflow: &str) -> FixedResult<Self> {
        Ok(Self {
            rounding: rounding.parse()?,
            overflow: overflow.parse()?,
        })
    }

    /// Builder method: Set rounding mode
    pub fn with_rounding(mut self, rounding: RoundingMode) -> Self {
        self.rounding = rounding;
        self
    }

    /// Builder method: Set overflow mode
    pub fn with_overflow(mut self, overflow: OverflowMode) -> Self {
        self.overflow = overflow;
        self
    }
}

impl fmt::Display for FixedMath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.rounding, self.overflow)
    }
}

// ============================================================================
// Preset Configurations (Factory Methods)
// ============================================================================

impl FixedMath {
    /// Reference model defaults
    /// - Ties toward zero (SymZero)
    /// - Wrap-around on overflow
    pub const fn hdl_default() -> Self {
        Self::new(RoundingMode::SymZero, OverflowMode::Wrap)
    }

    /// Saturating datapath
    /// - Ties away from zero (SymInf)
    /// - Clamp on overflow
    pub const fn saturating() -> Self {
        Self::new(RoundingMode::SymInf, OverflowMode::Sat)
    }

    /// Plain bit drop, as a register that discards LSBs and MSBs
    /// - Floor rounding
    /// - Wrap-around on overflow
    pub const fn truncating() -> Self {
        Self::new(RoundingMode::Floor, OverflowMode::Wrap)
    }

    /// Unbiased DSP accumulator
    /// - Convergent rounding (ConvEven)
    /// - Clamp on overflow
    pub const fn convergent() -> Self {
        Self::new(RoundingMode::ConvEven, OverflowMode::Sat)
    }
}

// ============================================================================
// Output Cast
// ============================================================================

/// Explicit result format and modes for an arithmetic operation.
///
/// Without a format the full-precision derived format is kept and only the
/// modes are applied. Default modes are `SymZero` / `Wrap`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OutputCast {
    /// Target format; None keeps the derived full-precision format
    pub format: Option<FixedFormat>,

    /// Modes applied to the result
    pub math: FixedMath,
}

impl OutputCast {
    /// Cast into `format` with default modes.
    pub fn new(format: FixedFormat) -> Self {
        Self {
            format: Some(format),
            math: FixedMath::default(),
        }
    }

    /// Keep the derived format, apply `math`.
    pub fn full_precision(math: FixedMath) -> Self {
        Self { format: None, math }
    }

    /// Builder method: Set target format
    pub fn with_format(mut self, format: FixedFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Builder method: Set both modes
    pub fn with_math(mut self, math: FixedMath) -> Self {
        self.math = math;
        self
    }

    /// Builder method: Set rounding mode
    pub fn with_rounding(mut self, rounding: RoundingMode) -> Self {
        self.math.rounding = rounding;
        self
    }

    /// Builder method: Set overflow mode
    pub fn with_overflow(mut self, overflow: OverflowMode) -> Self {
        self.math.overflow = overflow;
        self
    }

    /// Format of the result, given the derived full-precision format.
    pub fn resolve(&self, derived: FixedFormat) -> FixedFormat {
        self.format.unwrap_or(derived)
    }
}

// ============================================================================
// Arithmetic Unit Configuration
// ============================================================================

/// Configuration for an [`ArithmeticUnit`](crate::engine::ArithmeticUnit).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnitConfig {
    /// Label attached to the unit's log records
    pub name: String,

    /// Cast applied to every result; None keeps full precision and the left
    /// operand's modes
    #[cfg_attr(feature = "serde", serde(default))]
    pub default_cast: Option<OutputCast>,
}

impl UnitConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_cast: None,
        }
    }

    /// Builder method: Cast every result
    pub fn with_default_cast(mut self, cast: OutputCast) -> Self {
        self.default_cast = Some(cast);
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> FixedResult<()> {
        if self.name.trim().is_empty() {
            return Err(FixedError::InvalidValue("unit name must not be empty"));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration.
    ///
    /// # Example
    /// ```
    /// # #[cfg(feature = "serde")]
    /// # {
    /// use hdl_fixed::domain::UnitConfig;
    ///
    /// let config = UnitConfig::from_json(
    ///     r#"{"name": "fir", "default_cast": {"format": [true, 1, 14], "math": {"rounding": "ConvEven", "overflow": "Sat"}}}"#,
    /// ).unwrap();
    /// assert_eq!(config.name, "fir");
    /// # }
    /// ```
    #[cfg(feature = "serde")]
    pub fn from_json(text: &str) -> FixedResult<Self> {
        let config: Self = serde_json::from_str(text)
            .map_err(|_| FixedError::InvalidValue("malformed unit configuration"))?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for UnitConfig {
    fn default() -> Self {
        Self::new("fixed")
    }
}
