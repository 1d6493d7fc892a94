// ============================================================================
// Arithmetic Unit
// Routes fixed-point operations and their advisories
// ============================================================================

use crate::domain::OutputCast;
use crate::interfaces::{Diagnostic, DiagnosticHandler};
use crate::numeric::{FixedResult, FixedValue, Operation};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Front-end for fixed-point arithmetic.
///
/// Results follow the same rules as [`FixedValue::checked_add`] and friends;
/// mode mismatches go to the configured [`DiagnosticHandler`] instead of the
/// log. With a default cast every result is cast explicitly and no mismatch
/// is reported.
pub struct ArithmeticUnit {
    /// Label for log records
    name: Arc<String>,

    /// Sink for advisories
    diagnostics: Arc<dyn DiagnosticHandler>,

    /// Cast applied to every result
    default_cast: Option<OutputCast>,

    /// Completed operations
    operation_count: AtomicU64,
}

impl ArithmeticUnit {
    /// Create a unit that keeps full precision
    pub fn new(name: String, diagnostics: Arc<dyn DiagnosticHandler>) -> Self {
        Self::with_default_cast(name, diagnostics, None)
    }

    /// Create a unit that casts every result
    pub fn with_default_cast(
        name: String,
        diagnostics: Arc<dyn DiagnosticHandler>,
        default_cast: Option<OutputCast>,
    ) -> Self {
        Self {
            name: Arc::new(name),
            diagnostics,
            default_cast,
            operation_count: AtomicU64::new(0),
        }
    }

    /// Run `op` on two values.
    ///
    /// # Errors
    /// `ShapeMismatch` for incompatible shapes; `InvalidFormat` when the
    /// derived format is too wide and no cast format is configured.
    pub fn apply(&self, op: Operation, lhs: &FixedValue, rhs: &FixedValue) -> FixedResult<FixedValue> {
        let result = match &self.default_cast {
            Some(cast) => lhs.combine_with(rhs, op, cast)?,
            None => {
                let (value, mismatch) = lhs.combine(rhs, op)?;
                if let Some(m) = mismatch {
                    self.diagnostics.on_diagnostic(Diagnostic::from(m));
                }
                value
            }
        };

        self.operation_count.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(
            unit = %self.name,
            operation = %op,
            format = %result.format(),
            "fixed-point operation"
        );
        Ok(result)
    }

    /// Run `op` and cast the result explicitly, ignoring the default cast.
    pub fn apply_with(
        &self,
        op: Operation,
        lhs: &FixedValue,
        rhs: &FixedValue,
        cast: &OutputCast,
    ) -> FixedResult<FixedValue> {
        let result = lhs.combine_with(rhs, op, cast)?;
        self.operation_count.fetch_add(1, Ordering::Relaxed);
        Ok(result)
    }

    pub fn add(&self, lhs: &FixedValue, rhs: &FixedValue) -> FixedResult<FixedValue> {
        self.apply(Operation::Add, lhs, rhs)
    }

    pub fn sub(&self, lhs: &FixedValue, rhs: &FixedValue) -> FixedResult<FixedValue> {
        self.apply(Operation::Sub, lhs, rhs)
    }

    pub fn mul(&self, lhs: &FixedValue, rhs: &FixedValue) -> FixedResult<FixedValue> {
        self.apply(Operation::Mul, lhs, rhs)
    }

    pub fn add_with(&self, lhs: &FixedValue, rhs: &FixedValue, cast: &OutputCast) -> FixedResult<FixedValue> {
        self.apply_with(Operation::Add, lhs, rhs, cast)
    }

    pub fn sub_with(&self, lhs: &FixedValue, rhs: &FixedValue, cast: &OutputCast) -> FixedResult<FixedValue> {
        self.apply_with(Operation::Sub, lhs, rhs, cast)
    }

    pub fn mul_with(&self, lhs: &FixedValue, rhs: &FixedValue, cast: &OutputCast) -> FixedResult<FixedValue> {
        self.apply_with(Operation::Mul, lhs, rhs, cast)
    }

    /// Get the unit's label
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_cast(&self) -> Option<&OutputCast> {
        self.default_cast.as_ref()
    }

    /// Number of operations completed so far
    pub fn operation_count(&self) -> u64 {
        self.operation_count.load(Ordering::Relaxed)
    }
}
