// ============================================================================
// Diagnostics Interface
// Defines the contract for non-fatal arithmetic advisories
// ============================================================================

use crate::domain::FixedMath;
use crate::numeric::{ModeMismatch, Operation};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Advisories raised by arithmetic. None of them stop the computation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Diagnostic {
    /// Operands carried different modes; the left operand's were used
    ModeMismatch {
        operation: Operation,
        left: FixedMath,
        right: FixedMath,
        timestamp: DateTime<Utc>,
    },
}

impl Diagnostic {
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Diagnostic::ModeMismatch { timestamp, .. } => *timestamp,
        }
    }
}

impl From<ModeMismatch> for Diagnostic {
    fn from(m: ModeMismatch) -> Self {
        Diagnostic::ModeMismatch {
            operation: m.operation,
            left: m.left,
            right: m.right,
            timestamp: Utc::now(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::ModeMismatch {
                operation,
                left,
                right,
                ..
            } => write!(
                f,
                "{} operands have different modes {} and {}, using {}",
                operation, left, right, left
            ),
        }
    }
}

/// Sink for diagnostics.
/// Implementations can log, collect or forward them.
pub trait DiagnosticHandler: Send + Sync {
    /// Handle one diagnostic
    fn on_diagnostic(&self, diagnostic: Diagnostic);

    /// Batch handler
    fn on_diagnostics(&self, diagnostics: Vec<Diagnostic>) {
        for diagnostic in diagnostics {
            self.on_diagnostic(diagnostic);
        }
    }
}

/// Discards everything
pub struct NoOpDiagnostics;

impl DiagnosticHandler for NoOpDiagnostics {
    fn on_diagnostic(&self, _diagnostic: Diagnostic) {
        // Do nothing
    }
}

/// Emits every diagnostic as a `warn` record
pub struct LoggingDiagnostics;

impl DiagnosticHandler for LoggingDiagnostics {
    fn on_diagnostic(&self, diagnostic: Diagnostic) {
        tracing::warn!("Fixed-point diagnostic: {}", diagnostic);
    }
}

/// Keeps diagnostics in memory until taken.
#[derive(Default)]
pub struct CollectingDiagnostics {
    entries: Mutex<Vec<Diagnostic>>,
}

impl CollectingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Remove and return everything collected so far, oldest first.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.entries.lock())
    }
}

impl DiagnosticHandler for CollectingDiagnostics {
    fn on_diagnostic(&self, diagnostic: Diagnostic) {
        self.entries.lock().push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mismatch() -> ModeMismatch {
        ModeMismatch {
            operation: Operation::Add,
            left: FixedMath::hdl_default(),
            right: FixedMath::saturating(),
        }
    }

    #[test]
    fn test_noop_handler() {
        let handler = NoOpDiagnostics;
        handler.on_diagnostic(mismatch().into());
        // Should not panic
    }

    #[test]
    fn test_collecting_handler() {
        let handler = CollectingDiagnostics::new();
        assert!(handler.is_empty());

        handler.on_diagnostics(vec![mismatch().into(), mismatch().into()]);
        assert_eq!(handler.len(), 2);

        let taken = handler.take();
        assert_eq!(taken.len(), 2);
        assert!(handler.is_empty());
        assert!(taken[0].timestamp() <= taken[1].timestamp());
    }

    #[test]
    fn test_display() {
        let diagnostic: Diagnostic = mismatch().into();
        assert_eq!(
            diagnostic.to_string(),
            "add operands have different modes (SymZero, Wrap) and (SymInf, Sat), using (SymZero, Wrap)"
        );
    }
}
