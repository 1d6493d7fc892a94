// ============================================================================
// Interfaces Module
// Contains all trait definitions and contracts
// ============================================================================

mod diagnostics;

pub use diagnostics::{
    CollectingDiagnostics, Diagnostic, DiagnosticHandler, LoggingDiagnostics, NoOpDiagnostics,
};
