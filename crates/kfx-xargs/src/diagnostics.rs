//! Recoverable per-directive problems
//!
//! A diagnostic never stops the parse; the directive that raised it is
//! skipped and everything else is still applied.

use serde::Serialize;
use std::fmt;

/// Summary shown when a parse finished with diagnostics
pub const INCOMPLETE_SUMMARY: &str = "could not resolve all bundles, see log";

/// Summary shown when a parse failed
pub const FAILED_SUMMARY: &str = "failed to import xargs file";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// File or URL the directive was read from
    pub origin: String,
    /// Ordinal of the directive token within its origin
    pub index: usize,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.origin, self.index, self.message)
    }
}

/// Receiver for non-fatal diagnostics
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}
