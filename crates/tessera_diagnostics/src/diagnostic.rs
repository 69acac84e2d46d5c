//! Structured diagnostic messages tied to a named design entity.

use crate::code::DiagnosticCode;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};

/// A structured diagnostic message.
///
/// Netlists have no source text to point into, so instead of a span a
/// diagnostic names the design entity it concerns: a cell, a port, or a net.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The unique code identifying the type of diagnostic.
    pub code: DiagnosticCode,
    /// The main diagnostic message.
    pub message: String,
    /// The cell, port, or net the diagnostic is about, if any.
    pub entity: Option<String>,
    /// Explanatory footnotes (e.g., "note: ...").
    pub notes: Vec<String>,
    /// Actionable suggestions (e.g., "help: ...").
    pub help: Vec<String>,
}

impl Diagnostic {
    /// Creates a diagnostic with an explicit severity.
    pub fn new(severity: Severity, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            entity: None,
            notes: Vec::new(),
            help: Vec::new(),
        }
    }

    /// Creates a new error diagnostic.
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    /// Creates a new warning diagnostic.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    /// Creates a new informational note.
    pub fn note(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Note, code, message)
    }

    /// Names the design entity this diagnostic concerns.
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Adds a note to this diagnostic.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Adds a help message to this diagnostic.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }
}
