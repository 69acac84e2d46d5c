//! Thread-safe diagnostic accumulator shared across toolchain stages.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A thread-safe accumulator for diagnostics emitted while a stage runs.
///
/// The sink is shared by reference, so a placement run on a worker thread can
/// report while the caller holds onto it. The error count is tracked atomically
/// so `has_errors` never takes the lock.
pub struct DiagnosticSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
    error_count: AtomicUsize,
}

impl DiagnosticSink {
    /// Creates a new empty diagnostic sink.
    pub fn new() -> Self {
        Self {
            diagnostics: Mutex::new(Vec::new()),
            error_count: AtomicUsize::new(0),
        }
    }

    /// Emits a diagnostic into the sink.
    pub fn emit(&self, diag: Diagnostic) {
        if diag.severity.is_error() {
            self.error_count.fetch_add(1, Ordering::Relaxed);
        }
        let mut diagnostics = self.diagnostics.lock().unwrap();
        diagnostics.push(diag);
    }

    /// Returns `true` if any error-severity diagnostics have been emitted.
    pub fn has_errors(&self) -> bool {
        self.error_count.load(Ordering::Relaxed) > 0
    }

    /// Returns the number of error-severity diagnostics emitted so far.
    pub fn error_count(&self) -> usize {
        self.error_count.load(Ordering::Relaxed)
    }

    /// Takes all accumulated diagnostics, leaving the sink empty.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        let mut diagnostics = self.diagnostics.lock().unwrap();
        std::mem::take(&mut *diagnostics)
    }

    /// Returns a snapshot of all accumulated diagnostics without draining.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let diagnostics = self.diagnostics.lock().unwrap();
        diagnostics.clone()
    }

    /// Returns a snapshot of the diagnostics at or above `min` severity.
    pub fn at_least(&self, min: Severity) -> Vec<Diagnostic> {
        let diagnostics = self.diagnostics.lock().unwrap();
        diagnostics
            .iter()
            .filter(|d| d.severity >= min)
            .cloned()
            .collect()
    }
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::{Category, DiagnosticCode};

    fn make_error() -> Diagnostic {
        Diagnostic::error(
            DiagnosticCode::new(Category::Routing, 30),
            "iteration limit reached",
        )
    }

    fn make_note() -> Diagnostic {
        Diagnostic::note(
            DiagnosticCode::new(Category::Routing, 1),
            "iteration 1: 2 overused resources",
        )
    }

    #[test]
    fn empty_sink() {
        let sink = DiagnosticSink::new();
        assert!(!sink.has_errors());
        assert_eq!(sink.error_count(), 0);
        assert!(sink.take_all().is_empty());
    }

    #[test]
    fn emit_error() {
        let sink = DiagnosticSink::new();
        sink.emit(make_error());
        assert!(sink.has_errors());
        assert_eq!(sink.error_count(), 1);
    }

    #[test]
    fn emit_note_not_error() {
        let sink = DiagnosticSink::new();
        sink.emit(make_note());
        assert!(!sink.has_errors());
        assert_eq!(sink.diagnostics().len(), 1);
    }

    #[test]
    fn at_least_filters_by_severity() {
        let sink = DiagnosticSink::new();
        sink.emit(make_note());
        sink.emit(make_error());
        sink.emit(make_note());
        assert_eq!(sink.at_least(Severity::Note).len(), 3);
        assert_eq!(sink.at_least(Severity::Warning).len(), 1);
        assert_eq!(sink.at_least(Severity::Error)[0].code.number, 30);
    }

    #[test]
    fn take_all_drains() {
        let sink = DiagnosticSink::new();
        sink.emit(make_error());
        sink.emit(make_note());
        assert_eq!(sink.take_all().len(), 2);
        assert!(sink.take_all().is_empty());
        // the counter survives draining
        assert_eq!(sink.error_count(), 1);
    }

    #[test]
    fn shared_across_threads() {
        use std::sync::Arc;
        use std::thread;

        let sink = Arc::new(DiagnosticSink::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let sink = Arc::clone(&sink);
                thread::spawn(move || {
                    for _ in 0..25 {
                        sink.emit(make_error());
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(sink.error_count(), 100);
        assert_eq!(sink.diagnostics().len(), 100);
    }
}
