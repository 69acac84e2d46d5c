//! Diagnostic rendering backends.

use crate::diagnostic::Diagnostic;

/// Trait for rendering diagnostics into formatted output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic) -> String;
}

/// Renders diagnostics in a rustc-style terminal format.
///
/// Produces output like:
/// ```text
/// error[I101]: flip-flop is clocked by logic instead of a module input
///   --> $dff_p$7
///    = note: ...
///    = help: ...
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
    /// The terminal width; long entity names are shortened to fit.
    pub width: u16,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool, width: u16) -> Self {
        Self { color, width }
    }

    fn severity_label(&self, diag: &Diagnostic) -> String {
        let label = format!("{}[{}]", diag.severity, diag.code);
        if self.color {
            format!("\x1b[{}m{label}\x1b[0m", diag.severity.ansi_style())
        } else {
            label
        }
    }

    fn fit(&self, entity: &str) -> String {
        // "  --> " prefix
        let room = (self.width as usize).saturating_sub(6).max(8);
        if entity.chars().count() <= room {
            return entity.to_string();
        }
        let keep: String = entity.chars().take(room - 3).collect();
        format!("{keep}...")
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let mut out = format!("{}: {}\n", self.severity_label(diag), diag.message);

        if let Some(entity) = &diag.entity {
            out.push_str(&format!("  --> {}\n", self.fit(entity)));
        }

        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }

        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }

        out
    }
}
