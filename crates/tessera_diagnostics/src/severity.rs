//! Diagnostic severity levels ordered from least to most severe.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The severity level of a diagnostic message.
///
/// Ordered from least severe (`Help`) to most severe (`Error`) by declaration
/// order, so filtering by a minimum level is a plain comparison.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Severity {
    /// A suggestion that doesn't indicate a problem.
    Help,
    /// Progress or context information, such as a router iteration summary.
    Note,
    /// A potential issue that doesn't stop the flow.
    Warning,
    /// A definite problem that stops the current stage.
    Error,
}

impl Severity {
    /// Returns `true` if this severity is [`Error`](Severity::Error).
    pub fn is_error(self) -> bool {
        self == Severity::Error
    }

    /// Returns the lowest severity shown for the given output verbosity.
    ///
    /// Quiet output keeps only errors, verbose output keeps everything, and
    /// the default hides notes and help.
    pub fn threshold(quiet: bool, verbose: bool) -> Severity {
        if quiet {
            Severity::Error
        } else if verbose {
            Severity::Help
        } else {
            Severity::Warning
        }
    }

    /// ANSI SGR parameters used when rendering the severity label in color.
    pub fn ansi_style(self) -> &'static str {
        match self {
            Severity::Help => "1;36",
            Severity::Note => "1;34",
            Severity::Warning => "1;33",
            Severity::Error => "1;31",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Help => write!(f, "help"),
            Severity::Note => write!(f, "note"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}
