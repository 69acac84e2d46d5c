//! Implementation errors.

use tessera_diagnostics::{Category, Diagnostic, DiagnosticCode};
use tessera_netlist::NetlistError;

/// Errors raised while packing a design into logic cells.
#[derive(Debug, thiserror::Error)]
pub enum ImplementationError {
    /// The design itself is malformed.
    #[error(transparent)]
    Netlist(#[from] NetlistError),

    /// A flip-flop's clock comes from logic instead of a module input.
    #[error("flip-flop '{flip_flop}' is clocked from '{driver}', which is not a module input")]
    NonPortClock {
        /// The offending flip-flop.
        flip_flop: String,
        /// The cell driving its clock.
        driver: String,
    },

    /// Two module inputs clock flip-flops; only one clock domain is supported.
    #[error("flip-flop '{flip_flop}' is clocked by '{actual}', but the design clock is '{expected}'")]
    MultipleClockDomains {
        /// The offending flip-flop.
        flip_flop: String,
        /// The clock port seen first.
        expected: String,
        /// The second clock port.
        actual: String,
    },
}

impl ImplementationError {
    /// The diagnostic reporting this error. Netlist errors keep their own code.
    pub fn diagnostic(&self) -> Diagnostic {
        match self {
            ImplementationError::Netlist(err) => err.diagnostic(),
            ImplementationError::NonPortClock { flip_flop, .. } => Diagnostic::error(
                DiagnosticCode::new(Category::Implementation, 1),
                self.to_string(),
            )
            .with_entity(flip_flop.as_str())
            .with_note("clocks reach flip-flops on a dedicated network fed by one module input"),
            ImplementationError::MultipleClockDomains {
                flip_flop,
                expected,
                ..
            } => Diagnostic::error(
                DiagnosticCode::new(Category::Implementation, 2),
                self.to_string(),
            )
            .with_entity(flip_flop.as_str())
            .with_note(format!("every flip-flop must be clocked by '{expected}'")),
        }
    }
}
