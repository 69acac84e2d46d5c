//! Simulation error types.

use tessera_diagnostics::{Category, Diagnostic, DiagnosticCode};

/// Errors raised while building or driving a [`Simulator`](crate::Simulator).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimError {
    /// `set_input` named a port the design does not have.
    #[error("no such input port `{0}`")]
    UnknownInput(String),

    /// `get_output` named a port the design does not have.
    #[error("no such output port `{0}`")]
    UnknownOutput(String),

    /// `tick` was called on a design without clocked logic.
    #[error("design has no clock input")]
    NoClock,

    /// Combinational logic feeds back on itself without a flip-flop in the loop.
    #[error("combinational loop through `{cell}`")]
    CombinationalLoop {
        /// A cell on the loop.
        cell: String,
    },

    /// A port is wider than the 64 bits a value can hold.
    #[error("port `{port}` has {width} bits, more than the 64 supported")]
    PortTooWide {
        /// The port name.
        port: String,
        /// Its width.
        width: usize,
    },
}

impl SimError {
    /// The diagnostic reporting this error, coded `S001`-`S005`.
    pub fn diagnostic(&self) -> Diagnostic {
        let code = |number| DiagnosticCode::new(Category::Simulation, number);
        let message = self.to_string();
        match self {
            SimError::UnknownInput(port) => {
                Diagnostic::error(code(1), message).with_entity(port.as_str())
            }
            SimError::UnknownOutput(port) => {
                Diagnostic::error(code(2), message).with_entity(port.as_str())
            }
            SimError::NoClock => Diagnostic::error(code(3), message)
                .with_help("use `eval` for purely combinational designs"),
            SimError::CombinationalLoop { cell } => Diagnostic::error(code(4), message)
                .with_entity(cell.as_str())
                .with_note("every feedback path must pass through a flip-flop"),
            SimError::PortTooWide { port, .. } => {
                Diagnostic::error(code(5), message).with_entity(port.as_str())
            }
        }
    }
}
