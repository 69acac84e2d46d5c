//! Netlist loading and validation errors.

use crate::ids::BitId;
use crate::lut::LutConfigError;
use tessera_diagnostics::{Category, Diagnostic, DiagnosticCode};

/// Errors raised while reading a netlist or building its connectivity graph.
///
/// Every variant names the cell, port, or bit at fault.
#[derive(Debug, thiserror::Error)]
pub enum NetlistError {
    /// The netlist file could not be read.
    #[error("failed to read netlist: {0}")]
    Io(#[from] std::io::Error),

    /// The netlist is not valid JSON or does not match the expected layout.
    #[error("failed to parse netlist: {0}")]
    Parse(String),

    /// No module carries the `top` attribute.
    #[error("no module is marked as top")]
    NoTopModule,

    /// More than one module carries the `top` attribute.
    #[error("modules '{first}' and '{second}' are both marked as top")]
    MultipleTopModules {
        /// The first top module, in name order.
        first: String,
        /// The next one found.
        second: String,
    },

    /// A port has a direction other than `input` or `output`.
    #[error("port '{port}' has unsupported direction '{direction}'")]
    UnsupportedPort {
        /// The port name.
        port: String,
        /// The direction found.
        direction: String,
    },

    /// A cell is neither a lookup table nor a D flip-flop.
    #[error("cell '{cell}' has unsupported type '{cell_type}'")]
    UnsupportedCell {
        /// The raw cell name.
        cell: String,
        /// The cell type found.
        cell_type: String,
    },

    /// A cell lacks a connection it requires.
    #[error("cell '{cell}' is missing connection '{pin}'")]
    MissingConnection {
        /// The cell name.
        cell: String,
        /// The missing pin.
        pin: String,
    },

    /// A cell parameter is absent or not a binary number.
    #[error("cell '{cell}' has a malformed '{parameter}' parameter")]
    MalformedParameter {
        /// The cell name.
        cell: String,
        /// The parameter name.
        parameter: String,
    },

    /// A port or cell is tied to a constant instead of a wire.
    #[error("'{entity}' is tied to constant '{value}', which is not supported")]
    ConstantBit {
        /// The port or cell name.
        entity: String,
        /// The constant found, e.g. `"0"` or `"x"`.
        value: String,
    },

    /// Two raw cells map onto the same derived name.
    #[error("duplicate cell name '{0}'")]
    DuplicateCell(String),

    /// A lookup table's truth table is invalid.
    #[error("LUT {lut}: {source}")]
    InvalidLut {
        /// The lookup table name.
        lut: String,
        /// What is wrong with the truth table.
        #[source]
        source: LutConfigError,
    },

    /// A bit is driven by two different cells or ports.
    #[error("bit {bit} is driven by both '{first}' and '{second}'")]
    MultipleDrivers {
        /// The contested bit.
        bit: BitId,
        /// The first driver found.
        first: String,
        /// The conflicting driver.
        second: String,
    },

    /// A bit is read but nothing drives it.
    #[error("bit {bit} read by '{reader}' has no driver")]
    UndrivenBit {
        /// The undriven bit.
        bit: BitId,
        /// The cell or port reading it.
        reader: String,
    },
}

impl NetlistError {
    /// The diagnostic reporting this error, coded `N001`-`N013`.
    pub fn diagnostic(&self) -> Diagnostic {
        let code = |number| DiagnosticCode::new(Category::Netlist, number);
        let message = self.to_string();
        match self {
            NetlistError::Io(_) => Diagnostic::error(code(1), message),
            NetlistError::Parse(_) => Diagnostic::error(code(2), message)
                .with_help("the netlist must be the JSON written by the synthesis front-end"),
            NetlistError::NoTopModule => Diagnostic::error(code(3), message)
                .with_help("set the `top` attribute on the module to implement"),
            NetlistError::MultipleTopModules { first, second } => {
                Diagnostic::error(code(4), message)
                    .with_entity(second.as_str())
                    .with_note(format!("'{first}' is the other top module"))
            }
            NetlistError::UnsupportedPort { port, .. } => {
                Diagnostic::error(code(5), message).with_entity(port.as_str())
            }
            NetlistError::UnsupportedCell { cell, .. } => Diagnostic::error(code(6), message)
                .with_entity(cell.as_str())
                .with_note("only `$lut`, `$_DFF_P_` and `$_DFF_N_` cells can be implemented"),
            NetlistError::MissingConnection { cell, .. } => {
                Diagnostic::error(code(7), message).with_entity(cell.as_str())
            }
            NetlistError::MalformedParameter { cell, .. } => {
                Diagnostic::error(code(8), message).with_entity(cell.as_str())
            }
            NetlistError::ConstantBit { entity, .. } => Diagnostic::error(code(9), message)
                .with_entity(entity.as_str())
                .with_help("constant drivers are not supported; map them to a LUT"),
            NetlistError::DuplicateCell(name) => {
                Diagnostic::error(code(10), message).with_entity(name.as_str())
            }
            NetlistError::InvalidLut { lut, .. } => {
                Diagnostic::error(code(11), message).with_entity(lut.as_str())
            }
            NetlistError::MultipleDrivers { first, second, .. } => {
                Diagnostic::error(code(12), message)
                    .with_entity(second.as_str())
                    .with_note(format!("'{first}' drives the same bit"))
            }
            NetlistError::UndrivenBit { reader, .. } => {
                Diagnostic::error(code(13), message).with_entity(reader.as_str())
            }
        }
    }
}
