//! Errors raised while placing and routing.

use tessera_diagnostics::{Category, Diagnostic, DiagnosticCode};
use thiserror::Error;

/// Errors from placement, net derivation, and routing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoutingError {
    /// The design needs more logic cells than the device has.
    #[error("design needs {required} logic cells but the device has {available}")]
    NotEnoughLogicCells {
        /// Logic cells in the implementation.
        required: usize,
        /// Logic cell sites on the device.
        available: usize,
    },

    /// The design needs more I/O blocks than the device has.
    #[error("design needs {required} I/O blocks but the device has {available}")]
    NotEnoughIoBlocks {
        /// Module port bits in the implementation.
        required: usize,
        /// I/O block sites on the device.
        available: usize,
    },

    /// A cell or port has no site in the placement.
    #[error("`{node}` is not placed")]
    Unplaced {
        /// The cell or port name.
        node: String,
    },

    /// A net terminal is not part of the routing graph.
    #[error("net `{net}` uses `{resource}`, which the device does not have")]
    MissingResource {
        /// The net name.
        net: String,
        /// The missing resource.
        resource: String,
    },

    /// No path exists from a net's tree to one of its sinks.
    #[error("net `{net}` cannot reach `{sink}`")]
    Unroutable {
        /// The net name.
        net: String,
        /// The unreachable sink.
        sink: String,
    },

    /// Congestion remained after the last allowed iteration.
    #[error("routing did not converge after {iterations} iterations ({congested} shared resources)")]
    IterationLimit {
        /// Iterations run.
        iterations: u32,
        /// Resources still used by more than one net.
        congested: usize,
    },
}

impl RoutingError {
    /// The diagnostic reporting this error.
    ///
    /// Capacity and placement failures are coded `P004`-`P006`, routing
    /// failures `R004`-`R006`.
    pub fn diagnostic(&self) -> Diagnostic {
        let message = self.to_string();
        let placement = |number| DiagnosticCode::new(Category::Placement, number);
        let routing = |number| DiagnosticCode::new(Category::Routing, number);
        match self {
            RoutingError::NotEnoughLogicCells { .. } => {
                Diagnostic::error(placement(4), message).with_help("choose a wider or taller device")
            }
            RoutingError::NotEnoughIoBlocks { .. } => Diagnostic::error(placement(5), message)
                .with_help("choose a device with a longer perimeter"),
            RoutingError::Unplaced { node } => {
                Diagnostic::error(placement(6), message).with_entity(node.as_str())
            }
            RoutingError::MissingResource { net, .. } => {
                Diagnostic::error(routing(4), message).with_entity(net.as_str())
            }
            RoutingError::Unroutable { net, sink } => Diagnostic::error(routing(5), message)
                .with_entity(net.as_str())
                .with_note(format!("no path through the switch blocks reaches `{sink}`")),
            RoutingError::IterationLimit { .. } => Diagnostic::error(routing(6), message)
                .with_help("raise `router.max_iterations` or add routing channels"),
        }
    }
}
