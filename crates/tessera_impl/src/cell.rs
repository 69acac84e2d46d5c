//! Logic cells and the implementation graph.

use petgraph::graph::DiGraph;
use serde::{Deserialize, Serialize};
use tessera_netlist::{FlipFlop, LookUpTable, LutConfig, ModulePort};

/// The fabric's programmable unit: a lookup table with an optional flip-flop
/// on its output.
///
/// The lookup table is always present. A flip-flop with nothing to merge
/// gets a passthrough table wired to its data input, so every cell computes
/// through a LUT. Two cells are the same cell when both halves match.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogicCell {
    /// The combinational half.
    pub lut: LookUpTable,
    /// The registered half, if the cell's output is clocked.
    pub ff: Option<FlipFlop>,
}

impl LogicCell {
    /// Creates a purely combinational cell.
    pub fn combinational(lut: LookUpTable) -> Self {
        Self { lut, ff: None }
    }

    /// Creates a cell registering `lut`'s output in `ff`.
    pub fn registered(lut: LookUpTable, ff: FlipFlop) -> Self {
        Self { lut, ff: Some(ff) }
    }

    /// Creates a cell that only registers its input 0.
    pub fn passthrough(ff: FlipFlop) -> Self {
        let lut = LookUpTable {
            name: format!("$passthrough${}", ff.name),
            config: LutConfig::PASSTHROUGH,
        };
        Self { lut, ff: Some(ff) }
    }

    /// The flip-flop name for registered cells, the LUT name otherwise.
    pub fn name(&self) -> &str {
        match &self.ff {
            Some(ff) => &ff.name,
            None => &self.lut.name,
        }
    }

    /// Returns `true` if the cell's lookup table was synthesized for its flip-flop.
    pub fn is_passthrough(&self) -> bool {
        self.ff.is_some() && self.lut.name.starts_with("$passthrough$")
    }
}

/// A node of the implementation graph.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImplNode {
    /// A packed logic cell.
    Cell(LogicCell),
    /// One bit of a module port.
    Port(ModulePort),
}

impl ImplNode {
    /// A human-readable name for messages and net identifiers.
    pub fn name(&self) -> String {
        match self {
            ImplNode::Cell(cell) => cell.name().to_string(),
            ImplNode::Port(port) => port.to_string(),
        }
    }
}

/// Which input of the target an implementation edge feeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImplEdge {
    /// Lookup table input, 0 to 3.
    LutInput(u8),
    /// Dedicated clock; not routed through the fabric.
    Clock,
    /// An output port bit.
    PortOutput,
}

/// Graph of logic cells and ports.
pub type ImplGraph = DiGraph<ImplNode, ImplEdge>;

#[cfg(test)]
mod tests {
    use super::*;

    fn ff(name: &str) -> FlipFlop {
        FlipFlop {
            name: name.to_string(),
            rising_edge_trigger: true,
        }
    }

    #[test]
    fn passthrough_cell_wraps_flip_flop() {
        let cell = LogicCell::passthrough(ff("$dff_p$3"));
        assert_eq!(cell.lut.name, "$passthrough$$dff_p$3");
        assert_eq!(cell.lut.config, LutConfig::PASSTHROUGH);
        assert!(cell.is_passthrough());
        assert_eq!(cell.name(), "$dff_p$3");
    }

    #[test]
    fn combinational_cell_named_after_lut() {
        let lut = LookUpTable {
            name: "$lut$8".to_string(),
            config: LutConfig::new(0b01, 1).unwrap(),
        };
        let cell = LogicCell::combinational(lut);
        assert_eq!(cell.name(), "$lut$8");
        assert!(!cell.is_passthrough());
    }

    #[test]
    fn identity_is_structural() {
        assert_eq!(
            LogicCell::passthrough(ff("a")),
            LogicCell::passthrough(ff("a"))
        );
        assert_ne!(
            LogicCell::passthrough(ff("a")),
            LogicCell::passthrough(ff("b"))
        );
    }
}
