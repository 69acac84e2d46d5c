//! Per-bit connectivity graph of a design.
//!
//! Nodes are module port bits, lookup tables, and flip-flops. Each bit
//! becomes a set of edges from its single driver to each of its readers,
//! tagged with the reader's input pin.

use crate::design::Design;
use crate::error::NetlistError;
use crate::ids::BitId;
use crate::lut::LutConfig;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A lookup table node.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LookUpTable {
    /// Derived cell name.
    pub name: String,
    /// The truth table.
    pub config: LutConfig,
}

/// A flip-flop node.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlipFlop {
    /// Derived cell name.
    pub name: String,
    /// `true` for rising-edge triggering.
    pub rising_edge_trigger: bool,
}

/// Direction of a module port.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PortDirection {
    /// Driven from outside the device.
    Input,
    /// Observed from outside the device.
    Output,
}

/// One bit of a named module port.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModulePort {
    /// The port name.
    pub name: String,
    /// Position of this bit within the port, least significant first.
    pub bit_index: usize,
    /// Input or output.
    pub direction: PortDirection,
}

impl ModulePort {
    /// Returns `true` for input ports.
    pub fn is_input(&self) -> bool {
        self.direction == PortDirection::Input
    }
}

impl fmt::Display for ModulePort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.name, self.bit_index)
    }
}

/// A node of the per-bit connectivity graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DesignNode {
    /// One bit of a module port.
    Port(ModulePort),
    /// A lookup table.
    Lut(LookUpTable),
    /// A flip-flop.
    FlipFlop(FlipFlop),
}

impl DesignNode {
    /// A human-readable name for error messages.
    pub fn name(&self) -> String {
        match self {
            DesignNode::Port(port) => port.to_string(),
            DesignNode::Lut(lut) => lut.name.clone(),
            DesignNode::FlipFlop(ff) => ff.name.clone(),
        }
    }
}

/// Which input of the reader an edge feeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DesignEdge {
    /// Lookup table input, 0 to 3.
    LutInput(u8),
    /// Flip-flop clock.
    Clock,
    /// Flip-flop data input.
    Data,
    /// An output port bit; carries no pin tag.
    PortOutput,
}

/// The per-bit connectivity graph.
pub type DesignGraph = DiGraph<DesignNode, DesignEdge>;

impl Design {
    /// Builds the per-bit connectivity graph.
    ///
    /// Every port bit gets a node even if nothing reads it. Fails if a bit has
    /// two drivers or if a cell or output reads a bit nobody drives.
    pub fn build_graph(&self) -> Result<DesignGraph, NetlistError> {
        let mut graph = DesignGraph::new();
        let mut drivers: BTreeMap<BitId, NodeIndex> = BTreeMap::new();
        let mut readers: BTreeMap<BitId, Vec<(NodeIndex, DesignEdge)>> = BTreeMap::new();

        let mut drive =
            |graph: &DesignGraph, bit: BitId, node: NodeIndex| -> Result<(), NetlistError> {
                if let Some(&first) = drivers.get(&bit) {
                    return Err(NetlistError::MultipleDrivers {
                        bit,
                        first: graph[first].name(),
                        second: graph[node].name(),
                    });
                }
                drivers.insert(bit, node);
                Ok(())
            };

        for (name, bits) in &self.inputs {
            for (bit_index, &bit) in bits.iter().enumerate() {
                let node = graph.add_node(DesignNode::Port(ModulePort {
                    name: name.clone(),
                    bit_index,
                    direction: PortDirection::Input,
                }));
                drive(&graph, bit, node)?;
            }
        }

        for (name, bits) in &self.outputs {
            for (bit_index, &bit) in bits.iter().enumerate() {
                let node = graph.add_node(DesignNode::Port(ModulePort {
                    name: name.clone(),
                    bit_index,
                    direction: PortDirection::Output,
                }));
                readers
                    .entry(bit)
                    .or_default()
                    .push((node, DesignEdge::PortOutput));
            }
        }

        for (name, def) in &self.flip_flops {
            let node = graph.add_node(DesignNode::FlipFlop(FlipFlop {
                name: name.clone(),
                rising_edge_trigger: def.rising_edge_trigger,
            }));
            readers
                .entry(def.clock_bit)
                .or_default()
                .push((node, DesignEdge::Clock));
            readers
                .entry(def.data_bit)
                .or_default()
                .push((node, DesignEdge::Data));
            drive(&graph, def.output_bit, node)?;
        }

        for (name, def) in &self.lookup_tables {
            let node = graph.add_node(DesignNode::Lut(LookUpTable {
                name: name.clone(),
                config: def.config,
            }));
            for (port, &bit) in def.input_bits.iter().enumerate() {
                readers
                    .entry(bit)
                    .or_default()
                    .push((node, DesignEdge::LutInput(port as u8)));
            }
            drive(&graph, def.output_bit, node)?;
        }

        for (bit, sinks) in readers {
            let Some(&source) = drivers.get(&bit) else {
                let (reader, _) = sinks[0];
                return Err(NetlistError::UndrivenBit {
                    bit,
                    reader: graph[reader].name(),
                });
            };
            for (sink, edge) in sinks {
                graph.add_edge(source, sink, edge);
            }
        }

        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::{FlipFlopDef, LookUpTableDef};
    use petgraph::visit::EdgeRef;

    fn bit(raw: u32) -> BitId {
        BitId::from_raw(raw)
    }

    /// Q <= A & B on the rising edge of `clock`.
    fn and_ff() -> Design {
        let mut design = Design {
            name: "and_ff".to_string(),
            ..Design::default()
        };
        design.inputs.insert("A".into(), vec![bit(2)]);
        design.inputs.insert("B".into(), vec![bit(3)]);
        design.inputs.insert("clock".into(), vec![bit(4)]);
        design.outputs.insert("Q".into(), vec![bit(5)]);
        design.lookup_tables.insert(
            "$lut$1".into(),
            LookUpTableDef {
                config: LutConfig::new(0b1000, 2).unwrap(),
                input_bits: vec![bit(2), bit(3)],
                output_bit: bit(6),
            },
        );
        design.flip_flops.insert(
            "$dff_p$2".into(),
            FlipFlopDef {
                rising_edge_trigger: true,
                clock_bit: bit(4),
                data_bit: bit(6),
                output_bit: bit(5),
            },
        );
        design
    }

    fn find(graph: &DesignGraph, name: &str) -> NodeIndex {
        graph
            .node_indices()
            .find(|&n| graph[n].name() == name)
            .unwrap()
    }

    #[test]
    fn graph_has_node_per_port_bit_and_cell() {
        let graph = and_ff().build_graph().unwrap();
        assert_eq!(graph.node_count(), 6);
        assert_eq!(graph.edge_count(), 5);
    }

    #[test]
    fn edges_carry_pin_tags() {
        let graph = and_ff().build_graph().unwrap();
        let lut = find(&graph, "$lut$1");
        let ff = find(&graph, "$dff_p$2");
        let a = find(&graph, "A[0]");
        let b = find(&graph, "B[0]");
        let clock = find(&graph, "clock[0]");
        let q = find(&graph, "Q[0]");

        let tag = |from, to| *graph.edges_connecting(from, to).next().unwrap().weight();
        assert_eq!(tag(a, lut), DesignEdge::LutInput(0));
        assert_eq!(tag(b, lut), DesignEdge::LutInput(1));
        assert_eq!(tag(clock, ff), DesignEdge::Clock);
        assert_eq!(tag(lut, ff), DesignEdge::Data);
        assert_eq!(tag(ff, q), DesignEdge::PortOutput);
    }

    #[test]
    fn unused_input_still_has_a_node() {
        let mut design = and_ff();
        design.inputs.insert("spare".into(), vec![bit(9)]);
        let graph = design.build_graph().unwrap();
        let spare = find(&graph, "spare[0]");
        assert_eq!(graph.edges(spare).count(), 0);
    }

    #[test]
    fn second_driver_is_an_error() {
        let mut design = and_ff();
        design.lookup_tables.insert(
            "$lut$3".into(),
            LookUpTableDef {
                config: LutConfig::new(0b01, 1).unwrap(),
                input_bits: vec![bit(2)],
                output_bit: bit(6),
            },
        );
        match design.build_graph().unwrap_err() {
            NetlistError::MultipleDrivers { bit: b, first, second } => {
                assert_eq!(b, bit(6));
                assert_eq!(first, "$lut$1");
                assert_eq!(second, "$lut$3");
            }
            other => panic!("expected MultipleDrivers, got {other:?}"),
        }
    }

    #[test]
    fn input_port_cannot_share_a_cell_output() {
        let mut design = and_ff();
        design.inputs.insert("D".into(), vec![bit(5)]);
        assert!(matches!(
            design.build_graph(),
            Err(NetlistError::MultipleDrivers { .. })
        ));
    }

    #[test]
    fn undriven_read_is_an_error() {
        let mut design = and_ff();
        design.outputs.insert("Z".into(), vec![bit(40)]);
        assert!(matches!(
            design.build_graph(),
            Err(NetlistError::UndrivenBit { ref reader, .. }) if reader == "Z[0]"
        ));
    }

    #[test]
    fn multi_bit_ports_index_bits() {
        let mut design = Design::default();
        design.inputs.insert("data".into(), vec![bit(2), bit(3)]);
        design.outputs.insert("out".into(), vec![bit(3), bit(2)]);
        let graph = design.build_graph().unwrap();
        let data1 = find(&graph, "data[1]");
        let out0 = find(&graph, "out[0]");
        assert!(graph.edges(data1).any(|e| e.target() == out0));
    }
}
