//! Building the implementation graph from a design.

use crate::cell::{ImplEdge, ImplGraph, ImplNode, LogicCell};
use crate::error::ImplementationError;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{HashMap, HashSet};
use tessera_netlist::{Design, DesignEdge, DesignGraph, DesignNode, ModulePort};

/// Cell counts of an implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImplementationStats {
    /// All logic cells.
    pub logic_cells: usize,
    /// Cells holding a merged LUT and flip-flop.
    pub packed: usize,
    /// Cells holding a flip-flop behind a passthrough LUT.
    pub passthrough: usize,
    /// Cells without a flip-flop.
    pub combinational: usize,
    /// Module port bits.
    pub ports: usize,
}

/// A design packed into logic cells.
#[derive(Clone, Debug)]
pub struct Implementation {
    /// Logic cells and module port bits.
    pub graph: ImplGraph,
    /// The module input clocking every flip-flop, or `None` for purely
    /// combinational designs.
    pub clock_port: Option<NodeIndex>,
}

impl Implementation {
    /// Packs `design` into logic cells.
    ///
    /// A lookup table whose only reader is a flip-flop's data input is merged
    /// with that flip-flop. Every other table becomes a combinational cell and
    /// every other flip-flop gets a passthrough table.
    pub fn build(design: &Design) -> Result<Self, ImplementationError> {
        let source = design.build_graph()?;
        let design_clock = check_clocks(&source)?;
        let merged = find_merges(&source);

        let mut graph = ImplGraph::new();
        let mut replacements: HashMap<NodeIndex, NodeIndex> = HashMap::new();

        for node in source.node_indices() {
            if replacements.contains_key(&node) {
                continue;
            }
            let replacement = match (&source[node], merged.cell_of(node)) {
                (_, Some((lut, ff, cell))) => {
                    let index = graph.add_node(ImplNode::Cell(cell.clone()));
                    replacements.insert(lut, index);
                    replacements.insert(ff, index);
                    index
                }
                (DesignNode::Port(port), None) => graph.add_node(ImplNode::Port(port.clone())),
                (DesignNode::Lut(lut), None) => {
                    graph.add_node(ImplNode::Cell(LogicCell::combinational(lut.clone())))
                }
                (DesignNode::FlipFlop(ff), None) => {
                    graph.add_node(ImplNode::Cell(LogicCell::passthrough(ff.clone())))
                }
            };
            replacements.insert(node, replacement);
        }

        for edge in source.edge_references() {
            if merged.edges.contains(&edge.id()) {
                continue;
            }
            let from = replacements[&edge.source()];
            let to = replacements[&edge.target()];
            let tag = match *edge.weight() {
                DesignEdge::LutInput(port) => ImplEdge::LutInput(port),
                DesignEdge::Clock => ImplEdge::Clock,
                // only unmerged flip-flops still have a data edge, and their
                // passthrough table reads it on input 0
                DesignEdge::Data => ImplEdge::LutInput(0),
                DesignEdge::PortOutput => ImplEdge::PortOutput,
            };
            graph.add_edge(from, to, tag);
        }

        Ok(Self {
            graph,
            clock_port: design_clock.map(|node| replacements[&node]),
        })
    }

    /// The clock port, if the design has clocked logic.
    pub fn clock_port(&self) -> Option<&ModulePort> {
        self.clock_port.and_then(|node| match &self.graph[node] {
            ImplNode::Port(port) => Some(port),
            ImplNode::Cell(_) => None,
        })
    }

    /// Iterates over logic cells in node order.
    pub fn logic_cells(&self) -> impl Iterator<Item = (NodeIndex, &LogicCell)> + '_ {
        self.graph
            .node_indices()
            .filter_map(move |n| match &self.graph[n] {
                ImplNode::Cell(cell) => Some((n, cell)),
                ImplNode::Port(_) => None,
            })
    }

    /// Iterates over module port bits in node order.
    pub fn module_ports(&self) -> impl Iterator<Item = (NodeIndex, &ModulePort)> + '_ {
        self.graph
            .node_indices()
            .filter_map(move |n| match &self.graph[n] {
                ImplNode::Port(port) => Some((n, port)),
                ImplNode::Cell(_) => None,
            })
    }

    /// Finds a logic cell or port bit by its display name.
    pub fn find(&self, name: &str) -> Option<NodeIndex> {
        self.graph
            .node_indices()
            .find(|&n| self.graph[n].name() == name)
    }

    /// Counts cells by kind.
    pub fn stats(&self) -> ImplementationStats {
        let mut stats = ImplementationStats {
            ports: self.module_ports().count(),
            ..ImplementationStats::default()
        };
        for (_, cell) in self.logic_cells() {
            stats.logic_cells += 1;
            if cell.ff.is_none() {
                stats.combinational += 1;
            } else if cell.is_passthrough() {
                stats.passthrough += 1;
            } else {
                stats.packed += 1;
            }
        }
        stats
    }
}

/// Verifies single-clock-domain discipline.
///
/// Returns the module input clocking every flip-flop, checked in edge order
/// so the first offending flip-flop is the one reported.
fn check_clocks(graph: &DesignGraph) -> Result<Option<NodeIndex>, ImplementationError> {
    let mut clock: Option<NodeIndex> = None;
    for edge in graph.edge_references() {
        if *edge.weight() != DesignEdge::Clock {
            continue;
        }
        let flip_flop = graph[edge.target()].name();
        let driver = edge.source();
        match &graph[driver] {
            DesignNode::Port(port) if port.is_input() => {}
            other => {
                return Err(ImplementationError::NonPortClock {
                    flip_flop,
                    driver: other.name(),
                })
            }
        }
        match clock {
            None => clock = Some(driver),
            Some(expected) if expected != driver => {
                return Err(ImplementationError::MultipleClockDomains {
                    flip_flop,
                    expected: graph[expected].name(),
                    actual: graph[driver].name(),
                })
            }
            Some(_) => {}
        }
    }
    Ok(clock)
}

/// LUT/flip-flop pairs to merge and the data edges that disappear with them.
struct Merges {
    /// `(lut, flip-flop, merged cell)` per pair.
    cells: Vec<(NodeIndex, NodeIndex, LogicCell)>,
    /// Either half of a pair to its position in `cells`.
    members: HashMap<NodeIndex, usize>,
    edges: HashSet<EdgeIndex>,
}

impl Merges {
    fn cell_of(&self, node: NodeIndex) -> Option<(NodeIndex, NodeIndex, &LogicCell)> {
        let (lut, ff, cell) = &self.cells[*self.members.get(&node)?];
        Some((*lut, *ff, cell))
    }
}

fn find_merges(graph: &DesignGraph) -> Merges {
    let mut merges = Merges {
        cells: Vec::new(),
        members: HashMap::new(),
        edges: HashSet::new(),
    };
    for edge in graph.edge_references() {
        let (lut_node, ff_node) = (edge.source(), edge.target());
        let (DesignNode::Lut(lut), DesignNode::FlipFlop(ff)) = (&graph[lut_node], &graph[ff_node])
        else {
            continue;
        };
        let sole_reader = graph.edges_directed(lut_node, Direction::Outgoing).count() == 1;
        if *edge.weight() == DesignEdge::Data && sole_reader {
            let slot = merges.cells.len();
            merges.cells.push((
                lut_node,
                ff_node,
                LogicCell::registered(lut.clone(), ff.clone()),
            ));
            merges.members.insert(lut_node, slot);
            merges.members.insert(ff_node, slot);
            merges.edges.insert(edge.id());
        }
    }
    merges
}
