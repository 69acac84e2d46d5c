//! The cycle simulator.

use crate::error::SimError;
use petgraph::algo::toposort;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::BTreeMap;
use tessera_impl::{ImplEdge, ImplGraph, ImplNode, Implementation};
use tessera_netlist::LutConfig;

/// A logic cell prepared for evaluation.
#[derive(Debug, Clone)]
struct SimCell {
    node: NodeIndex,
    config: LutConfig,
    /// `Some(rising_edge_trigger)` when the output is registered.
    trigger: Option<bool>,
    /// `(lut input, driver)` pairs.
    inputs: Vec<(u8, NodeIndex)>,
}

/// Evaluates an implementation one clock edge at a time.
///
/// Every node of the implementation graph holds one bit of state: a module
/// input holds the value last set on it, a combinational cell the value it
/// computed in the last [`eval`](Self::eval), and a registered cell the value
/// its flip-flop captured at the last active edge.
#[derive(Debug, Clone)]
pub struct Simulator {
    cells: Vec<SimCell>,
    inputs: BTreeMap<String, Vec<NodeIndex>>,
    /// Driver of each output bit, `None` if undriven.
    outputs: BTreeMap<String, Vec<Option<NodeIndex>>>,
    clock: Option<NodeIndex>,
    state: Vec<bool>,
    last_clock: bool,
    cycle: u64,
}

impl Simulator {
    /// Prepares `implementation` for simulation.
    ///
    /// Flip-flop outputs are the only place feedback may occur, so the
    /// evaluation order is computed with those edges removed. A loop that
    /// remains is purely combinational and rejected.
    pub fn new(implementation: &Implementation) -> Result<Self, SimError> {
        let graph = &implementation.graph;

        let mut inputs: BTreeMap<String, Vec<(usize, NodeIndex)>> = BTreeMap::new();
        let mut outputs: BTreeMap<String, Vec<(usize, Option<NodeIndex>)>> = BTreeMap::new();
        for (node, port) in implementation.module_ports() {
            if port.is_input() {
                inputs
                    .entry(port.name.clone())
                    .or_default()
                    .push((port.bit_index, node));
            } else {
                let driver = data_inputs(graph, node).first().map(|&(_, source)| source);
                outputs
                    .entry(port.name.clone())
                    .or_default()
                    .push((port.bit_index, driver));
            }
        }
        let inputs = by_bit_index(inputs)?;
        let outputs = by_bit_index(outputs)?;

        let order = evaluation_order(graph)?;
        let cells = order
            .into_iter()
            .filter_map(|node| match &graph[node] {
                ImplNode::Cell(cell) => Some(SimCell {
                    node,
                    config: cell.lut.config,
                    trigger: cell.ff.as_ref().map(|ff| ff.rising_edge_trigger),
                    inputs: data_inputs(graph, node),
                }),
                ImplNode::Port(_) => None,
            })
            .collect();

        Ok(Self {
            cells,
            inputs,
            outputs,
            clock: implementation.clock_port,
            state: vec![false; graph.node_count()],
            last_clock: false,
            cycle: 0,
        })
    }

    /// Drives input port `name`; bit `i` of `value` goes to bit `i` of the port.
    pub fn set_input(&mut self, name: &str, value: u64) -> Result<(), SimError> {
        let bits = self
            .inputs
            .get(name)
            .ok_or_else(|| SimError::UnknownInput(name.to_string()))?;
        for (i, node) in bits.iter().enumerate() {
            self.state[node.index()] = value & (1 << i) != 0;
        }
        Ok(())
    }

    /// Reads output port `name` as an integer, bit 0 first.
    pub fn get_output(&self, name: &str) -> Result<u64, SimError> {
        let bits = self
            .outputs
            .get(name)
            .ok_or_else(|| SimError::UnknownOutput(name.to_string()))?;
        Ok(bits.iter().enumerate().fold(0, |value, (i, driver)| {
            match driver {
                Some(node) if self.state[node.index()] => value | (1 << i),
                _ => value,
            }
        }))
    }

    /// Evaluates every cell once.
    ///
    /// Combinational cells update in dependency order. Registered cells
    /// whose flip-flop sees its active clock edge since the previous call
    /// capture their LUT output, all at once after the pass, so every
    /// flip-flop observes pre-edge values.
    pub fn eval(&mut self) {
        let clock = self.clock.is_some_and(|c| self.state[c.index()]);
        let rising = clock && !self.last_clock;
        let falling = !clock && self.last_clock;

        let mut pending: Vec<(NodeIndex, bool)> = Vec::new();
        for cell in &self.cells {
            let index = cell
                .inputs
                .iter()
                .filter(|(_, source)| self.state[source.index()])
                .fold(0usize, |index, &(port, _)| index | (1 << port));
            let output = cell.config.lookup(index);
            match cell.trigger {
                Some(true) if rising => pending.push((cell.node, output)),
                Some(false) if falling => pending.push((cell.node, output)),
                Some(_) => {}
                None => self.state[cell.node.index()] = output,
            }
        }

        for (node, value) in pending {
            self.state[node.index()] = value;
        }
        self.last_clock = clock;
    }

    /// Drives one full clock pulse, high then low, evaluating after each
    /// transition so both rising and falling edge flip-flops trigger.
    pub fn tick(&mut self) -> Result<(), SimError> {
        let clock = self.clock.ok_or(SimError::NoClock)?;
        self.state[clock.index()] = true;
        self.eval();
        self.state[clock.index()] = false;
        self.eval();
        self.cycle += 1;
        Ok(())
    }

    /// Input port names, sorted.
    pub fn input_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.inputs.keys().map(String::as_str)
    }

    /// Output port names, sorted.
    pub fn output_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.outputs.keys().map(String::as_str)
    }

    /// Completed calls to [`tick`](Self::tick).
    pub fn cycle(&self) -> u64 {
        self.cycle
    }
}

/// Non-clock drivers of `node`, ordered by LUT input.
fn data_inputs(graph: &ImplGraph, node: NodeIndex) -> Vec<(u8, NodeIndex)> {
    let mut inputs: Vec<(u8, NodeIndex)> = graph
        .edges_directed(node, Direction::Incoming)
        .filter_map(|edge| match *edge.weight() {
            ImplEdge::LutInput(port) => Some((port, edge.source())),
            ImplEdge::PortOutput => Some((0, edge.source())),
            ImplEdge::Clock => None,
        })
        .collect();
    inputs.sort();
    inputs
}

/// Sorts the bits of each port and checks they fit in a `u64`.
fn by_bit_index<T>(
    ports: BTreeMap<String, Vec<(usize, T)>>,
) -> Result<BTreeMap<String, Vec<T>>, SimError> {
    ports
        .into_iter()
        .map(|(name, mut bits)| {
            if bits.len() > 64 {
                return Err(SimError::PortTooWide {
                    port: name,
                    width: bits.len(),
                });
            }
            bits.sort_by_key(|&(index, _)| index);
            Ok((name, bits.into_iter().map(|(_, bit)| bit).collect()))
        })
        .collect()
}

/// Topological order of the graph with clock edges, port edges, and
/// flip-flop outputs removed.
fn evaluation_order(graph: &ImplGraph) -> Result<Vec<NodeIndex>, SimError> {
    let mut combinational = graph.clone();
    combinational.retain_edges(|g, edge| {
        let Some((source, target)) = g.edge_endpoints(edge) else {
            return false;
        };
        let registered = match &g[source] {
            ImplNode::Cell(cell) => cell.ff.is_some(),
            ImplNode::Port(_) => true,
        };
        !registered && matches!(g[target], ImplNode::Cell(_)) && g[edge] != ImplEdge::Clock
    });
    toposort(&combinational, None).map_err(|cycle| SimError::CombinationalLoop {
        cell: graph[cycle.node_id()].name(),
    })
}
