//! The routing record handed to bitstream generation and visualization.
//!
//! Every resource of the device appears in the record, labelled with the
//! name of the net that uses it or `null` when unused.

use crate::net::Net;
use crate::placement::Placement;
use crate::routing::RouteResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tessera_arch::{
    CardinalDirection, DeviceTopology, IntercardinalDirection, RoutingNode, SwitchBlockCoords,
    LOGIC_CELL_INPUTS,
};
use tessera_impl::{ImplNode, Implementation};
use tessera_netlist::PortDirection;

/// A fully placed and routed design.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingRecord {
    /// Device dimensions.
    pub device: DeviceRecord,
    /// Every switch block, column by column.
    pub switch_blocks: Vec<SwitchBlockRecord>,
    /// Every logic cell site, column by column.
    pub logic_cells: Vec<LogicCellRecord>,
    /// Every I/O block.
    pub io_blocks: Vec<IoBlockRecord>,
}

/// Device dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    /// Logic cell columns.
    pub width: u32,
    /// Logic cell rows.
    pub height: u32,
    /// Wires per switch block side.
    pub channels: u32,
}

/// One switch block and the net on each of its wires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchBlockRecord {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
    /// Switch blocks sharing a side with this one.
    pub neighbors: Vec<SwitchBlockCoords>,
    /// The four sides.
    pub sides: Vec<SideRecord>,
    /// The four corners.
    pub corners: Vec<CornerRecord>,
}

/// One switch block side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideRecord {
    /// Which side.
    pub direction: CardinalDirection,
    /// Net on each input channel.
    pub inputs: Vec<Option<String>>,
    /// Net on each output channel.
    pub outputs: Vec<Option<String>>,
}

/// One switch block corner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CornerRecord {
    /// Which corner.
    pub direction: IntercardinalDirection,
    /// Net entering through the corner.
    pub net: Option<String>,
}

/// One logic cell site and its configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicCellRecord {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
    /// The cell placed here, if any.
    pub name: Option<String>,
    /// Truth table expanded to all 16 entries; 0 for an empty site.
    pub lut_config: u16,
    /// The flip-flop configuration, if the cell registers its output.
    pub flip_flop: Option<FlipFlopRecord>,
    /// Net on each LUT input.
    pub inputs: Vec<Option<String>>,
    /// Net driven by the cell.
    pub output: Option<String>,
}

/// Flip-flop configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlipFlopRecord {
    /// `true` for rising-edge triggering.
    pub rising_edge_trigger: bool,
}

/// What an I/O block does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IoFunction {
    /// Drives a module input into the fabric.
    Input,
    /// Presents a module output.
    Output,
    /// Nothing placed here.
    Unused,
}

/// One I/O block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoBlockRecord {
    /// Device edge.
    pub direction: CardinalDirection,
    /// Position along the edge.
    pub index: u32,
    /// What the block does.
    pub function: IoFunction,
    /// The port bit placed here, if any.
    pub port: Option<String>,
    /// The net through the block.
    pub net: Option<String>,
}

impl RoutingRecord {
    /// Builds the record of a routed placement.
    pub fn new(
        topology: &DeviceTopology,
        implementation: &Implementation,
        placement: &Placement,
        nets: &[Net],
        routes: &RouteResult,
    ) -> Self {
        let owners = owners(nets, routes);
        let net_on = |node: RoutingNode| owners.get(&node).cloned();
        let channels = topology.channels() as u8;

        let switch_blocks = topology
            .switch_block_coords()
            .map(|block| SwitchBlockRecord {
                x: block.x,
                y: block.y,
                neighbors: topology
                    .adjacent_switch_blocks(block)
                    .into_iter()
                    .map(|(_, n)| n)
                    .collect(),
                sides: CardinalDirection::ALL
                    .into_iter()
                    .map(|side| SideRecord {
                        direction: side,
                        inputs: (0..channels)
                            .map(|channel| {
                                net_on(RoutingNode::SwitchInput {
                                    block,
                                    side,
                                    channel,
                                })
                            })
                            .collect(),
                        outputs: (0..channels)
                            .map(|channel| {
                                net_on(RoutingNode::SwitchOutput {
                                    block,
                                    side,
                                    channel,
                                })
                            })
                            .collect(),
                    })
                    .collect(),
                corners: IntercardinalDirection::ALL
                    .into_iter()
                    .map(|corner| CornerRecord {
                        direction: corner,
                        net: net_on(RoutingNode::Corner { block, corner }),
                    })
                    .collect(),
            })
            .collect();

        let logic_cells = topology
            .logic_cell_coords()
            .map(|cell| {
                let placed = placement
                    .cell_at(cell)
                    .and_then(|node| match &implementation.graph[node] {
                        ImplNode::Cell(logic) => Some(logic),
                        ImplNode::Port(_) => None,
                    });
                LogicCellRecord {
                    x: cell.x,
                    y: cell.y,
                    name: placed.map(|c| c.name().to_string()),
                    lut_config: placed.map_or(0, |c| c.lut.config.expanded()),
                    flip_flop: placed.and_then(|c| c.ff.as_ref()).map(|ff| FlipFlopRecord {
                        rising_edge_trigger: ff.rising_edge_trigger,
                    }),
                    inputs: (0..LOGIC_CELL_INPUTS)
                        .map(|port| net_on(RoutingNode::CellInput { cell, port }))
                        .collect(),
                    output: net_on(RoutingNode::CellOutput { cell }),
                }
            })
            .collect();

        let io_blocks = topology
            .io_block_coords()
            .map(|io| {
                let port = placement
                    .port_at(io)
                    .and_then(|node| match &implementation.graph[node] {
                        ImplNode::Port(port) => Some(port),
                        ImplNode::Cell(_) => None,
                    });
                IoBlockRecord {
                    direction: io.side,
                    index: io.index,
                    function: match port.map(|p| p.direction) {
                        Some(PortDirection::Input) => IoFunction::Input,
                        Some(PortDirection::Output) => IoFunction::Output,
                        None => IoFunction::Unused,
                    },
                    port: port.map(|p| p.to_string()),
                    net: net_on(RoutingNode::IoBlock(io)),
                }
            })
            .collect();

        Self {
            device: DeviceRecord {
                width: topology.width(),
                height: topology.height(),
                channels: topology.channels(),
            },
            switch_blocks,
            logic_cells,
            io_blocks,
        }
    }

    /// Serializes the record as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Maps each used resource to the name of the net using it.
fn owners(nets: &[Net], routes: &RouteResult) -> HashMap<RoutingNode, String> {
    let mut owners = HashMap::new();
    for net in nets {
        let Some(resources) = routes.route_of(&net.source) else {
            continue;
        };
        for &node in resources {
            owners.insert(node, net.name.clone());
        }
    }
    owners
}
