//! Device geometry and construction of the routing network.

use crate::coords::{IoBlockCoords, LogicCellCoords, SwitchBlockCoords};
use crate::direction::{CardinalDirection, IntercardinalDirection};
use crate::error::TopologyError;
use crate::graph::RoutingGraph;
use crate::node::RoutingNode;
use serde::{Deserialize, Serialize};

/// LUT inputs per logic cell.
pub const LOGIC_CELL_INPUTS: u8 = 4;

/// Channels per switch block side unless configured otherwise.
pub const DEFAULT_CHANNELS: u32 = 4;

/// The widest channel count switch blocks support.
pub const MAX_CHANNELS: u32 = 4;

/// Cost multiplier on I/O connections, so the router saves perimeter wires
/// for signals that actually enter or leave the device.
const IO_COST: u32 = 100;

/// Geometry of a device: its logic cell grid and routing channel count.
///
/// Immutable once built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceTopology {
    width: u32,
    height: u32,
    channels: u32,
}

impl DeviceTopology {
    /// A `width x height` device with the default channel count.
    pub fn new(width: u32, height: u32) -> Result<Self, TopologyError> {
        Self::with_channels(width, height, DEFAULT_CHANNELS)
    }

    /// A `width x height` device with `channels` wires per switch block side.
    pub fn with_channels(width: u32, height: u32, channels: u32) -> Result<Self, TopologyError> {
        if width == 0 || height == 0 {
            return Err(TopologyError::Empty { width, height });
        }
        if channels == 0 || channels > MAX_CHANNELS {
            return Err(TopologyError::Channels {
                channels,
                max: MAX_CHANNELS,
            });
        }
        Ok(Self {
            width,
            height,
            channels,
        })
    }

    /// Logic cell columns.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Logic cell rows.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Wires per switch block side.
    pub fn channels(&self) -> u32 {
        self.channels
    }

    /// Number of logic cell sites.
    pub fn logic_cell_count(&self) -> usize {
        (self.width * self.height) as usize
    }

    /// Number of I/O block sites.
    pub fn io_block_count(&self) -> usize {
        (2 * (self.width + 1) + 2 * (self.height + 1)) as usize
    }

    /// All switch blocks, column by column.
    pub fn switch_block_coords(&self) -> impl Iterator<Item = SwitchBlockCoords> {
        let height = self.height;
        (0..=self.width)
            .flat_map(move |x| (0..=height).map(move |y| SwitchBlockCoords::new(x, y)))
    }

    /// All logic cell sites, column by column.
    pub fn logic_cell_coords(&self) -> impl Iterator<Item = LogicCellCoords> {
        let height = self.height;
        (0..self.width).flat_map(move |x| (0..height).map(move |y| LogicCellCoords::new(x, y)))
    }

    /// All I/O block sites: north and south pairs first, then west and east pairs.
    pub fn io_block_coords(&self) -> impl Iterator<Item = IoBlockCoords> {
        let horizontal = (0..=self.width).flat_map(|i| {
            [
                IoBlockCoords::new(CardinalDirection::North, i),
                IoBlockCoords::new(CardinalDirection::South, i),
            ]
        });
        let vertical = (0..=self.height).flat_map(|i| {
            [
                IoBlockCoords::new(CardinalDirection::West, i),
                IoBlockCoords::new(CardinalDirection::East, i),
            ]
        });
        horizontal.chain(vertical)
    }

    /// Switch blocks sharing a side with `block`, keyed by that side.
    pub fn adjacent_switch_blocks(
        &self,
        block: SwitchBlockCoords,
    ) -> Vec<(CardinalDirection, SwitchBlockCoords)> {
        let SwitchBlockCoords { x, y } = block;
        let mut adjacent = Vec::with_capacity(4);
        if y > 0 {
            adjacent.push((CardinalDirection::North, SwitchBlockCoords::new(x, y - 1)));
        }
        if y < self.height {
            adjacent.push((CardinalDirection::South, SwitchBlockCoords::new(x, y + 1)));
        }
        if x > 0 {
            adjacent.push((CardinalDirection::West, SwitchBlockCoords::new(x - 1, y)));
        }
        if x < self.width {
            adjacent.push((CardinalDirection::East, SwitchBlockCoords::new(x + 1, y)));
        }
        adjacent
    }

    /// Logic cells touching a corner of `block`, keyed by that corner.
    pub fn adjacent_logic_cells(
        &self,
        block: SwitchBlockCoords,
    ) -> Vec<(IntercardinalDirection, LogicCellCoords)> {
        let SwitchBlockCoords { x, y } = block;
        let (north, south) = (y > 0, y < self.height);
        let (west, east) = (x > 0, x < self.width);
        let mut adjacent = Vec::with_capacity(4);
        if north && west {
            adjacent.push((
                IntercardinalDirection::Northwest,
                LogicCellCoords::new(x - 1, y - 1),
            ));
        }
        if north && east {
            adjacent.push((
                IntercardinalDirection::Northeast,
                LogicCellCoords::new(x, y - 1),
            ));
        }
        if south && west {
            adjacent.push((
                IntercardinalDirection::Southwest,
                LogicCellCoords::new(x - 1, y),
            ));
        }
        if south && east {
            adjacent.push((
                IntercardinalDirection::Southeast,
                LogicCellCoords::new(x, y),
            ));
        }
        adjacent
    }

    /// I/O blocks beside `block`; only perimeter blocks have any.
    pub fn adjacent_io_blocks(
        &self,
        block: SwitchBlockCoords,
    ) -> Vec<(CardinalDirection, IoBlockCoords)> {
        let SwitchBlockCoords { x, y } = block;
        let mut adjacent = Vec::new();
        if y == 0 {
            adjacent.push((CardinalDirection::North, IoBlockCoords::new(CardinalDirection::North, x)));
        }
        if y == self.height {
            adjacent.push((CardinalDirection::South, IoBlockCoords::new(CardinalDirection::South, x)));
        }
        if x == 0 {
            adjacent.push((CardinalDirection::West, IoBlockCoords::new(CardinalDirection::West, y)));
        }
        if x == self.width {
            adjacent.push((CardinalDirection::East, IoBlockCoords::new(CardinalDirection::East, y)));
        }
        adjacent
    }

    /// Builds the weighted routing network of the whole device.
    ///
    /// Inside a switch block every side input reaches every output on the
    /// other three sides, and every corner reaches every side output. Outputs
    /// drive the facing input of the neighbouring block on the same channel.
    /// Logic cell outputs enter the four surrounding corners at cost 1. Cell
    /// inputs are fed from the north side of the block to their south-west,
    /// the west side of the block to their north-east, and the south and east
    /// sides of the block to their north-west; the block to their south-east
    /// feeds them nothing.
    pub fn build_network(&self) -> RoutingGraph {
        let mut network = RoutingGraph::new();

        for block in self.switch_block_coords() {
            for side in CardinalDirection::ALL {
                for other in CardinalDirection::ALL {
                    if side == other {
                        continue;
                    }
                    for input in self.side_inputs(block, side) {
                        for output in self.side_outputs(block, other) {
                            network.add_edge(input, output, channel_cost(&output));
                        }
                    }
                }
                for corner in IntercardinalDirection::ALL {
                    for output in self.side_outputs(block, side) {
                        network.add_edge(
                            RoutingNode::Corner { block, corner },
                            output,
                            channel_cost(&output),
                        );
                    }
                }
            }

            for (side, neighbour) in self.adjacent_switch_blocks(block) {
                let outputs = self.side_outputs(block, side);
                let inputs = self.side_inputs(neighbour, side.opposite());
                for (output, input) in outputs.zip(inputs) {
                    network.add_edge(output, input, channel_cost(&output));
                }
            }

            for (corner, cell) in self.adjacent_logic_cells(block) {
                network.add_edge(
                    RoutingNode::CellOutput { cell },
                    RoutingNode::Corner { block, corner },
                    1,
                );
                let feeding_sides: &[CardinalDirection] = match corner {
                    IntercardinalDirection::Northeast => &[CardinalDirection::North],
                    IntercardinalDirection::Southwest => &[CardinalDirection::West],
                    IntercardinalDirection::Southeast => {
                        &[CardinalDirection::South, CardinalDirection::East]
                    }
                    IntercardinalDirection::Northwest => &[],
                };
                for port in 0..LOGIC_CELL_INPUTS {
                    let input = RoutingNode::CellInput { cell, port };
                    for &side in feeding_sides {
                        for output in self.side_outputs(block, side) {
                            network.add_edge(output, input, channel_cost(&output));
                        }
                    }
                }
            }

            for (side, io) in self.adjacent_io_blocks(block) {
                let io = RoutingNode::IoBlock(io);
                for input in self.side_inputs(block, side) {
                    network.add_edge(io, input, io_cost(&input));
                }
                for output in self.side_outputs(block, side) {
                    network.add_edge(output, io, io_cost(&output));
                }
            }
        }

        network
    }

    fn side_inputs(
        &self,
        block: SwitchBlockCoords,
        side: CardinalDirection,
    ) -> impl Iterator<Item = RoutingNode> {
        (0..self.channels as u8).map(move |channel| RoutingNode::SwitchInput {
            block,
            side,
            channel,
        })
    }

    fn side_outputs(
        &self,
        block: SwitchBlockCoords,
        side: CardinalDirection,
    ) -> impl Iterator<Item = RoutingNode> {
        (0..self.channels as u8).map(move |channel| RoutingNode::SwitchOutput {
            block,
            side,
            channel,
        })
    }
}

fn channel_cost(node: &RoutingNode) -> u32 {
    node.channel().map_or(1, |c| c as u32 + 1)
}

fn io_cost(node: &RoutingNode) -> u32 {
    node.channel().map_or(1, |c| IO_COST * c as u32 + 1)
}
