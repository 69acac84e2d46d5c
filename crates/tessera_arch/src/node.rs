//! Routable resource nodes.

use crate::coords::{IoBlockCoords, LogicCellCoords, SwitchBlockCoords};
use crate::direction::{CardinalDirection, IntercardinalDirection};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One routable resource of the fabric.
///
/// Switch block sides carry one input and one output wire per channel.
/// Corners collect the output of the diagonal logic cell. I/O blocks both
/// drive and receive signals, so a single node stands for either use.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum RoutingNode {
    /// Wire entering a switch block side.
    SwitchInput {
        /// The switch block.
        block: SwitchBlockCoords,
        /// Which side.
        side: CardinalDirection,
        /// Channel number, 0 first.
        channel: u8,
    },
    /// Wire leaving a switch block side.
    SwitchOutput {
        /// The switch block.
        block: SwitchBlockCoords,
        /// Which side.
        side: CardinalDirection,
        /// Channel number, 0 first.
        channel: u8,
    },
    /// A switch block corner fed by a logic cell output.
    Corner {
        /// The switch block.
        block: SwitchBlockCoords,
        /// Direction of the logic cell as seen from the block.
        corner: IntercardinalDirection,
    },
    /// A logic cell LUT input.
    CellInput {
        /// The logic cell.
        cell: LogicCellCoords,
        /// LUT input number.
        port: u8,
    },
    /// A logic cell output.
    CellOutput {
        /// The logic cell.
        cell: LogicCellCoords,
    },
    /// A perimeter I/O block.
    IoBlock(IoBlockCoords),
}

impl RoutingNode {
    /// Returns `true` for I/O blocks.
    ///
    /// An I/O block is a terminal: signals may start or end there but never
    /// pass through.
    pub fn is_io_block(&self) -> bool {
        matches!(self, RoutingNode::IoBlock(_))
    }

    /// The wire channel, for switch block side nodes.
    pub fn channel(&self) -> Option<u8> {
        match self {
            RoutingNode::SwitchInput { channel, .. } | RoutingNode::SwitchOutput { channel, .. } => {
                Some(*channel)
            }
            _ => None,
        }
    }
}

impl fmt::Display for RoutingNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutingNode::SwitchInput {
                block,
                side,
                channel,
            } => write!(f, "{block}.{side}.in[{channel}]"),
            RoutingNode::SwitchOutput {
                block,
                side,
                channel,
            } => write!(f, "{block}.{side}.out[{channel}]"),
            RoutingNode::Corner { block, corner } => write!(f, "{block}.{corner}"),
            RoutingNode::CellInput { cell, port } => write!(f, "{cell}.in[{port}]"),
            RoutingNode::CellOutput { cell } => write!(f, "{cell}.out"),
            RoutingNode::IoBlock(io) => write!(f, "{io}"),
        }
    }
}
