//! Grid coordinates of device blocks.

use crate::direction::CardinalDirection;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a switch block, `0..=width` by `0..=height`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct SwitchBlockCoords {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
}

/// Position of a logic cell, `0..width` by `0..height`.
///
/// Logic cell `(x, y)` sits between switch blocks `(x, y)` and `(x + 1, y + 1)`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct LogicCellCoords {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
}

/// Position of an I/O block: the device edge it sits on and its index along
/// that edge, matching the coordinate of the switch block it attaches to.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct IoBlockCoords {
    /// The device edge.
    pub side: CardinalDirection,
    /// `x` for north and south edges, `y` for west and east edges.
    pub index: u32,
}

impl SwitchBlockCoords {
    /// Creates switch block coordinates.
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl LogicCellCoords {
    /// Creates logic cell coordinates.
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl IoBlockCoords {
    /// Creates I/O block coordinates.
    pub fn new(side: CardinalDirection, index: u32) -> Self {
        Self { side, index }
    }
}

impl fmt::Display for SwitchBlockCoords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sb({},{})", self.x, self.y)
    }
}

impl fmt::Display for LogicCellCoords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lc({},{})", self.x, self.y)
    }
}

impl fmt::Display for IoBlockCoords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "io({},{})", self.side, self.index)
    }
}
