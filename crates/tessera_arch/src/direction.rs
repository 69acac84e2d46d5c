//! Compass directions on the device grid.
//!
//! X grows to the east and Y grows to the south.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A switch block side, or the edge of the device an I/O block sits on.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardinalDirection {
    /// Towards `y = 0`.
    North,
    /// Towards `y = height`.
    South,
    /// Towards `x = 0`.
    West,
    /// Towards `x = width`.
    East,
}

impl CardinalDirection {
    /// All four directions in a fixed order.
    pub const ALL: [CardinalDirection; 4] = [
        CardinalDirection::North,
        CardinalDirection::South,
        CardinalDirection::West,
        CardinalDirection::East,
    ];

    /// The direction facing this one.
    pub fn opposite(self) -> Self {
        match self {
            CardinalDirection::North => CardinalDirection::South,
            CardinalDirection::South => CardinalDirection::North,
            CardinalDirection::West => CardinalDirection::East,
            CardinalDirection::East => CardinalDirection::West,
        }
    }
}

impl fmt::Display for CardinalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CardinalDirection::North => "north",
            CardinalDirection::South => "south",
            CardinalDirection::West => "west",
            CardinalDirection::East => "east",
        };
        f.write_str(name)
    }
}

/// A switch block corner, pointing at the diagonal logic cell.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntercardinalDirection {
    /// Up and left.
    Northwest,
    /// Up and right.
    Northeast,
    /// Down and left.
    Southwest,
    /// Down and right.
    Southeast,
}

impl IntercardinalDirection {
    /// All four corners in a fixed order.
    pub const ALL: [IntercardinalDirection; 4] = [
        IntercardinalDirection::Northwest,
        IntercardinalDirection::Northeast,
        IntercardinalDirection::Southwest,
        IntercardinalDirection::Southeast,
    ];

    /// The diagonally opposite corner.
    pub fn opposite(self) -> Self {
        match self {
            IntercardinalDirection::Northwest => IntercardinalDirection::Southeast,
            IntercardinalDirection::Northeast => IntercardinalDirection::Southwest,
            IntercardinalDirection::Southwest => IntercardinalDirection::Northeast,
            IntercardinalDirection::Southeast => IntercardinalDirection::Northwest,
        }
    }
}

impl fmt::Display for IntercardinalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IntercardinalDirection::Northwest => "northwest",
            IntercardinalDirection::Northeast => "northeast",
            IntercardinalDirection::Southwest => "southwest",
            IntercardinalDirection::Southeast => "southeast",
        };
        f.write_str(name)
    }
}
