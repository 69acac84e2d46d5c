//! Placement of logic cells and module ports onto device sites.
//!
//! A [`Placement`] starts from a random assignment ([`Placement::random`]) and
//! is then refined by simulated annealing ([`anneal`]), which scores each
//! candidate by actually routing it.

mod anneal;
mod cost;
mod random;

pub use anneal::{anneal, AnnealReport, AnnealSchedule};
pub use cost::{median_tree_size, placement_cost};

use petgraph::graph::NodeIndex;
use std::collections::BTreeMap;
use tessera_arch::{IoBlockCoords, LogicCellCoords};

/// Assignment of logic cells to logic cell sites and module port bits to
/// I/O blocks.
///
/// No two cells share a site and no two ports share an I/O block; the move
/// operations swap occupants to keep it that way.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Placement {
    cells: BTreeMap<NodeIndex, LogicCellCoords>,
    ports: BTreeMap<NodeIndex, IoBlockCoords>,
}

impl Placement {
    /// Creates an empty placement.
    pub fn new() -> Self {
        Self::default()
    }

    /// The site of a logic cell.
    pub fn cell_site(&self, node: NodeIndex) -> Option<LogicCellCoords> {
        self.cells.get(&node).copied()
    }

    /// The I/O block of a module port bit.
    pub fn port_site(&self, node: NodeIndex) -> Option<IoBlockCoords> {
        self.ports.get(&node).copied()
    }

    /// Placed logic cells in node order.
    pub fn cells(&self) -> impl Iterator<Item = (NodeIndex, LogicCellCoords)> + '_ {
        self.cells.iter().map(|(&n, &c)| (n, c))
    }

    /// Placed port bits in node order.
    pub fn ports(&self) -> impl Iterator<Item = (NodeIndex, IoBlockCoords)> + '_ {
        self.ports.iter().map(|(&n, &c)| (n, c))
    }

    /// The logic cell occupying `site`, if any.
    pub fn cell_at(&self, site: LogicCellCoords) -> Option<NodeIndex> {
        self.cells
            .iter()
            .find_map(|(&n, &c)| (c == site).then_some(n))
    }

    /// The port bit occupying `site`, if any.
    pub fn port_at(&self, site: IoBlockCoords) -> Option<NodeIndex> {
        self.ports
            .iter()
            .find_map(|(&n, &c)| (c == site).then_some(n))
    }

    /// Moves a logic cell to `site`, swapping with whatever cell was there.
    ///
    /// If `node` was not placed yet, the previous occupant becomes unplaced.
    pub fn move_cell(&mut self, node: NodeIndex, site: LogicCellCoords) {
        let previous = self.cells.get(&node).copied();
        if let Some(occupant) = self.cell_at(site) {
            match previous {
                Some(previous) => self.cells.insert(occupant, previous),
                None => self.cells.remove(&occupant),
            };
        }
        self.cells.insert(node, site);
    }

    /// Moves a port bit to `site`, swapping with whatever port was there.
    pub fn move_port(&mut self, node: NodeIndex, site: IoBlockCoords) {
        let previous = self.ports.get(&node).copied();
        if let Some(occupant) = self.port_at(site) {
            match previous {
                Some(previous) => self.ports.insert(occupant, previous),
                None => self.ports.remove(&occupant),
            };
        }
        self.ports.insert(node, site);
    }

    /// Number of placed logic cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of placed port bits.
    pub fn port_count(&self) -> usize {
        self.ports.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_arch::CardinalDirection;

    #[test]
    fn moving_onto_occupied_site_swaps() {
        let mut placement = Placement::new();
        let (a, b) = (NodeIndex::new(0), NodeIndex::new(1));
        placement.move_cell(a, LogicCellCoords::new(0, 0));
        placement.move_cell(b, LogicCellCoords::new(1, 0));

        placement.move_cell(a, LogicCellCoords::new(1, 0));
        assert_eq!(placement.cell_site(a), Some(LogicCellCoords::new(1, 0)));
        assert_eq!(placement.cell_site(b), Some(LogicCellCoords::new(0, 0)));
        assert_eq!(placement.cell_count(), 2);
    }

    #[test]
    fn moving_to_free_site_leaves_others() {
        let mut placement = Placement::new();
        let (a, b) = (NodeIndex::new(0), NodeIndex::new(1));
        let north = |i| IoBlockCoords::new(CardinalDirection::North, i);
        placement.move_port(a, north(0));
        placement.move_port(b, north(1));

        placement.move_port(a, north(2));
        assert_eq!(placement.port_at(north(0)), None);
        assert_eq!(placement.port_site(b), Some(north(1)));
        assert_eq!(placement.port_at(north(2)), Some(a));
    }
}
