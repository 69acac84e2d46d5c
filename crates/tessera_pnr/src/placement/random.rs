//! Random initial placement.

use crate::error::RoutingError;
use crate::placement::Placement;
use rand::seq::SliceRandom;
use rand::Rng;
use tessera_arch::{DeviceTopology, IoBlockCoords, LogicCellCoords};
use tessera_impl::Implementation;

impl Placement {
    /// Assigns every logic cell and port bit to a distinct random site.
    ///
    /// Fails before touching the sites if the device is too small.
    pub fn random(
        implementation: &Implementation,
        topology: &DeviceTopology,
        rng: &mut impl Rng,
    ) -> Result<Self, RoutingError> {
        let cells: Vec<_> = implementation.logic_cells().map(|(n, _)| n).collect();
        let ports: Vec<_> = implementation.module_ports().map(|(n, _)| n).collect();

        if cells.len() > topology.logic_cell_count() {
            return Err(RoutingError::NotEnoughLogicCells {
                required: cells.len(),
                available: topology.logic_cell_count(),
            });
        }
        if ports.len() > topology.io_block_count() {
            return Err(RoutingError::NotEnoughIoBlocks {
                required: ports.len(),
                available: topology.io_block_count(),
            });
        }

        let mut cell_sites: Vec<LogicCellCoords> = topology.logic_cell_coords().collect();
        let mut io_sites: Vec<IoBlockCoords> = topology.io_block_coords().collect();
        cell_sites.shuffle(rng);
        io_sites.shuffle(rng);

        let mut placement = Placement::new();
        for (node, site) in cells.into_iter().zip(cell_sites) {
            placement.move_cell(node, site);
        }
        for (node, site) in ports.into_iter().zip(io_sites) {
            placement.move_port(node, site);
        }
        Ok(placement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;
    use tessera_netlist::Design;

    fn counter(bits: usize) -> Implementation {
        let outputs: Vec<String> = (0..bits).map(|b| (10 + b).to_string()).collect();
        let mut cells = String::new();
        for b in 0..bits {
            cells.push_str(&format!(
                r#""ff{b}": {{ "type": "$_DFF_P_", "connections": {{ "C": [2], "D": [3], "Q": [{}] }} }},"#,
                10 + b
            ));
        }
        cells.pop();
        let json = format!(
            r#"{{ "modules": {{ "top": {{
                "attributes": {{ "top": 1 }},
                "ports": {{
                    "clock": {{ "direction": "input", "bits": [2] }},
                    "d": {{ "direction": "input", "bits": [3] }},
                    "q": {{ "direction": "output", "bits": [{}] }}
                }},
                "cells": {{ {cells} }}
            }} }} }}"#,
            outputs.join(", ")
        );
        Implementation::build(&Design::from_json(&json).unwrap()).unwrap()
    }

    #[test]
    fn every_node_gets_a_distinct_site() {
        let implementation = counter(3);
        let topology = DeviceTopology::new(2, 2).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let placement = Placement::random(&implementation, &topology, &mut rng).unwrap();

        assert_eq!(placement.cell_count(), 3);
        assert_eq!(placement.port_count(), 5);
        let sites: HashSet<_> = placement.cells().map(|(_, s)| s).collect();
        assert_eq!(sites.len(), 3);
        let io: HashSet<_> = placement.ports().map(|(_, s)| s).collect();
        assert_eq!(io.len(), 5);
    }

    #[test]
    fn same_seed_same_placement() {
        let implementation = counter(2);
        let topology = DeviceTopology::new(3, 3).unwrap();
        let a = Placement::random(&implementation, &topology, &mut StdRng::seed_from_u64(9));
        let b = Placement::random(&implementation, &topology, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn too_many_cells() {
        let implementation = counter(5);
        let topology = DeviceTopology::new(2, 2).unwrap();
        let err = Placement::random(&implementation, &topology, &mut StdRng::seed_from_u64(3))
            .unwrap_err();
        assert_eq!(
            err,
            RoutingError::NotEnoughLogicCells {
                required: 5,
                available: 4
            }
        );
    }

    #[test]
    fn too_many_ports() {
        // five bits wired straight from input to output, no cells
        let json = r#"{ "modules": { "top": {
            "attributes": { "top": 1 },
            "ports": {
                "a": { "direction": "input", "bits": [2, 3, 4, 5, 6] },
                "y": { "direction": "output", "bits": [2, 3, 4, 5, 6] }
            },
            "cells": {}
        } } }"#;
        let implementation = Implementation::build(&Design::from_json(json).unwrap()).unwrap();
        let topology = DeviceTopology::new(1, 1).unwrap();
        let err = Placement::random(&implementation, &topology, &mut StdRng::seed_from_u64(3))
            .unwrap_err();
        assert_eq!(
            err,
            RoutingError::NotEnoughIoBlocks {
                required: 10,
                available: 8
            }
        );
    }
}
